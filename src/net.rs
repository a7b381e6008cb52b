//! The network model: a DAG of objects (inputs, outputs, latches, logic
//! nodes, boxes, strashed ANDs), each carrying a function handle into the
//! network's cover arena, DD manager, or strash table.
//!
//! Fanin lists are ordered and carry a per-edge complement attribute
//! (meaningful in strashed networks); fanout lists are maintained
//! symmetrically by every mutator. Objects are addressed by id and live
//! for the lifetime of the network.
use smallvec::SmallVec;
use fxhash::FxHashMap;
use crate::dd::Dd;
use crate::edge::Edge;
use crate::sop::{self, Arena, SopId};
use crate::{Error, Result};

pub type ObjId = u32;
pub const NIL: ObjId = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjType { Pi, Po, LatchIn, LatchOut, Latch, Node, Box, And, Const1 }

/// Function handle of an object, discriminated by the owning network's
/// functional type. IO objects carry `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func { None, Sop(SopId), Bdd(Edge) }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fanin { pub id: ObjId, pub compl: bool }

impl Fanin {
  pub fn new(id: ObjId)->Fanin { Fanin { id, compl: false }}
  pub fn compl(id: ObjId)->Fanin { Fanin { id, compl: true }}}

#[derive(Debug, Clone)]
pub struct Obj {
  pub ty: ObjType,
  pub fanins: SmallVec<[Fanin; 4]>,
  pub fanouts: Vec<ObjId>,
  pub func: Func,
  pub level: u32,
  /// scratch pointer for single-threaded transforms
  pub copy: i64,
  travid: u32,
  pub dead: bool }

impl Obj {
  fn new(ty: ObjType)->Obj {
    Obj { ty, fanins: SmallVec::new(), fanouts: vec![], func: Func::None,
          level: 0, copy: -1, travid: 0, dead: false }}
  pub fn is_node(&self)->bool { matches!(self.ty, ObjType::Node | ObjType::And) }
  pub fn is_ci(&self)->bool { matches!(self.ty, ObjType::Pi | ObjType::LatchOut) }
  pub fn is_co(&self)->bool { matches!(self.ty, ObjType::Po | ObjType::LatchIn) }}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetType { Aig, LogicSop, LogicBdd, LogicAig, LogicMapped, Netlist }

/// A combinational (or latched) Boolean network. Exclusively owns its
/// objects, cover arena, DD manager, strash table and name map.
pub struct Net {
  pub name: String,
  pub spec: String,
  pub ty: NetType,
  pub objs: Vec<Obj>,
  pub pis: Vec<ObjId>,
  pub pos: Vec<ObjId>,
  pub latches: Vec<ObjId>,
  pub boxes: Vec<ObjId>,
  pub arena: Arena,
  pub dd: Option<Dd>,
  pub strash: Option<FxHashMap<(u32, u32), ObjId>>,
  /// the constant-one object of a strashed network
  pub const1: ObjId,
  pub names: FxHashMap<ObjId, String>,
  pub latch_init: FxHashMap<ObjId, bool>,
  /// external don't-care network, if any
  pub exdc: Option<Box<Net>>,
  /// counterexample from an external checker: one value per CI
  pub model: Option<Vec<bool>>,
  /// per-object phase vector left behind by phase-assignment passes
  pub phases: Option<Vec<bool>>,
  travid: u32 }

impl Net {

  pub fn new(name: &str, ty: NetType)->Net {
    Net { name: name.to_string(), spec: String::new(), ty,
          objs: vec![], pis: vec![], pos: vec![], latches: vec![], boxes: vec![],
          arena: Arena::new(), dd: None, strash: None, const1: NIL,
          names: FxHashMap::default(), latch_init: FxHashMap::default(),
          exdc: None, model: None, phases: None, travid: 0 }}

  // --- object accessors ----------------------------------------------------

  pub fn obj(&self, id: ObjId)->&Obj { &self.objs[id as usize] }
  pub fn obj_mut(&mut self, id: ObjId)->&mut Obj { &mut self.objs[id as usize] }
  pub fn n_objs(&self)->usize { self.objs.iter().filter(|o| !o.dead).count() }
  pub fn n_nodes(&self)->usize {
    self.objs.iter().filter(|o| !o.dead && o.is_node()).count() }

  /// combinational inputs: PIs then latch outputs.
  pub fn cis(&self)->Vec<ObjId> {
    let mut r = self.pis.clone();
    for &l in &self.latches { r.push(self.obj(l).fanouts[0]); }
    r }

  /// combinational outputs: POs then latch inputs.
  pub fn cos(&self)->Vec<ObjId> {
    let mut r = self.pos.clone();
    for &l in &self.latches { r.push(self.obj(l).fanins[0].id); }
    r }

  pub fn node_ids(&self)->Vec<ObjId> {
    (0..self.objs.len() as ObjId)
      .filter(|&i| !self.obj(i).dead && self.obj(i).is_node()).collect() }

  pub fn sop(&self, id: ObjId)->&str {
    match self.obj(id).func {
      Func::Sop(s) => self.arena.get(s),
      _ => panic!("object {} carries no cover", id) }}

  // --- constructors --------------------------------------------------------

  fn add_obj(&mut self, ty: ObjType)->ObjId {
    let id = self.objs.len() as ObjId;
    self.objs.push(Obj::new(ty));
    id }

  pub fn add_pi(&mut self, name: Option<&str>)->ObjId {
    let id = self.add_obj(ObjType::Pi);
    if let Some(n) = name { self.names.insert(id, n.to_string()); }
    self.pis.push(id);
    id }

  pub fn add_po(&mut self, name: Option<&str>)->ObjId {
    let id = self.add_obj(ObjType::Po);
    if let Some(n) = name { self.names.insert(id, n.to_string()); }
    self.pos.push(id);
    id }

  pub fn add_node(&mut self)->ObjId { self.add_obj(ObjType::Node) }
  pub fn add_box(&mut self)->ObjId {
    let id = self.add_obj(ObjType::Box);
    self.boxes.push(id);
    id }

  /// a latch atomically creates its input, body, and output; returns
  /// (input, body, output).
  pub fn add_latch(&mut self, init: Option<bool>)->(ObjId, ObjId, ObjId) {
    let li = self.add_obj(ObjType::LatchIn);
    let l = self.add_obj(ObjType::Latch);
    let lo = self.add_obj(ObjType::LatchOut);
    self.add_fanin(l, li, false);
    self.add_fanin(lo, l, false);
    self.latches.push(l);
    if let Some(v) = init { self.latch_init.insert(l, v); }
    (li, l, lo) }

  /// the constant-one object of a strashed network (created on demand).
  pub fn get_const1(&mut self)->ObjId {
    if self.const1 == NIL { self.const1 = self.add_obj(ObjType::Const1); }
    self.const1 }

  // --- mutators ------------------------------------------------------------

  /// append `src` to `obj`'s fanins and `obj` to `src`'s fanouts; the
  /// complement bit is carried on the edge. Levels stay monotone.
  pub fn add_fanin(&mut self, obj: ObjId, src: ObjId, compl: bool) {
    debug_assert!(obj != src);
    self.objs[obj as usize].fanins.push(Fanin { id: src, compl });
    self.objs[src as usize].fanouts.push(obj);
    let lvl = self.objs[src as usize].level + 1;
    if self.objs[obj as usize].is_node() && self.objs[obj as usize].level < lvl {
      self.raise_level(obj, lvl); }}

  fn raise_level(&mut self, obj: ObjId, lvl: u32) {
    if self.objs[obj as usize].level >= lvl { return }
    self.objs[obj as usize].level = lvl;
    let fouts = self.objs[obj as usize].fanouts.clone();
    for fo in fouts {
      if self.objs[fo as usize].is_node() { self.raise_level(fo, lvl + 1); }}}

  /// drop the fanin at position `k` of `obj`, fixing the symmetric link.
  pub fn remove_fanin(&mut self, obj: ObjId, k: usize) {
    let src = self.objs[obj as usize].fanins.remove(k).id;
    let pos = self.objs[src as usize].fanouts.iter()
      .position(|&o| o == obj).expect("fanout link missing");
    self.objs[src as usize].fanouts.swap_remove(pos); }

  /// detach every fanin of `obj`.
  pub fn clear_fanins(&mut self, obj: ObjId) {
    while !self.objs[obj as usize].fanins.is_empty() {
      let k = self.objs[obj as usize].fanins.len() - 1;
      self.remove_fanin(obj, k); }}

  /// redirect every fanout of `old` to read `new` instead, xor-ing the
  /// extra complement into each edge.
  pub fn redirect_fanouts(&mut self, old: ObjId, new: ObjId, compl: bool) {
    let fouts = std::mem::take(&mut self.objs[old as usize].fanouts);
    for fo in &fouts {
      for f in self.objs[*fo as usize].fanins.iter_mut() {
        if f.id == old { f.id = new; f.compl ^= compl; }}
      self.objs[new as usize].fanouts.push(*fo); }}

  /// remove `obj`; it must have no fanouts. With `cascade`, fanins whose
  /// fanout count drops to zero are removed recursively.
  pub fn delete_obj(&mut self, obj: ObjId, cascade: bool) {
    assert!(self.objs[obj as usize].fanouts.is_empty(),
            "cannot delete an object with live fanouts");
    self.clear_fanins_collect(obj, cascade);
    let ty = self.objs[obj as usize].ty;
    let o = &mut self.objs[obj as usize];
    o.dead = true;
    o.func = Func::None;
    match ty {
      ObjType::Pi => { let p = self.pis.iter().position(|&x| x == obj);
                       if let Some(p) = p { self.pis.remove(p); }}
      ObjType::Po => { let p = self.pos.iter().position(|&x| x == obj);
                       if let Some(p) = p { self.pos.remove(p); }}
      ObjType::Latch => { let p = self.latches.iter().position(|&x| x == obj);
                          if let Some(p) = p { self.latches.remove(p); }}
      ObjType::Box => { let p = self.boxes.iter().position(|&x| x == obj);
                        if let Some(p) = p { self.boxes.remove(p); }}
      _ => {}}
    self.names.remove(&obj); }

  fn clear_fanins_collect(&mut self, obj: ObjId, cascade: bool) {
    let fins: Vec<ObjId> = self.objs[obj as usize].fanins.iter().map(|f| f.id).collect();
    self.clear_fanins(obj);
    if cascade {
      for src in fins {
        let s = &self.objs[src as usize];
        if s.fanouts.is_empty() && s.is_node() && !s.dead {
          self.delete_obj(src, true); }}}}

  // --- traversal -----------------------------------------------------------

  /// start a fresh traversal epoch. Marking is O(1), clearing is free.
  pub fn trav_bump(&mut self) { self.travid += 1; }
  pub fn mark(&mut self, id: ObjId) { self.objs[id as usize].travid = self.travid; }
  pub fn is_marked(&self, id: ObjId)->bool { self.objs[id as usize].travid == self.travid }

  /// internal nodes reachable from `roots`, in topological order.
  pub fn dfs(&mut self, roots: &[ObjId])->Vec<ObjId> {
    self.trav_bump();
    let mut order = vec![];
    for &r in roots {
      let start = if self.obj(r).is_co() { self.obj(r).fanins[0].id } else { r };
      self.dfs_rec(start, &mut order); }
    order }

  fn dfs_rec(&mut self, id: ObjId, order: &mut Vec<ObjId>) {
    if self.is_marked(id) { return }
    self.mark(id);
    if !self.obj(id).is_node() { return }
    let fins: SmallVec<[Fanin; 4]> = self.obj(id).fanins.clone();
    for f in fins { self.dfs_rec(f.id, order); }
    order.push(id); }

  /// every internal node in topological order.
  pub fn topo_order(&mut self)->Vec<ObjId> {
    let cos = self.cos();
    self.dfs(&cos) }

  /// recompute cached levels from scratch.
  pub fn update_levels(&mut self)->u32 {
    let order = self.topo_order();
    for &id in &self.pis.clone() { self.objs[id as usize].level = 0; }
    let mut max = 0;
    for id in order {
      let lvl = self.obj(id).fanins.iter()
        .map(|f| self.obj(f.id).level + 1).max().unwrap_or(0);
      self.objs[id as usize].level = lvl;
      max = max.max(lvl); }
    max }

  // --- latch surgery -------------------------------------------------------

  /// convert latch outputs to PIs and latch inputs to POs; latch bodies
  /// are removed with `drop_latches`, or retained as disconnected boxes.
  pub fn make_comb(&mut self, drop_latches: bool) {
    let latches = std::mem::take(&mut self.latches);
    for &l in &latches {
      let li = self.obj(l).fanins[0].id;
      let lo = self.obj(l).fanouts[0];
      // unhook the body
      self.clear_fanins(l);
      let lo_pos = self.objs[l as usize].fanouts.iter().position(|&x| x == lo);
      if let Some(p) = lo_pos { self.objs[l as usize].fanouts.remove(p); }
      self.objs[lo as usize].fanins.clear();
      self.objs[lo as usize].ty = ObjType::Pi;
      self.objs[lo as usize].level = 0;
      self.pis.push(lo);
      self.objs[li as usize].ty = ObjType::Po;
      self.pos.push(li);
      if drop_latches {
        self.objs[l as usize].dead = true;
        self.latch_init.remove(&l); }
      else {
        self.objs[l as usize].ty = ObjType::Box;
        self.boxes.push(l); }}}

  /// re-latch the last `n` PI/PO pairs (inverse of `make_comb`).
  pub fn make_seq(&mut self, n: usize) {
    assert!(n <= self.pis.len() && n <= self.pos.len());
    let pis: Vec<ObjId> = self.pis.split_off(self.pis.len() - n);
    let pos: Vec<ObjId> = self.pos.split_off(self.pos.len() - n);
    for (lo, li) in pis.into_iter().zip(pos) {
      let l = self.add_obj(ObjType::Latch);
      self.objs[li as usize].ty = ObjType::LatchIn;
      self.objs[lo as usize].ty = ObjType::LatchOut;
      self.add_fanin(l, li, false);
      self.add_fanin(lo, l, false);
      self.latches.push(l); }}

  // --- cover maintenance ---------------------------------------------------

  /// remove, from every internal node, fanins outside its function's
  /// support. Idempotent.
  pub fn minimum_base(&mut self) {
    let nodes = self.node_ids();
    for id in nodes {
      match self.obj(id).func {
        Func::Sop(s) => {
          let cover = self.arena.get(s).to_string();
          let (reduced, keep) = sop::minimum_base(&cover);
          if keep.len() == self.obj(id).fanins.len() { continue }
          let new_id = self.arena.register(&reduced);
          // drop fanins not in the kept set, back to front
          let nf = self.obj(id).fanins.len();
          for k in (0..nf).rev() {
            if !keep.contains(&k) { self.remove_fanin(id, k); }}
          self.objs[id as usize].func = Func::Sop(new_id); }
        Func::Bdd(f) => {
          let dd = self.dd.as_mut().expect("Logic-BDD network without a manager");
          let supp = dd.support(f);
          let nf = self.obj(id).fanins.len();
          let mut cur = f;
          for k in (0..nf).rev() {
            if supp.contains(&(k as u32)) { continue }
            // renumber the function's variables down over the gap
            let map: Vec<u32> = (0..nf as u32)
              .map(|v| if v > k as u32 { v - 1 } else { v }).collect();
            let dd = self.dd.as_mut().expect("manager vanished mid-pass");
            cur = dd.permute(cur, &map);
            self.objs[id as usize].func = Func::Bdd(cur);
            self.remove_fanin(id, k); }}
        Func::None => {}}}}

  /// attach a constant-0 driver to every undriven combinational output
  /// (netlist finalization).
  pub fn fix_nondriven_nets(&mut self) {
    let mut const0 = NIL;
    for co in self.cos() {
      if !self.obj(co).fanins.is_empty() { continue }
      if const0 == NIL {
        const0 = self.add_node();
        let s = self.arena.register(&sop::create_const0());
        self.objs[const0 as usize].func = Func::Sop(s); }
      warn!("undriven net at object {}; tying to constant 0", co);
      self.add_fanin(co, const0, false); }}

  // --- validation ----------------------------------------------------------

  /// exhaustively validate the network invariants. Called after every
  /// externally visible transform; failure means the transform is buggy.
  pub fn check(&self)->Result<()> {
    let fail = |msg: String| Err(Error::Invariant(msg));
    for (i, o) in self.objs.iter().enumerate() {
      if o.dead { continue }
      let id = i as ObjId;
      for f in &o.fanins {
        let src = self.obj(f.id);
        if src.dead { return fail(format!("{} has dead fanin {}", id, f.id)) }
        if !src.fanouts.contains(&id) {
          return fail(format!("fanin {}->{} has no fanout link", f.id, id)) }}
      for &fo in &o.fanouts {
        if self.obj(fo).dead { return fail(format!("{} has dead fanout {}", id, fo)) }
        if !self.obj(fo).fanins.iter().any(|f| f.id == id) {
          return fail(format!("fanout {}->{} has no fanin link", id, fo)) }}
      if o.is_co() && o.fanins.len() != 1 {
        return fail(format!("CO {} has {} fanins", id, o.fanins.len())) }
      if o.ty == ObjType::Latch
         && (o.fanins.len() != 1 || o.fanouts.len() != 1) {
        return fail(format!("latch {} is not 1-in/1-out", id)) }
      if o.is_node() {
        for f in &o.fanins {
          let src = self.obj(f.id);
          if src.is_node() && src.level >= o.level {
            return fail(format!("level not monotone across {}->{}", f.id, id)) }}}
      if self.ty == NetType::LogicSop && o.ty == ObjType::Node {
        if let Func::Sop(s) = o.func {
          let nv = sop::var_count(self.arena.get(s));
          if nv != o.fanins.len() {
            return fail(format!("node {}: cover width {} != {} fanins",
                                id, nv, o.fanins.len())) }}
        else { return fail(format!("Logic-SOP node {} carries no cover", id)) }}
      if o.ty == ObjType::And {
        if o.fanins.len() != 2 {
          return fail(format!("AND {} has {} fanins", id, o.fanins.len())) }
        if o.fanins[0].id > o.fanins[1].id {
          return fail(format!("AND {} fanins out of canonical order", id)) }}}
    // strashed networks: no duplicate AND nodes
    if self.ty == NetType::Aig {
      let mut seen = FxHashMap::default();
      for (i, o) in self.objs.iter().enumerate() {
        if o.dead || o.ty != ObjType::And { continue }
        let key = (o.fanins[0], o.fanins[1]);
        if let Some(prev) = seen.insert(key, i) {
          return fail(format!("duplicate AND nodes {} and {}", prev, i)) }}}
    Ok(()) }}

include!("test-net.rs");
