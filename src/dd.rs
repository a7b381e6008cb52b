//! A manager for reduced ordered binary decision diagrams with complement
//! edges, a unique table, a bounded computed cache, reference counting,
//! and dynamic variable reordering.
//!
//! Canonical form: the else-edge of every stored node is regular; the
//! complement flag lives on incoming edges only. Node identity therefore
//! implies functional equality up to the current variable order.
use std::time::Instant;
use fxhash::{FxHashMap, FxHashSet};
use crate::edge::{Edge, I, O};

mod dd_sift;
mod dd_isop;
pub use dd_isop::Term;
pub use dd_sift::Method;

/// Level of the terminal: below every variable.
pub(crate) const TERM_LEVEL: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Node {
  pub var: u32,
  pub hi: Edge,
  pub lo: Edge,
  pub rc: u32 }

/// Budget carried through every recursive operation. Crossing the
/// deadline or the node cap makes the recursion unwind with `None`,
/// leaving the unique table and cache consistent, so the caller can
/// reorder and retry.
#[derive(Debug, Default, Clone)]
pub struct Limits {
  pub deadline: Option<Instant>,
  pub node_cap: Option<usize>,
  tick: u32 }

impl Limits {
  pub fn none()->Limits { Limits::default() }
  pub fn cap(n: usize)->Limits { Limits { node_cap: Some(n), ..Limits::default() }}
  pub fn until(t: Instant)->Limits { Limits { deadline: Some(t), ..Limits::default() }}

  /// returns None when a bound was crossed. the wall clock is consulted
  /// only every 256 steps.
  #[inline] fn step(&mut self, allocated: usize)->Option<()> {
    if let Some(cap) = self.node_cap { if allocated > cap { return None }}
    self.tick = self.tick.wrapping_add(1);
    if self.tick & 0xff == 0 {
      if let Some(d) = self.deadline { if Instant::now() >= d { return None }}}
    Some(()) }}

/// Operation tags for the computed cache.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
enum Op { Ite, AndAbs, Exist, Cof, Restrict }

type CacheKey = (Op, Edge, Edge, Edge);

/// An if/then/else triple in normal form, used as a cache key.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub(crate) struct IteKey { f: Edge, g: Edge, h: Edge }

/// Result of normalizing an ITE: either already a known edge, or a
/// canonical key (possibly under an outer complement).
enum Norm { Done(Edge), Key(IteKey), NotKey(IteKey) }

/// The DD manager.
pub struct Dd {
  pub(crate) nodes: Vec<Node>,
  pub(crate) free: Vec<u32>,
  pub(crate) uniq: FxHashMap<(u32, Edge, Edge), u32>,
  cache: FxHashMap<CacheKey, Edge>,
  cache_cap: usize,
  /// var -> level
  pub(crate) perm: Vec<u32>,
  /// level -> var
  pub(crate) invperm: Vec<u32>,
  pub(crate) dead: usize,
  /// autoreorder: when set, `reduce_heap` runs at public-op entry once
  /// the live count doubles past `reorder_at`.
  autodyn: Option<Method>,
  reorder_at: usize }

impl Dd {

  pub fn new(nvars: usize)->Dd {
    let mut dd = Dd {
      nodes: vec![Node { var: u32::MAX, hi: I, lo: O, rc: 1 }],
      free: vec![],
      uniq: FxHashMap::default(),
      cache: FxHashMap::default(),
      cache_cap: 1 << 20,
      perm: vec![],
      invperm: vec![],
      dead: 0,
      autodyn: None,
      reorder_at: 4096 };
    for _ in 0..nvars { dd.new_var(); }
    dd }

  /// allocate a fresh variable at the bottom of the order.
  pub fn new_var(&mut self)->u32 {
    let v = self.perm.len() as u32;
    self.perm.push(v);
    self.invperm.push(v);
    v }

  pub fn num_vars(&self)->usize { self.perm.len() }

  /// nodes currently allocated (live + dead, excluding recycled slots).
  pub fn allocated(&self)->usize { self.nodes.len() - 1 - self.free.len() }

  /// nodes reachable from a live reference.
  pub fn live(&self)->usize { self.allocated() - self.dead }

  /// enable reordering on node-count doubling.
  pub fn autodyn_enable(&mut self, m: Method) { self.autodyn = Some(m); }
  pub fn autodyn_disable(&mut self) { self.autodyn = None; }

  /// the constant-one edge.
  pub fn read_one(&self)->Edge { I }

  #[inline] pub(crate) fn node(&self, e: Edge)->&Node { &self.nodes[e.idx()] }

  /// level of the node an edge points at (terminal is below everything).
  #[inline] pub(crate) fn level(&self, e: Edge)->u32 {
    if e.is_const() { TERM_LEVEL } else { self.perm[self.node(e).var as usize] }}

  /// branch variable of a non-constant edge.
  #[inline] pub fn var(&self, e: Edge)->u32 {
    debug_assert!(!e.is_const());
    self.node(e).var }

  /// (hi, lo) cofactors of `e` with respect to its own top variable,
  /// complement pushed through.
  #[inline] pub fn cofs(&self, e: Edge)->(Edge, Edge) {
    let n = self.node(e);
    (n.hi.inv_if(e.is_inv()), n.lo.inv_if(e.is_inv())) }

  /// cofactors of `e` with respect to the variable at `lvl`, which must
  /// be at or above `e`'s own top level.
  #[inline] fn cofs_at(&self, e: Edge, lvl: u32)->(Edge, Edge) {
    if self.level(e) == lvl { self.cofs(e) } else { (e, e) }}

  /// find-or-create the node (var, hi, lo), restoring canonicity.
  pub(crate) fn make(&mut self, var: u32, hi: Edge, lo: Edge)->Edge {
    if hi == lo { return hi }
    debug_assert!(self.perm[var as usize] < self.level(hi));
    debug_assert!(self.perm[var as usize] < self.level(lo));
    // carry the complement of the else-edge out to the result
    let (hi, lo, inv) = if lo.is_inv() { (!hi, !lo, true) } else { (hi, lo, false) };
    let ix = if let Some(&ix) = self.uniq.get(&(var, hi, lo)) { ix }
    else {
      self.bump(hi); self.bump(lo);
      let node = Node { var, hi, lo, rc: 0 };
      let ix = if let Some(ix) = self.free.pop() {
        self.nodes[ix as usize] = node; ix }
      else { self.nodes.push(node); (self.nodes.len() - 1) as u32 };
      self.dead += 1; // fresh nodes are dead until referenced
      self.uniq.insert((var, hi, lo), ix);
      ix };
    Edge::new(ix).inv_if(inv) }

  /// increment the refcount behind an edge (resurrecting a dead node).
  #[inline] fn bump(&mut self, e: Edge) {
    if e.is_const() { return }
    let n = &mut self.nodes[e.idx()];
    n.rc += 1;
    if n.rc == 1 { self.dead -= 1 }}

  #[inline] fn drop_rc(&mut self, e: Edge) {
    if e.is_const() { return }
    let n = &mut self.nodes[e.idx()];
    debug_assert!(n.rc > 0, "deref of unreferenced node");
    n.rc -= 1;
    if n.rc == 0 { self.dead += 1 }}

  /// take an external strong reference on `e`.
  pub fn refer(&mut self, e: Edge) { self.bump(e) }

  /// release an external strong reference on `e`.
  pub fn deref(&mut self, e: Edge) { self.drop_rc(e) }

  /// reclaim every dead node. edges not protected by a refcount become
  /// invalid; the computed cache is flushed.
  pub fn gc(&mut self)->usize {
    if self.dead == 0 { return 0 }
    let mut swept = 0;
    // removing a dead node releases its children, which may die in turn
    loop {
      let dead_ixs: Vec<u32> = (1..self.nodes.len() as u32)
        .filter(|&ix| self.nodes[ix as usize].rc == 0
                && self.nodes[ix as usize].var != u32::MAX)
        .collect();
      if dead_ixs.is_empty() { break }
      for ix in dead_ixs {
        let Node { var, hi, lo, .. } = self.nodes[ix as usize];
        self.uniq.remove(&(var, hi, lo));
        self.nodes[ix as usize] = Node { var: u32::MAX, hi: I, lo: I, rc: 0 };
        self.free.push(ix);
        self.dead -= 1;
        swept += 1;
        self.drop_rc(hi);
        self.drop_rc(lo); }}
    self.cache.clear();
    debug_assert_eq!(self.dead, 0);
    trace!("gc swept={}", swept);
    swept }

  pub(crate) fn cache_clear(&mut self) { self.cache.clear() }

  #[inline] fn cache_put(&mut self, k: CacheKey, v: Edge) {
    if self.cache.len() >= self.cache_cap { self.cache.clear() }
    self.cache.insert(k, v); }

  pub(crate) fn maybe_reorder(&mut self) {
    if let Some(m) = self.autodyn {
      if self.live() >= self.reorder_at {
        self.reduce_heap(m, 1.2);
        self.reorder_at = 2 * self.live().max(2048); }}}

  // --- node constructors -------------------------------------------------

  /// the projection function of variable `i` (allocating it if needed).
  /// Projection nodes carry a permanent reference so they survive GC.
  pub fn ith_var(&mut self, i: u32)->Edge {
    while (i as usize) >= self.num_vars() { self.new_var(); }
    let e = self.make(i, I, O);
    if self.node(e).rc == 0 { self.bump(e); }
    e }

  /// choose the normal form for an ITE triple. Algorithm from
  /// "Efficient Implementation of a BDD Package" (Brace/Rudell/Bryant),
  /// with (level, index) as the argument ordering.
  fn norm(&self, f0: Edge, g0: Edge, h0: Edge)->Norm {
    let (mut f, mut g, mut h) = (f0, g0, h0);
    loop {
      if f.is_const() { return Norm::Done(if f == I { g } else { h }) }
      if g == h { return Norm::Done(g) }
      if g == f { if h.is_const() {
                  return Norm::Done(if h == I { I } else { f }) }
                  else { g = I }}
      else if g.is_const() && h.is_const() { // both const, g != h
        return if g == I { Norm::Done(f) } else { Norm::Done(!f) }}
      else {
        let nf = !f;
        if      g == nf { g = O }
        else if h == nf { h = I }
        else if h == f  { h = O }
        else {
          let (fl, fi) = (self.level(f), f.idx());
          macro_rules! above { ($x:expr) => {
            { let xl = self.level($x); xl < fl || (xl == fl && $x.idx() < fi) }}}
          if g.is_const() && above!(h) {
            if g == I { g = f;  f = h;  h = g;  g = I; }
            else      { f = !h; g = O;  h = nf; }}
          else if h.is_const() && above!(g) {
            if h == I { f = !g; g = nf; h = I; }
            else      { h = f;  f = g;  g = h;  h = O; }}
          else {
            let ng = !g;
            if h == ng && above!(g) { h = f; f = g; g = h; h = nf; }
            // choose the form whose first two slots are not inverted:
            // from { (f,g,h), (!f,h,g), !(f,!g,!h), !(!f,!h,!g) }
            else if f.is_inv() { f = g; g = h; h = f; f = nf; }
            else if g.is_inv() { return match self.norm(f, ng, !h) {
              Norm::Done(e) => Norm::Done(!e),
              Norm::NotKey(k) => Norm::Key(k),
              Norm::Key(k) => Norm::NotKey(k) }}
            else { return Norm::Key(IteKey { f, g, h }) }}}}}}

  fn ite_rec(&mut self, f: Edge, g: Edge, h: Edge, lim: &mut Limits)->Option<Edge> {
    let (key, inv) = match self.norm(f, g, h) {
      Norm::Done(e) => return Some(e),
      Norm::Key(k) => (k, false),
      Norm::NotKey(k) => (k, true) };
    let ck = (Op::Ite, key.f, key.g, key.h);
    if let Some(&r) = self.cache.get(&ck) { return Some(r.inv_if(inv)) }
    lim.step(self.allocated())?;
    let (f, g, h) = (key.f, key.g, key.h);
    let lvl = self.level(f).min(self.level(g)).min(self.level(h));
    let v = self.invperm[lvl as usize];
    let (ft, fe) = self.cofs_at(f, lvl);
    let (gt, ge) = self.cofs_at(g, lvl);
    let (ht, he) = self.cofs_at(h, lvl);
    let t = self.ite_rec(ft, gt, ht, lim)?;
    let e = self.ite_rec(fe, ge, he, lim)?;
    let r = self.make(v, t, e);
    self.cache_put(ck, r);
    Some(r.inv_if(inv)) }

  // unbounded ITE for internal use: never reorders mid-recursion.
  pub(crate) fn ite_u(&mut self, f: Edge, g: Edge, h: Edge)->Edge {
    self.ite_rec(f, g, h, &mut Limits::none())
      .expect("unbounded ite cannot cross a limit") }

  /// all-purpose connective; unbounded. With autodyn enabled, entry to a
  /// public connective may trigger reordering, so callers must hold
  /// references on every edge they keep across calls.
  pub fn ite(&mut self, f: Edge, g: Edge, h: Edge)->Edge {
    self.maybe_reorder();
    self.ite_u(f, g, h) }

  /// bounded ITE; `None` when the budget was crossed.
  pub fn ite_lim(&mut self, f: Edge, g: Edge, h: Edge, lim: &mut Limits)->Option<Edge> {
    self.ite_rec(f, g, h, lim) }

  pub fn and(&mut self, x: Edge, y: Edge)->Edge { self.ite(x, y, O) }
  pub fn or(&mut self, x: Edge, y: Edge)->Edge { self.ite(x, I, y) }
  pub fn xor(&mut self, x: Edge, y: Edge)->Edge { self.ite(x, !y, y) }

  /// AND that gives up once more than `cap` nodes are allocated.
  pub fn and_limit(&mut self, x: Edge, y: Edge, cap: usize)->Option<Edge> {
    self.ite_rec(x, y, O, &mut Limits::cap(cap)) }

  // --- abstraction -------------------------------------------------------

  /// existentially quantify the variables of `cube` out of `f`.
  pub fn exist_abstract(&mut self, f: Edge, cube: Edge, lim: &mut Limits)->Option<Edge> {
    debug_assert!(self.is_cube(cube));
    self.exist_rec(f, cube, lim) }

  fn exist_rec(&mut self, f: Edge, cube: Edge, lim: &mut Limits)->Option<Edge> {
    if f.is_const() || cube == I { return Some(f) }
    // skip cube variables above the top of f
    let mut c = cube;
    while !c.is_const() && self.level(c) < self.level(f) {
      let (chi, clo) = self.cofs(c);
      c = if chi == O { clo } else { chi }}
    if c == I { return Some(f) }
    let ck = (Op::Exist, f, c, I);
    if let Some(&r) = self.cache.get(&ck) { return Some(r) }
    lim.step(self.allocated())?;
    let lvl = self.level(f);
    let v = self.invperm[lvl as usize];
    let (ft, fe) = self.cofs(f);
    let at_top = self.level(c) == lvl;
    let cnext = if at_top {
      let (chi, clo) = self.cofs(c);
      if chi == O { clo } else { chi }}
      else { c };
    let t = self.exist_rec(ft, cnext, lim)?;
    let e = self.exist_rec(fe, cnext, lim)?;
    let r = if at_top { self.ite_rec(t, I, e, lim)? } else { self.make(v, t, e) };
    self.cache_put(ck, r);
    Some(r) }

  /// compute `exists vars(cube). f & g` in one pass.
  pub fn and_abstract(&mut self, f: Edge, g: Edge, cube: Edge, lim: &mut Limits)->Option<Edge> {
    debug_assert!(self.is_cube(cube));
    self.and_abs_rec(f, g, cube, lim) }

  fn and_abs_rec(&mut self, f0: Edge, g0: Edge, cube: Edge, lim: &mut Limits)->Option<Edge> {
    let (f, g) = if f0.idx() <= g0.idx() { (f0, g0) } else { (g0, f0) };
    if f == O || g == O || f == !g { return Some(O) }
    if f == I && g == I { return Some(I) }
    if cube == I { return self.ite_rec(f, g, O, lim) }
    if f == I || f == g { return self.exist_rec(g, cube, lim) }
    if g == I { return self.exist_rec(f, cube, lim) }
    let lvl = self.level(f).min(self.level(g));
    let mut c = cube;
    while !c.is_const() && self.level(c) < lvl {
      let (chi, clo) = self.cofs(c);
      c = if chi == O { clo } else { chi }}
    if c == I { return self.ite_rec(f, g, O, lim) }
    let ck = (Op::AndAbs, f, g, c);
    if let Some(&r) = self.cache.get(&ck) { return Some(r) }
    lim.step(self.allocated())?;
    let v = self.invperm[lvl as usize];
    let (ft, fe) = self.cofs_at(f, lvl);
    let (gt, ge) = self.cofs_at(g, lvl);
    let at_top = self.level(c) == lvl;
    let cnext = if at_top {
      let (chi, clo) = self.cofs(c);
      if chi == O { clo } else { chi }}
      else { c };
    let t = self.and_abs_rec(ft, gt, cnext, lim)?;
    let e = self.and_abs_rec(fe, ge, cnext, lim)?;
    let r = if at_top { self.ite_rec(t, I, e, lim)? } else { self.make(v, t, e) };
    self.cache_put(ck, r);
    Some(r) }

  // --- reshaping ---------------------------------------------------------

  /// cofactor of `f` with respect to a cube of literals.
  pub fn cofactor(&mut self, f: Edge, cube: Edge)->Edge {
    debug_assert!(self.is_cube(cube));
    self.cof_rec(f, cube) }

  fn cof_rec(&mut self, f: Edge, c: Edge)->Edge {
    if c == I || f.is_const() { return f }
    let ck = (Op::Cof, f, c, I);
    if let Some(&r) = self.cache.get(&ck) { return r }
    let (lf, lc) = (self.level(f), self.level(c));
    let r = if lc < lf {
      // f does not depend on the cube's top literal
      let (chi, clo) = self.cofs(c);
      self.cof_rec(f, if chi == O { clo } else { chi }) }
    else if lc == lf {
      let (chi, clo) = self.cofs(c);
      let (ft, fe) = self.cofs(f);
      if chi == O { self.cof_rec(fe, clo) } else { self.cof_rec(ft, chi) }}
    else {
      let v = self.invperm[lf as usize];
      let (ft, fe) = self.cofs(f);
      let t = self.cof_rec(ft, c);
      let e = self.cof_rec(fe, c);
      self.make(v, t, e) };
    self.cache_put(ck, r);
    r }

  /// Coudert-Madre restrict: a function equal to `f` wherever `care`
  /// holds, usually smaller than `f`.
  pub fn restrict(&mut self, f: Edge, care: Edge)->Edge {
    if care == O { return f }
    self.restrict_rec(f, care) }

  fn restrict_rec(&mut self, f: Edge, c: Edge)->Edge {
    if c == I || f.is_const() { return f }
    if f == c { return I }
    if f == !c { return O }
    let ck = (Op::Restrict, f, c, I);
    if let Some(&r) = self.cache.get(&ck) { return r }
    let (lf, lc) = (self.level(f), self.level(c));
    let r = if lc < lf {
      let (chi, clo) = self.cofs(c);
      let cq = self.ite_u(chi, I, clo); // abstract the top var of the care set
      self.restrict_rec(f, cq) }
    else {
      let v = self.invperm[lf as usize];
      let (ft, fe) = self.cofs(f);
      let (ct, ce) = self.cofs_at(c, lf);
      if ce == O { self.restrict_rec(ft, ct) }
      else if ct == O { self.restrict_rec(fe, ce) }
      else {
        let t = self.restrict_rec(ft, ct);
        let e = self.restrict_rec(fe, ce);
        self.make(v, t, e) }};
    self.cache_put(ck, r);
    r }

  /// rebuild `f` with every variable `v` replaced by `map[v]`.
  pub fn permute(&mut self, f: Edge, map: &[u32])->Edge {
    let mut memo: FxHashMap<Edge, Edge> = FxHashMap::default();
    self.permute_rec(f, map, &mut memo) }

  fn permute_rec(&mut self, f: Edge, map: &[u32], memo: &mut FxHashMap<Edge, Edge>)->Edge {
    if f.is_const() { return f }
    if let Some(&r) = memo.get(&f.raw()) { return r.inv_if(f.is_inv()) }
    let n = *self.node(f.raw());
    let t = self.permute_rec(n.hi, map, memo);
    let e = self.permute_rec(n.lo, map, memo);
    let nv = self.ith_var(map[n.var as usize]);
    let r = self.ite_u(nv, t, e);
    memo.insert(f.raw(), r);
    r.inv_if(f.is_inv()) }

  /// copy `f` from another manager into this one (same variable ids).
  pub fn transfer(&mut self, src: &Dd, f: Edge)->Edge {
    let mut memo: FxHashMap<Edge, Edge> = FxHashMap::default();
    self.transfer_rec(src, f, None, &mut memo, &mut Limits::none())
      .expect("unbounded transfer cannot cross a limit") }

  /// copy `f` under a variable permutation, giving up at the deadline.
  pub fn transfer_permute_time(&mut self, src: &Dd, f: Edge, map: &[u32],
                               lim: &mut Limits)->Option<Edge> {
    let mut memo: FxHashMap<Edge, Edge> = FxHashMap::default();
    self.transfer_rec(src, f, Some(map), &mut memo, lim) }

  fn transfer_rec(&mut self, src: &Dd, f: Edge, map: Option<&[u32]>,
                  memo: &mut FxHashMap<Edge, Edge>, lim: &mut Limits)->Option<Edge> {
    if f.is_const() { return Some(f) }
    if let Some(&r) = memo.get(&f.raw()) { return Some(r.inv_if(f.is_inv())) }
    lim.step(self.allocated())?;
    let n = *src.node(f.raw());
    let t = self.transfer_rec(src, n.hi, map, memo, lim)?;
    let e = self.transfer_rec(src, n.lo, map, memo, lim)?;
    let var = map.map_or(n.var, |m| m[n.var as usize]);
    let nv = self.ith_var(var);
    let r = self.ite_rec(nv, t, e, lim)?;
    memo.insert(f.raw(), r);
    Some(r.inv_if(f.is_inv())) }

  // --- queries -----------------------------------------------------------

  /// is `e` a product of literals?
  pub fn is_cube(&self, e: Edge)->bool {
    let mut c = e;
    if c == O { return false }
    while !c.is_const() {
      let (hi, lo) = self.cofs(c);
      if lo == O { c = hi }
      else if hi == O { c = lo }
      else { return false }}
    c == I }

  /// build the cube of the given literals.
  pub fn cube(&mut self, lits: &[(u32, bool)])->Edge {
    let mut r = I;
    // build bottom-up so each make() sees children below it
    let mut sorted: Vec<(u32, bool)> = lits.to_vec();
    sorted.sort_by_key(|&(v, _)| std::cmp::Reverse(self.perm[v as usize]));
    for &(v, pos) in &sorted {
      r = if pos { self.make(v, r, O) } else { self.make(v, O, r) }}
    r }

  /// number of distinct internal nodes reachable from `e`.
  pub fn count_nodes(&self, e: Edge)->usize {
    let mut seen = FxHashSet::default();
    self.count_rec(e, &mut seen);
    seen.len() }

  /// number of distinct internal nodes reachable from any of `es`.
  pub fn count_nodes_multi(&self, es: &[Edge])->usize {
    let mut seen = FxHashSet::default();
    for &e in es { self.count_rec(e, &mut seen); }
    seen.len() }

  fn count_rec(&self, e: Edge, seen: &mut FxHashSet<u32>) {
    if e.is_const() || !seen.insert(e.idx() as u32) { return }
    let n = self.node(e);
    self.count_rec(n.hi, seen);
    self.count_rec(n.lo, seen); }

  /// number of minterms of `e` over `nvars` variables.
  pub fn count_minterm(&self, e: Edge, nvars: usize)->f64 {
    let mut memo: FxHashMap<Edge, f64> = FxHashMap::default();
    self.fraction(e, &mut memo) * (nvars as f64).exp2() }

  // fraction of the input space on which the (regular-keyed) function holds
  fn fraction(&self, e: Edge, memo: &mut FxHashMap<Edge, f64>)->f64 {
    if e == I { return 1.0 }
    if e == O { return 0.0 }
    let raw = e.raw();
    let f = if let Some(&f) = memo.get(&raw) { f }
    else {
      let n = self.node(raw);
      let f = 0.5 * self.fraction(n.hi, memo) + 0.5 * self.fraction(n.lo, memo);
      memo.insert(raw, f);
      f };
    if e.is_inv() { 1.0 - f } else { f }}

  /// the set of variables `e` depends on, ascending by variable id.
  pub fn support(&self, e: Edge)->Vec<u32> {
    let mut vars = FxHashSet::default();
    let mut seen = FxHashSet::default();
    self.support_rec(e, &mut vars, &mut seen);
    let mut r: Vec<u32> = vars.into_iter().collect();
    r.sort_unstable();
    r }

  fn support_rec(&self, e: Edge, vars: &mut FxHashSet<u32>, seen: &mut FxHashSet<u32>) {
    if e.is_const() || !seen.insert(e.idx() as u32) { return }
    let n = self.node(e);
    vars.insert(n.var);
    self.support_rec(n.hi, vars, seen);
    self.support_rec(n.lo, vars, seen); }

  /// evaluate `e` under the given assignment (indexed by variable id).
  pub fn eval(&self, e: Edge, assign: &[bool])->bool {
    let mut cur = e;
    while !cur.is_const() {
      let n = self.node(cur.raw());
      let child = if assign[n.var as usize] { n.hi } else { n.lo };
      cur = child.inv_if(cur.is_inv()); }
    cur == I }}

include!("test-dd.rs");
