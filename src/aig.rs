//! Structural hashing of networks into AND-inverter graphs, plus
//! 64-wide parallel simulation of any network type.
//!
//! In a strashed network the AND nodes are ordinary objects of type
//! `And`; the strash table lives on the network and maps the canonical
//! ordered fanin pair to the node id, so no duplicate ANDs exist.
use fxhash::FxHashMap;
use crate::edge::Edge;
use crate::net::{Fanin, Func, Net, NetType, ObjId, ObjType};
use crate::sop;
use crate::tt;

/// A literal: an object id with a complement bit in the LSB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit(pub u32);

impl Lit {
  pub fn new(id: ObjId, compl: bool)->Lit { Lit(id << 1 | compl as u32) }
  pub fn id(self)->ObjId { self.0 >> 1 }
  pub fn is_compl(self)->bool { self.0 & 1 == 1 }
  pub fn inv_if(self, c: bool)->Lit { if c { !self } else { self }}}

impl std::ops::Not for Lit {
  type Output = Lit;
  fn not(self)->Lit { Lit(self.0 ^ 1) }}

/// the constant-one literal of a strashed network.
pub fn const1(net: &mut Net)->Lit { Lit::new(net.get_const1(), false) }

/// find-or-create the AND of two literals.
pub fn and(net: &mut Net, a: Lit, b: Lit)->Lit {
  let one = const1(net);
  let zero = !one;
  if a == zero || b == zero || a == !b { return zero }
  if a == one { return b }
  if b == one { return a }
  if a == b { return a }
  let (a, b) = if a.id() <= b.id() { (a, b) } else { (b, a) };
  let key = (a.0, b.0);
  if net.strash.is_none() { net.strash = Some(FxHashMap::default()); }
  if let Some(&id) = net.strash.as_ref().unwrap().get(&key) {
    return Lit::new(id, false) }
  let id = net.add_node();
  net.obj_mut(id).ty = ObjType::And;
  net.add_fanin(id, a.id(), a.is_compl());
  net.add_fanin(id, b.id(), b.is_compl());
  net.strash.as_mut().unwrap().insert(key, id);
  Lit::new(id, false) }

pub fn or(net: &mut Net, a: Lit, b: Lit)->Lit { !and(net, !a, !b) }

pub fn xor(net: &mut Net, a: Lit, b: Lit)->Lit {
  let t = and(net, a, !b);
  let e = and(net, !a, b);
  or(net, t, e) }

pub fn mux(net: &mut Net, c: Lit, t: Lit, e: Lit)->Lit {
  let hi = and(net, c, t);
  let lo = and(net, !c, e);
  or(net, hi, lo) }

/// build an AIG literal for a cover over the given fanin literals.
pub fn sop_to_aig(net: &mut Net, cover: &str, fanins: &[Lit])->Lit {
  let one = const1(net);
  if sop::is_const1(cover) { return one }
  if sop::is_const0(cover) { return !one }
  let n = sop::var_count(cover);
  if sop::is_exor_type(cover) {
    let line = cover.lines().next().unwrap_or("");
    let mut f = !one;
    for (i, c) in line.chars().take(n).enumerate() {
      if c == '-' { continue }
      let v = if c == '0' { !fanins[i] } else { fanins[i] };
      f = xor(net, f, v); }
    return if sop::phase(cover) { f } else { !f }}
  let mut sum = !one;
  for line in cover.lines() {
    let mut cube = one;
    for (i, c) in line.chars().take(n).enumerate() {
      match c {
        '1' => cube = and(net, cube, fanins[i]),
        '0' => cube = and(net, cube, !fanins[i]),
        _ => {}}}
    sum = or(net, sum, cube); }
  if sop::phase(cover) { sum } else { !sum }}

/// build an AIG literal for a BDD over the given fanin literals
/// (`fanins[v]` stands for variable `v`).
pub fn bdd_to_aig(net: &mut Net, dd: &crate::dd::Dd, f: Edge, fanins: &[Lit])->Lit {
  let mut memo: FxHashMap<Edge, Lit> = FxHashMap::default();
  bdd_to_aig_rec(net, dd, f, fanins, &mut memo) }

fn bdd_to_aig_rec(net: &mut Net, dd: &crate::dd::Dd, f: Edge, fanins: &[Lit],
                  memo: &mut FxHashMap<Edge, Lit>)->Lit {
  let one = const1(net);
  if f == crate::edge::I { return one }
  if f == crate::edge::O { return !one }
  if let Some(&l) = memo.get(&f.raw()) {
    return if f.is_inv() { !l } else { l }}
  let v = dd.var(f.raw());
  let (hi, lo) = dd.cofs(f.raw());
  let t = bdd_to_aig_rec(net, dd, hi, fanins, memo);
  let e = bdd_to_aig_rec(net, dd, lo, fanins, memo);
  let r = mux(net, fanins[v as usize], t, e);
  memo.insert(f.raw(), r);
  if f.is_inv() { !r } else { r }}

/// structurally hash a logic network into a fresh AIG network. Latches
/// are carried over with their initial values; node functions (covers or
/// BDDs) are expanded into AND/inverter structure.
pub fn strash(src: &mut Net)->Net {
  let mut dst = Net::new(&src.name, NetType::Aig);
  dst.spec = src.spec.clone();
  dst.get_const1();
  // inputs first, preserving order
  for &pi in &src.pis.clone() {
    let id = dst.add_pi(src.names.get(&pi).map(|s| s.as_str()));
    src.obj_mut(pi).copy = Lit::new(id, false).0 as i64; }
  let latches = src.latches.clone();
  for &l in &latches {
    let (li, nl, lo) = dst.add_latch(src.latch_init.get(&l).copied());
    let old_lo = src.obj(l).fanouts[0];
    let old_li = src.obj(l).fanins[0].id;
    src.obj_mut(old_lo).copy = Lit::new(lo, false).0 as i64;
    src.obj_mut(l).copy = nl as i64;
    // latch input hookup happens with the other COs below
    src.obj_mut(old_li).copy = li as i64; }
  // internal nodes in topological order
  let order = src.topo_order();
  for id in order {
    let fanins: Vec<Lit> = src.obj(id).fanins.iter()
      .map(|f| Lit(src.obj(f.id).copy as u32).inv_if(f.compl)).collect();
    let lit = match src.obj(id).func {
      Func::Sop(s) => {
        let cover = src.arena.get(s).to_string();
        sop_to_aig(&mut dst, &cover, &fanins) }
      Func::Bdd(f) => {
        let dd = src.dd.take().expect("Logic-BDD network without a manager");
        let lit = bdd_to_aig(&mut dst, &dd, f, &fanins);
        src.dd = Some(dd);
        lit }
      Func::None => {
        assert_eq!(src.obj(id).ty, ObjType::And, "node {} has no function", id);
        let a = and(&mut dst, fanins[0], fanins[1]);
        a }};
    src.obj_mut(id).copy = lit.0 as i64; }
  // outputs
  for &po in &src.pos.clone() {
    let f = src.obj(po).fanins[0];
    let lit = Lit(src.obj(f.id).copy as u32).inv_if(f.compl);
    let id = dst.add_po(src.names.get(&po).map(|s| s.as_str()));
    dst.add_fanin(id, lit.id(), lit.is_compl()); }
  for &l in &latches {
    let li_old = src.obj(l).fanins[0].id;
    let f = src.obj(li_old).fanins[0];
    let lit = Lit(src.obj(f.id).copy as u32).inv_if(f.compl);
    let li_new = src.obj(li_old).copy as ObjId;
    dst.add_fanin(li_new, lit.id(), lit.is_compl()); }
  debug!("strash nodes={} -> ands={}", src.n_nodes(), dst.n_nodes());
  dst }

// --- simulation ------------------------------------------------------------

/// simulate 64 input patterns at once; `ci_words[i]` holds the values of
/// combinational input `i`. Returns one word per combinational output.
pub fn simulate(net: &Net, ci_words: &[u64])->Vec<u64> {
  let cis = net.cis();
  let cos = net.cos();
  assert_eq!(ci_words.len(), cis.len());
  let mut val = vec![0u64; net.objs.len()];
  if net.const1 != crate::net::NIL { val[net.const1 as usize] = !0u64 }
  for (i, &ci) in cis.iter().enumerate() { val[ci as usize] = ci_words[i] }
  // topological evaluation without touching traversal epochs
  let mut visited = vec![false; net.objs.len()];
  let mut stack: Vec<(ObjId, bool)> = vec![];
  for &co in &cos { stack.push((net.obj(co).fanins[0].id, false)); }
  let mut order = vec![];
  for &ci in &cis { visited[ci as usize] = true }
  if net.const1 != crate::net::NIL { visited[net.const1 as usize] = true }
  while let Some((id, expanded)) = stack.pop() {
    if expanded { order.push(id); continue }
    if visited[id as usize] { continue }
    visited[id as usize] = true;
    stack.push((id, true));
    for f in &net.obj(id).fanins { stack.push((f.id, false)); }}
  for id in order {
    let o = net.obj(id);
    let fin = |k: usize, val: &[u64]| {
      let f: Fanin = o.fanins[k];
      let w = val[f.id as usize];
      if f.compl { !w } else { w }};
    let w = match o.func {
      Func::None => match o.ty {
        ObjType::And => fin(0, &val) & fin(1, &val),
        ObjType::Const1 => !0u64,
        _ => if o.fanins.is_empty() { 0 } else { fin(0, &val) }},
      Func::Sop(s) => {
        let cover = net.arena.get(s);
        let words: Vec<u64> = (0..o.fanins.len()).map(|k| fin(k, &val)).collect();
        sim_cover(cover, &words) }
      Func::Bdd(f) => {
        let dd = net.dd.as_ref().expect("Logic-BDD network without a manager");
        let words: Vec<u64> = (0..o.fanins.len()).map(|k| fin(k, &val)).collect();
        let mut w = 0u64;
        for bit in 0..64 {
          let assign: Vec<bool> = words.iter().map(|x| (x >> bit) & 1 == 1).collect();
          if dd.eval(f, &assign) { w |= 1 << bit }}
        w }};
    val[id as usize] = w; }
  cos.iter().map(|&co| {
    let f = net.obj(co).fanins[0];
    let w = val[f.id as usize];
    if f.compl { !w } else { w }}).collect() }

fn sim_cover(cover: &str, words: &[u64])->u64 {
  if sop::is_const0(cover) { return 0 }
  if sop::is_const1(cover) { return !0u64 }
  let n = sop::var_count(cover);
  let w = if sop::is_exor_type(cover) {
    let line = cover.lines().next().unwrap_or("");
    let mut acc = 0u64;
    for (i, c) in line.chars().take(n).enumerate() {
      match c {
        '1' => acc ^= words[i],
        '0' => acc ^= !words[i],
        _ => {}}}
    acc }
  else {
    let mut sum = 0u64;
    for line in cover.lines() {
      let mut cube = !0u64;
      for (i, c) in line.chars().take(n).enumerate() {
        match c {
          '1' => cube &= words[i],
          '0' => cube &= !words[i],
          _ => {}}}
      sum |= cube; }
    sum };
  if sop::phase(cover) { w } else { !w }}

/// full truth tables of every combinational output over `n <= 16`
/// combinational inputs, word-packed in minterm order.
pub fn truth_tables(net: &Net, n: usize)->Vec<Vec<u64>> {
  assert!(n <= 16, "refusing to enumerate more than 2^16 minterms");
  assert_eq!(net.cis().len(), n);
  let nw = tt::word_num(n);
  let ncos = net.cos().len();
  let mut out = vec![Vec::with_capacity(nw); ncos];
  for w in 0..nw {
    let ci_words: Vec<u64> = (0..n).map(|i| {
      if i < 6 { tt::var(6, i)[0] }
      else if (w >> (i - 6)) & 1 == 1 { !0u64 } else { 0 }}).collect();
    let cow = simulate(net, &ci_words);
    for (k, word) in cow.into_iter().enumerate() { out[k].push(word); }}
  // tables over fewer than 6 inputs stay stretched, matching tt's invariant
  out }

/// do two networks compute the same function on every output?
pub fn equivalent(a: &Net, b: &Net, n: usize)->bool {
  let ta = truth_tables(a, n);
  let tb = truth_tables(b, n);
  if ta.len() != tb.len() { return false }
  if n >= 6 { return ta == tb }
  let mask = (1u64 << (1 << n)) - 1;
  ta.iter().zip(&tb).all(|(x, y)| (x[0] & mask) == (y[0] & mask)) }
