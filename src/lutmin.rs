//! BDD-to-MUX conversion and K-LUT decomposition.
//!
//! `bdd_to_mux` expands each BDD-carrying node into a tree of 3-input
//! MUX nodes, one per distinct DD node, with complement edges becoming
//! shared inverters. `lutmin` decomposes a collapsed network into K-LUTs
//! (K in 4..=6) by cofactoring, Ashenhurst-Curtis column-multiplicity
//! encoding, or a 4-cofactor MUX split, iterating until every node fits.
use fxhash::FxHashMap;
use crate::dd::{Dd, Limits};
use crate::edge::{Edge, I, O};
use crate::err::Result;
use crate::collapse::{collapse, CollapseParams};
use crate::net::{Func, Net, NetType, ObjId};
use crate::sop;

// cover of MUX(c, t, e) over fanins (c, t, e)
const MUX_COVER: &str = "11- 1\n0-1 1\n";

/// convert a Logic-BDD network into a Logic-SOP network of 3-input MUX
/// nodes and inverters, sharing one MUX per distinct DD node.
pub fn bdd_to_mux(src: &mut Net)->Result<Net> {
  assert_eq!(src.ty, NetType::LogicBdd);
  let mut dst = Net::new(&src.name, NetType::LogicSop);
  dst.spec = src.spec.clone();
  let mut copy: FxHashMap<ObjId, (ObjId, bool)> = FxHashMap::default();
  for &pi in &src.pis.clone() {
    let id = dst.add_pi(src.names.get(&pi).map(|s| s.as_str()));
    copy.insert(pi, (id, false)); }
  let order = src.topo_order();
  let dd = src.dd.take().expect("Logic-BDD network without a manager");
  for id in order {
    let f = match src.obj(id).func {
      Func::Bdd(f) => f,
      _ => panic!("node {} of a Logic-BDD network has no BDD", id) };
    let fanins: Vec<(ObjId, bool)> = src.obj(id).fanins.iter()
      .map(|fi| { let (o, c) = copy[&fi.id]; (o, c ^ fi.compl) }).collect();
    let mut memo: FxHashMap<Edge, ObjId> = FxHashMap::default();
    let lit = mux_rec(&mut dst, &dd, f, &fanins, &mut memo);
    copy.insert(id, lit); }
  src.dd = Some(dd);
  for &po in &src.pos.clone() {
    let fi = src.obj(po).fanins[0];
    let (o, c) = copy[&fi.id];
    let id = dst.add_po(src.names.get(&po).map(|s| s.as_str()));
    let (o, c) = materialize(&mut dst, (o, c ^ fi.compl));
    debug_assert!(!c);
    dst.add_fanin(id, o, false); }
  dst.check()?;
  Ok(dst) }

// build one MUX node per DD node; the bool half of the pair is a
// pending complement, realized as an inverter only where needed
fn mux_rec(dst: &mut Net, dd: &Dd, f: Edge, fanins: &[(ObjId, bool)],
           memo: &mut FxHashMap<Edge, ObjId>)->(ObjId, bool) {
  if f == I || f == O {
    let n = dst.add_node();
    let s = if f == I { sop::create_const1() } else { sop::create_const0() };
    let sid = dst.arena.register(&s);
    dst.obj_mut(n).func = Func::Sop(sid);
    return (n, false) }
  if let Some(&n) = memo.get(&f.raw()) { return (n, f.is_inv()) }
  let v = dd.var(f.raw());
  let (hi, lo) = dd.cofs(f.raw());
  let t = mux_rec(dst, dd, hi, fanins, memo);
  let e = mux_rec(dst, dd, lo, fanins, memo);
  let n = dst.add_node();
  let c = fanins[v as usize];
  let (co, cc) = materialize(dst, c);
  let (to, tc) = materialize(dst, t);
  let (eo, ec) = materialize(dst, e);
  debug_assert!(!cc && !tc && !ec);
  dst.add_fanin(n, co, false);
  dst.add_fanin(n, to, false);
  dst.add_fanin(n, eo, false);
  let sid = dst.arena.register(MUX_COVER);
  dst.obj_mut(n).func = Func::Sop(sid);
  memo.insert(f.raw(), n);
  (n, f.is_inv()) }

// realize a pending complement as an inverter node (shared per object)
fn materialize(dst: &mut Net, lit: (ObjId, bool))->(ObjId, bool) {
  let (o, c) = lit;
  if !c { return (o, false) }
  if dst.obj(o).copy >= 0 { return (dst.obj(o).copy as ObjId, false) }
  let inv = dst.add_node();
  dst.add_fanin(inv, o, false);
  let sid = dst.arena.register(&sop::create_buf(true));
  dst.obj_mut(inv).func = Func::Sop(sid);
  dst.obj_mut(o).copy = inv as i64;
  (inv, false) }

// --- K-LUT decomposition ---------------------------------------------------

/// decompose the network into K-LUTs (K in 4..=6): collapse, then run
/// whole-network decomposition passes until the maximum fanin count is
/// at most K. The result is a Logic-BDD network of LUT-sized nodes.
pub fn lutmin(net: &mut Net, k: usize, verbose: bool)->Result<Net> {
  assert!((4..=6).contains(&k), "lutmin supports K in 4..=6");
  let cp = CollapseParams { to_sop: false, verbose, ..Default::default() };
  let mut cur = collapse(net, &cp)?;
  let mut pass = 0;
  loop {
    let worst = cur.node_ids().iter()
      .map(|&id| cur.obj(id).fanins.len()).max().unwrap_or(0);
    if worst <= k { break }
    pass += 1;
    if verbose { info!("lutmin pass={} worst_fanin={}", pass, worst); }
    cur = decompose_pass(&mut cur, k, verbose)?;
    cur.minimum_base(); }
  cur.check()?;
  if verbose { info!("lutmin done nodes={} k={}", cur.n_nodes(), k); }
  Ok(cur) }

// one whole-network pass: copy small nodes, decompose wide ones
fn decompose_pass(src: &mut Net, k: usize, verbose: bool)->Result<Net> {
  let mut dst = Net::new(&src.name, NetType::LogicBdd);
  dst.spec = src.spec.clone();
  dst.dd = Some(Dd::new(16));
  let mut copy: FxHashMap<ObjId, ObjId> = FxHashMap::default();
  for &pi in &src.pis.clone() {
    let id = dst.add_pi(src.names.get(&pi).map(|s| s.as_str()));
    copy.insert(pi, id); }
  let order = src.topo_order();
  let mut sdd = src.dd.take().expect("Logic-BDD network without a manager");
  for id in order {
    let f = match src.obj(id).func {
      Func::Bdd(f) => f,
      _ => panic!("node {} carries no BDD", id) };
    let fan_objs: Vec<ObjId> = src.obj(id).fanins.iter()
      .map(|fi| { debug_assert!(!fi.compl); copy[&fi.id] }).collect();
    let new = if fan_objs.len() <= k {
      let node = dst.add_node();
      let ddn = dst.dd.as_mut().expect("fresh manager");
      let g = ddn.transfer(&sdd, f);
      ddn.refer(g);
      for &fo in &fan_objs { dst.add_fanin(node, fo, false); }
      dst.obj_mut(node).func = Func::Bdd(g);
      node }
    else {
      decompose_node(&mut dst, &mut sdd, f, &fan_objs, k, verbose)? };
    copy.insert(id, new); }
  src.dd = Some(sdd);
  for &po in &src.pos.clone() {
    let fi = src.obj(po).fanins[0];
    let id = dst.add_po(src.names.get(&po).map(|s| s.as_str()));
    dst.add_fanin(id, copy[&fi.id], fi.compl); }
  Ok(dst) }

// all 2^lvls cofactors of f over variables 0..lvls (bit i of the index
// assigns variable i)
fn bdd_cofactors(dd: &mut Dd, f: Edge, lvls: usize)->Vec<Edge> {
  let mut cofs = vec![f];
  for v in 0..lvls {
    let var = dd.ith_var(v as u32);
    let mut out = vec![O; cofs.len() * 2];
    for (m, &c) in cofs.iter().enumerate() {
      out[m] = dd.cofactor(c, !var);
      out[m | (1 << v)] = dd.cofactor(c, var); }
    cofs = out; }
  cofs }

/// decompose one wide node into LUT-sized pieces, returning the object
/// that now computes it.
fn decompose_node(dst: &mut Net, sdd: &mut Dd, f: Edge, fanins: &[ObjId],
                  k: usize, verbose: bool)->Result<ObjId> {
  let nf = fanins.len();
  debug_assert!(nf > k);
  // the best case: support K+1 splits into two LUTs around one MUX
  if nf == k + 1 {
    if let Some(id) = try_cofactor_mux(dst, sdd, f, fanins, k) {
      if verbose { debug!("decompose {}-input node via cofactor MUX", nf); }
      return Ok(id) }}
  let cofs = bdd_cofactors(sdd, f, k);
  let mut uniq: Vec<Edge> = cofs.clone();
  uniq.sort_unstable();
  uniq.dedup();
  if uniq.len() <= 1 << (k - 2) {
    if verbose {
      debug!("decompose {}-input node via Curtis, {} columns", nf, uniq.len()); }
    curtis(dst, sdd, fanins, &cofs, &uniq, k) }
  else {
    if verbose { debug!("decompose {}-input node via 4-cofactor split", nf); }
    four_cofactor_split(dst, sdd, f, fanins, k) }}

// one variable whose small cofactor frees enough support: build the big
// cofactor as its own LUT and absorb the small one into a MUX LUT
fn try_cofactor_mux(dst: &mut Net, sdd: &mut Dd, f: Edge, fanins: &[ObjId],
                    k: usize)->Option<ObjId> {
  let nf = fanins.len();
  // pick the variable whose fitting cofactor has minimum support,
  // breaking ties by ascending variable
  let mut pick: Option<(usize, usize, bool, Edge, Edge)> = None;
  for i in 0..nf {
    let var = sdd.ith_var(i as u32);
    let c0 = sdd.cofactor(f, !var);
    let c1 = sdd.cofactor(f, var);
    let (s0, s1) = (sdd.support(c0).len(), sdd.support(c1).len());
    for (s, one) in [(s0, false), (s1, true)] {
      if s <= k - 2 && pick.map_or(true, |(bs, ..)| s < bs) {
        pick = Some((s, i, one, c0, c1)); }}}
  let (_, icof, one_small, c0, c1) = pick?;
  let small = if one_small { c1 } else { c0 };
  let big = if one_small { c0 } else { c1 };
  let small_supp = sdd.support(small);
  // a variable absent from the small cofactor carries the bottom LUT
  let yfree = (0..nf)
    .find(|&i| i != icof && !small_supp.contains(&(i as u32)))?;

  let ddn_map: Vec<u32> = (0..nf as u32).collect();
  // bottom LUT: the big cofactor over the original fanins
  let bot = dst.add_node();
  for &fo in fanins { dst.add_fanin(bot, fo, false); }
  {
    let ddn = dst.dd.as_mut().expect("manager");
    let g = ddn.transfer_permute_time(sdd, big, &ddn_map, &mut Limits::none())
      .expect("unbounded transfer cannot fail");
    ddn.refer(g);
    dst.obj_mut(bot).func = Func::Bdd(g); }
  // top LUT: MUX of the small cofactor and the bottom output, wired
  // into the free variable's slot
  let top = dst.add_node();
  for (i, &fo) in fanins.iter().enumerate() {
    if i == yfree { dst.add_fanin(top, bot, false); }
    else { dst.add_fanin(top, fo, false); }}
  let g = {
    let small_t = {
      let ddn = dst.dd.as_mut().expect("manager");
      ddn.transfer_permute_time(sdd, small, &ddn_map, &mut Limits::none())
        .expect("unbounded transfer cannot fail") };
    let ddn = dst.dd.as_mut().expect("manager");
    let c = ddn.ith_var(icof as u32);
    let y = ddn.ith_var(yfree as u32);
    let (t, e) = if one_small { (small_t, y) } else { (y, small_t) };
    let g = ddn.ite(c, t, e);
    ddn.refer(g);
    g };
  dst.obj_mut(top).func = Func::Bdd(g);
  Some(top) }

// Ashenhurst-Curtis: encode the distinct bound-set columns in
// ceil(log2(mu)) rail bits, one bound LUT per bit, and compose them
// with the free variables
fn curtis(dst: &mut Net, sdd: &mut Dd, fanins: &[ObjId],
          cofs: &[Edge], uniq: &[Edge], k: usize)->Result<ObjId> {
  let nf = fanins.len();
  let nbits = ceil_log2(uniq.len());
  debug_assert!(nbits + 2 <= k);
  // bound nodes: bit b of the column code, as a function of the bound set
  let mut bound_nodes = Vec::with_capacity(nbits);
  for b in 0..nbits {
    let mut gb = O;
    {
      let ddn = dst.dd.as_mut().expect("manager");
      for (c, cof) in cofs.iter().enumerate() {
        let u = uniq.iter().position(|x| x == cof).expect("column not found");
        if (u >> b) & 1 == 0 { continue }
        let lits: Vec<(u32, bool)> = (0..k as u32)
          .map(|i| (i, (c >> i) & 1 == 1)).collect();
        let mint = ddn.cube(&lits);
        gb = ddn.or(gb, mint); }
      ddn.refer(gb); }
    let node = dst.add_node();
    for &fo in fanins.iter().take(k) { dst.add_fanin(node, fo, false); }
    dst.obj_mut(node).func = Func::Bdd(gb);
    bound_nodes.push(node); }
  // composition node over (free vars, code bits)
  let comp = dst.add_node();
  for &fo in fanins.iter().skip(k) { dst.add_fanin(comp, fo, false); }
  for &b in &bound_nodes { dst.add_fanin(comp, b, false); }
  // free variable i+k of the original lands at position i
  let shift: Vec<u32> = (0..nf as u32)
    .map(|v| if v >= k as u32 { v - k as u32 } else { v }).collect();
  let mut gf = O;
  for (u, &col) in uniq.iter().enumerate() {
    let colf = {
      let ddn = dst.dd.as_mut().expect("manager");
      ddn.transfer_permute_time(sdd, col, &shift, &mut Limits::none())
        .expect("unbounded transfer cannot fail") };
    let ddn = dst.dd.as_mut().expect("manager");
    let code_lits: Vec<(u32, bool)> = (0..nbits as u32)
      .map(|b| ((nf - k) as u32 + b, (u >> b) & 1 == 1)).collect();
    let code = ddn.cube(&code_lits);
    let term = ddn.and(code, colf);
    gf = ddn.or(gf, term); }
  let ddn = dst.dd.as_mut().expect("manager");
  ddn.refer(gf);
  dst.obj_mut(comp).func = Func::Bdd(gf);
  Ok(comp) }

// split on the top two variables and recombine the four cofactors with
// the K-specific MUX topology
fn four_cofactor_split(dst: &mut Net, sdd: &mut Dd, f: Edge, fanins: &[ObjId],
                       k: usize)->Result<ObjId> {
  let nf = fanins.len();
  let cofs = bdd_cofactors(sdd, f, 2);
  // each cofactor becomes a LUT over the remaining fanins, variables
  // shifted down over the two split positions
  let shift: Vec<u32> = (0..nf as u32)
    .map(|v| if v >= 2 { v - 2 } else { v }).collect();
  let mut dnodes = Vec::with_capacity(4);
  for &cof in &cofs {
    let node = dst.add_node();
    for &fo in fanins.iter().skip(2) { dst.add_fanin(node, fo, false); }
    let g = {
      let ddn = dst.dd.as_mut().expect("manager");
      ddn.transfer_permute_time(sdd, cof, &shift, &mut Limits::none())
        .expect("unbounded transfer cannot fail") };
    let ddn = dst.dd.as_mut().expect("manager");
    ddn.refer(g);
    dst.obj_mut(node).func = Func::Bdd(g);
    dnodes.push(node); }
  // cofactor order: index bit 0 assigns fanin 0, bit 1 assigns fanin 1
  let pf = [fanins[0], fanins[1], dnodes[0], dnodes[2], dnodes[1], dnodes[3]];
  Ok(match k {
    4 => mux412(dst, &pf),
    5 => mux412a(dst, &pf),
    6 => mux411(dst, &pf),
    _ => unreachable!("lutmin K is 4..=6") }) }

// 4:1 MUX in a single 6-LUT; fanins (c0, c1, d00, d01, d10, d11)
fn mux411(dst: &mut Net, pf: &[ObjId; 6])->ObjId {
  let node = dst.add_node();
  for &fo in pf { dst.add_fanin(node, fo, false); }
  let ddn = dst.dd.as_mut().expect("manager");
  let (v0, v1) = (ddn.ith_var(0), ddn.ith_var(1));
  let (d00, d01, d10, d11) =
    (ddn.ith_var(2), ddn.ith_var(3), ddn.ith_var(4), ddn.ith_var(5));
  let c0f = ddn.ite(v1, d01, d00);
  let c1f = ddn.ite(v1, d11, d10);
  let g = ddn.ite(v0, c1f, c0f);
  ddn.refer(g);
  dst.obj_mut(node).func = Func::Bdd(g);
  node }

// 4:1 MUX with two 4-LUTs; the bottom LUT passes c1 through when c0=1
fn mux412(dst: &mut Net, pf: &[ObjId; 6])->ObjId {
  let bot = dst.add_node();
  for &fo in &pf[0..4] { dst.add_fanin(bot, fo, false); }
  {
    let ddn = dst.dd.as_mut().expect("manager");
    let (v0, v1, d00, d01) =
      (ddn.ith_var(0), ddn.ith_var(1), ddn.ith_var(2), ddn.ith_var(3));
    let sel = ddn.ite(v1, d01, d00);
    let g = ddn.ite(v0, v1, sel);
    ddn.refer(g);
    dst.obj_mut(bot).func = Func::Bdd(g); }
  let top = dst.add_node();
  dst.add_fanin(top, pf[0], false);
  dst.add_fanin(top, bot, false);
  dst.add_fanin(top, pf[4], false);
  dst.add_fanin(top, pf[5], false);
  let ddn = dst.dd.as_mut().expect("manager");
  let (v0, vb, d10, d11) =
    (ddn.ith_var(0), ddn.ith_var(1), ddn.ith_var(2), ddn.ith_var(3));
  let hi = ddn.ite(vb, d11, d10);
  let g = ddn.ite(v0, hi, vb);
  ddn.refer(g);
  dst.obj_mut(top).func = Func::Bdd(g);
  top }

// 4:1 MUX with a 3-LUT under a 5-LUT
fn mux412a(dst: &mut Net, pf: &[ObjId; 6])->ObjId {
  let bot = dst.add_node();
  dst.add_fanin(bot, pf[1], false);
  dst.add_fanin(bot, pf[2], false);
  dst.add_fanin(bot, pf[3], false);
  {
    let ddn = dst.dd.as_mut().expect("manager");
    let (c1, d00, d01) = (ddn.ith_var(0), ddn.ith_var(1), ddn.ith_var(2));
    let g = ddn.ite(c1, d01, d00);
    ddn.refer(g);
    dst.obj_mut(bot).func = Func::Bdd(g); }
  let top = dst.add_node();
  dst.add_fanin(top, pf[0], false);
  dst.add_fanin(top, pf[1], false);
  dst.add_fanin(top, bot, false);
  dst.add_fanin(top, pf[4], false);
  dst.add_fanin(top, pf[5], false);
  let ddn = dst.dd.as_mut().expect("manager");
  let (v0, c1, vb, d10, d11) =
    (ddn.ith_var(0), ddn.ith_var(1), ddn.ith_var(2), ddn.ith_var(3), ddn.ith_var(4));
  let hi = ddn.ite(c1, d11, d10);
  let g = ddn.ite(v0, hi, vb);
  ddn.refer(g);
  dst.obj_mut(top).func = Func::Bdd(g);
  top }

fn ceil_log2(n: usize)->usize {
  debug_assert!(n > 0);
  (usize::BITS - (n - 1).leading_zeros()) as usize }

include!("test-lutmin.rs");
