// test suite for BDD-to-MUX and K-LUT decomposition

#[cfg(test)]
use crate::aig::{equivalent, truth_tables};

// a Logic-SOP network computing (a ^ b) & (c ^ d)
#[cfg(test)]
fn xor_and_net()->Net {
  let mut net = Net::new("xa", NetType::LogicSop);
  let pis: Vec<ObjId> = (0..4).map(|_| net.add_pi(None)).collect();
  let x1 = net.add_node();
  net.add_fanin(x1, pis[0], false);
  net.add_fanin(x1, pis[1], false);
  let s = net.arena.register("10 1\n01 1\n");
  net.obj_mut(x1).func = Func::Sop(s);
  let x2 = net.add_node();
  net.add_fanin(x2, pis[2], false);
  net.add_fanin(x2, pis[3], false);
  let s = net.arena.register("10 1\n01 1\n");
  net.obj_mut(x2).func = Func::Sop(s);
  let n = net.add_node();
  net.add_fanin(n, x1, false);
  net.add_fanin(n, x2, false);
  let s = net.arena.register(&sop::create_and(2, None));
  net.obj_mut(n).func = Func::Sop(s);
  let po = net.add_po(None);
  net.add_fanin(po, n, false);
  net.check().unwrap();
  net }

// a single wide node computing the parity of n inputs
#[cfg(test)]
fn parity_net(n: usize)->Net {
  let mut net = Net::new("par", NetType::LogicSop);
  let pis: Vec<ObjId> = (0..n).map(|_| net.add_pi(None)).collect();
  let node = net.add_node();
  for &pi in &pis { net.add_fanin(node, pi, false); }
  let s = net.arena.register(&sop::create_exor(n, false));
  net.obj_mut(node).func = Func::Sop(s);
  let po = net.add_po(None);
  net.add_fanin(po, node, false);
  net.check().unwrap();
  net }

#[test] fn test_bdd_to_mux_collapsed() {
  let mut net = xor_and_net();
  let mut clp = crate::collapse::collapse(&mut net, &CollapseParams {
    to_sop: false, ..Default::default() }).unwrap();
  assert_eq!(clp.ty, NetType::LogicBdd);
  let muxes = bdd_to_mux(&mut clp).unwrap();
  assert!(equivalent(&net, &muxes, 4));
  // one MUX per distinct DD node of the collapsed function
  let f = match clp.obj(clp.node_ids()[0]).func {
    Func::Bdd(f) => f, _ => panic!("collapsed node lost its BDD") };
  let dd = clp.dd.as_ref().unwrap();
  let n_mux = muxes.node_ids().iter()
    .filter(|&&id| muxes.obj(id).fanins.len() == 3).count();
  assert_eq!(n_mux, dd.count_nodes(f)); }

#[test] fn test_bdd_to_mux_matches_cover() {
  // bdd_to_mux(bdd_from_sop(s)) == s on every assignment
  let mut net = xor_and_net();
  let mut clp = crate::collapse::collapse(&mut net, &CollapseParams {
    to_sop: false, ..Default::default() }).unwrap();
  let muxes = bdd_to_mux(&mut clp).unwrap();
  let ta = truth_tables(&net, 4);
  let tb = truth_tables(&muxes, 4);
  assert_eq!(ta, tb); }

#[test] fn test_lutmin_parity8_k4() {
  let mut net = parity_net(8);
  let out = lutmin(&mut net, 4, false).unwrap();
  for &id in &out.node_ids() {
    assert!(out.obj(id).fanins.len() <= 4, "node {} exceeds 4 inputs", id); }
  assert!(equivalent(&net, &out, 8));
  assert!(out.n_nodes() <= 5, "8-input parity needs few 4-LUTs"); }

#[test] fn test_lutmin_xor_and_all_k() {
  for k in 4..=6 {
    let mut net = xor_and_net();
    let out = lutmin(&mut net, k, false).unwrap();
    for &id in &out.node_ids() {
      assert!(out.obj(id).fanins.len() <= k); }
    assert!(equivalent(&net, &out, 4), "k={}", k); }}

#[test] fn test_lutmin_wide_random_function() {
  // an irregular 7-input function exercises Curtis and the MUX split
  let mut net = Net::new("w", NetType::LogicSop);
  let pis: Vec<ObjId> = (0..7).map(|_| net.add_pi(None)).collect();
  let node = net.add_node();
  for &pi in &pis { net.add_fanin(node, pi, false); }
  let s = net.arena.register(
    "1-0-1-- 1\n-11---0 1\n0---011 1\n--1-1-1 1\n111---- 1\n");
  net.obj_mut(node).func = Func::Sop(s);
  let po = net.add_po(None);
  net.add_fanin(po, node, false);
  net.check().unwrap();
  for k in 4..=6 {
    let mut src = Net::new("w", NetType::LogicSop);
    let pis2: Vec<ObjId> = (0..7).map(|_| src.add_pi(None)).collect();
    let n2 = src.add_node();
    for &pi in &pis2 { src.add_fanin(n2, pi, false); }
    let s2 = src.arena.register(
      "1-0-1-- 1\n-11---0 1\n0---011 1\n--1-1-1 1\n111---- 1\n");
    src.obj_mut(n2).func = Func::Sop(s2);
    let po2 = src.add_po(None);
    src.add_fanin(po2, n2, false);
    let out = lutmin(&mut src, k, false).unwrap();
    for &id in &out.node_ids() {
      assert!(out.obj(id).fanins.len() <= k, "k={}", k); }
    assert!(equivalent(&net, &out, 7), "k={}", k); }}

#[test] fn test_mux_variants_by_enumeration() {
  // both two-LUT 4:1 MUX constructions must equal the one-LUT form
  for k in [4usize, 5, 6] {
    let mut dst = Net::new("m", NetType::LogicBdd);
    dst.dd = Some(crate::dd::Dd::new(8));
    let ins: Vec<ObjId> = (0..6).map(|_| dst.add_pi(None)).collect();
    let pf = [ins[0], ins[1], ins[2], ins[3], ins[4], ins[5]];
    let top = match k {
      4 => mux412(&mut dst, &pf),
      5 => mux412a(&mut dst, &pf),
      _ => mux411(&mut dst, &pf) };
    let po = dst.add_po(None);
    dst.add_fanin(po, top, false);
    dst.check().unwrap();
    let t = truth_tables(&dst, 6);
    for m in 0..64usize {
      let (c0, c1) = (m & 1 != 0, m & 2 != 0);
      let data = [m & 4 != 0, m & 8 != 0, m & 16 != 0, m & 32 != 0];
      // data order: (d00, d01, d10, d11) selected by (c0, c1)
      let sel = (c0 as usize) | ((c1 as usize) << 1);
      let expect = data[match sel { 0 => 0, 1 => 2, 2 => 1, _ => 3 }];
      assert_eq!(crate::tt::get_bit(&t[0], m), expect, "k={} m={}", k, m); }}}
