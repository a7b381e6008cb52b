// test suite for the network model

#[cfg(test)]
fn two_node_net()->Net {
  // f = a & b, g = f | c
  let mut net = Net::new("t", NetType::LogicSop);
  let a = net.add_pi(Some("a"));
  let b = net.add_pi(Some("b"));
  let c = net.add_pi(Some("c"));
  let f = net.add_node();
  net.add_fanin(f, a, false);
  net.add_fanin(f, b, false);
  let s = net.arena.register(&sop::create_and(2, None));
  net.obj_mut(f).func = Func::Sop(s);
  let g = net.add_node();
  net.add_fanin(g, f, false);
  net.add_fanin(g, c, false);
  let s = net.arena.register(&sop::create_or(2, None));
  net.obj_mut(g).func = Func::Sop(s);
  let po = net.add_po(Some("out"));
  net.add_fanin(po, g, false);
  net }

#[test] fn test_net_build_and_check() {
  let net = two_node_net();
  net.check().unwrap();
  assert_eq!(net.pis.len(), 3);
  assert_eq!(net.pos.len(), 1);
  assert_eq!(net.n_nodes(), 2); }

#[test] fn test_net_fanout_symmetry() {
  let net = two_node_net();
  for (i, o) in net.objs.iter().enumerate() {
    for f in &o.fanins {
      assert!(net.obj(f.id).fanouts.contains(&(i as ObjId))); }}}

#[test] fn test_net_levels() {
  let mut net = two_node_net();
  let max = net.update_levels();
  assert_eq!(max, 2);
  let f = net.node_ids()[0];
  let g = net.node_ids()[1];
  assert!(net.obj(f).level < net.obj(g).level); }

#[test] fn test_net_topo_order() {
  let mut net = two_node_net();
  let order = net.topo_order();
  assert_eq!(order.len(), 2);
  // fanins come before fanouts
  let pos: FxHashMap<ObjId, usize> =
    order.iter().enumerate().map(|(i, &o)| (o, i)).collect();
  for &id in &order {
    for fi in &net.obj(id).fanins {
      if let Some(&p) = pos.get(&fi.id) { assert!(p < pos[&id]); }}}}

#[test] fn test_net_travid() {
  let mut net = two_node_net();
  let n = net.node_ids()[0];
  net.trav_bump();
  assert!(!net.is_marked(n));
  net.mark(n);
  assert!(net.is_marked(n));
  net.trav_bump();
  assert!(!net.is_marked(n)); }

#[test] fn test_net_delete_cascade() {
  let mut net = two_node_net();
  let po = net.pos[0];
  let g = net.obj(po).fanins[0].id;
  net.delete_obj(po, false);
  // g lost its only fanout; cascading delete removes the whole cone
  net.delete_obj(g, true);
  assert_eq!(net.n_nodes(), 0);
  net.check().unwrap(); }

#[test] fn test_net_latch_and_comb() {
  let mut net = Net::new("seq", NetType::LogicSop);
  let a = net.add_pi(Some("a"));
  let (li, _l, lo) = net.add_latch(Some(false));
  let n = net.add_node();
  net.add_fanin(n, a, false);
  net.add_fanin(n, lo, false);
  let s = net.arena.register(&sop::create_and(2, None));
  net.obj_mut(n).func = Func::Sop(s);
  net.add_fanin(li, n, false);
  let po = net.add_po(Some("o"));
  net.add_fanin(po, n, false);
  net.check().unwrap();
  assert_eq!(net.cis().len(), 2);
  assert_eq!(net.cos().len(), 2);

  net.make_comb(true);
  net.check().unwrap();
  assert_eq!(net.latches.len(), 0);
  assert_eq!(net.pis.len(), 2);
  assert_eq!(net.pos.len(), 2);

  net.make_seq(1);
  net.check().unwrap();
  assert_eq!(net.latches.len(), 1);
  assert_eq!(net.pis.len(), 1);
  assert_eq!(net.pos.len(), 1); }

#[test] fn test_net_minimum_base_idempotent() {
  let mut net = Net::new("mb", NetType::LogicSop);
  let a = net.add_pi(None);
  let b = net.add_pi(None);
  let c = net.add_pi(None);
  let n = net.add_node();
  net.add_fanin(n, a, false);
  net.add_fanin(n, b, false);
  net.add_fanin(n, c, false);
  // the cover never looks at input b
  let s = net.arena.register("1-0 1\n");
  net.obj_mut(n).func = Func::Sop(s);
  let po = net.add_po(None);
  net.add_fanin(po, n, false);
  net.minimum_base();
  net.check().unwrap();
  assert_eq!(net.obj(n).fanins.len(), 2);
  assert_eq!(net.sop(n), "10 1\n");
  let before = net.sop(n).to_string();
  net.minimum_base();
  assert_eq!(net.sop(n), before); }

#[test] fn test_net_fix_nondriven() {
  let mut net = Net::new("nd", NetType::LogicSop);
  net.add_pi(None);
  net.add_po(None);
  net.fix_nondriven_nets();
  net.check().unwrap();
  let po = net.pos[0];
  assert_eq!(net.obj(po).fanins.len(), 1);
  let drv = net.obj(po).fanins[0].id;
  assert!(sop::is_const0(net.sop(drv))); }

#[test] fn test_net_check_catches_broken_link() {
  let mut net = two_node_net();
  // break fanin/fanout symmetry behind the mutators' back
  let f = net.node_ids()[0];
  let victim = net.objs[f as usize].fanins[0].id;
  net.objs[victim as usize].fanouts.clear();
  assert!(net.check().is_err()); }

#[test] fn test_net_strash_and_sim() {
  let mut net = two_node_net();
  let aig = crate::aig::strash(&mut net);
  aig.check().unwrap();
  assert!(crate::aig::equivalent(&net, &aig, 3));
  // simulation agrees with the covers on every assignment
  let t = crate::aig::truth_tables(&net, 3);
  for m in 0..8usize {
    let expect = ((m & 1 != 0) && (m & 2 != 0)) || (m & 4 != 0);
    assert_eq!(crate::tt::get_bit(&t[0], m), expect); }}

#[test] fn test_net_strash_no_duplicate_ands() {
  let mut net = two_node_net();
  let aig = crate::aig::strash(&mut net);
  // the strash table guarantee is part of check() for AIG networks
  aig.check().unwrap();
  assert_eq!(aig.ty, NetType::Aig); }

#[test] fn test_net_collapse_two_level() {
  let mut net = two_node_net();
  let out = crate::collapse::collapse(&mut net, &crate::collapse::CollapseParams {
    verbose: false, ..Default::default() }).unwrap();
  assert!(crate::aig::equivalent(&net, &out, 3));
  assert_eq!(out.n_nodes(), 1, "collapse yields one node per PO"); }

#[test] fn test_net_collapse_identity_wire() {
  let mut net = Net::new("wire", NetType::LogicSop);
  let a = net.add_pi(Some("a"));
  let n = net.add_node();
  net.add_fanin(n, a, false);
  let s = net.arena.register(&sop::create_buf(false));
  net.obj_mut(n).func = Func::Sop(s);
  let po = net.add_po(Some("o"));
  net.add_fanin(po, n, false);
  let out = crate::collapse::collapse(&mut net, &Default::default()).unwrap();
  assert_eq!(out.n_nodes(), 0, "an identity wire needs no node");
  assert!(crate::aig::equivalent(&net, &out, 1)); }

#[test] fn test_net_global_bdd_budget_restores() {
  let mut net = two_node_net();
  let aig = crate::aig::strash(&mut net);
  let fouts_before: Vec<usize> =
    aig.objs.iter().map(|o| o.fanouts.len()).collect();
  let r = crate::global::build_global_bdds(&aig, &crate::global::GlobalParams {
    size_max: 1, ..Default::default() });
  assert!(matches!(r, Err(crate::Error::Budget { .. })));
  let fouts_after: Vec<usize> =
    aig.objs.iter().map(|o| o.fanouts.len()).collect();
  assert_eq!(fouts_before, fouts_after); }

#[test] fn test_net_unreachable_states() {
  // a 2-bit one-hot ring: states 01 -> 10 -> 01; 00 and 11 unreachable
  // once the ring is seeded with 10
  let mut net = Net::new("ring", NetType::LogicSop);
  let (li0, l0, lo0) = net.add_latch(Some(true));
  let (li1, l1, lo1) = net.add_latch(Some(false));
  let b0 = net.add_node();
  net.add_fanin(b0, lo1, false);
  let s = net.arena.register(&sop::create_buf(false));
  net.obj_mut(b0).func = Func::Sop(s);
  net.add_fanin(li0, b0, false);
  let b1 = net.add_node();
  net.add_fanin(b1, lo0, false);
  let s = net.arena.register(&sop::create_buf(false));
  net.obj_mut(b1).func = Func::Sop(s);
  net.add_fanin(li1, b1, false);
  net.check().unwrap();
  let _ = (l0, l1);
  let (dd, unreach, cs) = crate::global::unreachable_states(&mut net, 10_000).unwrap();
  assert_eq!(cs.len(), 2);
  let mut assign = vec![false; dd.num_vars()];
  // state 10 (latch0=1, latch1=0): reachable
  assign[cs[0] as usize] = true;
  assert!(!dd.eval(unreach, &assign));
  // state 11: unreachable
  assign[cs[1] as usize] = true;
  assert!(dd.eval(unreach, &assign));
  // state 00: unreachable
  assign[cs[0] as usize] = false;
  assign[cs[1] as usize] = false;
  assert!(dd.eval(unreach, &assign)); }
