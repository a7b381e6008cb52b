// test suite for fast extract

#[cfg(test)]
fn sop_net(n_ins: usize, nodes: &[(&[usize], &str)])->Net {
  let mut net = Net::new("fx", NetType::LogicSop);
  let pis: Vec<ObjId> = (0..n_ins).map(|_| net.add_pi(None)).collect();
  let mut ids: Vec<ObjId> = pis.clone();
  for (fanins, cover) in nodes {
    let n = net.add_node();
    for &f in fanins.iter() { net.add_fanin(n, ids[f], false); }
    let s = net.arena.register(cover);
    net.obj_mut(n).func = Func::Sop(s);
    ids.push(n);
    let po = net.add_po(None);
    net.add_fanin(po, n, false); }
  net.check().unwrap();
  net }

#[cfg(test)]
fn total_lits(net: &Net)->usize {
  net.node_ids().iter().map(|&id| sop::lit_count(net.sop(id))).sum() }

#[test] fn test_fx_shared_or_divisor() {
  // use simplelog::*; TermLogger::init(LevelFilter::Debug, Config::default(),
  //   TerminalMode::Mixed, ColorChoice::Auto).ok();
  // f = ab + ac + ad, g = be + ce + de share the divisor b + c + d,
  // reached through two double-cube extractions
  let mut net = sop_net(5, &[
    (&[0, 1, 2, 3], "11-- 1\n1-1- 1\n1--1 1\n"),
    (&[1, 2, 3, 4], "1--1 1\n-1-1 1\n--11 1\n")]);
  assert_eq!(total_lits(&net), 12);
  let reference = sop_net(5, &[
    (&[0, 1, 2, 3], "11-- 1\n1-1- 1\n1--1 1\n"),
    (&[1, 2, 3, 4], "1--1 1\n-1-1 1\n--11 1\n")]);
  let ext = fast_extract(&mut net, &FxParams::default()).unwrap();
  assert!(ext >= 1);
  net.check().unwrap();
  assert_eq!(total_lits(&net), 8);
  assert!(crate::aig::equivalent(&reference, &net, 5)); }

#[test] fn test_fx_idempotent() {
  let mut net = sop_net(5, &[
    (&[0, 1, 2, 3], "11-- 1\n1-1- 1\n1--1 1\n"),
    (&[1, 2, 3, 4], "1--1 1\n-1-1 1\n--11 1\n")]);
  let first = fast_extract(&mut net, &FxParams::default()).unwrap();
  assert!(first >= 1);
  let second = fast_extract(&mut net, &FxParams::default()).unwrap();
  assert_eq!(second, 0, "a second run must find nothing new"); }

#[test] fn test_fx_empty_network() {
  let mut net = Net::new("empty", NetType::LogicSop);
  net.add_pi(None);
  let ext = fast_extract(&mut net, &FxParams::default()).unwrap();
  assert_eq!(ext, 0); }

#[test] fn test_fx_constant_cover_only() {
  let mut net = Net::new("konst", NetType::LogicSop);
  net.add_pi(None);
  let n = net.add_node();
  let s = net.arena.register(&sop::create_const1());
  net.obj_mut(n).func = Func::Sop(s);
  let po = net.add_po(None);
  net.add_fanin(po, n, false);
  let ext = fast_extract(&mut net, &FxParams::default()).unwrap();
  assert_eq!(ext, 0); }

#[test] fn test_fx_rejects_duplicate_cubes() {
  let mut net = sop_net(3, &[(&[0, 1, 2], "11- 1\n11- 1\n")]);
  let covers_before: Vec<String> =
    net.node_ids().iter().map(|&id| net.sop(id).to_string()).collect();
  let r = fast_extract(&mut net, &FxParams::default());
  assert!(matches!(r, Err(Error::Malformed(_))));
  // the network is untouched on a malformed input
  let covers_after: Vec<String> =
    net.node_ids().iter().map(|&id| net.sop(id).to_string()).collect();
  assert_eq!(covers_before, covers_after); }

#[test] fn test_fx_rejects_containment() {
  let mut net = sop_net(3, &[(&[0, 1, 2], "11- 1\n1-- 1\n")]);
  let r = fast_extract(&mut net, &FxParams::default());
  assert!(matches!(r, Err(Error::Malformed(_)))); }

#[test] fn test_fx_single_mode() {
  // ab occurs in three cubes across two nodes: a single-cube divisor
  let mut net = sop_net(5, &[
    (&[0, 1, 2, 3], "111- 1\n11-1 1\n"),
    (&[0, 1, 4], "111 1\n")]);
  let reference = sop_net(5, &[
    (&[0, 1, 2, 3], "111- 1\n11-1 1\n"),
    (&[0, 1, 4], "111 1\n")]);
  let p = FxParams { only_single: true, ..Default::default() };
  let ext = fast_extract(&mut net, &p).unwrap();
  assert_eq!(ext, 1);
  net.check().unwrap();
  assert!(crate::aig::equivalent(&reference, &net, 5));
  // the shared product became one new node feeding both
  assert_eq!(net.n_nodes(), 3); }

#[test] fn test_fx_double_mode() {
  let mut net = sop_net(5, &[
    (&[0, 1, 2, 3], "11-- 1\n1-1- 1\n1--1 1\n"),
    (&[1, 2, 3, 4], "1--1 1\n-1-1 1\n--11 1\n")]);
  let reference = sop_net(5, &[
    (&[0, 1, 2, 3], "11-- 1\n1-1- 1\n1--1 1\n"),
    (&[1, 2, 3, 4], "1--1 1\n-1-1 1\n--11 1\n")]);
  let p = FxParams { only_double: true, ..Default::default() };
  let ext = fast_extract(&mut net, &p).unwrap();
  assert!(ext >= 1);
  assert!(crate::aig::equivalent(&reference, &net, 5)); }

#[test] fn test_fx_complement_pair() {
  // n1 = ab(c + d), n2 = !a + !b: one node serves both polarities
  let mut net = sop_net(4, &[
    (&[0, 1, 2, 3], "111- 1\n11-1 1\n"),
    (&[0, 1], "0- 1\n-0 1\n")]);
  let reference = sop_net(4, &[
    (&[0, 1, 2, 3], "111- 1\n11-1 1\n"),
    (&[0, 1], "0- 1\n-0 1\n")]);
  let p = FxParams { use_compl: true, use_zero: true, ..Default::default() };
  let ext = fast_extract(&mut net, &p).unwrap();
  assert!(ext >= 1);
  net.check().unwrap();
  assert!(crate::aig::equivalent(&reference, &net, 4)); }

#[test] fn test_fx_weight_min_stops() {
  let mut net = sop_net(5, &[
    (&[0, 1, 2, 3], "11-- 1\n1-1- 1\n1--1 1\n"),
    (&[1, 2, 3, 4], "1--1 1\n-1-1 1\n--11 1\n")]);
  // every divisor here weighs 2; an aggressive threshold extracts none
  let p = FxParams { weight_min: 10, ..Default::default() };
  let ext = fast_extract(&mut net, &p).unwrap();
  assert_eq!(ext, 0); }

#[test] fn test_fx_pairs_cap_filters() {
  let mut net = sop_net(5, &[
    (&[0, 1, 2, 3], "11-- 1\n1-1- 1\n1--1 1\n"),
    (&[1, 2, 3, 4], "1--1 1\n-1-1 1\n--11 1\n")]);
  let reference = sop_net(5, &[
    (&[0, 1, 2, 3], "11-- 1\n1-1- 1\n1--1 1\n"),
    (&[1, 2, 3, 4], "1--1 1\n-1-1 1\n--11 1\n")]);
  // 6 total pairs; keep only 3 of the closest
  let p = FxParams { pairs_max: 3, ..Default::default() };
  let ext = fast_extract(&mut net, &p).unwrap();
  assert!(ext >= 1);
  assert!(crate::aig::equivalent(&reference, &net, 5)); }

#[test] fn test_fx_heap_top_is_max_weight() {
  let net = sop_net(5, &[
    (&[0, 1, 2, 3], "11-- 1\n1-1- 1\n1--1 1\n"),
    (&[1, 2, 3, 4], "1--1 1\n-1-1 1\n--11 1\n")]);
  let eligible = collect_eligible(&net);
  let mut m = build_matrix(&net, &eligible, &FxParams::default()).unwrap();
  let top = m.heap_d.max_weight().unwrap();
  let best = m.divs.iter().filter(|d| d.alive)
    .map(|d| d.weight).max().unwrap();
  assert_eq!(top, best);
  // the invariant survives an extraction
  m.update_double().unwrap();
  if let Some(top) = m.heap_d.max_weight() {
    let best = m.divs.iter().filter(|d| d.alive && !d.pairs.is_empty())
      .map(|d| d.weight).max().unwrap();
    assert_eq!(top, best); }}

#[test] fn test_fx_nodes_ext_cap() {
  let mut net = sop_net(5, &[
    (&[0, 1, 2, 3], "11-- 1\n1-1- 1\n1--1 1\n"),
    (&[1, 2, 3, 4], "1--1 1\n-1-1 1\n--11 1\n")]);
  let p = FxParams { nodes_ext: 1, ..Default::default() };
  let ext = fast_extract(&mut net, &p).unwrap();
  assert_eq!(ext, 1);
  net.check().unwrap(); }
