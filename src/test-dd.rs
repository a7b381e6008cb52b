// test suite for the DD manager

#[cfg(test)]
fn assert_same(dd: &Dd, f: Edge, nvars: usize, expect: impl Fn(&[bool])->bool) {
  for m in 0..1usize << nvars {
    let assign: Vec<bool> = (0..nvars).map(|i| (m >> i) & 1 == 1).collect();
    assert_eq!(dd.eval(f, &assign), expect(&assign), "minterm {:b}", m); }}

#[test] fn test_dd_consts() {
  let mut dd = Dd::new(2);
  assert_eq!(dd.read_one(), I);
  assert_eq!(!I, O);
  assert_eq!(dd.and(I, O), O);
  assert_eq!(dd.or(I, O), I);
  assert_eq!(dd.xor(I, I), O);
  let x0 = dd.ith_var(0);
  assert_eq!(dd.and(x0, !x0), O);
  assert_eq!(dd.or(x0, !x0), I); }

#[test] fn test_dd_ops() {
  let mut dd = Dd::new(3);
  let (a, b, c) = (dd.ith_var(0), dd.ith_var(1), dd.ith_var(2));
  let f = dd.and(a, b);
  assert_same(&dd, f, 3, |v| v[0] && v[1]);
  let g = dd.xor(f, c);
  assert_same(&dd, g, 3, |v| (v[0] && v[1]) ^ v[2]);
  let h = dd.ite(a, b, c);
  assert_same(&dd, h, 3, |v| if v[0] { v[1] } else { v[2] });
  // same arguments hash to the same node
  assert_eq!(dd.and(a, b), f); }

#[test] fn test_dd_queries() {
  let mut dd = Dd::new(4);
  let (a, b, c) = (dd.ith_var(0), dd.ith_var(1), dd.ith_var(2));
  let ab = dd.and(a, b);
  let f = dd.or(ab, c);
  assert_eq!(dd.support(f), vec![0, 1, 2]);
  assert!(dd.count_nodes(f) >= 3);
  // c covers 4 minterms, ab adds one more
  assert_eq!(dd.count_minterm(f, 3) as u64, 5);
  assert_eq!(dd.count_minterm(I, 4) as u64, 16);
  assert_eq!(dd.count_minterm(O, 4) as u64, 0); }

#[test] fn test_dd_cube_and_cofactor() {
  let mut dd = Dd::new(3);
  let (a, b, c) = (dd.ith_var(0), dd.ith_var(1), dd.ith_var(2));
  let cube = dd.cube(&[(0, true), (2, false)]);
  assert!(dd.is_cube(cube));
  let expected = dd.and(a, !c);
  assert_eq!(cube, expected);
  let f = dd.ite(a, b, c);
  let g = dd.cofactor(f, cube); // a=1, c=0 -> b
  assert_eq!(g, b); }

#[test] fn test_dd_exist_and_abstract() {
  let mut dd = Dd::new(3);
  let (a, b, c) = (dd.ith_var(0), dd.ith_var(1), dd.ith_var(2));
  let f = dd.and(a, b);
  let cube = dd.cube(&[(0, true)]);
  let mut lim = Limits::none();
  let ex = dd.exist_abstract(f, cube, &mut lim).unwrap();
  assert_eq!(ex, b); // exists a. ab = b
  let g = dd.or(b, c);
  let aa = dd.and_abstract(f, g, cube, &mut lim).unwrap();
  let manual = { let t = dd.and(f, g); dd.exist_abstract(t, cube, &mut lim).unwrap() };
  assert_eq!(aa, manual); }

#[test] fn test_dd_restrict() {
  let mut dd = Dd::new(3);
  let (a, b) = (dd.ith_var(0), dd.ith_var(1));
  let f = dd.and(a, b);
  // wherever a holds, f agrees with b
  let r = dd.restrict(f, a);
  assert_eq!(r, b);
  assert_eq!(dd.restrict(f, I), f); }

#[test] fn test_dd_and_limit() {
  let mut dd = Dd::new(8);
  let vars: Vec<Edge> = (0..8).map(|i| dd.ith_var(i)).collect();
  let mut f = vars[0];
  let mut g = vars[7];
  for i in 1..7 {
    if i % 2 == 0 { f = dd.xor(f, vars[i]) } else { f = dd.or(f, vars[i]) }
    g = dd.xor(g, vars[7 - i]); }
  // a cap at the current allocation leaves no room for the result
  assert!(dd.and_limit(f, g, dd.allocated()).is_none());
  // an unconstrained retry succeeds and the cache stayed consistent
  let r = dd.and_limit(f, g, usize::MAX).unwrap();
  let s = dd.and(f, g);
  assert_eq!(r, s); }

#[test] fn test_dd_deadline() {
  let mut dd = Dd::new(4);
  let (a, b) = (dd.ith_var(0), dd.ith_var(1));
  let mut lim = Limits::until(std::time::Instant::now()
                              + std::time::Duration::from_secs(60));
  // a generous deadline does not interfere
  assert!(dd.ite_lim(a, b, O, &mut lim).is_some()); }

#[test] fn test_dd_refcount_gc() {
  let mut dd = Dd::new(4);
  let (a, b, c) = (dd.ith_var(0), dd.ith_var(1), dd.ith_var(2));
  let f = dd.and(a, b);
  dd.refer(f);
  let g = dd.and(f, c);
  // g is dead weight; f survives the sweep
  let live_before = dd.live();
  dd.gc();
  assert!(dd.live() <= live_before);
  let f2 = dd.and(a, b);
  assert_eq!(f, f2);
  dd.deref(f);
  let _ = g; }

#[test] fn test_dd_transfer_roundtrip() {
  let mut dd = Dd::new(4);
  let (a, b, c) = (dd.ith_var(0), dd.ith_var(1), dd.ith_var(2));
  let t = dd.xor(b, c);
  let f = dd.ite(a, t, b);
  let mut dd2 = Dd::new(4);
  let f2 = dd2.transfer(&dd, f);
  let back = dd.transfer(&dd2, f2);
  assert_eq!(back, f); }

#[test] fn test_dd_transfer_permute() {
  let mut dd = Dd::new(3);
  let (a, b) = (dd.ith_var(0), dd.ith_var(1));
  let f = dd.and(a, b);
  let mut dd2 = Dd::new(3);
  // map 0->2, 1->0
  let g = dd2.transfer_permute_time(&dd, f, &[2, 0, 1], &mut Limits::none()).unwrap();
  assert_same(&dd2, g, 3, |v| v[2] && v[0]); }

#[test] fn test_dd_permute_roundtrip() {
  let mut dd = Dd::new(4);
  let (a, b, c) = (dd.ith_var(0), dd.ith_var(1), dd.ith_var(2));
  let ab = dd.and(a, b);
  let f = dd.or(ab, c);
  let map: Vec<u32> = vec![2, 0, 1, 3];
  let inv: Vec<u32> = vec![1, 2, 0, 3];
  let g = dd.permute(f, &map);
  let back = dd.permute(g, &inv);
  assert_eq!(back, f); }

#[test] fn test_dd_reorder_preserves_functions() {
  let mut dd = Dd::new(6);
  let vars: Vec<Edge> = (0..6).map(|i| dd.ith_var(i)).collect();
  // interleaved product: worst for the natural order 0,2,4 vs 1,3,5
  let p1 = dd.and(vars[0], vars[3]);
  let p2 = dd.and(vars[1], vars[4]);
  let p3 = dd.and(vars[2], vars[5]);
  let s1 = dd.or(p1, p2);
  let f = dd.or(s1, p3);
  dd.refer(f);
  let size_before = dd.count_nodes(f);
  dd.reduce_heap(Method::Sift, 2.0);
  assert!(dd.count_nodes(f) <= size_before);
  assert_same(&dd, f, 6, |v| (v[0] && v[3]) || (v[1] && v[4]) || (v[2] && v[5])); }

#[test] fn test_dd_symm_sift() {
  let mut dd = Dd::new(4);
  let vars: Vec<Edge> = (0..4).map(|i| dd.ith_var(i)).collect();
  let s1 = dd.or(vars[0], vars[1]);
  let s2 = dd.or(vars[2], vars[3]);
  let f = dd.and(s1, s2);
  dd.refer(f);
  dd.reduce_heap(Method::SymmSift, 2.0);
  assert_same(&dd, f, 4, |v| (v[0] || v[1]) && (v[2] || v[3])); }

#[test] fn test_dd_swap_levels_direct() {
  let mut dd = Dd::new(3);
  let (a, b, c) = (dd.ith_var(0), dd.ith_var(1), dd.ith_var(2));
  let t = dd.and(b, c);
  let f = dd.or(a, t);
  dd.refer(f);
  dd.swap_levels(0);
  assert_eq!(dd.invperm, vec![1, 0, 2]);
  assert_same(&dd, f, 3, |v| v[0] || (v[1] && v[2]));
  dd.swap_levels(1);
  assert_same(&dd, f, 3, |v| v[0] || (v[1] && v[2])); }

#[test] fn test_dd_isop_interval() {
  let mut dd = Dd::new(4);
  let (a, b, c) = (dd.ith_var(0), dd.ith_var(1), dd.ith_var(2));
  let ab = dd.and(a, b);
  let f = dd.or(ab, c);
  let (cubes, g) = dd.isop(f, f, None).unwrap();
  assert_eq!(g, f, "exact interval must reproduce the function");
  assert_eq!(cubes.len(), 2);
  // a widened interval stays inside the bounds
  let l = dd.and(f, a);
  let u = dd.or(f, b);
  let (_, h) = dd.isop(l, u, None).unwrap();
  let lo_ok = dd.ite(l, h, I);
  let hi_ok = dd.ite(h, u, I);
  assert_eq!(lo_ok, I);
  assert_eq!(hi_ok, I); }

#[test] fn test_dd_isop_cube_budget() {
  let mut dd = Dd::new(6);
  let vars: Vec<Edge> = (0..6).map(|i| dd.ith_var(i)).collect();
  let mut f = O;
  for i in 0..3 {
    let t = dd.and(vars[2 * i], vars[2 * i + 1]);
    f = dd.or(f, t); }
  assert!(dd.isop(f, f, Some(1)).is_none());
  assert!(dd.isop(f, f, Some(3)).is_some()); }

#[test] fn test_dd_autodyn() {
  let mut dd = Dd::new(6);
  dd.autodyn_enable(Method::Sift);
  let vars: Vec<Edge> = (0..6).map(|i| dd.ith_var(i)).collect();
  let mut f = O;
  for i in 0..3 {
    let t = dd.and(vars[i], vars[i + 3]);
    f = dd.or(f, t);
    dd.refer(f); }
  assert_same(&dd, f, 6, |v| (0..3).any(|i| v[i] && v[i + 3])); }
