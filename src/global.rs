//! Global-BDD construction: one shared BDD per combinational output of a
//! structurally hashed network, under a node budget.
//!
//! A side array of residual-reference counters (one per object,
//! initialized to the fanout count) drives the dropping of internal
//! results: once every consumer of an AND node has taken its BDD, the
//! node's function is dereferenced and its slot cleared. On budget
//! exceedance the whole construction is abandoned; the network itself is
//! never touched, so its fanout counts are exactly as before the call.
use crate::dd::{Dd, Method};
use crate::edge::{Edge, I};
use crate::err::{Error, Result};
use crate::net::{Net, NetType, ObjId, ObjType};

#[derive(Debug, Clone)]
pub struct GlobalParams {
  /// ceiling on live BDD nodes; crossing it aborts the construction
  pub size_max: usize,
  /// release internal results as soon as their last consumer took them
  pub drop_internal: bool,
  /// enable dynamic reordering while building (symmetric sift)
  pub reorder: bool,
  /// assign variable n-1-i (instead of i) to combinational input i
  pub reverse: bool,
  /// recognize MUX/XOR shapes and build them with one ITE
  pub detect_muxes: bool,
  pub verbose: bool }

impl Default for GlobalParams {
  fn default()->GlobalParams {
    GlobalParams { size_max: 50_000_000, drop_internal: true, reorder: false,
                   reverse: false, detect_muxes: true, verbose: false }}}

/// The result: a manager plus one referenced edge per combinational
/// output, with `ci_vars[i]` the variable standing for CI number `i`.
pub struct GlobalBdds {
  pub dd: Dd,
  pub cos: Vec<Edge>,
  pub ci_vars: Vec<u32> }

/// build the global BDDs of every CO of a strashed network.
pub fn build_global_bdds(net: &Net, p: &GlobalParams)->Result<GlobalBdds> {
  assert_eq!(net.ty, NetType::Aig, "global BDDs are built from a strashed network");
  let cis = net.cis();
  let cos = net.cos();
  let mut dd = Dd::new(cis.len());
  if p.reorder { dd.autodyn_enable(Method::SymmSift); }
  let n = cis.len();
  let ci_vars: Vec<u32> = (0..n as u32)
    .map(|i| if p.reverse { n as u32 - 1 - i } else { i }).collect();

  let mut bdds: Vec<Option<Edge>> = vec![None; net.objs.len()];
  let mut refs: Vec<i64> = net.objs.iter().map(|o| o.fanouts.len() as i64).collect();
  if net.const1 != crate::net::NIL { bdds[net.const1 as usize] = Some(I); }
  for (i, &ci) in cis.iter().enumerate() {
    let v = dd.ith_var(ci_vars[i]);
    dd.refer(v);
    bdds[ci as usize] = Some(v); }

  let mut counter = 0usize;
  let mut result = Vec::with_capacity(cos.len());
  for &co in &cos {
    let fanin = net.obj(co).fanins[0];
    let f = match build_rec(net, &mut dd, fanin.id, p, &mut bdds, &mut refs, &mut counter) {
      Some(f) => f,
      None => {
        info!("global bdd aborted: live={} cap={}", dd.live(), p.size_max);
        return Err(Error::Budget { what: "global bdd nodes", limit: p.size_max }) }};
    let f = f.inv_if(fanin.compl);
    dd.refer(f);
    release(net, &mut dd, fanin.id, p, &mut bdds, &mut refs);
    result.push(f);
    if dd.dead > dd.live() / 2 { dd.gc(); }
    // bounded ops bypass the public wrappers, so reorder between COs
    dd.maybe_reorder(); }

  if p.reorder {
    dd.reduce_heap(Method::SymmSift, 1.2);
    dd.autodyn_disable(); }
  if p.verbose {
    info!("global_bdds cos={} nodes={} built={}", cos.len(),
          dd.count_nodes_multi(&result), counter); }
  Ok(GlobalBdds { dd, cos: result, ci_vars }) }

// one consumer of `id` is done with its BDD; with drop_internal, free
// the slot once the last consumer has gone
fn release(net: &Net, dd: &mut Dd, id: ObjId, p: &GlobalParams,
           bdds: &mut [Option<Edge>], refs: &mut [i64]) {
  refs[id as usize] -= 1;
  if refs[id as usize] == 0 && p.drop_internal
     && net.obj(id).ty == ObjType::And {
    if let Some(f) = bdds[id as usize].take() { dd.deref(f); }}}

fn build_rec(net: &Net, dd: &mut Dd, id: ObjId, p: &GlobalParams,
             bdds: &mut Vec<Option<Edge>>, refs: &mut Vec<i64>,
             counter: &mut usize)->Option<Edge> {
  if dd.live() > p.size_max { return None }
  if let Some(f) = bdds[id as usize] { return Some(f) }
  let o = net.obj(id);
  debug_assert_eq!(o.ty, ObjType::And, "unreached object {} has no BDD", id);
  let (e0, e1) = (o.fanins[0], o.fanins[1]);

  // MUX/XOR shape: two complemented AND children, single-fanout each,
  // sharing one control in opposite polarity; computed with one ITE
  if p.detect_muxes && e0.compl && e1.compl {
    let (n0, n1) = (net.obj(e0.id), net.obj(e1.id));
    if n0.ty == ObjType::And && n1.ty == ObjType::And
       && refs[e0.id as usize] == 1 && refs[e1.id as usize] == 1
       && bdds[e0.id as usize].is_none() && bdds[e1.id as usize].is_none() {
      if let Some((c, t, e)) = recognize_mux(net, e0.id, e1.id) {
        // the two AND children are bypassed entirely
        refs[e0.id as usize] -= 1;
        refs[e1.id as usize] -= 1;
        // the control is consumed by both children but computed once
        refs[c.id as usize] -= 1;
        let fc = build_rec(net, dd, c.id, p, bdds, refs, counter)?;
        let fc = fc.inv_if(c.compl);
        let ft = build_rec(net, dd, t.id, p, bdds, refs, counter)?;
        let ft = ft.inv_if(t.compl);
        let fe = build_rec(net, dd, e.id, p, bdds, refs, counter)?;
        let fe = fe.inv_if(e.compl);
        // node = AND(!(c&t'), !(!c&e')) = ITE(c, !t', !e')
        let f = dd.ite_lim(fc, !ft, !fe, &mut crate::dd::Limits::cap(p.size_max))?;
        dd.refer(f);
        bdds[id as usize] = Some(f);
        release(net, dd, c.id, p, bdds, refs);
        release(net, dd, t.id, p, bdds, refs);
        release(net, dd, e.id, p, bdds, refs);
        *counter += 3;
        return Some(f) }}}

  let f0 = build_rec(net, dd, e0.id, p, bdds, refs, counter)?;
  let f0 = f0.inv_if(e0.compl);
  let f1 = build_rec(net, dd, e1.id, p, bdds, refs, counter)?;
  let f1 = f1.inv_if(e1.compl);
  let f = dd.and_limit(f0, f1, p.size_max)?;
  dd.refer(f);
  bdds[id as usize] = Some(f);
  release(net, dd, e0.id, p, bdds, refs);
  release(net, dd, e1.id, p, bdds, refs);
  *counter += 1;
  Some(f) }

// the two AND grandchildren of a candidate MUX, as (control, then, else)
// literals: node = ITE(c, !t, !e) when n0 = (c & t) and n1 = (!c & e)
fn recognize_mux(net: &Net, a0: ObjId, a1: ObjId)
                 ->Option<(crate::net::Fanin, crate::net::Fanin, crate::net::Fanin)> {
  let f0 = &net.obj(a0).fanins;
  let f1 = &net.obj(a1).fanins;
  for i in 0..2 {
    for j in 0..2 {
      if f0[i].id == f1[j].id && f0[i].compl != f1[j].compl {
        return Some((f0[i], f0[1 - i], f1[1 - j])) }}}
  None }

// --- unreachable states ----------------------------------------------------

/// compute the set of states a latched network can never reach: the
/// complement of the reachability fixpoint, expressed over the
/// current-state variables (the latch-output CIs). Returns the manager,
/// the unreachable-state function, and the current-state variable of
/// each latch in order.
pub fn unreachable_states(net: &mut Net, size_max: usize)->Result<(Dd, Edge, Vec<u32>)> {
  assert!(!net.latches.is_empty(), "unreachable states need latches");
  let glo = if net.ty == NetType::Aig {
    build_global_bdds(net, &GlobalParams { size_max, ..Default::default() })? }
  else {
    let aig = crate::aig::strash(net);
    build_global_bdds(&aig, &GlobalParams { size_max, ..Default::default() })? };
  let GlobalBdds { mut dd, cos, ci_vars } = glo;
  let npo = net.pos.len();
  let nl = net.latches.len();
  let npi = net.pis.len();
  // current-state vars are the CI slots after the PIs
  let cs: Vec<u32> = (0..nl).map(|i| ci_vars[npi + i]).collect();
  // fresh next-state vars at the bottom of the order
  let ns: Vec<u32> = (0..nl).map(|_| dd.new_var()).collect();
  let mut lim = crate::dd::Limits::cap(size_max);

  // transition relation: product of (ns_i == f_i)
  let mut rel = I;
  for i in 0..nl {
    let nv = dd.ith_var(ns[i]);
    let f = cos[npo + i];
    let eq = !dd.xor(nv, f);
    let old = rel;
    rel = match dd.ite_lim(old, eq, crate::edge::O, &mut lim) {
      Some(r) => r,
      None => return Err(Error::Budget { what: "transition relation", limit: size_max }) };
    dd.refer(rel);
    dd.deref(old); }

  // quantify inputs and current state during image computation
  let quant: Vec<(u32, bool)> = (0..npi).map(|i| (ci_vars[i], true))
    .chain(cs.iter().map(|&v| (v, true))).collect();
  let qcube = dd.cube(&quant);
  dd.refer(qcube);
  let ns2cs: Vec<u32> = (0..dd.num_vars() as u32)
    .map(|v| ns.iter().position(|&x| x == v).map_or(v, |i| cs[i])).collect();

  // initial state cube over current-state vars
  let init_lits: Vec<(u32, bool)> = net.latches.iter().enumerate()
    .map(|(i, l)| (cs[i], net.latch_init.get(l).copied().unwrap_or(false))).collect();
  let mut reached = dd.cube(&init_lits);
  dd.refer(reached);

  let mut iters = 0;
  loop {
    iters += 1;
    let img_ns = match dd.and_abstract(rel, reached, qcube, &mut lim) {
      Some(r) => r,
      None => return Err(Error::Budget { what: "image computation", limit: size_max }) };
    let img = dd.permute(img_ns, &ns2cs);
    let next = dd.or(reached, img);
    if next == reached { break }
    dd.refer(next);
    dd.deref(reached);
    reached = next; }
  debug!("reachability fixpoint after {} iterations", iters);
  let unreach = !reached;
  Ok((dd, unreach, cs)) }
