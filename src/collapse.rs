//! Collapse a network into two-level (or shallow) form: build global
//! BDDs, create one node per combinational output over the CI variables,
//! strip unused supports, and optionally re-extract SOP covers.
use crate::dd::Dd;
use crate::edge::{Edge, I, O};
use crate::err::Result;
use crate::global::{build_global_bdds, GlobalBdds, GlobalParams};
use crate::net::{Func, Net, NetType, ObjId};
use crate::sop::{self, Phase};

#[derive(Debug, Clone)]
pub struct CollapseParams {
  pub bdd_size_max: usize,
  pub reorder: bool,
  /// re-extract SOP covers for the result (otherwise nodes keep BDDs)
  pub to_sop: bool,
  pub verbose: bool }

impl Default for CollapseParams {
  fn default()->CollapseParams {
    CollapseParams { bdd_size_max: 50_000_000, reorder: true,
                     to_sop: true, verbose: false }}}

/// collapse `net` (any logic type) into a two-level network. The input
/// is left unmodified; on any budget failure nothing is produced.
pub fn collapse(net: &mut Net, p: &CollapseParams)->Result<Net> {
  let gp = GlobalParams {
    size_max: p.bdd_size_max,
    reorder: p.reorder,
    verbose: p.verbose,
    ..Default::default() };
  let (glo, ci_names, co_names) = {
    let mut aig;
    let src: &mut Net = if net.ty == NetType::Aig { net } else {
      aig = crate::aig::strash(net);
      &mut aig };
    let glo = build_global_bdds(src, &gp)?;
    let ci_names: Vec<Option<String>> = src.cis().iter()
      .map(|ci| src.names.get(ci).cloned()).collect();
    let co_names: Vec<Option<String>> = src.cos().iter()
      .map(|co| src.names.get(co).cloned()).collect();
    (glo, ci_names, co_names) };
  let GlobalBdds { mut dd, mut cos, ci_vars } = glo;

  // narrow each CO into the interval allowed by the external
  // don't-care network, if one is attached
  if let Some(mut exdc) = net.exdc.take() {
    apply_exdc(&mut exdc, &mut dd, &mut cos, p)?;
    net.exdc = Some(exdc); }

  let mut out = Net::new(&net.name, NetType::LogicBdd);
  out.spec = net.spec.clone();
  let n = ci_names.len();
  // fanin position p of every collapsed node stands for manager
  // variable p; reordering moves levels, never ids, so this pairing
  // survives any reorder
  let mut var_to_ci: Vec<ObjId> = vec![0; n];
  for (i, name) in ci_names.iter().enumerate() {
    let id = out.add_pi(name.as_deref());
    var_to_ci[ci_vars[i] as usize] = id; }

  for (k, name) in co_names.iter().enumerate() {
    let f = cos[k];
    let po = out.add_po(name.as_deref());
    // a CI identity wire propagates without a node
    if let Some((v, compl)) = as_projection(&dd, f) {
      out.add_fanin(po, var_to_ci[v as usize], compl);
      continue }
    let node = out.add_node();
    for v in 0..n { out.add_fanin(node, var_to_ci[v], false); }
    out.obj_mut(node).func = Func::Bdd(f);
    out.add_fanin(po, node, false); }

  out.dd = Some(dd);
  out.minimum_base();
  if p.to_sop { bdd_network_to_sop(&mut out, Phase::Min)?; }
  out.check()?;
  if p.verbose {
    info!("collapse nodes={} type={:?}", out.n_nodes(), out.ty); }
  Ok(out) }

// is f (possibly complemented) the projection of a single variable?
// under the regular-else rule the variable node is stored as (v, O, I),
// so the plain projection is the complemented edge to it.
fn as_projection(dd: &Dd, f: Edge)->Option<(u32, bool)> {
  if f.is_const() { return None }
  let n = dd.node(f.raw());
  if n.hi == O && n.lo == I { Some((n.var, !f.is_inv())) } else { None }}

// build the EXDC network's global BDDs in a scratch manager, transfer
// them over, and replace each CO function with an ISOP of its interval
fn apply_exdc(exdc: &mut Net, dd: &mut Dd, cos: &mut [Edge],
              p: &CollapseParams)->Result<()> {
  let mut exdc_aig;
  let exdc_src: &mut Net = if exdc.ty == NetType::Aig { exdc } else {
    exdc_aig = crate::aig::strash(exdc);
    &mut exdc_aig };
  let gp = GlobalParams { size_max: p.bdd_size_max, ..Default::default() };
  let dcg = build_global_bdds(exdc_src, &gp)?;
  let n_dc = dcg.cos.len();
  for (k, co) in cos.iter_mut().enumerate() {
    // a single-output EXDC network applies to every output
    let dc_src = dcg.cos[if n_dc == 1 { 0 } else { k }];
    let dc = dd.transfer(&dcg.dd, dc_src);
    if dc == O { continue }
    let f = *co;
    let ndc = !dc;
    let lower = dd.and(f, ndc);
    let upper = dd.or(f, dc);
    let (_, g) = dd.isop(lower, upper, None)
      .expect("unbounded isop cannot fail");
    dd.refer(g);
    dd.deref(f);
    *co = g; }
  Ok(()) }

/// convert every BDD-valued node of a Logic-BDD network into an SOP
/// cover (phase chosen per node), turning the network into Logic-SOP.
pub fn bdd_network_to_sop(net: &mut Net, phase: Phase)->Result<()> {
  assert_eq!(net.ty, NetType::LogicBdd);
  let nodes = net.node_ids();
  let mut dd = net.dd.take().expect("Logic-BDD network without a manager");
  for id in nodes {
    let f = match net.obj(id).func {
      Func::Bdd(f) => f,
      _ => continue };
    let nf = net.obj(id).fanins.len();
    let vars: Vec<u32> = (0..nf as u32).collect();
    let cover = sop::from_bdd(&mut dd, f, None, phase, None, &vars)
      .expect("unbounded from_bdd cannot fail");
    let s = net.arena.register(&cover);
    net.obj_mut(id).func = Func::Sop(s); }
  net.ty = NetType::LogicSop;
  net.dd = None;
  Ok(()) }
