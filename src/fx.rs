//! Fast extract: iteratively find the highest-weight single- and
//! double-cube divisors of a multi-output SOP network and substitute
//! them, creating one new node per accepted divisor.
//!
//! The engine owns a sparse cube x literal matrix for the duration of a
//! pass; covers are written back only after the heap drains, so a
//! malformed input (duplicate cubes, containment) aborts with the
//! network untouched.
use fxhash::FxHashSet;
use crate::err::{Error, Result};
use crate::net::{Func, Net, NetType, ObjId};
use crate::sop;

pub(crate) const NIL: u32 = u32::MAX;

pub mod fx_heap;
pub mod fx_matrix;
mod fx_pair;
mod fx_single;
mod fx_update;
mod fx_select;

pub use fx_matrix::Matrix;
pub use fx_select::LOOKAHEAD;

#[derive(Debug, Clone)]
pub struct FxParams {
  /// restrict extraction to single-cube divisors
  pub only_single: bool,
  /// restrict extraction to double-cube divisors
  pub only_double: bool,
  /// accept weight-0 extractions
  pub use_zero: bool,
  /// enable the single+double complement pair optimization
  pub use_compl: bool,
  /// stop after this many extractions
  pub nodes_ext: usize,
  /// ceiling on collected single-cube divisors
  pub single_max: usize,
  /// ceiling on candidate cube pairs
  pub pairs_max: usize,
  /// keep extracting while the best weight exceeds this
  pub weight_min: i64,
  /// skip divisors with more than this many literals (0 = no limit)
  pub lit_count_max: usize,
  /// restrict to AND/XOR/MUX canonical divisors
  pub canon_divs: bool,
  pub verbose: bool }

impl Default for FxParams {
  fn default()->FxParams {
    FxParams { only_single: false, only_double: false, use_zero: false,
               use_compl: false, nodes_ext: 10_000, single_max: 20_000,
               pairs_max: 30_000, weight_min: 0, lit_count_max: 0,
               canon_divs: false, verbose: false }}}

/// run fast extract over every SOP cover of the network. Returns the
/// number of divisors extracted; the network is rewritten in place only
/// when at least one extraction happened.
pub fn fast_extract(net: &mut Net, p: &FxParams)->Result<usize> {
  assert_eq!(net.ty, NetType::LogicSop, "fast extract runs on SOP networks");
  let n0 = net.objs.len();
  let eligible = collect_eligible(net);
  if eligible.is_empty() {
    debug!("fx: no non-trivial covers");
    return Ok(0) }

  let mut m = build_matrix(net, &eligible, p)?;
  if p.verbose {
    info!("fx matrix vars={} cubes={} lits={} singles={} doubles={}",
          m.vars.len(), m.cubes.len(), m.n_entries,
          m.heap_s.len(), m.heap_d.len()); }

  let accept = |w: Option<i64>| match w {
    None => false,
    Some(w) => w > p.weight_min || (w == 0 && p.use_zero) };

  let mut ext = 0usize;
  while ext < p.nodes_ext {
    if p.only_single {
      let w = m.heap_s.max_weight();
      if !accept(w) { break }
      debug!("fx ext {} single weight={}", ext, w.unwrap_or(0));
      m.update_single()?; }
    else if p.only_double {
      let w = m.heap_d.max_weight();
      if !accept(w) { break }
      debug!("fx ext {} double weight={}", ext, w.unwrap_or(0));
      m.update_double()?; }
    else if !p.use_compl {
      let w1 = m.heap_s.max_weight();
      let w2 = m.heap_d.max_weight();
      if w1 >= w2 {
        if !accept(w1) { break }
        m.update_single()?; }
      else {
        if !accept(w2) { break }
        m.update_double()?; }}
    else {
      let (w3, s, d) = m.select_compl();
      let w = if w3 == i64::MIN { None } else { Some(w3) };
      if !accept(w) { break }
      if s == NIL { m.update_double()?; }
      else if d == NIL { m.update_single()?; }
      else { m.update_compl(s, d)?; }}
    ext += 1; }

  if p.verbose {
    info!("fx extracted={} singles={} doubles={} compl={}",
          ext, m.n_divs1, m.n_divs2, m.n_divs3); }
  if ext == p.nodes_ext {
    warn!("fx: the limit on extracted divisors has been reached"); }
  if ext > 0 { write_covers(&m, net, n0); net.check()?; }
  Ok(ext) }

// internal nodes whose covers take part in the extraction
fn collect_eligible(net: &Net)->Vec<ObjId> {
  net.node_ids().into_iter().filter(|&id| {
    let o = net.obj(id);
    if o.fanins.len() < 2 { return false }
    match o.func {
      Func::Sop(s) => {
        let cover = net.arena.get(s);
        sop::cube_count(cover) > 0 && !sop::is_exor_type(cover)
          && !sop::is_const0(cover) && !sop::is_const1(cover) }
      _ => false }}).collect() }

fn build_matrix(net: &Net, eligible: &[ObjId], p: &FxParams)->Result<Matrix> {
  let mut m = Matrix::new();
  m.lit_cap = p.lit_count_max;
  m.canon = p.canon_divs;
  // two columns per object, present or future
  for obj in 0..net.objs.len() as u32 {
    m.add_var(obj, false);
    m.add_var(obj, true); }

  // total intra-node pair count decides whether pairs are filtered
  let mut n_pairs_total = 0usize;
  for &id in eligible {
    let nc = sop::cube_count(net.sop(id));
    n_pairs_total += nc * (nc - 1) / 2; }

  // rows and literals, with fanins visited in ascending object order
  for &id in eligible {
    let cover = net.sop(id).to_string();
    let o = net.obj(id);
    if o.fanins.iter().map(|f| f.id).collect::<FxHashSet<_>>().len()
       != o.fanins.len() {
      return Err(Error::Malformed(format!("node {} has duplicated fanins", id))) }
    let mut order: Vec<usize> = (0..o.fanins.len()).collect();
    order.sort_by_key(|&k| o.fanins[k].id);
    let out_var = 2 * id + 1;
    for line in cover.lines() {
      let chars: Vec<char> = line.chars().collect();
      let cube = m.add_cube(out_var);
      for &k in &order {
        let col = match chars[k] {
          '1' => 2 * o.fanins[k].id,
          '0' => 2 * o.fanins[k].id + 1,
          _ => continue };
        m.add_literal(cube, col); }}
    m.pair_storage_alloc(out_var);
    if n_pairs_total <= p.pairs_max {
      let cubes = m.vars[out_var as usize].cubes.clone();
      for i in 0..cubes.len() {
        for j in i + 1..cubes.len() {
          m.add_divisor(cubes[i], cubes[j])?; }}}}

  // too many pairs: keep only those with the fewest differing
  // positions, cutting the histogram off at the pair budget
  if n_pairs_total > p.pairs_max {
    preprocess_pairs(net, eligible, &mut m, n_pairs_total, p.pairs_max)?; }

  m.compute_singles(Some(p.single_max));
  Ok(m) }

fn preprocess_pairs(net: &Net, eligible: &[ObjId], m: &mut Matrix,
                    n_total: usize, n_max: usize)->Result<()> {
  // distance of every intra-node cube pair, in cover order
  let mut diffs: Vec<u32> = Vec::with_capacity(n_total);
  let mut max_fanins = 0;
  for &id in eligible {
    let cover = net.sop(id);
    let n = sop::var_count(cover);
    max_fanins = max_fanins.max(n);
    let lines: Vec<&str> = cover.lines().collect();
    for i in 0..lines.len() {
      for j in i + 1..lines.len() {
        let d = lines[i].chars().take(n).zip(lines[j].chars().take(n))
          .filter(|(a, b)| a != b).count() as u32;
        diffs.push(d); }}}
  debug_assert_eq!(diffs.len(), n_total);

  let mut hist = vec![0usize; 2 * max_fanins + 1];
  for &d in &diffs { hist[d as usize] += 1 }
  if hist[0] != 0 {
    return Err(Error::Malformed("covers contain duplicated cubes".into())) }
  if hist.len() > 1 && hist[1] != 0 {
    return Err(Error::Malformed("covers are not single-cube-containment free".into())) }
  let (mut cutoff, mut quota) = (0u32, 0usize);
  let mut sum = 0usize;
  for (k, &h) in hist.iter().enumerate() {
    sum += h;
    if sum >= n_max {
      cutoff = k as u32;
      quota = h - (sum - n_max);
      break }}
  if sum < n_max { cutoff = 2 * max_fanins as u32; quota = usize::MAX }

  info!("fx pair filter: total={} kept<={} cutoff={}", n_total, n_max, cutoff);
  let mut at_cut = 0usize;
  let mut k = 0usize;
  for &id in eligible {
    let out_var = 2 * id + 1;
    let cubes = m.vars[out_var as usize].cubes.clone();
    for i in 0..cubes.len() {
      for j in i + 1..cubes.len() {
        let d = diffs[k];
        k += 1;
        let take = if d < cutoff { true }
        else if d == cutoff && at_cut < quota { at_cut += 1; true }
        else { false };
        if take { m.add_divisor(cubes[i], cubes[j])?; }}}}
  Ok(()) }

// rebuild the covers of every node the extraction touched and install
// the extracted nodes, in canonical fanin order
fn write_covers(m: &Matrix, net: &mut Net, n0: usize) {
  let n_new = m.vars.len() / 2 - n0;
  // the k-th extracted column pair becomes one new network node
  let mut new_objs: Vec<ObjId> = Vec::with_capacity(n_new);
  for _ in 0..n_new { new_objs.push(net.add_node()); }
  let col_obj = |col: u32| {
    let nx = (col / 2) as usize;
    if nx < n0 { nx as ObjId } else { new_objs[nx - n0] }};

  for nx in 0..m.vars.len() as u32 / 2 {
    let out_var = 2 * nx + 1;
    let v = &m.vars[out_var as usize];
    if v.cubes.is_empty() { continue }
    let is_new = (nx as usize) >= n0;
    if !is_new {
      // untouched covers keep their cover and fanins
      let touched = v.cubes.iter().any(|&c| {
        let tail = m.cubes[c as usize].tail;
        tail != NIL && m.lits[tail as usize].var >= 2 * n0 as u32 });
      if !touched { continue }}
    let obj = col_obj(out_var);

    // support in ascending object order
    let mut support: Vec<ObjId> = vec![];
    let mut seen = FxHashSet::default();
    for &c in &v.cubes {
      for col in m.row_vars(c) {
        let s = col_obj(col);
        if seen.insert(s) { support.push(s); }}}
    support.sort_unstable();
    let pos_of: fxhash::FxHashMap<ObjId, usize> =
      support.iter().enumerate().map(|(i, &s)| (s, i)).collect();

    // phase of the original cover survives the rewrite
    let keep_phase = if is_new { true } else {
      match net.obj(obj).func {
        Func::Sop(s) => sop::phase(net.arena.get(s)),
        _ => true }};

    let mut cover = String::new();
    for &c in &v.cubes {
      if m.cubes[c as usize].n_lits == 0 { continue }
      let mut chars = vec!['-'; support.len()];
      for col in m.row_vars(c) {
        let neg = m.vars[col as usize].neg;
        chars[pos_of[&col_obj(col)]] = if neg { '0' } else { '1' }}
      cover.extend(chars);
      cover.push_str(if keep_phase { " 1\n" } else { " 0\n" }); }

    let sid = net.arena.register(&cover);
    net.clear_fanins(obj);
    for &s in &support { net.add_fanin(obj, s, false); }
    net.obj_mut(obj).func = Func::Sop(sid); }

  net.update_levels();
  debug!("fx writeback: {} new nodes", n_new); }

include!("test-fx.rs");
