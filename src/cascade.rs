//! Rail-constrained LUT cascade synthesis from a truth table.
//!
//! Each stage absorbs a bound set of at most K variables (the previous
//! stage's rails, optional shared variables, and fresh ones) and emits
//! `ceil(log2 mu)` rail signals encoding the distinct bound-set columns;
//! the residual function continues over the free and shared variables
//! plus the new rails. The result is a packed word array: the leading
//! word is the LUT count, and each LUT block is
//! `[block_len, n_fanins, fanin_ids.., out_id, truth_words..]` with
//! `block_len = 3 + n_fanins + words(2^n_fanins)`.
use crate::err::{Error, Result};
use crate::tt;

pub mod cas_map;

#[derive(Debug, Clone)]
pub struct CascadeParams {
  /// LUT input count
  pub k: usize,
  /// rail width between adjacent stages
  pub rails: usize,
  /// retry budget; the bound-set search here is deterministic and
  /// exhaustive, so retries never find anything new
  pub iters: usize,
  /// structural guide: digits separate stages, lowercase letters name
  /// bound variables consumed, uppercase shared variables; the trailing
  /// lowercase group after the last digit is the final free set
  pub guide: Option<String>,
  pub verbose: bool }

impl Default for CascadeParams {
  fn default()->CascadeParams {
    CascadeParams { k: 6, rails: 2, iters: 1, guide: None, verbose: false }}}

/// number of LUTs in a packed cascade.
pub fn count_luts(luts: &[u64])->usize { luts[0] as usize }

/// iterate the packed blocks: (n_fanins, fanins, out_id, truth words).
pub fn blocks(luts: &[u64])->Vec<(usize, Vec<u64>, u64, Vec<u64>)> {
  let mut out = vec![];
  let mut i = 1;
  for _ in 0..luts[0] {
    let blen = luts[i] as usize;
    let nin = luts[i + 1] as usize;
    let fanins = luts[i + 2..i + 2 + nin].to_vec();
    let out_id = luts[i + 2 + nin];
    let truth = luts[i + 3 + nin..i + blen].to_vec();
    debug_assert_eq!(blen, 3 + nin + tt::word_num(nin));
    out.push((nin, fanins, out_id, truth));
    i += blen; }
  out }

/// evaluate a packed cascade into a truth table over `nvars` variables.
pub fn cascade_truth(luts: &[u64], nvars: usize)->Vec<u64> {
  let nw = tt::word_num(nvars);
  let nsignals = nvars + count_luts(luts);
  let mut tables: Vec<Vec<u64>> = (0..nvars).map(|i| tt::var(nvars, i)).collect();
  tables.resize(nsignals, vec![0; nw]);
  let mut last = 0;
  for (nin, fanins, out_id, truth) in blocks(luts) {
    let mut acc = vec![0u64; nw];
    let mut cube = vec![0u64; nw];
    for m in 0..1usize << nin {
      if !tt::get_bit(&truth, m) { continue }
      tt::fill(&mut cube);
      for (v, &fi) in fanins.iter().enumerate() {
        tt::and_compl_assign(&mut cube, &tables[fi as usize], (m >> v) & 1 == 0); }
      tt::or_assign(&mut acc, &cube); }
    tables[out_id as usize] = acc;
    last = out_id as usize; }
  tables.swap_remove(last) }

// append one LUT block to the dump
fn push_lut(out: &mut Vec<u64>, fanins: &[u32], out_id: u64, truth: &[u64]) {
  let nin = fanins.len();
  let nw = tt::word_num(nin);
  out[0] += 1;
  out.push((3 + nin + nw) as u64);
  out.push(nin as u64);
  for &f in fanins { out.push(f as u64); }
  out.push(out_id);
  for w in 0..nw { out.push(truth.get(w).copied().unwrap_or(0)); }}

/// the variables a table over `nvars` actually depends on.
pub fn tt_support(func: &[u64], nvars: usize)->Vec<usize> {
  (0..nvars).filter(|&v| {
    (0..1usize << nvars).any(|m| {
      m & (1 << v) == 0 && tt::get_bit(func, m) != tt::get_bit(func, m | (1 << v)) })})
    .collect() }

// compress a table onto its support, returning (table, kept positions)
fn tt_minimum_base(func: &[u64], nvars: usize)->(Vec<u64>, Vec<usize>) {
  let supp = tt_support(func, nvars);
  if supp.len() == nvars { return (func.to_vec(), supp) }
  let mut out = tt::zeros(supp.len().max(1));
  for m in 0..1usize << supp.len() {
    let mut full = 0usize;
    for (i, &v) in supp.iter().enumerate() {
      if (m >> i) & 1 == 1 { full |= 1 << v }}
    if tt::get_bit(func, full) { tt::set_bit(&mut out, m); }}
  if supp.len() < 6 { out[0] = tt::stretch6(out[0], supp.len().max(1)) }
  (out, supp) }

// the column of `func` over its low `nf` variables at high-part index m
fn column(func: &[u64], nf: usize, m: usize)->Vec<u64> {
  if nf >= 6 {
    let nw = tt::word_num(nf);
    func[m * nw..(m + 1) * nw].to_vec() }
  else {
    let mut col = tt::zeros(nf);
    for f in 0..1usize << nf {
      if tt::get_bit(func, (m << nf) | f) { tt::set_bit(&mut col, f); }}
    col[0] = tt::stretch6(col[0], nf);
    col }}

/// synthesize a rail-constrained cascade of K-LUTs for the function.
/// Returns the packed dump; fails when some stage has no bound set of
/// column multiplicity at most `2^rails`.
pub fn lut_cascade(truth: &[u64], nvars: usize, p: &CascadeParams)->Result<Vec<u64>> {
  assert!(nvars <= 24, "cascade synthesis is limited to 24 variables");
  assert!(p.rails < p.k, "rails must leave room for fresh bound variables");
  debug_assert_eq!(truth.len(), tt::word_num(nvars));

  let (mut func, supp) = tt_minimum_base(truth, nvars);
  let mut var_ids: Vec<u32> = supp.iter().map(|&v| v as u32).collect();
  if var_ids.is_empty() {
    // constant function: a single 0-input LUT
    let mut out = vec![0u64];
    let t = if truth[0] & 1 == 1 { !0u64 } else { 0 };
    push_lut(&mut out, &[], nvars as u64, &[t]);
    return Ok(out) }
  if p.verbose && var_ids.len() < nvars {
    info!("cascade: support reduced {} -> {}", nvars, var_ids.len()); }

  let mut out = vec![0u64];
  let mut next_id = nvars as u64;
  let mut rail_ids: Vec<u32> = vec![];
  let mut stage = 0usize;
  while var_ids.len() > p.k {
    let nv = var_ids.len();
    let (bound_pos, shared_ids) = choose_bound(
      &func, &var_ids, &rail_ids, p, stage)?;
    // reorder: [free..., bound-minus-shared..., shared...]
    let mut bmask = 0u64;
    for &b in &bound_pos { bmask |= 1 << b }
    tt::move_mask_to_back(&mut func, nv, bmask, Some(&mut var_ids));
    let mut smask = 0u64;
    for &s in &shared_ids {
      let pos = var_ids.iter().position(|&v| v == s).expect("shared var lost");
      smask |= 1 << pos; }
    tt::move_mask_to_back(&mut func, nv, smask, Some(&mut var_ids));

    let nb = bound_pos.len();
    let ns = shared_ids.len();
    if nb == 0 || nb == ns {
      return Err(Error::Malformed(format!(
        "stage {} consumes no fresh bound variables", stage))) }
    let nu = nb - ns;
    let nf = nv - nb;

    // per shared minterm: distinct columns and their codes
    let mut mu = 0usize;
    let mut stores: Vec<Vec<Vec<u64>>> = Vec::with_capacity(1 << ns);
    let mut codes: Vec<Vec<usize>> = Vec::with_capacity(1 << ns);
    for s in 0..1usize << ns {
      let mut store: Vec<Vec<u64>> = vec![];
      let mut code = Vec::with_capacity(1 << nu);
      for m in 0..1usize << nu {
        let col = column(&func, nf, m + (s << nu));
        let ix = match store.iter().position(|c| c == &col) {
          Some(ix) => ix,
          None => { store.push(col); store.len() - 1 }};
        code.push(ix); }
      mu = mu.max(store.len());
      stores.push(store);
      codes.push(code); }
    if mu > 1 << p.rails {
      return Err(Error::NoDecomposition(format!(
        "stage {}: column multiplicity {} exceeds 2^{} rails", stage, mu, p.rails))) }
    let ne = ceil_log2(mu);
    if p.verbose {
      info!("cascade stage={} bound={} shared={} mu={} rails={}",
            stage, nb, ns, mu, ne); }

    // rail truth tables over the bound set [B\S, S]
    let bound_ids: Vec<u32> = var_ids[nf..].to_vec();
    for e in 0..ne {
      let mut rt = tt::zeros(nb);
      for s in 0..1usize << ns {
        for m in 0..1usize << nu {
          if (codes[s][m] >> e) & 1 == 1 { tt::set_bit(&mut rt, m + (s << nu)); }}}
      if nb < 6 { rt[0] = tt::stretch6(rt[0], nb) }
      push_lut(&mut out, &bound_ids, next_id, &rt);
      next_id += 1; }

    // residual over [free, shared, rails]
    let new_nv = nf + ns + ne;
    let mut res = tt::zeros(new_nv);
    for e_code in 0..1usize << ne {
      for s in 0..1usize << ns {
        let store = &stores[s];
        // codes beyond the column count repeat the last column
        let col = &store[e_code.min(store.len() - 1)];
        for f in 0..1usize << nf {
          if tt::get_bit(col, f) {
            tt::set_bit(&mut res, f + (s << nf) + (e_code << (nf + ns))); }}}}
    if new_nv < 6 { res[0] = tt::stretch6(res[0], new_nv) }
    func = res;
    let mut ids = var_ids[..nf].to_vec();
    ids.extend_from_slice(&var_ids[nf + nu..]); // shared keep their ids
    rail_ids = (0..ne).map(|e| (next_id - ne as u64 + e as u64) as u32).collect();
    ids.extend_from_slice(&rail_ids);
    var_ids = ids;
    stage += 1; }

  // final stage: one LUT over the remaining inputs
  push_lut(&mut out, &var_ids, next_id, &func);
  if p.verbose {
    info!("cascade done luts={} stages={}", count_luts(&out), stage + 1); }
  Ok(out) }

// pick the bound set (and shared set) for the current stage: from the
// guide when given, otherwise by searching all K-subsets containing the
// previous rails for minimum column multiplicity
fn choose_bound(func: &[u64], var_ids: &[u32], rail_ids: &[u32],
                p: &CascadeParams, stage: usize)->Result<(Vec<usize>, Vec<u32>)> {
  let nv = var_ids.len();
  if let Some(g) = &p.guide {
    let (bound_vars, shared_vars) = parse_guide(g, stage)?;
    let mut bound_pos = vec![];
    for v in &bound_vars {
      match var_ids.iter().position(|&x| x == *v) {
        Some(pos) => bound_pos.push(pos),
        None => return Err(Error::Malformed(format!(
          "guide stage {} names variable {} which is not live", stage, v))) }}
    if bound_pos.len() > p.k {
      return Err(Error::Malformed(format!(
        "guide stage {} consumes more than {} variables", stage, p.k))) }
    return Ok((bound_pos, shared_vars)) }

  // rails from the previous stage anchor the bound set
  let rail_pos: Vec<usize> = (0..nv)
    .filter(|&i| rail_ids.contains(&var_ids[i])).collect();
  let others: Vec<usize> = (0..nv)
    .filter(|&i| !rail_ids.contains(&var_ids[i])).collect();
  let pick = p.k - rail_pos.len();
  let mut best: Option<(usize, Vec<usize>)> = None;
  let mut cur = vec![];
  subsets_rec(&others, pick, 0, &mut cur, &mut |subset| {
    let mut bound: Vec<usize> = rail_pos.clone();
    bound.extend_from_slice(subset);
    let mu = multiplicity(func, nv, &bound);
    if mu <= 1 << p.rails && best.as_ref().map_or(true, |(bm, _)| mu < *bm) {
      best = Some((mu, bound)); }});
  match best {
    Some((_, bound)) => Ok((bound, vec![])),
    None => Err(Error::NoDecomposition(format!(
      "stage {}: no rail-admissible bound set", stage))) }}

// column multiplicity of the function over the given bound positions
fn multiplicity(func: &[u64], nv: usize, bound: &[usize])->usize {
  let mut f = func.to_vec();
  let mut perm: Vec<u32> = (0..nv as u32).collect();
  let mut mask = 0u64;
  for &b in bound { mask |= 1 << b }
  tt::move_mask_to_back(&mut f, nv, mask, Some(&mut perm));
  let nf = nv - bound.len();
  let mut store: Vec<Vec<u64>> = vec![];
  for m in 0..1usize << bound.len() {
    let col = column(&f, nf, m);
    if !store.contains(&col) { store.push(col); }}
  store.len() }

fn subsets_rec(items: &[usize], pick: usize, from: usize,
               cur: &mut Vec<usize>, f: &mut impl FnMut(&[usize])) {
  if cur.len() == pick { f(cur); return }
  for i in from..items.len() {
    cur.push(items[i]);
    subsets_rec(items, pick, i + 1, cur, f);
    cur.pop(); }}

// guide syntax: digits separate stages; per stage, lowercase letters are
// bound variables consumed, uppercase letters shared variables visible
// later; the lowercase-only group after the last digit is the final
// free set
fn parse_guide(guide: &str, stage: usize)->Result<(Vec<u32>, Vec<u32>)> {
  let mut seen_digits = 0usize;
  let mut chars = guide.chars();
  while let Some(c) = chars.next() {
    if c.is_ascii_digit() {
      if seen_digits == stage { break }
      seen_digits += 1; }}
  if seen_digits != stage {
    return Err(Error::Malformed(format!("guide has no stage {}", stage))) }
  let mut bound = vec![];
  let mut shared = vec![];
  for c in chars {
    if c.is_ascii_digit() { break }
    if c.is_ascii_lowercase() { bound.push(c as u32 - 'a' as u32); }
    else if c.is_ascii_uppercase() {
      let v = c as u32 - 'A' as u32;
      bound.push(v);
      shared.push(v); }
    else {
      return Err(Error::Malformed(format!("bad guide character {:?}", c))) }}
  Ok((bound, shared)) }

fn ceil_log2(n: usize)->usize {
  debug_assert!(n > 0);
  (usize::BITS - (n - 1).leading_zeros()) as usize }

include!("test-cascade.rs");
