//! Two-level covers: tri-valued cubes with a phase tag, plus the
//! per-network arena that interns cover strings.
//!
//! A cover is text, one cube per line: `n` characters from `{0,1,-}`,
//! a space, and a phase tag. Tag `1` means the line contributes its
//! product to the onset; tag `0` on every line means the whole sum is
//! complemented. Tag `x`/`n` marks a pure-EXOR cover: the function is
//! the parity of the cube's `0`/`1` positions (`n` = complemented
//! parity). Constants are the zero-variable covers `" 1\n"` and `" 0\n"`.
use fxhash::FxHashMap;
use crate::dd::{Dd, Term};
use crate::edge::{Edge, I, O};

/// Handle of an interned cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SopId(pub u32);

/// Interns cover strings by exact contents. Append-only during a pass;
/// reclaimed only when the owning network is dropped or rebuilt.
#[derive(Debug, Default)]
pub struct Arena {
  pool: Vec<String>,
  index: FxHashMap<String, u32> }

impl Arena {
  pub fn new()->Arena { Arena::default() }
  pub fn len(&self)->usize { self.pool.len() }
  pub fn is_empty(&self)->bool { self.pool.is_empty() }

  /// intern a cover string.
  pub fn register(&mut self, s: &str)->SopId {
    if let Some(&ix) = self.index.get(s) { return SopId(ix) }
    let ix = self.pool.len() as u32;
    self.pool.push(s.to_string());
    self.index.insert(s.to_string(), ix);
    SopId(ix) }

  pub fn get(&self, id: SopId)->&str { &self.pool[id.0 as usize] }}

// --- cover queries ---------------------------------------------------------

/// number of variables (cube width) of the cover.
pub fn var_count(s: &str)->usize {
  s.lines().next().map_or(0, |l| l.find(' ').unwrap_or(l.len())) }

/// number of cubes in the cover.
pub fn cube_count(s: &str)->usize { s.lines().count() }

/// number of literals (non-dash positions) over all cubes.
pub fn lit_count(s: &str)->usize {
  s.lines().map(|l| l.chars().take_while(|&c| c != ' ')
                .filter(|&c| c != '-').count()).sum() }

fn tag(s: &str)->char {
  s.lines().next().and_then(|l| l.chars().last()).unwrap_or('1') }

/// overall phase: false when the sum as written is complemented.
pub fn phase(s: &str)->bool { matches!(tag(s), '1' | 'x') }

/// is this cover the EXOR marker form?
pub fn is_exor_type(s: &str)->bool { matches!(tag(s), 'x' | 'n') }

pub fn is_const0(s: &str)->bool { s == " 0\n" }
pub fn is_const1(s: &str)->bool { s == " 1\n" }

/// does the cover compute a plain buffer / inverter of its only input?
pub fn is_buf(s: &str)->bool { s == "1 1\n" || s == "0 0\n" }
pub fn is_inv(s: &str)->bool { s == "0 1\n" || s == "1 0\n" }

// --- cover constructors ----------------------------------------------------

pub fn create_const0()->String { " 0\n".to_string() }
pub fn create_const1()->String { " 1\n".to_string() }

/// single-cube AND of `n` literals; `compl[i]` selects the negative one.
pub fn create_and(n: usize, compl: Option<&[bool]>)->String {
  let mut s = String::with_capacity(n + 3);
  for i in 0..n {
    let neg = compl.map_or(false, |c| c[i]);
    s.push(if neg { '0' } else { '1' }); }
  s.push_str(" 1\n");
  s }

/// OR of `n` literals, one cube per literal.
pub fn create_or(n: usize, compl: Option<&[bool]>)->String {
  let mut s = String::new();
  for i in 0..n {
    for j in 0..n {
      if i == j {
        let neg = compl.map_or(false, |c| c[i]);
        s.push(if neg { '0' } else { '1' }); }
      else { s.push('-') }}
    s.push_str(" 1\n"); }
  s }

/// the parity of `n` inputs (complemented when `inv`).
pub fn create_exor(n: usize, inv: bool)->String {
  let mut s = String::with_capacity(n + 3);
  for _ in 0..n { s.push('1') }
  s.push(' ');
  s.push(if inv { 'n' } else { 'x' });
  s.push('\n');
  s }

/// buffer or inverter of a single input.
pub fn create_buf(inv: bool)->String {
  if inv { "0 1\n".to_string() } else { "1 1\n".to_string() }}

/// flip the overall phase of a cover (complement the function).
pub fn complement(s: &str)->String {
  let mut out = String::with_capacity(s.len());
  for line in s.lines() {
    let mut chars: Vec<char> = line.chars().collect();
    let last = chars.len() - 1;
    chars[last] = match chars[last] {
      '0' => '1', '1' => '0', 'x' => 'n', _ => 'x' };
    out.extend(chars);
    out.push('\n'); }
  out }

// --- conversion to and from BDDs ------------------------------------------

/// phase choice for `from_bdd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase { Pos, Neg, Min }

/// materialize a cover into a DD, with `vars[i]` standing for cube
/// position `i`.
pub fn to_bdd(dd: &mut Dd, s: &str, vars: &[Edge])->Edge {
  let n = var_count(s);
  debug_assert!(vars.len() >= n);
  if is_const0(s) { return O }
  if is_const1(s) { return I }
  if is_exor_type(s) {
    let line = s.lines().next().unwrap_or("");
    let mut f = O;
    for (i, c) in line.chars().take(n).enumerate() {
      if c == '-' { continue }
      let v = vars[i].inv_if(c == '0');
      f = dd.xor(f, v); }
    return f.inv_if(!phase(s)) }
  let mut sum = O;
  for line in s.lines() {
    let mut cube = I;
    for (i, c) in line.chars().take(n).enumerate() {
      match c {
        '1' => cube = dd.and(cube, vars[i]),
        '0' => { let nv = !vars[i]; cube = dd.and(cube, nv) }
        _ => {}}}
    sum = dd.or(sum, cube); }
  sum.inv_if(!phase(s)) }

/// extract an irredundant cover for any function in the interval
/// `[f & !dc, f | dc]`. Cube position `i` corresponds to variable
/// `vars[i]`. Fails when the ISOP exceeds `max_cubes`.
pub fn from_bdd(dd: &mut Dd, f: Edge, dc: Option<Edge>, phase_choice: Phase,
                max_cubes: Option<usize>, vars: &[u32])->Option<String> {
  let ndc = dc.map_or(O, |d| d);
  let pos = |dd: &mut Dd, max: Option<usize>| {
    let l = dd.and(f, !ndc);
    let u = dd.or(f, ndc);
    dd.isop(l, u, max) };
  let neg = |dd: &mut Dd, max: Option<usize>| {
    let l = dd.and(!f, !ndc);
    let u = dd.or(!f, ndc);
    dd.isop(l, u, max) };
  let (cubes, tag) = match phase_choice {
    Phase::Pos => (pos(dd, max_cubes)?.0, '1'),
    Phase::Neg => (neg(dd, max_cubes)?.0, '0'),
    Phase::Min => {
      // take the smaller of the two phases; either alone may still fail
      // the cube ceiling while the other fits
      match (pos(dd, max_cubes), neg(dd, max_cubes)) {
        (Some((p, _)), Some((q, _))) =>
          if q.len() < p.len() { (q, '0') } else { (p, '1') },
        (Some((p, _)), None) => (p, '1'),
        (None, Some((q, _))) => (q, '0'),
        (None, None) => return None }}};
  Some(cover_from_terms(&cubes, vars, tag)) }

/// render ISOP terms into a cover string over the given fanin order.
pub fn cover_from_terms(terms: &[Term], vars: &[u32], tag: char)->String {
  if terms.is_empty() {
    return if tag == '1' { create_const0() } else { create_const1() }}
  if terms.len() == 1 && terms[0].is_empty() {
    return if tag == '1' { create_const1() } else { create_const0() }}
  let pos_of: FxHashMap<u32, usize> =
    vars.iter().enumerate().map(|(i, &v)| (v, i)).collect();
  let mut s = String::new();
  for t in terms {
    let mut cube = vec!['-'; vars.len()];
    for &(v, positive) in t {
      let i = pos_of[&v];
      cube[i] = if positive { '1' } else { '0' }}
    s.extend(cube);
    s.push(' ');
    s.push(tag);
    s.push('\n'); }
  s }

/// drop variables that appear in no cube. Returns the compacted cover
/// and the surviving positions (ascending); the caller must compact the
/// fanin list the same way.
pub fn minimum_base(s: &str)->(String, Vec<usize>) {
  let n = var_count(s);
  if is_exor_type(s) {
    // every 0/1 position of an exor cover is in its support
    let line = s.lines().next().unwrap_or("");
    let keep: Vec<usize> = line.chars().take(n).enumerate()
      .filter(|&(_, c)| c != '-').map(|(i, _)| i).collect();
    if keep.len() == n { return (s.to_string(), keep) }
    let mut out = String::new();
    for &i in &keep { out.push(line.chars().nth(i).unwrap()) }
    out.push(' ');
    out.push(tag(s));
    out.push('\n');
    return (out, keep) }
  let mut used = vec![false; n];
  for line in s.lines() {
    for (i, c) in line.chars().take(n).enumerate() {
      if c != '-' { used[i] = true }}}
  let keep: Vec<usize> = (0..n).filter(|&i| used[i]).collect();
  if keep.len() == n { return (s.to_string(), keep) }
  if keep.is_empty() {
    // the cover is a constant (possibly a tautology written wide)
    let one_cube = cube_count(s) >= 1;
    return (if one_cube == phase(s) { create_const1() } else { create_const0() },
            keep) }
  let mut out = String::new();
  for line in s.lines() {
    let chars: Vec<char> = line.chars().collect();
    for &i in &keep { out.push(chars[i]) }
    out.push(' ');
    out.push(*chars.last().unwrap());
    out.push('\n'); }
  (out, keep) }


#[test] fn test_sop_queries() {
  let s = "01- 1\n--1 1\n";
  assert_eq!(var_count(s), 3);
  assert_eq!(cube_count(s), 2);
  assert_eq!(lit_count(s), 3);
  assert!(phase(s));
  assert!(!is_exor_type(s));
  assert!(is_const1(&create_const1()));
  assert!(is_const0(&create_const0()));
  assert_eq!(create_and(3, None), "111 1\n");
  assert_eq!(create_or(2, None), "1- 1\n-1 1\n");
  assert!(is_exor_type(&create_exor(2, false))); }

#[test] fn test_minimum_base() {
  let (s, keep) = minimum_base("0-1- 1\n--1- 1\n");
  assert_eq!(s, "01 1\n-1 1\n");
  assert_eq!(keep, vec![0, 2]);
  // idempotent
  let (s2, keep2) = minimum_base(&s);
  assert_eq!(s2, s);
  assert_eq!(keep2, vec![0, 1]); }

#[test] fn test_sop_bdd_roundtrip() {
  let mut dd = Dd::new(3);
  let vars: Vec<_> = (0..3).map(|i| dd.ith_var(i)).collect();
  let s = "11- 1\n--1 1\n";
  let f = to_bdd(&mut dd, s, &vars);
  let back = from_bdd(&mut dd, f, None, Phase::Pos, None, &[0, 1, 2]).unwrap();
  let f2 = to_bdd(&mut dd, &back, &vars);
  assert_eq!(f, f2); }
