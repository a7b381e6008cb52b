//! Cube pairs and double-cube divisors: canonical form, fingerprint,
//! structural identity, and registration into the divisor table.
use crate::err::{Error, Result};
use super::fx_matrix::{Matrix, Pair};
use super::NIL;

// offsets into the prime table for the two sides of a pair
const SIDE1: usize = 100;
const SIDE2: usize = 200;

impl Matrix {

  /// order the two cubes of a pair canonically: the cube whose first
  /// non-base literal has the smaller column is "cube 1".
  pub fn pair_canonicize(&self, c1: u32, c2: u32)->(u32, u32) {
    let r1 = self.row_vars(c1);
    let r2 = self.row_vars(c2);
    let (mut i, mut j) = (0, 0);
    loop {
      match (r1.get(i), r2.get(j)) {
        (Some(&a), Some(&b)) if a == b => { i += 1; j += 1; }
        (Some(&a), Some(&b)) => return if a < b { (c1, c2) } else { (c2, c1) },
        (Some(_), None) => return (c2, c1),
        (None, Some(_)) => return (c1, c2),
        (None, None) => return (c1, c2) }}}

  /// fingerprint of the divisor a canonical pair witnesses, plus the
  /// base and per-cube non-base literal counts. Position-keyed primes on
  /// disjoint offsets per side; collisions resolved structurally.
  pub fn pair_hash_key(&self, c1: u32, c2: u32)->(u64, u32, u32, u32) {
    let r1 = self.row_vars(c1);
    let r2 = self.row_vars(c2);
    let (mut i, mut j) = (0, 0);
    let (mut n_base, mut n1, mut n2) = (0u32, 0u32, 0u32);
    let mut key = 0u64;
    loop {
      match (r1.get(i), r2.get(j)) {
        (Some(&a), Some(&b)) if a == b => { i += 1; j += 1; n_base += 1; }
        (Some(&a), Some(&b)) if a < b => {
          key ^= self.primes[SIDE1 + n1 as usize].wrapping_mul(a as u64);
          i += 1; n1 += 1; }
        (Some(_), Some(&b)) => {
          key ^= self.primes[SIDE2 + n2 as usize].wrapping_mul(b as u64);
          j += 1; n2 += 1; }
        (Some(&a), None) => {
          key ^= self.primes[SIDE1 + n1 as usize].wrapping_mul(a as u64);
          i += 1; n1 += 1; }
        (None, Some(&b)) => {
          key ^= self.primes[SIDE2 + n2 as usize].wrapping_mul(b as u64);
          j += 1; n2 += 1; }
        (None, None) => break }}
    (key, n_base, n1, n2) }

  /// fingerprint from explicit column lists (complement lookups).
  pub fn hash_key_arrays(&self, vars1: &[u32], vars2: &[u32])->u64 {
    let mut key = 0u64;
    for (i, &v) in vars1.iter().enumerate() {
      key ^= self.primes[SIDE1 + i].wrapping_mul(v as u64); }
    for (i, &v) in vars2.iter().enumerate() {
      key ^= self.primes[SIDE2 + i].wrapping_mul(v as u64); }
    key }

  /// the non-base column lists of a pair's two cubes.
  pub fn pair_sides(&self, pair: u32)->(Vec<u32>, Vec<u32>) {
    let p = self.pairs[pair as usize];
    let r1 = self.row_vars(p.cube1);
    let r2 = self.row_vars(p.cube2);
    non_base(&r1, &r2) }

  /// do two pairs witness the same divisor?
  pub fn pair_equal(&self, pa: u32, pb: u32)->bool {
    let a = self.pairs[pa as usize];
    let b = self.pairs[pb as usize];
    if a.n_lits1 != b.n_lits1 || a.n_lits2 != b.n_lits2 { return false }
    self.pair_sides(pa) == self.pair_sides(pb) }

  /// do explicit side lists match a stored pair's divisor?
  pub fn pair_matches(&self, pair: u32, vars1: &[u32], vars2: &[u32])->bool {
    let (s1, s2) = self.pair_sides(pair);
    s1 == vars1 && s2 == vars2 }

  /// register the divisor witnessed by the cubes (c1, c2), creating the
  /// pair, finding or creating the divisor, and updating the heap.
  /// Inputs must be distance-2 or more: distance 0 means duplicated
  /// cubes, distance 1 a single-cube containment.
  pub fn add_divisor(&mut self, c1: u32, c2: u32)->Result<()> {
    let (c1, c2) = self.pair_canonicize(c1, c2);
    let (key, n_base, n1, n2) = self.pair_hash_key(c1, c2);
    if n1 == 0 && n2 == 0 {
      return Err(Error::Malformed("duplicated cubes in a cover".into())) }
    if n1 == 0 || n2 == 0 {
      return Err(Error::Malformed("cover is not single-cube-containment free".into())) }
    if self.lit_cap > 0 && (n1 + n2) as usize > self.lit_cap { return Ok(()) }
    if self.canon && !self.canon_shape(c1, c2, n1, n2) { return Ok(()) }
    let pair = self.alloc_pair(Pair {
      cube1: c1, cube2: c2, n_lits1: n1, n_lits2: n2, n_base,
      div: NIL, div_pos: NIL });
    // find an existing divisor by fingerprint, then structurally
    let mut found = NIL;
    if let Some(list) = self.div_table.get(&key) {
      let candidates: Vec<u32> = list.clone();
      for d in candidates {
        let probe = *self.divs[d as usize].pairs.last()
          .expect("divisor with no pairs left in the table");
        if self.pair_equal(pair, probe) { found = d; break }}}
    let div = if found != NIL { found }
    else {
      let d = self.alloc_div(key);
      // the new node itself costs one cube of n1+n2 literals
      self.divs[d as usize].weight = -((n1 + n2) as i64);
      d };
    self.div_push_pair(div, pair);
    // register the pair in its cover's grid
    let var = self.cubes[c1 as usize].var;
    let (i1, i2) = (self.cubes[c1 as usize].icube, self.cubes[c2 as usize].icube);
    self.pair_set(var, i1, i2, pair);
    // each pair saves its two cubes minus the one new cube and base copy
    self.divs[div as usize].weight += (n1 + n2 - 1 + n_base) as i64;
    let w = self.divs[div as usize].weight;
    if found != NIL { self.heap_d.update(div, w); }
    else { self.heap_d.insert(div, w); }
    Ok(()) }

  // AND (one literal per side), or a two-by-two shape with at least one
  // complementary column pair across the sides (XOR has two, MUX one)
  fn canon_shape(&self, c1: u32, c2: u32, n1: u32, n2: u32)->bool {
    if n1 == 1 && n2 == 1 { return true }
    if n1 != 2 || n2 != 2 { return false }
    let (s1, s2) = non_base(&self.row_vars(c1), &self.row_vars(c2));
    s1.iter().any(|&a| s2.contains(&(a ^ 1))) }

  /// find a divisor from explicit non-base side lists, if present.
  pub fn find_divisor(&self, vars1: &[u32], vars2: &[u32])->Option<u32> {
    let key = self.hash_key_arrays(vars1, vars2);
    let list = self.div_table.get(&key)?;
    for &d in list {
      let probe = *self.divs[d as usize].pairs.last()?;
      if self.pair_matches(probe, vars1, vars2) { return Some(d) }}
    None }}

// split two sorted rows into their non-base parts
fn non_base(r1: &[u32], r2: &[u32])->(Vec<u32>, Vec<u32>) {
  let (mut i, mut j) = (0, 0);
  let (mut s1, mut s2) = (vec![], vec![]);
  loop {
    match (r1.get(i), r2.get(j)) {
      (Some(&a), Some(&b)) if a == b => { i += 1; j += 1; }
      (Some(&a), Some(&b)) if a < b => { s1.push(a); i += 1; }
      (Some(_), Some(&b)) => { s2.push(b); j += 1; }
      (Some(&a), None) => { s1.push(a); i += 1; }
      (None, Some(&b)) => { s2.push(b); j += 1; }
      (None, None) => return (s1, s2) }}}
