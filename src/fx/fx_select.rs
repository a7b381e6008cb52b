//! Selection of the best single/double divisor pair under the
//! complement optimization: a single-cube divisor and the double-cube
//! divisor on the complemented columns of the same two variables can be
//! implemented by one node and its inverter, for a combined saving.
use super::fx_matrix::Matrix;
use super::NIL;

/// how deep into each heap the complement search looks. A tuning
/// constant; deeper lookahead has not been observed to pay off.
pub const LOOKAHEAD: usize = 20;

impl Matrix {

  // the complement column of a column (polarities pair up 2k/2k+1)
  #[inline] fn compl_col(&self, var: u32)->u32 { var ^ 1 }

  // the double divisor equal to the complement of a single (two
  // one-literal cubes over the complemented columns), if present
  fn compl_of_single(&self, single: u32)->Option<u32> {
    let s = self.singles[single as usize];
    let c1 = self.compl_col(s.var1);
    let c2 = self.compl_col(s.var2);
    let (c1, c2) = (c1.min(c2), c1.max(c2));
    self.find_divisor(&[c1], &[c2]) }

  // the single divisor equal to the complement of a 1x1 double
  fn compl_of_double(&self, div: u32)->Option<u32> {
    let pair = *self.divs[div as usize].pairs.first()?;
    let p = self.pairs[pair as usize];
    if p.n_lits1 != 1 || p.n_lits2 != 1 { return None }
    let (s1, s2) = self.pair_sides(pair);
    let v1 = self.compl_col(s1[0]);
    let v2 = self.compl_col(s2[0]);
    self.find_single(v1.min(v2), v1.max(v2)) }

  /// select the best candidate considering complement pairs: returns
  /// (weight, single id or NIL, double id or NIL). Looks at the top
  /// `LOOKAHEAD` entries of both heaps.
  pub fn select_compl(&mut self)->(i64, u32, u32) {
    let mut singles = Vec::with_capacity(LOOKAHEAD);
    while singles.len() < LOOKAHEAD {
      match self.heap_s.pop_max() { Some(s) => singles.push(s), None => break }}
    for &s in &singles {
      let w = self.singles[s as usize].weight;
      self.heap_s.insert(s, w); }
    let mut doubles = Vec::with_capacity(LOOKAHEAD);
    while doubles.len() < LOOKAHEAD {
      match self.heap_d.pop_max() { Some(d) => doubles.push(d), None => break }}
    for &d in &doubles {
      let w = self.divs[d as usize].weight;
      self.heap_d.insert(d, w); }

    let mut best = (i64::MIN, NIL, NIL);
    for &s in &singles {
      let mut w = self.singles[s as usize].weight;
      let compl = self.compl_of_single(s);
      if let Some(d) = compl {
        // the complement divisor's own cubes need not be built at all
        let pair = *self.divs[d as usize].pairs.first().expect("empty divisor");
        let p = self.pairs[pair as usize];
        w += self.divs[d as usize].weight + (p.n_lits1 + p.n_lits2) as i64; }
      if w > best.0 { best = (w, s, compl.unwrap_or(NIL)); }}
    for &d in &doubles {
      let mut w = self.divs[d as usize].weight;
      let compl = self.compl_of_double(d);
      if let Some(s) = compl {
        let pair = *self.divs[d as usize].pairs.first().expect("empty divisor");
        let p = self.pairs[pair as usize];
        w += self.singles[s as usize].weight + (p.n_lits1 + p.n_lits2) as i64; }
      if w > best.0 { best = (w, compl.unwrap_or(NIL), d); }}
    best }}
