//! Single-cube divisors: pairs of columns whose literals share enough
//! cubes that factoring the two-literal product pays off. The weight is
//! the coincidence count minus two (one literal per remaining use, minus
//! the cost of the new node's cube and its fanout literal).
use super::fx_matrix::Matrix;
use super::NIL;

impl Matrix {

  /// number of cubes containing both columns (lockstep column walk).
  pub fn coincidence(&self, var1: u32, var2: u32)->u32 {
    let mut l1 = self.vars[var1 as usize].head;
    let mut l2 = self.vars[var2 as usize].head;
    let mut count = 0;
    while l1 != NIL && l2 != NIL {
      let c1 = self.lits[l1 as usize].cube;
      let c2 = self.lits[l2 as usize].cube;
      let o1 = self.cube_order(c1);
      let o2 = self.cube_order(c2);
      if o1 == o2 {
        count += 1;
        l1 = self.lits[l1 as usize].v_next;
        l2 = self.lits[l2 as usize].v_next; }
      else if o1 < o2 { l1 = self.lits[l1 as usize].v_next }
      else { l2 = self.lits[l2 as usize].v_next }}
    count }

  /// collect the single-cube divisors pairing `var` with every earlier
  /// column it shares a cube with. `cap`, when set, bounds the total
  /// number of singles collected (initial construction only).
  pub fn compute_singles_one(&mut self, var: u32, cap: Option<usize>) {
    // gather candidate partners: columns to the left of `var` in any row
    debug_assert!(self.work_vars.is_empty());
    let mut lv = self.vars[var as usize].head;
    while lv != NIL {
      let mut lh = self.lits[lv as usize].h_prev;
      while lh != NIL {
        let v2 = self.lits[lh as usize].var;
        self.work_var_add(v2);
        lh = self.lits[lh as usize].h_prev; }
      lv = self.lits[lv as usize].v_next; }
    let partners: Vec<u32> = self.work_vars.clone();
    self.work_vars_clear();
    for v2 in partners {
      if let Some(cap) = cap { if self.singles.len() >= cap { break }}
      if self.find_single(v2.min(var), v2.max(var)).is_some() { continue }
      let coin = self.coincidence(v2, var);
      debug_assert!(coin > 0);
      let weight = coin as i64 - 2;
      if weight >= 0 {
        self.add_single(v2.min(var), v2.max(var), weight); }}}

  /// collect all single-cube divisors (called once after construction).
  pub fn compute_singles(&mut self, cap: Option<usize>) {
    for var in 0..self.vars.len() as u32 {
      if let Some(cap) = cap { if self.singles.len() >= cap { break }}
      self.compute_singles_one(var, cap); }
    debug!("singles collected={}", self.singles.len()); }}
