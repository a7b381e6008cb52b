//! Incremental matrix update when a divisor is accepted: rewrite the
//! affected covers, retire the pairs and divisors that no longer exist,
//! create the ones that appear, and resync both heaps.
use crate::err::Result;
use super::fx_matrix::Matrix;
use super::NIL;

impl Matrix {

  // create the complement/divisor column pair for one extraction; the
  // divisor column owns the new cover
  fn create_new_vars(&mut self)->(u32, u32) {
    let node = (self.vars.len() / 2) as u32;
    let var_c = self.add_var(node, true);
    let var_d = self.add_var(node, false);
    (var_c, var_d) }

  /// accept the best single-cube divisor from the heap.
  pub fn update_single(&mut self)->Result<()> {
    let single = self.heap_s.peek_max().expect("single heap is empty");
    let (v1, v2) = {
      let s = &self.singles[single as usize];
      (s.var1, s.var2) };
    let (var_c, var_d) = self.create_new_vars();
    let cube_new = self.add_cube(var_d);

    debug_assert!(self.work_cubes.is_empty() && self.work_vars.is_empty());
    self.work_var_add(v1);
    self.work_var_add(v2);
    // replace each co-occurrence of (v1, v2) by the new literal,
    // retiring the divisors whose pairs died with the rewritten cubes
    self.single_clean(v1, v2, var_d)?;

    debug_assert!(v1 < v2);
    debug_assert_eq!(self.coincidence(v1, v2), 0);
    self.add_literal(cube_new, v1);
    self.add_literal(cube_new, v2);

    let touched: Vec<u32> = self.work_cubes.clone();
    for cube in touched { self.add_new_doubles(cube)?; }
    self.clean_old_singles();
    self.work_cubes_clear();
    self.work_vars_clear();
    self.compute_singles_one(var_c, None);
    self.compute_singles_one(var_d, None);
    self.n_divs1 += 1;
    Ok(()) }

  /// accept the best double-cube divisor from the heap.
  pub fn update_double(&mut self)->Result<()> {
    let div = self.heap_d.pop_max().expect("double heap is empty");
    self.unlink_div(div);

    let (var_c, var_d) = self.create_new_vars();
    let cube1 = self.add_cube(var_d);
    let cube2 = self.add_cube(var_d);
    self.double_create_cubes(div, cube1, cube2);

    debug_assert!(self.work_cubes.is_empty() && self.work_vars.is_empty());
    self.double_pairs_replace(div, var_d)?;

    let touched: Vec<u32> = self.work_cubes.clone();
    for cube in touched { self.add_new_doubles(cube)?; }
    self.clean_old_singles();
    self.work_cubes_clear();
    self.work_vars_clear();
    self.compute_singles_one(var_c, None);
    self.compute_singles_one(var_d, None);
    self.free_div(div);
    self.n_divs2 += 1;
    Ok(()) }

  /// accept a single-cube divisor together with its complement double:
  /// one new node implements both polarities.
  pub fn update_compl(&mut self, single: u32, div: u32)->Result<()> {
    let (v1, v2) = {
      let s = &self.singles[single as usize];
      (s.var1, s.var2) };
    self.heap_d.delete(div);
    self.unlink_div(div);

    let (var_c, var_d) = self.create_new_vars();
    let cube_new = self.add_cube(var_d);

    debug_assert!(self.work_cubes.is_empty() && self.work_vars.is_empty());
    self.work_var_add(v1);
    self.work_var_add(v2);
    self.single_clean(v1, v2, var_d)?;
    // the complement column implements the double divisor's uses
    self.double_pairs_replace(div, var_c)?;

    debug_assert!(v1 < v2);
    debug_assert_eq!(self.coincidence(v1, v2), 0);
    self.add_literal(cube_new, v1);
    self.add_literal(cube_new, v2);

    let touched: Vec<u32> = self.work_cubes.clone();
    for cube in touched { self.add_new_doubles(cube)?; }
    self.clean_old_singles();
    self.work_cubes_clear();
    self.work_vars_clear();
    self.compute_singles_one(var_c, None);
    self.compute_singles_one(var_d, None);
    self.free_div(div);
    self.n_divs3 += 1;
    Ok(()) }

  // fill the divisor's own two cubes from its first pair's non-base sides
  fn double_create_cubes(&mut self, div: u32, cube1: u32, cube2: u32) {
    let pair = *self.divs[div as usize].pairs.first()
      .expect("divisor with no pairs");
    let (s1, s2) = self.pair_sides(pair);
    let p = self.pairs[pair as usize];
    debug_assert_eq!(s1.len(), p.n_lits1 as usize);
    debug_assert_eq!(s2.len(), p.n_lits2 as usize);
    for v in s1 { self.add_literal(cube1, v); }
    for v in s2 { self.add_literal(cube2, v); }}

  // replace every pair of the accepted divisor: the earlier cube keeps
  // the base plus the new literal, the later cube empties
  fn double_pairs_replace(&mut self, div: u32, var_new: u32)->Result<()> {
    // order by cover then position so new literals enter the new
    // column's list sorted by cube order
    let mut pairs = self.divs[div as usize].pairs.clone();
    pairs.sort_by_key(|&p| {
      let pr = self.pairs[p as usize];
      let o1 = self.cube_order(pr.cube1);
      let o2 = self.cube_order(pr.cube2);
      (o1.0, o1.1.min(o2.1)) });
    for pair in pairs {
      let pr = self.pairs[pair as usize];
      let (use_c, rem_c) = if self.cubes[pr.cube1 as usize].icube
                              < self.cubes[pr.cube2 as usize].icube {
        (pr.cube1, pr.cube2) } else { (pr.cube2, pr.cube1) };
      debug_assert!(!self.cubes[use_c as usize].marked);
      self.work_cube_add(use_c);
      self.double_clean(use_c, rem_c);
      self.add_literal(use_c, var_new);
      debug_assert_eq!(self.cubes[use_c as usize].n_lits, pr.n_base + 1);
      debug_assert_eq!(self.cubes[rem_c as usize].n_lits, 0);
      self.clean_old_doubles(div, use_c);
      self.clean_old_doubles(div, rem_c);
      self.free_pair(pair); }
    self.divs[div as usize].pairs.clear();
    Ok(()) }

  // strip the non-base literals from `use_c` and everything from
  // `rem_c`, marking every column touched
  fn double_clean(&mut self, use_c: u32, rem_c: u32) {
    let row1 = self.row_lits(use_c);
    let row2 = self.row_lits(rem_c);
    let (mut i, mut j) = (0, 0);
    loop {
      let l1 = row1.get(i).copied();
      let l2 = row2.get(j).copied();
      match (l1, l2) {
        (Some(a), Some(b)) => {
          let va = self.lits[a as usize].var;
          let vb = self.lits[b as usize].var;
          if va == vb {
            // base literal: keep in use_c, drop from rem_c
            self.work_var_add(va);
            self.del_literal(b);
            i += 1; j += 1; }
          else if va < vb {
            self.work_var_add(va);
            self.del_literal(a);
            i += 1; }
          else {
            self.work_var_add(vb);
            self.del_literal(b);
            j += 1; }}
        (Some(a), None) => {
          let va = self.lits[a as usize].var;
          self.work_var_add(va);
          self.del_literal(a);
          i += 1; }
        (None, Some(b)) => {
          let vb = self.lits[b as usize].var;
          self.work_var_add(vb);
          self.del_literal(b);
          j += 1; }
        (None, None) => break }}}

  // replace each co-occurrence of (v1, v2) by one literal of `var_new`
  fn single_clean(&mut self, v1: u32, v2: u32, var_new: u32)->Result<()> {
    let col1 = self.col_lits(v1);
    let col2 = self.col_lits(v2);
    let (mut i, mut j) = (0, 0);
    while i < col1.len() && j < col2.len() {
      let a = col1[i];
      let b = col2[j];
      let ca = self.lits[a as usize].cube;
      let cb = self.lits[b as usize].cube;
      let oa = self.cube_order(ca);
      let ob = self.cube_order(cb);
      if oa == ob {
        debug_assert!(!self.cubes[ca as usize].marked);
        self.work_cube_add(ca);
        self.add_literal(ca, var_new);
        self.clean_old_doubles(NIL, ca);
        self.del_literal(a);
        self.del_literal(b);
        i += 1; j += 1; }
      else if oa < ob { i += 1 }
      else { j += 1 }}
    Ok(()) }

  // retire every pair (except the accepted divisor's own) that involved
  // a rewritten cube, downgrading or deleting its divisor
  fn clean_old_doubles(&mut self, skip_div: u32, cube: u32) {
    if self.vars[self.cubes[cube as usize].var as usize].pairs.is_none() { return }
    for pair in self.cube_pairs(cube) {
      let pr = self.pairs[pair as usize];
      if pr.div == skip_div { continue }
      self.div_remove_pair(pair);
      if self.divs[pr.div as usize].pairs.is_empty() {
        debug_assert_eq!(self.divs[pr.div as usize].weight, pr.n_base as i64 - 1);
        self.heap_d.delete(pr.div);
        self.unlink_div(pr.div);
        self.free_div(pr.div); }
      else {
        self.divs[pr.div as usize].weight -=
          (pr.n_lits1 + pr.n_lits2 - 1 + pr.n_base) as i64;
        let w = self.divs[pr.div as usize].weight;
        self.heap_d.update(pr.div, w); }
      self.free_pair(pair); }
    self.pair_clear_storage(cube); }

  // pair the rewritten cube with every other live cube of its cover
  fn add_new_doubles(&mut self, cube: u32)->Result<()> {
    debug_assert!(self.cubes[cube as usize].marked);
    let var = self.cubes[cube as usize].var;
    if self.vars[var as usize].pairs.is_none() { return Ok(()) }
    let mates: Vec<u32> = self.vars[var as usize].cubes.clone();
    let my_icube = self.cubes[cube as usize].icube;
    for temp in mates {
      if temp == cube { continue }
      if self.cubes[temp as usize].n_lits == 0 { continue }
      // freshly rewritten mates pair up once, not twice
      if self.cubes[temp as usize].marked
         && self.cubes[temp as usize].icube >= my_icube { continue }
      self.add_divisor(temp, cube)?; }
    Ok(()) }

  // recompute every single that lost a literal under a touched column
  fn clean_old_singles(&mut self) {
    for ix in 0..self.singles.len() as u32 {
      let s = self.singles[ix as usize];
      if !s.alive { continue }
      if !self.vars[s.var1 as usize].marked && !self.vars[s.var2 as usize].marked {
        continue }
      let coin = self.coincidence(s.var1, s.var2);
      let weight = coin as i64 - 2;
      if weight >= 0 {
        self.singles[ix as usize].weight = weight;
        self.heap_s.update(ix, weight); }
      else { self.del_single(ix); }}}}
