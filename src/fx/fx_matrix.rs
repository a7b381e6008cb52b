//! The sparse cube x literal matrix.
//!
//! Rows are cubes, columns are literal polarities (a network node
//! contributes two adjacent columns), entries are literals living in two
//! doubly-linked lists at once: the cube's row (ordered by ascending
//! column) and the column (ordered by cube position). The stores for
//! literals, pairs and divisors are slab pools of u32-indexed cells with
//! free lists; dissolving the matrix frees everything at once.
use fxhash::FxHashMap;
use super::fx_heap::Heap;
use super::NIL;

#[derive(Debug, Clone, Copy)]
pub struct LitCell {
  pub var: u32,
  pub cube: u32,
  pub h_prev: u32,
  pub h_next: u32,
  pub v_prev: u32,
  pub v_next: u32 }

#[derive(Debug, Clone)]
pub struct CubeRow {
  /// output variable of the cover this cube belongs to
  pub var: u32,
  /// position of this cube within its cover
  pub icube: u32,
  pub head: u32,
  pub tail: u32,
  pub n_lits: u32,
  /// worklist membership flag (replaces the intrusive ring)
  pub marked: bool }

#[derive(Debug, Clone)]
pub struct VarCol {
  /// the network object this column refers to (column index / 2)
  pub node: u32,
  /// does a literal in this column stand for the complemented signal?
  pub neg: bool,
  pub head: u32,
  pub tail: u32,
  pub n_lits: u32,
  /// rows of the cover this column owns (output columns only)
  pub cubes: Vec<u32>,
  /// pair ids indexed `icube1 * n + icube2`; None for columns created
  /// during extraction (their covers never spawn pairs)
  pub pairs: Option<Vec<u32>>,
  pub marked: bool }

#[derive(Debug, Clone, Copy)]
pub struct Pair {
  pub cube1: u32,
  pub cube2: u32,
  pub n_lits1: u32,
  pub n_lits2: u32,
  pub n_base: u32,
  pub div: u32,
  /// index of this pair inside its divisor's pair list
  pub div_pos: u32 }

#[derive(Debug, Clone)]
pub struct Divisor {
  pub key: u64,
  pub weight: i64,
  pub pairs: Vec<u32>,
  pub alive: bool }

#[derive(Debug, Clone, Copy)]
pub struct Single {
  pub var1: u32,
  pub var2: u32,
  pub weight: i64,
  pub alive: bool }

#[derive(Debug, Default)]
pub struct Matrix {
  pub lits: Vec<LitCell>,
  pub lit_free: Vec<u32>,
  pub cubes: Vec<CubeRow>,
  pub vars: Vec<VarCol>,
  pub pairs: Vec<Pair>,
  pub pair_free: Vec<u32>,
  pub divs: Vec<Divisor>,
  pub div_free: Vec<u32>,
  pub div_table: FxHashMap<u64, Vec<u32>>,
  pub singles: Vec<Single>,
  pub single_index: FxHashMap<(u32, u32), u32>,
  pub heap_d: Heap,
  pub heap_s: Heap,
  /// cubes and columns touched by the extraction in flight
  pub work_cubes: Vec<u32>,
  pub work_vars: Vec<u32>,
  pub n_entries: usize,
  pub n_divs1: usize,
  pub n_divs2: usize,
  pub n_divs3: usize,
  /// skip divisors wider than this many literals (0 = no limit)
  pub lit_cap: usize,
  /// accept only AND/XOR/MUX-shaped divisors
  pub canon: bool,
  /// primes driving the divisor fingerprint, per non-base position
  pub primes: Vec<u64> }

impl Matrix {

  pub fn new()->Matrix {
    let mut m = Matrix::default();
    m.primes = first_primes(304);
    m }

  // --- columns -------------------------------------------------------------

  pub fn add_var(&mut self, node: u32, neg: bool)->u32 {
    let ix = self.vars.len() as u32;
    self.vars.push(VarCol { node, neg, head: NIL, tail: NIL, n_lits: 0,
                            cubes: vec![], pairs: None, marked: false });
    ix }

  // --- rows ----------------------------------------------------------------

  pub fn add_cube(&mut self, var: u32)->u32 {
    let ix = self.cubes.len() as u32;
    let icube = self.vars[var as usize].cubes.len() as u32;
    self.cubes.push(CubeRow { var, icube, head: NIL, tail: NIL,
                              n_lits: 0, marked: false });
    self.vars[var as usize].cubes.push(ix);
    ix }

  // --- literals ------------------------------------------------------------

  /// append a literal at the tail of both its cube row and its column.
  /// Construction and update discipline guarantees tail order is sorted
  /// (rows by ascending column, columns by cube position).
  pub fn add_literal(&mut self, cube: u32, var: u32) {
    let ix = if let Some(ix) = self.lit_free.pop() { ix }
    else { self.lits.push(LitCell { var: 0, cube: 0, h_prev: NIL, h_next: NIL,
                                    v_prev: NIL, v_next: NIL });
           (self.lits.len() - 1) as u32 };
    let ctail = self.cubes[cube as usize].tail;
    let vtail = self.vars[var as usize].tail;
    self.lits[ix as usize] = LitCell {
      var, cube, h_prev: ctail, h_next: NIL, v_prev: vtail, v_next: NIL };
    if ctail != NIL { self.lits[ctail as usize].h_next = ix }
    else { self.cubes[cube as usize].head = ix }
    self.cubes[cube as usize].tail = ix;
    self.cubes[cube as usize].n_lits += 1;
    if vtail != NIL { self.lits[vtail as usize].v_next = ix }
    else { self.vars[var as usize].head = ix }
    self.vars[var as usize].tail = ix;
    self.vars[var as usize].n_lits += 1;
    self.n_entries += 1; }

  pub fn del_literal(&mut self, ix: u32) {
    let l = self.lits[ix as usize];
    if l.h_prev != NIL { self.lits[l.h_prev as usize].h_next = l.h_next }
    else { self.cubes[l.cube as usize].head = l.h_next }
    if l.h_next != NIL { self.lits[l.h_next as usize].h_prev = l.h_prev }
    else { self.cubes[l.cube as usize].tail = l.h_prev }
    self.cubes[l.cube as usize].n_lits -= 1;
    if l.v_prev != NIL { self.lits[l.v_prev as usize].v_next = l.v_next }
    else { self.vars[l.var as usize].head = l.v_next }
    if l.v_next != NIL { self.lits[l.v_next as usize].v_prev = l.v_prev }
    else { self.vars[l.var as usize].tail = l.v_prev }
    self.vars[l.var as usize].n_lits -= 1;
    self.lit_free.push(ix);
    self.n_entries -= 1; }

  /// the literal ids of a cube's row, in column order.
  pub fn row_lits(&self, cube: u32)->Vec<u32> {
    let mut out = vec![];
    let mut l = self.cubes[cube as usize].head;
    while l != NIL { out.push(l); l = self.lits[l as usize].h_next }
    out }

  /// the column ids of a cube's row, in order.
  pub fn row_vars(&self, cube: u32)->Vec<u32> {
    self.row_lits(cube).iter().map(|&l| self.lits[l as usize].var).collect() }

  /// the literal ids of a column, in cube order.
  pub fn col_lits(&self, var: u32)->Vec<u32> {
    let mut out = vec![];
    let mut l = self.vars[var as usize].head;
    while l != NIL { out.push(l); l = self.lits[l as usize].v_next }
    out }

  // ordering key of a cube within its column walk: covers in creation
  // order, then position within the cover
  #[inline] pub fn cube_order(&self, cube: u32)->(u32, u32) {
    let c = &self.cubes[cube as usize];
    (c.var, c.icube) }

  // --- worklists (replacing the intrusive rings) ---------------------------

  pub fn work_cube_add(&mut self, cube: u32) {
    if !self.cubes[cube as usize].marked {
      self.cubes[cube as usize].marked = true;
      self.work_cubes.push(cube); }}

  pub fn work_var_add(&mut self, var: u32) {
    if !self.vars[var as usize].marked {
      self.vars[var as usize].marked = true;
      self.work_vars.push(var); }}

  pub fn work_cubes_clear(&mut self) {
    while let Some(c) = self.work_cubes.pop() {
      self.cubes[c as usize].marked = false; }}

  pub fn work_vars_clear(&mut self) {
    while let Some(v) = self.work_vars.pop() {
      self.vars[v as usize].marked = false; }}

  // --- singles -------------------------------------------------------------

  pub fn add_single(&mut self, var1: u32, var2: u32, weight: i64) {
    debug_assert!(var1 < var2);
    let ix = self.singles.len() as u32;
    self.singles.push(Single { var1, var2, weight, alive: true });
    self.single_index.insert((var1, var2), ix);
    self.heap_s.insert(ix, weight); }

  pub fn del_single(&mut self, ix: u32) {
    let s = self.singles[ix as usize];
    self.singles[ix as usize].alive = false;
    self.single_index.remove(&(s.var1, s.var2));
    if self.heap_s.contains(ix) { self.heap_s.delete(ix); }}

  pub fn find_single(&self, var1: u32, var2: u32)->Option<u32> {
    self.single_index.get(&(var1, var2)).copied() }

  // --- divisors ------------------------------------------------------------

  pub fn alloc_pair(&mut self, p: Pair)->u32 {
    if let Some(ix) = self.pair_free.pop() {
      self.pairs[ix as usize] = p;
      ix }
    else { self.pairs.push(p); (self.pairs.len() - 1) as u32 }}

  pub fn free_pair(&mut self, ix: u32) { self.pair_free.push(ix); }

  pub fn alloc_div(&mut self, key: u64)->u32 {
    let d = Divisor { key, weight: 0, pairs: vec![], alive: true };
    let ix = if let Some(ix) = self.div_free.pop() {
      self.divs[ix as usize] = d;
      ix }
    else { self.divs.push(d); (self.divs.len() - 1) as u32 };
    self.div_table.entry(key).or_default().push(ix);
    ix }

  /// remove a divisor from the table (it stays allocated until freed).
  pub fn unlink_div(&mut self, ix: u32) {
    let key = self.divs[ix as usize].key;
    if let Some(list) = self.div_table.get_mut(&key) {
      if let Some(p) = list.iter().position(|&d| d == ix) { list.swap_remove(p); }
      if list.is_empty() { self.div_table.remove(&key); }}}

  pub fn free_div(&mut self, ix: u32) {
    self.divs[ix as usize].alive = false;
    self.div_free.push(ix); }

  /// attach a pair to a divisor's list.
  pub fn div_push_pair(&mut self, div: u32, pair: u32) {
    let pos = self.divs[div as usize].pairs.len() as u32;
    self.divs[div as usize].pairs.push(pair);
    self.pairs[pair as usize].div = div;
    self.pairs[pair as usize].div_pos = pos; }

  /// detach a pair from its divisor's list in O(1).
  pub fn div_remove_pair(&mut self, pair: u32) {
    let div = self.pairs[pair as usize].div;
    let pos = self.pairs[pair as usize].div_pos as usize;
    let list = &mut self.divs[div as usize].pairs;
    let last = list.len() - 1;
    list.swap(pos, last);
    list.pop();
    if pos <= last && pos < list.len() {
      let moved = list[pos];
      self.pairs[moved as usize].div_pos = pos as u32; }}

  // --- pair storage per output column --------------------------------------

  /// allocate the cube-pair grid for an output column with `n` cubes.
  pub fn pair_storage_alloc(&mut self, var: u32) {
    let n = self.vars[var as usize].cubes.len();
    self.vars[var as usize].pairs = Some(vec![NIL; n * n]); }

  pub fn pair_get(&self, var: u32, i1: u32, i2: u32)->u32 {
    match &self.vars[var as usize].pairs {
      Some(grid) => {
        let n = self.vars[var as usize].cubes.len() as u32;
        grid[(i1 * n + i2) as usize] }
      None => NIL }}

  pub fn pair_set(&mut self, var: u32, i1: u32, i2: u32, pair: u32) {
    let n = self.vars[var as usize].cubes.len() as u32;
    if let Some(grid) = &mut self.vars[var as usize].pairs {
      grid[(i1 * n + i2) as usize] = pair;
      grid[(i2 * n + i1) as usize] = pair; }}

  /// erase every grid entry involving this cube.
  pub fn pair_clear_storage(&mut self, cube: u32) {
    let var = self.cubes[cube as usize].var;
    let ic = self.cubes[cube as usize].icube;
    let n = self.vars[var as usize].cubes.len() as u32;
    if let Some(grid) = &mut self.vars[var as usize].pairs {
      for k in 0..n {
        grid[(ic * n + k) as usize] = NIL;
        grid[(k * n + ic) as usize] = NIL; }}}

  /// every live pair registered for this cube.
  pub fn cube_pairs(&self, cube: u32)->Vec<u32> {
    let var = self.cubes[cube as usize].var;
    let ic = self.cubes[cube as usize].icube;
    let n = self.vars[var as usize].cubes.len() as u32;
    let mut out = vec![];
    if let Some(grid) = &self.vars[var as usize].pairs {
      for k in 0..n {
        let p = grid[(ic * n + k) as usize];
        if p != NIL { out.push(p); }}}
    out }}

/// the first `n` primes, for the divisor fingerprint.
fn first_primes(n: usize)->Vec<u64> {
  let mut primes = Vec::with_capacity(n);
  let mut cand = 2u64;
  while primes.len() < n {
    if primes.iter().take_while(|&&p| p * p <= cand).all(|&p| cand % p != 0) {
      primes.push(cand); }
    cand += 1; }
  primes }

#[test] fn test_first_primes() {
  let p = first_primes(10);
  assert_eq!(p, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]); }

#[test] fn test_matrix_lists() {
  let mut m = Matrix::new();
  let out = m.add_var(0, true);
  let a = m.add_var(1, false);
  let b = m.add_var(2, false);
  let c0 = m.add_cube(out);
  let c1 = m.add_cube(out);
  m.add_literal(c0, a);
  m.add_literal(c0, b);
  m.add_literal(c1, b);
  assert_eq!(m.row_vars(c0), vec![a, b]);
  assert_eq!(m.row_vars(c1), vec![b]);
  assert_eq!(m.col_lits(b).len(), 2);
  assert_eq!(m.n_entries, 3);
  let row = m.row_lits(c0);
  m.del_literal(row[0]);
  assert_eq!(m.row_vars(c0), vec![b]);
  assert_eq!(m.n_entries, 2);
  // freed cells are recycled
  m.add_literal(c1, a);
  assert_eq!(m.lit_free.len(), 0); }
