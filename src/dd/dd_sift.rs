//! Dynamic variable reordering by sifting.
//!
//! The primitive is an adjacent-level swap that rewrites, in place, every
//! node of the upper level that depends on the lower one. Node indices are
//! stable across swaps, so referenced edges stay valid; only the computed
//! cache is invalidated. Sifting moves each variable through the whole
//! order and keeps the position minimizing the live node count, rejecting
//! excursions that grow the graph past `max_growth` times the best size.
use super::{Dd, Node};

/// Reordering flavor: plain sifting, or sifting with adjacent symmetric
/// variables detected first and moved as one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method { Sift, SymmSift }

impl Dd {

  /// swap the variables at levels `l` and `l+1`, preserving every
  /// function. Returns nothing; the live count tracks the effect.
  pub(crate) fn swap_levels(&mut self, l: usize) {
    let x = self.invperm[l];
    let y = self.invperm[l + 1];
    let ly = (l + 1) as u32;
    // collect the upper-level nodes up front; the arena mutates below.
    // dead-but-uncollected nodes are rewritten too, so every entry in the
    // unique table stays well ordered.
    let xs: Vec<u32> = (1..self.nodes.len() as u32)
      .filter(|&ix| self.nodes[ix as usize].var == x)
      .collect();
    for ix in xs {
      let n = self.nodes[ix as usize];
      let hi_dep = !n.hi.is_const() && self.level(n.hi) == ly;
      let lo_dep = !n.lo.is_const() && self.level(n.lo) == ly;
      if !hi_dep && !lo_dep { continue } // stays on x, drops a level with it
      self.uniq.remove(&(x, n.hi, n.lo));
      let (f11, f10) = if hi_dep { self.cofs(n.hi) } else { (n.hi, n.hi) };
      let (f01, f00) = if lo_dep { self.cofs(n.lo) } else { (n.lo, n.lo) };
      let g1 = self.make(x, f11, f01);
      let g0 = self.make(x, f10, f00);
      debug_assert!(!g0.is_inv(), "else-edge must stay regular across a swap");
      self.bump(g1);
      self.bump(g0);
      self.drop_rc(n.hi);
      self.drop_rc(n.lo);
      let m = &mut self.nodes[ix as usize];
      m.var = y;
      m.hi = g1;
      m.lo = g0;
      self.uniq.insert((y, g1, g0), ix); }
    self.perm[x as usize] = ly;
    self.perm[y as usize] = l as u32;
    self.invperm[l] = y;
    self.invperm[l + 1] = x;
    self.cache_clear(); }

  // move the block of `len` levels starting at `a` down one position
  // (the single level below it travels up across the block).
  fn block_down(&mut self, a: usize, len: usize) {
    for l in (a..a + len).rev() { self.swap_levels(l); }}

  // move the block up one position.
  fn block_up(&mut self, a: usize, len: usize) {
    for l in a - 1..a - 1 + len { self.swap_levels(l); }}

  /// are the variables at levels `l` and `l+1` (positively) symmetric?
  /// True iff every node at level `l` has equal mixed cofactors.
  fn symmetric_levels(&self, l: usize)->bool {
    let x = self.invperm[l];
    let ly = (l + 1) as u32;
    let mut any = false;
    for ix in 1..self.nodes.len() {
      let n: Node = self.nodes[ix];
      if n.var != x || n.rc == 0 { continue }
      any = true;
      let hi_dep = !n.hi.is_const() && self.level(n.hi) == ly;
      let lo_dep = !n.lo.is_const() && self.level(n.lo) == ly;
      if !hi_dep && !lo_dep { return false }
      let (_, f10) = if hi_dep { self.cofs(n.hi) } else { (n.hi, n.hi) };
      let (f01, _) = if lo_dep { self.cofs(n.lo) } else { (n.lo, n.lo) };
      if f10 != f01 { return false }}
    any }

  /// sift every variable (or symmetric block) to its best position.
  /// Returns the live node count after reordering.
  pub fn reduce_heap(&mut self, method: Method, max_growth: f64)->usize {
    let nl = self.num_vars();
    if nl < 2 { return self.live() }
    let start_size = self.live();
    self.gc();
    // keep make() appending so node bookkeeping stays simple: park the
    // free list for the duration of the reorder
    let stash = std::mem::take(&mut self.free);

    // group levels: each group is a run of adjacent levels sifted as one
    // block, identified by the variable at its head (blocks stay
    // contiguous and internally ordered as other blocks move past them)
    let mut groups: Vec<(u32, usize)> = (0..nl).map(|l| (self.invperm[l], 1)).collect();
    if method == Method::SymmSift {
      groups.clear();
      let mut l = 0;
      while l < nl {
        let mut len = 1;
        while l + len < nl && self.symmetric_levels(l + len - 1) { len += 1 }
        groups.push((self.invperm[l], len));
        l += len; }
      debug!("symm-sift groups={:?}", groups); }

    // sift biggest populations first
    let mut sizes: Vec<usize> = vec![0; nl];
    for n in self.nodes.iter().skip(1) {
      if n.rc > 0 { sizes[self.perm[n.var as usize] as usize] += 1 }}
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by_key(|&g| {
      let (head, len) = groups[g];
      let a = self.perm[head as usize] as usize;
      std::cmp::Reverse((a..a + len).map(|l| sizes[l]).sum::<usize>()) });

    for &gi in &order {
      let (head, len) = groups[gi];
      let mut a = self.perm[head as usize] as usize;
      let mut best_size = self.live();
      let mut best_a = a;
      let limit = (best_size as f64 * max_growth) as usize;
      // down to the bottom
      while a + len < nl {
        self.block_down(a, len);
        a += 1;
        let s = self.live();
        if s < best_size { best_size = s; best_a = a; }
        if s > limit { break }}
      // up to the top
      while a > 0 {
        self.block_up(a, len);
        a -= 1;
        let s = self.live();
        if s < best_size { best_size = s; best_a = a; }
        if s > limit && a > best_a { break }}
      // settle at the best position seen
      while a < best_a { self.block_down(a, len); a += 1; }
      while a > best_a { self.block_up(a, len); a -= 1; }}

    self.gc();
    self.free.extend(stash);
    let end_size = self.live();
    info!("reorder method={:?} size {}->{}", method, start_size, end_size);
    end_size }}
