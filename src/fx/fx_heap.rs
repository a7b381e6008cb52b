//! Max-heaps over divisors, keyed by weight, with a back-pointer index
//! per entry so update and delete run in O(log n).
//!
//! The heap is shared by the single- and double-cube divisor queues;
//! entries are plain ids into the owning store, and the weight of record
//! is the copy held in the heap (the caller resyncs it on change).
use super::NIL;

#[derive(Debug, Default)]
pub struct Heap {
  tree: Vec<(i64, u32)>,
  pos: Vec<u32> }

impl Heap {
  pub fn new()->Heap { Heap::default() }

  pub fn len(&self)->usize { self.tree.len() }
  pub fn is_empty(&self)->bool { self.tree.is_empty() }

  pub fn contains(&self, id: u32)->bool {
    (id as usize) < self.pos.len() && self.pos[id as usize] != NIL }

  /// weight at the top, or None when empty.
  pub fn max_weight(&self)->Option<i64> { self.tree.first().map(|&(w, _)| w) }

  /// id at the top without removing it.
  pub fn peek_max(&self)->Option<u32> { self.tree.first().map(|&(_, id)| id) }

  pub fn insert(&mut self, id: u32, w: i64) {
    debug_assert!(!self.contains(id), "divisor {} already queued", id);
    if self.pos.len() <= id as usize { self.pos.resize(id as usize + 1, NIL); }
    let i = self.tree.len();
    self.tree.push((w, id));
    self.pos[id as usize] = i as u32;
    self.up(i); }

  /// resync the weight of a queued entry and restore heap order.
  pub fn update(&mut self, id: u32, w: i64) {
    let i = self.pos[id as usize] as usize;
    debug_assert!(i != NIL as usize, "update of unqueued divisor {}", id);
    let old = self.tree[i].0;
    self.tree[i].0 = w;
    if w > old { self.up(i) } else { self.down(i) }}

  pub fn delete(&mut self, id: u32) {
    let i = self.pos[id as usize] as usize;
    debug_assert!(i != NIL as usize, "delete of unqueued divisor {}", id);
    self.pos[id as usize] = NIL;
    let last = self.tree.len() - 1;
    if i != last {
      self.tree.swap(i, last);
      self.tree.pop();
      let moved = self.tree[i].1;
      self.pos[moved as usize] = i as u32;
      // the moved entry may need to travel either way
      self.up(i);
      let j = self.pos[moved as usize] as usize;
      self.down(j); }
    else { self.tree.pop(); }}

  /// remove and return the id at the top.
  pub fn pop_max(&mut self)->Option<u32> {
    let &(_, id) = self.tree.first()?;
    self.delete(id);
    Some(id) }

  fn up(&mut self, mut i: usize) {
    while i > 0 {
      let p = (i - 1) / 2;
      if self.tree[p].0 >= self.tree[i].0 { break }
      self.swap_entries(p, i);
      i = p; }}

  fn down(&mut self, mut i: usize) {
    loop {
      let (l, r) = (2 * i + 1, 2 * i + 2);
      let mut best = i;
      if l < self.tree.len() && self.tree[l].0 > self.tree[best].0 { best = l }
      if r < self.tree.len() && self.tree[r].0 > self.tree[best].0 { best = r }
      if best == i { break }
      self.swap_entries(i, best);
      i = best; }}

  fn swap_entries(&mut self, i: usize, j: usize) {
    self.tree.swap(i, j);
    self.pos[self.tree[i].1 as usize] = i as u32;
    self.pos[self.tree[j].1 as usize] = j as u32; }

  /// validate heap order and back pointers (used by the test suite).
  #[cfg(test)]
  pub fn check(&self)->bool {
    for i in 1..self.tree.len() {
      if self.tree[(i - 1) / 2].0 < self.tree[i].0 { return false }}
    self.tree.iter().enumerate()
      .all(|(i, &(_, id))| self.pos[id as usize] == i as u32) }}


#[test] fn test_heap_basic() {
  let mut h = Heap::new();
  assert_eq!(h.max_weight(), None);
  h.insert(0, 5);
  h.insert(1, 9);
  h.insert(2, 2);
  assert_eq!(h.max_weight(), Some(9));
  assert_eq!(h.peek_max(), Some(1));
  h.update(2, 20);
  assert_eq!(h.peek_max(), Some(2));
  h.delete(2);
  assert_eq!(h.peek_max(), Some(1));
  assert!(h.check());
  assert_eq!(h.pop_max(), Some(1));
  assert_eq!(h.pop_max(), Some(0));
  assert_eq!(h.pop_max(), None); }

#[test] fn test_heap_top_is_max() {
  let mut h = Heap::new();
  let ws = [3i64, 14, 1, 5, 9, 2, 6, 11, 7, 0];
  for (i, &w) in ws.iter().enumerate() { h.insert(i as u32, w); }
  let mut expect: Vec<i64> = ws.to_vec();
  expect.sort_unstable_by(|a, b| b.cmp(a));
  for w in expect {
    assert_eq!(h.max_weight(), Some(w));
    h.pop_max(); }}
