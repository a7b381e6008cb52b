//! Irredundant sum-of-products extraction from a BDD interval
//! (Minato-Morreale). Given `lower <= upper`, returns a cover whose
//! function lies in the interval, together with that function's BDD.
use super::{Dd, Limits};
use crate::edge::{Edge, I, O};

/// A product term: (variable, positive?) literals, top-down.
pub type Term = Vec<(u32, bool)>;

impl Dd {

  /// irredundant cover of some function in `[lower, upper]`; `None` when
  /// the cover would exceed `max_cubes`. The returned edge is the exact
  /// function of the returned cover.
  pub fn isop(&mut self, lower: Edge, upper: Edge, max_cubes: Option<usize>)
              ->Option<(Vec<Term>, Edge)> {
    debug_assert!({ let chk = self.ite_u(lower, upper, I); chk == I },
                  "isop requires lower <= upper");
    let mut cubes = vec![];
    let mut cur: Term = vec![];
    let max = max_cubes.unwrap_or(usize::MAX);
    let f = self.isop_rec(lower, upper, max, &mut cubes, &mut cur)?;
    Some((cubes, f)) }

  fn isop_rec(&mut self, l: Edge, u: Edge, max: usize,
              cubes: &mut Vec<Term>, cur: &mut Term)->Option<Edge> {
    if l == O { return Some(O) }
    if u == I {
      if cubes.len() >= max { return None }
      cubes.push(cur.clone());
      return Some(I) }
    let lim = &mut Limits::none();
    let lvl = self.level(l).min(self.level(u));
    let v = self.invperm[lvl as usize];
    let (l1, l0) = self.cofs_at(l, lvl);
    let (u1, u0) = self.cofs_at(u, lvl);
    // minterms only coverable on their own side of v
    let lsub0 = self.ite_rec(l0, !u1, O, lim)?;
    cur.push((v, false));
    let f0 = self.isop_rec(lsub0, u0, max, cubes, cur)?;
    cur.pop();
    let lsub1 = self.ite_rec(l1, !u0, O, lim)?;
    cur.push((v, true));
    let f1 = self.isop_rec(lsub1, u1, max, cubes, cur)?;
    cur.pop();
    // whatever remains may be covered without a literal on v
    let r0 = self.ite_rec(l0, !f0, O, lim)?;
    let r1 = self.ite_rec(l1, !f1, O, lim)?;
    let ld = self.ite_rec(r0, I, r1, lim)?;
    let ud = self.ite_rec(u0, u1, O, lim)?;
    let fd = self.isop_rec(ld, ud, max, cubes, cur)?;
    let t = self.ite_rec(f1, I, fd, lim)?;
    let e = self.ite_rec(f0, I, fd, lim)?;
    Some(self.make(v, t, e)) }}
