//! Structural timing-driven cascade mapping over an already-mapped
//! LUT network: iteratively adopt direct (low-latency) edges on the
//! critical path, re-propagating arrival and required times over the
//! affected cone only, restarting with fresh random seeds and keeping
//! the best trace. Chained direct edges group into cascades.
use fxhash::FxHashMap;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use crate::err::Result;
use crate::net::{Net, ObjId};

#[derive(Debug, Clone)]
pub struct MapParams {
  /// accepted but unused, kept for parameter compatibility
  pub nluts_max: usize,
  pub iters: usize,
  pub delay_lut: i64,
  pub delay_route: i64,
  pub delay_direct: i64,
  pub seed: u64,
  pub verbose: bool }

impl Default for MapParams {
  fn default()->MapParams {
    MapParams { nluts_max: 0, iters: 50, delay_lut: 1, delay_route: 1,
                delay_direct: 0, seed: 1, verbose: false }}}

/// outcome of a mapping run: the starting and best-found delays, the
/// adopted direct edges (node, fanin), and the cascades they chain into.
#[derive(Debug)]
pub struct CascadeMap {
  pub delay_start: i64,
  pub delay_best: i64,
  pub trace: Vec<(ObjId, ObjId)>,
  pub cascades: Vec<Vec<ObjId>> }

struct Timing<'a> {
  net: &'a mut Net,
  p: MapParams,
  delay_max: i64,
  /// arrival and required times per object
  time_d: Vec<i64>,
  time_r: Vec<i64>,
  /// chosen direct fanin per node / chosen direct fanout per fanin
  path_d: Vec<ObjId>,
  path_r: Vec<ObjId>,
  /// critical COs / critical CIs
  crits_d: Vec<ObjId>,
  crits_r: Vec<ObjId>,
  /// candidate direct edges (node, fanin)
  cands: Vec<(ObjId, ObjId)>,
  trace: Vec<(ObjId, ObjId)> }

const NONE: ObjId = crate::net::NIL;

impl<'a> Timing<'a> {

  fn new(net: &'a mut Net, p: &MapParams)->Timing<'a> {
    let n = net.objs.len();
    Timing { net, p: p.clone(), delay_max: 0,
             time_d: vec![0; n], time_r: vec![0; n],
             path_d: vec![NONE; n], path_r: vec![NONE; n],
             crits_d: vec![], crits_r: vec![], cands: vec![], trace: vec![] }}

  fn edge_delay(&self, node: ObjId, fanin: ObjId)->i64 {
    if self.path_d[node as usize] == fanin { self.p.delay_direct }
    else { self.p.delay_route }}

  // arrival times, forward from the combinational inputs
  fn find_time_d(&mut self)->i64 {
    for t in self.time_d.iter_mut() { *t = 0 }
    let order = self.net.topo_order();
    for id in order {
      let mut worst = 0;
      for k in 0..self.net.obj(id).fanins.len() {
        let f = self.net.obj(id).fanins[k].id;
        let d = self.time_d[f as usize] + self.edge_delay(id, f);
        worst = worst.max(d + self.p.delay_lut); }
      self.time_d[id as usize] = worst; }
    let mut delay = 0;
    for co in self.net.cos() {
      let f = self.net.obj(co).fanins[0].id;
      delay = delay.max(self.time_d[f as usize] + self.p.delay_route); }
    self.crits_d.clear();
    for co in self.net.cos() {
      let f = self.net.obj(co).fanins[0].id;
      if self.time_d[f as usize] + self.p.delay_route == delay {
        self.crits_d.push(co); }}
    delay }

  // required slack, backward from the combinational outputs
  fn find_time_r(&mut self)->i64 {
    for t in self.time_r.iter_mut() { *t = 0 }
    let order = self.net.topo_order();
    for &id in order.iter().rev() {
      self.time_r[id as usize] = self.pull_time_r(id); }
    let mut delay = 0;
    let cis = self.net.cis();
    for &ci in &cis {
      self.time_r[ci as usize] = self.pull_time_r(ci);
      delay = delay.max(self.time_r[ci as usize]); }
    self.crits_r.clear();
    for &ci in &cis {
      if self.time_r[ci as usize] == delay { self.crits_r.push(ci); }}
    delay }

  // downstream delay seen from an object's output pin
  fn pull_time_r(&self, id: ObjId)->i64 {
    let mut worst = 0;
    for &fo in &self.net.obj(id).fanouts {
      if self.net.obj(fo).is_co() { worst = worst.max(self.p.delay_route); continue }
      let lut = if self.net.obj(fo).is_node() { self.p.delay_lut } else { 0 };
      let d = self.time_r[fo as usize] + lut + self.edge_delay(fo, id);
      worst = worst.max(d); }
    worst }

  // direct-edge candidates: critical node-to-node edges where neither
  // endpoint already owns a direct connection
  fn find_critical_edges(&mut self) {
    self.cands.clear();
    for id in self.net.node_ids() {
      if self.path_d[id as usize] != NONE { continue }
      if self.time_d[id as usize] + self.time_r[id as usize] < self.delay_max {
        continue }
      for k in 0..self.net.obj(id).fanins.len() {
        let f = self.net.obj(id).fanins[k].id;
        if !self.net.obj(f).is_node() { continue }
        if self.path_r[f as usize] != NONE { continue }
        if self.time_d[f as usize] + self.p.delay_route + self.p.delay_lut
           == self.time_d[id as usize] {
          self.cands.push((id, f)); }}}}

  fn find_timing(&mut self)->i64 {
    let d0 = self.find_time_d();
    let d1 = self.find_time_r();
    debug_assert_eq!(d0, d1);
    self.delay_max = d0;
    self.find_critical_edges();
    d0 }

  // local re-propagation after adopting the edge (node, fanin): forward
  // in ascending level order over nodes whose arrival shrank, backward
  // in descending level order for required times, then refresh the
  // critical sets. Level order matters: a fanout with two pending fanin
  // updates must see both before its own recompute.
  fn update_timing(&mut self, node: ObjId, fanin: ObjId)->i64 {
    let nlev = self.net.objs.iter()
      .filter(|o| !o.dead).map(|o| o.level).max().unwrap_or(0) as usize + 1;
    let mut buckets: Vec<Vec<ObjId>> = vec![vec![]; nlev];
    self.net.trav_bump();
    self.net.mark(node);
    self.net.mark(fanin);
    buckets[self.net.obj(node).level as usize].push(node);
    buckets[self.net.obj(fanin).level as usize].push(fanin);
    for l in self.net.obj(fanin).level as usize..nlev {
      let mut i = 0;
      while i < buckets[l].len() {
        let id = buckets[l][i];
        i += 1;
        let mut worst = 0;
        for k in 0..self.net.obj(id).fanins.len() {
          let f = self.net.obj(id).fanins[k].id;
          worst = worst.max(self.time_d[f as usize]
                            + self.edge_delay(id, f) + self.p.delay_lut); }
        debug_assert!(worst <= self.time_d[id as usize]);
        if worst == self.time_d[id as usize] { continue }
        self.time_d[id as usize] = worst;
        let fouts = self.net.obj(id).fanouts.clone();
        for fo in fouts {
          if self.net.is_marked(fo) || self.net.obj(fo).is_co() { continue }
          self.net.mark(fo);
          buckets[self.net.obj(fo).level as usize].push(fo); }}}
    for l in (0..=self.net.obj(node).level as usize).rev() {
      let mut i = 0;
      while i < buckets[l].len() {
        let id = buckets[l][i];
        i += 1;
        let worst = self.pull_time_r(id);
        debug_assert!(worst <= self.time_r[id as usize]);
        if worst == self.time_r[id as usize] { continue }
        self.time_r[id as usize] = worst;
        for k in 0..self.net.obj(id).fanins.len() {
          let f = self.net.obj(id).fanins[k].id;
          if self.net.is_marked(f) || !self.net.obj(f).is_node() { continue }
          self.net.mark(f);
          buckets[self.net.obj(f).level as usize].push(f); }}}
    // the path may no longer be critical end to end
    let mut keep = Vec::with_capacity(self.crits_d.len());
    for &co in &self.crits_d {
      let f = self.net.obj(co).fanins[0].id;
      if self.time_d[f as usize] + self.p.delay_route == self.delay_max {
        keep.push(co); }}
    self.crits_d = keep;
    let time_r = &self.time_r;
    let delay_max = self.delay_max;
    self.crits_r.retain(|&ci| time_r[ci as usize] == delay_max);
    if !self.crits_d.is_empty() && !self.crits_r.is_empty() {
      let (time_d, time_r) = (&self.time_d, &self.time_r);
      let (path_d, path_r) = (&self.path_d, &self.path_r);
      let p = &self.p;
      self.cands.retain(|&(n, f)| {
        path_d[n as usize] == NONE && path_r[f as usize] == NONE
          && time_d[n as usize] + time_r[n as usize] == delay_max
          && time_d[f as usize] + p.delay_route + p.delay_lut == time_d[n as usize] });
      return self.delay_max }
    let old = self.delay_max;
    let new = self.find_timing();
    debug_assert!(new < old);
    new }

  // one restart: greedily adopt random critical edges while they help
  fn add_edges(&mut self, rng: &mut SmallRng)->i64 {
    const EDGES_MAX: usize = 10_000;
    self.trace.clear();
    for x in self.path_d.iter_mut() { *x = NONE }
    for x in self.path_r.iter_mut() { *x = NONE }
    self.find_timing();
    if self.p.verbose { debug!("cascade map start delay={}", self.delay_max); }
    let mut last_change = 0;
    for i in 0..EDGES_MAX {
      if self.cands.is_empty() { break }
      let prev = self.delay_max;
      let (node, fanin) = self.cands[rng.gen_range(0..self.cands.len())];
      debug_assert_eq!(self.path_d[node as usize], NONE);
      debug_assert_eq!(self.path_r[fanin as usize], NONE);
      self.path_d[node as usize] = fanin;
      self.path_r[fanin as usize] = node;
      self.trace.push((node, fanin));
      self.update_timing(node, fanin);
      debug_assert!(prev >= self.delay_max);
      if prev > self.delay_max { last_change = i + 1 }}
    self.trace.truncate(last_change);
    self.delay_max }}

/// map a LUT network onto cascades of direct edges. The network's node
/// names are annotated with `c<i>_n<k>` cascade labels; structure is
/// otherwise untouched.
pub fn map_cascades(net: &mut Net, p: &MapParams)->Result<CascadeMap> {
  let mut best_trace: Vec<(ObjId, ObjId)> = vec![];
  let delay_start;
  let mut delay_best;
  {
    let mut t = Timing::new(net, p);
    delay_start = t.find_timing();
    delay_best = delay_start;
    for i in 0..p.iters {
      let mut rng = SmallRng::seed_from_u64(p.seed.wrapping_add(i as u64));
      let delay = t.add_edges(&mut rng);
      if delay_best < delay
         || (delay_best == delay && best_trace.len() <= t.trace.len()) {
        continue }
      delay_best = delay;
      best_trace = t.trace.clone();
      if p.verbose {
        info!("cascade map iter={} delay={} edges={}", i, delay, best_trace.len()); }}}

  // group chained direct edges into cascades
  let mut path: FxHashMap<ObjId, ObjId> = FxHashMap::default();
  let mut is_tail: FxHashMap<ObjId, bool> = FxHashMap::default();
  for &(node, fanin) in &best_trace {
    path.insert(node, fanin);
    is_tail.insert(fanin, true); }
  let mut cascades: Vec<Vec<ObjId>> = vec![];
  for id in net.node_ids() {
    if is_tail.contains_key(&id) { continue }
    if !path.contains_key(&id) { continue }
    let mut chain = vec![id];
    let mut cur = id;
    while let Some(&next) = path.get(&cur) {
      chain.push(next);
      cur = next; }
    cascades.push(chain); }
  for (i, chain) in cascades.iter().enumerate() {
    for (k, &id) in chain.iter().enumerate() {
      net.names.insert(id, format!("c{}_n{}", i, k)); }}
  info!("cascade map delay {} -> {} ({} edges, {} cascades)",
        delay_start, delay_best, best_trace.len(), cascades.len());
  Ok(CascadeMap { delay_start, delay_best, trace: best_trace, cascades }) }
