//! Levels and critical paths.
//!
//! A `CriticalityInfo` is a snapshot computed from a network by `refresh`.
//! It answers `level` and `is_on_critical_path` queries for that exact
//! network state. Any structural change makes it stale: throw it away and
//! call `refresh` again.
use fxhash::{FxHashMap, FxHashSet};
use crate::base::Base;
use crate::nid::NID;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriticalityInfo {
  /// live gates, fanins before consumers.
  gates: Vec<NID>,
  /// level of each live gate. (inputs and constants are at level 0)
  levels: FxHashMap<NID, u32>,
  /// raw nids of every gate or input on some longest path.
  crit: FxHashSet<NID>,
  depth: u32 }

impl CriticalityInfo {

  /// Compute levels and critical paths for the current state of `net`.
  pub fn refresh<B:Base>(net:&B)->Self {
    let gates = net.live_gates();
    let mut levels:FxHashMap<NID,u32> = FxHashMap::default();
    let lv = |levels:&FxHashMap<NID,u32>, x:NID| *levels.get(&x.raw()).unwrap_or(&0);
    for &g in &gates {
      let [x, y] = net.fanins(g);
      let l = 1 + lv(&levels, x).max(lv(&levels, y));
      levels.insert(g, l); }
    let depth = net.outputs().iter().map(|&o| lv(&levels, o)).max().unwrap_or(0);

    let mut crit = FxHashSet::default();
    for &o in net.outputs() {
      if !o.is_const() && lv(&levels, o) == depth { crit.insert(o.raw()); }}
    for &g in gates.iter().rev() {
      if !crit.contains(&g) { continue }
      let l = levels[&g];
      for f in net.fanins(g) {
        if !f.is_const() && lv(&levels, f) + 1 == l { crit.insert(f.raw()); }}}
    CriticalityInfo{ gates, levels, crit, depth }}

  /// distance from the inputs along the longest path reaching `n`.
  pub fn level(&self, n:NID)->u32 { *self.levels.get(&n.raw()).unwrap_or(&0) }

  /// does `n` (ignoring polarity) lie on a longest input-to-output path?
  pub fn is_on_critical_path(&self, n:NID)->bool { self.crit.contains(&n.raw()) }

  /// the depth of the whole network: max level over all outputs.
  pub fn depth(&self)->u32 { self.depth }

  /// gates reachable from the outputs, in topological order.
  pub fn gates(&self)->&[NID] { &self.gates }

  /// number of gates and inputs on critical paths.
  pub fn num_critical(&self)->usize { self.crit.len() }}


#[cfg(test)] use crate::aig::AigBase;

#[test] fn test_empty() {
  let b = <AigBase as Base>::new(3);
  let ci = CriticalityInfo::refresh(&b);
  assert_eq!(ci.depth(), 0);
  assert!(ci.gates().is_empty());
  assert_eq!(ci, CriticalityInfo::default()); }

#[test] fn test_chain_levels() {
  nid_vars![x0, x1, x2, x3, x4];
  let mut b = <AigBase as Base>::new(5);
  let a = b.and(x0, x1);
  let c = b.and(!a, x2);
  let d = b.and(c, x3);
  let side = b.and(x3, !x4);
  b.add_output(!d); b.add_output(side);
  let ci = CriticalityInfo::refresh(&b);
  assert_eq!((ci.level(x0), ci.level(a), ci.level(!c), ci.level(d), ci.level(side)), (0, 1, 2, 3, 1));
  assert_eq!(ci.depth(), 3);
  for n in [x0, x1, a, c, d] { assert!(ci.is_on_critical_path(n), "{} should be critical", n) }
  for n in [x2, x3, x4, side] { assert!(!ci.is_on_critical_path(n), "{} should not be critical", n) }
  assert_eq!(ci.num_critical(), 5);
  assert_eq!(ci.gates().len(), 4); }

#[test] fn test_parallel_critical_paths() {
  // two outputs of equal depth: both cones are critical.
  nid_vars![x0, x1, x2, x3];
  let mut b = <AigBase as Base>::new(4);
  let a = b.and(x0, x1);
  let c = b.and(x2, x3);
  let p = b.and(a, x2);
  let q = b.and(c, !x0);
  b.add_output(p); b.add_output(q);
  let ci = CriticalityInfo::refresh(&b);
  assert_eq!(ci.depth(), 2);
  for n in [a, c, p, q, x0, x1, x2, x3] { assert!(ci.is_on_critical_path(n), "{}", n) }}

#[test] fn test_shallow_output_not_critical() {
  nid_vars![x0, x1, x2];
  let mut b = <AigBase as Base>::new(3);
  let a = b.and(x0, x1);
  let c = b.and(a, x2);
  b.add_output(c); b.add_output(x2); b.add_output(crate::nid::I);
  let ci = CriticalityInfo::refresh(&b);
  assert!(ci.is_on_critical_path(c));
  assert!(!ci.is_on_critical_path(x2), "x2 feeds a level-2 gate and a level-0 output");
  assert!(!ci.is_on_critical_path(crate::nid::I)); }

#[test] fn test_refresh_after_substitute() {
  nid_vars![x0, x1, x2, x3];
  let mut b = <AigBase as Base>::new(4);
  let a = b.and(x0, x1);
  let c = b.and(a, x2);
  let d = b.and(c, x3);
  b.add_output(d);
  let before = CriticalityInfo::refresh(&b);
  let r = b.and(x2, x3);
  let n = b.and(a, r);
  b.substitute(d, n);
  let after = CriticalityInfo::refresh(&b);
  assert_eq!((before.depth(), after.depth()), (3, 2));
  assert_ne!(before, after);
  assert!(!after.is_on_critical_path(c), "c no longer feeds an output");
  assert!(!after.gates().contains(&c));
  assert!(after.is_on_critical_path(r) && after.is_on_critical_path(a)); }
