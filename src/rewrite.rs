//! Greedy depth optimization: apply rules until none fires.
//!
//! The driver alternates between scanning and mutating. A scan visits the
//! live gates in topological order and tries `Rule::ALL` on each in turn.
//! The first match is built, substituted for its node, and the criticality
//! snapshot is recomputed from scratch before the next scan starts over.
//! A scan that finds nothing ends the loop.
//!
//! Every replacement sits at a strictly lower level than the node it
//! replaces, and no other node's level goes up, so the multiset of live
//! gate levels shrinks with each rewrite and the loop always terminates.
use std::fmt;
use crate::base::Base;
use crate::depth::CriticalityInfo;
use crate::rules::Rule;

/// What `optimize_depth` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
  pub assoc: usize,
  pub dist: usize,
  pub dist3: usize,
  /// number of scans, including the final one that found nothing.
  pub sweeps: usize,
  pub depth_before: u32,
  pub depth_after: u32 }

impl RewriteStats {
  /// total number of rewrites applied.
  pub fn total(&self)->usize { self.assoc + self.dist + self.dist3 }

  fn tally(&mut self, rule:Rule) {
    match rule {
      Rule::Assoc => self.assoc += 1,
      Rule::Dist => self.dist += 1,
      Rule::Dist3 => self.dist3 += 1 }}}

impl fmt::Display for RewriteStats {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "depth {} -> {} in {} sweeps (assoc:{} dist:{} dist3:{})",
      self.depth_before, self.depth_after, self.sweeps, self.assoc, self.dist, self.dist3) }}

/// Scan the network once using snapshot `ci` and apply the first rewrite
/// found. Returns the rule that fired, or `None` if nothing matched.
/// `ci` must describe the current state of `net`, and is stale afterwards
/// whenever the result is `Some`. A replacement that folds back into its
/// own node is skipped, but the gates built for it stay in `net` (unused)
/// until the network is repacked.
pub fn rewrite_once<B:Base>(net:&mut B, ci:&CriticalityInfo)->Option<Rule> {
  for &n in ci.gates() {
    for rule in Rule::ALL {
      let Some(rw) = rule.find(&*net, ci, n) else { continue };
      let new = rw.build(net);
      if new.raw() == n {
        trace!("{} at {}: replacement folds back into the node", rule, n);
        continue }
      debug!("{} at {} (level {}): {} => {}", rule, n, ci.level(n), rw, new);
      net.substitute(n, new);
      return Some(rule) }}
  None }

/// Reduce the depth of `net` in place and report what was done.
pub fn optimize_depth<B:Base>(net:&mut B)->RewriteStats {
  let mut ci = CriticalityInfo::refresh(net);
  let mut stats = RewriteStats{ depth_before: ci.depth(), ..Default::default() };
  loop {
    stats.sweeps += 1;
    match rewrite_once(net, &ci) {
      Some(rule) => {
        stats.tally(rule);
        let was = ci.depth();
        ci = CriticalityInfo::refresh(net);
        debug_assert!(ci.depth() <= was, "{} made the network deeper", rule); }
      None => break }}
  stats.depth_after = ci.depth();
  info!("optimize_depth: {}", stats);
  stats }

include!("test-rewrite.rs");
