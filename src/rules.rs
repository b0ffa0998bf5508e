//! Depth-reducing rewrite rules.
//!
//! Each matcher looks at a small neighborhood around one gate, classifies
//! the signals it finds by criticality and polarity, and either returns a
//! `Rewrite` describing a shallower replacement or `None`. Matchers never
//! touch the network: building the replacement is a separate step
//! (`Rewrite::build`), and splicing it in is up to the caller.
use std::fmt;
use crate::base::Base;
use crate::depth::CriticalityInfo;
use crate::nid::NID;

/// The rules, in the order the driver tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule { Assoc, Dist, Dist3 }

impl Rule {
  pub const ALL:[Rule;3] = [Rule::Assoc, Rule::Dist, Rule::Dist3];

  /// Run this rule's matcher on gate `n`.
  pub fn find<B:Base>(self, net:&B, ci:&CriticalityInfo, n:NID)->Option<Rewrite> {
    match self {
      Rule::Assoc => assoc(net, ci, n),
      Rule::Dist => dist(net, ci, n),
      Rule::Dist3 => dist3(net, ci, n) }}}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", match self { Rule::Assoc => "assoc", Rule::Dist => "dist", Rule::Dist3 => "dist3" }) }}

/// A matched pattern, holding the signals its replacement is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
  /// `to_move ∧ (sibs[0] ∧ sibs[1])`
  Assoc { to_move:NID, sibs:[NID;2] },
  /// `shared ∧ (first ∨ second)`, complemented unless the node is an OR.
  Dist { shared:NID, first:NID, second:NID, or:bool },
  /// `(deep ∧ (c2 ∧ c0)) ∨ (c0 ∧ ¬c1)` for `children = [c0, c1, c2]`.
  Dist3 { children:[NID;3], deep:NID }}

impl Rewrite {
  pub fn rule(&self)->Rule {
    match self {
      Rewrite::Assoc{..} => Rule::Assoc,
      Rewrite::Dist{..} => Rule::Dist,
      Rewrite::Dist3{..} => Rule::Dist3 }}

  /// Construct the replacement in `net` and return its signal.
  pub fn build<B:Base>(&self, net:&mut B)->NID {
    match *self {
      Rewrite::Assoc{ to_move, sibs:[s0, s1] } => {
        let low = net.and(s0, s1);
        net.and(to_move, low) }
      Rewrite::Dist{ shared, first, second, or } => {
        let either = net.or(first, second);
        if or { net.and(shared, either) } else { net.nand(shared, either) }}
      Rewrite::Dist3{ children:[c0, c1, c2], deep } => {
        let bottom = net.and(c2, c0);
        let right = net.and(deep, bottom);
        let nc1 = net.not(c1);
        let left = net.and(c0, nc1);
        let (nr, nl) = (net.not(right), net.not(left));
        net.nand(nr, nl) }}}}

impl fmt::Display for Rewrite {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Rewrite::Assoc{ to_move, sibs } => write!(f, "{} ∧ ({} ∧ {})", to_move, sibs[0], sibs[1]),
      Rewrite::Dist{ shared, first, second, or } =>
        write!(f, "{}({} ∧ ({} ∨ {}))", if *or { "" } else { "¬" }, shared, first, second),
      Rewrite::Dist3{ children:[c0, c1, c2], deep } =>
        write!(f, "({} ∧ ({} ∧ {})) ∨ ({} ∧ {})", deep, c2, c0, c0, !*c1) }}}


/// is the node behind `s` on a critical path?
fn crit(ci:&CriticalityInfo, s:NID)->bool { ci.is_on_critical_path(s) }

/// is `s` a complemented edge into a critical node?
fn crit_inv(ci:&CriticalityInfo, s:NID)->bool { s.is_inv() && crit(ci, s) }


/// Re-associate `a ∧ (b ∧ c)` as `b ∧ (a ∧ c)` when `b` is the only
/// critical signal under the uncomplemented critical fanin and it is
/// strictly deeper than `a`.
pub fn assoc<B:Base>(net:&B, ci:&CriticalityInfo, n:NID)->Option<Rewrite> {
  let mut to_move = vec![];
  let mut sibs = vec![];
  let mut ref_level = 0;
  for child in net.fanins(n) {
    if !child.is_inv() && crit(ci, child) && net.is_gate(child) {
      for gc in net.fanins(child) {
        if crit(ci, gc) { to_move.push(gc) } else { sibs.push(gc) }}}
    else { sibs.push(child); ref_level = ci.level(child) }}
  if to_move.len() != 1 || sibs.len() != 2 { return None }
  if ci.level(to_move[0]) <= ref_level { return None }
  Some(Rewrite::Assoc{ to_move: to_move[0], sibs: [sibs[0], sibs[1]] })}


/// Factor the common critical signal out of `¬(x ∧ p) ∧ ¬(x ∧ q)`.
pub fn dist<B:Base>(net:&B, ci:&CriticalityInfo, n:NID)->Option<Rewrite> {
  let (mut shared, mut first, mut second) = (None, None, None);
  let (mut crit0, mut crit1) = (0, 0);
  let mut same = false;
  let mut seen = 0;
  for child in net.fanins(n) {
    if !(crit_inv(ci, child) && net.is_gate(child)) { continue }
    seen += 1;
    for gc in net.fanins(child) {
      if seen == 1 {
        if crit(ci, gc) { shared = Some(gc); crit0 += 1 } else { first = Some(gc) }}
      else if crit(ci, gc) {
        crit1 += 1;
        if Some(gc) == shared { same = true }}
      else { second = Some(gc) }}}
  if !(seen == 2 && crit0 == 1 && crit1 == 1 && same) { return None }
  match (shared, first, second) {
    (Some(shared), Some(first), Some(second)) =>
      Some(Rewrite::Dist{ shared, first, second, or: net.is_or(n) }),
    _ => None }}


/// Flatten a chain of three complemented critical ANDs
/// `c0 ∧ ¬(c1 ∧ ¬(t ∧ c2))` into `(t ∧ c2 ∧ c0) ∨ (c0 ∧ ¬c1)` when the
/// chain is more than two levels deeper than `c0`.
pub fn dist3<B:Base>(net:&B, ci:&CriticalityInfo, n:NID)->Option<Rewrite> {
  let mut to_check = vec![];
  let mut children = vec![];
  // complemented critical edges continue the chain. an uncomplemented
  // critical edge can't be moved off the critical path, so it is dropped
  // and the tallies below come up short.
  let split = |s:NID, to_check:&mut Vec<NID>, children:&mut Vec<NID>| {
    if crit_inv(ci, s) { to_check.push(s) }
    else if !crit(ci, s) { children.push(s) }};
  for s in net.fanins(n) { split(s, &mut to_check, &mut children) }
  if to_check.len() == 1 && children.len() == 1 && net.is_gate(to_check[0]) {
    for s in net.fanins(to_check[0]) { split(s, &mut to_check, &mut children) }
    if to_check.len() == 2 && children.len() == 2 && net.is_gate(to_check[1]) {
      for s in net.fanins(to_check[1]) {
        if crit(ci, s) { to_check.push(s) } else { children.push(s) }}}}
  if to_check.len() != 3 || children.len() != 3 { return None }
  let (level_low, level_crit) = (ci.level(children[0]), ci.level(to_check[0]));
  if level_crit <= level_low + 2 {
    trace!("dist3 at {}: gap {} -> {} is too small", n, level_low, level_crit);
    return None }
  Some(Rewrite::Dist3{ children: [children[0], children[1], children[2]], deep: to_check[2] })}


#[cfg(test)] use crate::aig::AigBase;
#[cfg(test)] use crate::sim;

#[test] fn test_assoc_match() {
  nid_vars![x0, x1, x2, x3];
  let mut b = <AigBase as Base>::new(4);
  let deep = b.and(x0, x1);
  let m = b.and(deep, x2);
  let n = b.and(x3, m);
  b.add_output(n);
  let ci = CriticalityInfo::refresh(&b);
  let rw = assoc(&b, &ci, n);
  assert_eq!(rw, Some(Rewrite::Assoc{ to_move: deep, sibs: [x2, x3] }));
  let rw = rw.unwrap();
  assert_eq!(rw.rule(), Rule::Assoc);
  let new = rw.build(&mut b);
  assert_eq!(sim::eval(&b, new), sim::eval(&b, n));
  let low = b.and(x2, x3);
  assert_eq!(b.fanins(new), [deep, low]); }

#[test] fn test_assoc_no_gap() {
  nid_vars![x0, x1, x2, x3, x4];
  let mut b = <AigBase as Base>::new(5);
  let deep = b.and(x0, x1);
  let m = b.and(deep, x2);
  let side = b.and(x3, x4);   // as deep as `deep`
  let n = b.and(m, side);
  b.add_output(n);
  let ci = CriticalityInfo::refresh(&b);
  assert_eq!(assoc(&b, &ci, n), None);
  // both grandchildren critical: nothing to move.
  assert_eq!(assoc(&b, &ci, deep), None); }

#[test] fn test_assoc_complemented_child() {
  nid_vars![x0, x1, x2, x3];
  let mut b = <AigBase as Base>::new(4);
  let deep = b.and(x0, x1);
  let m = b.and(deep, x2);
  let n = b.and(x3, !m);
  b.add_output(n);
  let ci = CriticalityInfo::refresh(&b);
  assert_eq!(assoc(&b, &ci, n), None, "can't re-associate through an inverter"); }

#[test] fn test_dist_match() {
  nid_vars![x0, x1, x2, x3];
  let mut b = <AigBase as Base>::new(4);
  let x = b.and(x0, x1);
  let t1 = b.and(x, x2);
  let t2 = b.and(x, x3);
  let o = b.or(t1, t2);
  b.add_output(o);
  let n = o.raw();
  let ci = CriticalityInfo::refresh(&b);
  let rw = dist(&b, &ci, n);
  assert_eq!(rw, Some(Rewrite::Dist{ shared: x, first: x2, second: x3, or: false }));
  let new = rw.unwrap().build(&mut b);
  assert_eq!(sim::eval(&b, new), sim::eval(&b, n));
  let mut tmp = <AigBase as Base>::new(4);
  let want = expr![tmp, ((x0 & x1) & (x2 | x3))];
  assert_eq!(sim::eval(&b, !new), sim::eval(&tmp, want)); }

#[test] fn test_dist_needs_two_complemented_terms() {
  nid_vars![x0, x1, x2, x3];
  let mut b = <AigBase as Base>::new(4);
  let x = b.and(x0, x1);
  let t1 = b.and(x, x2);
  let t2 = b.and(x, x3);
  let n = b.and(!t1, t2);
  b.add_output(n);
  let ci = CriticalityInfo::refresh(&b);
  assert!(ci.is_on_critical_path(t1) && ci.is_on_critical_path(t2));
  assert_eq!(dist(&b, &ci, n), None, "only one fanin is a complemented critical term"); }

#[test] fn test_dist_or_flag() {
  // a base that stores OR nodes would get the uncomplemented form.
  nid_vars![x0, x1, x2];
  let mut b = <AigBase as Base>::new(3);
  let rw = Rewrite::Dist{ shared: x0, first: x1, second: x2, or: true };
  let new = rw.build(&mut b);
  let mut tmp = <AigBase as Base>::new(3);
  let want = expr![tmp, (x0 & (x1 | x2))];
  assert_eq!(sim::eval(&b, new), sim::eval(&tmp, want)); }

#[test] fn test_dist_shared_mismatch() {
  nid_vars![x0, x1, x2, x3, x4];
  let mut b = <AigBase as Base>::new(5);
  let x = b.and(x0, x1);
  let y = b.and(x0, x4);
  let t1 = b.and(x, x2);
  let t2 = b.and(y, x3);
  let o = b.or(t1, t2);
  b.add_output(o);
  let ci = CriticalityInfo::refresh(&b);
  assert_eq!(dist(&b, &ci, o.raw()), None);
  // polarity matters too: x∧p + ¬x∧q shares nothing.
  let t3 = b.and(!x, x3);
  let o2 = b.or(t1, t3);
  b.add_output(o2);
  let ci = CriticalityInfo::refresh(&b);
  assert_eq!(dist(&b, &ci, o2.raw()), None); }

#[cfg(test)]
/// n = x0 ∧ ¬(x1 ∧ ¬((x3 ∧ x4) ∧ x2)), deep enough for dist3.
fn dist3_chain(b:&mut AigBase)->(NID, NID) {
  nid_vars![x0, x1, x2, x3, x4];
  let t = b.and(x3, x4);
  let bb = b.and(t, x2);
  let a = b.and(x1, !bb);
  (b.and(x0, !a), t) }

#[test] fn test_dist3_match() {
  nid_vars![x0, x1, x2];
  let mut b = <AigBase as Base>::new(5);
  let (n, t) = dist3_chain(&mut b);
  b.add_output(n);
  let ci = CriticalityInfo::refresh(&b);
  assert_eq!(ci.level(n), 4);
  let rw = dist3(&b, &ci, n);
  assert_eq!(rw, Some(Rewrite::Dist3{ children: [x0, x1, x2], deep: t }));
  let new = rw.unwrap().build(&mut b);
  assert_eq!(sim::eval(&b, new), sim::eval(&b, n));
  b.substitute(n, new);
  assert_eq!(CriticalityInfo::refresh(&b).depth(), 3); }

#[test] fn test_dist3_gap_too_small() {
  // same chain, but with c0 one level up: the gap is exactly two.
  nid_vars![x0, x1, x2, x3, x4, x5];
  let mut b = <AigBase as Base>::new(6);
  let t = b.and(x3, x4);
  let bb = b.and(t, x2);
  let a = b.and(x1, !bb);
  let c0 = b.and(x0, x5);
  let n = b.and(c0, !a);
  b.add_output(n);
  let ci = CriticalityInfo::refresh(&b);
  assert!(!ci.is_on_critical_path(c0));
  assert_eq!((ci.level(c0), ci.level(a)), (1, 3));
  assert_eq!(dist3(&b, &ci, n), None); }

#[test] fn test_dist3_uncomplemented_critical_c1() {
  // c1 is critical and feeds `a` uncomplemented, so it can't become a
  // shallow side input of the flattened form.
  nid_vars![x0, x1, x2, x3, x4, x5, x6, x7];
  let mut b = <AigBase as Base>::new(8);
  let t = b.and(x3, x4);
  let bb = b.and(t, x2);
  let c1 = expr![b, ((x5 & x6) & x7)];
  let a = b.and(c1, !bb);
  let n = b.and(x0, !a);
  b.add_output(n);
  let ci = CriticalityInfo::refresh(&b);
  assert!(ci.is_on_critical_path(c1));
  assert_eq!((ci.level(c1), ci.level(a), ci.depth()), (2, 3, 4));
  assert_eq!(dist3(&b, &ci, n), None);
  // treating c1 as a side input anyway gains nothing: ¬c1 stays deep.
  let forced = Rewrite::Dist3{ children: [x0, c1, x2], deep: t }.build(&mut b);
  assert_eq!(sim::eval(&b, forced), sim::eval(&b, n));
  b.substitute(n, forced);
  assert_eq!(CriticalityInfo::refresh(&b).depth(), 4); }

#[test] fn test_dist3_identity() {
  // the replacement matches the chain for every polarity of the side inputs.
  for pol in 0..16u32 {
    let mut b = <AigBase as Base>::new(4);
    let flip = |i:u32| NID::var(i).inv_if(pol & (1 << i) != 0);
    let (c0, c1, c2, t) = (flip(0), flip(1), flip(2), flip(3));
    let inner = b.and(t, c2);
    let mid = b.and(c1, !inner);
    let n = b.and(c0, !mid);
    let new = Rewrite::Dist3{ children: [c0, c1, c2], deep: t }.build(&mut b);
    assert_eq!(sim::eval(&b, new), sim::eval(&b, n), "polarity {:04b}", pol); }}

#[test] fn test_rule_order() {
  assert_eq!(Rule::ALL, [Rule::Assoc, Rule::Dist, Rule::Dist3]);
  assert_eq!(format!("{} {} {}", Rule::Assoc, Rule::Dist, Rule::Dist3), "assoc dist dist3"); }
