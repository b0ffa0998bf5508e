#![macro_use]
//! Standard trait for AND-inverter networks.
use std::fs::File;
use std::io::Write;
use fxhash::FxHashSet;
use crate::nid::NID;

/// Functions common to all two-input AND networks with complemented edges.
/// This is the whole surface the depth rewriter consumes.
pub trait Base {
  /// Create a new network with `ninputs` primary inputs and no gates.
  fn new(ninputs:usize)->Self where Self:Sized;

  /// Number of primary inputs.
  fn num_inputs(&self)->usize;

  /// Number of gates that have not been retired by `substitute`.
  /// This includes gates no output depends on, such as the pieces of a
  /// replacement that was built and then not used. `live_gates().len()`
  /// counts only what the outputs need.
  fn num_gates(&self)->usize;

  /// The output signals, in the order they were added.
  fn outputs(&self)->&[NID];

  /// Add an output and return its position.
  fn add_output(&mut self, n:NID)->usize;

  /// Does `n` (ignoring polarity) refer to a live gate?
  fn is_gate(&self, n:NID)->bool;

  /// The two fanins of gate `n`. Panics if `n` is not a live gate.
  fn fanins(&self, n:NID)->[NID;2];

  /// Return a `NID` representing the logical AND of `x` and `y`.
  fn and(&mut self, x:NID, y:NID)->NID;

  /// `!(x & y)`
  fn nand(&mut self, x:NID, y:NID)->NID { !self.and(x, y) }

  /// `x | y`, by De Morgan.
  fn or(&mut self, x:NID, y:NID)->NID { !self.and(!x, !y) }

  /// Complement is free: it only flips the INV bit of the signal.
  fn not(&self, x:NID)->NID { !x }

  /// Does the node's stored function read as an OR under the complement-edge
  /// convention? Networks that only store AND nodes never say yes.
  fn is_or(&self, _n:NID)->bool { false }

  /// Replace every use of node `old` with signal `new` and retire `old`.
  /// A consumer that referred to `!old` receives `!new`. If `old` itself is
  /// given inverted, `new` is taken to be the replacement for `!old`.
  fn substitute(&mut self, old:NID, new:NID);

  /// Render node `n` (and its descendents) in graphviz *.dot format.
  fn dot(&self, n:NID, wr: &mut dyn std::fmt::Write);

  /// All gates in the cones of `roots`, each listed after its fanins.
  fn cone(&self, roots:&[NID])->Vec<NID> {
    let mut res = vec![];
    let mut seen = FxHashSet::default();
    // (node, fanins already pushed?)
    let mut stack:Vec<(NID,bool)> = roots.iter().rev()
      .filter(|r| self.is_gate(**r)).map(|r| (r.raw(), false)).collect();
    while let Some((n, expanded)) = stack.pop() {
      if expanded { res.push(n); continue }
      if !seen.insert(n) { continue }
      stack.push((n, true));
      for f in self.fanins(n).iter().rev() {
        if self.is_gate(*f) && !seen.contains(&f.raw()) { stack.push((f.raw(), false)) }}}
    res }

  /// All gates reachable from the outputs, each listed after its fanins.
  fn live_gates(&self)->Vec<NID> { self.cone(self.outputs()) }}


/// trait for visualization using GraphViz
pub trait GraphViz {
  fn write_dot(&self, n:NID, wr: &mut dyn std::fmt::Write);

  /// render to graphviz *.dot file
  fn save_dot(&self, n:NID, path:&str)->std::io::Result<()> {
    let mut s = String::new(); self.write_dot(n, &mut s);
    let mut txt = File::create(path)?;
    txt.write_all(s.as_bytes()) }}

impl<T:Base> GraphViz for T {
  fn write_dot(&self, n:NID, wr: &mut dyn std::fmt::Write) {
    T::dot(self, n, wr) }}


// macros for building expressions

/// This is a helper macro used by `expr!`
///
/// ex: `expr_op![base, x and y]`
#[macro_export] macro_rules! expr_op {
  ($b:ident, $x:tt $op:ident $y:tt) => {{
    let x = $crate::expr![$b, $x];
    let y = $crate::expr![$b, $y];
    $b.$op(x,y) }}}

/// Macro for building complex expressions in a `Base`.
/// example: `expr![base, ((x & y) | (!z))]`
#[macro_export] macro_rules! expr {
  ($b:ident, $id:ident) => { $id };
  ($b:ident, (! $x:tt)) => { !$crate::expr![$b, $x] };
  ($b:ident, ($x:tt & $y:tt)) => { $crate::expr_op![$b, $x and $y] };
  ($b:ident, ($x:tt | $y:tt)) => { $crate::expr_op![$b, $x or $y] };}

/// Bind a list of identifiers to consecutive input signals, starting at x0.
#[macro_export] macro_rules! nid_vars {
  ($($ident:ident),+ $(,)?) => { $crate::nid_vars!(@internal 0; $($ident),+); };

  (@internal $val:expr; $head:ident, $($tail:ident),+ $(,)?) => {
      let $head: $crate::nid::NID = $crate::nid::NID::var($val);
      $crate::nid_vars!(@internal $val + 1; $($tail),+);  };

  (@internal $val:expr; $head:ident) => { let $head: $crate::nid::NID = $crate::nid::NID::var($val); }; }


// Meta-macro that generates a macro for testing any base implementation.
macro_rules! base_test {
  ($name:ident, $basename:ident, $tt:tt) => {
    macro_rules! $name {
      ($BaseType:ident) => {
        #[test] fn $name() {
          use crate::base::Base;
          #[allow(unused_mut)]
          let mut $basename = <$BaseType as Base>::new(4);
          $tt }}}}}


// Test operations on constants.
base_test!(test_base_consts, b, {
  use crate::nid::{O,I,named::x0};

  assert!(O<I, "expect O<I");

  assert!(O==b.and(O,O), "O∧O");  assert!(O==b.and(I,O), "I∧O");
  assert!(O==b.and(O,I), "O∧I");  assert!(I==b.and(I,I), "I∧I");

  assert!(O==b.or(O,O), "O∨O");   assert!(I==b.or(I,O), "I∨O");
  assert!(I==b.or(O,I), "O∨I");   assert!(I==b.or(I,I), "I∨I");

  assert_eq!(b.and(x0, I), x0);   assert_eq!(b.and(x0, !x0), O);
  assert_eq!(b.or(x0, O), x0);    assert_eq!(b.or(x0, !x0), I);
  assert_eq!(b.nand(x0, x0), !x0);
  assert_eq!(b.num_gates(), 0, "constant folding should not create gates"); });


// Structural hashing: equal terms are equal nids.
base_test!(test_base_strash, b, {
  nid_vars![x0, x1, x2];
  let a = b.and(x0, x1);
  assert_eq!(a, b.and(x1, x0), "expect x0∧x1 == x1∧x0");
  let o = b.or(x1, x2);
  assert_eq!(o, !b.and(!x2, !x1), "or is a complemented and");
  assert_eq!(b.num_gates(), 2);
  assert_eq!(b.fanins(a), [x0, x1]);
  assert_eq!(b.fanins(!a), [x0, x1], "fanins ignore the polarity of the query");
  assert!(b.is_gate(a) && b.is_gate(!o) && !b.is_gate(x0));
  assert!(!b.is_or(a)); });


// Substitution rewires consumers and outputs with the right polarity.
base_test!(test_base_substitute, b, {
  nid_vars![x0, x1, x2, x3];
  let a = b.and(x0, x1);
  let c = b.and(!a, x2);
  let d = b.and(a, x3);
  b.add_output(c); b.add_output(!a); b.add_output(d);
  let r = b.and(x1, x2);
  b.substitute(a, !r);
  assert!(!b.is_gate(a), "a should be retired");
  assert_eq!(b.outputs()[1], r);
  assert_eq!(b.fanins(b.outputs()[0]), [r, x2]);
  let [p, q] = b.fanins(b.outputs()[2]);
  assert!((p, q) == (!r, x3) || (p, q) == (x3, !r)); });


// Substitution cascades through consumers that become trivial or duplicate.
base_test!(test_base_substitute_cascade, b, {
  nid_vars![x0, x1, x2];
  let a = b.and(x0, x1);
  let c = b.and(a, x2);
  let dup = b.and(x0, x2);   // what c becomes once a -> x0
  let e = b.and(a, !x0);     // ... and e becomes x0∧¬x0 = O
  b.add_output(e); b.add_output(c); b.add_output(dup);
  b.substitute(a, x0);
  assert_eq!(b.outputs(), &[crate::nid::O, dup, dup]);
  assert!(!b.is_gate(c) && !b.is_gate(e));
  assert_eq!(b.live_gates(), vec![dup]); });


// live_gates lists fanins before consumers and skips unused gates.
base_test!(test_base_live_gates, b, {
  nid_vars![x0, x1, x2, x3];
  let a = b.and(x0, x1);
  let _unused = b.and(x2, x3);
  let c = b.and(!a, x2);
  let d = b.and(c, a);
  b.add_output(!d); b.add_output(a);
  assert_eq!(b.live_gates(), vec![a, c, d]); });
