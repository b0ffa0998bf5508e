//! And-inverter graphs with structural hashing and node substitution.
use std::fmt;
use fxhash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::base::Base;
use crate::nid::{NID, O, I};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Bit {
  /// fanins, smaller nid first.
  And(NID, NID),
  /// retired by `substitute`. the slot is never reused.
  Dead }

/// Errors from loading a serialized network.
#[derive(Debug, Error)]
pub enum AigErr {
  #[error("json: {0}")]
  Json(#[from] json::Error),
  #[error("expected format {expected:?}, got {got:?}")]
  Format { expected: &'static str, got: String },
  #[error("bad signal reference: {0}")]
  BadRef(String),
  #[error(transparent)]
  Io(#[from] std::io::Error) }

pub struct AigBase {
  bits: Vec<Bit>,                   // gates, in creation order
  ninputs: usize,
  live: usize,                      // number of bits that aren't Dead
  outs: Vec<NID>,
  tags: FxHashMap<String, NID>,     // support for naming signals
  hash: FxHashMap<(NID,NID), NID> } // structural hash: fanins -> gate

/// Constant folding for a single AND. Returns `None` when a gate is needed.
fn fold_and(x:NID, y:NID)->Option<NID> {
  match (x, y) {
    (O, _) | (_, O) => Some(O),
    (I, y) => Some(y),
    (x, I) => Some(x),
    _ if x == y => Some(x),
    _ if x == !y => Some(O),
    _ => None }}

fn order(x:NID, y:NID)->(NID,NID) { if x < y { (x,y) } else { (y,x) }}

impl AigBase {

  pub fn empty()->AigBase { <AigBase as Base>::new(0) }
  pub fn len(&self)->usize { self.bits.len() }
  pub fn is_empty(&self)->bool { self.bits.is_empty() }

  /// Add a fresh primary input and return its signal.
  pub fn add_input(&mut self)->NID {
    self.ninputs += 1;
    NID::var(self.ninputs as u32 - 1) }

  /// find or create the gate for an ordered pair of fanins.
  fn nid(&mut self, key:(NID,NID))->NID {
    match self.hash.get(&key) {
      Some(&n) => n,
      None => {
        let nid = NID::ixn(self.bits.len());
        self.bits.push(Bit::And(key.0, key.1));
        self.hash.insert(key, nid);
        self.live += 1;
        nid }}}

  fn check(&self, x:NID) {
    if x.is_var() { assert!(x.idx() < self.ninputs, "input {} is out of range", x) }
    else if x.is_ixn() { assert!(self.is_gate(x), "{} is not a live gate", x) }}

  /// Assign a name to signal `n` and return `n`.
  pub fn tag(&mut self, n:NID, s:String)->NID { self.tags.insert(s, n); n }

  /// Fetch a signal by name.
  pub fn get(&self, s:&str)->Option<NID> { self.tags.get(s).copied() }

  /// Call `f` once for every node in the cone of `n` (gates and literals),
  /// parents before children.
  pub fn walk<F>(&self, n:NID, f:&mut F) where F: FnMut(NID) {
    let mut seen = FxHashSet::default();
    let mut stack = vec![n.raw()];
    while let Some(n) = stack.pop() {
      if !seen.insert(n) { continue }
      f(n);
      if let Some(Bit::And(x, y)) = self.bit(n) { stack.push(y.raw()); stack.push(x.raw()) }}}

  fn bit(&self, n:NID)->Option<Bit> {
    if n.is_ixn() { self.bits.get(n.idx()).copied() } else { None }}

  /// retire gate `me` in favor of `to`, recording where it went.
  fn retire(&mut self, me:NID, to:NID, fwd:&mut FxHashMap<NID,NID>) {
    if let Bit::And(x, y) = self.bits[me.idx()] {
      if self.hash.get(&(x,y)) == Some(&me) { self.hash.remove(&(x,y)); }}
    self.bits[me.idx()] = Bit::Dead;
    self.live -= 1;
    fwd.insert(me, to); }

  /// Construct a new AigBase with only the gates the outputs depend on,
  /// renumbered in topological order. Tags that point at dropped gates
  /// are discarded.
  pub fn repack(&self)->AigBase {
    let mut res = <AigBase as Base>::new(self.ninputs);
    let mut new:FxHashMap<NID,NID> = FxHashMap::default();
    let nn = |new:&FxHashMap<NID,NID>, x:NID| {
      if x.is_lit() { x } else { new[&x.raw()].inv_if(x.is_inv()) }};
    for g in self.live_gates() {
      let [x, y] = self.fanins(g);
      let (x, y) = (nn(&new, x), nn(&new, y));
      let r = res.and(x, y);
      new.insert(g, r); }
    for &o in &self.outs { res.add_output(nn(&new, o)); }
    for (k, &v) in &self.tags {
      if v.is_lit() || new.contains_key(&v.raw()) { res.tag(nn(&new, v), k.clone()); }}
    res }
} // impl AigBase

impl fmt::Debug for AigBase {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "AigBase[i:{} g:{}/{} o:{}]", self.ninputs, self.live, self.bits.len(), self.outs.len()) }}

impl Base for AigBase {

  fn new(ninputs:usize)->Self {
    AigBase{ bits:vec![], ninputs, live:0, outs:vec![], tags:FxHashMap::default(), hash:FxHashMap::default() }}

  fn num_inputs(&self)->usize { self.ninputs }
  fn num_gates(&self)->usize { self.live }
  fn outputs(&self)->&[NID] { &self.outs }

  fn add_output(&mut self, n:NID)->usize {
    self.check(n);
    self.outs.push(n);
    self.outs.len()-1 }

  fn is_gate(&self, n:NID)->bool { matches!(self.bit(n), Some(Bit::And(_,_))) }

  fn fanins(&self, n:NID)->[NID;2] {
    match self.bit(n) {
      Some(Bit::And(x, y)) => [x, y],
      _ => panic!("fanins({}): not a live gate", n) }}

  fn and(&mut self, x:NID, y:NID)->NID {
    self.check(x); self.check(y);
    match fold_and(x, y) {
      Some(n) => n,
      None => self.nid(order(x, y)) }}

  fn substitute(&mut self, old:NID, new:NID) {
    let new = new.inv_if(old.is_inv());
    let old = old.raw();
    if new.raw() == old { return }
    assert!(self.is_gate(old), "substitute({}, _): not a live gate", old);
    self.check(new);
    trace!("substitute({}, {})", old, new);
    // fwd maps each retired gate to its replacement, which may itself be
    // retired later in the cascade, so always resolve through it.
    let mut fwd:FxHashMap<NID,NID> = FxHashMap::default();
    let resolve = |fwd:&FxHashMap<NID,NID>, mut n:NID| {
      while let Some(&to) = fwd.get(&n.raw()) { n = to.inv_if(n.is_inv()) }
      n };
    self.retire(old, new, &mut fwd);
    let mut work = vec![old];
    while let Some(dead) = work.pop() {
      let to = resolve(&fwd, dead);
      let sub = |s:NID| if s.raw() == dead { to.inv_if(s.is_inv()) } else { s };
      for o in self.outs.iter_mut() { *o = sub(*o) }
      for v in self.tags.values_mut() { *v = sub(*v) }
      for ix in 0..self.bits.len() {
        let Bit::And(x, y) = self.bits[ix] else { continue };
        if x.raw() != dead && y.raw() != dead { continue }
        let me = NID::ixn(ix);
        if self.hash.get(&(x,y)) == Some(&me) { self.hash.remove(&(x,y)); }
        let (x, y) = (sub(x), sub(y));
        let key = order(x, y);
        let hit = fold_and(x, y).or_else(|| self.hash.get(&key).copied());
        match hit {
          Some(n) => {
            trace!("  consumer {} collapses to {}", me, n);
            self.retire(me, n, &mut fwd);
            work.push(me) }
          None => {
            self.bits[ix] = Bit::And(key.0, key.1);
            self.hash.insert(key, me); }}}}}

  // generate dot file (graphviz)
  fn dot(&self, n:NID, wr: &mut dyn std::fmt::Write) {
    macro_rules! w {
      ($x:expr $(,$xs:expr)*) => { writeln!(wr, $x $(,$xs)*).expect("failed to write dot output") }}
    w!("digraph aig {{");
    w!("rankdir=BT;"); // put root on top
    w!("node[shape=circle];");
    w!("edge[style=solid];");
    self.walk(n, &mut |n| {
      match n {
        O => w!(" \"{}\"[label=⊥];", n),
        _ if n.is_var() => w!(" \"{}\"[label=\"{}\",shape=box];", n, n),
        _ => {
          w!(" \"{}\"[label=∧];", n);
          for x in self.fanins(n) {
            w!("edge[style={}];", if x.is_inv() { "dashed" } else { "solid" });
            w!(" \"{}\"->\"{}\";", x.raw(), n); }}}});
    w!("}}"); }
} // impl Base for AigBase

include!("aig/aig-json.rs");

test_base_consts!(AigBase);
test_base_strash!(AigBase);
test_base_substitute!(AigBase);
test_base_substitute_cascade!(AigBase);
test_base_live_gates!(AigBase);

#[test] fn test_add_input() {
  let mut b = AigBase::empty();
  assert_eq!(b.add_input(), NID::var(0));
  assert_eq!(b.add_input(), NID::var(1));
  assert_eq!(b.num_inputs(), 2); }

#[test] #[should_panic]
fn test_input_out_of_range() {
  let mut b = <AigBase as Base>::new(2);
  b.and(NID::var(0), NID::var(2)); }

#[test] fn test_tags_follow_substitution() {
  nid_vars![x0, x1, x2];
  let mut b = <AigBase as Base>::new(3);
  let a = b.and(x0, x1);
  b.tag(!a, "na".to_string());
  let r = b.and(x0, x2);
  b.substitute(a, r);
  assert_eq!(b.get("na"), Some(!r)); }

#[test] fn test_repack() {
  nid_vars![x0, x1, x2, x3];
  let mut b = <AigBase as Base>::new(4);
  let _unused = b.and(x2, x3);
  let a = b.and(x0, x1);
  let c = b.and(!a, x2);
  b.add_output(!c);
  b.tag(c, "c".to_string());
  b.substitute(a, x0);  // leaves a dead slot behind
  let r = b.repack();
  assert_eq!(r.num_gates(), 1);
  assert_eq!(r.len(), 1);
  assert_eq!(r.outputs(), &[!NID::ixn(0)]);
  assert_eq!(r.fanins(NID::ixn(0)), [x2, !x0]);
  assert_eq!(r.get("c"), Some(NID::ixn(0))); }

#[test] fn test_unused_gates_counted_until_repack() {
  nid_vars![x0, x1, x2];
  let mut b = <AigBase as Base>::new(3);
  let a = b.and(x0, x1);
  b.add_output(a);
  let _scratch = b.and(x1, !x2);   // built, never wired to anything
  assert_eq!(b.num_gates(), 2);
  assert_eq!(b.live_gates(), vec![a]);
  let r = b.repack();
  assert_eq!(r.num_gates(), 1);
  assert_eq!(r.live_gates().len(), 1); }

#[test] fn test_dot() {
  nid_vars![x0, x1];
  let mut b = <AigBase as Base>::new(2);
  let a = b.and(x0, !x1);
  let mut s = String::new();
  b.dot(a, &mut s);
  assert!(s.starts_with("digraph aig {"));
  assert!(s.contains("edge[style=dashed];\n \"x1\"->\"#0\";"));
  assert!(s.trim_end().ends_with('}')); }
