//! Bit-parallel simulation over every input assignment.
//!
//! Assignment `k` sets input `i` to bit `i` of `k`. Word `w` of a table
//! holds assignments `64*w .. 64*w+63`, so a network with `n` inputs has
//! `max(1, 2^n / 64)` words per signal. With fewer than 6 inputs the unused
//! high bits of the single word are always zero.
use fxhash::FxHashMap;
use crate::base::Base;
use crate::nid::NID;

/// Simulation is exhaustive, so refuse networks wider than this.
pub const MAX_INPUTS:usize = 20;

/// Truth table of a single signal.
pub type Table = Vec<u64>;

const PATTERNS:[u64;6] = [
  0xAAAA_AAAA_AAAA_AAAA, 0xCCCC_CCCC_CCCC_CCCC, 0xF0F0_F0F0_F0F0_F0F0,
  0xFF00_FF00_FF00_FF00, 0xFFFF_0000_FFFF_0000, 0xFFFF_FFFF_0000_0000 ];

fn num_words(ninputs:usize)->usize { if ninputs < 6 { 1 } else { 1 << (ninputs - 6) }}

fn mask(ninputs:usize)->u64 { if ninputs < 6 { (1u64 << (1 << ninputs)) - 1 } else { !0 }}

/// The table of each primary input.
pub fn input_tables(ninputs:usize)->Vec<Table> {
  assert!(ninputs <= MAX_INPUTS, "can't simulate {} inputs (max is {})", ninputs, MAX_INPUTS);
  let (nw, m) = (num_words(ninputs), mask(ninputs));
  (0..ninputs).map(|i| {
    if i < 6 { vec![PATTERNS[i] & m; nw] }
    else { (0..nw).map(|w| if (w >> (i - 6)) & 1 == 1 { !0 } else { 0 }).collect() }})
    .collect() }

/// Simulate the cones of `roots` and return one table per root.
pub fn eval_many<B:Base>(net:&B, roots:&[NID])->Vec<Table> {
  let n = net.num_inputs();
  let inputs = input_tables(n);
  let (nw, m) = (num_words(n), mask(n));
  let mut vals:FxHashMap<NID, Table> = FxHashMap::default();
  let get = |vals:&FxHashMap<NID,Table>, s:NID|->Table {
    let raw:Table =
      if s.is_const() { vec![0; nw] }
      else if s.is_var() { inputs[s.idx()].clone() }
      else { vals[&s.raw()].clone() };
    if s.is_inv() { raw.iter().map(|w| !w & m).collect() } else { raw }};
  for g in net.cone(roots) {
    let [x, y] = net.fanins(g);
    let (x, y) = (get(&vals, x), get(&vals, y));
    vals.insert(g, x.iter().zip(y.iter()).map(|(a, b)| a & b).collect()); }
  roots.iter().map(|&r| get(&vals, r)).collect() }

/// Truth table of one signal.
pub fn eval<B:Base>(net:&B, n:NID)->Table { eval_many(net, &[n]).swap_remove(0) }

/// Truth tables of every output, in output order.
pub fn truth_tables<B:Base>(net:&B)->Vec<Table> { eval_many(net, net.outputs()) }

/// Do two networks compute the same function at every output?
pub fn equivalent<B:Base, C:Base>(x:&B, y:&C)->bool {
  x.num_inputs() == y.num_inputs() && truth_tables(x) == truth_tables(y) }


#[cfg(test)] use crate::aig::AigBase;
#[cfg(test)] use crate::nid::{O, I};

#[test] fn test_input_tables() {
  assert_eq!(input_tables(2), vec![vec![0b1010], vec![0b1100]]);
  let t = input_tables(8);
  assert_eq!(t[0], vec![PATTERNS[0]; 4]);
  assert_eq!(t[6], vec![0, !0, 0, !0]);
  assert_eq!(t[7], vec![0, 0, !0, !0]); }

#[test] fn test_eval() {
  nid_vars![x0, x1];
  let mut b = <AigBase as Base>::new(2);
  let a = b.and(x0, x1);
  let o = b.or(x0, x1);
  assert_eq!(eval(&b, a), vec![0b1000]);
  assert_eq!(eval(&b, o), vec![0b1110]);
  assert_eq!(eval(&b, !x0), vec![0b0101], "complement must stay inside the mask");
  assert_eq!(eval(&b, O), vec![0]);
  assert_eq!(eval(&b, I), vec![0b1111]); }

#[test] fn test_truth_tables_wide() {
  let mut b = <AigBase as Base>::new(7);
  let (x0, x6) = (NID::var(0), NID::var(6));
  let a = b.and(x0, !x6);
  b.add_output(a); b.add_output(x6);
  let tt = truth_tables(&b);
  assert_eq!(tt[0], vec![PATTERNS[0], 0]);
  assert_eq!(tt[1], vec![0, !0]); }

#[test] fn test_equivalent() {
  nid_vars![x0, x1];
  let mut p = <AigBase as Base>::new(2);
  let x = expr![p, ((x0 & (!x1)) | ((!x0) & x1))];
  p.add_output(x);
  let mut q = <AigBase as Base>::new(2);
  let y = expr![q, ((x0 | x1) & (!(x0 & x1)))];
  q.add_output(y);
  assert!(equivalent(&p, &q));
  q.add_output(x0);
  assert!(!equivalent(&p, &q)); }

#[test] #[should_panic]
fn test_too_wide() { input_tables(MAX_INPUTS + 1); }
