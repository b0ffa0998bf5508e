//! depth optimization on generated networks.
use aigdepth::{aig::AigBase, nid::NID, optimize_depth, Base};

fn main() { divan::main(); }

/// AND of `n` inputs folded to the left: depth n-1.
fn left_chain(n:usize)->AigBase {
  let mut b = <AigBase as Base>::new(n);
  let mut acc = NID::var(0);
  for i in 1..n { acc = b.and(acc, NID::var(i as u32)) }
  b.add_output(acc);
  b }

/// alternating AND/OR chain: x0 ∧ x1 ∨ x2 ∧ x3 ...
fn and_or_chain(n:usize)->AigBase {
  let mut b = <AigBase as Base>::new(n);
  let mut acc = NID::var(0);
  for i in 1..n {
    let x = NID::var(i as u32);
    acc = if i % 2 == 0 { b.or(acc, x) } else { b.and(acc, x) }}
  b.add_output(acc);
  b }

#[divan::bench(args = [16, 64, 256])]
fn chain(bencher: divan::Bencher, n:usize) {
  bencher.with_inputs(|| left_chain(n)).bench_local_values(|mut b| optimize_depth(&mut b)); }

#[divan::bench(args = [16, 64, 256])]
fn and_or(bencher: divan::Bencher, n:usize) {
  bencher.with_inputs(|| and_or_chain(n)).bench_local_values(|mut b| optimize_depth(&mut b)); }
