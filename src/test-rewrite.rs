// test suite for the depth rewriter. (included at bottom of rewrite.rs)

#[cfg(test)] use crate::{aig::AigBase, nid::NID, sim};
#[cfg(test)] use rand::{rngs::StdRng, Rng, SeedableRng};

// -- helpers -----------------------------------------------------------------

/// random network that leans on recently created gates, so it gets deep.
#[cfg(test)] fn random_aig(seed:u64, ninputs:usize, ngates:usize, nouts:usize)->AigBase {
  let mut rng = StdRng::seed_from_u64(seed);
  let mut b = <AigBase as Base>::new(ninputs);
  let mut pool:Vec<NID> = (0..ninputs as u32).map(NID::var).collect();
  for _ in 0..ngates {
    let recent = pool.len() - 1 - rng.gen_range(0..pool.len().min(3));
    let other = rng.gen_range(0..pool.len());
    let x = pool[recent].inv_if(rng.gen());
    let y = pool[other].inv_if(rng.gen());
    let g = b.and(x, y);
    if g.is_ixn() { pool.push(g.raw()) }}
  for i in 0..nouts {
    let o = pool[pool.len() - 1 - i.min(pool.len() - 1)];
    b.add_output(o.inv_if(rng.gen())); }
  b }

/// x0 ∘ x1 ∘ ... ∘ xd, folded to the left, with the polarity of each
/// operand taken from the bits of `pol`. depth is exactly `d`.
#[cfg(test)] fn mixed_chain(d:usize, pol:u64)->AigBase {
  let mut b = <AigBase as Base>::new(d + 1);
  let mut acc = NID::var(0);
  for i in 1..=d {
    let x = NID::var(i as u32).inv_if((pol >> (2*i)) & 1 == 1);
    acc = b.and(acc.inv_if((pol >> (2*i + 1)) & 1 == 1), x); }
  b.add_output(acc);
  b }

#[cfg(test)] fn left_chain(n:usize)->AigBase { mixed_chain(n - 1, 0) }

/// (x ∧ x2) ∨ (x ∧ x3) with x = x0 ∧ x1. returns the network and x.
#[cfg(test)] fn shared_factor_net()->(AigBase, NID) {
  nid_vars![x0, x1, x2, x3];
  let mut n = <AigBase as Base>::new(4);
  let x = n.and(x0, x1);
  let xp = n.and(x, x2);
  let xq = n.and(x, x3);
  let out = n.or(xp, xq);
  n.add_output(out);
  (n, x) }

/// x0 ∧ ¬(x1 ∧ ¬((x3 ∧ x4) ∧ x2)): depth 4.
#[cfg(test)] fn inverted_chain_net()->AigBase {
  nid_vars![x0, x1, x2, x3, x4];
  let mut n = <AigBase as Base>::new(5);
  let t = n.and(x3, x4);
  let bb = n.and(t, x2);
  let a = n.and(x1, !bb);
  let out = n.and(x0, !a);
  n.add_output(out);
  n }

/// Try every rule on every gate of `make()`. For each match, rebuild the
/// network, apply the rewrite, and check that the replacement sits below
/// the node it replaces while no surviving gate gets deeper.
/// Returns the number of rewrites checked.
#[cfg(test)] fn check_replacement_levels(make:&dyn Fn()->AigBase)->usize {
  let net = make();
  let ci = CriticalityInfo::refresh(&net);
  let mut checked = 0;
  for &n in ci.gates() {
    for rule in Rule::ALL {
      let Some(rw) = rule.find(&net, &ci, n) else { continue };
      let mut tmp = make();
      let new = rw.build(&mut tmp);
      if new.raw() == n { continue }
      tmp.add_output(new);
      let with_new = CriticalityInfo::refresh(&tmp);
      assert!(with_new.level(new) < ci.level(n),
        "{} at {}: replacement {} has level {}, node had {}", rule, n, new, with_new.level(new), ci.level(n));
      tmp.substitute(n, new);
      let after = CriticalityInfo::refresh(&tmp);
      for &g in after.gates() {
        if ci.gates().contains(&g) {
          assert!(after.level(g) <= ci.level(g),
            "{} at {}: {} went from level {} to {}", rule, n, g, ci.level(g), after.level(g)); }}
      assert!(after.depth() <= ci.depth());
      checked += 1; }}
  checked }

#[cfg(test)] fn ceil_log2(k:usize)->u32 { usize::BITS - (k - 1).leading_zeros() }


// -- scenarios ---------------------------------------------------------------

#[test] fn test_assoc_scenario() {
  let _ = simplelog::TermLogger::init(simplelog::LevelFilter::Warn, simplelog::Config::default());
  nid_vars![x0, x1, x2, x3];
  let mut n = <AigBase as Base>::new(4);
  let b = n.and(x0, x1);     // deeper than a = x2
  let bc = n.and(b, x3);
  let out = n.and(x2, bc);
  n.add_output(out);
  let before = sim::truth_tables(&n);
  let stats = optimize_depth(&mut n);
  assert_eq!((stats.assoc, stats.total(), stats.sweeps), (1, 1, 2));
  assert_eq!((stats.depth_before, stats.depth_after), (3, 2));
  assert_eq!(sim::truth_tables(&n), before);
  let ac = n.and(x2, x3);
  assert_eq!(n.fanins(n.outputs()[0]), [b, ac], "expected b ∧ (a ∧ c)"); }

#[test] fn test_dist_scenario() {
  nid_vars![x0, x1, x2, x3];
  let (mut n, x) = shared_factor_net();
  let stats = optimize_depth(&mut n);
  assert_eq!((stats.dist, stats.total(), stats.sweeps), (1, 1, 2));
  assert_eq!((stats.depth_before, stats.depth_after), (3, 2));
  let mut want = <AigBase as Base>::new(4);
  let f = expr![want, ((x0 & x1) & (x2 | x3))];
  want.add_output(f);
  assert!(sim::equivalent(&n, &want));
  // the output is now x ∧ (p ∨ q), with x as a direct fanin.
  let top = n.outputs()[0];
  assert!(!top.is_inv());
  assert!(n.fanins(top).contains(&x)); }

#[test] fn test_dist3_scenario() {
  let mut n = inverted_chain_net();
  let before = sim::truth_tables(&n);
  let stats = optimize_depth(&mut n);
  assert_eq!((stats.dist3, stats.total()), (1, 1));
  assert_eq!((stats.depth_before, stats.depth_after), (4, 3));
  assert_eq!(sim::truth_tables(&n), before); }

#[test] fn test_no_match_unchanged() {
  nid_vars![x0, x1, x2, x3, x4, x5];
  let mut n = <AigBase as Base>::new(6);
  let l = n.and(x0, x1);
  let r = n.and(!x2, x3);
  let top = n.and(l, !r);
  let side = n.and(x4, !x5);
  n.add_output(top); n.add_output(!side);
  let before = n.to_json();
  let stats = optimize_depth(&mut n);
  assert_eq!(stats, RewriteStats{ sweeps: 1, depth_before: 2, depth_after: 2, ..Default::default() });
  assert_eq!(n.to_json(), before); }

#[test] fn test_two_critical_paths() {
  // rewriting one chain leaves the depth alone until the other is done too.
  let mut n = <AigBase as Base>::new(8);
  let mut outs = vec![];
  for base in [0, 4] {
    let mut acc = NID::var(base);
    for i in 1..4 { acc = n.and(acc, NID::var(base + i)) }
    outs.push(acc); }
  for o in outs { n.add_output(o); }
  let before = sim::truth_tables(&n);
  let ci = CriticalityInfo::refresh(&n);
  assert_eq!(rewrite_once(&mut n, &ci), Some(Rule::Assoc));
  assert_eq!(CriticalityInfo::refresh(&n).depth(), 3);
  let stats = optimize_depth(&mut n);
  assert_eq!((stats.assoc, stats.total()), (1, 1));
  assert_eq!((stats.depth_before, stats.depth_after), (3, 2));
  assert_eq!(sim::truth_tables(&n), before); }

#[test] fn test_left_chain() {
  for k in 2..=12 {
    let mut n = left_chain(k);
    let before = sim::truth_tables(&n);
    let stats = optimize_depth(&mut n);
    assert_eq!(stats.depth_before as usize, k - 1);
    if k >= 4 { assert!(stats.depth_after < stats.depth_before, "chain of {} didn't improve", k) }
    else { assert_eq!(stats.total(), 0) }
    assert!(stats.depth_after >= ceil_log2(k), "chain of {}: depth {} is impossible", k, stats.depth_after);
    assert_eq!(sim::truth_tables(&n), before, "chain of {}", k); }}


// -- properties ----------------------------------------------------------------

#[test] fn test_termination_by_depth() {
  for d in 1..=10 {
    for pol in [0, 0x5555_5555, 0xAAAA_AAAA, 0x0F0F_0F0F, 0x3C3C_3C3C] {
      let mut n = mixed_chain(d, pol);
      let before = sim::truth_tables(&n);
      let stats = optimize_depth(&mut n);
      assert_eq!(stats.depth_before as usize, d);
      assert!(stats.depth_after <= stats.depth_before);
      assert_eq!(sim::truth_tables(&n), before, "depth {} polarity {:x}", d, pol); }}}

#[test] fn test_each_rewrite_preserves_function() {
  for seed in 0..30 {
    let mut n = random_aig(seed, 8, 60, 4);
    let mut steps = 0;
    loop {
      let ci = CriticalityInfo::refresh(&n);
      let before = sim::truth_tables(&n);
      match rewrite_once(&mut n, &ci) {
        Some(rule) => {
          steps += 1;
          assert!(steps < 10_000, "seed {}: no fixpoint", seed);
          assert_eq!(sim::truth_tables(&n), before, "seed {}: {} changed the function", seed, rule);
          let after = CriticalityInfo::refresh(&n);
          assert!(after.depth() <= ci.depth(), "seed {}: {} increased the depth", seed, rule); }
        None => break }}}}

#[test] fn test_replacements_sit_lower() {
  let mut checked = 0;
  for k in 4..=10 { checked += check_replacement_levels(&|| left_chain(k)) }
  assert!(checked >= 7, "every chain of 4 or more has an assoc match");
  let fixed = checked;
  checked += check_replacement_levels(&|| shared_factor_net().0);
  checked += check_replacement_levels(&inverted_chain_net);
  assert_eq!(checked, fixed + 2, "expected one dist and one dist3 match");
  for seed in 0..40 { checked += check_replacement_levels(&|| random_aig(seed, 8, 60, 4)) }
  for d in 1..=10 {
    for pol in [0x5555_5555, 0xAAAA_AAAA, 0x0F0F_0F0F] {
      checked += check_replacement_levels(&|| mixed_chain(d, pol)) }}
  debug!("checked {} rewrites", checked); }

#[test] fn test_fixpoint_is_idempotent() {
  for seed in 0..20 {
    let mut n = random_aig(seed, 6, 40, 3);
    let orig = sim::truth_tables(&n);
    let first = optimize_depth(&mut n);
    assert!(first.depth_after <= first.depth_before);
    let snap = n.to_json();
    let again = optimize_depth(&mut n);
    assert_eq!((again.total(), again.sweeps), (0, 1), "seed {}", seed);
    assert_eq!(again.depth_before, first.depth_after);
    assert_eq!(n.to_json(), snap, "seed {}", seed);
    assert_eq!(sim::truth_tables(&n), orig); }}

#[test] fn test_stats_display() {
  let s = RewriteStats{ assoc: 2, dist: 1, dist3: 0, sweeps: 4, depth_before: 7, depth_after: 5 };
  assert_eq!(s.total(), 3);
  assert_eq!(s.to_string(), "depth 7 -> 5 in 4 sweeps (assoc:2 dist:1 dist3:0)"); }

#[cfg(feature="slowtests")]
#[test] fn test_random_large() {
  for seed in 0..200 {
    let mut n = random_aig(seed, 12, 400, 8);
    let before = sim::truth_tables(&n);
    let stats = optimize_depth(&mut n);
    assert!(stats.depth_after <= stats.depth_before);
    assert_eq!(sim::truth_tables(&n), before, "seed {}", seed); }}
