//! A crate for reducing the depth of and-inverter graphs.
//!
//! The rewriter looks for three local patterns around gates on the
//! critical path (associativity and two- and three-level distributivity)
//! and replaces each with an equivalent, shallower structure until no
//! pattern applies.

#![allow(clippy::many_single_char_names)]

#[macro_use] extern crate log;
extern crate simplelog;

/// Standard interface for networks of two-input AND gates.
pub mod base;
pub use base::*;

/// Node IDs (signals with a complement bit)
pub mod nid;

/// And-inverter graphs with structural hashing.
pub mod aig;

/// Levels and critical paths.
pub mod depth;

/// The three depth-reducing rules.
pub mod rules;

/// The fixpoint driver.
pub mod rewrite;
pub use rewrite::{optimize_depth, RewriteStats};

/// Exhaustive simulation for checking equivalence.
pub mod sim;
