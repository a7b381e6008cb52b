//! Algebraic restructuring kernels for combinational logic networks.
//!
//! The crate is organized around one data model: a network of objects
//! ([`net`]) whose nodes carry two-level covers ([`sop`]), decision
//! diagrams ([`dd`]) or AIG subgraphs ([`aig`]), and a family of
//! rewriting passes over it: fast extract ([`fx`]), collapsing through
//! global BDDs ([`global`], [`collapse`]), K-LUT decomposition
//! ([`lutmin`]) and rail-constrained LUT cascades ([`cascade`]).

#![allow(clippy::many_single_char_names)]

#[macro_use] extern crate log;

/// Crate-wide error type and result alias.
pub mod err;
pub use err::{Error, Result};

/// Packed decision-diagram edges (node index + complement bit).
pub mod edge;
/// The decision-diagram manager: unique table, cache, apply, reordering, ISOP.
pub mod dd;
/// Cubes, SOP covers, and the per-network cover arena.
pub mod sop;
/// Word-packed truth tables.
pub mod tt;

/// The network model: objects, fanin/fanout bookkeeping, traversal.
pub mod net;
/// Structurally hashed AND-inverter graphs and the strash pass.
pub mod aig;

/// Global-BDD construction with a node budget.
pub mod global;
/// Collapse a network into two-level form through its global BDDs.
pub mod collapse;
/// Fast extract: shared-divisor extraction over a sparse cube matrix.
pub mod fx;
/// BDD-to-MUX conversion and K-LUT decomposition.
pub mod lutmin;
/// Rail-constrained LUT cascade synthesis.
pub mod cascade;
