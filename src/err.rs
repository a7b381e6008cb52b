//! Error kinds shared by every pass in the crate.
use thiserror::Error;

/// One variant per failure class. Budget and no-result failures are
/// recoverable (retry with different parameters); invariant failures mean
/// a transform is buggy and callers are expected to treat them as fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  /// A node/cube/pair budget was crossed; partial results were dropped.
  #[error("budget exceeded: {what} > {limit}")]
  Budget { what: &'static str, limit: usize },

  /// The input violates a precondition of the pass (e.g. covers with
  /// duplicate or single-cube-containing cube pairs given to fx).
  #[error("malformed input: {0}")]
  Malformed(String),

  /// A structural invariant failed post-transform. Always a bug.
  #[error("invariant violated: {0}")]
  Invariant(String),

  /// No decomposition exists under the given parameters.
  #[error("no result: {0}")]
  NoDecomposition(String),
}

pub type Result<T> = std::result::Result<T, Error>;
