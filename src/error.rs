//! Error taxonomy for the engine.
//!
//! Two of the four variants are *expected* control-flow signals rather than
//! bugs: [`Error::Inconsistency`] is raised by domain/constraint code the
//! moment a variable's domain is wiped out, and [`Error::StopSearch`] is
//! raised by the search engine when a caller-supplied limit fires. Both are
//! caught at well-defined boundaries (branch evaluation, `solve`) rather than
//! propagated to the top of the program. `Overflow` and `Misuse` are
//! programmer errors and are meant to terminate the caller's model
//! construction.

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A domain was wiped out (or would be) during propagation. Expected
    /// during search; every DFS branch catches this and continues to the
    /// next sibling.
    #[error("inconsistency")]
    Inconsistency,

    /// Raised by [`crate::search::DFSearch`] when its limit predicate
    /// returns true. Caught once at the top of `solve`.
    #[error("search stopped by limit")]
    StopSearch,

    /// Bound arithmetic exceeded the 32-bit signed range at model
    /// construction (a view constructor or `Sum`'s term insertion).
    #[error("integer overflow constructing model: {0}")]
    Overflow(String),

    /// An incompatible combination of factory parameters, or any other
    /// programmer misuse that the type system does not rule out statically.
    #[error("invalid model: {0}")]
    Misuse(String),
}

impl Error {
    pub fn is_inconsistency(&self) -> bool {
        matches!(self, Error::Inconsistency)
    }
}
