//! src/error.rs
//! This module defines the custom error types for the library.
//! All fallible operations reject a malformed configuration up front and
//! return a recoverable Result instead of panicking.

use thiserror::Error;

/// The primary error type for all fallible operations in this library.
///
/// Numerical near-degeneracy of the two magnon bands is deliberately not an
/// error: close to a gap closing the Berry curvature estimate is still
/// computed and returned, and callers inspect [`crate::ChernSummary`] to
/// flag suspect parameter regions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MagnonError {
    #[error("Invalid k-mesh resolution nk = {nk}. Must be >= 2 to define a plaquette spacing.")]
    InvalidKmesh { nk: usize },

    #[error("The parameter range for '{axis}' is empty.")]
    EmptyParameterRange { axis: &'static str },

    #[error("Invalid k-path sampling count nk = {nk}. Must be >= 2 to span a segment.")]
    InvalidPathSampling { nk: usize },

    #[error("Degenerate k-path: the nodes span zero length.")]
    DegenerateKPath,
}

/// A specialized `Result` type for this library's operations.
pub type Result<T> = std::result::Result<T, MagnonError>;
