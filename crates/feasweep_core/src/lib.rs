//! Parametric FEA sweep engine
//!
//! This crate automates parameter sweeps over a parametric CAD model: it
//! mutates named sketch constraints through a backend capability interface,
//! triggers the external finite-element solve for every point of the sweep
//! grid, and reduces the raw result fields into an ordered scalar table.
//! The CAD kernel, mesher, and solver stay entirely on the other side of
//! the [`backend::FeaBackend`] trait.
//!
//! # Builder DSL
//!
//! ```ignore
//! use feasweep_core::config::{OutputSpec, ParameterSpec, SweepBuilder, ValueSpec};
//! use feasweep_core::sweep::run_sweep;
//!
//! let config = SweepBuilder::new("plate.FCStd")
//!     .parameter(
//!         ParameterSpec::new("Sketch", "HoleDiameter", ValueSpec::linspace(10.0, 20.0, 5))
//!             .units("mm"),
//!     )
//!     .output(OutputSpec::new("vonMises").label("Max. Von Mises").units("MPa"))
//!     .output(OutputSpec::new("DisplacementLengths").label("Max. displacement").units("mm"))
//!     .build();
//!
//! let table = run_sweep(&mut backend, &config, None)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod backend;
pub mod error;
pub mod reduce;
pub mod results;
pub mod sweep;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{FailurePolicy, OutputSpec, ParameterSpec, SweepBuilder, SweepConfig, ValueSpec};
pub use results::{SweepRecord, SweepTable};
pub use sweep::run_sweep;
