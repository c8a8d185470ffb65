//! CAD/FEA backend capability interface
//!
//! The external CAD/FEA application is modelled as a [`FeaBackend`]: open a
//! document, overwrite named sketch constraints, recompute, run the solver,
//! read back raw result fields, close. The application is a single shared
//! stateful resource, so a backend owns at most one open document and every
//! operation takes `&mut self`.
//!
//! Two implementations ship with the crate: [`freecad::FreecadBackend`]
//! drives a headless FreeCAD child process, [`mock::MockBackend`] is an
//! in-memory stand-in for tests and dry runs.

pub mod freecad;
pub mod mock;

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::error::BackendError;

/// Raw result fields read from the results container after a solve,
/// keyed by field name, one value per mesh element or node
#[derive(Debug, Clone, Default)]
pub struct SolveOutput {
    fields: FxHashMap<String, Vec<f64>>,
}

impl SolveOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_field(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.fields.insert(name.into(), values);
    }

    pub fn field(&self, name: &str) -> Option<&[f64]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Capability interface over the external CAD/FEA application
pub trait FeaBackend {
    /// Open the document. The backend holds the handle until [`close`](Self::close).
    fn open(&mut self, path: &Path) -> Result<(), BackendError>;

    /// Locate `constraint` in the driving sketch of `object` and overwrite
    /// its datum. Fails with [`BackendError::ConstraintNotFound`] when the
    /// name is absent; no other constraint may be touched in that case.
    fn set_constraint(
        &mut self,
        object: &str,
        constraint: &str,
        value: f64,
    ) -> Result<(), BackendError>;

    /// Regenerate geometry and dependent features after constraint changes
    fn recompute(&mut self) -> Result<(), BackendError>;

    /// Read a constraint's current datum back from the document
    fn constraint_value(&mut self, object: &str, constraint: &str) -> Result<f64, BackendError>;

    /// Purge prior results, reset solver state, synchronize solver objects,
    /// check prerequisites, execute the solve, and read the requested
    /// fields from the named results container.
    fn solve(
        &mut self,
        solver: &str,
        results: &str,
        fields: &[&str],
    ) -> Result<SolveOutput, BackendError>;

    /// Release the document handle
    fn close(&mut self) -> Result<(), BackendError>;
}
