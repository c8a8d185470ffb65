//! In-memory backend for tests and configuration dry runs
//!
//! A [`MockBackend`] holds a small document model (objects whose driving
//! sketches carry named constraints) and a field synthesizer that maps the
//! last recomputed constraint state to raw result arrays. Constraint writes
//! only become visible to the synthesizer after [`recompute`]: a sweep
//! driver that forgets to recompute solves against stale geometry, exactly
//! like the real application.
//!
//! [`recompute`]: crate::backend::FeaBackend::recompute

use std::collections::HashSet;
use std::path::Path;

use rustc_hash::FxHashMap;

use super::{FeaBackend, SolveOutput};
use crate::error::BackendError;

/// Committed (recomputed) constraint state handed to the field synthesizer
#[derive(Debug, Clone, Default)]
pub struct MockModel {
    datums: FxHashMap<(String, String), f64>,
}

impl MockModel {
    pub fn datum(&self, object: &str, constraint: &str) -> Option<f64> {
        self.datums
            .get(&(object.to_string(), constraint.to_string()))
            .copied()
    }

    /// Sum of all committed datums; a convenient basis for synthetic fields
    pub fn datum_sum(&self) -> f64 {
        self.datums.values().sum()
    }
}

type Synthesizer = Box<dyn Fn(&MockModel) -> SolveOutput + Send>;

/// In-memory [`FeaBackend`] implementation
pub struct MockBackend {
    solver_name: String,
    results_name: String,
    current: MockModel,
    committed: MockModel,
    open: bool,
    dirty: bool,
    synthesize: Synthesizer,
    fail_solve_at: HashSet<usize>,
    solve_calls: usize,
    recompute_calls: usize,
}

impl MockBackend {
    /// Backend expecting the given solver and results-container names.
    /// Starts with an empty document model and a synthesizer that produces
    /// no fields; populate with [`constraint`](Self::constraint) and
    /// [`with_synthesizer`](Self::with_synthesizer).
    pub fn new(solver_name: impl Into<String>, results_name: impl Into<String>) -> Self {
        Self {
            solver_name: solver_name.into(),
            results_name: results_name.into(),
            current: MockModel::default(),
            committed: MockModel::default(),
            open: false,
            dirty: false,
            synthesize: Box::new(|_| SolveOutput::new()),
            fail_solve_at: HashSet::new(),
            solve_calls: 0,
            recompute_calls: 0,
        }
    }

    /// Add a named constraint with an initial datum to an object's sketch
    pub fn constraint(mut self, object: &str, constraint: &str, datum: f64) -> Self {
        self.current
            .datums
            .insert((object.to_string(), constraint.to_string()), datum);
        self.committed
            .datums
            .insert((object.to_string(), constraint.to_string()), datum);
        self
    }

    /// Replace the field synthesizer
    pub fn with_synthesizer(
        mut self,
        synthesize: impl Fn(&MockModel) -> SolveOutput + Send + 'static,
    ) -> Self {
        self.synthesize = Box::new(synthesize);
        self
    }

    /// Make the Nth, ... solve calls (0-based) fail with a solver error
    pub fn fail_solve_at(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.fail_solve_at.extend(indices);
        self
    }

    /// How many times `recompute` has been called
    pub fn recompute_calls(&self) -> usize {
        self.recompute_calls
    }

    /// How many times `solve` has been called
    pub fn solve_calls(&self) -> usize {
        self.solve_calls
    }

    fn require_open(&self) -> Result<(), BackendError> {
        if self.open {
            Ok(())
        } else {
            Err(BackendError::DocumentClosed)
        }
    }

    fn lookup(&self, object: &str, constraint: &str) -> Result<(), BackendError> {
        let has_object = self.current.datums.keys().any(|(o, _)| o == object);
        if !has_object {
            return Err(BackendError::ObjectNotFound(object.to_string()));
        }
        let key = (object.to_string(), constraint.to_string());
        if !self.current.datums.contains_key(&key) {
            return Err(BackendError::ConstraintNotFound {
                object: object.to_string(),
                constraint: constraint.to_string(),
            });
        }
        Ok(())
    }
}

impl FeaBackend for MockBackend {
    fn open(&mut self, _path: &Path) -> Result<(), BackendError> {
        self.open = true;
        Ok(())
    }

    fn set_constraint(
        &mut self,
        object: &str,
        constraint: &str,
        value: f64,
    ) -> Result<(), BackendError> {
        self.require_open()?;
        self.lookup(object, constraint)?;
        self.current
            .datums
            .insert((object.to_string(), constraint.to_string()), value);
        self.dirty = true;
        Ok(())
    }

    fn recompute(&mut self) -> Result<(), BackendError> {
        self.require_open()?;
        self.committed = self.current.clone();
        self.dirty = false;
        self.recompute_calls += 1;
        Ok(())
    }

    fn constraint_value(&mut self, object: &str, constraint: &str) -> Result<f64, BackendError> {
        self.require_open()?;
        self.lookup(object, constraint)?;
        Ok(self
            .current
            .datum(object, constraint)
            .unwrap_or_default())
    }

    fn solve(
        &mut self,
        solver: &str,
        results: &str,
        fields: &[&str],
    ) -> Result<SolveOutput, BackendError> {
        self.require_open()?;
        if solver != self.solver_name {
            return Err(BackendError::SolverNotFound(solver.to_string()));
        }
        if results != self.results_name {
            return Err(BackendError::ResultsNotFound(results.to_string()));
        }

        let call = self.solve_calls;
        self.solve_calls += 1;
        if self.fail_solve_at.contains(&call) {
            return Err(BackendError::Solve(format!(
                "injected solver failure at call {call}"
            )));
        }

        let output = (self.synthesize)(&self.committed);
        for field in fields {
            if output.field(field).is_none() {
                return Err(BackendError::FieldNotFound((*field).to_string()));
            }
        }
        Ok(output)
    }

    fn close(&mut self) -> Result<(), BackendError> {
        self.require_open()?;
        self.open = false;
        Ok(())
    }
}
