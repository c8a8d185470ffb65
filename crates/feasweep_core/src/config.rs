//! Sweep configuration types
//!
//! A [`SweepConfig`] names the document to open, the constraints to sweep,
//! the result fields to harvest, and the solver/results objects expected to
//! exist inside the document. Configurations are plain serde types (loaded
//! from YAML by the frontend) and can also be assembled through the fluent
//! [`SweepBuilder`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::reduce::Reduction;

/// An ordered sequence of values for one swept constraint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ValueSpec {
    /// Explicit list, tried in the given order
    List { values: Vec<f64> },
    /// `count` evenly spaced values including both endpoints
    Linspace { min: f64, max: f64, count: usize },
    /// `min + i * step` for as long as the value stays below `max`
    /// (half-open, matching the usual arange convention)
    Range { min: f64, max: f64, step: f64 },
}

impl ValueSpec {
    pub fn list(values: impl Into<Vec<f64>>) -> Self {
        ValueSpec::List {
            values: values.into(),
        }
    }

    pub fn linspace(min: f64, max: f64, count: usize) -> Self {
        ValueSpec::Linspace { min, max, count }
    }

    pub fn range(min: f64, max: f64, step: f64) -> Self {
        ValueSpec::Range { min, max, step }
    }

    /// Expand to the concrete value sequence.
    ///
    /// The result may be empty (an inverted range, or an empty list); the
    /// caller reports that as [`ConfigError::EmptyValues`] with the
    /// constraint name attached.
    pub fn expand(&self) -> Result<Vec<f64>, ConfigError> {
        match self {
            ValueSpec::List { values } => Ok(values.clone()),
            ValueSpec::Linspace { min, max, count } => {
                if *count == 0 {
                    return Err(ConfigError::InvalidRange {
                        min: *min,
                        max: *max,
                        reason: "count must be at least 1",
                    });
                }
                if *count == 1 {
                    return Ok(vec![*min]);
                }
                let span = max - min;
                Ok((0..*count)
                    .map(|i| min + span * i as f64 / (*count - 1) as f64)
                    .collect())
            }
            ValueSpec::Range { min, max, step } => {
                if *step <= 0.0 {
                    return Err(ConfigError::InvalidRange {
                        min: *min,
                        max: *max,
                        reason: "step must be positive",
                    });
                }
                // Small slack so an exact multiple of `step` still excludes `max`
                // without float noise dragging in one point too many.
                let count = (((max - min) / step) - 1e-9).ceil().max(0.0) as usize;
                Ok((0..count).map(|i| min + i as f64 * step).collect())
            }
        }
    }
}

/// One swept constraint: which object's driving sketch to reach into,
/// which named constraint to overwrite, and the values to try
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Object whose driving sketch holds the constraint (e.g. "Pocket");
    /// may also name the sketch itself
    pub object: String,
    /// Constraint name inside the sketch (e.g. "Spacing")
    pub constraint: String,
    pub values: ValueSpec,
    /// Display units for headers and axis titles (e.g. "mm")
    #[serde(default)]
    pub units: Option<String>,
}

impl ParameterSpec {
    pub fn new(
        object: impl Into<String>,
        constraint: impl Into<String>,
        values: ValueSpec,
    ) -> Self {
        Self {
            object: object.into(),
            constraint: constraint.into(),
            values,
            units: None,
        }
    }

    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Column/axis header, e.g. "Spacing (mm)"
    pub fn header(&self) -> String {
        match &self.units {
            Some(units) => format!("{} ({units})", self.constraint),
            None => self.constraint.clone(),
        }
    }
}

/// One harvested output: a raw result field plus the reduction that
/// collapses it to a scalar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Field name on the results container (e.g. "vonMises")
    pub field: String,
    #[serde(default)]
    pub reduction: Reduction,
    /// Display label; the field name is used when absent
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
}

impl OutputSpec {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reduction: Reduction::default(),
            label: None,
            units: None,
        }
    }

    pub fn reduction(mut self, reduction: Reduction) -> Self {
        self.reduction = reduction;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Explicit label, or field plus reduction ("vonMises_Max") when unset
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("{}_{}", self.field, self.reduction.label()),
        }
    }

    /// Column/axis header, e.g. "Max. Von Mises (MPa)"
    pub fn header(&self) -> String {
        match &self.units {
            Some(units) => format!("{} ({units})", self.display_label()),
            None => self.display_label(),
        }
    }
}

/// What to do when the solve fails at a single sweep point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the sweep and surface the failure (default)
    #[default]
    Abort,
    /// Record the point as failed and carry on with the rest of the grid
    Skip,
}

/// Complete configuration for one parameter sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Path to the CAD document
    pub document: PathBuf,

    /// Swept constraints, in declaration order; the last one varies fastest
    pub parameters: Vec<ParameterSpec>,

    /// Result fields harvested at every sweep point
    pub outputs: Vec<OutputSpec>,

    /// Solver object expected to exist in the document
    #[serde(default = "default_solver")]
    pub solver: String,

    /// Results container expected to exist in the document after a solve
    #[serde(default = "default_results")]
    pub results: String,

    #[serde(default)]
    pub on_solve_failure: FailurePolicy,
}

fn default_solver() -> String {
    "SolverCcxTools".to_string()
}

fn default_results() -> String {
    "CCX_Results".to_string()
}

impl SweepConfig {
    /// Check the parts of the configuration that do not need a document:
    /// at least one parameter and output, and every value sequence non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parameters.is_empty() {
            return Err(ConfigError::NoParameters);
        }
        if self.outputs.is_empty() {
            return Err(ConfigError::NoOutputs);
        }
        for spec in &self.parameters {
            if spec.values.expand()?.is_empty() {
                return Err(ConfigError::EmptyValues {
                    object: spec.object.clone(),
                    constraint: spec.constraint.clone(),
                });
            }
        }
        Ok(())
    }

    /// Stem of the document file name, for report and chart titles
    pub fn document_label(&self) -> String {
        self.document
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.document.display().to_string())
    }
}

/// Fluent builder for [`SweepConfig`]
///
/// ```ignore
/// use feasweep_core::config::{OutputSpec, ParameterSpec, SweepBuilder, ValueSpec};
///
/// let config = SweepBuilder::new("plate.FCStd")
///     .parameter(ParameterSpec::new("Sketch", "HoleDiameter", ValueSpec::linspace(10.0, 20.0, 5)).units("mm"))
///     .output(OutputSpec::new("vonMises").label("Max. Von Mises").units("MPa"))
///     .output(OutputSpec::new("DisplacementLengths").label("Max. displacement").units("mm"))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct SweepBuilder {
    config: SweepConfig,
}

impl SweepBuilder {
    pub fn new(document: impl Into<PathBuf>) -> Self {
        Self {
            config: SweepConfig {
                document: document.into(),
                parameters: Vec::new(),
                outputs: Vec::new(),
                solver: default_solver(),
                results: default_results(),
                on_solve_failure: FailurePolicy::default(),
            },
        }
    }

    pub fn parameter(mut self, spec: ParameterSpec) -> Self {
        self.config.parameters.push(spec);
        self
    }

    pub fn output(mut self, spec: OutputSpec) -> Self {
        self.config.outputs.push(spec);
        self
    }

    pub fn solver(mut self, name: impl Into<String>) -> Self {
        self.config.solver = name.into();
        self
    }

    pub fn results(mut self, name: impl Into<String>) -> Self {
        self.config.results = name.into();
        self
    }

    pub fn on_solve_failure(mut self, policy: FailurePolicy) -> Self {
        self.config.on_solve_failure = policy;
        self
    }

    pub fn build(self) -> SweepConfig {
        self.config
    }
}
