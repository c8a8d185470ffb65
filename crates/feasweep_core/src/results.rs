//! Result table types
//!
//! A sweep grows one [`SweepRecord`] per grid point, in iteration order, into
//! a [`SweepTable`]. The table lives only in memory; the frontend prints and
//! charts it once the sweep completes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::SweepConfig;

/// Outcome of a single sweep point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointStatus {
    Solved,
    /// Solve failed and the skip policy recorded it instead of aborting;
    /// the message is the solver's complaint
    Failed(String),
}

/// One row of the result table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRecord {
    /// Position in sweep iteration order, starting at 0
    pub index: usize,
    /// Swept constraint values, one per parameter spec in declaration order
    pub coordinates: Vec<f64>,
    /// Reduced scalars, one per output spec; empty for failed points
    pub outputs: Vec<f64>,
    /// Wall-clock time spent in the solve for this point
    pub runtime: Duration,
    pub status: PointStatus,
}

impl SweepRecord {
    pub fn is_solved(&self) -> bool {
        self.status == PointStatus::Solved
    }
}

/// Ordered accumulation of sweep results with column metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepTable {
    parameter_headers: Vec<String>,
    output_headers: Vec<String>,
    records: Vec<SweepRecord>,
}

impl SweepTable {
    /// Empty table with headers derived from the configuration
    pub fn for_config(config: &SweepConfig) -> Self {
        Self {
            parameter_headers: config.parameters.iter().map(|p| p.header()).collect(),
            output_headers: config.outputs.iter().map(|o| o.header()).collect(),
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: SweepRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[SweepRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn parameter_headers(&self) -> &[String] {
        &self.parameter_headers
    }

    pub fn output_headers(&self) -> &[String] {
        &self.output_headers
    }

    /// Number of sweep points that failed under the skip policy
    pub fn failed_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_solved()).count()
    }

    /// `(coordinate[param_index], output[output_index])` pairs over the
    /// solved rows, in sweep order. This is what the chart plots.
    pub fn series(&self, param_index: usize, output_index: usize) -> Vec<(f64, f64)> {
        self.records
            .iter()
            .filter(|r| r.is_solved())
            .filter_map(|r| {
                let x = r.coordinates.get(param_index)?;
                let y = r.outputs.get(output_index)?;
                Some((*x, *y))
            })
            .collect()
    }
}
