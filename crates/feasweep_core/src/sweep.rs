//! The sweep driver
//!
//! Iterates the Cartesian grid spanned by the configured parameter specs,
//! pushes each combination into the document, forces a recompute, runs the
//! solver, reduces the requested outputs, and grows the result table one row
//! per point. Strictly sequential: the document and solver are one shared
//! stateful external resource, so every point blocks until its solve
//! finishes.

use std::time::Instant;

use crate::backend::FeaBackend;
use crate::config::{FailurePolicy, SweepConfig};
use crate::error::{BackendError, ReductionError, SweepError};
use crate::results::{PointStatus, SweepRecord, SweepTable};

/// Called after every sweep point with (completed, total, newest row)
pub type ProgressCallback = Box<dyn Fn(usize, usize, &SweepRecord) + Send>;

/// Generate all grid points as the outer product of the value sequences,
/// in declaration order, with the last sequence varying fastest
fn generate_grid_points(values: &[Vec<f64>]) -> Vec<Vec<f64>> {
    if values.is_empty() || values.iter().any(Vec::is_empty) {
        return Vec::new();
    }

    let mut points = Vec::with_capacity(values.iter().map(Vec::len).product());
    let mut indices = vec![0usize; values.len()];

    loop {
        points.push(
            indices
                .iter()
                .zip(values)
                .map(|(&idx, vals)| vals[idx])
                .collect(),
        );

        // Odometer increment from the rightmost position
        let mut pos = values.len();
        loop {
            if pos == 0 {
                return points;
            }
            pos -= 1;
            indices[pos] += 1;
            if indices[pos] < values[pos].len() {
                break;
            }
            indices[pos] = 0;
        }
    }
}

/// Run the configured sweep against a backend.
///
/// Opens the document, visits every grid point, and returns the completed
/// table. Lookup failures (unknown object/constraint/solver/results/field)
/// always abort; a solve failure aborts or is recorded per
/// [`FailurePolicy`]. The document is closed before returning, success or
/// not.
pub fn run_sweep(
    backend: &mut dyn FeaBackend,
    config: &SweepConfig,
    progress: Option<ProgressCallback>,
) -> Result<SweepTable, SweepError> {
    config.validate()?;

    let values = config
        .parameters
        .iter()
        .map(|p| p.values.expand())
        .collect::<Result<Vec<_>, _>>()?;
    let grid = generate_grid_points(&values);

    backend.open(&config.document)?;
    let result = sweep_points(backend, config, &grid, progress);
    let closed = backend.close();

    let table = result?;
    closed?;
    Ok(table)
}

fn sweep_points(
    backend: &mut dyn FeaBackend,
    config: &SweepConfig,
    grid: &[Vec<f64>],
    progress: Option<ProgressCallback>,
) -> Result<SweepTable, SweepError> {
    let field_names: Vec<&str> = config.outputs.iter().map(|o| o.field.as_str()).collect();
    let mut table = SweepTable::for_config(config);

    for (index, point) in grid.iter().enumerate() {
        for (spec, value) in config.parameters.iter().zip(point) {
            backend.set_constraint(&spec.object, &spec.constraint, *value)?;
        }
        backend.recompute()?;

        let started = Instant::now();
        let solve = backend.solve(&config.solver, &config.results, &field_names);
        let runtime = started.elapsed();

        let record = match solve {
            Ok(output) => {
                let mut outputs = Vec::with_capacity(config.outputs.len());
                for spec in &config.outputs {
                    let raw = output.field(&spec.field).ok_or_else(|| {
                        BackendError::FieldNotFound(spec.field.clone())
                    })?;
                    let scalar = spec.reduction.apply(raw).ok_or_else(|| {
                        SweepError::Reduction {
                            index,
                            source: ReductionError::EmptyField {
                                field: spec.field.clone(),
                            },
                        }
                    })?;
                    outputs.push(scalar);
                }
                SweepRecord {
                    index,
                    coordinates: point.clone(),
                    outputs,
                    runtime,
                    status: PointStatus::Solved,
                }
            }
            Err(err) if is_solve_fault(&err) => match config.on_solve_failure {
                FailurePolicy::Abort => {
                    return Err(SweepError::Solve { index, source: err });
                }
                FailurePolicy::Skip => SweepRecord {
                    index,
                    coordinates: point.clone(),
                    outputs: Vec::new(),
                    runtime,
                    status: PointStatus::Failed(err.to_string()),
                },
            },
            // Lookup and process-level failures are not per-point
            // conditions; they abort regardless of policy.
            Err(err) => return Err(SweepError::Backend(err)),
        };

        table.push(record);
        if let Some(callback) = &progress {
            callback(index + 1, grid.len(), &table.records()[index]);
        }
    }

    Ok(table)
}

/// Solve-phase failures are subject to the failure policy; everything else
/// (bad names, a dead backend process) is treated as fatal configuration or
/// environment trouble.
fn is_solve_fault(err: &BackendError) -> bool {
    matches!(err, BackendError::Prerequisite(_) | BackendError::Solve(_))
}
