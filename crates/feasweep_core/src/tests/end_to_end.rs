use std::sync::{Arc, Mutex};

use crate::backend::mock::MockBackend;
use crate::backend::{FeaBackend, SolveOutput};
use crate::config::{OutputSpec, ParameterSpec, SweepBuilder, ValueSpec};
use crate::error::{BackendError, SweepError};
use crate::reduce::Reduction;
use crate::sweep::run_sweep;

/// Mock of a plate with a hole: stress climbs with the hole diameter,
/// displacement follows suit at a smaller scale.
fn plate_backend() -> MockBackend {
    MockBackend::new("SolverCcxTools", "CCX_Results")
        .constraint("Sketch", "HoleDiameter", 10.0)
        .with_synthesizer(|model| {
            let d = model.datum("Sketch", "HoleDiameter").unwrap_or(0.0);
            let nominal = 3.0 * d;
            let mut out = SolveOutput::new();
            out.insert_field("vonMises", vec![0.4 * nominal, nominal, 0.7 * nominal]);
            out.insert_field(
                "DisplacementLengths",
                vec![0.01 * d, 0.02 * d, 0.005 * d],
            );
            out
        })
}

fn plate_config() -> crate::config::SweepConfig {
    SweepBuilder::new("plate.FCStd")
        .parameter(
            ParameterSpec::new("Sketch", "HoleDiameter", ValueSpec::linspace(10.0, 20.0, 5))
                .units("mm"),
        )
        .output(OutputSpec::new("vonMises").label("Max. Von Mises").units("MPa"))
        .output(
            OutputSpec::new("DisplacementLengths")
                .label("Max. displacement")
                .units("mm"),
        )
        .build()
}

#[test]
fn test_one_dimensional_sweep_row_per_value() {
    let mut backend = plate_backend();
    let table = run_sweep(&mut backend, &plate_config(), None).unwrap();

    assert_eq!(table.len(), 5);
    let swept: Vec<f64> = table.records().iter().map(|r| r.coordinates[0]).collect();
    assert_eq!(swept, vec![10.0, 12.5, 15.0, 17.5, 20.0]);

    for record in table.records() {
        assert!(record.is_solved());
        // Max von Mises is 3 * diameter under the surrogate
        assert!(record.outputs[0] >= 0.0);
        assert!((record.outputs[0] - 3.0 * record.coordinates[0]).abs() < 1e-9);
    }
}

#[test]
fn test_sweep_recomputes_before_every_solve() {
    let mut backend = plate_backend();
    let table = run_sweep(&mut backend, &plate_config(), None).unwrap();
    assert_eq!(table.len(), 5);
    assert_eq!(backend.recompute_calls(), 5);
    assert_eq!(backend.solve_calls(), 5);
}

#[test]
fn test_set_and_recompute_reflect_before_solve() {
    // Outside the driver: the capability contract itself
    let mut backend = plate_backend();
    backend.open(std::path::Path::new("plate.FCStd")).unwrap();
    backend.set_constraint("Sketch", "HoleDiameter", 17.5).unwrap();
    backend.recompute().unwrap();
    assert_eq!(
        backend.constraint_value("Sketch", "HoleDiameter").unwrap(),
        17.5
    );
}

#[test]
fn test_two_dimensional_sweep_inner_loop_order() {
    let backend = MockBackend::new("SolverCcxTools", "CCX_Results")
        .constraint("NotchSketch", "NotchSpacing", 4.0)
        .constraint("NotchSketch", "NotchDepth", 2.0)
        .with_synthesizer(|model| {
            let mut out = SolveOutput::new();
            out.insert_field("vonMises", vec![model.datum_sum()]);
            out
        });

    let config = SweepBuilder::new("notch.FCStd")
        .parameter(ParameterSpec::new(
            "NotchSketch",
            "NotchSpacing",
            ValueSpec::list([4.0, 9.0]),
        ))
        .parameter(ParameterSpec::new(
            "NotchSketch",
            "NotchDepth",
            ValueSpec::list([2.0, 4.0, 6.0]),
        ))
        .output(OutputSpec::new("vonMises"))
        .build();

    let mut backend = backend;
    let table = run_sweep(&mut backend, &config, None).unwrap();

    assert_eq!(table.len(), 6);
    let coords: Vec<(f64, f64)> = table
        .records()
        .iter()
        .map(|r| (r.coordinates[0], r.coordinates[1]))
        .collect();
    // Second spec (depth) varies fastest
    assert_eq!(
        coords,
        vec![
            (4.0, 2.0),
            (4.0, 4.0),
            (4.0, 6.0),
            (9.0, 2.0),
            (9.0, 4.0),
            (9.0, 6.0),
        ]
    );
}

#[test]
fn test_unknown_constraint_aborts_with_lookup_error() {
    let mut backend = plate_backend();
    let config = SweepBuilder::new("plate.FCStd")
        .parameter(ParameterSpec::new(
            "Sketch",
            "NoSuchConstraint",
            ValueSpec::list([1.0]),
        ))
        .output(OutputSpec::new("vonMises"))
        .build();

    let err = run_sweep(&mut backend, &config, None).unwrap_err();
    match err {
        SweepError::Backend(BackendError::ConstraintNotFound { object, constraint }) => {
            assert_eq!(object, "Sketch");
            assert_eq!(constraint, "NoSuchConstraint");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(backend.solve_calls(), 0);
}

#[test]
fn test_unknown_output_field_aborts() {
    let mut backend = plate_backend();
    let config = SweepBuilder::new("plate.FCStd")
        .parameter(ParameterSpec::new(
            "Sketch",
            "HoleDiameter",
            ValueSpec::list([10.0]),
        ))
        .output(OutputSpec::new("Temperature"))
        .build();

    let err = run_sweep(&mut backend, &config, None).unwrap_err();
    assert!(matches!(
        err,
        SweepError::Backend(BackendError::FieldNotFound(_))
    ));
}

#[test]
fn test_mean_reduction_in_sweep() {
    let mut backend = plate_backend();
    let config = SweepBuilder::new("plate.FCStd")
        .parameter(ParameterSpec::new(
            "Sketch",
            "HoleDiameter",
            ValueSpec::list([10.0]),
        ))
        .output(OutputSpec::new("vonMises").reduction(Reduction::Mean))
        .build();

    let table = run_sweep(&mut backend, &config, None).unwrap();
    // Field is [12, 30, 21] for d = 10; mean is 21
    assert!((table.records()[0].outputs[0] - 21.0).abs() < 1e-9);
}

#[test]
fn test_progress_callback_sees_every_point() {
    let seen: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_by_callback = Arc::clone(&seen);

    let mut backend = plate_backend();
    let table = run_sweep(
        &mut backend,
        &plate_config(),
        Some(Box::new(move |completed, total, record| {
            assert!(record.is_solved());
            seen_by_callback.lock().unwrap().push((completed, total));
        })),
    )
    .unwrap();

    assert_eq!(table.len(), 5);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]
    );
}
