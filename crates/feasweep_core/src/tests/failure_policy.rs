use crate::backend::SolveOutput;
use crate::backend::mock::MockBackend;
use crate::config::{FailurePolicy, OutputSpec, ParameterSpec, SweepBuilder, ValueSpec};
use crate::error::SweepError;
use crate::results::PointStatus;
use crate::sweep::run_sweep;

fn flaky_backend() -> MockBackend {
    MockBackend::new("SolverCcxTools", "CCX_Results")
        .constraint("Sketch", "Width", 1.0)
        .with_synthesizer(|model| {
            let mut out = SolveOutput::new();
            out.insert_field("vonMises", vec![model.datum_sum()]);
            out
        })
        .fail_solve_at([2])
}

fn config(policy: FailurePolicy) -> crate::config::SweepConfig {
    SweepBuilder::new("plate.FCStd")
        .parameter(ParameterSpec::new(
            "Sketch",
            "Width",
            ValueSpec::list([1.0, 2.0, 3.0, 4.0, 5.0]),
        ))
        .output(OutputSpec::new("vonMises"))
        .on_solve_failure(policy)
        .build()
}

#[test]
fn test_abort_policy_surfaces_failing_point() {
    let mut backend = flaky_backend();
    let err = run_sweep(&mut backend, &config(FailurePolicy::Abort), None).unwrap_err();
    match err {
        SweepError::Solve { index, .. } => assert_eq!(index, 2),
        other => panic!("unexpected error: {other:?}"),
    }
    // Points after the failure were never attempted
    assert_eq!(backend.solve_calls(), 3);
}

#[test]
fn test_skip_policy_records_failure_and_continues() {
    let mut backend = flaky_backend();
    let table = run_sweep(&mut backend, &config(FailurePolicy::Skip), None).unwrap();

    assert_eq!(table.len(), 5);
    assert_eq!(table.failed_count(), 1);

    let failed = &table.records()[2];
    assert!(matches!(failed.status, PointStatus::Failed(_)));
    assert!(failed.outputs.is_empty());
    assert_eq!(failed.coordinates, vec![3.0]);

    // The chart series only carries the solved rows
    let series = table.series(0, 0);
    assert_eq!(series.len(), 4);
    assert!(series.iter().all(|(x, _)| *x != 3.0));
}

#[test]
fn test_skip_policy_still_aborts_on_lookup_errors() {
    let mut backend = flaky_backend();
    let config = SweepBuilder::new("plate.FCStd")
        .parameter(ParameterSpec::new(
            "Sketch",
            "Width",
            ValueSpec::list([1.0]),
        ))
        .output(OutputSpec::new("vonMises"))
        .solver("MissingSolver")
        .on_solve_failure(FailurePolicy::Skip)
        .build();

    assert!(matches!(
        run_sweep(&mut backend, &config, None),
        Err(SweepError::Backend(_))
    ));
}
