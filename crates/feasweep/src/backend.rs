//! Backend selection for the command line
//!
//! `freecad` drives the real application; `mock` runs the whole pipeline
//! against an in-memory document seeded from the configuration, which makes
//! it a cheap dry run for a new sweep file.

use std::path::Path;

use clap::ValueEnum;
use color_eyre::eyre::WrapErr;
use feasweep_core::SweepConfig;
use feasweep_core::backend::freecad::FreecadBackend;
use feasweep_core::backend::mock::MockBackend;
use feasweep_core::backend::{FeaBackend, SolveOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    Freecad,
    Mock,
}

pub fn build(
    kind: BackendKind,
    freecad_path: Option<&Path>,
    config: &SweepConfig,
) -> color_eyre::Result<Box<dyn FeaBackend>> {
    match kind {
        BackendKind::Freecad => {
            let command = freecad_path.unwrap_or(Path::new("FreeCADCmd"));
            let backend = FreecadBackend::launch(command)
                .wrap_err("failed to start the FreeCAD backend")?;
            Ok(Box::new(backend))
        }
        BackendKind::Mock => Ok(Box::new(mock_for(config))),
    }
}

/// Mock document seeded with every swept constraint at its first value,
/// synthesizing smooth fields so the table and chart have something to show
fn mock_for(config: &SweepConfig) -> MockBackend {
    let mut backend = MockBackend::new(&config.solver, &config.results);
    for spec in &config.parameters {
        let initial = spec
            .values
            .expand()
            .ok()
            .and_then(|values| values.first().copied())
            .unwrap_or_default();
        backend = backend.constraint(&spec.object, &spec.constraint, initial);
    }

    let fields: Vec<String> = config.outputs.iter().map(|o| o.field.clone()).collect();
    backend.with_synthesizer(move |model| {
        let base = model.datum_sum();
        let mut out = SolveOutput::new();
        for (i, field) in fields.iter().enumerate() {
            let amplitude = base * (1.0 + i as f64 * 0.5);
            out.insert_field(
                field.clone(),
                vec![0.5 * amplitude, amplitude, 0.75 * amplitude],
            );
        }
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use feasweep_core::config::{OutputSpec, ParameterSpec, SweepBuilder, ValueSpec};
    use feasweep_core::sweep::run_sweep;

    #[test]
    fn test_mock_backend_runs_the_configured_sweep() {
        let config = SweepBuilder::new("plate.FCStd")
            .parameter(ParameterSpec::new(
                "Sketch",
                "HoleDiameter",
                ValueSpec::linspace(10.0, 20.0, 5),
            ))
            .output(OutputSpec::new("vonMises"))
            .output(OutputSpec::new("DisplacementLengths"))
            .build();

        let mut backend = mock_for(&config);
        let table = run_sweep(&mut backend, &config, None).unwrap();

        assert_eq!(table.len(), 5);
        for record in table.records() {
            assert!(record.is_solved());
            assert_eq!(record.outputs.len(), 2);
            assert!(record.outputs[0] >= 0.0);
        }
    }
}
