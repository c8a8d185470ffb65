//! YAML sweep configuration loading
//!
//! The configuration file deserializes straight into
//! [`feasweep_core::SweepConfig`]:
//!
//! ```yaml
//! document: plate.FCStd
//! solver: SolverCcxTools
//! results: CCX_Results
//! on_solve_failure: abort
//! parameters:
//!   - object: Sketch
//!     constraint: HoleDiameter
//!     values: { type: Linspace, min: 10.0, max: 20.0, count: 5 }
//!     units: mm
//! outputs:
//!   - field: vonMises
//!     label: Max. Von Mises
//!     units: MPa
//!   - field: DisplacementLengths
//!     label: Max. displacement
//!     units: mm
//! ```

use std::fs;
use std::path::Path;

use color_eyre::eyre::{WrapErr, eyre};
use feasweep_core::SweepConfig;

/// Read, parse, and validate a sweep configuration file
pub fn load_config(path: &Path) -> color_eyre::Result<SweepConfig> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    let config: SweepConfig = serde_saphyr::from_str(&content)
        .map_err(|e| eyre!("failed to parse config {}: {e}", path.display()))?;
    config
        .validate()
        .wrap_err_with(|| format!("invalid sweep configuration in {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXAMPLE: &str = "\
document: plate.FCStd
parameters:
  - object: Sketch
    constraint: HoleDiameter
    values: { type: Linspace, min: 10.0, max: 20.0, count: 5 }
    units: mm
outputs:
  - field: vonMises
    label: Max. Von Mises
    units: MPa
  - field: DisplacementLengths
    label: Max. displacement
    units: mm
";

    #[test]
    fn test_load_example_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXAMPLE.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.document_label(), "plate.FCStd");
        assert_eq!(config.parameters.len(), 1);
        assert_eq!(config.parameters[0].constraint, "HoleDiameter");
        assert_eq!(
            config.parameters[0].values.expand().unwrap(),
            vec![10.0, 12.5, 15.0, 17.5, 20.0]
        );
        assert_eq!(config.outputs.len(), 2);
        // Defaults kick in when solver/results are omitted
        assert_eq!(config.solver, "SolverCcxTools");
        assert_eq!(config.results, "CCX_Results");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"document: plate.FCStd\nparameters: []\noutputs: []\n")
            .unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_reported() {
        assert!(load_config(Path::new("does-not-exist.yaml")).is_err());
    }
}
