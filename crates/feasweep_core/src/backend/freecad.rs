//! FreeCAD subprocess backend
//!
//! Drives a headless `FreeCADCmd` child process through a newline-delimited
//! JSON protocol. A small Python driver (embedded at compile time) runs
//! inside the FreeCAD interpreter and performs the document-side work:
//! driving-sketch lookup, `setDatum`, `recompute`, and the ccxtools solve
//! sequence (purge, reset, update, check prerequisites, run). Typed protocol
//! errors map onto [`BackendError`] variants, so an unknown constraint name
//! surfaces here exactly like it does from the mock backend.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde_json::{Value, json};

use super::{FeaBackend, SolveOutput};
use crate::error::BackendError;

const DRIVER: &str = include_str!("freecad_driver.py");

/// [`FeaBackend`] backed by a `FreeCADCmd` child process
pub struct FreecadBackend {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    driver_path: PathBuf,
}

impl FreecadBackend {
    /// Spawn the given FreeCAD console executable (typically `FreeCADCmd`,
    /// resolved on `PATH` when no explicit path is configured) and wait for
    /// the driver's ready handshake.
    pub fn launch(command: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let command = command.into();
        let driver_path =
            std::env::temp_dir().join(format!("feasweep_driver_{}.py", std::process::id()));
        std::fs::write(&driver_path, DRIVER)?;

        let mut child = Command::new(&command)
            .arg(&driver_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| BackendError::Launch {
                command: command.clone(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BackendError::Protocol("child stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BackendError::Protocol("child stdout unavailable".to_string()))?;

        let mut backend = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            driver_path,
        };
        backend.wait_ready()?;
        Ok(backend)
    }

    /// FreeCAD prints a startup banner before the driver runs; scan lines
    /// until the ready event appears.
    fn wait_ready(&mut self) -> Result<(), BackendError> {
        loop {
            let line = self.read_line()?;
            if let Ok(value) = serde_json::from_str::<Value>(line.trim()) {
                if value.get("event").and_then(Value::as_str) == Some("ready") {
                    return Ok(());
                }
            }
        }
    }

    fn read_line(&mut self) -> Result<String, BackendError> {
        let mut line = String::new();
        let n = self.stdout.read_line(&mut line)?;
        if n == 0 {
            return Err(BackendError::Protocol(
                "backend process closed its output".to_string(),
            ));
        }
        Ok(line)
    }

    fn request(&mut self, request: Value) -> Result<Value, BackendError> {
        let mut encoded =
            serde_json::to_string(&request).map_err(|e| BackendError::Protocol(e.to_string()))?;
        encoded.push('\n');
        self.stdin.write_all(encoded.as_bytes())?;
        self.stdin.flush()?;

        // The console interpreter may interleave its own chatter with driver
        // replies; only lines carrying an "ok" key are responses.
        loop {
            let line = self.read_line()?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(value) if value.get("ok").is_some() => return Ok(value),
                _ => continue,
            }
        }
    }

    fn expect_ok(&mut self, request: Value) -> Result<Value, BackendError> {
        let response = self.request(request)?;
        if response.get("ok").and_then(Value::as_bool) == Some(true) {
            Ok(response)
        } else {
            Err(decode_error(&response))
        }
    }
}

impl FeaBackend for FreecadBackend {
    fn open(&mut self, path: &Path) -> Result<(), BackendError> {
        self.expect_ok(json!({"op": "open", "path": path.to_string_lossy()}))?;
        Ok(())
    }

    fn set_constraint(
        &mut self,
        object: &str,
        constraint: &str,
        value: f64,
    ) -> Result<(), BackendError> {
        self.expect_ok(json!({
            "op": "set_constraint",
            "object": object,
            "constraint": constraint,
            "value": value,
        }))?;
        Ok(())
    }

    fn recompute(&mut self) -> Result<(), BackendError> {
        self.expect_ok(json!({"op": "recompute"}))?;
        Ok(())
    }

    fn constraint_value(&mut self, object: &str, constraint: &str) -> Result<f64, BackendError> {
        let response = self.expect_ok(json!({
            "op": "constraint_value",
            "object": object,
            "constraint": constraint,
        }))?;
        response
            .get("value")
            .and_then(Value::as_f64)
            .ok_or_else(|| BackendError::Protocol("constraint_value reply missing value".to_string()))
    }

    fn solve(
        &mut self,
        solver: &str,
        results: &str,
        fields: &[&str],
    ) -> Result<SolveOutput, BackendError> {
        let response = self.expect_ok(json!({
            "op": "solve",
            "solver": solver,
            "results": results,
            "fields": fields,
        }))?;
        decode_fields(&response)
    }

    fn close(&mut self) -> Result<(), BackendError> {
        self.expect_ok(json!({"op": "close"}))?;
        Ok(())
    }
}

impl Drop for FreecadBackend {
    fn drop(&mut self) {
        let _ = self.stdin.write_all(b"{\"op\":\"quit\"}\n");
        let _ = self.stdin.flush();
        let _ = self.child.wait();
        let _ = std::fs::remove_file(&self.driver_path);
    }
}

/// Map a driver failure payload onto the error taxonomy
fn decode_error(response: &Value) -> BackendError {
    let kind = response.get("error").and_then(Value::as_str).unwrap_or("");
    let message = response
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("no message")
        .to_string();

    match kind {
        "open_failed" => BackendError::Open {
            path: response
                .get("path")
                .and_then(Value::as_str)
                .map(PathBuf::from)
                .unwrap_or_default(),
            message,
        },
        "document_closed" => BackendError::DocumentClosed,
        "object_not_found" => BackendError::ObjectNotFound(message),
        "constraint_not_found" => BackendError::ConstraintNotFound {
            object: response
                .get("object")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            constraint: response
                .get("constraint")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
        },
        "solver_not_found" => BackendError::SolverNotFound(message),
        "results_not_found" => BackendError::ResultsNotFound(message),
        "field_not_found" => BackendError::FieldNotFound(message),
        "prerequisite" => BackendError::Prerequisite(message),
        "solve_failed" => BackendError::Solve(message),
        "" => BackendError::Protocol("failure reply without error kind".to_string()),
        other => BackendError::Protocol(format!("{other}: {message}")),
    }
}

/// Pull the `fields` object out of a solve reply
fn decode_fields(response: &Value) -> Result<SolveOutput, BackendError> {
    let fields = response
        .get("fields")
        .and_then(Value::as_object)
        .ok_or_else(|| BackendError::Protocol("solve reply missing fields".to_string()))?;

    let mut output = SolveOutput::new();
    for (name, values) in fields {
        let values = values
            .as_array()
            .ok_or_else(|| BackendError::Protocol(format!("field {name:?} is not an array")))?
            .iter()
            .map(|v| {
                v.as_f64()
                    .ok_or_else(|| BackendError::Protocol(format!("field {name:?} holds a non-number")))
            })
            .collect::<Result<Vec<f64>, BackendError>>()?;
        output.insert_field(name.clone(), values);
    }
    Ok(output)
}
