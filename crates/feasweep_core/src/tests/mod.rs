//! Integration tests for the sweep engine
//!
//! Tests are organized by topic:
//! - `end_to_end` - Full sweeps against the mock backend
//! - `failure_policy` - Abort vs. skip behavior on solve failures

mod end_to_end;
mod failure_policy;
