//! Test modules for operator dispatch and tree evaluation.
//!
//! Inline test modules that outgrew their implementation files live here.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

mod evaluator_tests;
