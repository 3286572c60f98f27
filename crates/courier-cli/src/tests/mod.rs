//! Test harness for the CLI runtime.

mod support;
