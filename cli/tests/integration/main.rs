//! Integration tests for tfverify CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior against
//! a scripted stand-in for the terraform binary.

#[cfg(unix)]
mod suite_command;
#[cfg(unix)]
mod support;
