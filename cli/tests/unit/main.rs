//! Unit tests for tfverify
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod terraform_engine;
