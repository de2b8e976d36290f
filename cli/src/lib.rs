//! tfverify library - provision a Terraform template, check its outputs,
//! tear it down.
//!
//! Use [`application::services::verify::run`] from a `#[tokio::test]`, or the
//! `tfverify` binary from CI.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod app;
pub mod application;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infra;
pub mod output;
