// file: src/cli/mod.rs
// version: 1.0.0
// guid: f6a7b8c9-d0e1-4234-5678-9f0123456789

//! Command line interface module

pub mod args;
pub mod commands;
