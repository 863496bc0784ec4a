// file: src/logging/mod.rs
// version: 1.0.0
// guid: d4e5f6a7-b8c9-4012-3456-789def012345

//! Logging module

pub mod logger;
