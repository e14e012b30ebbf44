// src/io/mod.rs

pub mod plan_file;
pub mod reporting;
pub mod scenario;
