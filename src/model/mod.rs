// src/model/mod.rs

pub mod plan;
pub mod result;
