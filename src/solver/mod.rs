// src/solver/mod.rs

pub mod good_lp_backend;
pub mod model;
pub mod traits;
