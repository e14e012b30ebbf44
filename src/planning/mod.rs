// src/planning/mod.rs

pub mod compare;
pub mod config;
pub mod envelope;
pub mod projector;
pub mod repattern;
pub mod validator;
pub mod window;
