// src/core/mod.rs

pub mod config;
pub mod errors;
pub mod units;
