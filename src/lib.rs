#![allow(clippy::needless_return)]
#![allow(clippy::len_zero)]
// src/lib.rs

pub mod api;
pub mod blockchain;
pub mod core;
pub mod i18n;
pub mod views;
