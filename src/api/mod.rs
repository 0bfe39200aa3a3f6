// src/api/mod.rs

pub mod handlers;
pub mod html;           // Server-rendered pages
pub mod server;
pub mod server_config;  // Server configuration constants
pub mod session_store;  // Page session storage
pub mod types;

pub use server::DashboardServer;
