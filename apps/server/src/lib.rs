pub mod config;
pub mod error;
pub mod handlers;
pub mod import;
pub mod router;
pub mod state;
pub mod views;
