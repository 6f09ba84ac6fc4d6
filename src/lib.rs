//! Servimatch - terminal client for the marketplace profile wizard
//!
//! Fills in the personal data, address, role and worker details of the
//! logged-in user and submits them to the backend in one multipart request.

pub mod api;
pub mod app;
pub mod booking;
pub mod cli;
pub mod config;
pub mod geocoding;
pub mod profile;
pub mod screens;
pub mod services;
pub mod session;
pub mod styles;
pub mod tui;
pub mod utils;
pub mod widgets;

pub use api::ApiClient;
pub use config::Config;
pub use session::Session;
