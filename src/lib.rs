#![doc = "The `taskhub` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, store abstractions, services and"]
#![doc = "route handlers for the TaskHub application. It is used by the main binary"]
#![doc = "(`main.rs`) to construct and run the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

// Re-export the service bundle so binaries and tests can wire an app
// without spelling out every module path.
pub use services::AppState;
