#![doc = "The `todo_api` library crate."]
#![doc = ""]
#![doc = "This crate contains the todo and user models, the document store abstraction with"]
#![doc = "its PostgreSQL and in-memory implementations, token authentication, routing"]
#![doc = "configuration, and error handling for the todo API. It is used by the main binary"]
#![doc = "(`main.rs`) and by the integration tests to construct the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::error::{AppError, StoreError};
