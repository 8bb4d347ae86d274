//! Data layer and JSON API of the shop administration backend.
//!
//! Listings go through [`query`], are executed by a [`store::DataSource`]
//! and reach callers through [`services::AdminService`], which [`api`]
//! exposes over HTTP.

pub mod api;
pub mod catalog;
pub mod config;
pub mod entities;
pub mod error;
pub mod middleware;
pub mod models;
pub mod orders;
pub mod query;
pub mod services;
pub mod store;

pub use api::create_api_router;
pub use config::AppConfig;
pub use error::{StoreError, StoreResult};
pub use services::AdminService;
