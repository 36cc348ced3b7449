//! # Storefront Client Library
//!
//! Client-side core shared by the storefront admin and customer apps:
//! paginated list loading over the REST API, the session used to authorize
//! requests, and the repositories for each listed entity.

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod paging;
pub mod repositories;
pub mod session;
pub mod telemetry;

pub use context::AppContext;
pub use error::FetchError;
