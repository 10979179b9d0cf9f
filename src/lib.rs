//! Core library exports for the club groups service.
//!
//! The `data` feature exposes the taxonomy domain, persistence and change
//! feed; `server` adds the forms, routes and service layers of the web
//! application.

/// Role required to read the taxonomy and manage one's own profile.
pub const SERVICE_ACCESS_ROLE: &str = "member";
/// Role required to change the taxonomy.
pub const SERVICE_ADMIN_ROLE: &str = "admin";

#[cfg(feature = "data")]
pub mod changes;
#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
mod error_conversions;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
