//! Diesel row types and their conversions into domain entities.

#[cfg(feature = "server")]
pub mod config;
pub mod group;
pub mod profile;
