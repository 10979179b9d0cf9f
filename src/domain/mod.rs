//! Domain entities and value objects, independent of storage and transport.

pub mod auth;
pub mod group;
pub mod membership;
pub mod ordering;
pub mod profile;
pub mod types;
