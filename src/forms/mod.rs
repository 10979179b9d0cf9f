pub mod groups;
pub mod profile;
