//! Core domain types shared across application and infrastructure layers.

pub mod errors;
pub mod model;
