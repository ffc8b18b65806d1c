//! Application layer orchestrating domain logic and infrastructure.

pub mod clause;
pub mod extract;
pub mod range;
pub mod run;
pub mod session;
pub mod table;
