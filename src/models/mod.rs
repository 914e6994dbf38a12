//! Data models for user records.

pub mod user;

pub use user::*;
