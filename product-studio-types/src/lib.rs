//! Shared types for Product Studio.

pub mod config;
pub mod content;
pub mod enums;
pub mod options;
pub mod response;
