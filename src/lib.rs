//! Bookshelf Application Library
//!
//! The catalog module, its utilities, and the service bootstrap.

pub mod bootstrap;
pub mod modules;
pub mod utils;

/// Re-export commonly used types
pub use modules::*;
