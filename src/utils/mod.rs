// Utility functions
pub mod avatar;
pub mod error;

pub use avatar::*;
pub use error::*;
