//! Error types for the fxlens protocol layer.

mod annotation;
mod conversion;
mod provider;
mod store;

pub use annotation::*;
pub use conversion::*;
pub use provider::*;
pub use store::*;
