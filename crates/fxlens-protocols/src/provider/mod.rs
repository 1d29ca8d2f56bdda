//! Rate provider protocol definitions.
//!
//! A provider is a stateless pair of functions: build the request URL for a
//! query, and extract a converted amount from the JSON body it returns.

mod query;
mod traits;

pub use query::*;
pub use traits::*;
