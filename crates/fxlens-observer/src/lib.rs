//! # fxlens Observer
//!
//! Keeps a live document annotated while it changes.
//!
//! ## Components
//!
//! - [`ChangeObserver`] - Filters mutation batches and debounces rescans
//! - [`ScanQueue`] - Bounded queue of subtrees awaiting a scan
//! - [`ObserverMetrics`] - Counters with a point-in-time snapshot
//! - [`Session`] - Wires context, scanner, observer, settlement and control

pub mod error;
pub mod filter;
pub mod metrics;
pub mod observer;
pub mod queue;
pub mod session;
pub mod settlement;

pub use error::{ObserverError, ObserverResult};
pub use filter::{classify, BatchEffect};
pub use metrics::{MetricsSnapshot, ObserverMetrics};
pub use observer::{ChangeObserver, FlushOutcome};
pub use queue::{ScanQueue, ScanWork};
pub use session::Session;
pub use settlement::spawn_settlement;
