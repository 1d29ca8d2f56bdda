//! # fxlens Core
//!
//! Scanning side of the currency annotator.
//!
//! ## Components
//!
//! - [`Extractor`] - Finds currency amounts in a text segment
//! - [`Document`] / [`SharedDocument`] - Observable in-memory document tree
//! - [`StateTracker`] - Dedup keys, processed segments, settlement queue, records
//! - [`Annotator`] - Marker placement ladder and structural revert
//! - [`Scanner`] - Scan pipeline and conversion dispatch
//! - [`ControlSurface`] - Handlers for the status UI messages

pub mod annotate;
pub mod context;
pub mod control;
pub mod currency;
pub mod document;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod store;
pub mod tracker;

pub use annotate::{Anchor, Annotator, InsertLedger, InsertOutcome};
pub use context::ConverterContext;
pub use control::ControlSurface;
pub use document::{Document, MutationBatch, MutationRecord, NodeId, SharedDocument};
pub use error::{CoreError, DocumentError};
pub use extractor::Extractor;
pub use scanner::{ScanReport, Scanner};
pub use store::MemorySettingsStore;
pub use tracker::{QueuedConversion, StateTracker};
