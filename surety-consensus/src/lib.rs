//! AeroSurety Consensus Layer
//!
//! Decision logic on top of the surety ledger: airline admission voting and
//! oracle status consensus, exposed through the [`SuretyApp`] facade.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  SuretyApp (facade)                  │
//! │   explicit caller identity + attached value          │
//! └──────────┬──────────────────────────┬────────────────┘
//!            │                          │
//!            ↓                          ↓
//! ┌──────────────────────┐   ┌──────────────────────────┐
//! │ Admission Consensus  │   │ Oracle Status Consensus  │
//! │ bootstrap + 50% vote │   │ index rounds + quorum    │
//! └──────────┬───────────┘   └──────────┬───────────────┘
//!            │    privileged surface    │
//!            ↓  (authorized callers)    ↓
//! ┌─────────────────────────────────────────────────────┐
//! │                   Surety Ledger                      │
//! │  membership · flights · insurance · treasury ·       │
//! │  hash-chained journal                                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Quorum rules
//!
//! - Admission: below the bootstrap threshold candidates are admitted
//!   directly; from then on a candidate needs approval votes from at least
//!   half of the registered airlines (exactly 50% suffices)
//! - Status: a round resolves when any status code collects the configured
//!   number of matching oracle responses; resolution is terminal

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod admission;
pub mod app;
pub mod error;
pub mod indexes;
pub mod oracle;

// Re-exports
pub use admission::{AdmissionConsensus, AdmissionOutcome};
pub use app::SuretyApp;
pub use error::{Error, Result};
pub use indexes::IndexSource;
pub use oracle::{OracleConsensus, StatusRequestOutcome, SubmissionOutcome};
