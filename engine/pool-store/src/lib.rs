//! # Pool Store
//!
//! The collaborators around the scoring engine: where prediction records live, which
//! events make up the season, and where official results come from.
//!
//! ## Architecture
//!
//! - **PredictionStore**: read every record, upsert one (participant, event) record
//! - **JsonFileStore** / **InMemoryStore**: file-backed and test implementations
//! - **Schedule**: ordered season events with their start times
//! - **ResultsProvider**: official classification per event, or nothing yet
//! - **SubmissionDesk**: validation and lock-time checks in front of the store

pub mod config;
pub mod error;
pub mod provider;
pub mod results;
pub mod schedule;
pub mod store;
pub mod submission;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use results::{collect_results, FileResultsProvider, InMemoryResults, ResultsProvider};
pub use schedule::{Schedule, ScheduledEvent};
pub use store::{InMemoryStore, JsonFileStore, PredictionStore, UpsertOutcome};
pub use submission::SubmissionDesk;
