//! Orchestrators for the batch runs: snapshots, summaries, news layer, social layer

pub mod news;
pub mod snapshots;
pub mod social;
pub mod summaries;

pub use news::NewsOrchestrator;
pub use snapshots::SnapshotOrchestrator;
pub use social::SocialOrchestrator;
pub use summaries::SummaryOrchestrator;
