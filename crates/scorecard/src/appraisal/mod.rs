//! Appraisal aggregation: yearly summaries, rule-based recommendations, and
//! the draft/finalized decision records built from them.

pub mod record;
pub mod recommend;
pub mod repository;
pub mod router;
pub mod service;
pub mod summary;

#[cfg(test)]
mod tests;

pub use record::{
    AppraisalError, AppraisalId, AppraisalRecord, AppraisalState, MonthlyBreakdownEntry,
};
pub use recommend::{Recommendation, RecommendationOutcome};
pub use repository::{AppraisalStatusView, PerformanceRepository, RepositoryError};
pub use router::appraisal_router;
pub use service::{AppraisalService, AppraisalServiceError};
pub use summary::YearlySummary;
