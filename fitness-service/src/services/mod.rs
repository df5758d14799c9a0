//! Services layer for fitness-service.

pub mod content;
mod database;
pub mod generation;
pub mod health_tips;
pub mod metrics;
pub mod usage;

pub use content::{ContentService, DerivedEntity, GenerationJob, GenerationReport};
pub use database::{Database, RatedRequest, UsageTotals, WorkoutTotals};
pub use generation::{ContentGenerator, GenerationError, TextGenerator};
pub use usage::UsageAggregator;
