//! Service layer: the seeding and query flows.

pub mod search_service;
pub mod seeding_service;

pub use search_service::{SearchService, SearchServiceConfig};
pub use seeding_service::{BatchProgress, SeedReport, SeedingService, SeedingServiceConfig};
