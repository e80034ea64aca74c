pub mod app;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::VisitService;
pub use domain::model::{
    sample_visits, Category, CategoryCounts, FieldMap, VisitDraft, VisitRecord, VisitStatistics,
};
pub use error::{ConfigError, ServiceError, StoreError, ValidationError};
pub use storage::{OrderDirection, StoreRows, VisitStore};
