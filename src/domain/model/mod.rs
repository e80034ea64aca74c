//! Domain model for visit records ("atendimentos").
//!
//! - [`validator`]: pure field predicates
//! - [`VisitDraft`]: unvalidated caller input with checked setters
//! - [`NewVisit`]: validated editable fields, handed to the stores
//! - [`VisitRecord`]: a persisted row

use serde_json::Value as JsonValue;

pub mod category;
pub mod draft;
pub mod record;
pub mod samples;
pub mod validator;

pub use category::Category;
pub use draft::VisitDraft;
pub use record::{CategoryCounts, NewVisit, VisitRecord, VisitStatistics};
pub use samples::sample_visits;
pub use validator::ValidationReport;

/// Arbitrary caller input, keyed by field name.
pub type FieldMap = serde_json::Map<String, JsonValue>;
