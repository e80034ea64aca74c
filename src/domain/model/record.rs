use crate::domain::model::Category;
use crate::error::{StoreError, StoreResult};
use crate::storage::StoredVisitRow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A persisted visit, as returned by every store and by the service.
///
/// Field order here is the canonical wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub id: i64,
    pub name: String,
    pub professional: String,
    #[schema(value_type = String, example = "2025-01-15")]
    pub visit_date: NaiveDate,
    pub category: Category,
    pub notes: String,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl VisitRecord {
    /// Rebuilds a record from a stored row. Stored data is trusted, only the
    /// category text has to be mapped back onto the enum.
    pub fn from_stored_row(row: StoredVisitRow) -> StoreResult<Self> {
        let category = Category::parse(&row.category).ok_or_else(|| {
            StoreError::Decode(format!(
                "visit {} has unknown category '{}'",
                row.id, row.category
            ))
        })?;
        Ok(Self {
            id: row.id,
            name: row.name,
            professional: row.professional,
            visit_date: row.visit_date,
            category,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// The five editable fields of a visit, already validated and normalized.
///
/// Only [`crate::domain::model::VisitDraft::build`] produces one, so a
/// `NewVisit` is always valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    name: String,
    professional: String,
    visit_date: NaiveDate,
    category: Category,
    notes: String,
}

impl NewVisit {
    pub(crate) fn new(
        name: String,
        professional: String,
        visit_date: NaiveDate,
        category: Category,
        notes: String,
    ) -> Self {
        Self {
            name,
            professional,
            visit_date,
            category,
            notes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn professional(&self) -> &str {
        &self.professional
    }

    pub fn visit_date(&self) -> NaiveDate {
        self.visit_date
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

/// Visit counts keyed by category. Every category is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryCounts {
    #[serde(rename = "Psychological")]
    pub psychological: i64,
    #[serde(rename = "Pedagogical")]
    pub pedagogical: i64,
    #[serde(rename = "SocialAssistance")]
    pub social_assistance: i64,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> i64 {
        match category {
            Category::Psychological => self.psychological,
            Category::Pedagogical => self.pedagogical,
            Category::SocialAssistance => self.social_assistance,
        }
    }

    pub fn add(&mut self, category: Category, count: i64) {
        match category {
            Category::Psychological => self.psychological += count,
            Category::Pedagogical => self.pedagogical += count,
            Category::SocialAssistance => self.social_assistance += count,
        }
    }

    pub fn total(&self) -> i64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// Aggregate returned by `statistics()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitStatistics {
    pub total: i64,
    pub by_category: CategoryCounts,
}

impl From<CategoryCounts> for VisitStatistics {
    fn from(by_category: CategoryCounts) -> Self {
        Self {
            total: by_category.total(),
            by_category,
        }
    }
}
