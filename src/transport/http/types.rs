use crate::app::VisitService;
use crate::domain::model::Category;
use crate::storage::OrderDirection;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub visits: VisitService,
    /// Hides internal error detail from 500 responses.
    pub production: bool,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Query string accepted by `GET /api/visits`.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// `asc` or `desc` by visit date. Anything else means `desc`.
    #[serde(default)]
    #[param(example = "desc")]
    pub order: Option<String>,
    /// Restrict to one category (canonical name or label).
    #[serde(default)]
    pub category: Option<String>,
}

impl ListQuery {
    pub fn direction(&self) -> OrderDirection {
        match self.order.as_deref().map(str::trim) {
            Some(o) if o.eq_ignore_ascii_case("asc") => OrderDirection::Asc,
            _ => OrderDirection::Desc,
        }
    }
}

/// Body of `POST /api/visits` and `PUT /api/visits/{id}`.
///
/// Documentation only: handlers take the raw JSON object so that aliases and
/// missing fields reach validation instead of failing deserialization.
#[derive(Deserialize, Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitInput {
    #[schema(example = "Maria Silva")]
    pub name: String,
    #[schema(example = "Dr. João Santos")]
    pub professional: String,
    #[schema(example = "2025-01-15")]
    pub visit_date: String,
    pub category: Category,
    #[serde(default)]
    pub notes: Option<String>,
}
