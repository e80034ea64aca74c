use crate::domain::model::validator::{
    self, ValidationReport, CATEGORY_RULE, DATE_RULE, NAME_RULE, PROFESSIONAL_RULE,
};
use crate::domain::model::{Category, FieldMap, NewVisit};
use crate::error::ValidationError;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Unvalidated visit data as received from a caller.
///
/// Building a draft never fails; missing or non-string fields fall back to
/// empty values. The setters check their field immediately and leave the
/// draft untouched on failure. [`VisitDraft::build`] is the only way to turn
/// a draft into a [`NewVisit`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitDraft {
    id: Option<i64>,
    name: String,
    professional: String,
    visit_date: Option<String>,
    category: Option<String>,
    notes: String,
}

fn text_field<'a>(fields: &'a FieldMap, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| fields.get(*k).and_then(JsonValue::as_str))
}

impl VisitDraft {
    pub fn from_fields(fields: &FieldMap) -> Self {
        let sanitize = |keys: &[&str]| {
            text_field(fields, keys)
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        Self {
            id: fields.get("id").and_then(JsonValue::as_i64),
            name: sanitize(&["name", "clientName", "nome"]),
            professional: sanitize(&["professional", "professionalName", "profissional"]),
            visit_date: text_field(fields, &["visitDate", "data"]).map(str::to_string),
            category: text_field(fields, &["category", "tipo"]).map(str::to_string),
            notes: sanitize(&["notes", "observacoes"]),
        }
    }

    /// Same as [`VisitDraft::from_fields`], for any JSON value. Anything other
    /// than an object yields an empty draft.
    pub fn from_value(value: &JsonValue) -> Self {
        value
            .as_object()
            .map(Self::from_fields)
            .unwrap_or_default()
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn professional(&self) -> &str {
        &self.professional
    }

    pub fn visit_date(&self) -> Option<&str> {
        self.visit_date.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_name(&mut self, value: &str) -> Result<(), ValidationError> {
        if !validator::is_valid_name(value) {
            return Err(ValidationError::single(NAME_RULE));
        }
        self.name = value.trim().to_string();
        Ok(())
    }

    pub fn set_professional(&mut self, value: &str) -> Result<(), ValidationError> {
        if !validator::is_valid_name(value) {
            return Err(ValidationError::single(PROFESSIONAL_RULE));
        }
        self.professional = value.trim().to_string();
        Ok(())
    }

    pub fn set_visit_date(&mut self, value: &str) -> Result<(), ValidationError> {
        if !validator::is_valid_date(value) {
            return Err(ValidationError::single(DATE_RULE));
        }
        self.visit_date = Some(value.to_string());
        Ok(())
    }

    pub fn set_category(&mut self, value: &str) -> Result<(), ValidationError> {
        if !validator::is_valid_category(value) {
            return Err(ValidationError::single(CATEGORY_RULE));
        }
        self.category = Some(value.to_string());
        Ok(())
    }

    pub fn set_notes(&mut self, value: &str) {
        self.notes = value.trim().to_string();
    }

    pub fn validate(&self) -> ValidationReport {
        validator::validate_fields(
            &self.name,
            &self.professional,
            self.visit_date(),
            self.category(),
        )
    }

    /// Validates every field and, on success, yields the normalized record
    /// (ISO calendar date, canonical category).
    pub fn build(&self) -> Result<NewVisit, ValidationError> {
        let report = self.validate();
        if !report.valid {
            return Err(ValidationError::new(report.errors));
        }
        let visit_date = self
            .visit_date()
            .and_then(validator::parse_visit_date)
            .ok_or_else(|| ValidationError::single(DATE_RULE))?;
        let category = self
            .category()
            .and_then(Category::parse)
            .ok_or_else(|| ValidationError::single(CATEGORY_RULE))?;
        Ok(NewVisit::new(
            self.name.clone(),
            self.professional.clone(),
            visit_date,
            category,
            self.notes.clone(),
        ))
    }
}
