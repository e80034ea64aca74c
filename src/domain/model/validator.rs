//! Pure field predicates for visit records.
//!
//! None of these functions panic or return errors; they answer yes/no. The
//! aggregated [`ValidationReport`] is what callers use to report problems.

use crate::domain::model::Category;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

pub const NAME_MIN_CHARS: usize = 2;

/// Four-digit years only, so ISO text sorts chronologically in every store.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

pub const NAME_RULE: &str = "name must be at least 2 characters";
pub const PROFESSIONAL_RULE: &str = "professional must be at least 2 characters";
pub const DATE_RULE: &str = "visitDate must be a valid date";
pub const CATEGORY_RULE: &str =
    "category must be one of: Psychological, Pedagogical, SocialAssistance";

pub fn is_valid_name(value: &str) -> bool {
    value.trim().chars().count() >= NAME_MIN_CHARS
}

pub fn is_valid_date(value: &str) -> bool {
    parse_visit_date(value).is_some()
}

pub fn is_valid_category(value: &str) -> bool {
    Category::parse(value).is_some()
}

/// Resolves a caller-supplied date to a calendar day.
///
/// Timestamps with an offset are converted to UTC first, so
/// `2025-01-15T23:30:00-03:00` lands on 2025-01-16.
pub fn parse_visit_date(value: &str) -> Option<NaiveDate> {
    parse_calendar_date(value.trim()).filter(|d| (MIN_YEAR..=MAX_YEAR).contains(&d.year()))
}

fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Outcome of checking every rule on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Checks all four rules, in field order, collecting every failure.
pub fn validate_fields(
    name: &str,
    professional: &str,
    visit_date: Option<&str>,
    category: Option<&str>,
) -> ValidationReport {
    let mut errors = Vec::new();
    if !is_valid_name(name) {
        errors.push(NAME_RULE.to_string());
    }
    if !is_valid_name(professional) {
        errors.push(PROFESSIONAL_RULE.to_string());
    }
    if !visit_date.map(is_valid_date).unwrap_or(false) {
        errors.push(DATE_RULE.to_string());
    }
    if !category.map(is_valid_category).unwrap_or(false) {
        errors.push(CATEGORY_RULE.to_string());
    }
    ValidationReport::from_errors(errors)
}
