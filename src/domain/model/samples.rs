//! Sample visits used to populate an empty store in development.

use serde_json::{json, Value as JsonValue};

/// Five representative visits, one or two per category.
pub fn sample_visits() -> Vec<JsonValue> {
    vec![
        json!({
            "name": "Maria Silva",
            "professional": "Dr. João Santos",
            "visitDate": "2025-01-15",
            "category": "Psychological",
            "notes": "First appointment - anxiety"
        }),
        json!({
            "name": "Carlos Oliveira",
            "professional": "Profa. Ana Costa",
            "visitDate": "2025-01-16",
            "category": "Pedagogical",
            "notes": "Learning difficulties"
        }),
        json!({
            "name": "Fernanda Lima",
            "professional": "Paula Ribeiro",
            "visitDate": "2025-01-17",
            "category": "SocialAssistance",
            "notes": "Guidance on benefits"
        }),
        json!({
            "name": "Roberto Mendes",
            "professional": "Dr. João Santos",
            "visitDate": "2025-01-18",
            "category": "Psychological",
            "notes": "Depression follow-up"
        }),
        json!({
            "name": "Juliana Souza",
            "professional": "Profa. Ana Costa",
            "visitDate": "2025-01-19",
            "category": "Pedagogical",
            "notes": "Pedagogical assessment"
        }),
    ]
}
