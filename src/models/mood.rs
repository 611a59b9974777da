use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A seeded mood a user can ask recommendations for.
///
/// The catalog is fixed at deployment time; moods are retired by clearing
/// `is_active`, never by deletion.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct Mood {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_serializes_all_catalog_fields() {
        let mood = Mood {
            id: 1,
            name: "Happy".to_string(),
            description: Some("Feel-good movies that will brighten your day".to_string()),
            emoji: Some("😊".to_string()),
            is_active: true,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&mood).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["name"], "Happy");
        assert_eq!(value["emoji"], "😊");
        assert_eq!(value["is_active"], true);
    }
}
