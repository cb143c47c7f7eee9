//! Recipe model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Recipe difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "difficulty", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == value)
    }
}

/// Recipe entity
#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cook_time: i32,
    pub difficulty: Difficulty,
    pub calories: i32,
    pub file: Option<String>,
}

/// Image attached to a recipe
#[derive(Debug, Clone, FromRow)]
pub struct RecipeImage {
    pub id: i64,
    pub recipe_id: i64,
    pub image_file: String,
}

/// New recipe creation payload
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub author_id: i64,
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub created_at: Option<DateTime<Utc>>,
    pub cook_time: i32,
    pub difficulty: Difficulty,
    pub calories: i32,
    pub file: Option<String>,
}

/// Recipe update payload
#[derive(Debug, Clone, Default)]
pub struct UpdateRecipe {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub cook_time: Option<i32>,
    pub difficulty: Option<Difficulty>,
    pub calories: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("Medium"), None);
        assert_eq!(Difficulty::parse(""), None);
    }

    #[test]
    fn test_difficulty_serde_is_lowercase() {
        let json = serde_json::to_string(&Difficulty::Hard).unwrap();
        assert_eq!(json, "\"hard\"");
        let parsed: Difficulty = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(parsed, Difficulty::Easy);
    }
}
