//! Catalog entities (ingredients, tags) and the join rows linking them to recipes

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Unit of measure for a recipe ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "measurement_unit")]
pub enum MeasurementUnit {
    #[sqlx(rename = "g")]
    #[serde(rename = "g")]
    Grams,
    #[sqlx(rename = "ml")]
    #[serde(rename = "ml")]
    Milliliters,
    #[sqlx(rename = "tbsp")]
    #[serde(rename = "tbsp")]
    Tablespoon,
    #[sqlx(rename = "tsp")]
    #[serde(rename = "tsp")]
    Teaspoon,
    #[sqlx(rename = "pc")]
    #[serde(rename = "pc")]
    Piece,
}

impl MeasurementUnit {
    pub const ALL: [MeasurementUnit; 5] = [
        MeasurementUnit::Grams,
        MeasurementUnit::Milliliters,
        MeasurementUnit::Tablespoon,
        MeasurementUnit::Teaspoon,
        MeasurementUnit::Piece,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementUnit::Grams => "g",
            MeasurementUnit::Milliliters => "ml",
            MeasurementUnit::Tablespoon => "tbsp",
            MeasurementUnit::Teaspoon => "tsp",
            MeasurementUnit::Piece => "pc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.as_str() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeasurementUnit::Grams => "Grams",
            MeasurementUnit::Milliliters => "Milliliters",
            MeasurementUnit::Tablespoon => "Tablespoon",
            MeasurementUnit::Teaspoon => "Teaspoon",
            MeasurementUnit::Piece => "Piece",
        }
    }
}

/// Globally shared ingredient
#[derive(Debug, Clone, FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
}

/// Globally shared tag
#[derive(Debug, Clone, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Ingredient line of a recipe
#[derive(Debug, Clone, FromRow)]
pub struct RecipeIngredient {
    pub id: i64,
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub quantity: Decimal,
    pub unit: MeasurementUnit,
}

/// Link between a recipe and a tag
#[derive(Debug, Clone, FromRow)]
pub struct RecipeTag {
    pub id: i64,
    pub recipe_id: i64,
    pub tag_id: i64,
}

/// New ingredient line; the ingredient is resolved by name
#[derive(Debug, Clone)]
pub struct NewRecipeIngredient {
    pub recipe_id: i64,
    pub ingredient_name: String,
    pub quantity: Decimal,
    pub unit: MeasurementUnit,
}

/// New recipe/tag link
#[derive(Debug, Clone)]
pub struct NewRecipeTag {
    pub recipe_id: i64,
    pub tag_id: i64,
}
