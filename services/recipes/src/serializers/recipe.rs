//! Recipe wire format

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{IngredientOut, RecipeTagOut, UserOut, invalid_choice, require};
use crate::{
    error::{FieldErrors, NON_FIELD_ERRORS},
    models::{
        Difficulty, Ingredient, MeasurementUnit, NewRecipe, NewRecipeIngredient, RecipeImage,
        RecipeIngredient, UpdateRecipe,
    },
    repositories::RecipeDetails,
    storage::media_url,
    validation::{validate_non_negative, validate_text},
};

#[derive(Debug, Clone, Serialize)]
pub struct RecipeIngredientOut {
    pub id: i64,
    pub recipe: i64,
    pub ingredient: IngredientOut,
    /// Fixed two fraction digits, e.g. `"2.50"`
    pub quantity: String,
    pub unit: MeasurementUnit,
}

impl RecipeIngredientOut {
    pub fn new(line: &RecipeIngredient, ingredient: &Ingredient) -> Self {
        let mut quantity = line.quantity;
        quantity.rescale(2);

        Self {
            id: line.id,
            recipe: line.recipe_id,
            ingredient: IngredientOut::from(ingredient),
            quantity: quantity.to_string(),
            unit: line.unit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeImageOut {
    pub id: i64,
    pub image_file: String,
}

impl From<&RecipeImage> for RecipeImageOut {
    fn from(image: &RecipeImage) -> Self {
        Self {
            id: image.id,
            image_file: media_url(&image.image_file),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeOut {
    pub id: i64,
    pub author: UserOut,
    pub ingredients: Vec<RecipeIngredientOut>,
    pub images: Vec<RecipeImageOut>,
    pub tags: Vec<RecipeTagOut>,
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

impl From<&RecipeDetails> for RecipeOut {
    fn from(details: &RecipeDetails) -> Self {
        let recipe = &details.recipe;
        Self {
            id: recipe.id,
            author: UserOut::from(&details.author),
            ingredients: details
                .ingredients
                .iter()
                .map(|(line, ingredient)| RecipeIngredientOut::new(line, ingredient))
                .collect(),
            images: details.images.iter().map(RecipeImageOut::from).collect(),
            tags: details
                .tags
                .iter()
                .map(|(link, tag)| RecipeTagOut::new(link, tag))
                .collect(),
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            instructions: recipe.instructions.clone(),
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
            cook_time: recipe.cook_time,
            difficulty: recipe.difficulty,
            calories: recipe.calories,
            file: recipe.file.as_deref().map(media_url),
        }
    }
}

/// Recipe body; `author` is always the caller and `file` goes through the
/// upload endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecipeInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub cook_time: Option<i64>,
    pub difficulty: Option<String>,
    pub calories: Option<i64>,
}

impl RecipeInput {
    pub fn into_update(self, partial: bool) -> Result<UpdateRecipe, FieldErrors> {
        let mut errors = FieldErrors::new();

        for (field, value, max) in [
            ("title", &self.title, Some(200)),
            ("description", &self.description, None),
            ("instructions", &self.instructions, None),
        ] {
            if let Some(value) = require(&mut errors, field, value, partial) {
                errors.check(field, validate_text(value, max));
            }
        }

        let mut non_negative = |field: &str, value: &Option<i64>| {
            require(&mut errors, field, value, partial).and_then(|v| {
                validate_non_negative(*v)
                    .map_err(|message| errors.add(field, message))
                    .ok()
            })
        };
        let cook_time = non_negative("cook_time", &self.cook_time);
        let calories = non_negative("calories", &self.calories);

        let difficulty = require(&mut errors, "difficulty", &self.difficulty, partial)
            .and_then(|value| match Difficulty::parse(value) {
                Some(difficulty) => Some(difficulty),
                None => {
                    errors.add("difficulty", invalid_choice(value));
                    None
                }
            });

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(UpdateRecipe {
            title: self.title,
            description: self.description,
            instructions: self.instructions,
            created_at: self.created_at,
            cook_time,
            difficulty,
            calories,
        })
    }

    pub fn into_new(self, author_id: i64) -> Result<NewRecipe, FieldErrors> {
        let fields = self.into_update(false)?;

        let UpdateRecipe {
            title: Some(title),
            description: Some(description),
            instructions: Some(instructions),
            created_at,
            cook_time: Some(cook_time),
            difficulty: Some(difficulty),
            calories: Some(calories),
        } = fields
        else {
            return Err(FieldErrors::single(NON_FIELD_ERRORS, "Incomplete recipe."));
        };

        Ok(NewRecipe {
            author_id,
            title,
            description,
            instructions,
            created_at,
            cook_time,
            difficulty,
            calories,
            file: None,
        })
    }
}

/// Body of `POST /api/recipes/{id}/ingredients/`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecipeIngredientInput {
    /// Catalog ingredient name, created when unknown
    pub ingredient: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
}

impl RecipeIngredientInput {
    pub fn into_new(self, recipe_id: i64) -> Result<NewRecipeIngredient, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = require(&mut errors, "ingredient", &self.ingredient, false)
            .map(|name| name.trim().to_string());
        if let Some(name) = &name {
            errors.check("ingredient", validate_text(name, Some(100)));
        }

        if let Some(quantity) = require(&mut errors, "quantity", &self.quantity, false) {
            errors.check("quantity", check_quantity(*quantity));
        }

        let unit = require(&mut errors, "unit", &self.unit, false).and_then(|value| {
            MeasurementUnit::parse(value).or_else(|| {
                errors.add("unit", invalid_choice(value));
                None
            })
        });

        match (name, self.quantity, unit) {
            (Some(ingredient_name), Some(quantity), Some(unit)) if errors.is_empty() => {
                Ok(NewRecipeIngredient {
                    recipe_id,
                    ingredient_name,
                    quantity,
                    unit,
                })
            }
            _ => Err(errors),
        }
    }
}

/// At most 6 digits, 2 of them after the decimal point
fn check_quantity(quantity: Decimal) -> Result<(), String> {
    if quantity.normalize().scale() > 2 {
        return Err("Ensure that there are no more than 2 decimal places.".to_string());
    }
    if quantity.abs() >= Decimal::from(10_000) {
        return Err(
            "Ensure that there are no more than 4 digits before the decimal point.".to_string(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Recipe, RecipeTag, Tag, User};
    use crate::validation::REQUIRED;
    use std::str::FromStr;

    fn details() -> RecipeDetails {
        let now = Utc::now();
        RecipeDetails {
            recipe: Recipe {
                id: 5,
                author_id: 1,
                title: "Soup".to_string(),
                description: "Warm".to_string(),
                instructions: "Boil".to_string(),
                created_at: now,
                updated_at: now,
                cook_time: 30,
                difficulty: Difficulty::Easy,
                calories: 200,
                file: Some("recipe_files/ab12cd34_card.pdf".to_string()),
            },
            author: User {
                id: 1,
                username: "ann".to_string(),
                email: String::new(),
                first_name: String::new(),
                last_name: String::new(),
                password_hash: "hash".to_string(),
                is_staff: false,
                date_joined: now,
            },
            ingredients: vec![(
                RecipeIngredient {
                    id: 9,
                    recipe_id: 5,
                    ingredient_id: 2,
                    quantity: Decimal::from_str("2.5").unwrap(),
                    unit: MeasurementUnit::Grams,
                },
                Ingredient {
                    id: 2,
                    name: "Salt".to_string(),
                },
            )],
            images: vec![RecipeImage {
                id: 4,
                recipe_id: 5,
                image_file: "recipe_images/00ff00ff_soup.jpg".to_string(),
            }],
            tags: vec![(
                RecipeTag {
                    id: 11,
                    recipe_id: 5,
                    tag_id: 3,
                },
                Tag {
                    id: 3,
                    name: "vegan".to_string(),
                },
            )],
        }
    }

    #[test]
    fn test_recipe_output_shape() {
        let json = serde_json::to_value(RecipeOut::from(&details())).unwrap();

        assert_eq!(json["author"]["username"], "ann");
        assert!(json["author"].get("password_hash").is_none());
        assert_eq!(json["ingredients"][0]["ingredient"]["name"], "Salt");
        assert_eq!(json["ingredients"][0]["quantity"], "2.50");
        assert_eq!(json["ingredients"][0]["unit"], "g");
        assert_eq!(json["ingredients"][0]["recipe"], 5);
        assert_eq!(json["images"][0]["image_file"], "/media/recipe_images/00ff00ff_soup.jpg");
        assert_eq!(json["tags"][0]["tag"]["name"], "vegan");
        assert_eq!(json["tags"][0]["recipe"], 5);
        assert_eq!(json["difficulty"], "easy");
        assert_eq!(json["file"], "/media/recipe_files/ab12cd34_card.pdf");
    }

    #[test]
    fn test_create_reports_every_missing_field() {
        let errors = RecipeInput::default().into_new(1).unwrap_err();
        for field in [
            "title",
            "description",
            "instructions",
            "cook_time",
            "difficulty",
            "calories",
        ] {
            assert_eq!(errors.get(field), [REQUIRED.to_string()], "{}", field);
        }
        assert!(!errors.contains("created_at"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let input: RecipeInput = serde_json::from_str(
            r#"{"title": "T", "description": "D", "instructions": "I",
                "cook_time": -1, "difficulty": "extreme", "calories": 10}"#,
        )
        .unwrap();
        let errors = input.into_new(1).unwrap_err();
        assert!(errors.contains("cook_time"));
        assert_eq!(errors.get("difficulty"), ["\"extreme\" is not a valid choice.".to_string()]);
        assert!(!errors.contains("calories"));
    }

    #[test]
    fn test_partial_update_accepts_subset() {
        let input: RecipeInput = serde_json::from_str(r#"{"title": "New"}"#).unwrap();
        let update = input.into_update(true).unwrap();
        assert_eq!(update.title.as_deref(), Some("New"));
        assert!(update.difficulty.is_none());
    }

    #[test]
    fn test_full_create_payload() {
        let input: RecipeInput = serde_json::from_str(
            r#"{"title": "T", "description": "D", "instructions": "I",
                "cook_time": 15, "difficulty": "hard", "calories": 0}"#,
        )
        .unwrap();
        let recipe = input.into_new(4).unwrap();
        assert_eq!(recipe.author_id, 4);
        assert_eq!(recipe.difficulty, Difficulty::Hard);
        assert!(recipe.created_at.is_none());
    }

    #[test]
    fn test_ingredient_line_validation() {
        let input: RecipeIngredientInput =
            serde_json::from_str(r#"{"ingredient": " Flour ", "quantity": "1.25", "unit": "tbsp"}"#)
                .unwrap();
        let line = input.into_new(3).unwrap();
        assert_eq!(line.ingredient_name, "Flour");
        assert_eq!(line.unit, MeasurementUnit::Tablespoon);

        let input: RecipeIngredientInput =
            serde_json::from_str(r#"{"ingredient": "Flour", "quantity": "1.255", "unit": "cup"}"#)
                .unwrap();
        let errors = input.into_new(3).unwrap_err();
        assert!(errors.contains("quantity"));
        assert!(errors.contains("unit"));
    }

    #[test]
    fn test_quantity_digit_limits() {
        assert!(check_quantity(Decimal::from_str("9999.99").unwrap()).is_ok());
        assert!(check_quantity(Decimal::from_str("1.500").unwrap()).is_ok());
        assert!(check_quantity(Decimal::from_str("10000").unwrap()).is_err());
    }
}
