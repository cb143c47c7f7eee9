//! Tag, ingredient and recipe/tag wire formats

use serde::{Deserialize, Serialize};

use super::require;
use crate::{
    error::FieldErrors,
    models::{Ingredient, NewRecipeTag, RecipeTag, Tag},
    validation::validate_text,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagOut {
    pub id: i64,
    pub name: String,
}

impl From<&Tag> for TagOut {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientOut {
    pub id: i64,
    pub name: String,
}

impl From<&Ingredient> for IngredientOut {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeTagOut {
    pub id: i64,
    pub recipe: i64,
    pub tag: TagOut,
}

impl RecipeTagOut {
    pub fn new(link: &RecipeTag, tag: &Tag) -> Self {
        Self {
            id: link.id,
            recipe: link.recipe_id,
            tag: TagOut::from(tag),
        }
    }
}

/// `{name}` body shared by tags (≤50) and ingredients (≤100)
fn validated_name(name: Option<String>, max: usize) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    if let Some(name) = require(&mut errors, "name", &name, false) {
        errors.check("name", validate_text(name, Some(max)));
    }

    match name {
        Some(name) if errors.is_empty() => Ok(name.trim().to_string()),
        _ => Err(errors),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TagInput {
    pub name: Option<String>,
}

impl TagInput {
    /// Tags only carry a name, so PUT and PATCH both require it
    pub fn into_name(self) -> Result<String, FieldErrors> {
        validated_name(self.name, 50)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IngredientInput {
    pub name: Option<String>,
}

impl IngredientInput {
    pub fn into_name(self) -> Result<String, FieldErrors> {
        validated_name(self.name, 100)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecipeTagInput {
    pub recipe: Option<i64>,
    pub tag: Option<i64>,
}

impl RecipeTagInput {
    pub fn into_new(self) -> Result<NewRecipeTag, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "recipe", &self.recipe, false);
        require(&mut errors, "tag", &self.tag, false);

        match (self.recipe, self.tag) {
            (Some(recipe_id), Some(tag_id)) => Ok(NewRecipeTag { recipe_id, tag_id }),
            _ => Err(errors),
        }
    }

    /// `(recipe, tag)` to apply; PUT requires both
    pub fn into_update(self, partial: bool) -> Result<(Option<i64>, Option<i64>), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "recipe", &self.recipe, partial);
        require(&mut errors, "tag", &self.tag, partial);

        if errors.is_empty() {
            Ok((self.recipe, self.tag))
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::BLANK;

    #[test]
    fn test_tag_name_rules() {
        assert_eq!(
            TagInput {
                name: Some("  vegan ".to_string())
            }
            .into_name()
            .unwrap(),
            "vegan"
        );
        assert_eq!(
            TagInput {
                name: Some("   ".to_string())
            }
            .into_name()
            .unwrap_err()
            .get("name"),
            [BLANK.to_string()]
        );
        assert!(TagInput {
            name: Some("x".repeat(51))
        }
        .into_name()
        .is_err());
        assert!(IngredientInput {
            name: Some("x".repeat(51))
        }
        .into_name()
        .is_ok());
    }

    #[test]
    fn test_recipe_tag_output_embeds_tag() {
        let link = RecipeTag {
            id: 1,
            recipe_id: 2,
            tag_id: 3,
        };
        let tag = Tag {
            id: 3,
            name: "quick".to_string(),
        };
        let json = serde_json::to_value(RecipeTagOut::new(&link, &tag)).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "recipe": 2, "tag": {"id": 3, "name": "quick"}}));
    }

    #[test]
    fn test_recipe_tag_requires_both_ids() {
        let errors = RecipeTagInput {
            recipe: Some(1),
            tag: None,
        }
        .into_new()
        .unwrap_err();
        assert!(errors.contains("tag"));
        assert!(!errors.contains("recipe"));

        assert_eq!(
            RecipeTagInput {
                recipe: None,
                tag: Some(4)
            }
            .into_update(true)
            .unwrap(),
            (None, Some(4))
        );
    }
}
