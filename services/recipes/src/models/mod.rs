//! Recipe service data model

pub mod catalog;
pub mod plan;
pub mod profile;
pub mod recipe;
pub mod social;
pub mod user;

// Re-export for convenience
pub use catalog::{
    Ingredient, MeasurementUnit, NewRecipeIngredient, NewRecipeTag, RecipeIngredient, RecipeTag,
    Tag,
};
pub use plan::{NewWeeklyPlan, UpdateWeeklyPlan, WeeklyPlan};
pub use profile::{NewProfile, Profile, UpdateProfile};
pub use recipe::{Difficulty, NewRecipe, Recipe, RecipeImage, UpdateRecipe};
pub use social::{Comment, Favorite, Like, NewComment, NewFavorite, NewLike};
pub use user::{NewUser, UpdateUser, User};
