//! Wire representations and input payloads
//!
//! Output types (`*Out`) are what the API renders; input types (`*Input`)
//! are deserialized request bodies that validate themselves into the
//! repository payloads. With `partial = false` (create, PUT) every required
//! field must be present; with `partial = true` (PATCH) absent fields are
//! left untouched.

pub mod catalog;
pub mod filters;
pub mod plan;
pub mod profile;
pub mod recipe;
pub mod social;
pub mod user;

use serde::{Deserialize, Deserializer};

use crate::{error::FieldErrors, validation::REQUIRED};

pub use catalog::{IngredientInput, IngredientOut, RecipeTagInput, RecipeTagOut, TagInput, TagOut};
pub use filters::{CommentQuery, FavoriteQuery, ProfileQuery, RecipeQuery, UserQuery};
pub use plan::{WeeklyPlanInput, WeeklyPlanOut};
pub use profile::{ProfileInput, ProfileOut};
pub use recipe::{
    RecipeImageOut, RecipeIngredientInput, RecipeIngredientOut, RecipeInput, RecipeOut,
};
pub use social::{
    CommentInput, CommentOut, FavoriteInput, FavoriteOut, LikeInput, LikeOut,
};
pub use user::{UserInput, UserOut, hashed};

/// Distinguish an explicit `null` (`Some(None)`) from an absent key (`None`)
///
/// Use together with `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Record a missing required field unless the payload is partial
pub(crate) fn require<'a, T>(
    errors: &mut FieldErrors,
    field: &str,
    value: &'a Option<T>,
    partial: bool,
) -> Option<&'a T> {
    if value.is_none() && !partial {
        errors.add(field, REQUIRED);
    }
    value.as_ref()
}

/// Message for an enum value outside its choices
pub(crate) fn invalid_choice(value: &str) -> String {
    format!("\"{}\" is not a valid choice.", value)
}
