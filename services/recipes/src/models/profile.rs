//! Profile model

use sqlx::FromRow;

/// Profile entity, one per user
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub avatar: Option<String>,
    pub bio: String,
    pub parser: Option<String>,
    pub be: Option<String>,
}

/// New profile creation payload
#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    pub user_id: i64,
    pub full_name: String,
    pub avatar: Option<String>,
    pub bio: String,
    pub parser: Option<String>,
    pub be: Option<String>,
}

/// Profile update payload
///
/// The nullable columns use `Option<Option<_>>`: outer `None` leaves the
/// column alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub parser: Option<Option<String>>,
    pub be: Option<Option<String>>,
}
