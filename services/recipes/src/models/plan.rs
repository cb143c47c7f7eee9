//! Weekly meal plans

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// A user's plan for the week starting at `week_start_date`
#[derive(Debug, Clone, FromRow)]
pub struct WeeklyPlan {
    pub id: i64,
    pub user_id: i64,
    pub week_start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWeeklyPlan {
    pub user_id: i64,
    pub week_start_date: NaiveDate,
    pub recipe_ids: Vec<i64>,
}

/// Weekly plan update; `recipe_ids` replaces the whole set when present
#[derive(Debug, Clone, Default)]
pub struct UpdateWeeklyPlan {
    pub user_id: Option<i64>,
    pub week_start_date: Option<NaiveDate>,
    pub recipe_ids: Option<Vec<i64>>,
}
