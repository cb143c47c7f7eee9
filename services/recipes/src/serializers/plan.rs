//! Weekly plan wire format

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{RecipeOut, UserOut, require};
use crate::{
    error::FieldErrors,
    models::{NewWeeklyPlan, UpdateWeeklyPlan, User, WeeklyPlan},
};

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyPlanOut {
    pub id: i64,
    pub user: UserOut,
    pub recipes: Vec<RecipeOut>,
    pub week_start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl WeeklyPlanOut {
    pub fn new(plan: &WeeklyPlan, user: &User, recipes: Vec<RecipeOut>) -> Self {
        Self {
            id: plan.id,
            user: UserOut::from(user),
            recipes,
            week_start_date: plan.week_start_date,
            created_at: plan.created_at,
        }
    }
}

/// Weekly plan body; `user` defaults to the caller, `recipes` to none
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WeeklyPlanInput {
    pub user: Option<i64>,
    pub week_start_date: Option<NaiveDate>,
    pub recipes: Option<Vec<i64>>,
}

impl WeeklyPlanInput {
    pub fn into_new(self, caller_id: i64) -> Result<NewWeeklyPlan, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "week_start_date", &self.week_start_date, false);

        match self.week_start_date {
            Some(week_start_date) => Ok(NewWeeklyPlan {
                user_id: self.user.unwrap_or(caller_id),
                week_start_date,
                recipe_ids: dedup(self.recipes.unwrap_or_default()),
            }),
            None => Err(errors),
        }
    }

    pub fn into_update(self, partial: bool) -> Result<UpdateWeeklyPlan, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "week_start_date", &self.week_start_date, partial);
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(UpdateWeeklyPlan {
            user_id: self.user,
            week_start_date: self.week_start_date,
            recipe_ids: self.recipes.map(dedup),
        })
    }
}

fn dedup(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}
