//! Weekly plan repository

use std::collections::HashMap;

use common::error::DatabaseResult;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use crate::models::{NewWeeklyPlan, UpdateWeeklyPlan, WeeklyPlan};

#[derive(Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

async fn link_recipes(
    tx: &mut Transaction<'_, Postgres>,
    plan_id: i64,
    recipe_ids: &[i64],
) -> DatabaseResult<()> {
    if recipe_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO weekly_plan_recipes (weekly_plan_id, recipe_id)
        SELECT $1, UNNEST($2::BIGINT[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(plan_id)
    .bind(recipe_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> DatabaseResult<Vec<WeeklyPlan>> {
        let plans = sqlx::query_as::<_, WeeklyPlan>(
            "SELECT id, user_id, week_start_date, created_at FROM weekly_plans ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(plans)
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<WeeklyPlan>> {
        let plan = sqlx::query_as::<_, WeeklyPlan>(
            "SELECT id, user_id, week_start_date, created_at FROM weekly_plans WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(plan)
    }

    /// Create a plan and its recipe set in one transaction
    pub async fn create(&self, new_plan: &NewWeeklyPlan) -> DatabaseResult<WeeklyPlan> {
        info!(
            "Creating weekly plan for user {} starting {}",
            new_plan.user_id, new_plan.week_start_date
        );

        let mut tx = self.pool.begin().await?;

        let plan = sqlx::query_as::<_, WeeklyPlan>(
            r#"
            INSERT INTO weekly_plans (user_id, week_start_date)
            VALUES ($1, $2)
            RETURNING id, user_id, week_start_date, created_at
            "#,
        )
        .bind(new_plan.user_id)
        .bind(new_plan.week_start_date)
        .fetch_one(&mut *tx)
        .await?;

        link_recipes(&mut tx, plan.id, &new_plan.recipe_ids).await?;

        tx.commit().await?;
        Ok(plan)
    }

    /// Update a plan; a present `recipe_ids` replaces the whole set
    pub async fn update(
        &self,
        id: i64,
        update: &UpdateWeeklyPlan,
    ) -> DatabaseResult<Option<WeeklyPlan>> {
        let mut tx = self.pool.begin().await?;

        let plan = sqlx::query_as::<_, WeeklyPlan>(
            r#"
            UPDATE weekly_plans SET
                user_id = COALESCE($2, user_id),
                week_start_date = COALESCE($3, week_start_date)
            WHERE id = $1
            RETURNING id, user_id, week_start_date, created_at
            "#,
        )
        .bind(id)
        .bind(update.user_id)
        .bind(update.week_start_date)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(plan) = plan else {
            return Ok(None);
        };

        if let Some(recipe_ids) = &update.recipe_ids {
            sqlx::query("DELETE FROM weekly_plan_recipes WHERE weekly_plan_id = $1")
                .bind(plan.id)
                .execute(&mut *tx)
                .await?;
            link_recipes(&mut tx, plan.id, recipe_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(plan))
    }

    pub async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM weekly_plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Recipe ids per plan, in recipe id order
    pub async fn recipe_ids_for(&self, plan_ids: &[i64]) -> DatabaseResult<HashMap<i64, Vec<i64>>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT weekly_plan_id, recipe_id FROM weekly_plan_recipes \
             WHERE weekly_plan_id = ANY($1) ORDER BY recipe_id",
        )
        .bind(plan_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();
        for (plan_id, recipe_id) in rows {
            grouped.entry(plan_id).or_default().push(recipe_id);
        }
        Ok(grouped)
    }
}
