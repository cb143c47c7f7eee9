//! Profile repository

use common::error::DatabaseResult;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use tracing::info;

use super::like_pattern;
use crate::{
    models::{NewProfile, Profile, UpdateProfile},
    serializers::ProfileQuery,
};

const PROFILE_COLUMNS: &str = "id, user_id, full_name, avatar, bio, parser, be";

/// Insert a profile; usable inside a transaction
pub(crate) async fn insert_profile<'e>(
    executor: impl PgExecutor<'e>,
    new_profile: &NewProfile,
) -> DatabaseResult<Profile> {
    let profile = sqlx::query_as::<_, Profile>(&format!(
        r#"
        INSERT INTO profiles (user_id, full_name, avatar, bio, parser, be)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(new_profile.user_id)
    .bind(&new_profile.full_name)
    .bind(&new_profile.avatar)
    .bind(&new_profile.bio)
    .bind(&new_profile.parser)
    .bind(&new_profile.be)
    .fetch_one(executor)
    .await?;

    Ok(profile)
}

#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a profile; a second profile for the same user violates
    /// `profiles_user_id_key`
    pub async fn create(&self, new_profile: &NewProfile) -> DatabaseResult<Profile> {
        info!("Creating profile for user {}", new_profile.user_id);
        insert_profile(&self.pool, new_profile).await
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// List profiles, filtered by exact username or a username search
    pub async fn list(&self, query: &ProfileQuery) -> DatabaseResult<Vec<Profile>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT p.id, p.user_id, p.full_name, p.avatar, p.bio, p.parser, p.be \
             FROM profiles p JOIN users u ON u.id = p.user_id WHERE TRUE",
        );

        if let Some(username) = &query.user_username {
            builder.push(" AND u.username = ").push_bind(username.clone());
        }

        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            builder
                .push(" AND u.username ILIKE ")
                .push_bind(like_pattern(search.trim()));
        }

        builder.push(" ORDER BY p.id ASC");

        let profiles = builder
            .build_query_as::<Profile>()
            .fetch_all(&self.pool)
            .await?;
        Ok(profiles)
    }

    pub async fn update(&self, id: i64, update: &UpdateProfile) -> DatabaseResult<Option<Profile>> {
        info!("Updating profile: {}", id);

        // Nullable columns need an explicit "touch" flag so that NULL can be written.
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                bio = COALESCE($3, bio),
                parser = CASE WHEN $4 THEN $5 ELSE parser END,
                be = CASE WHEN $6 THEN $7 ELSE be END
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.full_name)
        .bind(&update.bio)
        .bind(update.parser.is_some())
        .bind(update.parser.clone().flatten())
        .bind(update.be.is_some())
        .bind(update.be.clone().flatten())
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn set_avatar(&self, id: i64, path: &str) -> DatabaseResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles SET avatar = $2 WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(id)
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        info!("Deleting profile: {}", id);

        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
