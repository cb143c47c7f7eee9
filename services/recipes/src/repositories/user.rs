//! User repository for database operations

use std::collections::HashMap;

use common::error::DatabaseResult;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder, Transaction};
use tracing::info;

use super::{like_pattern, order_by, profile::insert_profile};
use crate::{
    models::{NewProfile, NewUser, Profile, UpdateUser, User},
    password::verify_password,
    serializers::UserQuery,
};

pub(crate) const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, password_hash, is_staff, date_joined";

/// Insert a user; usable inside a transaction
pub(crate) async fn insert_user<'e>(
    executor: impl PgExecutor<'e>,
    new_user: &NewUser,
) -> DatabaseResult<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (username, email, first_name, last_name, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.first_name)
    .bind(&new_user.last_name)
    .bind(&new_user.password_hash)
    .fetch_one(executor)
    .await?;

    Ok(user)
}

/// A user and profile written but not yet committed
pub struct PendingRegistration {
    tx: Transaction<'static, Postgres>,
    pub user: User,
    pub profile: Profile,
}

impl PendingRegistration {
    pub async fn commit(self) -> DatabaseResult<(User, Profile)> {
        self.tx.commit().await?;
        Ok((self.user, self.profile))
    }
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user from an already hashed password
    pub async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", new_user.username);
        insert_user(&self.pool, new_user).await
    }

    /// Insert a user and its profile inside an open transaction
    ///
    /// `profile.user_id` is ignored and replaced by the new user's id.
    /// Nothing is visible to other connections until
    /// [`PendingRegistration::commit`]; dropping the pending registration
    /// rolls both rows back.
    pub async fn begin_registration(
        &self,
        new_user: &NewUser,
        profile: NewProfile,
    ) -> DatabaseResult<PendingRegistration> {
        info!("Registering user with profile: {}", new_user.username);

        let mut tx = self.pool.begin().await?;
        let user = insert_user(&mut *tx, new_user).await?;
        let profile = insert_profile(
            &mut *tx,
            &NewProfile {
                user_id: user.id,
                ..profile
            },
        )
        .await?;

        Ok(PendingRegistration { tx, user, profile })
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Load several users at once, keyed by id
    pub async fn find_many(&self, ids: &[i64]) -> DatabaseResult<HashMap<i64, User>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }

    /// List users matching the query filters
    pub async fn list(&self, query: &UserQuery) -> DatabaseResult<Vec<User>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));

        for (column, value) in [
            ("username", &query.username),
            ("email", &query.email),
            ("first_name", &query.first_name),
            ("last_name", &query.last_name),
        ] {
            if let Some(value) = value {
                builder.push(format!(" AND {} = ", column)).push_bind(value.clone());
            }
        }

        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(search.trim());
            builder.push(" AND (");
            let mut separated = builder.separated(" OR ");
            for column in ["username", "email", "first_name", "last_name"] {
                separated
                    .push(format!("{} ILIKE ", column))
                    .push_bind_unseparated(pattern.clone());
            }
            builder.push(")");
        }

        builder.push(" ORDER BY ").push(order_by(
            query.ordering.as_deref(),
            &[("username", "username"), ("email", "email")],
            "id ASC",
        ));

        let users = builder.build_query_as::<User>().fetch_all(&self.pool).await?;
        Ok(users)
    }

    /// Apply a partial update; absent fields keep their stored value
    pub async fn update(&self, id: i64, update: &UpdateUser) -> DatabaseResult<Option<User>> {
        info!("Updating user: {}", id);

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                password_hash = COALESCE($6, password_hash)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.username)
        .bind(&update.email)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Delete a user and, through cascades, everything they own
    pub async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        info!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Look a user up by username and check the password
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> DatabaseResult<Option<User>> {
        let user = self.find_by_username(username).await?;
        Ok(user.filter(|u| verify_password(&u.password_hash, password)))
    }
}
