//! Application state shared across handlers

use std::sync::Arc;

use common::cache::RedisPool;
use sqlx::PgPool;

use crate::{
    config::ServerConfig,
    jwt::JwtService,
    repositories::{
        CatalogRepository, PlanRepository, ProfileRepository, RecipeRepository,
        SocialRepository, UserRepository,
    },
    session::SessionManager,
    storage::MediaStorage,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub jwt_service: JwtService,
    pub session_manager: SessionManager,
    pub storage: MediaStorage,
    pub user_repository: UserRepository,
    pub profile_repository: ProfileRepository,
    pub recipe_repository: RecipeRepository,
    pub catalog_repository: CatalogRepository,
    pub social_repository: SocialRepository,
    pub plan_repository: PlanRepository,
}

impl AppState {
    pub fn new(
        db_pool: PgPool,
        redis_pool: RedisPool,
        jwt_service: JwtService,
        config: ServerConfig,
    ) -> Self {
        Self {
            session_manager: SessionManager::new(redis_pool, config.session_ttl_seconds),
            storage: MediaStorage::new(config.media_root.clone()),
            user_repository: UserRepository::new(db_pool.clone()),
            profile_repository: ProfileRepository::new(db_pool.clone()),
            recipe_repository: RecipeRepository::new(db_pool.clone()),
            catalog_repository: CatalogRepository::new(db_pool.clone()),
            social_repository: SocialRepository::new(db_pool.clone()),
            plan_repository: PlanRepository::new(db_pool),
            config: Arc::new(config),
            jwt_service,
        }
    }
}
