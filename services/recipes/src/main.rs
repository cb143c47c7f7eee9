use anyhow::Result;
use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use recipes::{
    MIGRATOR,
    config::ServerConfig,
    jwt::{JwtConfig, JwtService},
    routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting recipe service");

    let server_config = ServerConfig::load()?;
    if server_config.open_user_writes {
        warn!("RECIPES__OPEN_USER_WRITES is set: any caller may update or delete any user account");
    }

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool, &MIGRATOR).await?;

    // Initialize JWT service
    let jwt_service = JwtService::new(JwtConfig::from_env()?);

    // Initialize Redis client for login sessions
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config)?;
    match redis_pool.health_check().await {
        Ok(true) => info!("Redis connection successful"),
        _ => warn!("Redis is unreachable; browser sessions will not work until it is"),
    }

    tokio::fs::create_dir_all(&server_config.media_root).await?;

    let bind_address = server_config.bind_address.clone();
    let app = routes::create_router(AppState::new(pool, redis_pool, jwt_service, server_config));

    let listener = TcpListener::bind(&bind_address).await?;
    info!("Recipe service listening on {}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
