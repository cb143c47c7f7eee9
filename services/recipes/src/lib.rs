//! Recipe sharing service
//!
//! Users register, publish recipes with ingredients, images and tags,
//! comment, like, favorite and plan weekly menus. Everything is served from
//! one axum router: a JSON API under `/api` and a handful of HTML pages.

pub mod config;
pub mod error;
pub mod extract;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod permissions;
pub mod repositories;
pub mod routes;
pub mod serializers;
pub mod session;
pub mod state;
pub mod storage;
pub mod validation;

use sqlx::migrate::Migrator;

/// Schema migrations, applied at startup
pub static MIGRATOR: Migrator = sqlx::migrate!();
