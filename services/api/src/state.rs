//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::repositories::{
    InMemoryStore, MealRepository, PgMealRepository, PgUserRepository, UserRepository,
};
use crate::session::SessionSettings;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Present when the repositories are backed by PostgreSQL
    pub db_pool: Option<PgPool>,
    pub user_repository: Arc<dyn UserRepository>,
    pub meal_repository: Arc<dyn MealRepository>,
    pub session: SessionSettings,
}

impl AppState {
    /// State backed by PostgreSQL
    pub fn postgres(pool: PgPool, session: SessionSettings) -> Self {
        Self {
            db_pool: Some(pool.clone()),
            user_repository: Arc::new(PgUserRepository::new(pool.clone())),
            meal_repository: Arc::new(PgMealRepository::new(pool)),
            session,
        }
    }

    /// State backed by a single in-memory store
    pub fn in_memory(store: InMemoryStore, session: SessionSettings) -> Self {
        Self {
            db_pool: None,
            user_repository: Arc::new(store.clone()),
            meal_repository: Arc::new(store),
            session,
        }
    }
}
