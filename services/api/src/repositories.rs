//! Repositories for users and meals
//!
//! The traits are the only way handlers reach storage. `postgres` backs them
//! with `sqlx`; `memory` keeps everything in process for tests and demos.

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{Meal, MealInput, NewUser, User};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{PgMealRepository, PgUserRepository};

/// User storage
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user and return it
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User>;

    /// All users, ordered by name
    async fn list(&self) -> DatabaseResult<Vec<User>>;

    /// The user holding `session_id`, if any
    async fn find_by_session(&self, session_id: Uuid) -> DatabaseResult<Option<User>>;

    /// Whether `session_id` is already bound to a user
    async fn session_in_use(&self, session_id: Uuid) -> DatabaseResult<bool> {
        Ok(self.find_by_session(session_id).await?.is_some())
    }
}

/// Meal storage, always scoped to the owning user.
///
/// A meal that exists but belongs to someone else is indistinguishable from
/// one that does not exist.
#[async_trait]
pub trait MealRepository: Send + Sync {
    /// All of `owner`'s meals in creation order
    async fn list(&self, owner: Uuid) -> DatabaseResult<Vec<Meal>>;

    async fn find(&self, owner: Uuid, id: Uuid) -> DatabaseResult<Option<Meal>>;

    /// Record a meal under a fresh id
    async fn create(&self, owner: Uuid, input: &MealInput) -> DatabaseResult<()>;

    /// Overwrite every mutable field; `false` if `owner` has no such meal
    async fn update(&self, owner: Uuid, id: Uuid, input: &MealInput) -> DatabaseResult<bool>;

    /// Remove permanently; `false` if `owner` has no such meal
    async fn delete(&self, owner: Uuid, id: Uuid) -> DatabaseResult<bool>;
}
