//! In-process store implementing both repositories

use async_trait::async_trait;
use chrono::Utc;
use common::error::DatabaseResult;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{MealRepository, UserRepository};
use crate::models::{Meal, MealInput, NewUser, User};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    // Insertion order is creation order.
    meals: Vec<Meal>,
}

/// Users and meals held in memory.
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", new_user.email);

        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            session_id: Some(new_user.session_id),
        };
        self.tables.write().await.users.push(user.clone());

        Ok(user)
    }

    async fn list(&self) -> DatabaseResult<Vec<User>> {
        let mut users = self.tables.read().await.users.clone();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn find_by_session(&self, session_id: Uuid) -> DatabaseResult<Option<User>> {
        let tables = self.tables.read().await;
        let mut holders = tables
            .users
            .iter()
            .filter(|user| user.session_id == Some(session_id));

        // A token shared by two users authenticates neither.
        match (holders.next(), holders.next()) {
            (Some(user), None) => Ok(Some(user.clone())),
            _ => Ok(None),
        }
    }

    async fn session_in_use(&self, session_id: Uuid) -> DatabaseResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .any(|user| user.session_id == Some(session_id)))
    }
}

#[async_trait]
impl MealRepository for InMemoryStore {
    async fn list(&self, owner: Uuid) -> DatabaseResult<Vec<Meal>> {
        let tables = self.tables.read().await;
        Ok(tables
            .meals
            .iter()
            .filter(|meal| meal.user_id == owner)
            .cloned()
            .collect())
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> DatabaseResult<Option<Meal>> {
        let tables = self.tables.read().await;
        Ok(tables
            .meals
            .iter()
            .find(|meal| meal.id == id && meal.user_id == owner)
            .cloned())
    }

    async fn create(&self, owner: Uuid, input: &MealInput) -> DatabaseResult<()> {
        info!("Recording meal for user: {}", owner);

        let meal = Meal {
            id: Uuid::new_v4(),
            user_id: owner,
            name: input.name.clone(),
            description: input.description.clone(),
            permitted: input.permitted,
            occurred_at: input.occurred_at,
            created_at: Utc::now(),
        };
        self.tables.write().await.meals.push(meal);

        Ok(())
    }

    async fn update(&self, owner: Uuid, id: Uuid, input: &MealInput) -> DatabaseResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(meal) = tables
            .meals
            .iter_mut()
            .find(|meal| meal.id == id && meal.user_id == owner)
        else {
            return Ok(false);
        };

        info!("Updating meal {} for user: {}", id, owner);
        meal.name = input.name.clone();
        meal.description = input.description.clone();
        meal.permitted = input.permitted;
        meal.occurred_at = input.occurred_at;

        Ok(true)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.meals.len();
        tables
            .meals
            .retain(|meal| !(meal.id == id && meal.user_id == owner));

        let deleted = tables.meals.len() < before;
        if deleted {
            info!("Deleted meal {} for user: {}", id, owner);
        }
        Ok(deleted)
    }
}
