//! PostgreSQL repositories

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::{MealRepository, UserRepository};
use crate::models::{Meal, MealInput, NewUser, User};

/// User repository for database operations
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        session_id: row.get("session_id"),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", new_user.email);

        let row = sqlx::query(
            r#"
            INSERT INTO users (id, session_id, name, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, session_id, name, email
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_user.session_id)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(user_from_row(&row))
    }

    async fn list(&self) -> DatabaseResult<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, name, email
            FROM users
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    async fn find_by_session(&self, session_id: Uuid) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, session_id, name, email
            FROM users
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn session_in_use(&self, session_id: Uuid) -> DatabaseResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE session_id = $1)")
            .bind(session_id)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }
}

/// Meal repository for database operations
#[derive(Clone)]
pub struct PgMealRepository {
    pool: PgPool,
}

impl PgMealRepository {
    /// Create a new meal repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn meal_from_row(row: &PgRow) -> Meal {
    Meal {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        description: row.get("description"),
        permitted: row.get("permited"),
        occurred_at: row.get("date_and_hour"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl MealRepository for PgMealRepository {
    async fn list(&self, owner: Uuid) -> DatabaseResult<Vec<Meal>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, description, permited, date_and_hour, created_at
            FROM meals
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(rows.iter().map(meal_from_row).collect())
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> DatabaseResult<Option<Meal>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, description, permited, date_and_hour, created_at
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(meal_from_row))
    }

    async fn create(&self, owner: Uuid, input: &MealInput) -> DatabaseResult<()> {
        info!("Recording meal for user: {}", owner);

        // clock_timestamp() advances within a transaction, unlike now().
        sqlx::query(
            r#"
            INSERT INTO meals (id, user_id, name, description, permited, date_and_hour, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, clock_timestamp())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.permitted)
        .bind(input.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(())
    }

    async fn update(&self, owner: Uuid, id: Uuid, input: &MealInput) -> DatabaseResult<bool> {
        info!("Updating meal {} for user: {}", id, owner);

        let result = sqlx::query(
            r#"
            UPDATE meals
            SET name = $3, description = $4, permited = $5, date_and_hour = $6
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.permitted)
        .bind(input.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting meal {} for user: {}", id, owner);

        let result = sqlx::query(
            r#"
            DELETE FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use common::database::{DatabaseConfig, init_pool, run_migrations};

    async fn pool() -> PgPool {
        let config = DatabaseConfig::from_env().unwrap();
        let pool = init_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn input(name: &str, permitted: bool, hour: u32) -> MealInput {
        MealInput {
            name: name.to_string(),
            description: "postgres test".to_string(),
            permitted,
            occurred_at: Utc.with_ymd_and_hms(2024, 12, 30, hour, 0, 0).unwrap(),
        }
    }

    async fn register(users: &PgUserRepository) -> User {
        users
            .create(&NewUser {
                name: "Pg Tester".to_string(),
                email: "pg@example.com".to_string(),
                session_id: Uuid::new_v4(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn meals_are_scoped_to_their_owner() {
        let pool = pool().await;
        let users = PgUserRepository::new(pool.clone());
        let meals = PgMealRepository::new(pool);

        let alice = register(&users).await;
        let bob = register(&users).await;

        meals.create(alice.id, &input("Salad", true, 8)).await.unwrap();
        let meal = meals.list(alice.id).await.unwrap().remove(0);

        assert!(meals.find(bob.id, meal.id).await.unwrap().is_none());
        assert!(!meals.update(bob.id, meal.id, &input("Cake", false, 9)).await.unwrap());
        assert!(!meals.delete(bob.id, meal.id).await.unwrap());
        assert_eq!(meals.find(alice.id, meal.id).await.unwrap(), Some(meal.clone()));

        assert!(meals.delete(alice.id, meal.id).await.unwrap());
        assert!(meals.find(alice.id, meal.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn list_returns_creation_order() {
        let pool = pool().await;
        let users = PgUserRepository::new(pool.clone());
        let meals = PgMealRepository::new(pool);
        let owner = register(&users).await;

        meals.create(owner.id, &input("late", true, 20)).await.unwrap();
        meals.create(owner.id, &input("early", false, 6)).await.unwrap();

        let names: Vec<String> = meals
            .list(owner.id)
            .await
            .unwrap()
            .into_iter()
            .map(|meal| meal.name)
            .collect();
        assert_eq!(names, vec!["late", "early"]);
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn update_overwrites_every_field() {
        let pool = pool().await;
        let users = PgUserRepository::new(pool.clone());
        let meals = PgMealRepository::new(pool);
        let owner = register(&users).await;

        meals.create(owner.id, &input("Soup", true, 12)).await.unwrap();
        let id = meals.list(owner.id).await.unwrap()[0].id;

        let mut replacement = input("Pizza", false, 13);
        replacement.description = "Extra cheese".to_string();
        replacement.occurred_at += Duration::minutes(30);
        assert!(meals.update(owner.id, id, &replacement).await.unwrap());

        let meal = meals.find(owner.id, id).await.unwrap().unwrap();
        assert_eq!(meal.name, "Pizza");
        assert_eq!(meal.description, "Extra cheese");
        assert!(!meal.permitted);
        assert_eq!(meal.occurred_at, replacement.occurred_at);
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn sessions_resolve_to_one_user() {
        let pool = pool().await;
        let users = PgUserRepository::new(pool);
        let user = register(&users).await;
        let token = user.session_id.unwrap();

        assert!(users.session_in_use(token).await.unwrap());
        assert_eq!(users.find_by_session(token).await.unwrap(), Some(user));
        assert!(!users.session_in_use(Uuid::new_v4()).await.unwrap());

        let duplicate = users
            .create(&NewUser {
                name: "Copycat".to_string(),
                email: "copy@example.com".to_string(),
                session_id: token,
            })
            .await;
        assert!(matches!(duplicate, Err(DatabaseError::Query(_))));
    }
}
