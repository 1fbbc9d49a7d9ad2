use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    SqlErr,
};

use crate::{
    entity,
    error::{ProfileError, ProfileResult},
    models::{NewUser, User},
    repository::ProfileRepository,
};

/// PostgreSQL-backed ProfileRepository
#[derive(Clone)]
pub struct PgProfileRepository {
    db: DatabaseConnection,
}

impl PgProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn map_db_err(e: DbErr) -> ProfileError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => ProfileError::ConstraintViolation(msg),
        _ => ProfileError::Internal(format!("Database error: {}", e)),
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_all(&self) -> ProfileResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i32) -> ProfileResult<Option<User>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> ProfileResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(Into::into))
    }

    async fn insert(&self, user: NewUser) -> ProfileResult<User> {
        let active_model: entity::ActiveModel = user.into();
        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;

        tracing::debug!(user_id = model.id, "Inserted user row");
        Ok(model.into())
    }

    async fn update(&self, id: i32, user: NewUser) -> ProfileResult<User> {
        let exists = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .is_some();
        if !exists {
            return Err(ProfileError::NotFound(id));
        }

        let model = entity::ActiveModel::replacing(id, user)
            .update(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(user_id = id, "Updated user row");
        Ok(model.into())
    }

    async fn ping(&self) -> ProfileResult<()> {
        database::postgres::check_health(&self.db)
            .await
            .map_err(|e| ProfileError::Internal(e.to_string()))
    }
}
