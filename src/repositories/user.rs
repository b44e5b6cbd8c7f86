//! User repository for database operations.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::{user, Role};

/// Repository for user-related database operations.
pub struct UserRepository;

impl UserRepository {
    /// Get all users ordered by username.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        user::Entity::find().order_by_asc(user::Column::Username).all(conn).await
    }

    /// Get a single user by UUID.
    pub async fn get_by_id<C>(conn: &C, uuid: &Uuid) -> Result<Option<user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        user::Entity::find_by_id(*uuid).one(conn).await
    }

    pub async fn get_by_username<C>(conn: &C, username: &str) -> Result<Option<user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
    }

    pub async fn get_by_email<C>(conn: &C, email: &str) -> Result<Option<user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        user::Entity::find().filter(user::Column::Email.eq(email)).one(conn).await
    }

    /// Look a user up by username or email, as typed on a sign-in form.
    /// Emails are stored lowercased, so the email match ignores case.
    pub async fn get_by_login<C>(conn: &C, login: &str) -> Result<Option<user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        user::Entity::find()
            .filter(
                user::Column::Username
                    .eq(login)
                    .or(user::Column::Email.eq(login.to_lowercase())),
            )
            .one(conn)
            .await
    }

    /// Get every user of an area ordered by username.
    pub async fn get_in_area<C>(conn: &C, area_uuid: &Uuid) -> Result<Vec<user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        user::Entity::find()
            .filter(user::Column::AreaUuid.eq(*area_uuid))
            .order_by_asc(user::Column::Username)
            .all(conn)
            .await
    }

    /// Get the support staff of an area ordered by username.
    pub async fn get_apoyos_in_area<C>(conn: &C, area_uuid: &Uuid) -> Result<Vec<user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        user::Entity::find()
            .filter(user::Column::AreaUuid.eq(*area_uuid))
            .filter(user::Column::Role.eq(Role::Apoyo))
            .order_by_asc(user::Column::Username)
            .all(conn)
            .await
    }

    pub async fn create<C>(conn: &C, user: user::ActiveModel) -> Result<user::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        user.insert(conn).await
    }
}
