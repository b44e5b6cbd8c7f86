//! Area repository for database operations.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::area;

/// Repository for area-related database operations.
pub struct AreaRepository;

impl AreaRepository {
    /// Get all areas ordered by name.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<area::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        area::Entity::find().order_by_asc(area::Column::Name).all(conn).await
    }

    /// Get a single area by UUID.
    pub async fn get_by_id<C>(conn: &C, uuid: &Uuid) -> Result<Option<area::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        area::Entity::find_by_id(*uuid).one(conn).await
    }

    pub async fn get_by_name<C>(conn: &C, name: &str) -> Result<Option<area::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        area::Entity::find().filter(area::Column::Name.eq(name)).one(conn).await
    }

    /// Resolve a self-registration code to its area.
    pub async fn get_by_code<C>(conn: &C, code: &str) -> Result<Option<area::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        area::Entity::find()
            .filter(area::Column::Code.eq(code.trim()))
            .one(conn)
            .await
    }

    pub async fn create<C>(conn: &C, area: area::ActiveModel) -> Result<area::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        area.insert(conn).await
    }
}
