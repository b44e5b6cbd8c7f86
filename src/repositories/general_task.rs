//! General task repository for database operations.

use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, LoaderTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entities::{general_task, project, subtask};

/// Repository for general-task database operations.
pub struct GeneralTaskRepository;

impl GeneralTaskRepository {
    /// Get a single general task by UUID.
    pub async fn get_by_id<C>(conn: &C, uuid: &Uuid) -> Result<Option<general_task::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        general_task::Entity::find_by_id(*uuid).one(conn).await
    }

    /// Get several general tasks at once, in no particular order.
    pub async fn get_by_ids<C>(conn: &C, uuids: &[Uuid]) -> Result<Vec<general_task::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        if uuids.is_empty() {
            return Ok(Vec::new());
        }
        general_task::Entity::find()
            .filter(general_task::Column::Uuid.is_in(uuids.iter().copied()))
            .all(conn)
            .await
    }

    /// Get the general tasks of a project, latest due date first.
    pub async fn get_for_project<C>(conn: &C, project_uuid: &Uuid) -> Result<Vec<general_task::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        general_task::Entity::find()
            .filter(general_task::Column::ProjectUuid.eq(*project_uuid))
            .order_by_desc(general_task::Column::DueDate)
            .all(conn)
            .await
    }

    /// Get the general tasks of an area across every project.
    pub async fn get_for_area<C>(conn: &C, area_uuid: &Uuid) -> Result<Vec<general_task::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        general_task::Entity::find()
            .filter(general_task::Column::AreaUuid.eq(*area_uuid))
            .order_by_desc(general_task::Column::DueDate)
            .all(conn)
            .await
    }

    /// Eager-load the general tasks of many projects in one query.
    pub async fn load_for_projects<C>(
        conn: &C,
        projects: &[project::Model],
    ) -> Result<Vec<Vec<general_task::Model>>, DbErr>
    where
        C: ConnectionTrait,
    {
        if projects.is_empty() {
            return Ok(Vec::new());
        }
        projects
            .load_many(
                general_task::Entity::find().order_by_desc(general_task::Column::DueDate),
                conn,
            )
            .await
    }

    /// Whether any subtask of the general task is assigned to the user.
    pub async fn has_subtask_assigned_to<C>(conn: &C, general_task_uuid: &Uuid, user_uuid: &Uuid) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(subtask::Entity::find()
            .filter(subtask::Column::GeneralTaskUuid.eq(*general_task_uuid))
            .filter(subtask::Column::AssignedUserUuid.eq(*user_uuid))
            .one(conn)
            .await?
            .is_some())
    }

    pub async fn create<C>(conn: &C, general_task: general_task::ActiveModel) -> Result<general_task::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        general_task.insert(conn).await
    }

    pub async fn update<C>(conn: &C, general_task: general_task::ActiveModel) -> Result<general_task::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        general_task.update(conn).await
    }

    /// Store a freshly computed progress percentage.
    pub async fn set_progress<C>(conn: &C, uuid: &Uuid, progress_percent: f64) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        general_task::Entity::update_many()
            .col_expr(general_task::Column::ProgressPercent, Expr::value(progress_percent))
            .filter(general_task::Column::Uuid.eq(*uuid))
            .exec(conn)
            .await?;
        Ok(())
    }

    pub async fn delete<C>(conn: &C, general_task: general_task::Model) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        general_task.delete(conn).await?;
        Ok(())
    }

    /// Delete every general task of a project and return how many were removed.
    pub async fn delete_for_project<C>(conn: &C, project_uuid: &Uuid) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = general_task::Entity::delete_many()
            .filter(general_task::Column::ProjectUuid.eq(*project_uuid))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// UUIDs of the general tasks of a project.
    pub async fn uuids_for_project<C>(conn: &C, project_uuid: &Uuid) -> Result<Vec<Uuid>, DbErr>
    where
        C: ConnectionTrait,
    {
        general_task::Entity::find()
            .filter(general_task::Column::ProjectUuid.eq(*project_uuid))
            .select_only()
            .column(general_task::Column::Uuid)
            .into_tuple()
            .all(conn)
            .await
    }
}
