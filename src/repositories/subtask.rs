//! Subtask repository for database operations.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, LoaderTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use crate::entities::{general_task, subtask, TaskStatus};

/// Statuses the overdue sweep leaves alone.
const SETTLED_STATUSES: [TaskStatus; 4] = [
    TaskStatus::Finalizado,
    TaskStatus::Suspendido,
    TaskStatus::Cancelado,
    TaskStatus::Retrasado,
];

/// Repository for subtask-related database operations.
pub struct SubtaskRepository;

impl SubtaskRepository {
    /// Get a single subtask by UUID.
    pub async fn get_by_id<C>(conn: &C, uuid: &Uuid) -> Result<Option<subtask::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        subtask::Entity::find_by_id(*uuid).one(conn).await
    }

    /// Get the subtasks of a general task ordered by due date.
    pub async fn get_for_general_task<C>(conn: &C, general_task_uuid: &Uuid) -> Result<Vec<subtask::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        subtask::Entity::find()
            .filter(subtask::Column::GeneralTaskUuid.eq(*general_task_uuid))
            .order_by_asc(subtask::Column::DueDate)
            .all(conn)
            .await
    }

    /// Get the subtasks assigned to a user ordered by due date.
    pub async fn get_assigned_to<C>(conn: &C, user_uuid: &Uuid) -> Result<Vec<subtask::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        subtask::Entity::find()
            .filter(subtask::Column::AssignedUserUuid.eq(*user_uuid))
            .order_by_asc(subtask::Column::DueDate)
            .all(conn)
            .await
    }

    /// Eager-load the subtasks of many general tasks in one query.
    pub async fn load_for_general_tasks<C>(
        conn: &C,
        general_tasks: &[general_task::Model],
    ) -> Result<Vec<Vec<subtask::Model>>, DbErr>
    where
        C: ConnectionTrait,
    {
        if general_tasks.is_empty() {
            return Ok(Vec::new());
        }
        general_tasks
            .load_many(subtask::Entity::find().order_by_asc(subtask::Column::DueDate), conn)
            .await
    }

    /// Subtasks past their due date that are still open and not yet marked late.
    pub async fn get_sweep_candidates<C>(conn: &C, today: NaiveDate) -> Result<Vec<subtask::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        subtask::Entity::find()
            .filter(subtask::Column::DueDate.lt(today))
            .filter(subtask::Column::Status.is_not_in(SETTLED_STATUSES))
            .order_by_asc(subtask::Column::DueDate)
            .all(conn)
            .await
    }

    /// Whether the subtasks of a general task are assigned to anyone outside the area.
    pub async fn has_assignee_outside<C>(
        conn: &C,
        general_task_uuid: &Uuid,
        allowed_user_uuids: &[Uuid],
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(subtask::Entity::find()
            .filter(subtask::Column::GeneralTaskUuid.eq(*general_task_uuid))
            .filter(subtask::Column::AssignedUserUuid.is_not_null())
            .filter(subtask::Column::AssignedUserUuid.is_not_in(allowed_user_uuids.iter().copied()))
            .one(conn)
            .await?
            .is_some())
    }

    pub async fn create<C>(conn: &C, subtask: subtask::ActiveModel) -> Result<subtask::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        subtask.insert(conn).await
    }

    pub async fn update<C>(conn: &C, subtask: subtask::ActiveModel) -> Result<subtask::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        subtask.update(conn).await
    }

    pub async fn delete<C>(conn: &C, subtask: subtask::Model) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        subtask.delete(conn).await?;
        Ok(())
    }

    /// Delete every subtask under the given general tasks.
    pub async fn delete_for_general_tasks<C>(conn: &C, general_task_uuids: &[Uuid]) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        if general_task_uuids.is_empty() {
            return Ok(0);
        }
        let result = subtask::Entity::delete_many()
            .filter(subtask::Column::GeneralTaskUuid.is_in(general_task_uuids.iter().copied()))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}
