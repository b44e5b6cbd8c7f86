//! Project repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait,
};
use uuid::Uuid;

use crate::entities::{general_task, project, subtask};

/// Repository for project-related database operations.
pub struct ProjectRepository;

impl ProjectRepository {
    /// Get all projects, latest end date first.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<project::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        project::Entity::find()
            .order_by_desc(project::Column::EndDate)
            .order_by_asc(project::Column::Name)
            .all(conn)
            .await
    }

    /// Get a single project by UUID.
    pub async fn get_by_id<C>(conn: &C, uuid: &Uuid) -> Result<Option<project::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        project::Entity::find_by_id(*uuid).one(conn).await
    }

    /// Get several projects at once, in no particular order.
    pub async fn get_by_ids<C>(conn: &C, uuids: &[Uuid]) -> Result<Vec<project::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        if uuids.is_empty() {
            return Ok(Vec::new());
        }
        project::Entity::find()
            .filter(project::Column::Uuid.is_in(uuids.iter().copied()))
            .all(conn)
            .await
    }

    /// Projects holding at least one general task of the area.
    pub async fn get_for_area<C>(conn: &C, area_uuid: &Uuid) -> Result<Vec<project::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        project::Entity::find()
            .filter(
                project::Column::Uuid.in_subquery(
                    general_task::Entity::find()
                        .filter(general_task::Column::AreaUuid.eq(*area_uuid))
                        .select_only()
                        .column(general_task::Column::ProjectUuid)
                        .into_query(),
                ),
            )
            .order_by_desc(project::Column::EndDate)
            .order_by_asc(project::Column::Name)
            .all(conn)
            .await
    }

    /// Projects holding at least one subtask assigned to the user.
    pub async fn get_for_assignee<C>(conn: &C, user_uuid: &Uuid) -> Result<Vec<project::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        project::Entity::find()
            .filter(
                project::Column::Uuid.in_subquery(
                    general_task::Entity::find()
                        .filter(
                            general_task::Column::Uuid.in_subquery(
                                subtask::Entity::find()
                                    .filter(subtask::Column::AssignedUserUuid.eq(*user_uuid))
                                    .select_only()
                                    .column(subtask::Column::GeneralTaskUuid)
                                    .into_query(),
                            ),
                        )
                        .select_only()
                        .column(general_task::Column::ProjectUuid)
                        .into_query(),
                ),
            )
            .order_by_desc(project::Column::EndDate)
            .order_by_asc(project::Column::Name)
            .all(conn)
            .await
    }

    pub async fn create<C>(conn: &C, project: project::ActiveModel) -> Result<project::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        project.insert(conn).await
    }

    pub async fn update<C>(conn: &C, project: project::ActiveModel) -> Result<project::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        project.update(conn).await
    }

    /// Delete a project row. Children must already be gone or rely on the
    /// foreign key cascade.
    pub async fn delete<C>(conn: &C, project: project::Model) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        project.delete(conn).await?;
        Ok(())
    }
}
