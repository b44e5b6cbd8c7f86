use chrono::Utc;
use log::info;
use sea_orm::{ActiveValue, IntoActiveModel, TransactionTrait};
use serde::Serialize;
use uuid::Uuid;

use super::{authorize, load_bundles, load_directory, load_footprint, TrackerService};
use crate::constants::{SUCCESS_PROJECT_CREATED, SUCCESS_PROJECT_DELETED, SUCCESS_PROJECT_UPDATED};
use crate::entities::project;
use crate::error::{AppError, AppResult};
use crate::forms::{normalize_description, ProjectArgs};
use crate::hierarchy::{self, ProjectNode};
use crate::notifications::Notice;
use crate::permissions::{self, Action, Principal};
use crate::repositories::{AreaRepository, GeneralTaskRepository, ProjectRepository, SubtaskRepository};
use crate::utils::datetime;

/// A project with the part of its tree the caller may see.
#[derive(Clone, Debug, Serialize)]
pub struct ProjectDetails {
    pub project: project::Model,
    pub tree: ProjectNode,
}

impl TrackerService {
    /// Creates a project. Supervisors only.
    ///
    /// # Errors
    /// `Unauthorized` for other roles, `Validation` for bad input, `NotFound`
    /// when `area_uuid` does not exist.
    pub async fn create_project(&self, principal: &Principal, args: ProjectArgs) -> AppResult<project::Model> {
        authorize(principal, permissions::project(principal, Action::Create, None))?;
        args.validate()?;

        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        if let Some(area_uuid) = args.area_uuid {
            AreaRepository::get_by_id(&txn, &area_uuid)
                .await?
                .ok_or_else(|| AppError::not_found("area", area_uuid))?;
        }

        let now = Utc::now();
        let model = project::ActiveModel {
            uuid: ActiveValue::Set(Uuid::new_v4()),
            name: ActiveValue::Set(args.name.trim().to_string()),
            description: ActiveValue::Set(normalize_description(args.description)),
            start_date: ActiveValue::Set(args.start_date),
            end_date: ActiveValue::Set(args.end_date),
            status: ActiveValue::Set(args.status),
            creator_uuid: ActiveValue::Set(principal.user_uuid),
            area_uuid: ActiveValue::Set(args.area_uuid),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        let created = ProjectRepository::create(&txn, model).await?;
        txn.commit().await?;

        info!("📁 User {} created project '{}' ({})", principal.user_uuid, created.name, created.uuid);
        self.notify(Notice::success(SUCCESS_PROJECT_CREATED));
        Ok(created)
    }

    /// Edits a project's fields.
    ///
    /// Encargados may edit projects that hold a general task of their area.
    pub async fn edit_project(
        &self,
        principal: &Principal,
        project_uuid: Uuid,
        args: ProjectArgs,
    ) -> AppResult<project::Model> {
        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        let existing = ProjectRepository::get_by_id(&txn, &project_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("project", project_uuid))?;
        let footprint = load_footprint(&txn, &project_uuid).await?;
        authorize(principal, permissions::project(principal, Action::Edit, Some(&footprint)))?;
        args.validate()?;

        if let Some(area_uuid) = args.area_uuid {
            AreaRepository::get_by_id(&txn, &area_uuid)
                .await?
                .ok_or_else(|| AppError::not_found("area", area_uuid))?;
        }

        let mut model = existing.into_active_model();
        model.name = ActiveValue::Set(args.name.trim().to_string());
        model.description = ActiveValue::Set(normalize_description(args.description));
        model.start_date = ActiveValue::Set(args.start_date);
        model.end_date = ActiveValue::Set(args.end_date);
        model.status = ActiveValue::Set(args.status);
        model.area_uuid = ActiveValue::Set(args.area_uuid);
        model.updated_at = ActiveValue::Set(Utc::now());

        let updated = ProjectRepository::update(&txn, model).await?;
        txn.commit().await?;

        info!("📁 User {} updated project {}", principal.user_uuid, updated.uuid);
        self.notify(Notice::success(SUCCESS_PROJECT_UPDATED));
        Ok(updated)
    }

    /// Deletes a project with all of its general tasks and their subtasks.
    ///
    /// Children are removed explicitly inside the same transaction, so a
    /// failure at any step keeps the whole tree.
    pub async fn delete_project(&self, principal: &Principal, project_uuid: Uuid) -> AppResult<()> {
        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        let existing = ProjectRepository::get_by_id(&txn, &project_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("project", project_uuid))?;
        let footprint = load_footprint(&txn, &project_uuid).await?;
        authorize(principal, permissions::project(principal, Action::Delete, Some(&footprint)))?;

        let general_task_uuids = GeneralTaskRepository::uuids_for_project(&txn, &project_uuid).await?;
        let subtasks = SubtaskRepository::delete_for_general_tasks(&txn, &general_task_uuids).await?;
        let general_tasks = GeneralTaskRepository::delete_for_project(&txn, &project_uuid).await?;
        ProjectRepository::delete(&txn, existing).await?;
        txn.commit().await?;

        info!(
            "🗑️ User {} deleted project {} with {} general task(s) and {} subtask(s)",
            principal.user_uuid, project_uuid, general_tasks, subtasks
        );
        self.notify(Notice::success(SUCCESS_PROJECT_DELETED));
        Ok(())
    }

    /// A project with its general tasks, latest due date first.
    ///
    /// Apoyos only get the general tasks holding one of their subtasks.
    pub async fn project_details(&self, principal: &Principal, project_uuid: Uuid) -> AppResult<ProjectDetails> {
        let storage = self.storage.lock().await;
        let conn = &storage.conn;

        let project = ProjectRepository::get_by_id(conn, &project_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("project", project_uuid))?;
        let footprint = load_footprint(conn, &project_uuid).await?;
        authorize(principal, permissions::project(principal, Action::View, Some(&footprint)))?;

        let directory = load_directory(conn).await?;
        let bundles = load_bundles(conn, vec![project.clone()]).await?;
        let tree = bundles
            .first()
            .and_then(|bundle| hierarchy::scope_project(principal, bundle, &directory, datetime::today()))
            .ok_or_else(|| AppError::not_found("project", project_uuid))?;

        Ok(ProjectDetails { project, tree })
    }
}
