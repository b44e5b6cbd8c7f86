use log::info;
use sea_orm::{ActiveValue, IntoActiveModel, TransactionTrait};
use serde::Serialize;
use uuid::Uuid;

use super::{authorize, load_directory, TrackerService};
use crate::constants::{SUCCESS_GENERAL_TASK_CREATED, SUCCESS_GENERAL_TASK_DELETED, SUCCESS_GENERAL_TASK_UPDATED};
use crate::entities::{general_task, Role, TaskStatus};
use crate::error::{AppError, AppResult};
use crate::forms::{normalize_description, GeneralTaskArgs};
use crate::hierarchy::{self, GeneralTaskNode, TaskBundle};
use crate::notifications::Notice;
use crate::permissions::{self, Action, Principal};
use crate::repositories::{AreaRepository, GeneralTaskRepository, ProjectRepository, SubtaskRepository, UserRepository};
use crate::utils::datetime;

/// A general task with the subtasks the caller may see.
#[derive(Clone, Debug, Serialize)]
pub struct GeneralTaskDetails {
    pub general_task: general_task::Model,
    pub project_name: String,
    pub tree: GeneralTaskNode,
}

impl TrackerService {
    /// Creates a general task under a project, in `args.area_uuid`.
    ///
    /// New general tasks always start as `Pendiente` with no progress.
    pub async fn create_general_task(
        &self,
        principal: &Principal,
        project_uuid: Uuid,
        args: GeneralTaskArgs,
    ) -> AppResult<general_task::Model> {
        authorize(
            principal,
            permissions::general_task(principal, Action::Create, args.area_uuid, false),
        )?;
        args.validate()?;

        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        ProjectRepository::get_by_id(&txn, &project_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("project", project_uuid))?;
        AreaRepository::get_by_id(&txn, &args.area_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("area", args.area_uuid))?;

        let model = general_task::ActiveModel {
            uuid: ActiveValue::Set(Uuid::new_v4()),
            title: ActiveValue::Set(args.title.trim().to_string()),
            description: ActiveValue::Set(normalize_description(args.description)),
            due_date: ActiveValue::Set(args.due_date),
            priority: ActiveValue::Set(args.priority),
            status: ActiveValue::Set(TaskStatus::Pendiente),
            progress_percent: ActiveValue::Set(0.0),
            project_uuid: ActiveValue::Set(project_uuid),
            area_uuid: ActiveValue::Set(args.area_uuid),
            creator_uuid: ActiveValue::Set(principal.user_uuid),
        };
        let created = GeneralTaskRepository::create(&txn, model).await?;
        txn.commit().await?;

        info!(
            "📋 User {} created general task '{}' ({}) in project {}",
            principal.user_uuid, created.title, created.uuid, project_uuid
        );
        self.notify(Notice::success(SUCCESS_GENERAL_TASK_CREATED));
        Ok(created)
    }

    /// Edits a general task.
    ///
    /// Only supervisors may move a general task to another area, and never
    /// while one of its subtasks is assigned to someone outside the new area.
    pub async fn edit_general_task(
        &self,
        principal: &Principal,
        general_task_uuid: Uuid,
        args: GeneralTaskArgs,
    ) -> AppResult<general_task::Model> {
        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        let existing = GeneralTaskRepository::get_by_id(&txn, &general_task_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("general task", general_task_uuid))?;
        authorize(
            principal,
            permissions::general_task(principal, Action::Edit, existing.area_uuid, false),
        )?;

        let moving = args.area_uuid != existing.area_uuid;
        if moving && principal.role != Role::Supervisor {
            return Err(AppError::Unauthorized(format!(
                "{} may not move a general task to another area",
                principal.role
            )));
        }
        args.validate()?;

        if moving {
            AreaRepository::get_by_id(&txn, &args.area_uuid)
                .await?
                .ok_or_else(|| AppError::not_found("area", args.area_uuid))?;

            let allowed: Vec<Uuid> = UserRepository::get_apoyos_in_area(&txn, &args.area_uuid)
                .await?
                .iter()
                .map(|user| user.uuid)
                .collect();
            if SubtaskRepository::has_assignee_outside(&txn, &general_task_uuid, &allowed).await? {
                return Err(AppError::validation(
                    "area",
                    "❌ Reassign or unassign the subtasks of this general task before moving it to another area",
                ));
            }
        }

        let status = args.status.unwrap_or(existing.status);
        let mut model = existing.into_active_model();
        model.title = ActiveValue::Set(args.title.trim().to_string());
        model.description = ActiveValue::Set(normalize_description(args.description));
        model.due_date = ActiveValue::Set(args.due_date);
        model.priority = ActiveValue::Set(args.priority);
        model.status = ActiveValue::Set(status);
        model.area_uuid = ActiveValue::Set(args.area_uuid);

        let updated = GeneralTaskRepository::update(&txn, model).await?;
        txn.commit().await?;

        info!("📋 User {} updated general task {}", principal.user_uuid, updated.uuid);
        self.notify(Notice::success(SUCCESS_GENERAL_TASK_UPDATED));
        Ok(updated)
    }

    /// Deletes a general task and its subtasks.
    pub async fn delete_general_task(&self, principal: &Principal, general_task_uuid: Uuid) -> AppResult<()> {
        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        let existing = GeneralTaskRepository::get_by_id(&txn, &general_task_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("general task", general_task_uuid))?;
        authorize(
            principal,
            permissions::general_task(principal, Action::Delete, existing.area_uuid, false),
        )?;

        let subtasks = SubtaskRepository::delete_for_general_tasks(&txn, &[general_task_uuid]).await?;
        GeneralTaskRepository::delete(&txn, existing).await?;
        txn.commit().await?;

        info!(
            "🗑️ User {} deleted general task {} with {} subtask(s)",
            principal.user_uuid, general_task_uuid, subtasks
        );
        self.notify(Notice::success(SUCCESS_GENERAL_TASK_DELETED));
        Ok(())
    }

    /// A general task with its subtasks, earliest due date first.
    pub async fn general_task_details(
        &self,
        principal: &Principal,
        general_task_uuid: Uuid,
    ) -> AppResult<GeneralTaskDetails> {
        let storage = self.storage.lock().await;
        let conn = &storage.conn;

        let general_task = GeneralTaskRepository::get_by_id(conn, &general_task_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("general task", general_task_uuid))?;
        let holds_own_subtask = principal.role == Role::Apoyo
            && GeneralTaskRepository::has_subtask_assigned_to(conn, &general_task_uuid, &principal.user_uuid).await?;
        authorize(
            principal,
            permissions::general_task(principal, Action::View, general_task.area_uuid, holds_own_subtask),
        )?;

        let project = ProjectRepository::get_by_id(conn, &general_task.project_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("project", general_task.project_uuid))?;
        let subtasks = SubtaskRepository::get_for_general_task(conn, &general_task_uuid).await?;
        let directory = load_directory(conn).await?;

        let bundle = TaskBundle {
            general_task: general_task.clone(),
            subtasks,
        };
        let tree = hierarchy::scope_general_task(principal, &bundle, &project.name, &directory, datetime::today())
            .ok_or_else(|| AppError::not_found("general task", general_task_uuid))?;

        Ok(GeneralTaskDetails {
            general_task,
            project_name: project.name,
            tree,
        })
    }
}
