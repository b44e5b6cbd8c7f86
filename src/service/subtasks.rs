use log::info;
use sea_orm::{ActiveValue, ConnectionTrait, IntoActiveModel, TransactionTrait};
use uuid::Uuid;

use super::{authorize, refresh_progress, TrackerService};
use crate::constants::{
    ERROR_INVALID_ASSIGNEE, SUCCESS_SUBTASK_CREATED, SUCCESS_SUBTASK_DELETED, SUCCESS_SUBTASK_UPDATED,
};
use crate::entities::{general_task, subtask, user, Role, TaskStatus};
use crate::error::{AppError, AppResult};
use crate::forms::{normalize_description, SubtaskArgs};
use crate::notifications::Notice;
use crate::permissions::{self, Action, Principal};
use crate::repositories::{GeneralTaskRepository, SubtaskRepository, UserRepository};

/// An assignee must be support staff of the general task's area.
async fn check_assignee<C>(conn: &C, general_task: &general_task::Model, assignee: Option<Uuid>) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let Some(user_uuid) = assignee else {
        return Ok(());
    };

    let valid = UserRepository::get_by_id(conn, &user_uuid)
        .await?
        .is_some_and(|user| user.role == Role::Apoyo && user.area_uuid == Some(general_task.area_uuid));
    if !valid {
        return Err(AppError::validation("assigned_user", ERROR_INVALID_ASSIGNEE));
    }
    Ok(())
}

impl TrackerService {
    /// Creates a subtask under a general task.
    ///
    /// The subtask starts as `Pendiente`; the parent's cached progress is
    /// refreshed in the same transaction.
    pub async fn create_subtask(
        &self,
        principal: &Principal,
        general_task_uuid: Uuid,
        args: SubtaskArgs,
    ) -> AppResult<subtask::Model> {
        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        let parent = GeneralTaskRepository::get_by_id(&txn, &general_task_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("general task", general_task_uuid))?;
        authorize(
            principal,
            permissions::subtask(principal, Action::Create, parent.area_uuid, None),
        )?;
        args.validate()?;
        check_assignee(&txn, &parent, args.assigned_user_uuid).await?;

        let model = subtask::ActiveModel {
            uuid: ActiveValue::Set(Uuid::new_v4()),
            title: ActiveValue::Set(args.title.trim().to_string()),
            description: ActiveValue::Set(normalize_description(args.description)),
            status: ActiveValue::Set(TaskStatus::Pendiente),
            priority: ActiveValue::Set(args.priority),
            due_date: ActiveValue::Set(args.due_date),
            general_task_uuid: ActiveValue::Set(general_task_uuid),
            assigned_user_uuid: ActiveValue::Set(args.assigned_user_uuid),
            creator_uuid: ActiveValue::Set(principal.user_uuid),
        };
        let created = SubtaskRepository::create(&txn, model).await?;
        let progress = refresh_progress(&txn, &general_task_uuid).await?;
        txn.commit().await?;

        info!(
            "📌 User {} created subtask '{}' ({}) under {}; progress now {:.1}%",
            principal.user_uuid, created.title, created.uuid, general_task_uuid, progress
        );
        self.notify(Notice::success(SUCCESS_SUBTASK_CREATED));
        Ok(created)
    }

    /// Edits a subtask.
    ///
    /// Apoyos may edit their own subtasks but not hand them to someone else.
    pub async fn edit_subtask(
        &self,
        principal: &Principal,
        subtask_uuid: Uuid,
        args: SubtaskArgs,
    ) -> AppResult<subtask::Model> {
        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        let existing = SubtaskRepository::get_by_id(&txn, &subtask_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("subtask", subtask_uuid))?;
        let parent = GeneralTaskRepository::get_by_id(&txn, &existing.general_task_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("general task", existing.general_task_uuid))?;
        authorize(
            principal,
            permissions::subtask(principal, Action::Edit, parent.area_uuid, existing.assigned_user_uuid),
        )?;

        if principal.role == Role::Apoyo && args.assigned_user_uuid != existing.assigned_user_uuid {
            return Err(AppError::Unauthorized(format!("{} may not reassign a subtask", principal.role)));
        }
        args.validate()?;
        check_assignee(&txn, &parent, args.assigned_user_uuid).await?;

        let status = args.status.unwrap_or(existing.status);
        let mut model = existing.into_active_model();
        model.title = ActiveValue::Set(args.title.trim().to_string());
        model.description = ActiveValue::Set(normalize_description(args.description));
        model.due_date = ActiveValue::Set(args.due_date);
        model.priority = ActiveValue::Set(args.priority);
        model.status = ActiveValue::Set(status);
        model.assigned_user_uuid = ActiveValue::Set(args.assigned_user_uuid);

        let updated = SubtaskRepository::update(&txn, model).await?;
        let progress = refresh_progress(&txn, &parent.uuid).await?;
        txn.commit().await?;

        info!(
            "📌 User {} updated subtask {}; progress of {} now {:.1}%",
            principal.user_uuid, updated.uuid, parent.uuid, progress
        );
        self.notify(Notice::success(SUCCESS_SUBTASK_UPDATED));
        Ok(updated)
    }

    /// Deletes a subtask and refreshes its parent's progress.
    pub async fn delete_subtask(&self, principal: &Principal, subtask_uuid: Uuid) -> AppResult<()> {
        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        let existing = SubtaskRepository::get_by_id(&txn, &subtask_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("subtask", subtask_uuid))?;
        let parent = GeneralTaskRepository::get_by_id(&txn, &existing.general_task_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("general task", existing.general_task_uuid))?;
        authorize(
            principal,
            permissions::subtask(principal, Action::Delete, parent.area_uuid, existing.assigned_user_uuid),
        )?;

        SubtaskRepository::delete(&txn, existing).await?;
        refresh_progress(&txn, &parent.uuid).await?;
        txn.commit().await?;

        info!("🗑️ User {} deleted subtask {}", principal.user_uuid, subtask_uuid);
        self.notify(Notice::success(SUCCESS_SUBTASK_DELETED));
        Ok(())
    }

    /// Users a subtask of `general_task_uuid` may be assigned to.
    ///
    /// Support staff of the general task's area by username; an apoyo only
    /// ever gets themself.
    pub async fn assignable_users(
        &self,
        principal: &Principal,
        general_task_uuid: Uuid,
    ) -> AppResult<Vec<user::Model>> {
        let storage = self.storage.lock().await;
        let conn = &storage.conn;

        let parent = GeneralTaskRepository::get_by_id(conn, &general_task_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("general task", general_task_uuid))?;
        let holds_own_subtask = principal.role == Role::Apoyo
            && GeneralTaskRepository::has_subtask_assigned_to(conn, &general_task_uuid, &principal.user_uuid).await?;
        authorize(
            principal,
            permissions::general_task(principal, Action::View, parent.area_uuid, holds_own_subtask),
        )?;

        if principal.role == Role::Apoyo {
            let me = UserRepository::get_by_id(conn, &principal.user_uuid)
                .await?
                .ok_or_else(|| AppError::not_found("user", principal.user_uuid))?;
            return Ok(vec![me]);
        }

        Ok(UserRepository::get_apoyos_in_area(conn, &parent.area_uuid).await?)
    }
}
