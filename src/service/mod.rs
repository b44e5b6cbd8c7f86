//! Gated operations over the tracker's domain model.
//!
//! This module provides the [`TrackerService`] struct, the only way the rest of
//! the application reads or changes areas, users, projects, general tasks and
//! subtasks. Every operation:
//! - checks the caller's [`Principal`] against [`crate::permissions`] first
//! - validates its input before touching storage
//! - runs mutations inside one transaction, so a failure leaves nothing behind
//! - reports outcomes through the shared [`Notifications`] queue

pub mod dashboard;
pub mod general_tasks;
pub mod people;
pub mod projects;
pub mod subtasks;

use log::warn;
use sea_orm::{ConnectionTrait, DbErr};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::entities::{general_task, project, subtask};
use crate::error::{AppError, AppResult, Fallback};
use crate::hierarchy::{Directory, ProjectBundle, TaskBundle};
use crate::notifications::{Notice, Notifications};
use crate::permissions::{Decision, Principal, ProjectFootprint};
use crate::repositories::{AreaRepository, GeneralTaskRepository, SubtaskRepository, UserRepository};
use crate::storage::LocalStorage;

pub use dashboard::SweepReport;
pub use general_tasks::GeneralTaskDetails;
pub use people::{AreaDetails, UserProfile};
pub use projects::ProjectDetails;

/// Service exposing every role-gated operation of the tracker.
///
/// The service owns no data itself: it shares the [`LocalStorage`] handle and
/// the [`Notifications`] queue with the rest of the application context.
///
/// # Example
/// ```rust,no_run
/// use areatrack::notifications::Notifications;
/// use areatrack::service::TrackerService;
/// use areatrack::storage::LocalStorage;
/// use std::sync::Arc;
/// use tokio::sync::Mutex;
///
/// # async fn example() -> anyhow::Result<()> {
/// let storage = Arc::new(Mutex::new(LocalStorage::in_memory().await?));
/// let service = TrackerService::new(storage, Notifications::new(), true);
///
/// let report = service.sweep_overdue_subtasks().await?;
/// println!("{} subtask(s) marked late", report.marked);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TrackerService {
    storage: Arc<Mutex<LocalStorage>>,
    notifications: Notifications,
    overdue_warning: bool,
}

impl TrackerService {
    /// Creates a new service over shared storage.
    ///
    /// # Arguments
    /// * `storage` - Shared local storage
    /// * `notifications` - Queue receiving user-facing notices
    /// * `overdue_warning` - Whether dashboards emit the overdue notice
    pub fn new(storage: Arc<Mutex<LocalStorage>>, notifications: Notifications, overdue_warning: bool) -> Self {
        Self {
            storage,
            notifications,
            overdue_warning,
        }
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn storage(&self) -> Arc<Mutex<LocalStorage>> {
        self.storage.clone()
    }

    fn notify(&self, notice: Notice) {
        self.notifications.push(notice);
    }

    /// Queue the user-facing notice for a failed operation and return where
    /// the caller should send the user.
    pub fn report(&self, err: &AppError) -> Fallback {
        self.notify(err.notice());
        err.fallback()
    }

    /// Resolve the principal of a user by UUID.
    pub async fn principal(&self, user_uuid: Uuid) -> AppResult<Principal> {
        let storage = self.storage.lock().await;
        let user = UserRepository::get_by_id(&storage.conn, &user_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("user", user_uuid))?;
        Ok(Principal::from_user(&user))
    }

    /// Resolve the principal of a user by username or email.
    pub async fn principal_by_login(&self, login: &str) -> AppResult<Option<Principal>> {
        let storage = self.storage.lock().await;
        let user = UserRepository::get_by_login(&storage.conn, login.trim()).await?;
        Ok(user.as_ref().map(Principal::from_user))
    }
}

/// Turn a denied decision into an error, logging the attempt.
fn authorize(principal: &Principal, decision: Decision) -> AppResult<()> {
    decision.map_err(|denied| {
        warn!("🚫 User {} denied: {}", principal.user_uuid, denied);
        AppError::from(denied)
    })
}

/// Areas and users keyed for name lookups.
async fn load_directory<C>(conn: &C) -> Result<Directory, DbErr>
where
    C: ConnectionTrait,
{
    let areas = AreaRepository::get_all(conn).await?;
    let users = UserRepository::get_all(conn).await?;
    Ok(Directory::new(areas, users))
}

/// Which areas and assignees a project reaches.
async fn load_footprint<C>(conn: &C, project_uuid: &Uuid) -> Result<ProjectFootprint, DbErr>
where
    C: ConnectionTrait,
{
    let general_tasks = GeneralTaskRepository::get_for_project(conn, project_uuid).await?;
    let subtasks = SubtaskRepository::load_for_general_tasks(conn, &general_tasks).await?;
    Ok(ProjectFootprint::from_tasks(
        general_tasks.iter().zip(subtasks.iter().map(Vec::as_slice)),
    ))
}

/// Eager-load general tasks and subtasks under `projects`: two queries in total.
async fn load_bundles<C>(conn: &C, projects: Vec<project::Model>) -> Result<Vec<ProjectBundle>, DbErr>
where
    C: ConnectionTrait,
{
    let general_tasks = GeneralTaskRepository::load_for_projects(conn, &projects).await?;
    let flat: Vec<general_task::Model> = general_tasks.iter().flatten().cloned().collect();
    let subtasks = SubtaskRepository::load_for_general_tasks(conn, &flat).await?;

    let mut subtasks_by_task: HashMap<Uuid, Vec<subtask::Model>> =
        flat.iter().map(|task| task.uuid).zip(subtasks).collect();

    Ok(projects
        .into_iter()
        .zip(general_tasks)
        .map(|(project, tasks)| ProjectBundle {
            project,
            general_tasks: tasks
                .into_iter()
                .map(|general_task| TaskBundle {
                    subtasks: subtasks_by_task.remove(&general_task.uuid).unwrap_or_default(),
                    general_task,
                })
                .collect(),
        })
        .collect())
}

/// Recompute and store the cached progress of a general task.
async fn refresh_progress<C>(conn: &C, general_task_uuid: &Uuid) -> Result<f64, DbErr>
where
    C: ConnectionTrait,
{
    let subtasks = SubtaskRepository::get_for_general_task(conn, general_task_uuid).await?;
    let progress = crate::hierarchy::progress_percent(&subtasks);
    GeneralTaskRepository::set_progress(conn, general_task_uuid, progress).await?;
    Ok(progress)
}
