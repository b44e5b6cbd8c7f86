use chrono::NaiveDate;
use log::{debug, info};
use sea_orm::{ActiveValue, IntoActiveModel, TransactionTrait};
use serde::Serialize;
use uuid::Uuid;

use super::{load_bundles, load_directory, TrackerService};
use crate::constants::{with_count, WARNING_SUBTASKS_MARKED};
use crate::entities::{Role, TaskStatus};
use crate::error::AppResult;
use crate::hierarchy::{self, Dashboard};
use crate::notifications::Notice;
use crate::overdue::Dated;
use crate::permissions::Principal;
use crate::repositories::{ProjectRepository, SubtaskRepository};
use crate::utils::datetime;

/// Outcome of an overdue sweep.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub marked: usize,
    pub subtask_uuids: Vec<Uuid>,
}

impl TrackerService {
    /// The role-scoped dashboard for today.
    pub async fn dashboard(&self, principal: &Principal) -> AppResult<Dashboard> {
        self.dashboard_on(principal, datetime::today()).await
    }

    /// The role-scoped dashboard as of `today`.
    ///
    /// Supervisors load every project; encargados the projects holding a
    /// general task of their area; apoyos the projects holding one of their
    /// subtasks. General tasks and subtasks are eager-loaded, then pruned by
    /// [`hierarchy::build_dashboard`].
    pub async fn dashboard_on(&self, principal: &Principal, today: NaiveDate) -> AppResult<Dashboard> {
        let storage = self.storage.lock().await;
        let conn = &storage.conn;

        let projects = match principal.role {
            Role::Supervisor => ProjectRepository::get_all(conn).await?,
            Role::Encargado => match principal.area_uuid {
                Some(area_uuid) => ProjectRepository::get_for_area(conn, &area_uuid).await?,
                None => Vec::new(),
            },
            Role::Apoyo => ProjectRepository::get_for_assignee(conn, &principal.user_uuid).await?,
        };

        let bundles = load_bundles(conn, projects).await?;
        let directory = load_directory(conn).await?;
        let dashboard = hierarchy::build_dashboard(principal, bundles, &directory, today, self.overdue_warning);

        debug!(
            "Dashboard for {} ({}): {} project(s), {} overdue subtask(s)",
            principal.user_uuid,
            principal.role,
            dashboard.projects.len(),
            dashboard.overdue_subtasks.len()
        );
        for notice in &dashboard.notices {
            self.notify(notice.clone());
        }
        Ok(dashboard)
    }

    /// Mark every overdue, still open subtask as `Retrasado`.
    pub async fn sweep_overdue_subtasks(&self) -> AppResult<SweepReport> {
        self.sweep_overdue_subtasks_on(datetime::today()).await
    }

    /// Mark subtasks overdue as of `today` as `Retrasado`, in one transaction.
    ///
    /// Subtasks already marked are left alone, so running the sweep twice
    /// marks nothing the second time.
    pub async fn sweep_overdue_subtasks_on(&self, today: NaiveDate) -> AppResult<SweepReport> {
        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        let candidates = SubtaskRepository::get_sweep_candidates(&txn, today).await?;
        let mut report = SweepReport::default();
        for subtask in candidates {
            if !subtask.is_overdue_on(today) {
                continue;
            }
            let uuid = subtask.uuid;
            let mut model = subtask.into_active_model();
            model.status = ActiveValue::Set(TaskStatus::Retrasado);
            SubtaskRepository::update(&txn, model).await?;
            report.subtask_uuids.push(uuid);
        }
        report.marked = report.subtask_uuids.len();
        txn.commit().await?;

        info!("⏰ Overdue sweep marked {} subtask(s) as Retrasado", report.marked);
        if report.marked > 0 {
            self.notify(Notice::danger(with_count(WARNING_SUBTASKS_MARKED, report.marked)));
        }
        Ok(report)
    }
}
