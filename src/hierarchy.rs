//! Nested project → general task → subtask views, scoped per role.
//!
//! Loading happens in the service layer; this module only shapes already
//! loaded rows, so every rule here is a pure function of its inputs.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::constants::{with_count, UNASSIGNED_LABEL, WARNING_SUBTASKS_OVERDUE};
use crate::entities::{area, general_task, project, subtask, user, Priority, ProjectStatus, Role, TaskStatus};
use crate::notifications::Notice;
use crate::overdue::{Dated, OverdueState};
use crate::permissions::Principal;
use crate::utils::datetime::{cmp_due_asc, cmp_due_desc};

/// A general task with every one of its subtasks.
#[derive(Clone, Debug)]
pub struct TaskBundle {
    pub general_task: general_task::Model,
    pub subtasks: Vec<subtask::Model>,
}

/// A project with its loaded general tasks.
#[derive(Clone, Debug)]
pub struct ProjectBundle {
    pub project: project::Model,
    pub general_tasks: Vec<TaskBundle>,
}

/// Lookup tables for names shown next to tasks.
#[derive(Clone, Debug, Default)]
pub struct Directory {
    areas: HashMap<Uuid, area::Model>,
    users: HashMap<Uuid, user::Model>,
}

impl Directory {
    pub fn new(areas: Vec<area::Model>, users: Vec<user::Model>) -> Self {
        Self {
            areas: areas.into_iter().map(|a| (a.uuid, a)).collect(),
            users: users.into_iter().map(|u| (u.uuid, u)).collect(),
        }
    }

    pub fn area_summary(&self, area_uuid: Uuid) -> Option<AreaSummary> {
        let area = self.areas.get(&area_uuid)?;
        let mut apoyos: Vec<UserSummary> = self
            .users
            .values()
            .filter(|u| u.role == Role::Apoyo && u.area_uuid == Some(area_uuid))
            .map(UserSummary::from)
            .collect();
        apoyos.sort_by(|a, b| a.username.cmp(&b.username));

        Some(AreaSummary {
            uuid: area.uuid,
            name: area.name.clone(),
            apoyos,
        })
    }

    pub fn username(&self, user_uuid: Uuid) -> Option<&str> {
        self.users.get(&user_uuid).map(|u| u.username.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub uuid: Uuid,
    pub username: String,
}

impl From<&user::Model> for UserSummary {
    fn from(user: &user::Model) -> Self {
        Self {
            uuid: user.uuid,
            username: user.username.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AreaSummary {
    pub uuid: Uuid,
    pub name: String,
    /// Support staff of the area, by username.
    pub apoyos: Vec<UserSummary>,
}

/// Flat, typed view of a subtask fed straight to the overdue evaluator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubtaskSummary {
    pub uuid: Uuid,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub project_name: String,
    pub assignee_uuid: Option<Uuid>,
    pub assignee_name: String,
    pub overdue: OverdueState,
}

impl SubtaskSummary {
    pub fn new(subtask: &subtask::Model, project_name: &str, directory: &Directory, today: NaiveDate) -> Self {
        let assignee_name = subtask
            .assigned_user_uuid
            .and_then(|uuid| directory.username(uuid))
            .unwrap_or(UNASSIGNED_LABEL)
            .to_string();

        Self {
            uuid: subtask.uuid,
            title: subtask.title.clone(),
            due_date: subtask.due_date,
            status: subtask.status,
            priority: subtask.priority,
            project_name: project_name.to_string(),
            assignee_uuid: subtask.assigned_user_uuid,
            assignee_name,
            overdue: subtask.overdue_state(today),
        }
    }
}

impl Dated for SubtaskSummary {
    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn status_label(&self) -> &str {
        self.status.label()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneralTaskNode {
    pub uuid: Uuid,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub progress_percent: f64,
    pub overdue: OverdueState,
    pub area: Option<AreaSummary>,
    pub subtasks: Vec<SubtaskSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectNode {
    pub uuid: Uuid,
    pub name: String,
    pub status: ProjectStatus,
    pub end_date: Option<NaiveDate>,
    pub overdue: OverdueState,
    pub general_tasks: Vec<GeneralTaskNode>,
}

/// Payload handed to the presentation layer for the dashboard.
#[derive(Clone, Debug, Serialize)]
pub struct Dashboard {
    pub role: Role,
    /// Nested sidebar tree.
    pub projects: Vec<ProjectNode>,
    /// Flat project list for the main table.
    pub main_projects: Vec<project::Model>,
    pub overdue_subtasks: Vec<SubtaskSummary>,
    pub active_projects: usize,
    pub pending_general_tasks: usize,
    pub notices: Vec<Notice>,
}

/// Share of finished subtasks as a percentage; 0 when there are none.
pub fn progress_percent(subtasks: &[subtask::Model]) -> f64 {
    progress_from_statuses(subtasks.iter().map(|s| s.status))
}

pub fn progress_from_statuses<I>(statuses: I) -> f64
where
    I: IntoIterator<Item = TaskStatus>,
{
    let (total, finished) = statuses.into_iter().fold((0usize, 0usize), |(total, finished), status| {
        (total + 1, finished + usize::from(status == TaskStatus::Finalizado))
    });

    if total == 0 {
        0.0
    } else {
        finished as f64 / total as f64 * 100.0
    }
}

/// Sort projects by end date, latest first, undated last.
pub fn sort_projects(projects: &mut [project::Model]) {
    projects.sort_by(|a, b| cmp_due_desc(a.end_date, b.end_date));
}

/// Sort subtasks by due date, earliest first, undated last.
pub fn sort_subtasks(subtasks: &mut [subtask::Model]) {
    subtasks.sort_by(|a, b| cmp_due_asc(a.due_date, b.due_date));
}

fn general_task_node(
    bundle: &TaskBundle,
    visible: Vec<&subtask::Model>,
    project_name: &str,
    directory: &Directory,
    today: NaiveDate,
) -> GeneralTaskNode {
    let mut visible: Vec<subtask::Model> = visible.into_iter().cloned().collect();
    sort_subtasks(&mut visible);

    let task = &bundle.general_task;
    GeneralTaskNode {
        uuid: task.uuid,
        title: task.title.clone(),
        due_date: task.due_date,
        priority: task.priority,
        status: task.status,
        progress_percent: progress_percent(&bundle.subtasks),
        overdue: task.overdue_state(today),
        area: directory.area_summary(task.area_uuid),
        subtasks: visible
            .iter()
            .map(|s| SubtaskSummary::new(s, project_name, directory, today))
            .collect(),
    }
}

/// Keep what `principal` may see of one general task, or `None` when it is hidden.
pub fn scope_general_task(
    principal: &Principal,
    bundle: &TaskBundle,
    project_name: &str,
    directory: &Directory,
    today: NaiveDate,
) -> Option<GeneralTaskNode> {
    let visible: Vec<&subtask::Model> = match principal.role {
        Role::Supervisor => bundle.subtasks.iter().collect(),
        Role::Encargado => {
            if !principal.in_area(bundle.general_task.area_uuid) {
                return None;
            }
            bundle.subtasks.iter().collect()
        }
        Role::Apoyo => {
            let own: Vec<&subtask::Model> = bundle
                .subtasks
                .iter()
                .filter(|s| s.assigned_user_uuid == Some(principal.user_uuid))
                .collect();
            if own.is_empty() {
                return None;
            }
            own
        }
    };

    Some(general_task_node(bundle, visible, project_name, directory, today))
}

/// Keep what `principal` may see of one project, or `None` when nothing is left.
pub fn scope_project(
    principal: &Principal,
    bundle: &ProjectBundle,
    directory: &Directory,
    today: NaiveDate,
) -> Option<ProjectNode> {
    let project = &bundle.project;
    let general_tasks: Vec<GeneralTaskNode> = bundle
        .general_tasks
        .iter()
        .filter_map(|task_bundle| scope_general_task(principal, task_bundle, &project.name, directory, today))
        .collect();

    if general_tasks.is_empty() && !principal.is_supervisor() {
        return None;
    }

    Some(ProjectNode {
        uuid: project.uuid,
        name: project.name.clone(),
        status: project.status,
        end_date: project.end_date,
        overdue: project.overdue_state(today),
        general_tasks,
    })
}

/// Build the role-scoped dashboard from loaded project bundles.
pub fn build_dashboard(
    principal: &Principal,
    mut bundles: Vec<ProjectBundle>,
    directory: &Directory,
    today: NaiveDate,
    warn_overdue: bool,
) -> Dashboard {
    bundles.sort_by(|a, b| cmp_due_desc(a.project.end_date, b.project.end_date));

    let mut projects = Vec::new();
    let mut main_projects = Vec::new();
    for bundle in &bundles {
        if let Some(node) = scope_project(principal, bundle, directory, today) {
            projects.push(node);
            main_projects.push(bundle.project.clone());
        }
    }

    let overdue_subtasks: Vec<SubtaskSummary> = projects
        .iter()
        .flat_map(|p| p.general_tasks.iter())
        .flat_map(|t| t.subtasks.iter())
        .filter(|s| s.overdue.is_overdue())
        .cloned()
        .collect();

    let active_projects = main_projects
        .iter()
        .filter(|p| p.status == ProjectStatus::EnEjecucion)
        .count();
    let pending_general_tasks = projects
        .iter()
        .flat_map(|p| p.general_tasks.iter())
        .filter(|t| t.status == TaskStatus::Pendiente)
        .count();

    let mut notices = Vec::new();
    if warn_overdue && !overdue_subtasks.is_empty() {
        notices.push(Notice::danger(with_count(WARNING_SUBTASKS_OVERDUE, overdue_subtasks.len())));
    }

    Dashboard {
        role: principal.role,
        projects,
        main_projects,
        overdue_subtasks,
        active_projects,
        pending_general_tasks,
        notices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn make_project(name: &str, end_date: Option<NaiveDate>) -> project::Model {
        project::Model {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            start_date: None,
            end_date,
            status: ProjectStatus::EnEjecucion,
            creator_uuid: Uuid::new_v4(),
            area_uuid: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn make_task(project: &project::Model, area_uuid: Uuid) -> general_task::Model {
        general_task::Model {
            uuid: Uuid::new_v4(),
            title: "Survey".to_string(),
            description: None,
            due_date: None,
            priority: Priority::Media,
            status: TaskStatus::Pendiente,
            progress_percent: 0.0,
            project_uuid: project.uuid,
            area_uuid,
            creator_uuid: Uuid::new_v4(),
        }
    }

    fn make_subtask(task: &general_task::Model, assignee: Option<Uuid>, due: Option<NaiveDate>, status: TaskStatus) -> subtask::Model {
        subtask::Model {
            uuid: Uuid::new_v4(),
            title: "Step".to_string(),
            description: None,
            status,
            priority: Priority::Media,
            due_date: due,
            general_task_uuid: task.uuid,
            assigned_user_uuid: assignee,
            creator_uuid: Uuid::new_v4(),
        }
    }

    #[test]
    fn progress_counts_finished_share() {
        let project = make_project("P", None);
        let task = make_task(&project, Uuid::new_v4());
        let mut subtasks: Vec<subtask::Model> = (0..3)
            .map(|_| make_subtask(&task, None, None, TaskStatus::Pendiente))
            .collect();
        subtasks.push(make_subtask(&task, None, None, TaskStatus::Finalizado));

        assert_eq!(progress_percent(&subtasks), 25.0);
        assert_eq!(progress_percent(&[]), 0.0);
    }

    #[test]
    fn subtasks_sort_by_due_date_with_undated_last() {
        let project = make_project("P", None);
        let task = make_task(&project, Uuid::new_v4());
        let mut subtasks = vec![
            make_subtask(&task, None, None, TaskStatus::Pendiente),
            make_subtask(&task, None, Some(today() + Duration::days(5)), TaskStatus::Pendiente),
            make_subtask(&task, None, Some(today()), TaskStatus::Pendiente),
        ];
        sort_subtasks(&mut subtasks);

        assert_eq!(subtasks[0].due_date, Some(today()));
        assert_eq!(subtasks[1].due_date, Some(today() + Duration::days(5)));
        assert_eq!(subtasks[2].due_date, None);
    }

    #[test]
    fn apoyo_branches_are_pruned_to_own_subtasks() {
        let area = Uuid::new_v4();
        let apoyo = Principal::new(Uuid::new_v4(), Role::Apoyo, Some(area));
        let project = make_project("Bridge", None);
        let mine = make_task(&project, area);
        let theirs = make_task(&project, area);

        let bundle = ProjectBundle {
            project: project.clone(),
            general_tasks: vec![
                TaskBundle {
                    subtasks: vec![
                        make_subtask(&mine, Some(apoyo.user_uuid), None, TaskStatus::Pendiente),
                        make_subtask(&mine, Some(Uuid::new_v4()), None, TaskStatus::Finalizado),
                    ],
                    general_task: mine.clone(),
                },
                TaskBundle {
                    subtasks: vec![make_subtask(&theirs, Some(Uuid::new_v4()), None, TaskStatus::Pendiente)],
                    general_task: theirs,
                },
            ],
        };

        let node = scope_project(&apoyo, &bundle, &Directory::default(), today()).unwrap();
        assert_eq!(node.general_tasks.len(), 1);
        assert_eq!(node.general_tasks[0].uuid, mine.uuid);
        assert_eq!(node.general_tasks[0].subtasks.len(), 1);
        assert_eq!(node.general_tasks[0].subtasks[0].assignee_uuid, Some(apoyo.user_uuid));
        // progress still reflects the whole general task
        assert_eq!(node.general_tasks[0].progress_percent, 50.0);
    }

    #[test]
    fn empty_projects_are_visible_to_supervisor_only() {
        let area = Uuid::new_v4();
        let bundle = ProjectBundle {
            project: make_project("Empty", None),
            general_tasks: vec![],
        };
        let supervisor = Principal::new(Uuid::new_v4(), Role::Supervisor, None);
        let encargado = Principal::new(Uuid::new_v4(), Role::Encargado, Some(area));

        assert!(scope_project(&supervisor, &bundle, &Directory::default(), today()).is_some());
        assert!(scope_project(&encargado, &bundle, &Directory::default(), today()).is_none());
    }

    #[test]
    fn dashboard_orders_projects_and_counts_overdue() {
        let area = Uuid::new_v4();
        let supervisor = Principal::new(Uuid::new_v4(), Role::Supervisor, None);
        let early = make_project("Early", Some(today()));
        let late = make_project("Late", Some(today() + Duration::days(30)));
        let undated = make_project("Undated", None);
        let task = make_task(&early, area);
        let yesterday = today() - Duration::days(1);

        let bundles = vec![
            ProjectBundle {
                project: undated,
                general_tasks: vec![],
            },
            ProjectBundle {
                project: early,
                general_tasks: vec![TaskBundle {
                    subtasks: vec![
                        make_subtask(&task, None, Some(yesterday), TaskStatus::Pendiente),
                        make_subtask(&task, None, Some(yesterday), TaskStatus::Retrasado),
                        make_subtask(&task, None, Some(yesterday), TaskStatus::Finalizado),
                    ],
                    general_task: task,
                }],
            },
            ProjectBundle {
                project: late,
                general_tasks: vec![],
            },
        ];

        let dashboard = build_dashboard(&supervisor, bundles, &Directory::default(), today(), true);
        let names: Vec<&str> = dashboard.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Late", "Early", "Undated"]);
        assert_eq!(dashboard.overdue_subtasks.len(), 2);
        assert_eq!(dashboard.active_projects, 3);
        assert_eq!(dashboard.pending_general_tasks, 1);
        assert_eq!(dashboard.notices.len(), 1);
        assert!(dashboard.notices[0].message.contains("2 subtask(s) overdue"));
        assert_eq!(dashboard.projects[1].general_tasks[0].subtasks[0].assignee_name, UNASSIGNED_LABEL);
    }

    #[test]
    fn overdue_warning_can_be_disabled() {
        let supervisor = Principal::new(Uuid::new_v4(), Role::Supervisor, None);
        let project = make_project("P", None);
        let task = make_task(&project, Uuid::new_v4());
        let bundles = vec![ProjectBundle {
            project,
            general_tasks: vec![TaskBundle {
                subtasks: vec![make_subtask(&task, None, Some(today() - Duration::days(2)), TaskStatus::Pendiente)],
                general_task: task,
            }],
        }];

        let dashboard = build_dashboard(&supervisor, bundles, &Directory::default(), today(), false);
        assert_eq!(dashboard.overdue_subtasks.len(), 1);
        assert!(dashboard.notices.is_empty());
    }
}
