//! Authorization decisions for every entity and action.
//!
//! Encargados are scoped to their area and apoyos to their own assignments.
//! Every read and write path in the service layer goes through one of the
//! functions below; a denial is an explicit [`AccessDenied`], never an empty
//! result.

use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

use crate::entities::{general_task, subtask, user, Role};
use crate::error::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Authenticated identity of the caller, supplied by the session layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_uuid: Uuid,
    pub role: Role,
    pub area_uuid: Option<Uuid>,
}

impl Principal {
    pub fn new(user_uuid: Uuid, role: Role, area_uuid: Option<Uuid>) -> Self {
        Self {
            user_uuid,
            role,
            area_uuid,
        }
    }

    pub fn from_user(user: &user::Model) -> Self {
        Self::new(user.uuid, user.role, user.area_uuid)
    }

    /// Whether the principal belongs to `area_uuid`.
    pub fn in_area(&self, area_uuid: Uuid) -> bool {
        self.area_uuid == Some(area_uuid)
    }

    pub fn is_supervisor(&self) -> bool {
        self.role == Role::Supervisor
    }
}

/// Which areas and assignees a project reaches through its general tasks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectFootprint {
    pub area_uuids: HashSet<Uuid>,
    pub assignee_uuids: HashSet<Uuid>,
}

impl ProjectFootprint {
    pub fn from_tasks<'a, I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = (&'a general_task::Model, &'a [subtask::Model])>,
    {
        let mut footprint = Self::default();
        for (general_task, subtasks) in tasks {
            footprint.area_uuids.insert(general_task.area_uuid);
            footprint
                .assignee_uuids
                .extend(subtasks.iter().filter_map(|s| s.assigned_user_uuid));
        }
        footprint
    }
}

/// A failed authorization check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{role} may not {action} this {entity}")]
pub struct AccessDenied {
    pub role: Role,
    pub action: Action,
    pub entity: &'static str,
}

impl From<AccessDenied> for AppError {
    fn from(denied: AccessDenied) -> Self {
        AppError::Unauthorized(denied.to_string())
    }
}

pub type Decision = Result<(), AccessDenied>;

fn decide(allowed: bool, principal: &Principal, action: Action, entity: &'static str) -> Decision {
    if allowed {
        Ok(())
    } else {
        Err(AccessDenied {
            role: principal.role,
            action,
            entity,
        })
    }
}

/// Projects: encargados reach them through general tasks of their area,
/// apoyos through subtasks assigned to them. `footprint` is `None` on create.
pub fn project(principal: &Principal, action: Action, footprint: Option<&ProjectFootprint>) -> Decision {
    let allowed = match (principal.role, action) {
        (Role::Supervisor, _) => true,
        (Role::Encargado, Action::View | Action::Edit) => footprint.is_some_and(|f| {
            principal
                .area_uuid
                .is_some_and(|area| f.area_uuids.contains(&area))
        }),
        (Role::Apoyo, Action::View) => footprint.is_some_and(|f| f.assignee_uuids.contains(&principal.user_uuid)),
        _ => false,
    };
    decide(allowed, principal, action, "project")
}

/// General tasks. For `Create`, `area_uuid` is the area the new task is for.
/// `holds_own_subtask` tells whether one of its subtasks is assigned to the principal.
pub fn general_task(principal: &Principal, action: Action, area_uuid: Uuid, holds_own_subtask: bool) -> Decision {
    let allowed = match (principal.role, action) {
        (Role::Supervisor, _) => true,
        (Role::Encargado, Action::Create) => true,
        (Role::Encargado, _) => principal.in_area(area_uuid),
        (Role::Apoyo, Action::View) => holds_own_subtask,
        _ => false,
    };
    decide(allowed, principal, action, "general task")
}

/// Subtasks, scoped by the area of the parent general task.
pub fn subtask(principal: &Principal, action: Action, area_uuid: Uuid, assigned_user_uuid: Option<Uuid>) -> Decision {
    let allowed = match (principal.role, action) {
        (Role::Supervisor, _) => true,
        (Role::Encargado, _) => principal.in_area(area_uuid),
        (Role::Apoyo, Action::View | Action::Edit) => assigned_user_uuid == Some(principal.user_uuid),
        _ => false,
    };
    decide(allowed, principal, action, "subtask")
}

/// Area details: everybody may view their own area, only supervisors manage areas.
pub fn area(principal: &Principal, action: Action, area_uuid: Uuid) -> Decision {
    let allowed = match (principal.role, action) {
        (Role::Supervisor, _) => true,
        (_, Action::View) => principal.in_area(area_uuid),
        _ => false,
    };
    decide(allowed, principal, action, "area")
}

/// User profiles: encargados see their area, apoyos only themselves.
pub fn user_profile(principal: &Principal, action: Action, target_uuid: Uuid, target_area_uuid: Option<Uuid>) -> Decision {
    let allowed = match (principal.role, action) {
        (Role::Supervisor, _) => true,
        (Role::Encargado, Action::View) => target_area_uuid.is_some_and(|area| principal.in_area(area)),
        (Role::Apoyo, Action::View) => target_uuid == principal.user_uuid,
        _ => false,
    };
    decide(allowed, principal, action, "user profile")
}
