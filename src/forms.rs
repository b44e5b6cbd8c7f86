//! Input arguments for the gated operations and their field validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    AREA_CODE_MAX_LEN, AREA_CODE_MIN_LEN, DESCRIPTION_MAX_LEN, ERROR_STATUS_RESERVED, GENERAL_TASK_TITLE_MAX_LEN,
    GENERAL_TASK_TITLE_MIN_LEN, PROJECT_NAME_MAX_LEN, PROJECT_NAME_MIN_LEN, SUBTASK_TITLE_MAX_LEN, SUBTASK_TITLE_MIN_LEN,
    USERNAME_MAX_LEN, USERNAME_MIN_LEN,
};
use crate::entities::{Priority, ProjectStatus, Role, TaskStatus};
use crate::error::{AppError, AppResult};

/// Arguments for creating or editing a project.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProjectArgs {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub area_uuid: Option<Uuid>,
}

/// Arguments for creating or editing a general task.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneralTaskArgs {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub area_uuid: Uuid,
    /// Ignored on create, where the status always starts as `Pendiente`.
    pub status: Option<TaskStatus>,
}

/// Arguments for creating or editing a subtask.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SubtaskArgs {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    /// Ignored on create, where the status always starts as `Pendiente`.
    pub status: Option<TaskStatus>,
    pub assigned_user_uuid: Option<Uuid>,
}

/// Self-registration of support staff with an area code.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterApoyoArgs {
    pub username: String,
    pub email: String,
    /// Already hashed by the authentication layer.
    pub password_hash: String,
    pub area_code: String,
}

/// Supervisor-side user creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateUserArgs {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub area_uuid: Option<Uuid>,
}

fn check_len(field: &'static str, value: &str, min: usize, max: usize) -> AppResult<()> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(AppError::validation(
            field,
            format!("❌ {} must be between {} and {} characters", field, min, max),
        ));
    }
    Ok(())
}

fn check_description(description: &Option<String>) -> AppResult<()> {
    if let Some(text) = description {
        if text.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(AppError::validation(
                "description",
                format!("❌ description cannot exceed {} characters", DESCRIPTION_MAX_LEN),
            ));
        }
    }
    Ok(())
}

fn check_email(email: &str) -> AppResult<()> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    };
    if !valid || email.contains(char::is_whitespace) {
        return Err(AppError::validation("email", "❌ Enter a valid email address"));
    }
    Ok(())
}

fn check_status(status: Option<TaskStatus>) -> AppResult<()> {
    if status == Some(TaskStatus::Retrasado) {
        return Err(AppError::validation("status", ERROR_STATUS_RESERVED));
    }
    Ok(())
}

/// Trim text and turn blank descriptions into `None`.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

impl ProjectArgs {
    pub fn validate(&self) -> AppResult<()> {
        check_len("name", &self.name, PROJECT_NAME_MIN_LEN, PROJECT_NAME_MAX_LEN)?;
        check_description(&self.description)?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(AppError::validation("end_date", "❌ The end date cannot be before the start date"));
            }
        }
        Ok(())
    }
}

impl GeneralTaskArgs {
    pub fn validate(&self) -> AppResult<()> {
        check_len("title", &self.title, GENERAL_TASK_TITLE_MIN_LEN, GENERAL_TASK_TITLE_MAX_LEN)?;
        check_description(&self.description)?;
        check_status(self.status)
    }
}

impl SubtaskArgs {
    pub fn validate(&self) -> AppResult<()> {
        check_len("title", &self.title, SUBTASK_TITLE_MIN_LEN, SUBTASK_TITLE_MAX_LEN)?;
        check_description(&self.description)?;
        check_status(self.status)
    }
}

impl RegisterApoyoArgs {
    pub fn validate(&self) -> AppResult<()> {
        check_len("username", &self.username, USERNAME_MIN_LEN, USERNAME_MAX_LEN)?;
        check_email(&self.email)?;
        check_len("area_code", &self.area_code, AREA_CODE_MIN_LEN, AREA_CODE_MAX_LEN)?;
        if self.password_hash.is_empty() {
            return Err(AppError::validation("password", "❌ A password is required"));
        }
        Ok(())
    }
}

impl CreateUserArgs {
    pub fn validate(&self) -> AppResult<()> {
        check_len("username", &self.username, USERNAME_MIN_LEN, USERNAME_MAX_LEN)?;
        check_email(&self.email)?;
        if self.role.requires_area() && self.area_uuid.is_none() {
            return Err(AppError::validation(
                "area",
                format!("❌ Users with role {} must belong to an area", self.role),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_args(name: &str) -> ProjectArgs {
        ProjectArgs {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn project_name_length_is_enforced() {
        assert!(project_args("Road").validate().is_ok());
        let err = project_args("Rd").validate().unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "name", .. }));
        assert!(project_args("   ").validate().is_err());
    }

    #[test]
    fn project_dates_must_be_ordered() {
        let mut args = project_args("Bridge");
        args.start_date = NaiveDate::from_ymd_opt(2025, 5, 1);
        args.end_date = NaiveDate::from_ymd_opt(2025, 4, 1);
        let err = args.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "end_date", .. }));
    }

    #[test]
    fn long_descriptions_are_rejected() {
        let args = SubtaskArgs {
            title: "Call".to_string(),
            description: Some("x".repeat(DESCRIPTION_MAX_LEN + 1)),
            ..Default::default()
        };
        assert!(matches!(args.validate(), Err(AppError::Validation { field: "description", .. })));
    }

    #[test]
    fn retrasado_cannot_be_set_by_hand() {
        let mut args = SubtaskArgs {
            title: "Call".to_string(),
            status: Some(TaskStatus::Retrasado),
            ..Default::default()
        };
        assert!(matches!(args.validate(), Err(AppError::Validation { field: "status", .. })));
        args.status = Some(TaskStatus::Finalizado);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn blank_descriptions_become_none() {
        assert_eq!(normalize_description(Some("   ".to_string())), None);
        assert_eq!(normalize_description(Some(" ok ".to_string())), Some("ok".to_string()));
        assert_eq!(normalize_description(None), None);
    }

    #[test]
    fn registration_checks_email_and_code() {
        let mut args = RegisterApoyoArgs {
            username: "maria".to_string(),
            email: "maria@example.org".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            area_code: "JUR01".to_string(),
        };
        assert!(args.validate().is_ok());

        args.email = "not-an-email".to_string();
        assert!(matches!(args.validate(), Err(AppError::Validation { field: "email", .. })));

        args.email = "maria@example.org".to_string();
        args.area_code = "J1".to_string();
        assert!(matches!(args.validate(), Err(AppError::Validation { field: "area_code", .. })));
    }

    #[test]
    fn area_bound_roles_need_an_area() {
        let args = CreateUserArgs {
            username: "lead".to_string(),
            email: "lead@example.org".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Encargado,
            area_uuid: None,
        };
        assert!(matches!(args.validate(), Err(AppError::Validation { field: "area", .. })));
    }
}
