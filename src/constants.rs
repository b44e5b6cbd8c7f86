//! Constants used throughout the application
//!
//! This module centralizes user-facing messages and validation limits
//! to improve maintainability and consistency.

// Success Messages
pub const SUCCESS_PROJECT_CREATED: &str = "✅ Project created";
pub const SUCCESS_PROJECT_UPDATED: &str = "✅ Project updated";
pub const SUCCESS_PROJECT_DELETED: &str = "✅ Project deleted";
pub const SUCCESS_GENERAL_TASK_CREATED: &str = "✅ General task created";
pub const SUCCESS_GENERAL_TASK_UPDATED: &str = "✅ General task updated";
pub const SUCCESS_GENERAL_TASK_DELETED: &str = "✅ General task deleted";
pub const SUCCESS_SUBTASK_CREATED: &str = "✅ Subtask created";
pub const SUCCESS_SUBTASK_UPDATED: &str = "✅ Subtask updated";
pub const SUCCESS_SUBTASK_DELETED: &str = "✅ Subtask deleted";
pub const SUCCESS_USER_CREATED: &str = "✅ User created";
pub const SUCCESS_REGISTERED: &str = "✅ Registration complete. You can sign in once your account is approved";

// Info Messages
pub const INFO_AREAS_UP_TO_DATE: &str = "ℹ️ Every configured area already exists";

// Error Messages
pub const ERROR_NOT_AUTHORIZED: &str = "❌ Not authorized";
pub const ERROR_NOT_FOUND: &str = "not found";
pub const ERROR_GENERIC_FAILURE: &str = "❌ The operation could not be completed. Please try again later";
pub const ERROR_INVALID_AREA_CODE: &str = "❌ Invalid area code. Please check the code of your area";
pub const ERROR_INVALID_ASSIGNEE: &str = "❌ Subtasks can only be assigned to support staff of the general task's area";
pub const ERROR_USERNAME_TAKEN: &str = "❌ That username already exists";
pub const ERROR_STATUS_RESERVED: &str = "❌ Retrasado is set by the overdue sweep and cannot be chosen by hand";
pub const ERROR_EMAIL_TAKEN: &str = "❌ That email is already registered";

// Warning Messages (formatted with a count)
pub const WARNING_SUBTASKS_OVERDUE: &str = "⚠️ {} subtask(s) overdue";
pub const WARNING_SUBTASKS_MARKED: &str = "⚠️ {} subtask(s) marked as Retrasado. Please review and update them";

/// Label used when a subtask has no assignee
pub const UNASSIGNED_LABEL: &str = "unassigned";

// Validation limits, in characters
pub const USERNAME_MIN_LEN: usize = 2;
pub const USERNAME_MAX_LEN: usize = 20;
pub const AREA_CODE_MIN_LEN: usize = 4;
pub const AREA_CODE_MAX_LEN: usize = 16;
pub const PROJECT_NAME_MIN_LEN: usize = 4;
pub const PROJECT_NAME_MAX_LEN: usize = 300;
pub const GENERAL_TASK_TITLE_MIN_LEN: usize = 4;
pub const GENERAL_TASK_TITLE_MAX_LEN: usize = 100;
pub const SUBTASK_TITLE_MIN_LEN: usize = 2;
pub const SUBTASK_TITLE_MAX_LEN: usize = 200;
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// Fill the `{}` placeholder of a counted message
pub fn with_count(template: &str, count: usize) -> String {
    template.replacen("{}", &count.to_string(), 1)
}

// Configuration
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const MAX_DB_CONNECTIONS: u32 = 32;

// Logging
pub const MAX_BUFFERED_LOGS: usize = 1000;
pub const LOG_FILE_NAME: &str = "areatrack.log";
