//! Overdue evaluation for every dated item in the hierarchy.
//!
//! One predicate decides lateness for projects, general tasks and subtasks.
//! The persisted `Retrasado` status is a separate marker written by the
//! sweep; [`OverdueState`] tells the two apart.

use chrono::NaiveDate;
use serde::Serialize;

use crate::entities::{general_task, project, subtask};
use crate::utils::datetime;

/// Statuses that stop an item from ever being late, compared lowercase.
const CLOSED_STATUSES: [&str; 3] = ["finalizado", "suspendido", "cancelado"];

/// Status label written by the overdue sweep, compared lowercase.
const MARKED_STATUS: &str = "retrasado";

/// Whether an item due on `due_date` with `status` is late today.
pub fn is_overdue(due_date: Option<NaiveDate>, status: &str) -> bool {
    is_overdue_on(due_date, status, datetime::today())
}

/// Same as [`is_overdue`] with an explicit reference date.
pub fn is_overdue_on(due_date: Option<NaiveDate>, status: &str, today: NaiveDate) -> bool {
    let Some(due) = due_date else {
        return false;
    };
    let status = status.trim().to_lowercase();
    due < today && !CLOSED_STATUSES.contains(&status.as_str())
}

/// How an item relates to its due date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverdueState {
    OnTime,
    /// Past due and not yet swept.
    Late,
    /// Carries the persisted `Retrasado` marker.
    Marked,
}

impl OverdueState {
    pub fn classify(due_date: Option<NaiveDate>, status: &str, today: NaiveDate) -> Self {
        if status.trim().eq_ignore_ascii_case(MARKED_STATUS) {
            OverdueState::Marked
        } else if is_overdue_on(due_date, status, today) {
            OverdueState::Late
        } else {
            OverdueState::OnTime
        }
    }

    /// Both live and persisted lateness count towards warnings.
    pub fn is_overdue(&self) -> bool {
        !matches!(self, OverdueState::OnTime)
    }
}

/// Anything with a due date and a status label.
pub trait Dated {
    fn due_date(&self) -> Option<NaiveDate>;
    fn status_label(&self) -> &str;

    fn is_overdue_on(&self, today: NaiveDate) -> bool {
        is_overdue_on(self.due_date(), self.status_label(), today)
    }

    fn overdue_state(&self, today: NaiveDate) -> OverdueState {
        OverdueState::classify(self.due_date(), self.status_label(), today)
    }
}

impl Dated for project::Model {
    fn due_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    fn status_label(&self) -> &str {
        self.status.label()
    }
}

impl Dated for general_task::Model {
    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn status_label(&self) -> &str {
        self.status.label()
    }
}

impl Dated for subtask::Model {
    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn status_label(&self) -> &str {
        self.status.label()
    }
}
