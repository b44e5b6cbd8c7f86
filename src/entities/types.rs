//! Enumerated column types shared by the entities.
//!
//! Values are stored as text using the labels the organisation already uses
//! on paper ("En ejecución", "Pendiente", ...), so the database stays readable
//! by the people who fill it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of an authenticated user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Global administrator, not bound to an area.
    #[sea_orm(string_value = "supervisor")]
    Supervisor,
    /// Area lead.
    #[sea_orm(string_value = "encargado")]
    Encargado,
    /// Support staff working assigned subtasks.
    #[sea_orm(string_value = "apoyo")]
    Apoyo,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Supervisor => "supervisor",
            Role::Encargado => "encargado",
            Role::Apoyo => "apoyo",
        }
    }

    /// Whether users of this role must belong to an area.
    pub fn requires_area(&self) -> bool {
        !matches!(self, Role::Supervisor)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a project.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ProjectStatus {
    #[default]
    #[sea_orm(string_value = "En ejecución")]
    #[serde(rename = "En ejecución")]
    EnEjecucion,
    #[sea_orm(string_value = "Finalizado")]
    Finalizado,
    #[sea_orm(string_value = "Suspendido")]
    Suspendido,
    #[sea_orm(string_value = "Cancelado")]
    Cancelado,
}

impl ProjectStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::EnEjecucion => "En ejecución",
            ProjectStatus::Finalizado => "Finalizado",
            ProjectStatus::Suspendido => "Suspendido",
            ProjectStatus::Cancelado => "Cancelado",
        }
    }
}

/// Status of a general task or subtask.
///
/// `Retrasado` is only ever written by the overdue sweep; edit forms reject it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum TaskStatus {
    #[default]
    #[sea_orm(string_value = "Pendiente")]
    Pendiente,
    #[sea_orm(string_value = "En ejecución")]
    #[serde(rename = "En ejecución")]
    EnEjecucion,
    #[sea_orm(string_value = "Finalizado")]
    Finalizado,
    #[sea_orm(string_value = "Suspendido")]
    Suspendido,
    #[sea_orm(string_value = "Cancelado")]
    Cancelado,
    #[sea_orm(string_value = "Retrasado")]
    Retrasado,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pendiente => "Pendiente",
            TaskStatus::EnEjecucion => "En ejecución",
            TaskStatus::Finalizado => "Finalizado",
            TaskStatus::Suspendido => "Suspendido",
            TaskStatus::Cancelado => "Cancelado",
            TaskStatus::Retrasado => "Retrasado",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Priority {
    #[sea_orm(string_value = "Alta")]
    Alta,
    #[default]
    #[sea_orm(string_value = "Media")]
    Media,
    #[sea_orm(string_value = "Baja")]
    Baja,
}
