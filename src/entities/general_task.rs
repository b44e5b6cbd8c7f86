use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::types::{Priority, TaskStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "general_tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<Date>,
    pub priority: Priority,
    pub status: TaskStatus,
    /// Cached roll-up of the subtasks; views recompute it.
    pub progress_percent: f64,
    pub project_uuid: Uuid,
    pub area_uuid: Uuid,
    pub creator_uuid: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectUuid",
        to = "super::project::Column::Uuid",
        on_delete = "Cascade"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::area::Entity",
        from = "Column::AreaUuid",
        to = "super::area::Column::Uuid"
    )]
    Area,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatorUuid",
        to = "super::user::Column::Uuid"
    )]
    Creator,
    #[sea_orm(has_many = "super::subtask::Entity")]
    Subtasks,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::area::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Area.def()
    }
}

impl Related<super::subtask::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subtasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
