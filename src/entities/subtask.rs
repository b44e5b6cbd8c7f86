use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::types::{Priority, TaskStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subtasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<Date>,
    pub general_task_uuid: Uuid,
    pub assigned_user_uuid: Option<Uuid>,
    pub creator_uuid: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::general_task::Entity",
        from = "Column::GeneralTaskUuid",
        to = "super::general_task::Column::Uuid",
        on_delete = "Cascade"
    )]
    GeneralTask,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AssignedUserUuid",
        to = "super::user::Column::Uuid",
        on_delete = "SetNull"
    )]
    AssignedUser,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatorUuid",
        to = "super::user::Column::Uuid"
    )]
    Creator,
}

impl Related<super::general_task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralTask.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignedUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
