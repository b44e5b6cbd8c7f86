use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::types::ProjectStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub status: ProjectStatus,
    pub creator_uuid: Uuid,
    /// Legacy optional area; visibility is decided through the general tasks.
    pub area_uuid: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::general_task::Entity")]
    GeneralTasks,
    #[sea_orm(
        belongs_to = "super::area::Entity",
        from = "Column::AreaUuid",
        to = "super::area::Column::Uuid",
        on_delete = "SetNull"
    )]
    Area,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatorUuid",
        to = "super::user::Column::Uuid"
    )]
    Creator,
}

impl Related<super::general_task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralTasks.def()
    }
}

impl Related<super::area::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Area.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
