#![allow(dead_code)]

use areatrack::entities::{area, user, Priority, Role};
use areatrack::forms::{GeneralTaskArgs, ProjectArgs, SubtaskArgs};
use areatrack::notifications::Notifications;
use areatrack::permissions::Principal;
use areatrack::repositories::{AreaRepository, UserRepository};
use areatrack::service::TrackerService;
use areatrack::storage::LocalStorage;
use chrono::{Duration, NaiveDate};
use sea_orm::ActiveValue;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Two areas with one encargado and some apoyos each, plus a supervisor.
pub struct World {
    pub service: TrackerService,
    pub area_a: area::Model,
    pub area_b: area::Model,
    pub supervisor: Principal,
    pub encargado_a: Principal,
    pub encargado_b: Principal,
    pub apoyo_a1: Principal,
    pub apoyo_a2: Principal,
    pub apoyo_b: Principal,
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

async fn insert_area(storage: &LocalStorage, name: &str, code: &str) -> area::Model {
    AreaRepository::create(
        &storage.conn,
        area::ActiveModel {
            uuid: ActiveValue::Set(Uuid::new_v4()),
            name: ActiveValue::Set(name.to_string()),
            code: ActiveValue::Set(code.to_string()),
        },
    )
    .await
    .unwrap()
}

async fn insert_user(storage: &LocalStorage, username: &str, role: Role, area_uuid: Option<Uuid>) -> Principal {
    let user = UserRepository::create(
        &storage.conn,
        user::ActiveModel {
            uuid: ActiveValue::Set(Uuid::new_v4()),
            username: ActiveValue::Set(username.to_string()),
            email: ActiveValue::Set(format!("{}@example.org", username)),
            password_hash: ActiveValue::Set("hash".to_string()),
            role: ActiveValue::Set(role),
            area_uuid: ActiveValue::Set(area_uuid),
            is_active: ActiveValue::Set(true),
            confirmed: ActiveValue::Set(true),
        },
    )
    .await
    .unwrap();
    Principal::from_user(&user)
}

pub async fn world() -> World {
    let storage = LocalStorage::in_memory().await.unwrap();

    let area_a = insert_area(&storage, "Sistemas", "SIS04").await;
    let area_b = insert_area(&storage, "Redes", "RED03").await;

    let supervisor = insert_user(&storage, "boss", Role::Supervisor, None).await;
    let encargado_a = insert_user(&storage, "lead_a", Role::Encargado, Some(area_a.uuid)).await;
    let encargado_b = insert_user(&storage, "lead_b", Role::Encargado, Some(area_b.uuid)).await;
    let apoyo_a1 = insert_user(&storage, "ana", Role::Apoyo, Some(area_a.uuid)).await;
    let apoyo_a2 = insert_user(&storage, "beto", Role::Apoyo, Some(area_a.uuid)).await;
    let apoyo_b = insert_user(&storage, "carla", Role::Apoyo, Some(area_b.uuid)).await;

    let service = TrackerService::new(Arc::new(Mutex::new(storage)), Notifications::new(), true);

    World {
        service,
        area_a,
        area_b,
        supervisor,
        encargado_a,
        encargado_b,
        apoyo_a1,
        apoyo_a2,
        apoyo_b,
    }
}

pub fn project_args(name: &str) -> ProjectArgs {
    ProjectArgs {
        name: name.to_string(),
        ..Default::default()
    }
}

pub fn general_task_args(title: &str, area_uuid: Uuid) -> GeneralTaskArgs {
    GeneralTaskArgs {
        title: title.to_string(),
        description: None,
        due_date: None,
        priority: Priority::Media,
        area_uuid,
        status: None,
    }
}

pub fn subtask_args(title: &str, assignee: Option<Uuid>) -> SubtaskArgs {
    SubtaskArgs {
        title: title.to_string(),
        assigned_user_uuid: assignee,
        ..Default::default()
    }
}

/// A project with one general task in `area_uuid`.
pub async fn project_with_task(world: &World, name: &str, area_uuid: Uuid) -> (Uuid, Uuid) {
    let project = world
        .service
        .create_project(&world.supervisor, project_args(name))
        .await
        .unwrap();
    let task = world
        .service
        .create_general_task(&world.supervisor, project.uuid, general_task_args("Survey", area_uuid))
        .await
        .unwrap();
    (project.uuid, task.uuid)
}
