use log::info;
use sea_orm::{ActiveValue, ConnectionTrait, TransactionTrait};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::{authorize, load_directory, TrackerService};
use crate::config::SeedArea;
use crate::constants::{
    ERROR_EMAIL_TAKEN, ERROR_INVALID_AREA_CODE, ERROR_USERNAME_TAKEN, INFO_AREAS_UP_TO_DATE, SUCCESS_REGISTERED,
    SUCCESS_USER_CREATED,
};
use crate::entities::{area, general_task, user, Role};
use crate::error::{AppError, AppResult};
use crate::forms::{CreateUserArgs, RegisterApoyoArgs};
use crate::hierarchy::{sort_subtasks, SubtaskSummary};
use crate::notifications::Notice;
use crate::permissions::{self, Action, Principal};
use crate::repositories::{AreaRepository, GeneralTaskRepository, ProjectRepository, SubtaskRepository, UserRepository};
use crate::utils::datetime;

/// An area with its people and its general tasks.
#[derive(Clone, Debug, Serialize)]
pub struct AreaDetails {
    pub area: area::Model,
    pub users: Vec<user::Model>,
    pub general_tasks: Vec<general_task::Model>,
}

/// A user with the subtasks assigned to them.
#[derive(Clone, Debug, Serialize)]
pub struct UserProfile {
    pub user: user::Model,
    pub area: Option<area::Model>,
    pub assigned_subtasks: Vec<SubtaskSummary>,
}

/// Username and email must both be free.
async fn check_unique<C>(conn: &C, username: &str, email: &str) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if UserRepository::get_by_username(conn, username).await?.is_some() {
        return Err(AppError::validation("username", ERROR_USERNAME_TAKEN));
    }
    if UserRepository::get_by_email(conn, email).await?.is_some() {
        return Err(AppError::validation("email", ERROR_EMAIL_TAKEN));
    }
    Ok(())
}

impl TrackerService {
    /// An area with its users and general tasks.
    pub async fn area_details(&self, principal: &Principal, area_uuid: Uuid) -> AppResult<AreaDetails> {
        let storage = self.storage.lock().await;
        let conn = &storage.conn;

        let area = AreaRepository::get_by_id(conn, &area_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("area", area_uuid))?;
        authorize(principal, permissions::area(principal, Action::View, area_uuid))?;

        let users = UserRepository::get_in_area(conn, &area_uuid).await?;
        let general_tasks = GeneralTaskRepository::get_for_area(conn, &area_uuid).await?;

        Ok(AreaDetails {
            area,
            users,
            general_tasks,
        })
    }

    /// A user's profile with their assigned subtasks, earliest due date first.
    pub async fn user_profile(&self, principal: &Principal, user_uuid: Uuid) -> AppResult<UserProfile> {
        let storage = self.storage.lock().await;
        let conn = &storage.conn;

        let user = UserRepository::get_by_id(conn, &user_uuid)
            .await?
            .ok_or_else(|| AppError::not_found("user", user_uuid))?;
        authorize(
            principal,
            permissions::user_profile(principal, Action::View, user.uuid, user.area_uuid),
        )?;

        let area = match user.area_uuid {
            Some(area_uuid) => AreaRepository::get_by_id(conn, &area_uuid).await?,
            None => None,
        };

        let assigned_subtasks = if user.role == Role::Supervisor {
            Vec::new()
        } else {
            let mut subtasks = SubtaskRepository::get_assigned_to(conn, &user.uuid).await?;
            sort_subtasks(&mut subtasks);

            let mut general_task_uuids: Vec<Uuid> = subtasks.iter().map(|s| s.general_task_uuid).collect();
            general_task_uuids.sort();
            general_task_uuids.dedup();
            let general_tasks = GeneralTaskRepository::get_by_ids(conn, &general_task_uuids).await?;

            let mut project_uuids: Vec<Uuid> = general_tasks.iter().map(|t| t.project_uuid).collect();
            project_uuids.sort();
            project_uuids.dedup();
            let project_names: HashMap<Uuid, String> = ProjectRepository::get_by_ids(conn, &project_uuids)
                .await?
                .into_iter()
                .map(|p| (p.uuid, p.name))
                .collect();
            let project_of_task: HashMap<Uuid, Uuid> =
                general_tasks.iter().map(|t| (t.uuid, t.project_uuid)).collect();

            let directory = load_directory(conn).await?;
            let today = datetime::today();
            subtasks
                .iter()
                .map(|subtask| {
                    let project_name = project_of_task
                        .get(&subtask.general_task_uuid)
                        .and_then(|project_uuid| project_names.get(project_uuid))
                        .map(String::as_str)
                        .unwrap_or_default();
                    SubtaskSummary::new(subtask, project_name, &directory, today)
                })
                .collect()
        };

        Ok(UserProfile {
            user,
            area,
            assigned_subtasks,
        })
    }

    /// Creates a user of any role. Supervisors only.
    pub async fn create_user(&self, principal: &Principal, args: CreateUserArgs) -> AppResult<user::Model> {
        let user_uuid = Uuid::new_v4();
        authorize(
            principal,
            permissions::user_profile(principal, Action::Create, user_uuid, args.area_uuid),
        )?;
        args.validate()?;

        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        let username = args.username.trim().to_string();
        let email = args.email.trim().to_lowercase();
        check_unique(&txn, &username, &email).await?;
        if let Some(area_uuid) = args.area_uuid {
            AreaRepository::get_by_id(&txn, &area_uuid)
                .await?
                .ok_or_else(|| AppError::not_found("area", area_uuid))?;
        }

        let model = user::ActiveModel {
            uuid: ActiveValue::Set(user_uuid),
            username: ActiveValue::Set(username),
            email: ActiveValue::Set(email),
            password_hash: ActiveValue::Set(args.password_hash),
            role: ActiveValue::Set(args.role),
            area_uuid: ActiveValue::Set(args.area_uuid),
            is_active: ActiveValue::Set(true),
            confirmed: ActiveValue::Set(true),
        };
        let created = UserRepository::create(&txn, model).await?;
        txn.commit().await?;

        info!(
            "👤 User {} created {} '{}' ({})",
            principal.user_uuid, created.role, created.username, created.uuid
        );
        self.notify(Notice::success(SUCCESS_USER_CREATED));
        Ok(created)
    }

    /// Self-registration of support staff with their area's code.
    ///
    /// The account is active but unconfirmed until a supervisor reviews it.
    pub async fn register_apoyo(&self, args: RegisterApoyoArgs) -> AppResult<user::Model> {
        args.validate()?;

        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        let area = AreaRepository::get_by_code(&txn, &args.area_code)
            .await?
            .ok_or_else(|| AppError::validation("area_code", ERROR_INVALID_AREA_CODE))?;

        let username = args.username.trim().to_string();
        let email = args.email.trim().to_lowercase();
        check_unique(&txn, &username, &email).await?;

        let model = user::ActiveModel {
            uuid: ActiveValue::Set(Uuid::new_v4()),
            username: ActiveValue::Set(username),
            email: ActiveValue::Set(email),
            password_hash: ActiveValue::Set(args.password_hash),
            role: ActiveValue::Set(Role::Apoyo),
            area_uuid: ActiveValue::Set(Some(area.uuid)),
            is_active: ActiveValue::Set(true),
            confirmed: ActiveValue::Set(false),
        };
        let created = UserRepository::create(&txn, model).await?;
        txn.commit().await?;

        info!("👤 '{}' registered as apoyo of area '{}'", created.username, area.name);
        self.notify(Notice::success(SUCCESS_REGISTERED));
        Ok(created)
    }

    /// Create the configured areas that do not exist yet, matching by name.
    ///
    /// Returns how many areas were created.
    pub async fn seed_areas(&self, areas: &[SeedArea]) -> AppResult<usize> {
        let storage = self.storage.lock().await;
        let txn = storage.conn.begin().await?;

        let mut created = 0;
        for seed in areas {
            if AreaRepository::get_by_name(&txn, &seed.name).await?.is_some() {
                continue;
            }
            let model = area::ActiveModel {
                uuid: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(seed.name.clone()),
                code: ActiveValue::Set(seed.code.trim().to_string()),
            };
            AreaRepository::create(&txn, model).await?;
            created += 1;
        }
        txn.commit().await?;

        info!("🌱 Seeded {} area(s)", created);
        if created == 0 {
            self.notify(Notice::info(INFO_AREAS_UP_TO_DATE));
        }
        Ok(created)
    }
}
