mod common;

use areatrack::entities::Role;
use areatrack::error::{AppError, Fallback};
use areatrack::notifications::Severity;
use common::{general_task_args, project_args, project_with_task, subtask_args, today, world};

#[tokio::test]
async fn test_encargado_sees_only_projects_of_their_area() {
    let w = world().await;
    let (p1, _) = project_with_task(&w, "Servers", w.area_a.uuid).await;
    let (p2, task_b) = project_with_task(&w, "Cabling", w.area_b.uuid).await;

    let dashboard = w.service.dashboard_on(&w.encargado_a, today()).await.unwrap();
    let visible: Vec<_> = dashboard.projects.iter().map(|p| p.uuid).collect();
    assert_eq!(visible, vec![p1]);
    assert!(!visible.contains(&p2));
    assert_eq!(dashboard.main_projects.len(), 1);
    assert_eq!(dashboard.role, Role::Encargado);

    let err = w
        .service
        .edit_general_task(&w.encargado_a, task_b, general_task_args("Cabling plan", w.area_b.uuid))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
    assert_eq!(w.service.report(&err), Fallback::Dashboard);
    let notices = w.service.notifications().drain();
    assert_eq!(notices.last().map(|n| n.severity), Some(Severity::Danger));
}

#[tokio::test]
async fn test_encargado_keeps_only_own_area_tasks_in_shared_project() {
    let w = world().await;
    let (project_uuid, task_a) = project_with_task(&w, "Shared", w.area_a.uuid).await;
    w.service
        .create_general_task(&w.supervisor, project_uuid, general_task_args("Other area", w.area_b.uuid))
        .await
        .unwrap();

    let dashboard = w.service.dashboard_on(&w.encargado_a, today()).await.unwrap();
    assert_eq!(dashboard.projects.len(), 1);
    let tasks: Vec<_> = dashboard.projects[0].general_tasks.iter().map(|t| t.uuid).collect();
    assert_eq!(tasks, vec![task_a]);
    assert_eq!(dashboard.pending_general_tasks, 1);

    let supervisor_view = w.service.dashboard_on(&w.supervisor, today()).await.unwrap();
    assert_eq!(supervisor_view.projects[0].general_tasks.len(), 2);
    assert_eq!(supervisor_view.pending_general_tasks, 2);
}

#[tokio::test]
async fn test_encargado_cannot_move_task_to_another_area() {
    let w = world().await;
    let (_, task_a) = project_with_task(&w, "Servers", w.area_a.uuid).await;

    let err = w
        .service
        .edit_general_task(&w.encargado_a, task_a, general_task_args("Servers", w.area_b.uuid))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let edited = w
        .service
        .edit_general_task(&w.encargado_a, task_a, general_task_args("Servers rack", w.area_a.uuid))
        .await
        .unwrap();
    assert_eq!(edited.title, "Servers rack");
}

#[tokio::test]
async fn test_apoyo_sees_only_own_subtasks() {
    let w = world().await;
    let (project_uuid, task) = project_with_task(&w, "Rollout", w.area_a.uuid).await;
    let mine = w
        .service
        .create_subtask(&w.supervisor, task, subtask_args("Mine", Some(w.apoyo_a1.user_uuid)))
        .await
        .unwrap();
    let theirs = w
        .service
        .create_subtask(&w.supervisor, task, subtask_args("Theirs", Some(w.apoyo_a2.user_uuid)))
        .await
        .unwrap();
    project_with_task(&w, "Unrelated", w.area_a.uuid).await;

    let dashboard = w.service.dashboard_on(&w.apoyo_a1, today()).await.unwrap();
    assert_eq!(dashboard.projects.len(), 1);
    assert_eq!(dashboard.projects[0].uuid, project_uuid);
    let subtasks: Vec<_> = dashboard.projects[0]
        .general_tasks
        .iter()
        .flat_map(|t| t.subtasks.iter())
        .map(|s| s.uuid)
        .collect();
    assert_eq!(subtasks, vec![mine.uuid]);

    let err = w
        .service
        .edit_subtask(&w.apoyo_a1, theirs.uuid, subtask_args("Taken over", Some(w.apoyo_a2.user_uuid)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn test_apoyo_edits_own_subtask_but_cannot_reassign_it() {
    let w = world().await;
    let (_, task) = project_with_task(&w, "Rollout", w.area_a.uuid).await;
    let mine = w
        .service
        .create_subtask(&w.supervisor, task, subtask_args("Mine", Some(w.apoyo_a1.user_uuid)))
        .await
        .unwrap();

    let mut args = subtask_args("Mine, in progress", Some(w.apoyo_a1.user_uuid));
    args.status = Some(areatrack::entities::TaskStatus::EnEjecucion);
    let edited = w.service.edit_subtask(&w.apoyo_a1, mine.uuid, args).await.unwrap();
    assert_eq!(edited.title, "Mine, in progress");

    let err = w
        .service
        .edit_subtask(&w.apoyo_a1, mine.uuid, subtask_args("Mine", Some(w.apoyo_a2.user_uuid)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let err = w.service.delete_subtask(&w.apoyo_a1, mine.uuid).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let err = w
        .service
        .create_subtask(&w.apoyo_a1, task, subtask_args("New", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn test_projects_without_tasks_are_visible_to_supervisors_only() {
    let w = world().await;
    w.service.create_project(&w.supervisor, project_args("Empty")).await.unwrap();

    assert_eq!(w.service.dashboard_on(&w.supervisor, today()).await.unwrap().projects.len(), 1);
    assert!(w.service.dashboard_on(&w.encargado_a, today()).await.unwrap().projects.is_empty());
    assert!(w.service.dashboard_on(&w.apoyo_a1, today()).await.unwrap().projects.is_empty());
}

#[tokio::test]
async fn test_area_details_and_profiles_are_scoped() {
    let w = world().await;
    project_with_task(&w, "Servers", w.area_a.uuid).await;

    let details = w.service.area_details(&w.encargado_a, w.area_a.uuid).await.unwrap();
    assert_eq!(details.users.len(), 3);
    assert_eq!(details.general_tasks.len(), 1);
    assert!(w.service.area_details(&w.encargado_a, w.area_b.uuid).await.is_err());
    assert!(w.service.area_details(&w.apoyo_a1, w.area_a.uuid).await.is_ok());

    assert!(w.service.user_profile(&w.encargado_a, w.apoyo_a2.user_uuid).await.is_ok());
    assert!(w.service.user_profile(&w.encargado_a, w.apoyo_b.user_uuid).await.is_err());
    assert!(w.service.user_profile(&w.apoyo_a1, w.apoyo_a1.user_uuid).await.is_ok());
    assert!(w.service.user_profile(&w.apoyo_a1, w.apoyo_a2.user_uuid).await.is_err());
}

#[tokio::test]
async fn test_assignable_users_follow_role() {
    let w = world().await;
    let (_, task) = project_with_task(&w, "Servers", w.area_a.uuid).await;
    w.service
        .create_subtask(&w.supervisor, task, subtask_args("Mine", Some(w.apoyo_a1.user_uuid)))
        .await
        .unwrap();

    let names: Vec<String> = w
        .service
        .assignable_users(&w.encargado_a, task)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(names, vec!["ana".to_string(), "beto".to_string()]);

    let own = w.service.assignable_users(&w.apoyo_a1, task).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].uuid, w.apoyo_a1.user_uuid);

    assert!(w.service.assignable_users(&w.apoyo_a2, task).await.is_err());
}
