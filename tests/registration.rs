mod common;

use areatrack::config::SeedArea;
use areatrack::entities::Role;
use areatrack::error::AppError;
use areatrack::forms::{CreateUserArgs, RegisterApoyoArgs};
use areatrack::notifications::Severity;
use areatrack::repositories::AreaRepository;
use common::world;

fn registration(username: &str, email: &str, code: &str) -> RegisterApoyoArgs {
    RegisterApoyoArgs {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "$2b$12$hash".to_string(),
        area_code: code.to_string(),
    }
}

#[tokio::test]
async fn test_register_apoyo_with_area_code() {
    let w = world().await;

    let user = w
        .service
        .register_apoyo(registration("diego", "Diego@Example.org", "SIS04"))
        .await
        .unwrap();
    assert_eq!(user.role, Role::Apoyo);
    assert_eq!(user.area_uuid, Some(w.area_a.uuid));
    assert_eq!(user.email, "diego@example.org");
    assert!(user.is_active);
    assert!(!user.confirmed);

    let principal = w.service.principal_by_login("diego").await.unwrap().unwrap();
    assert_eq!(principal.user_uuid, user.uuid);
    let principal = w.service.principal_by_login("Diego@Example.org").await.unwrap().unwrap();
    assert_eq!(principal.user_uuid, user.uuid);
}

#[tokio::test]
async fn test_register_apoyo_rejects_bad_code_and_duplicates() {
    let w = world().await;

    let err = w
        .service
        .register_apoyo(registration("diego", "diego@example.org", "NOPE99"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { field: "area_code", .. }));

    let err = w
        .service
        .register_apoyo(registration("ana", "new@example.org", "SIS04"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { field: "username", .. }));

    let err = w
        .service
        .register_apoyo(registration("newbie", "ana@example.org", "SIS04"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { field: "email", .. }));

    assert!(w.service.principal_by_login("diego").await.unwrap().is_none());
}

#[tokio::test]
async fn test_only_supervisors_create_users() {
    let w = world().await;
    let args = CreateUserArgs {
        username: "lead_c".to_string(),
        email: "lead_c@example.org".to_string(),
        password_hash: "hash".to_string(),
        role: Role::Encargado,
        area_uuid: Some(w.area_b.uuid),
    };

    let err = w.service.create_user(&w.encargado_b, args.clone()).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let user = w.service.create_user(&w.supervisor, args).await.unwrap();
    assert_eq!(user.role, Role::Encargado);
    assert!(user.confirmed);
    let principal = w.service.principal(user.uuid).await.unwrap();
    assert_eq!(principal.area_uuid, Some(w.area_b.uuid));
}

#[tokio::test]
async fn test_seed_areas_is_idempotent_by_name() {
    let w = world().await;
    let seeds = vec![SeedArea::new("Sistemas", "SIS04"), SeedArea::new("Jurídica", "JUR01")];

    assert_eq!(w.service.seed_areas(&seeds).await.unwrap(), 1);
    assert!(w.service.notifications().drain().is_empty());
    assert_eq!(w.service.seed_areas(&seeds).await.unwrap(), 0);
    let notices = w.service.notifications().drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Info);

    let storage = w.service.storage();
    let storage = storage.lock().await;
    let areas = AreaRepository::get_all(&storage.conn).await.unwrap();
    assert_eq!(areas.len(), 3);
    assert!(AreaRepository::get_by_code(&storage.conn, "JUR01").await.unwrap().is_some());
}
