use crate::helpers::{envelope, spawn_app};
use uuid::Uuid;

#[tokio::test]
async fn you_must_be_logged_in_to_change_your_password() {
    let app = spawn_app().await;
    let new_password = Uuid::new_v4().to_string();

    let response = app
        .post_update_password(
            &serde_json::json!({
                "oldPassword": Uuid::new_v4().to_string(),
                "newPassword": &new_password,
            }),
            None,
        )
        .await;

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(envelope(response).await["code"], 1005);
}

#[tokio::test]
async fn current_password_must_be_valid() {
    let app = spawn_app().await;
    let token = app.register_test_user().await;

    let response = app
        .post_update_password(
            &serde_json::json!({
                "oldPassword": "wrong-password",
                "newPassword": Uuid::new_v4().to_string(),
            }),
            Some(&token),
        )
        .await;

    assert_eq!(envelope(response).await["code"], 1005);

    // The original password still works.
    let login = envelope(app.post_login(&app.test_user.credentials()).await).await;
    assert_eq!(login["code"], 200);
}

#[tokio::test]
async fn changing_password_works() {
    let app = spawn_app().await;
    let token = app.register_test_user().await;
    let new_password = Uuid::new_v4().to_string();

    let response = app
        .post_update_password(
            &serde_json::json!({
                "oldPassword": &app.test_user.password,
                "newPassword": &new_password,
            }),
            Some(&token),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body = envelope(response).await;
    assert_eq!(body["code"], 200);
    assert_eq!(body["message"], "Password updated successfully");

    let old_login = envelope(app.post_login(&app.test_user.credentials()).await).await;
    assert_eq!(old_login["code"], 1005);

    let new_login = envelope(
        app.post_login(&serde_json::json!({
            "username": &app.test_user.username,
            "password": &new_password,
        }))
        .await,
    )
    .await;
    assert_eq!(new_login["code"], 200);
}

#[tokio::test]
async fn rejected_request_has_no_side_effects() {
    let app = spawn_app().await;
    app.register_test_user().await;

    app.post_update_password(
        &serde_json::json!({
            "oldPassword": &app.test_user.password,
            "newPassword": "never-applied",
        }),
        Some("not-a-token"),
    )
    .await;

    let login = envelope(app.post_login(&app.test_user.credentials()).await).await;
    assert_eq!(login["code"], 200);
}
