use crate::helpers::{envelope, spawn_app};

#[tokio::test]
async fn user_info_returns_the_sanitized_profile() {
    let app = spawn_app().await;
    let token = app.register_test_user().await;

    let response = app.get_user_info(Some(&token)).await;

    assert_eq!(response.status().as_u16(), 200);
    let body = envelope(response).await;
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["username"], app.test_user.username.as_str());
    let data = body["data"].as_object().unwrap();
    assert_eq!(data.len(), 2, "profile exposes more than id and username");
}

#[tokio::test]
async fn deleted_user_no_longer_resolves() {
    let app = spawn_app().await;
    let token = app.register_test_user().await;

    let response = app.post_delete_user(Some(&token)).await;
    assert_eq!(envelope(response).await["code"], 200);

    // The token is still well-formed but its subject is gone.
    let info = app.get_user_info(Some(&token)).await;
    assert_eq!(info.status().as_u16(), 404);
    assert_eq!(envelope(info).await["code"], 1003);

    let login = envelope(app.post_login(&app.test_user.credentials()).await).await;
    assert_eq!(login["code"], 1003);
}

#[tokio::test]
async fn old_token_does_not_resolve_a_re_registered_username() {
    let app = spawn_app().await;
    let old_token = app.register_test_user().await;
    let response = app.post_delete_user(Some(&old_token)).await;
    assert_eq!(envelope(response).await["code"], 200);
    let new_token = app.register_test_user().await;

    let info = app.get_user_info(Some(&old_token)).await;
    assert_eq!(info.status().as_u16(), 404);
    assert_eq!(envelope(info).await["code"], 1003);

    let info = envelope(app.get_user_info(Some(&new_token)).await).await;
    assert_eq!(info["data"]["id"], 2);
    assert_eq!(info["data"]["username"], app.test_user.username.as_str());
}
