use crate::helpers::{envelope, spawn_app};

#[tokio::test]
async fn register_returns_a_token_for_a_new_user() {
    let app = spawn_app().await;

    let response = app.post_register(&app.test_user.credentials()).await;

    assert_eq!(response.status().as_u16(), 200);
    let body = envelope(response).await;
    assert_eq!(body["code"], 200);
    assert_eq!(body["message"], "Success");
    assert!(!body["data"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn registering_the_same_username_twice_is_rejected() {
    let app = spawn_app().await;
    app.register_test_user().await;

    let response = app
        .post_register(&serde_json::json!({
            "username": &app.test_user.username,
            "password": "another-password",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 409);
    let body = envelope(response).await;
    assert_eq!(body["code"], 1004);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn concurrent_registrations_of_one_username_create_one_account() {
    let app = spawn_app().await;
    let body = app.test_user.credentials();

    let (first, second) = tokio::join!(app.post_register(&body), app.post_register(&body));
    let mut codes = vec![
        envelope(first).await["code"].as_u64().unwrap(),
        envelope(second).await["code"].as_u64().unwrap(),
    ];
    codes.sort();

    assert_eq!(codes, vec![200, 1004]);
}

#[tokio::test]
async fn register_rejects_empty_fields() {
    let app = spawn_app().await;
    let test_cases = vec![
        (serde_json::json!({"username": "", "password": "pw"}), "empty username"),
        (serde_json::json!({"username": "bob", "password": ""}), "empty password"),
        (serde_json::json!({"username": "   ", "password": "pw"}), "blank username"),
    ];

    for (body, description) in test_cases {
        let response = app.post_register(&body).await;

        assert_eq!(
            response.status().as_u16(),
            400,
            "The API did not reject a body with {}.",
            description
        );
        assert_eq!(envelope(response).await["code"], 1002);
    }
}

#[tokio::test]
async fn malformed_bodies_are_reported_in_the_envelope() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(format!("{}/api/register", &app.address))
        .header("Content-Type", "application/json")
        .body("{\"username\": 42")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 400);
    let body = envelope(response).await;
    assert_eq!(body["code"], 1002);
    assert_eq!(body["message"], "Invalid request format");
}
