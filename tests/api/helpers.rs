use account_service::{
    configuration::{get_configuration, HashingSettings},
    startup::Application,
    store::InMemoryUserStore,
    telemetry::{get_subscriber, init_subscriber},
};
use once_cell::sync::Lazy;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_TOKEN_SECRET: &str = "integration-test-signing-secret-with-enough-bytes";

pub struct TestUser {
    pub username: String,
    pub password: String,
}

impl TestUser {
    pub fn generate() -> Self {
        Self {
            username: Uuid::new_v4().to_string(),
            password: Uuid::new_v4().to_string(),
        }
    }

    pub fn credentials(&self) -> serde_json::Value {
        serde_json::json!({
            "username": &self.username,
            "password": &self.password,
        })
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub test_user: TestUser,
}

impl TestApp {
    pub async fn post_register(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/register", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_login(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/login", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_update_password(
        &self,
        body: &serde_json::Value,
        token: Option<&str>,
    ) -> reqwest::Response {
        let mut request = self
            .api_client
            .post(format!("{}/api/updatePassword", &self.address))
            .json(body);
        if let Some(token) = token {
            request = request.header("Authorization", token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn get_user_info(&self, token: Option<&str>) -> reqwest::Response {
        let mut request = self
            .api_client
            .get(format!("{}/api/getUserInfo", &self.address));
        if let Some(token) = token {
            request = request.header("Authorization", token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn post_delete_user(&self, token: Option<&str>) -> reqwest::Response {
        let mut request = self
            .api_client
            .post(format!("{}/api/deleteUser", &self.address));
        if let Some(token) = token {
            request = request.header("Authorization", token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    /// Register the generated test user and return its session token.
    pub async fn register_test_user(&self) -> String {
        let response = self.post_register(&self.test_user.credentials()).await;
        let body = envelope(response).await;
        assert_eq!(body["code"], 200, "registration failed: {body}");
        body["data"]
            .as_str()
            .expect("Token missing from registration response")
            .to_owned()
    }
}

pub async fn envelope(response: reqwest::Response) -> serde_json::Value {
    response
        .json()
        .await
        .expect("Response body was not a JSON envelope")
}

static TRACING: Lazy<()> = Lazy::new(|| {
    std::env::set_var("APP_TOKEN__SECRET", TEST_TOKEN_SECRET);
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber("test".into(), "debug".into(), std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber("test".into(), "debug".into(), std::io::sink);
        init_subscriber(subscriber);
    }
});

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let configuration = {
        let mut config = get_configuration().expect("Unable to read configuration files");
        // Use random os port
        config.application.port = 0;
        config.hashing = HashingSettings {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        };
        config
    };

    let app = Application::build_with_store(&configuration, Arc::new(InMemoryUserStore::new()))
        .expect("Failed to build application");
    let port = app.port();
    let address = format!("http://127.0.0.1:{}", port);
    let _ = tokio::spawn(app.run_until_stopped());

    TestApp {
        address,
        port,
        api_client: reqwest::Client::new(),
        test_user: TestUser::generate(),
    }
}
