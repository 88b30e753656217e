use crate::authentication::{
    reject_anonymous_users, CredentialService, PasswordHasher, TokenIssuer,
};
use crate::configuration::{DatabaseSettings, Settings};
use crate::routes::{
    delete_user, get_user_info, health_check, json_config, login, register, update_password,
};
use crate::store::{PostgresUserStore, UserStore};
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use actix_web_lab::middleware::from_fn;
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    /// Build against Postgres, applying pending migrations first.
    pub async fn build(settings: &Settings) -> Result<Self, anyhow::Error> {
        let store = PostgresUserStore::new(get_connection_pool(&settings.database));
        store.migrate().await?;
        Self::build_with_store(settings, Arc::new(store))
    }

    pub fn build_with_store(
        settings: &Settings,
        store: Arc<dyn UserStore>,
    ) -> Result<Self, anyhow::Error> {
        let issuer = TokenIssuer::from_settings(&settings.token)?;
        let hasher = PasswordHasher::new(&settings.hashing)?;
        let service = CredentialService::new(store, hasher);

        let address = format!(
            "{}:{}",
            settings.application.host, settings.application.port
        );
        let listener =
            TcpListener::bind(&address).with_context(|| format!("Failed to bind {address}"))?;
        let port = listener.local_addr()?.port();
        let server = run(listener, service, issuer)?;

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(settings: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(settings.with_db())
}

fn run(
    listener: TcpListener,
    service: CredentialService,
    issuer: TokenIssuer,
) -> Result<Server, std::io::Error> {
    // Wraps them in an Arc
    let service = web::Data::new(service);
    let issuer = web::Data::new(issuer);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(json_config())
            .app_data(service.clone())
            .app_data(issuer.clone())
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .route("/register", web::post().to(register))
                    .route("/login", web::post().to(login))
                    .service(
                        web::resource("/updatePassword")
                            .wrap(from_fn(reject_anonymous_users))
                            .route(web::post().to(update_password)),
                    )
                    .service(
                        web::resource("/getUserInfo")
                            .wrap(from_fn(reject_anonymous_users))
                            .route(web::get().to(get_user_info)),
                    )
                    .service(
                        web::resource("/deleteUser")
                            .wrap(from_fn(reject_anonymous_users))
                            .route(web::post().to(delete_user)),
                    ),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
