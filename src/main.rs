use account_service::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use anyhow::Context;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("account_service".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let settings = get_configuration().context("Unable to read configuration files")?;
    let application = Application::build(&settings).await?;
    tracing::info!(port = application.port(), "Account service listening");
    application.run_until_stopped().await?;
    Ok(())
}
