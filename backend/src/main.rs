use farmdata::arms::ArmsClient;
use farmdata_backend::routes::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // initialize tracing
    tracing_subscriber::fmt::init();
    if std::env::var("ENV").ok().as_deref() != Some("prod") {
        dotenvy::dotenv().ok();
    }

    // missing USDA_API_KEY is fatal, before any network activity
    let client = ArmsClient::from_env()?;
    let state = AppState { client };

    let app = routes::app().with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
    tracing::info!("Listening on 8080");
    axum::serve(listener, app).await?;
    Ok(())
}
