mod tui;

use farmdata::arms::ArmsClient;

fn main() -> anyhow::Result<()> {
    if std::env::var("ENV").ok().as_deref() != Some("prod") {
        dotenvy::dotenv().ok();
    }

    let client = ArmsClient::from_env()?;
    tui::run_tui(client).map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
