use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::FmtSubscriber;
use client::client::Client;
use client::config::ClientConfig;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::TRACE)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let config = match ClientConfig::load("lana.toml") {
        Ok(config) => config,
        Err(e) => {
            error!("Cannot load lana.toml: {e}");
            return;
        }
    };

    let client = match Client::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Cannot create the client: {e}");
            return;
        }
    };

    match client.current_user().await {
        Ok(me) => {
            info!("Mention: {}", me.mention());
            info!("Avatar: {}", me.display_avatar());
            info!("Account created at {}", me.created_at());
            info!("Friends cached: {}", me.friends().len());
        }
        Err(e) => error!("Cannot fetch the current user: {e}"),
    }

    client.close();
}
