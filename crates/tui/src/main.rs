mod app;
mod client;
mod config;
mod error;
mod logging;
mod session;
#[cfg(test)]
mod testing;
mod ui;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    logging::init(&config)?;
    tracing::info!(base_url = %config.base_url, "starting");

    let mut app = app::App::new(config)?;
    let result = app.run().await;
    if let Err(err) = &result {
        tracing::error!("terminated: {err}");
    }
    result
}
