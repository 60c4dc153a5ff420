use tubely_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (datastore, storage, pipelines, routes)
    let (_state, router) = tubely_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    tubely_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
