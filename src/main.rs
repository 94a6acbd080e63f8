use std::{net::TcpListener, sync::Arc};

use env_logger::Env;
use ownerscope::{
    configuration::get_configuration,
    services::{BatchOrchestrator, DuckDuckGoScraper, OpenaiClient, OwnershipAnalyzer},
    startup::run,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;

    let search_provider = DuckDuckGoScraper::new(&configuration.search)
        .expect("Failed to build search client.");
    let openai_client = OpenaiClient::new(&configuration.model);
    log::info!(
        "Using model {} with {} workers",
        configuration.model.model_name(),
        configuration.pipeline.pool_size
    );

    let analyzer = OwnershipAnalyzer::new(
        Arc::new(search_provider),
        Arc::new(openai_client),
        &configuration.search,
        &configuration.pipeline,
    );
    let orchestrator = BatchOrchestrator::new(Arc::new(analyzer), configuration.pipeline.pool_size);

    run(
        listener,
        orchestrator,
        configuration.application.max_payload_bytes,
    )?
    .await
}
