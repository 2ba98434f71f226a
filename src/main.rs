use anyhow::Context;
use clap::Parser;
use cdm_simulator::adapters::outbound::init_combined_logger;
use cdm_simulator::application::SimulationService;
use cdm_simulator::cli::SimulatorArgs;
use cdm_simulator::domains::simulation::WallClock;
use cdm_simulator::Config;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = SimulatorArgs::parse();

    // Only the tracing dispatcher is installed here; the `log` facade stays
    // free for the fast_log file logger.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install tracing subscriber")?;

    info!("Starting CDM simulator");

    let config = match &args.scenario {
        Some(path) => Config::from_file(path).await?,
        None => {
            info!("No scenario file given, using the built-in scenario");
            Config::default()
        }
    };
    config.validate().context("Invalid scenario")?;

    let logger = init_combined_logger(config.log_file.as_deref(), Vec::new());

    let service = SimulationService::new(config, logger);
    let mode = service.collector_mode(args.dry_run)?;
    let collector = service.collector(&mode)?;
    let mut simulation = service.build(collector, Box::new(WallClock::new()), StdRng::from_entropy())?;

    info!("Registering antennas and logging data");
    let outcome = tokio::select! {
        result = simulation.run_forever() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    let stats = simulation.stats();
    info!(
        ticks = stats.ticks,
        delivered = stats.delivered,
        dropped = stats.dropped,
        "Shutting down CDM simulator"
    );

    if let Some(result) = outcome {
        result.context("Simulation stopped")?;
    }
    Ok(())
}
