//! fleetscaled — the fleetscale autoscaler daemon.
//!
//! Single binary that assembles every subsystem: config loading,
//! external collaborators, the cooldown store, the metrics sink, and
//! the periodic control loop.
//!
//! # Usage
//!
//! ```text
//! fleetscaled run
//! fleetscaled check-config
//! ```

mod orchestrator;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use fleetscale_clients::{HttpCloudMetricsClient, HttpPaasClient, HttpQueueClient, PgSqlClient};
use fleetscale_config::Collaborators;
use fleetscale_cooldown::RedbCooldownStore;
use fleetscale_core::{MetricsSink, NullSink, SystemClock};
use fleetscale_engine::{DecisionEngine, PeriodicRunner};
use fleetscale_metrics::StatsdSink;
use tracing::info;

use orchestrator::Orchestrator;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "fleetscaled", about = "Fleetscale autoscaler daemon")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the control loop (default).
    Run,
    /// Load and validate config, then exit.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run().await,
        Command::CheckConfig => check_config().await,
    }
}

async fn check_config() -> anyhow::Result<()> {
    let path = fleetscale_config::config_path();
    let raw = fleetscale_config::load_raw(&path)?;
    let collaborators = build_collaborators(&raw.general).await?;
    let (_general, _scalers_config, apps) = fleetscale_config::build(raw, &collaborators)?;
    info!(path, app_count = apps.len(), "config is valid");
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    info!("fleetscale autoscaler starting");

    let path = fleetscale_config::config_path();
    let raw = fleetscale_config::load_raw(&path)?;
    let collaborators = build_collaborators(&raw.general).await?;
    let (general, _scalers_config, apps) = fleetscale_config::build(raw, &collaborators)?;

    info!(app_count = apps.len(), interval = general.schedule_interval_seconds, "control loop configured");

    let decision_engine = DecisionEngine::new(
        Arc::new(RedbCooldownStore::open(std::path::Path::new("fleetscale-cooldown.redb"))?),
        collaborators.paas.clone(),
        collaborators.metrics.clone(),
        collaborators.clock.clone(),
        general.cooldown_seconds_after_scale_up,
        general.cooldown_seconds_after_scale_down,
    );

    let orchestrator = std::sync::Arc::new(tokio::sync::Mutex::new(Orchestrator {
        apps,
        paas: collaborators.paas.clone(),
        decision_engine,
        cf_org: general.cf_org.clone(),
        cf_space: general.cf_space.clone(),
    }));

    let runner = PeriodicRunner::new(collaborators.clock.clone(), general.schedule_interval_seconds);
    runner
        .run(move |sequence| {
            let orchestrator = std::sync::Arc::clone(&orchestrator);
            async move { orchestrator.lock().await.run_tick(sequence).await }
        })
        .await
}

async fn build_collaborators(general: &fleetscale_config::raw::RawGeneral) -> anyhow::Result<Collaborators> {
    let username = std::env::var("CF_USERNAME").unwrap_or_default();
    let password = std::env::var("CF_PASSWORD").unwrap_or_default();
    let aws_region = std::env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string());
    let database_url = std::env::var("SQLALCHEMY_DATABASE_URI").or_else(|_| database_url_from_vcap_services())?;

    let paas = Arc::new(HttpPaasClient::new(general.cf_api_url.clone(), username, password, DEFAULT_TIMEOUT));
    let cloud_metrics = Arc::new(HttpCloudMetricsClient::new("https://monitoring.amazonaws.com", aws_region, DEFAULT_TIMEOUT));
    let queue = Arc::new(HttpQueueClient::new(DEFAULT_TIMEOUT));
    let sql = Arc::new(PgSqlClient::connect(&database_url).await?);

    let metrics: Arc<dyn MetricsSink> = if general.statsd_enabled {
        let host = std::env::var("STATSD_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port: u16 = std::env::var("STATSD_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8125);
        let prefix = std::env::var("STATSD_PREFIX").unwrap_or_else(|_| "fleetscale".to_string());
        Arc::new(StatsdSink::new(&host, port, prefix)?)
    } else {
        Arc::new(NullSink)
    };

    Ok(Collaborators {
        paas,
        cloud_metrics,
        queue,
        sql,
        clock: Arc::new(SystemClock),
        metrics,
    })
}

fn database_url_from_vcap_services() -> Result<String, std::env::VarError> {
    let vcap = std::env::var("VCAP_SERVICES")?;
    let parsed: serde_json::Value = serde_json::from_str(&vcap).unwrap_or_default();
    let uri = parsed["postgres"][0]["credentials"]["uri"].as_str().unwrap_or_default().to_string();
    Ok(uri)
}
