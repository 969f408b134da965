use anyhow::Result;
use clap::Parser;
use lambda_runtime::{LambdaEvent, service_fn};
use pi_archiver::aws::AwsBackend;
use pi_archiver::config::{AppConfig, EntryMode};
use pi_archiver::handler::{TriggerHandler, execute_plan};
use pi_archiver::ports::SystemClock;
use pi_archiver::request::TriggerRequest;
use pi_archiver::{cli, version};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

fn init_tracing(mode: EntryMode) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match mode {
        // The function log service stamps every line itself.
        EntryMode::Function => tracing_subscriber::fmt()
            .json()
            .without_time()
            .with_env_filter(filter)
            .init(),
        EntryMode::CommandLine => tracing_subscriber::fmt()
            .with_timer(LocalTimer)
            .with_env_filter(filter)
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mode = EntryMode::detect();
    init_tracing(mode);
    tracing::info!(version = %version::banner(), mode = ?mode, "starting");

    match mode {
        EntryMode::Function => run_function().await,
        EntryMode::CommandLine => run_command_line().await,
    }
}

async fn run_function() -> Result<()> {
    let config = Arc::new(AppConfig::load(None)?);
    let handler = TriggerHandler::new(Arc::new(AwsBackend), config, Arc::new(SystemClock));
    lambda_runtime::run(service_fn(move |event: LambdaEvent<TriggerRequest>| {
        let handler = handler.clone();
        async move { Ok::<_, lambda_runtime::Error>(handler.handle(event.payload).await) }
    }))
    .await
    .map_err(|e| anyhow::anyhow!("function runtime: {}", e))
}

async fn run_command_line() -> Result<()> {
    let args = cli::Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;
    let plan = args.resolve(chrono::Utc::now(), &config.extraction)?;
    tracing::info!(
        region = %plan.region,
        start = %plan.start,
        end = %plan.end,
        modes = ?plan.modes,
        "extracting"
    );

    match execute_plan(&AwsBackend, &config, &plan).await {
        Ok(summary) => {
            tracing::info!(
                uploaded = summary.uploaded.len(),
                skipped_instances = summary.skipped_instances,
                api_calls = summary.api_calls,
                "done"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            Err(e.into())
        }
    }
}
