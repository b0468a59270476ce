use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use sinag::assessment::batch::{BatchReport, BatchRevalidator};
use sinag::assessment::calculation::{
    CalculationEngine, CalculationOutcome, CalculationSchema, FieldResponses,
};
use sinag::assessment::indicator::{
    indicator_router, InMemoryIndicatorRepository, IndicatorValidationService,
};
use sinag::config::AppConfig;
use sinag::error::AppError;
use sinag::telemetry;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "sinag",
    about = "Run the SINAG indicator validation service and calculation tooling",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate calculation schemas from the command line
    Calculation {
        #[command(subcommand)]
        command: CalculationCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum CalculationCommand {
    /// Evaluate one schema against one set of responses and print the trace
    Test(TestArgs),
    /// Re-validate a CSV export of submitted responses against one schema
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct TestArgs {
    /// Path to the calculation schema JSON
    #[arg(long)]
    schema: PathBuf,
    /// Path to the submitted responses JSON (field id -> value)
    #[arg(long)]
    responses: PathBuf,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Path to the calculation schema JSON
    #[arg(long)]
    schema: PathBuf,
    /// Path to the responses CSV export
    #[arg(long)]
    csv: PathBuf,
    /// Print one line per submission in addition to the summary
    #[arg(long)]
    list_rows: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Calculation {
            command: CalculationCommand::Test(args),
        } => run_calculation_test(args),
        Command::Calculation {
            command: CalculationCommand::Batch(args),
        } => run_calculation_batch(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let repository = Arc::new(InMemoryIndicatorRepository::default());
    let service = Arc::new(IndicatorValidationService::new(repository));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(indicator_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "indicator validation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn load_schema(path: &Path) -> Result<CalculationSchema, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn run_calculation_test(args: TestArgs) -> Result<(), AppError> {
    let schema = load_schema(&args.schema)?;
    let raw = std::fs::read_to_string(&args.responses)?;
    let responses: FieldResponses = serde_json::from_str(&raw)?;

    let outcome = CalculationEngine::new(schema).evaluate(&responses)?;
    render_calculation_outcome(&outcome);
    Ok(())
}

fn run_calculation_batch(args: BatchArgs) -> Result<(), AppError> {
    let schema = load_schema(&args.schema)?;
    let report = BatchRevalidator::from_path(&schema, &args.csv)?;
    render_batch_report(&report, args.list_rows);
    Ok(())
}

fn render_calculation_outcome(outcome: &CalculationOutcome) {
    println!("Calculation test");
    println!(
        "Overall: {} -> status {}",
        if outcome.passed { "passed" } else { "failed" },
        outcome.status.label()
    );

    for (index, group) in outcome.groups.iter().enumerate() {
        println!(
            "\nGroup {} ({}): {}",
            index + 1,
            group.operator.label(),
            if group.passed { "passed" } else { "failed" }
        );
        for rule in &group.rules {
            println!(
                "- [{}] {} on '{}': {} (resolved {})",
                rule.verdict.label(),
                rule.rule_type,
                rule.field_id,
                rule.detail,
                rule.resolved
            );
        }
    }

    let rejected = outcome.rejected_inputs();
    if !rejected.is_empty() {
        println!("\nRejected inputs (fix the submission, not the schema)");
        for rule in rejected {
            println!("- '{}': {}", rule.field_id, rule.detail);
        }
    }
}

fn render_batch_report(report: &BatchReport, list_rows: bool) {
    println!("Batch re-validation");
    println!(
        "{} submissions: {} passed, {} failed ({} with rejected inputs)",
        report.total, report.passed, report.failed, report.rejected_inputs
    );

    if list_rows {
        println!("\nPer-submission results");
        for row in &report.rows {
            let rejected_note = if row.rejected_field_ids.is_empty() {
                String::new()
            } else {
                format!(" (rejected: {})", row.rejected_field_ids.join(", "))
            };
            println!(
                "- {} | {}{}",
                row.submission_id,
                row.status.label(),
                rejected_note
            );
        }
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
