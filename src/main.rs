use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use data_health_engine::config::Config;
use data_health_engine::constants::{FAILED_RESULTS_FILE, PASSED_RESULTS_FILE, SUPPORTED_RULES};
use data_health_engine::infra::{source_for_path, FileValidationOutputAdapter, SourceRegistry};
use data_health_engine::{load_rule_spec, logging, observability, HealthStatus, SimpleRuleEngine, ValidateUseCase};

#[derive(Parser)]
#[command(name = "data-health")]
#[command(about = "Rule-based data validation: run a rule spec against a data source")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to $DATA_HEALTH_CONFIG or ./data-health.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a data source against a rule spec
    Validate {
        /// YAML rule spec
        #[arg(long)]
        spec: PathBuf,
        /// Read this file instead of the configured source (.csv, .jsonl, .ndjson)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Records per batch when reading --input
        #[arg(long)]
        batch_size: Option<usize>,
        /// Maximum number of batches to validate
        #[arg(long)]
        limit: Option<usize>,
        /// Directory for passed/failed result files
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Load a rule spec and build its rules without running them
    CheckSpec {
        #[arg(long)]
        spec: PathBuf,
    },
    /// List the built-in rule types
    ListRules,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::from(2);
        }
    };

    logging::init_logging(&config.engine.log_dir);

    if let Some(addr) = &config.engine.metrics_addr {
        match addr.parse() {
            Ok(addr) => observability::init_metrics(addr),
            Err(e) => warn!("Ignoring invalid metrics address '{}': {}", addr, e),
        }
    }

    let outcome = match cli.command {
        Commands::Validate {
            spec,
            input,
            batch_size,
            limit,
            output_dir,
            format,
        } => run_validate(&config, spec, input, batch_size, limit, output_dir, format).await,
        Commands::CheckSpec { spec } => check_spec(&config, spec),
        Commands::ListRules => {
            println!("Supported rule types:");
            for (name, summary) in SUPPORTED_RULES {
                println!("   {:<16} {}", name, summary);
            }
            Ok(ExitCode::SUCCESS)
        }
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("❌ {:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn run_validate(
    config: &Config,
    spec_path: PathBuf,
    input: Option<PathBuf>,
    batch_size: Option<usize>,
    limit: Option<usize>,
    output_dir: Option<PathBuf>,
    format: ReportFormat,
) -> anyhow::Result<ExitCode> {
    let spec = load_rule_spec(&spec_path)?;
    info!(spec = %spec_path.display(), data_source = %spec.data_source, "Loaded rule spec");

    let source = match input {
        Some(path) => source_for_path(&spec.data_source, &path, batch_size)?,
        None => SourceRegistry::from_configs(&config.sources)?.get(&spec.data_source)?,
    };

    // Build rules before the outputs truncate the previous run's files
    let engine = SimpleRuleEngine::new(spec.build_rules(config.engine.sample_limit)?);

    let output_dir = output_dir.unwrap_or_else(|| config.engine.output_dir.clone());
    let passed_output = FileValidationOutputAdapter::new(output_dir.join(PASSED_RESULTS_FILE))?;
    let failed_output = FileValidationOutputAdapter::new(output_dir.join(FAILED_RESULTS_FILE))?;
    info!(
        passed = %passed_output.file_path().display(),
        failed = %failed_output.file_path().display(),
        rules = engine.rule_count(),
        "Writing validation results"
    );

    let use_case = ValidateUseCase::new(Box::new(engine), Box::new(passed_output), Box::new(failed_output))
        .with_spec_version(&spec.version);

    let report = use_case.run(source.as_ref(), limit).await?;

    match format {
        ReportFormat::Text => println!("{}", report.render_text()),
        ReportFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(match report.health_status() {
        HealthStatus::Unhealthy => ExitCode::FAILURE,
        HealthStatus::Healthy | HealthStatus::Degraded => ExitCode::SUCCESS,
    })
}

fn check_spec(config: &Config, spec_path: PathBuf) -> anyhow::Result<ExitCode> {
    let spec = load_rule_spec(&spec_path)?;
    let engine = SimpleRuleEngine::new(spec.build_rules(config.engine.sample_limit)?);

    println!(
        "✅ {} is valid (version {}, data source '{}', {} rules)",
        spec_path.display(),
        spec.version,
        spec.data_source,
        engine.rule_count()
    );
    for rule in engine.rules() {
        println!("   - {}: {}", rule.rule_id(), rule.description());
    }
    Ok(ExitCode::SUCCESS)
}
