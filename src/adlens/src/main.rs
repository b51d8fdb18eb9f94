//! adlens — weekly ad creative reconciliation and analysis task writer.
//!
//! Reads an already-fetched weekly report document, maps every spending ad
//! set to its creative, and writes the files consumed by the analysis agent.

use std::path::{Path, PathBuf};

use adlens_core::config::AppConfig;
use adlens_core::types::ReportData;
use adlens_reconciler::{ReconcileOutput, Reconciler};
use adlens_reporting::analysis_task::{
    copy_analysis_skeletons, creative_analysis_skeletons, AnalysisTask, ResultTemplate,
    TaskFileSet,
};
use adlens_reporting::{extract_ad_copies, generate_weekly_insights, AlertEngine, UploadPlan};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "adlens")]
#[command(about = "Match spending ad sets to creatives and prepare weekly analysis tasks")]
#[command(version)]
struct Cli {
    /// Optional TOML config file
    #[arg(long, global = true, env = "ADLENS_CONFIG")]
    config: Option<String>,

    /// Maximum media references per ad (overrides config)
    #[arg(long, global = true)]
    max_media: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print match results and summary as JSON
    Reconcile {
        /// Weekly report document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write the analysis task, insights, skeletons and result template
    Analyze {
        /// Weekly report document
        #[arg(short, long)]
        input: PathBuf,

        /// Task file path (default: <out-dir>/ai_analysis_task_<start_date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for the generated files (overrides config)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Print threshold alerts for the report
    Alerts {
        /// Weekly report document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the rows and media object keys a storage upload would write
    PlanUpload {
        /// Weekly report document
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adlens=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_some() => {
            return Err(e).with_context(|| format!("loading config {:?}", cli.config));
        }
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        }
    };
    if let Some(max_media) = cli.max_media {
        config.reconciler.max_media_refs = max_media;
    }
    config.validate()?;

    info!(
        max_media_refs = config.reconciler.max_media_refs,
        keywords = config.reconciler.keywords.len(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Reconcile { input } => {
            let report = load_report(&input).await?;
            let output = reconcile(&config, &report)?;
            print_json(&output)
        }
        Commands::Analyze {
            input,
            output,
            out_dir,
        } => {
            let out_dir = out_dir.unwrap_or_else(|| PathBuf::from(&config.output.dir));
            cmd_analyze(&config, &input, output, &out_dir).await
        }
        Commands::Alerts { input } => {
            let report = load_report(&input).await?;
            print_json(&AlertEngine::new(config.alerts.clone()).evaluate(&report))
        }
        Commands::PlanUpload { input } => {
            let report = load_report(&input).await?;
            let output = reconcile(&config, &report)?;
            let plan = UploadPlan::build(report.week(), &output.results);
            print_json(&serde_json::json!({
                "ad_creatives": plan,
                "ad_copies": extract_ad_copies(&report.ad_creatives),
            }))
        }
    }
}

async fn cmd_analyze(
    config: &AppConfig,
    input: &Path,
    output: Option<PathBuf>,
    out_dir: &Path,
) -> anyhow::Result<()> {
    let mut report = load_report(input).await?;
    let reconciled = reconcile(config, &report)?;

    let week = report.week();
    let task = AnalysisTask::for_report(&report, &reconciled.results)
        .map(|task| task.localized(config.output.analysis_locale));
    let Some(task) = task else {
        bail!("no ad set with spend in {}", input.display());
    };

    if report.alerts.is_empty() {
        report.alerts = AlertEngine::new(config.alerts.clone()).evaluate(&report);
    }
    let insights = generate_weekly_insights(&report);
    let creatives = creative_analysis_skeletons(&task.creatives);
    let copies = copy_analysis_skeletons(&task.creatives);
    let template = ResultTemplate::new(&task, creatives.clone(), copies.clone(), insights.clone());

    let mut files = TaskFileSet::for_week(out_dir, week);
    if let Some(task_path) = output {
        files = files.with_task_path(task_path);
    }

    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("creating {}", out_dir.display()))?;
    write_json(&files.task, &task).await?;
    write_json(&files.insights, &insights).await?;
    write_json(&files.creatives, &creatives).await?;
    write_json(&files.copies, &copies).await?;
    write_json(&files.result, &template).await?;

    info!(
        task_id = %task.task_id,
        report_date = %task.report_date,
        week = %week,
        ads = task.total_ads,
        creatives = creatives.len(),
        copies = copies.len(),
        matched = reconciled.summary.matched,
        unmatched = reconciled.summary.unmatched,
        "Analysis task written"
    );
    for path in files.all() {
        println!("{}", path.display());
    }
    Ok(())
}

async fn load_report(path: &Path) -> anyhow::Result<ReportData> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let report: ReportData =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    report.validate()?;

    if !report.is_weekly() {
        warn!(
            mode = report.mode.as_deref().unwrap_or("unknown"),
            "Report is not a weekly report"
        );
    }
    info!(
        adsets = report.meta_adsets.len(),
        creatives = report.ad_creatives.len(),
        "Report loaded"
    );
    Ok(report)
}

fn reconcile(config: &AppConfig, report: &ReportData) -> anyhow::Result<ReconcileOutput> {
    let reconciler = Reconciler::new(config.reconciler.clone());
    Ok(reconciler.reconcile(&report.meta_adsets, &report.ad_creatives)?)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
