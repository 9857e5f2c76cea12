//! Command implementations

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::adapters::toml_config::{ClipperConfig, TomlConfigAdapter};
use crate::app::{AppContainer, CancelFlag, DefaultAppContainer, ManifestSource};
use crate::cli::args::{CheckArgs, PlanArgs, RunArgs};
use crate::config_initialization::initialize_configuration_hierarchy;
use crate::domain::model::{ClipRequest, RunReport, RunState};
use crate::domain::rules::OutputNamer;
use crate::error::{ClipperError, ClipperResult};
use crate::manifest::ManifestReader;
use crate::output::writer::PlannedClip;
use crate::output::ReportWriter;

/// Execute the run command
pub async fn run(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    let config = initialize_configuration_hierarchy(config_path, &args.overrides)?;
    info!(
        source = %args.source,
        manifest = %args.manifest.display(),
        output_dir = %config.output_dir.display(),
        duration = config.clip_duration,
        "Starting run command"
    );

    let container = DefaultAppContainer::new(&config).context("Failed to set up the pipeline")?;
    let interactor = container.batch_interactor();

    let cancel = CancelFlag::new();
    let watcher = spawn_interrupt_watcher(cancel.clone());

    let report = interactor
        .execute(&args.source, ManifestSource::Path(args.manifest.clone()), &cancel)
        .await;
    watcher.abort();

    let mut stdout = std::io::stdout().lock();
    ReportWriter::new(args.format).write_report(&report, &mut stdout)?;
    stdout.flush()?;

    verdict(&report, args.strict)?;
    Ok(())
}

/// Execute the plan command
pub async fn plan(args: PlanArgs, config_path: Option<&Path>) -> Result<()> {
    let config = initialize_configuration_hierarchy(config_path, &args.overrides)?;
    info!(manifest = %args.manifest.display(), "Planning run");

    let bytes = tokio::fs::read(&args.manifest)
        .await
        .with_context(|| format!("Failed to read manifest {}", args.manifest.display()))?;
    let manifest = ManifestReader::parse(&bytes)?;

    let planned = plan_outputs(&config, manifest.requests);

    let mut stdout = std::io::stdout().lock();
    ReportWriter::new(args.format).write_plan(&planned, &manifest.skipped, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Execute the check command
pub async fn check(args: CheckArgs, config_path: Option<&Path>) -> Result<()> {
    let config = initialize_configuration_hierarchy(config_path, &args.overrides)?;
    let container = DefaultAppContainer::new(&config)?;

    let resolve_port = container.resolve_port();
    let transcode_port = container.transcode_port();
    let probes = [
        (resolve_port.tool_name().to_string(), resolve_port.probe_tool().await),
        (transcode_port.tool_name().to_string(), transcode_port.probe_tool().await),
    ];

    let mut missing = Vec::new();
    println!("Tool Check");
    println!("==========");
    for (tool, probe) in &probes {
        match probe {
            Ok(version) => {
                info!(tool = %tool, version = %version, "Tool available");
                println!("  ok       {}: {}", tool, version);
            }
            Err(e) => {
                error!(tool = %tool, error = %e, "Tool unavailable");
                println!("  missing  {}: {}", tool, e);
                missing.push(tool.clone());
            }
        }
    }

    if args.show_config {
        println!();
        println!("Effective Configuration");
        println!("=======================");
        print!("{}", TomlConfigAdapter::to_toml(&config)?);
    }

    if !missing.is_empty() {
        return Err(ClipperError::RunAborted {
            message: format!("required tool(s) unavailable: {}", missing.join(", ")),
        }
        .into());
    }
    Ok(())
}

fn plan_outputs(
    config: &ClipperConfig,
    requests: Vec<ClipRequest>,
) -> Vec<PlannedClip> {
    let mut namer = OutputNamer::new(&config.output_dir, &config.container_extension);
    requests
        .into_iter()
        .map(|request| {
            let output_path = namer.assign(&request);
            PlannedClip {
                request,
                output_path,
            }
        })
        .collect()
}

/// Flip the cancel flag on Ctrl-C; rows stop before their next attempt
fn spawn_interrupt_watcher(cancel: CancelFlag) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, no new clip or fallback attempt will start");
                cancel.cancel();
            }
            Err(e) => warn!(error = %e, "Could not listen for interrupts"),
        }
    })
}

/// Map a finished run to the process outcome
fn verdict(report: &RunReport, strict: bool) -> ClipperResult<()> {
    if report.state == RunState::AbortedMissingTool {
        return Err(ClipperError::RunAborted {
            message: report.fatal.clone().unwrap_or_default(),
        });
    }
    if let Some(fatal) = &report.fatal {
        return Err(ClipperError::RunFailed {
            message: fatal.clone(),
        });
    }

    let counts = report.counts();
    if strict && (counts.failed > 0 || counts.skipped > 0 || counts.not_attempted > 0) {
        return Err(ClipperError::IncompleteRun {
            failed: counts.failed,
            skipped: counts.skipped,
            not_attempted: counts.not_attempted,
        });
    }
    Ok(())
}
