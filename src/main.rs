//! Binary entry point: the input-acquisition and presentation collaborator
//! around the `log-triage` core.
//!
//! Usage:
//! `droidlog-ai-backend <logfile> [--levels error,warning] [--model <id>] [--no-ai]`
//! `droidlog-ai-backend --health`

use std::error::Error;
use std::process::ExitCode;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use log_triage::{AnalysisRequest, all_real_levels, analyze, parse_level_set, run_analysis};

const USAGE: &str =
    "usage: droidlog-ai-backend <logfile> [--levels e,w,...] [--model <id>] [--no-ai] | --health";

struct CliArgs {
    log_path: Option<String>,
    levels: Option<String>,
    model: Option<String>,
    no_ai: bool,
    health: bool,
}

fn parse_args() -> Result<CliArgs, String> {
    let mut log_path = None;
    let mut levels = None;
    let mut model = None;
    let mut no_ai = false;
    let mut health = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--levels" => {
                levels = Some(args.next().ok_or("--levels requires a value")?);
            }
            "--model" => {
                model = Some(args.next().ok_or("--model requires a value")?);
            }
            "--no-ai" => no_ai = true,
            "--health" => health = true,
            _ if arg.starts_with("--") => return Err(format!("unknown flag: {arg}")),
            _ if log_path.is_none() => log_path = Some(arg),
            _ => return Err(format!("unexpected argument: {arg}")),
        }
    }

    Ok(CliArgs {
        log_path,
        levels,
        model,
        no_ai,
        health,
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // Load environment variables from .env when present; a missing file is
    // fine, the environment may already be populated.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,log_triage=debug"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(ai_summary_service::telemetry::layer())
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return Ok(ExitCode::from(2));
        }
    };

    // Standalone connectivity check: probe the configured providers and exit.
    if args.health {
        let svc = ai_summary_service::config::default_config::summarizer_profiles_from_env()?;
        let mut all_ok = true;
        for status in svc.health_all().await {
            let model = status.model.unwrap_or_default();
            let verdict = if status.ok { "ok" } else { "FAIL" };
            println!(
                "{:<7} {:<24} {:>6}ms  {}  {}",
                status.provider, model, status.latency_ms, verdict, status.message
            );
            all_ok &= status.ok;
        }
        return Ok(if all_ok {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let log_path = match args.log_path {
        Some(path) => path,
        None => {
            eprintln!("{USAGE}");
            return Ok(ExitCode::from(2));
        }
    };

    // Best-effort UTF-8: invalid byte sequences are replaced, never fatal.
    let bytes = std::fs::read(&log_path)?;
    let raw_text = String::from_utf8_lossy(&bytes).into_owned();
    tracing::info!(path = %log_path, chars = raw_text.len(), "loaded log file");

    let selected_levels = match &args.levels {
        Some(spec) => parse_level_set(spec)?,
        None => all_real_levels(),
    };

    let request = AnalysisRequest {
        raw_text,
        selected_levels,
        model_choice: args.model.clone(),
    };

    let (outcome, ai_summary, ai_error) = if args.no_ai {
        (analyze(&request)?, None, None)
    } else {
        let svc = ai_summary_service::config::default_config::summarizer_profiles_from_env()?;
        let report = run_analysis(&svc, request).await?;
        (report.outcome, Some(report.ai_summary), report.ai_error)
    };

    println!("{}", outcome.local_report);

    if let Some(unfiltered) = &outcome.needs_attention {
        println!(
            "NOTE: no Android severity markers were found; the level filter was \
             ignored and all {} detected entries are shown above.",
            unfiltered.len()
        );
    }

    if let Some(summary) = ai_summary {
        println!("\nAI summary\n----------\n{summary}");
        if let Some(err) = ai_error {
            eprintln!("summarizer error: {err}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
