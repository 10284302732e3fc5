//! market-potential CLI — 提交、查询与校验地段市场潜力评分的命令行工具
//!
//! Usage:
//!   market-potential analyze <city> <sector>     Submit and resolve, print the record
//!   market-potential submit <city> <sector>      Print the deterministic id and status
//!   market-potential validate <city> <sector>    Run local and (when configured) remote input validation
//!   market-potential health                      Show configuration health

use anyhow::{bail, Context};
use market_potential::guardrails::ValidationVerdict;
use market_potential::{AppConfig, Orchestrator, OrchestratorBuilder};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, rest) = split_config_flag(&args);
    let Some(command) = rest.first() else {
        print_usage();
        std::process::exit(1);
    };

    let outcome = match command.as_str() {
        "analyze" => cmd_analyze(config_path, &rest[1..]).await,
        "submit" => cmd_submit(config_path, &rest[1..]).await,
        "validate" => cmd_validate(config_path, &rest[1..]).await,
        "health" => cmd_health(config_path).await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("market_potential=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!(
        r#"market-potential — 地段市场潜力评分工具

USAGE:
    market-potential [--config <file>] <COMMAND> [ARGS]

COMMANDS:
    analyze <city> <sector>     Submit, resolve and print the request record
    submit <city> <sector>      Print the deterministic request id and status
    validate <city> <sector>    Run local and, with an API key, remote input validation
    health                      Show whether the generation service is configured
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    GEMINI_API_KEY              Generation service key (GOOGLE_API_KEY also read)
    MP_CACHE_DIR                Directory for durable cache snapshots
    MP_CACHE_TTL_DAYS           Cache entry lifetime in days (default 30)
    MP_MODEL_CANDIDATES         Comma-separated model ids, tried in order
    MP_GENERATION_BASE_URL      Generation service base URL
    MP_HTTP_TIMEOUT_SECS        Per-request HTTP timeout (default 30)
    RUST_LOG                    Log filter (default market_potential=info)"#
    );
}

fn cmd_version() {
    println!("market-potential {}", env!("CARGO_PKG_VERSION"));
}

fn split_config_flag(args: &[String]) -> (Option<&str>, Vec<String>) {
    let mut config = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            config = iter.next().map(String::as_str);
        } else {
            rest.push(arg.clone());
        }
    }
    (config, rest)
}

fn load_config(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(p) => AppConfig::from_file(p)
            .with_context(|| format!("loading config from {p}"))?
            .with_env_overrides()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

async fn build(path: Option<&str>) -> anyhow::Result<Orchestrator> {
    let config = load_config(path)?;
    Ok(OrchestratorBuilder::from_config(&config)?.build().await?)
}

fn city_and_sector(args: &[String]) -> anyhow::Result<(&str, &str)> {
    match args {
        [city, sector, ..] => Ok((city.as_str(), sector.as_str())),
        _ => bail!("expected <city> <sector>"),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_analyze(config: Option<&str>, args: &[String]) -> anyhow::Result<()> {
    let (city, sector) = city_and_sector(args)?;
    let orchestrator = build(config).await?;
    let submitted = orchestrator.submit(city, sector)?;
    let record = orchestrator.fetch(&submitted.id).await?;
    orchestrator.flush().await;
    print_json(&record)?;
    if let Some(code) = record.error_code() {
        eprintln!("{}: {}", code, code.message());
    }
    Ok(())
}

async fn cmd_submit(config: Option<&str>, args: &[String]) -> anyhow::Result<()> {
    let (city, sector) = city_and_sector(args)?;
    let orchestrator = build(config).await?;
    print_json(&orchestrator.submit(city, sector)?)
}

async fn cmd_validate(config: Option<&str>, args: &[String]) -> anyhow::Result<()> {
    let (city, sector) = city_and_sector(args)?;
    let orchestrator = build(config).await?;

    print_json(&validate_only(&orchestrator, city, sector).await)
}

/// Input validation alone; ambiguity and analysis are never consulted.
async fn validate_only(orchestrator: &Orchestrator, city: &str, sector: &str) -> ValidationVerdict {
    let verdict = orchestrator.validator().validate(city, sector).await;
    orchestrator.flush().await;
    verdict
}

async fn cmd_health(config: Option<&str>) -> anyhow::Result<()> {
    let orchestrator = build(config).await?;
    print_json(&orchestrator.health())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_flag_is_pulled_out_of_any_position() {
        let raw = args(&["validate", "--config", "mp.yaml", "Pune", "Baner"]);
        let (config, rest) = split_config_flag(&raw);
        assert_eq!(config, Some("mp.yaml"));
        assert_eq!(rest, args(&["validate", "Pune", "Baner"]));
        assert!(city_and_sector(&rest[1..2]).is_err());
    }

    #[tokio::test]
    async fn test_validate_runs_only_the_validator() {
        let orchestrator = OrchestratorBuilder::new().build().await.unwrap();

        let rejected = validate_only(&orchestrator, "asdkjasdkj12345", "Baner").await;
        assert!(!rejected.is_valid);

        let open = validate_only(&orchestrator, "Pune", "Baner").await;
        assert!(open.is_valid);
        assert_eq!(open.reason, market_potential::guardrails::UNAVAILABLE_REASON);

        assert!(orchestrator.caches().ambiguity.is_empty());
        assert!(orchestrator.caches().analysis.is_empty());
        assert!(orchestrator.store().is_empty());
    }
}
