//! ingress-capture: render request capture rules for a set of ingresses
//!
//! Reads a manifest of ingresses and frontends, runs one reconciliation
//! pass and prints the pending rules, the modified map files and the
//! updated frontends as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Run a pass over a manifest
//! ingress-capture -c /etc/ingress-capture/config.json -m manifest.json
//!
//! # With environment overrides
//! INGRESS_CAPTURE_LOG_LEVEL=debug ingress-capture -m manifest.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use ingress_capture::config::{
    create_default_config, load_config_with_env, load_default_with_env, Config,
};
use ingress_capture::pass::{load_manifest, run_pass};

/// Command-line arguments
struct Args {
    /// Configuration file path
    config_path: PathBuf,
    /// Manifest file path
    manifest_path: Option<PathBuf>,
    /// Generate default configuration
    generate_config: bool,
    /// Check configuration only
    check_config: bool,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut config_path = PathBuf::from("/etc/ingress-capture/config.json");
        let mut manifest_path = None;
        let mut generate_config = false;
        let mut check_config = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-c" | "--config" => {
                    if let Some(path) = args.next() {
                        config_path = PathBuf::from(path);
                    }
                }
                "-m" | "--manifest" => {
                    manifest_path = args.next().map(PathBuf::from);
                }
                "-g" | "--generate-config" => {
                    generate_config = true;
                }
                "--check" => {
                    check_config = true;
                }
                "-h" | "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "-v" | "--version" => {
                    println!("ingress-capture v{}", ingress_capture::VERSION);
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {arg}");
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        Self {
            config_path,
            manifest_path,
            generate_config,
            check_config,
        }
    }
}

fn print_help() {
    println!(
        r#"ingress-capture v{}

Render HAProxy request capture rules for ingress resources.

USAGE:
    ingress-capture [OPTIONS]

OPTIONS:
    -c, --config <PATH>     Configuration file path [default: /etc/ingress-capture/config.json]
    -m, --manifest <PATH>   Manifest with ingresses and frontends (JSON)
    -g, --generate-config   Generate default configuration and exit
    --check                 Check configuration and exit
    -h, --help              Print help information
    -v, --version           Print version information

ENVIRONMENT:
    INGRESS_CAPTURE_MAP_DIR       Override map file directory
    INGRESS_CAPTURE_LOG_LEVEL     Override log level (trace, debug, info, warn, error)
    INGRESS_CAPTURE_DEFAULT_LEN   Override default capture length
"#,
        ingress_capture::VERSION
    );
}

/// Initialize logging
fn init_logging(config: &Config) {
    let level = match config.log.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // stdout carries the JSON report
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.log.target)
        .with_writer(std::io::stderr);

    if config.log.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Load the manifest, run one pass and print the report
fn run(args: &Args, config: &Config) -> ingress_capture::error::Result<()> {
    let Some(manifest_path) = &args.manifest_path else {
        warn!("No manifest given, nothing to do");
        return Ok(());
    };

    let manifest = load_manifest(manifest_path)?;
    let report = run_pass(config, &manifest)?;
    for warning in &report.warnings {
        warn!("{}", warning);
    }
    info!(
        http_rules = report.rules.http_requests.len(),
        tcp_rules = report.rules.tcp_requests.len(),
        map_files = report.map_files.len(),
        "Pass complete"
    );

    let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
    println!("{json}");
    Ok(())
}

/// Config file if present, otherwise defaults; env overrides apply to both
fn load(args: &Args) -> ingress_capture::error::Result<Config> {
    let config = if args.config_path.exists() {
        load_config_with_env(&args.config_path)?
    } else {
        load_default_with_env()?
    };
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.generate_config {
        create_default_config(&args.config_path)?;
        println!("Generated default configuration at {:?}", args.config_path);
        return Ok(());
    }

    let config = load(&args)
        .with_context(|| format!("Failed to load configuration from {:?}", args.config_path))?;

    if args.check_config {
        println!("Configuration is valid");
        return Ok(());
    }

    init_logging(&config);

    info!("ingress-capture v{}", ingress_capture::VERSION);

    run(&args, &config).context("Capture pass failed")
}
