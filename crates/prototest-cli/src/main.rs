//! prototest CLI - generate HTTP protocol conformance tests from Smithy models

mod storage;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use prototest_codegen::{GenerateError, Generator};
use prototest_core::{Config, Model};

#[derive(Parser)]
#[command(name = "prototest")]
#[command(about = "Generate HTTP protocol conformance tests from Smithy models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "terminal")]
    output: OutputFormat,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate protocol test files
    Generate {
        /// Config file (default: prototest.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Smithy model, overrides `model` in the config
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Protocol to generate for; repeatable, overrides `protocols`
        #[arg(short, long = "protocol")]
        protocols: Vec<String>,

        /// Service shape id, overrides `service`
        #[arg(long)]
        service: Option<String>,

        /// Output directory, overrides `output_dir`
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Show the generation plan without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Initialize config file
    Init,

    /// Export JSON Schema for the fixture traits and the config file
    Schema,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Config file, then command-line overrides.
fn resolve_config(
    path: Option<&Path>,
    model: Option<PathBuf>,
    protocols: Vec<String>,
    service: Option<String>,
    output_dir: Option<PathBuf>,
) -> Result<Config> {
    let mut cfg = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if let Some(model) = model {
        cfg.model = model;
    }
    if !protocols.is_empty() {
        cfg.protocols = protocols;
    }
    if service.is_some() {
        cfg.service = service;
    }
    if let Some(output_dir) = output_dir {
        cfg.output_dir = output_dir;
    }
    Ok(cfg)
}

/// Generation defects are the model author's to fix; everything else is a tool error.
fn exit_code_for(err: &GenerateError) -> u8 {
    match err {
        GenerateError::Model(_) => 3,
        _ => 1,
    }
}

fn run(cli: Cli) -> Result<u8> {
    match cli.command {
        Commands::Generate {
            config,
            model,
            protocols,
            service,
            output_dir,
            dry_run,
        } => {
            let cfg = resolve_config(config.as_deref(), model, protocols, service, output_dir)?;
            let model = Model::load(&cfg.model)
                .with_context(|| format!("loading model {}", cfg.model.display()))?;
            let generator = Generator::new(cfg);

            // Dry run: show plan and exit
            if dry_run {
                let plan = generator.plan(&model)?;
                match cli.output {
                    OutputFormat::Terminal => println!("{}", plan.to_terminal()),
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
                }
                return Ok(if plan.has_errors() { 1 } else { 0 });
            }

            if generator.config().protocols.is_empty() {
                eprintln!("Error: no protocols configured. Pass --protocol or set `protocols`.");
                return Ok(3);
            }

            let files = match generator.generate_all(&model) {
                Ok(files) => files,
                Err(e) => {
                    eprintln!("Error: {e}");
                    return Ok(exit_code_for(&e));
                }
            };
            let written = storage::write_files(&generator.config().output_dir, &files)?;

            match cli.output {
                OutputFormat::Terminal => {
                    if written.is_empty() {
                        println!("No fixtures matched the configured protocols; nothing written.");
                    }
                    for (file, path) in files.iter().zip(&written) {
                        println!("{} -> {} ({} tests)", file.protocol, path.display(), file.tests);
                    }
                }
                OutputFormat::Json => {
                    let summary: Vec<_> = files
                        .iter()
                        .zip(&written)
                        .map(|(file, path)| {
                            serde_json::json!({
                                "protocol": file.protocol,
                                "path": path.display().to_string(),
                                "tests": file.tests,
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                }
            }
            Ok(0)
        }

        Commands::Init => {
            let config_path = "prototest.toml";
            if Path::new(config_path).exists() {
                eprintln!("{config_path} already exists");
                return Ok(1);
            }

            std::fs::write(config_path, Config::example())?;
            println!("Created {config_path}");
            println!("\nEdit the file to configure:");
            println!("  - model: path to the Smithy JSON AST");
            println!("  - protocols: protocol shape ids to generate for");
            println!("  - crate_name: the generated client under test");
            Ok(0)
        }

        Commands::Schema => {
            match cli.output {
                OutputFormat::Terminal => {
                    println!("{}", prototest_core::schema::generate_schema());
                }
                OutputFormat::Json => {
                    let both = serde_json::json!({
                        "fixtures": serde_json::from_str::<serde_json::Value>(
                            &prototest_core::schema::generate_schema()
                        )?,
                        "config": serde_json::from_str::<serde_json::Value>(
                            &prototest_core::schema::generate_config_schema()
                        )?,
                    });
                    println!("{}", serde_json::to_string_pretty(&both)?);
                }
            }
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_repeated_protocols() {
        let cli = Cli::try_parse_from([
            "prototest",
            "generate",
            "--protocol",
            "a#one",
            "-p",
            "b#two",
            "--dry-run",
            "--output",
            "json",
        ])
        .unwrap();
        assert!(cli.output == OutputFormat::Json);
        match cli.command {
            Commands::Generate {
                protocols, dry_run, ..
            } => {
                assert_eq!(protocols, vec!["a#one", "b#two"]);
                assert!(dry_run);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prototest.toml");
        std::fs::write(
            &path,
            "model = \"m.json\"\nprotocols = [\"a#one\"]\nservice = \"ex#Svc\"\n",
        )
        .unwrap();

        let cfg = resolve_config(Some(&path), None, Vec::new(), None, None).unwrap();
        assert_eq!(cfg.model, PathBuf::from("m.json"));
        assert_eq!(cfg.protocols, vec!["a#one"]);

        let cfg = resolve_config(
            Some(&path),
            Some("other.json".into()),
            vec!["b#two".into()],
            Some("ex#Other".into()),
            Some("out".into()),
        )
        .unwrap();
        assert_eq!(cfg.model, PathBuf::from("other.json"));
        assert_eq!(cfg.protocols, vec!["b#two"]);
        assert_eq!(cfg.service.as_deref(), Some("ex#Other"));
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn defects_and_tool_errors_have_distinct_exit_codes() {
        let defect = GenerateError::MissingExpectation {
            id: "X".into(),
            field: "uri",
        };
        assert_eq!(exit_code_for(&defect), 1);
        let tool = GenerateError::Model(prototest_core::ModelError::Service("none".into()));
        assert_eq!(exit_code_for(&tool), 3);
    }
}
