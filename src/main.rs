//! wfsetup CLI Entry Point
//!
//! Compiles a workflow XML file and reports what it describes.
//!
//! # Usage
//!
//! ```bash
//! # Compile and summarize a workflow
//! wfsetup montage.xml
//!
//! # Also write the compiled graph as YAML
//! wfsetup montage.xml --emit montage.yaml
//!
//! # List replica sites from a site file
//! wfsetup montage.xml --sites sites.xml
//! ```

use std::env;
use std::process::ExitCode;

use colored::Colorize;
use log::{error, info};

use wfsetup::workflow::parser::{load_workflow, save_workflow};
use wfsetup::workflow::sites::load_sites;
use wfsetup::workflow::validator::quick_validate;
use wfsetup::workflow::{CompiledDocument, RelationType, Workflow};
use wfsetup::{APP_NAME, VERSION};

/// Command-line configuration parsed from arguments.
#[derive(Debug, Default)]
struct Config {
    workflow_path: Option<String>,
    sites_path: Option<String>,
    emit_path: Option<String>,
    verbose: bool,
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: wfsetup [OPTIONS] <WORKFLOW_XML>");
    println!();
    println!("Arguments:");
    println!("  <WORKFLOW_XML>      Workflow description to compile");
    println!();
    println!("Options:");
    println!("  --emit FILE         Write the compiled workflow (YAML for .yaml/.yml, JSON otherwise)");
    println!("  --sites FILE        List the replica sites declared in FILE");
    println!("  --verbose           Enable debug logging");
    println!("  --help              Show this help message");
    println!("  --version           Show version information");
}

/// Parses command-line arguments into a Config struct.
fn parse_arguments(args: &[String]) -> Result<Config, String> {
    let mut config = Config::default();
    let mut i = 1; // Skip program name

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", APP_NAME, VERSION);
                std::process::exit(0);
            }
            "--verbose" | "-v" => {
                config.verbose = true;
            }
            "--emit" | "--sites" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| format!("{} requires a file argument", arg))?
                    .clone();
                if arg == "--emit" {
                    config.emit_path = Some(value);
                } else {
                    config.sites_path = Some(value);
                }
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                if config.workflow_path.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                config.workflow_path = Some(arg.clone());
            }
        }
        i += 1;
    }

    if config.workflow_path.is_none() {
        return Err("No workflow file given".to_string());
    }

    Ok(config)
}

/// Prints activities, relations and fields of a compiled workflow.
fn print_summary(compiled: &CompiledDocument) {
    let workflow: &Workflow = &compiled.workflow;

    println!();
    println!(
        "{} {} ({} activities)",
        "Workflow".bold(),
        workflow.tag.cyan(),
        workflow.len()
    );
    if let Some(description) = &workflow.description {
        println!("  {}", description.dimmed());
    }

    for activity in workflow.activities() {
        println!(
            "  {} {} [{}] workload {}",
            "-".dimmed(),
            activity.tag.bold(),
            activity.kind,
            activity.workload
        );

        let relations = [RelationType::Input, RelationType::Output]
            .into_iter()
            .flat_map(|kind| activity.relations(kind));
        for relation in relations {
            let dependency = workflow
                .dependency_of(relation)
                .map(|dep| format!(" <- {}", dep.tag))
                .unwrap_or_default();
            let fields: Vec<&str> = relation.fields.iter().map(|f| f.name.as_str()).collect();
            println!(
                "      {} {}{}: {}",
                relation.kind,
                relation.name,
                dependency,
                fields.join(", ")
            );
        }

        for (kind, values) in &activity.operands {
            println!("      {} {}", kind, values.join(", "));
        }
    }

    let warnings = quick_validate(workflow);
    if warnings.is_empty() {
        println!("{}", "No structural warnings".green());
    } else {
        for warning in &warnings {
            println!("{} {}", "warning:".yellow(), warning);
        }
    }

    match compiled.database.as_ref().and_then(|db| db.server()) {
        Some(server) => println!("Provenance database: {}", server),
        None => println!("{}", "No database section".yellow()),
    }
}

/// Main application entry point.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let config = parse_arguments(&args).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage();
        e
    })?;

    setup_logging(config.verbose);

    let workflow_path = config.workflow_path.unwrap_or_default();
    let compiled = load_workflow(&workflow_path).map_err(|e| {
        error!("Failed to compile workflow: {}", e);
        format!("Could not compile workflow from '{}': {}", workflow_path, e)
    })?;

    print_summary(&compiled);

    if let Some(path) = config.emit_path {
        save_workflow(&compiled.workflow, &path)?;
    }

    if let Some(path) = config.sites_path {
        let sites = load_sites(&path)?;
        info!("Replica sites in {}:", path);
        for site in &sites {
            println!(
                "  {} {}:{} ({})",
                site.role,
                site.database.server().unwrap_or("?"),
                site.database.port().unwrap_or("?"),
                site.database.name().unwrap_or("?")
            );
        }
    }

    println!("{}", "OK".green().bold());
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("wfsetup")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_parse_arguments_full() {
        let config = parse_arguments(&args(&[
            "wf.xml", "--emit", "out.yaml", "--sites", "sites.xml", "-v",
        ]))
        .unwrap();

        assert_eq!(config.workflow_path.as_deref(), Some("wf.xml"));
        assert_eq!(config.emit_path.as_deref(), Some("out.yaml"));
        assert_eq!(config.sites_path.as_deref(), Some("sites.xml"));
        assert!(config.verbose);
    }

    #[test]
    fn test_parse_arguments_requires_workflow() {
        assert!(parse_arguments(&args(&[])).is_err());
    }

    #[test]
    fn test_parse_arguments_missing_option_value() {
        let err = parse_arguments(&args(&["wf.xml", "--emit"])).unwrap_err();
        assert!(err.contains("--emit"));
    }

    #[test]
    fn test_parse_arguments_rejects_extra_positional() {
        assert!(parse_arguments(&args(&["a.xml", "b.xml"])).is_err());
        assert!(parse_arguments(&args(&["a.xml", "--bogus"])).is_err());
    }
}
