// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! IaC Policy CLI
//!
//! Scans Terraform/Bicep sources for naming and tagging conventions and runs
//! the security checks over a JSON resource plan.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iac_policy_engine::checks::{CheckRegistry, Plan};
use iac_policy_engine::config::Config;
use iac_policy_engine::rules::{CompiledRules, RuleSet};
use iac_policy_engine::scan::{discover, NamingRuleEngine, RuleEngine, Scanner, TagRuleEngine};

/// Exit code when the run itself fails (unreadable input, bad rules)
const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "iac-policy",
    version,
    about = "Naming, tagging and security checks for Terraform and Bicep"
)]
struct Cli {
    #[arg(long, global = true, help = "Rule set YAML file (defaults to the built-in rules)")]
    rules: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check resource and value naming conventions
    Naming(ScanArgs),
    /// Check resource tags and the shared tags variable
    Tags(ScanArgs),
    /// Run the security checks over a JSON resource plan
    Evaluate {
        #[arg(long, short)]
        plan: PathBuf,
        #[arg(long = "check", value_name = "ID", help = "Only run these check ids")]
        checks: Vec<String>,
    },
    /// List registered checks
    Checks,
    /// Print the effective rule set as YAML
    Rules,
}

#[derive(clap::Args, Debug)]
struct ScanArgs {
    /// Files to check (defaults to infra/terraform/**/*.tf and infra/bicep/**/*.bicep)
    files: Vec<PathBuf>,
    #[arg(long, default_value = ".", help = "Directory the default roots are resolved from")]
    base_dir: PathBuf,
}

#[derive(Serialize)]
struct JsonOut<T: Serialize> {
    ok: bool,
    data: T,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid environment configuration: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };
    init_tracing(&config);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Initialize tracing based on configuration. Logs go to stderr.
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if config.json_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn load_rules(path: Option<&Path>) -> Result<CompiledRules> {
    let rule_set = match path {
        Some(p) => RuleSet::from_path(p)?,
        None => RuleSet::default(),
    };
    CompiledRules::new(rule_set).context("Failed to compile rule set")
}

fn run(cli: Cli) -> Result<ExitCode> {
    let rules = load_rules(cli.rules.as_deref())?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Naming(args) => {
            run_scan(NamingRuleEngine::new(&rules), &args, cli.json, &mut stdout)
        }
        Commands::Tags(args) => run_scan(TagRuleEngine::new(&rules), &args, cli.json, &mut stdout),
        Commands::Evaluate { plan, checks } => {
            run_evaluate(&rules, &plan, &checks, cli.json, &mut stdout)
        }
        Commands::Checks => run_checks(cli.json, &mut stdout),
        Commands::Rules => {
            write!(stdout, "{}", rules.rules().to_yaml()?)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exit_for(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_scan<E: RuleEngine>(
    engine: E,
    args: &ScanArgs,
    json: bool,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let files = if args.files.is_empty() {
        discover(&args.base_dir)?
    } else {
        args.files.clone()
    };

    let scanner = Scanner::new(engine);
    let report = scanner.scan(&files)?;

    if json {
        let body = JsonOut {
            ok: report.passed(),
            data: &report,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
    } else {
        scanner.write_report(&report, out)?;
    }

    Ok(exit_for(report.passed()))
}

fn run_evaluate(
    rules: &CompiledRules,
    plan_path: &Path,
    only: &[String],
    json: bool,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let registry = CheckRegistry::builtin();
    for id in only {
        if registry.get(id).is_none() {
            anyhow::bail!("Unknown check id: {id}");
        }
    }

    let plan = Plan::from_path(plan_path)?;
    let results = plan.evaluate(&registry, rules, only);
    let failed = results.iter().map(|r| r.failed().count()).sum::<usize>();

    if json {
        let body = JsonOut {
            ok: failed == 0,
            data: &results,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        return Ok(exit_for(failed == 0));
    }

    let mut evaluated = 0;
    for resource in &results {
        for outcome in &resource.outcomes {
            evaluated += 1;
            writeln!(
                out,
                "{} {} {} ({})",
                outcome.result, outcome.check_id, resource.address, outcome.check_name
            )?;
        }
    }

    if failed == 0 {
        writeln!(out, "\nOK: {evaluated} checks passed")?;
    } else {
        writeln!(out, "\nFAILED: {failed} of {evaluated} checks failed")?;
    }
    Ok(exit_for(failed == 0))
}

fn run_checks(json: bool, out: &mut dyn Write) -> Result<ExitCode> {
    let registry = CheckRegistry::builtin();

    if json {
        #[derive(Serialize)]
        struct CheckInfo<'a> {
            id: &'a str,
            name: &'a str,
            categories: &'a [&'a str],
            supported_resources: &'a [&'a str],
        }
        let data: Vec<_> = registry
            .checks()
            .iter()
            .map(|c| CheckInfo {
                id: c.id,
                name: c.name,
                categories: c.categories,
                supported_resources: c.supported_resources,
            })
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&JsonOut { ok: true, data })?)?;
        return Ok(ExitCode::SUCCESS);
    }

    for check in registry.checks() {
        writeln!(out, "{}  {}", check.id, check.name)?;
        writeln!(out, "    categories: {}", check.categories.join(", "))?;
        writeln!(out, "    resources:  {}", check.supported_resources.join(", "))?;
    }
    Ok(ExitCode::SUCCESS)
}
