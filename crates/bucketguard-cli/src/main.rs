//! CLI entry point for bucketguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `bucketguard-app` crate.

mod logging;

use anyhow::Context;
use bucketguard_app::{
    load_config, narrate, parse_findings_document, parse_report_json, remediation_exit_code,
    remediation_narrative_input, render_markdown, run_explain, run_remediate, run_scan,
    scan_exit_code, scan_narrative_input, serialize_report, write_bytes, write_text,
    ExplainOutput, NarrativeInput, RemediateInput, ReportVariant,
};
use bucketguard_provider::{InventoryProvider, StorageProvider};
use bucketguard_settings::{Overrides, ResolvedConfig};
use bucketguard_types::Severity;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "bucketguard",
    version,
    about = "Scan storage buckets for public exposure and remediate what is found"
)]
struct Cli {
    /// Path to bucketguard config TOML. A missing file means built-in defaults.
    #[arg(long, global = true, default_value = "bucketguard.toml")]
    config: Utf8PathBuf,

    /// Path to the JSON bucket inventory served as the storage provider.
    #[arg(long, global = true, default_value = "inventory.json")]
    inventory: Utf8PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate every bucket and write a findings report.
    Scan {
        /// Where to write the JSON findings report.
        #[arg(long, default_value = "findings.json")]
        output: Utf8PathBuf,

        /// Comma-separated allowlist of bucket names. Overrides `allow_buckets` in the config.
        #[arg(long)]
        allow_buckets: Option<String>,

        /// Exit 2 if any finding is at or above this severity (NONE never fails).
        /// Defaults to the config's `fail_on`, then CRITICAL.
        #[arg(long, value_name = "NONE|LOW|MEDIUM|HIGH|CRITICAL")]
        fail_on: Option<Severity>,

        /// Also write a Markdown summary.
        #[arg(long)]
        markdown_out: Option<Utf8PathBuf>,

        /// Ask the configured language model for a short assessment.
        #[arg(long)]
        narrate: bool,

        /// Write the narrative to this file (implies --narrate).
        #[arg(long)]
        narrative_out: Option<Utf8PathBuf>,
    },

    /// Enforce Block Public Access on buckets with CRITICAL findings.
    Remediate {
        /// Findings report produced by `scan`.
        #[arg(long, default_value = "findings.json")]
        input: Utf8PathBuf,

        /// Where to write the JSON remediation report.
        #[arg(long, default_value = "remediation.json")]
        output: Utf8PathBuf,

        /// Actually apply changes. Without it nothing is written to the provider.
        #[arg(long)]
        approve: bool,

        /// Also write a Markdown summary.
        #[arg(long)]
        markdown_out: Option<Utf8PathBuf>,

        /// Ask the configured language model for a short assessment.
        #[arg(long)]
        narrate: bool,

        /// Write the narrative to this file (implies --narrate).
        #[arg(long)]
        narrative_out: Option<Utf8PathBuf>,
    },

    /// Render Markdown from an existing scan or remediation report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "findings.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g. "s3.public_access_block") or code (e.g. "scan_error").
        identifier: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing();

    let result = match &cli.cmd {
        Commands::Scan {
            output,
            allow_buckets,
            fail_on,
            markdown_out,
            narrate,
            narrative_out,
        } => cmd_scan(
            &cli,
            ScanArgs {
                output,
                allow_buckets: allow_buckets.as_deref(),
                fail_on: *fail_on,
                markdown_out: markdown_out.as_deref(),
                narrate: *narrate,
                narrative_out: narrative_out.as_deref(),
            },
        ),
        Commands::Remediate {
            input,
            output,
            approve,
            markdown_out,
            narrate,
            narrative_out,
        } => cmd_remediate(
            &cli,
            RemediateArgs {
                input,
                output,
                approve: *approve,
                markdown_out: markdown_out.as_deref(),
                narrate: *narrate,
                narrative_out: narrative_out.as_deref(),
            },
        ),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Explain { identifier } => Ok(cmd_explain(identifier)),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("bucketguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

struct ScanArgs<'a> {
    output: &'a Utf8Path,
    allow_buckets: Option<&'a str>,
    fail_on: Option<Severity>,
    markdown_out: Option<&'a Utf8Path>,
    narrate: bool,
    narrative_out: Option<&'a Utf8Path>,
}

struct RemediateArgs<'a> {
    input: &'a Utf8Path,
    output: &'a Utf8Path,
    approve: bool,
    markdown_out: Option<&'a Utf8Path>,
    narrate: bool,
    narrative_out: Option<&'a Utf8Path>,
}

fn cmd_scan(cli: &Cli, args: ScanArgs<'_>) -> anyhow::Result<i32> {
    let resolved = resolve(
        &cli.config,
        Overrides {
            fail_on: args.fail_on,
            allow_buckets: args.allow_buckets.map(parse_csv_list),
            narrate: args.narrate || args.narrative_out.is_some(),
        },
    )?;

    let provider = InventoryProvider::open(&cli.inventory).context("open inventory")?;
    let output = run_scan(&provider, &resolved.effective)?;

    let data = serialize_report(&output.report)?;
    write_bytes(args.output, &data).context("write findings json")?;

    print!("{}", bucketguard_render::render_scan_summary(&output.report));
    println!("Findings written to {}", args.output);

    if let Some(path) = args.markdown_out {
        let md = bucketguard_render::render_scan_markdown(&output.report);
        write_text(path, &md).context("write markdown")?;
    }

    emit_narrative(
        &resolved,
        scan_narrative_input(&output.report),
        args.narrative_out,
    );

    Ok(scan_exit_code(output.breached))
}

fn cmd_remediate(cli: &Cli, args: RemediateArgs<'_>) -> anyhow::Result<i32> {
    let resolved = resolve(
        &cli.config,
        Overrides {
            narrate: args.narrate || args.narrative_out.is_some(),
            ..Overrides::default()
        },
    )?;

    let text = std::fs::read_to_string(args.input)
        .with_context(|| format!("read findings: {}", args.input))?;
    let document =
        parse_findings_document(&text).with_context(|| format!("load findings: {}", args.input))?;

    // Dry runs never touch the provider, so the inventory is only required with --approve.
    let provider = if args.approve {
        Some(InventoryProvider::open(&cli.inventory).context("open inventory")?)
    } else {
        None
    };

    let report = run_remediate(RemediateInput {
        findings: &document.findings,
        approve: args.approve,
        provider: provider.as_ref().map(|p| p as &dyn StorageProvider),
    })?;

    let data = serialize_report(&report)?;
    write_bytes(args.output, &data).context("write remediation json")?;

    print!(
        "{}",
        bucketguard_render::render_remediation_summary(&report)
    );
    println!("Remediation report written to {}", args.output);

    if let Some(path) = args.markdown_out {
        let md = bucketguard_render::render_remediation_markdown(&report);
        write_text(path, &md).context("write markdown")?;
    }

    emit_narrative(
        &resolved,
        remediation_narrative_input(&report),
        args.narrative_out,
    );

    Ok(remediation_exit_code(&report))
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report: ReportVariant = parse_report_json(&report_text)?;
    let md = render_markdown(&report);

    if let Some(out_path) = output {
        write_text(out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(0)
}

fn cmd_explain(identifier: &str) -> i32 {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", bucketguard_app::format_explanation(&exp));
            0
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                bucketguard_app::format_not_found(
                    &identifier,
                    available_check_ids,
                    available_codes
                )
            );
            1
        }
    }
}

/// Load the config file if present; a missing file means defaults.
fn resolve(config_path: &Utf8Path, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let text = if config_path.exists() {
        std::fs::read_to_string(config_path)
            .with_context(|| format!("read config: {}", config_path))?
    } else {
        tracing::debug!(path = %config_path, "no config file; using defaults");
        String::new()
    };
    load_config(&text, overrides)
}

/// Print the narrative and optionally save it. Never affects the exit code.
fn emit_narrative(
    resolved: &ResolvedConfig,
    input: NarrativeInput,
    narrative_out: Option<&Utf8Path>,
) {
    if !resolved.narrative.enabled {
        return;
    }
    let text = narrate(&resolved.narrative, &input);
    println!("\nAI analysis:\n{}", text);
    if let Some(path) = narrative_out
        && let Err(err) = write_text(path, &format!("{text}\n"))
    {
        tracing::warn!(path = %path, error = %format!("{err:#}"), "could not write narrative");
    }
}

/// Split a comma-separated list, dropping blanks. A list of only blanks is empty, which
/// still overrides the config file's allowlist.
fn parse_csv_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
