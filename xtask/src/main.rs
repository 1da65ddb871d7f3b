//! Developer tasks (schema generation, report conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use bucketguard_test_util::normalize_nondeterministic;
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."));

    if manifest_dir.ends_with("xtask")
        && let Some(parent) = manifest_dir.parent()
    {
        return parent.to_path_buf();
    }
    manifest_dir
}

/// Get the schemas directory path.
fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_scan_schema() -> schemars::Schema {
    schema_for!(bucketguard_types::ScanReport)
}

fn generate_remediation_schema() -> schemars::Schema {
    schema_for!(bucketguard_types::RemediationReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(bucketguard_settings::BucketguardConfigV1)
}

const SCAN_SCHEMA: &str = "bucketguard.scan.v1.json";
const REMEDIATION_SCHEMA: &str = "bucketguard.remediation.v1.json";
const CONFIG_SCHEMA: &str = "bucketguard.config.v1.json";

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: SCAN_SCHEMA,
            generate: generate_scan_schema,
        },
        SchemaSpec {
            filename: REMEDIATION_SCHEMA,
            generate: generate_remediation_schema,
        },
        SchemaSpec {
            filename: CONFIG_SCHEMA,
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate golden reports in tests/fixtures/ against the schemas");
    eprintln!("  conform-full      conform + run the bucketguard binary on every fixture inventory");
    eprintln!("  explain-coverage  Validate all check IDs and codes have explanations");
}

/// Compile a generated schema. The draft is taken from its `$schema` keyword.
fn compile(generate: fn() -> schemars::Schema) -> anyhow::Result<jsonschema::Validator> {
    let value = serde_json::to_value(generate()).context("Failed to serialize schema")?;
    jsonschema::validator_for(&value).map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Report-level rules the schema cannot express: summary counts agree with the entries.
fn check_report_invariants(label: &str, value: &serde_json::Value, errors: &mut Vec<String>) {
    if let Some(findings) = value.get("findings").and_then(|v| v.as_array()) {
        let total = value
            .pointer("/summary/total_findings")
            .and_then(|v| v.as_u64());
        if total != Some(findings.len() as u64) {
            errors.push(format!(
                "{label}: summary.total_findings does not match findings[] length"
            ));
        }
    }

    if let Some(actions) = value.get("actions").and_then(|v| v.as_array()) {
        let targets = value.get("targets").and_then(|v| v.as_u64());
        if targets != Some(actions.len() as u64) {
            errors.push(format!("{label}: targets does not match actions[] length"));
        }
        let summed: u64 = ["applied", "failed", "dry_run", "skipped"]
            .iter()
            .filter_map(|k| value.pointer(&format!("/summary/{k}")).and_then(|v| v.as_u64()))
            .sum();
        if Some(summed) != targets {
            errors.push(format!("{label}: summary counts do not add up to targets"));
        }
        for (i, action) in actions.iter().enumerate() {
            if action.get("status").and_then(|v| v.as_str()) == Some("PENDING") {
                errors.push(format!("{label}: actions[{i}] persisted as PENDING"));
            }
        }
    }
}

/// Validate every golden report under tests/fixtures/ against the generated schemas.
fn conform() -> anyhow::Result<()> {
    let scan = compile(generate_scan_schema)?;
    let remediation = compile(generate_remediation_schema)?;
    println!("✓ report schemas compile");

    let mut checked = 0;
    let mut errors = Vec::new();

    for entry in fs::read_dir(fixtures_dir()).context("Failed to read tests/fixtures/")? {
        let fixture_dir = entry?.path();
        if !fixture_dir.is_dir() {
            continue;
        }
        let name = fixture_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        for (file, validator) in [
            ("expected.report.json", &scan),
            ("expected.remediation.json", &remediation),
        ] {
            let path = fixture_dir.join(file);
            if !path.exists() {
                continue;
            }
            let value = read_json(&path)?;
            let label = format!("{name}/{file}");
            for err in validator.iter_errors(&value) {
                errors.push(format!("{label}: schema validation: {err}"));
            }
            check_report_invariants(&label, &value, &mut errors);
            checked += 1;
            println!("  ✓ {label} validates");
        }
    }

    if checked == 0 {
        bail!("No golden reports found in {}", fixtures_dir().display());
    }
    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {checked} golden reports pass conformance checks!");
    Ok(())
}

/// Full conformance: golden reports plus the built binary's output on every fixture.
///
/// For each fixture with an `inventory.json`, a scan and a dry-run remediation are run in
/// a temp dir. Both outputs must validate, and the scan must match `expected.report.json`
/// when present.
fn conform_full() -> anyhow::Result<()> {
    conform()?;

    println!("\n--- Full conformance: bucketguard binary output ---\n");

    let scan = compile(generate_scan_schema)?;
    let remediation = compile(generate_remediation_schema)?;

    let bin = project_root().join("target").join("debug").join("bucketguard");
    #[cfg(target_os = "windows")]
    let bin = bin.with_extension("exe");

    if !bin.exists() {
        bail!(
            "bucketguard binary not found at {}.\n\
            Run `cargo build -p bucketguard-cli` first.",
            bin.display()
        );
    }

    let mut errors = Vec::new();

    for entry in fs::read_dir(fixtures_dir()).context("Failed to read tests/fixtures/")? {
        let fixture_dir = entry?.path();
        let inventory = fixture_dir.join("inventory.json");
        if !inventory.exists() {
            continue;
        }
        let name = fixture_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
        fs::copy(&inventory, temp_dir.path().join("inventory.json"))
            .with_context(|| format!("Failed to stage fixture '{name}'"))?;

        for args in [&["scan"][..], &["remediate"][..]] {
            let output = std::process::Command::new(&bin)
                .args(args)
                .current_dir(temp_dir.path())
                .env_remove("GOOGLE_API_KEY")
                .output()
                .with_context(|| format!("Failed to run bucketguard on fixture '{name}'"))?;
            // 2 is a scan threshold breach, not a run failure.
            if !matches!(output.status.code(), Some(0) | Some(2)) {
                errors.push(format!(
                    "fixture '{}': `{}` exited with {:?}: {}",
                    name,
                    args.join(" "),
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr)
                ));
            }
        }

        for (file, validator) in [
            ("findings.json", &scan),
            ("remediation.json", &remediation),
        ] {
            let path = temp_dir.path().join(file);
            if !path.exists() {
                errors.push(format!("fixture '{name}': no {file} generated"));
                continue;
            }
            let value = read_json(&path)?;
            let label = format!("fixture '{name}' {file}");
            for err in validator.iter_errors(&value) {
                errors.push(format!("{label}: schema validation: {err}"));
            }
            check_report_invariants(&label, &value, &mut errors);
        }

        let golden_path = fixture_dir.join("expected.report.json");
        let findings_path = temp_dir.path().join("findings.json");
        if golden_path.exists() && findings_path.exists() {
            let actual = normalize_nondeterministic(read_json(&findings_path)?);
            let golden = normalize_nondeterministic(read_json(&golden_path)?);
            if actual != golden {
                errors.push(format!(
                    "fixture '{name}': scan output differs from expected.report.json"
                ));
            } else {
                println!("  ✓ fixture '{name}' matches golden scan report");
            }
        } else {
            println!("  ✓ fixture '{name}' produces valid output (no golden file)");
        }
    }

    if !errors.is_empty() {
        eprintln!("\nFull conformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!(
            "Full conformance validation failed with {} errors",
            errors.len()
        );
    }

    println!("\n✓ Full conformance checks passed!");
    Ok(())
}

/// Validate that all check IDs and codes have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    use bucketguard_types::explain::{all_check_ids, all_codes, lookup_explanation};

    let check_ids = all_check_ids();
    let codes = all_codes();
    let mut errors = Vec::new();

    for (kind, ids) in [("Check ID", check_ids), ("Code", codes)] {
        for id in ids {
            let Some(exp) = lookup_explanation(id) else {
                errors.push(format!("{kind} '{id}' has no explanation"));
                continue;
            };
            if exp.title.is_empty() {
                errors.push(format!("{kind} '{id}' has empty title"));
            }
            if exp.description.is_empty() {
                errors.push(format!("{kind} '{id}' has empty description"));
            }
            if exp.remediation.is_empty() {
                errors.push(format!("{kind} '{id}' has empty remediation"));
            }
        }
    }

    if errors.is_empty() {
        println!("✓ {} check IDs have explanations", check_ids.len());
        println!("✓ {} codes have explanations", codes.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "conform-full" => conform_full(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
