//! Dealgauge CLI
//!
//! Commands:
//!   assess    - Evaluate input against a table
//!   validate  - Check a table document's invariants
//!   tables    - List bundled tables
//!   show      - Print a bundled table's YAML source
//!   schema    - Print JSON schema for a document type

use dealgauge::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "assess" => cmd_assess(&args[2..]),
        "validate" => cmd_validate(&args[2..]),
        "tables" => cmd_tables(&args[2..]),
        "show" => cmd_show(&args[2..]),
        "schema" => cmd_schema(&args[2..]),
        "version" | "--version" | "-v" => {
            println!("dealgauge {}", VERSION);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"
Dealgauge - rule-based assessment engine

USAGE:
    dealgauge <COMMAND> [OPTIONS]

COMMANDS:
    assess <table> [--set k=v]...    Evaluate input against a table
                                      <table> is a YAML/JSON file path or a
                                      bundled table id
    validate <table.yaml>            Check a table document's invariants
    tables                           List bundled tables
    show <id>                        Print a bundled table's YAML source
    schema [name]                    Print JSON schema for a document type
    version                          Print version

OPTIONS:
    --set <key=value>                Set one input attribute (repeatable)
    --input <file.json>              Read attributes from a JSON object of
                                      strings; --set entries override it
    --json                           JSON output format (assess, validate, tables)

EXAMPLES:
    dealgauge assess deal_health --set decision_maker_identified=No --set days_since_interaction=9
    dealgauge assess discovery --input call.json --json
    dealgauge validate tables/renewal_risk.yaml
    dealgauge show proposal
"#
    );
}

/// Resolve a table argument: bundled id first, then filesystem path
fn load_table(arg: &str) -> Result<RuleTable> {
    if let Some(table) = builtin::find(arg) {
        return Ok(table);
    }

    let path = Path::new(arg);
    if !path.exists() {
        return Err(format!(
            "no bundled table or file named `{}` (bundled: {})",
            arg,
            builtin::IDS.join(", ")
        )
        .into());
    }

    let content = fs::read_to_string(path).map_err(Error::Io)?;
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        RuleTable::from_json(&content)
    } else {
        RuleTable::from_yaml(&content)
    }
}

fn parse_set_args(args: &[String]) -> Result<HashMap<String, String>> {
    let mut raw = HashMap::new();

    for (i, arg) in args.iter().enumerate() {
        if arg == "--input" {
            let file = args
                .get(i + 1)
                .ok_or("--input requires a file path")?;
            let content = fs::read_to_string(file).map_err(Error::Io)?;
            let parsed: HashMap<String, String> = serde_json::from_str(&content)?;
            raw.extend(parsed);
        }
    }

    for (i, arg) in args.iter().enumerate() {
        if arg == "--set" {
            let pair = args.get(i + 1).ok_or("--set requires key=value")?;
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("--set expects key=value, got `{}`", pair))?;
            raw.insert(key.to_string(), value.to_string());
        }
    }

    Ok(raw)
}

fn cmd_assess(args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err("Usage: dealgauge assess <table> [--set k=v]... [--input file.json] [--json]".into());
    }

    let table = load_table(&args[0])?;
    let raw = parse_set_args(&args[1..])?;
    let json_output = args.contains(&"--json".to_string());

    let verdict = assess(&table, &raw)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        println!("{}", verdict.to_report());
    }

    Ok(())
}

fn cmd_validate(args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err("Usage: dealgauge validate <table.yaml> [--json]".into());
    }

    let path = &args[0];
    let json_output = args.contains(&"--json".to_string());

    let content = fs::read_to_string(path).map_err(Error::Io)?;
    let def = if Path::new(path).extension().and_then(|e| e.to_str()) == Some("json") {
        TableDef::from_json(&content)?
    } else {
        TableDef::from_yaml(&content)?
    };

    let problems = def.problems();

    if json_output {
        let output = serde_json::json!({
            "table_id": def.id,
            "valid": problems.is_empty(),
            "problems": problems,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if problems.is_empty() {
        println!("✓ {}: valid ({} rules)", path, def.rules.len());
    } else {
        println!("✗ {}: {} problem(s)", path, problems.len());
        for problem in &problems {
            println!("  - {}", problem);
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err("Validation failed".into())
    }
}

fn cmd_tables(args: &[String]) -> Result<()> {
    let json_output = args.contains(&"--json".to_string());

    if json_output {
        let listing: Vec<_> = builtin::all()
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id(),
                    "name": t.def().name,
                    "rules": t.rules().len(),
                    "hash": t.hash(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        for table in builtin::all() {
            println!(
                "{:<14} {:<24} {} rules  {}",
                table.id(),
                table.def().name.as_deref().unwrap_or("-"),
                table.rules().len(),
                table.hash()
            );
        }
    }

    Ok(())
}

fn cmd_show(args: &[String]) -> Result<()> {
    let id = args
        .first()
        .ok_or("Usage: dealgauge show <id>")?;

    match builtin::source(id) {
        Some(src) => {
            println!("{}", src);
            Ok(())
        }
        None => Err(format!(
            "no bundled table `{}` (bundled: {})",
            id,
            builtin::IDS.join(", ")
        )
        .into()),
    }
}

fn cmd_schema(args: &[String]) -> Result<()> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!("Available schemas: table, verdict");
            Ok(())
        }
        "table" => print_schema::<TableDef>(),
        "verdict" => print_schema::<Verdict>(),
        _ => Err(format!("Unknown schema: {}", schema_name).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
