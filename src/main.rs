use clap::Parser;
use fql_filter::{logging, Context, FilterCompiler, FilterQueryLanguage, QueryApplicator, Result, Shape, Validator};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Validate a filter-query document and run it over JSON records.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON schema describing the record shape
    #[arg(long)]
    schema: PathBuf,
    /// Filter-query document (JSON)
    #[arg(long)]
    query: PathBuf,
    /// JSON array of records; without it only the compiled filter is shown
    #[arg(long)]
    records: Option<PathBuf>,
    /// Upper-case the first letter of every field name before lookup
    #[arg(long)]
    pascal_case: bool,
    /// Stop after validation; exit status reflects validity
    #[arg(long)]
    validate_only: bool,
}

fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let shape = Shape::from_json(&read_json(&args.schema)?)?;
    let fql: FilterQueryLanguage = serde_json::from_value(read_json(&args.query)?)?;
    let ctx = if args.pascal_case {
        Context::pascal_case()
    } else {
        Context::default()
    };

    let report = Validator::new(&shape, &ctx).validate(Some(&fql));
    eprintln!("{report}");
    if args.validate_only {
        return Ok(if report.is_valid() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let predicate = FilterCompiler::new(&shape, &ctx).compile::<Value>(&fql)?;
    eprintln!("filter: {predicate}");

    let records: Vec<Value> = match &args.records {
        Some(path) => serde_json::from_value(read_json(path)?)?,
        None => return Ok(ExitCode::SUCCESS),
    };
    let out = QueryApplicator::new(&shape, &ctx).apply(records, &fql)?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(ExitCode::SUCCESS)
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
