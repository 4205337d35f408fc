mod measure;

use clap::{Parser, Subcommand, ValueEnum};
use measure::{MeasurementRecorder, StageMeasurement, capture_rss_bytes, rss_delta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, create_dir_all};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use symath_expr::{
    Algebra, ComparisonSense, Constant, ConstantMatrix, Dims, ExprError, Expression, Monomial,
    Polynomial, Variable, VariableMatrix, VariableVector,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_SIZES: [usize; 3] = [10, 50, 100];
const SCHEMA_VERSION: u32 = 1;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Symath expression algebra benchmark runner and reporting interface"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute benchmark scenarios and save JSONL artifacts
    Run(RunArgs),
    /// Render benchmark artifact summaries
    Report(ReportArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Benchmark scenarios to execute
    #[arg(
        long = "scenario",
        value_enum,
        value_delimiter = ',',
        default_value = "poly-plus"
    )]
    scenarios: Vec<Scenario>,

    /// Comma-separated list of problem sizes (terms, vector length or matrix order)
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,

    /// Number of repetitions per case
    #[arg(long, default_value_t = 1)]
    repetitions: u32,

    /// JSONL output artifact path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct ReportArgs {
    /// Input JSONL benchmark artifact
    #[arg(long)]
    input: PathBuf,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Ndjson,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum Scenario {
    /// Sum two polynomials sharing half their footprints
    PolyPlus,
    /// Expand the product of two linear polynomials
    PolyMultiply,
    /// Multiply a variable matrix by a constant matrix
    MatrixProduct,
    /// Build `A x <= b` and extract its coefficients
    Constraints,
}

impl Scenario {
    fn as_str(self) -> &'static str {
        match self {
            Scenario::PolyPlus => "poly-plus",
            Scenario::PolyMultiply => "poly-multiply",
            Scenario::MatrixProduct => "matrix-product",
            Scenario::Constraints => "constraints",
        }
    }
}

#[derive(Debug, Clone)]
struct CaseExecution {
    size: usize,
    terms: usize,
    stage_measurements: Vec<StageMeasurement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BenchRecord {
    schema_version: u32,
    run_id: String,
    scenario: String,
    case_name: String,
    repetition: u32,
    size: usize,
    terms: usize,
    stage: String,
    duration_ms: f64,
    rss_before_bytes: Option<u64>,
    rss_after_bytes: Option<u64>,
    rss_delta_bytes: Option<i64>,
}

#[derive(Debug, Clone, Eq, Ord, PartialEq, PartialOrd)]
struct SummaryKey {
    scenario: String,
    case_name: String,
    stage: String,
}

#[derive(Debug, Clone, Serialize)]
struct SummaryRow {
    scenario: String,
    case_name: String,
    stage: String,
    samples: usize,
    mean_duration_ms: f64,
    max_duration_ms: f64,
    mean_rss_delta_bytes: Option<f64>,
    max_rss_after_bytes: Option<u64>,
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG`. Silent when unset.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run_command(args),
        Command::Report(args) => report_command(args),
    }
}

fn run_command(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.repetitions == 0 {
        return Err(boxed_input_error("repetitions must be greater than zero"));
    }
    let sizes = args.sizes.clone().unwrap_or_else(|| DEFAULT_SIZES.to_vec());
    if sizes.contains(&0) {
        return Err(boxed_input_error("sizes must be greater than zero"));
    }

    let run_id = build_run_id()?;
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("artifacts/bench/{}.jsonl", run_id.as_str())));

    let mut records = Vec::new();
    for scenario in &args.scenarios {
        for &size in &sizes {
            let case_name = format!("n_{size}");
            for rep_idx in 0..args.repetitions {
                let execution = execute_case(*scenario, size)?;
                records.extend(case_records(
                    &run_id,
                    *scenario,
                    &case_name,
                    rep_idx + 1,
                    &execution,
                ));
            }
        }
    }

    write_records_jsonl(&output_path, &records)?;
    render_output(args.format, &records)?;
    println!("artifact: {}", output_path.display());
    Ok(())
}

fn report_command(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records_jsonl(&args.input)?;
    render_output(args.format, &records)?;
    Ok(())
}

/// `sum_i (i + 1) * v_i` over `variables`, plus a constant 1.
fn linear_polynomial(variables: &[Variable]) -> Polynomial {
    let mut terms: Vec<Monomial> = variables
        .iter()
        .enumerate()
        .map(|(idx, v)| Monomial::new((idx + 1) as f64, vec![*v], vec![1]))
        .collect();
    terms.push(Monomial::constant(1.0));
    Polynomial::new(terms)
}

fn fresh_variables(count: usize) -> Vec<Variable> {
    (0..count).map(|_| Variable::new()).collect()
}

fn term_count(expression: &Expression) -> usize {
    expression
        .to_polynomial_rows()
        .iter()
        .flatten()
        .map(|p| p.terms.len())
        .sum()
}

fn execute_case(scenario: Scenario, size: usize) -> Result<CaseExecution, ExprError> {
    let mut recorder = MeasurementRecorder::new();
    let total_started = Instant::now();
    let total_rss_before = capture_rss_bytes("bench_total");

    let terms = match scenario {
        Scenario::PolyPlus => {
            let stage_start = recorder.begin_stage("build");
            let shared = fresh_variables(size / 2);
            let mut left_vars = shared.clone();
            left_vars.extend(fresh_variables(size - shared.len()));
            let mut right_vars = fresh_variables(size - shared.len());
            right_vars.extend(shared);
            let left = linear_polynomial(&left_vars);
            let right = linear_polynomial(&right_vars);
            recorder.end_stage(stage_start);

            let stage_start = recorder.begin_stage("combine");
            let sum = left.plus(&right)?;
            recorder.end_stage(stage_start);
            term_count(&sum)
        }
        Scenario::PolyMultiply => {
            let stage_start = recorder.begin_stage("build");
            let left = linear_polynomial(&fresh_variables(size));
            let right = linear_polynomial(&fresh_variables(size));
            recorder.end_stage(stage_start);

            let stage_start = recorder.begin_stage("combine");
            let product = left.multiply(&right)?;
            recorder.end_stage(stage_start);
            term_count(&product)
        }
        Scenario::MatrixProduct => {
            let stage_start = recorder.begin_stage("build");
            let x = VariableMatrix::fresh(size, size);
            let weights = ConstantMatrix::from_rows(
                (0..size)
                    .map(|row| {
                        (0..size)
                            .map(|col| Constant(((row + col) % 7) as f64 + 1.0))
                            .collect()
                    })
                    .collect(),
            );
            recorder.end_stage(stage_start);

            let stage_start = recorder.begin_stage("combine");
            let product = x.multiply(&weights)?;
            recorder.end_stage(stage_start);
            term_count(&product)
        }
        Scenario::Constraints => {
            let stage_start = recorder.begin_stage("build");
            let x = VariableVector::fresh(size);
            let a = ConstantMatrix::filled(Constant(2.0), Dims::new(size, size))
                .plus(ConstantMatrix::identity(size))?;
            recorder.end_stage(stage_start);

            let stage_start = recorder.begin_stage("combine");
            let lhs = a.multiply(&x)?;
            recorder.end_stage(stage_start);

            let stage_start = recorder.begin_stage("compare");
            let constraint = lhs.comparison(100.0, ComparisonSense::LessEqual)?;
            recorder.end_stage(stage_start);

            let stage_start = recorder.begin_stage("coefficients");
            let (left, _) = constraint.sides();
            let variables = x.elements.clone();
            let _ = left.linear_coeff(Some(variables.as_slice()))?;
            recorder.end_stage(stage_start);
            term_count(&left)
        }
    };

    let total_duration = total_started.elapsed();
    let total_rss_after = capture_rss_bytes("bench_total");
    let mut stages = recorder.into_stages();
    stages.push(StageMeasurement {
        stage: "total".to_string(),
        duration: total_duration,
        rss_before_bytes: total_rss_before,
        rss_after_bytes: total_rss_after,
        rss_delta_bytes: rss_delta(total_rss_before, total_rss_after),
    });

    Ok(CaseExecution {
        size,
        terms,
        stage_measurements: stages,
    })
}

fn case_records(
    run_id: &str,
    scenario: Scenario,
    case_name: &str,
    repetition: u32,
    execution: &CaseExecution,
) -> Vec<BenchRecord> {
    execution
        .stage_measurements
        .iter()
        .map(|measurement| BenchRecord {
            schema_version: SCHEMA_VERSION,
            run_id: run_id.to_string(),
            scenario: scenario.as_str().to_string(),
            case_name: case_name.to_string(),
            repetition,
            size: execution.size,
            terms: execution.terms,
            stage: measurement.stage.clone(),
            duration_ms: measurement.duration.as_secs_f64() * 1000.0,
            rss_before_bytes: measurement.rss_before_bytes,
            rss_after_bytes: measurement.rss_after_bytes,
            rss_delta_bytes: measurement.rss_delta_bytes,
        })
        .collect()
}

fn render_output(
    format: OutputFormat,
    records: &[BenchRecord],
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Table => print_summary_table(&summarize_records(records)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Ndjson => {
            let mut stdout = std::io::stdout().lock();
            write_ndjson(&mut stdout, records)?;
        }
    }
    Ok(())
}

/// Running totals for one scenario/case/stage group.
#[derive(Default)]
struct StageTotals {
    samples: usize,
    duration_sum: f64,
    duration_max: f64,
    rss_deltas: Vec<i64>,
    rss_after_max: Option<u64>,
}

impl StageTotals {
    fn push(&mut self, record: &BenchRecord) {
        self.samples += 1;
        self.duration_sum += record.duration_ms;
        self.duration_max = self.duration_max.max(record.duration_ms);
        self.rss_deltas.extend(record.rss_delta_bytes);
        self.rss_after_max = self.rss_after_max.max(record.rss_after_bytes);
    }

    fn into_row(self, key: SummaryKey) -> SummaryRow {
        let mean_rss_delta_bytes = (!self.rss_deltas.is_empty()).then(|| {
            self.rss_deltas.iter().map(|delta| *delta as f64).sum::<f64>()
                / self.rss_deltas.len() as f64
        });
        SummaryRow {
            scenario: key.scenario,
            case_name: key.case_name,
            stage: key.stage,
            samples: self.samples,
            mean_duration_ms: self.duration_sum / self.samples.max(1) as f64,
            max_duration_ms: self.duration_max,
            mean_rss_delta_bytes,
            max_rss_after_bytes: self.rss_after_max,
        }
    }
}

fn summarize_records(records: &[BenchRecord]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<SummaryKey, StageTotals> = BTreeMap::new();
    for record in records {
        groups
            .entry(SummaryKey {
                scenario: record.scenario.clone(),
                case_name: record.case_name.clone(),
                stage: record.stage.clone(),
            })
            .or_default()
            .push(record);
    }
    groups
        .into_iter()
        .map(|(key, totals)| totals.into_row(key))
        .collect()
}

fn print_summary_table(rows: &[SummaryRow]) {
    println!(
        "{:<15} {:<10} {:<13} {:>7} {:>12} {:>12} {:>14} {:>14}",
        "scenario", "case", "stage", "samples", "mean_ms", "max_ms", "mean_rss_mb", "max_rss_mb"
    );
    for row in rows {
        println!(
            "{:<15} {:<10} {:<13} {:>7} {:>12.3} {:>12.3} {:>14} {:>14}",
            row.scenario,
            row.case_name,
            row.stage,
            row.samples,
            row.mean_duration_ms,
            row.max_duration_ms,
            format_megabytes(row.mean_rss_delta_bytes),
            format_megabytes(row.max_rss_after_bytes.map(|bytes| bytes as f64)),
        );
    }
}

fn format_megabytes(bytes: Option<f64>) -> String {
    match bytes {
        Some(bytes) => format!("{:.3}", bytes / (1024.0 * 1024.0)),
        None => "-".to_string(),
    }
}

/// One JSON object per line.
fn write_ndjson(writer: &mut impl Write, records: &[BenchRecord]) -> std::io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

fn write_records_jsonl(path: &Path, records: &[BenchRecord]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    write_ndjson(&mut BufWriter::new(File::create(path)?), records)
}

fn load_records_jsonl(path: &Path) -> Result<Vec<BenchRecord>, Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str::<BenchRecord>(&line)
            .map_err(|err| boxed_input_error(&format!("line {}: {err}", line_no + 1)))?;
        records.push(record);
    }
    Ok(records)
}

fn build_run_id() -> Result<String, std::time::SystemTimeError> {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH)?;
    Ok(format!("bench_{}", elapsed.as_millis()))
}

fn boxed_input_error(message: &str) -> Box<dyn std::error::Error> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        message.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::{
        BenchRecord, Scenario, execute_case, load_records_jsonl, summarize_records,
        write_records_jsonl,
    };

    fn approx_eq(left: f64, right: f64) {
        assert!((left - right).abs() < 1e-9, "left={left}, right={right}");
    }

    fn record(case_name: &str, duration_ms: f64, rss_delta_bytes: Option<i64>) -> BenchRecord {
        BenchRecord {
            schema_version: 1,
            run_id: "run".to_string(),
            scenario: "poly-plus".to_string(),
            case_name: case_name.to_string(),
            repetition: 1,
            size: 10,
            terms: 11,
            stage: "total".to_string(),
            duration_ms,
            rss_before_bytes: Some(1_000),
            rss_after_bytes: rss_delta_bytes.map(|delta| (1_000 + delta) as u64),
            rss_delta_bytes,
        }
    }

    #[test]
    fn summarize_records_groups_and_averages() {
        let records = vec![
            record("n_10", 10.0, Some(1_000)),
            record("n_10", 20.0, None),
            record("n_50", 5.0, Some(3_000)),
        ];
        let rows = summarize_records(&records);
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.case_name, "n_10");
        assert_eq!(first.samples, 2);
        approx_eq(first.mean_duration_ms, 15.0);
        approx_eq(first.max_duration_ms, 20.0);
        approx_eq(first.mean_rss_delta_bytes.unwrap_or_default(), 1_000.0);
        assert_eq!(first.max_rss_after_bytes, Some(2_000));

        assert_eq!(rows[1].max_rss_after_bytes, Some(4_000));
    }

    #[test]
    fn scenarios_record_every_stage() {
        let execution = execute_case(Scenario::Constraints, 4).expect("constraints case");
        let stages: Vec<&str> = execution
            .stage_measurements
            .iter()
            .map(|m| m.stage.as_str())
            .collect();
        assert_eq!(
            stages,
            vec!["build", "combine", "compare", "coefficients", "total"]
        );
        // one term per variable in each of the 4 rows
        assert_eq!(execution.terms, 16);
    }

    #[test]
    fn scenario_term_counts() {
        // 3 shared footprints, 3 + 3 distinct, one merged constant
        let plus = execute_case(Scenario::PolyPlus, 6).expect("poly-plus case");
        assert_eq!(plus.terms, 10);
        // (5 + 1) * (5 + 1) distinct footprints
        let product = execute_case(Scenario::PolyMultiply, 5).expect("poly-multiply case");
        assert_eq!(product.terms, 36);
        let matrix = execute_case(Scenario::MatrixProduct, 3).expect("matrix-product case");
        assert_eq!(matrix.terms, 27);
    }

    #[test]
    fn records_round_trip_through_jsonl() {
        let dir = std::env::temp_dir().join(format!("symath-bench-{}", std::process::id()));
        let path = dir.join("records.jsonl");
        let records = vec![record("n_10", 1.5, Some(10))];
        write_records_jsonl(&path, &records).expect("write artifact");
        let loaded = load_records_jsonl(&path).expect("read artifact");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].case_name, "n_10");
        approx_eq(loaded[0].duration_ms, 1.5);
        let _ = std::fs::remove_dir_all(dir);
    }
}
