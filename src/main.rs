//! Loan simulation CLI
//!
//! Simulates a single loan, or a CSV batch of loan cases, against a reference
//! rate history and reports totals for the real and counterfactual schedules.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use loan_amortization::loan::load_cases;
use loan_amortization::rates::load_rate_history;
use loan_amortization::simulation::limit_as_of;
use loan_amortization::{
    CaseReport, FlatRate, LoanCase, LoanSimulationInput, RateHistory, RateLookup, ResetPeriod,
    ScenarioRunner, ScheduleRow, SimulationConfig,
};

#[derive(Debug, Parser)]
#[command(name = "loan-sim", version, about = "Variable-rate loan amortization simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate one loan given on the command line
    Simulate(SimulateArgs),
    /// Simulate every loan case in a CSV file
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
struct RateArgs {
    /// Reference rate history: CSV with `month,rate` or a JSON object keyed by YYYY-MM
    /// Takes priority over --flat-rate when both are set
    #[arg(long, env = "LOAN_RATES_FILE")]
    rates: Option<PathBuf>,

    /// Constant reference rate in percentage points, instead of a history
    #[arg(long, env = "LOAN_FLAT_RATE")]
    flat_rate: Option<f64>,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    #[arg(long, env = "LOAN_PRINCIPAL")]
    principal: f64,

    #[arg(long, env = "LOAN_TERM_MONTHS")]
    term_months: u32,

    /// Bank margin over the index, in percentage points
    #[arg(long, env = "LOAN_MARGIN_PCT")]
    margin_pct: f64,

    /// Index tenor: 1M, 3M or 6M
    #[arg(long, env = "LOAN_WIBOR_TYPE", default_value = "3M")]
    wibor: ResetPeriod,

    /// Disbursement date (YYYY-MM-DD)
    #[arg(long, env = "LOAN_START_DATE")]
    start_date: NaiveDate,

    /// Stop after this many months
    #[arg(long, conflicts_with = "as_of")]
    limit_months: Option<u32>,

    /// Compute totals to date as of this date (YYYY-MM-DD)
    #[arg(long, env = "LOAN_AS_OF")]
    as_of: Option<NaiveDate>,

    #[command(flatten)]
    rates: RateArgs,

    /// Write the month-by-month variable-rate schedule to this CSV file
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// Loan cases CSV
    #[arg(long, env = "LOAN_CASES_FILE")]
    cases: PathBuf,

    #[command(flatten)]
    rates: RateArgs,

    /// Compute totals to date as of this date (YYYY-MM-DD)
    #[arg(long, env = "LOAN_AS_OF")]
    as_of: Option<NaiveDate>,

    /// Output file (stdout when omitted)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Emit JSON instead of CSV
    #[arg(long)]
    json: bool,

    /// Include month-by-month schedules (JSON output only)
    #[arg(long, requires = "json")]
    detailed: bool,
}

/// Rate source chosen on the command line
enum RateSource {
    History(RateHistory),
    Flat(FlatRate),
}

impl RateLookup for RateSource {
    fn reference_rate(&self, date: NaiveDate) -> f64 {
        match self {
            RateSource::History(history) => history.reference_rate(date),
            RateSource::Flat(flat) => flat.reference_rate(date),
        }
    }
}

impl RateArgs {
    fn load(&self) -> Result<RateSource> {
        match (&self.rates, self.flat_rate) {
            (Some(path), _) => {
                let history = load_rate_history(path)
                    .with_context(|| format!("Failed to load rate history from {}", path.display()))?;
                Ok(RateSource::History(history))
            }
            (None, Some(rate)) => Ok(RateSource::Flat(FlatRate(rate))),
            (None, None) => bail!("Either --rates or --flat-rate is required"),
        }
    }
}

/// Flat per-case line of the batch CSV
#[derive(Debug, Serialize)]
struct BatchRow<'a> {
    case_id: &'a str,
    months_simulated: u32,
    total_paid: f64,
    total_interest: f64,
    remaining_balance: f64,
    margin_only_total_paid: f64,
    capital_only_total_paid: f64,
    conservative_delta: f64,
    aggressive_delta: f64,
    excess_interest: f64,
}

impl<'a> From<&'a CaseReport> for BatchRow<'a> {
    fn from(report: &'a CaseReport) -> Self {
        Self {
            case_id: &report.case_id,
            months_simulated: report.months_simulated,
            total_paid: report.variable.total_paid,
            total_interest: report.variable.total_interest,
            remaining_balance: report.variable.remaining_balance,
            margin_only_total_paid: report.margin_only.total_paid,
            capital_only_total_paid: report.capital_only.total_paid,
            conservative_delta: report.savings.conservative_delta,
            aggressive_delta: report.savings.aggressive_delta,
            excess_interest: report.savings.excess_interest,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Simulate(args) => run_simulate(args),
        Command::Batch(args) => run_batch(args),
    }
}

fn run_simulate(args: SimulateArgs) -> Result<()> {
    let rates = args.rates.load()?;

    let limit = match args.as_of {
        Some(as_of) => limit_as_of(args.start_date, as_of, args.term_months)?,
        None => args.limit_months,
    };
    let input = LoanSimulationInput::with_reset_period(
        args.principal,
        args.term_months,
        args.margin_pct,
        args.wibor,
        args.start_date,
        limit,
    )?;

    let config = SimulationConfig {
        detailed_output: args.schedule.is_some(),
    };
    let runner = ScenarioRunner::with_config(rates, config);
    let report = runner.evaluate(&LoanCase {
        case_id: "cli".to_string(),
        input,
    });

    if let Some(path) = &args.schedule {
        write_schedule(path, &report.schedule)?;
    }

    if args.json {
        serde_json::to_writer_pretty(io::stdout().lock(), &report)?;
        println!();
        return Ok(());
    }

    println!("Loan Simulation");
    println!("===============\n");
    println!("  Principal:    {:.2}", args.principal);
    println!("  Term:         {} months", args.term_months);
    println!("  Margin:       {:.4}%", args.margin_pct);
    println!("  Index tenor:  {}", args.wibor);
    println!("  Start date:   {}", args.start_date);
    println!("  Simulated:    {} months", report.months_simulated);
    println!();

    println!("{:<14} {:>16} {:>16} {:>16}", "Scenario", "Total paid", "Interest", "Balance");
    println!("{}", "-".repeat(65));
    println!(
        "{:<14} {:>16.2} {:>16.2} {:>16.2}",
        "variable", report.variable.total_paid, report.variable.total_interest, report.variable.remaining_balance
    );
    println!(
        "{:<14} {:>16.2} {:>16.2} {:>16.2}",
        "margin_only",
        report.margin_only.total_paid,
        report.margin_only.total_interest,
        report.margin_only.remaining_balance
    );
    println!(
        "{:<14} {:>16.2} {:>16.2} {:>16}",
        "capital_only", report.capital_only.total_paid, 0.0, "-"
    );

    println!("\nSavings:");
    println!("  Conservative (vs margin only):  {:.2}", report.savings.conservative_delta);
    println!("  Aggressive (vs capital only):   {:.2}", report.savings.aggressive_delta);
    println!("  Excess interest:                {:.2}", report.savings.excess_interest);

    if let Some(path) = &args.schedule {
        println!("\nSchedule written to: {}", path.display());
    }

    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<()> {
    let rates = args.rates.load()?;
    let cases = load_cases(&args.cases)
        .with_context(|| format!("Failed to load loan cases from {}", args.cases.display()))?;

    let config = SimulationConfig {
        detailed_output: args.detailed,
    };
    let runner = ScenarioRunner::with_config(rates, config);
    let reports = match args.as_of {
        Some(as_of) => runner.evaluate_batch_as_of(&cases, as_of)?,
        None => runner.evaluate_batch(&cases),
    };

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Unable to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    if args.json {
        serde_json::to_writer_pretty(out, &reports)?;
    } else {
        let mut writer = csv::Writer::from_writer(out);
        for report in &reports {
            writer.serialize(BatchRow::from(report))?;
        }
        writer.flush()?;
    }

    if let Some(path) = &args.output {
        log::info!("Wrote {} case reports to {}", reports.len(), path.display());
    }

    Ok(())
}

fn write_schedule(path: &Path, rows: &[ScheduleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Unable to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
