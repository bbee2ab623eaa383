//! FCF Model CLI
//!
//! Command-line presentation layer: prints or exports the historical table,
//! single projections and scenario comparisons.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};

use fcf_model::assumptions::{self, DashboardRanges, ScenarioParameters, ScenarioSet};
use fcf_model::history::{self, HistoricalTable};
use fcf_model::report::{self, year_label};
use fcf_model::{ModelError, ScenarioRunner};

#[derive(Parser, Debug)]
#[command(name = "fcf-model", version, about = "Free cash flow projections and scenario analysis")]
struct Cli {
    /// Directory containing historical.csv
    #[arg(long, env = "FCF_DATA_DIR", default_value = assumptions::DEFAULT_DATA_PATH, global = true)]
    data_dir: PathBuf,

    /// Override the base revenue (defaults to the latest historical revenue)
    #[arg(long, env = "FCF_BASE_REVENUE", global = true)]
    base_revenue: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the historical statements
    History,
    /// Project free cash flow for one set of assumptions
    Project(ProjectArgs),
    /// Compare named scenarios
    Scenarios(ScenarioArgs),
}

#[derive(Args, Debug)]
struct ProjectArgs {
    /// Number of projected years
    #[arg(long, env = "FCF_PROJECTION_YEARS", default_value_t = 5)]
    years: usize,

    /// Annual revenue growth (%)
    #[arg(long, default_value_t = 5.2, allow_negative_numbers = true)]
    growth: f64,

    /// EBIT margin (% of revenue)
    #[arg(long, default_value_t = 4.5, allow_negative_numbers = true)]
    ebit_margin: f64,

    /// Tax rate on EBIT (%)
    #[arg(long, default_value_t = 22.0, allow_negative_numbers = true)]
    tax_rate: f64,

    /// D&A (% of revenue)
    #[arg(long, default_value_t = 1.9, allow_negative_numbers = true)]
    da: f64,

    /// CAPEX (% of revenue)
    #[arg(long, default_value_t = 2.7, allow_negative_numbers = true)]
    capex: f64,

    /// Change in working capital (% of revenue)
    #[arg(long, default_value_t = -0.3, allow_negative_numbers = true)]
    wc: f64,

    /// Fiscal year of the first projected period
    #[arg(long)]
    first_year: Option<i32>,

    /// Also print the signed FCF components per year
    #[arg(long)]
    components: bool,
}

impl ProjectArgs {
    fn params(&self) -> ScenarioParameters {
        ScenarioParameters::new(self.growth, self.ebit_margin, self.tax_rate, self.da, self.capex, self.wc)
    }
}

#[derive(Args, Debug)]
struct ScenarioArgs {
    /// Scenario file (.csv or .json); defaults to the standard three scenarios
    #[arg(long)]
    file: Option<PathBuf>,

    /// Number of projected years
    #[arg(long, env = "FCF_PROJECTION_YEARS", default_value_t = 5)]
    years: usize,

    /// Evaluate scenarios on the thread pool
    #[arg(long)]
    parallel: bool,

    /// Fiscal year of the first projected period
    #[arg(long)]
    first_year: Option<i32>,
}

fn main() {
    env_logger::init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let history = load_history(&cli.data_dir)?;
    let mut out = open_output(cli.output.as_deref())?;

    match &cli.command {
        Command::History => print_history(&history, cli.format, &mut out)?,
        Command::Project(args) => run_projection(&cli, &history, args, &mut out)?,
        Command::Scenarios(args) => run_scenarios(&cli, &history, args, &mut out)?,
    }

    out.flush()?;
    Ok(())
}

fn load_history(data_dir: &Path) -> Result<HistoricalTable> {
    let path = data_dir.join("historical.csv");
    if path.exists() {
        history::load_history(&path).with_context(|| format!("loading {}", path.display()))
    } else {
        info!("{} not found, using built-in historical table", path.display());
        Ok(HistoricalTable::default_walmart())
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            let file = File::create(p).with_context(|| format!("creating {}", p.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    })
}

fn base_revenue(cli: &Cli, history: &HistoricalTable) -> Result<f64> {
    match cli.base_revenue {
        Some(revenue) => Ok(revenue),
        None => history.base_revenue().context("no base revenue available"),
    }
}

fn warn_out_of_range(ranges: &DashboardRanges, label: &str, params: &ScenarioParameters, years: usize) {
    for v in ranges.check(params, years) {
        warn!(
            "{}: {} = {} is outside the dashboard range [{}, {}]",
            label, v.field, v.value, v.range.min, v.range.max
        );
    }
}

fn print_history(history: &HistoricalTable, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    match format {
        OutputFormat::Csv => report::write_csv(history.records(), out)?,
        OutputFormat::Json => report::write_json(history.records(), out)?,
        OutputFormat::Table => {
            writeln!(out, "{:>9} {:>9} {:>7} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
                "Year", "Revenue", "Growth", "EBIT", "EBIAT", "D&A", "CAPEX", "dWC", "FCF")?;
            writeln!(out, "{}", "-".repeat(84))?;
            for r in history.records() {
                writeln!(out, "{:>9} {:>9.2} {:>6.1}% {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
                    r.year, r.revenue, r.revenue_growth_pct, r.ebit, r.ebiat, r.da, r.capex, r.wc_change, r.fcf)?;
            }
            for r in history.records().iter().filter(|r| !r.reconciles()) {
                writeln!(out, "  note: {} FCF differs from its components by {:.2}", r.year, r.fcf_gap())?;
            }
        }
    }
    Ok(())
}

fn run_projection(cli: &Cli, history: &HistoricalTable, args: &ProjectArgs, out: &mut dyn Write) -> Result<()> {
    let params = args.params();
    warn_out_of_range(&DashboardRanges::projection(), "projection", &params, args.years);

    let base = base_revenue(cli, history)?;
    let series = ScenarioRunner::new(base, args.years).run(&params)?;
    let first_year = args.first_year.or_else(|| history.next_fiscal_year());
    let rows = report::projection_rows(&series, &params, first_year);

    match cli.format {
        OutputFormat::Csv => report::write_csv(&rows, out)?,
        OutputFormat::Json => report::write_json(&rows, out)?,
        OutputFormat::Table => {
            writeln!(out, "Projection from base revenue {:.2} ({} years)", base, args.years)?;
            writeln!(out, "{:>6} {:>10} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
                "Year", "Revenue", "EBIT", "Taxes", "EBIAT", "D&A", "CAPEX", "dWC", "FCF")?;
            writeln!(out, "{}", "-".repeat(88))?;
            for r in &rows {
                writeln!(out, "{:>6} {:>10.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2}",
                    r.year, r.revenue, r.ebit, r.taxes, r.ebiat, r.da, r.capex, r.wc_change, r.fcf)?;
            }

            if args.components {
                writeln!(out, "\nFCF components:")?;
                writeln!(out, "{:>6} {:>9} {:>9} {:>9} {:>9} {:>9}", "Year", "EBIAT", "+D&A", "-CAPEX", "-dWC", "FCF")?;
                for c in series.components() {
                    writeln!(out, "{:>6} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2}",
                        year_label(first_year, c.period), c.ebiat, c.da, c.capex, c.wc_change, c.total())?;
                }
            }

            let summary = series.summary();
            writeln!(out, "\nSummary:")?;
            writeln!(out, "  Total FCF:     {:.2}", summary.total_fcf)?;
            writeln!(out, "  Average FCF:   {:.2}", summary.average_fcf)?;
            writeln!(out, "  Final revenue: {:.2}", summary.final_revenue)?;
        }
    }
    Ok(())
}

fn run_scenarios(cli: &Cli, history: &HistoricalTable, args: &ScenarioArgs, out: &mut dyn Write) -> Result<()> {
    let scenarios = match &args.file {
        Some(path) => assumptions::load_scenarios(path)
            .with_context(|| format!("loading scenarios from {}", path.display()))?,
        None => ScenarioSet::standard(),
    };

    let ranges = DashboardRanges::scenarios();
    for (label, params) in scenarios.iter() {
        warn_out_of_range(&ranges, label, params, args.years);
    }

    let runner = ScenarioRunner::new(base_revenue(cli, history)?, args.years);
    let outcome = if args.parallel {
        runner.evaluate_parallel(&scenarios)
    } else {
        runner.evaluate(&scenarios)
    };

    let results = match outcome {
        Ok(results) => results,
        Err(ModelError::Scenario { label, source, completed }) => {
            if !completed.is_empty() {
                let done: Vec<_> = completed.labels().collect();
                info!("scenarios completed before the failure: {}", done.join(", "));
            }
            return Err(anyhow::Error::new(*source).context(format!("scenario '{}' failed", label)));
        }
        Err(err) => return Err(err.into()),
    };

    let first_year = args.first_year.or_else(|| history.next_fiscal_year());

    match cli.format {
        OutputFormat::Csv => report::write_comparison_csv(&results, first_year, out)?,
        OutputFormat::Json => report::write_json(&results, out)?,
        OutputFormat::Table => {
            writeln!(out, "Scenario comparison - projected FCF")?;
            write!(out, "{:>6}", "Year")?;
            for label in results.labels() {
                write!(out, " {:>12}", label)?;
            }
            writeln!(out)?;
            for row in results.comparison() {
                write!(out, "{:>6}", year_label(first_year, row.period))?;
                for fcf in &row.fcf {
                    match fcf {
                        Some(v) => write!(out, " {:>12.2}", v)?,
                        None => write!(out, " {:>12}", "-")?,
                    }
                }
                writeln!(out)?;
            }

            writeln!(out, "\nScenario summary:")?;
            writeln!(out, "{:>12} {:>8} {:>8} {:>8} {:>12} {:>12}",
                "Scenario", "Growth", "EBIT%", "CAPEX%", "Accum. FCF", "Avg. FCF")?;
            for s in results.summary_rows() {
                writeln!(out, "{:>12} {:>8.1} {:>8.1} {:>8.1} {:>12.2} {:>12.2}",
                    s.scenario, s.revenue_growth_rate, s.ebit_margin, s.capex_percent,
                    s.accumulated_fcf, s.average_annual_fcf)?;
            }
        }
    }
    Ok(())
}
