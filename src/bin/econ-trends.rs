use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use econ_trends::labels::{LabelKind, Offset, TripleOffsets};
use econ_trends::models::{INDEX_COLUMN, TimeKey};
use econ_trends::{Client, Dataset, Error, GeographyTriple, Panel, TableFormat};
use econ_trends::{growth, storage, table, viz};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "econ-trends",
    version,
    about = "Load, normalize, chart & tabulate regional economic panels"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the nation/state/metro comparison chart and table for one metro area.
    Chart(ChartArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DatasetArg {
    /// Annual population estimates (pop.csv)
    Pop,
    /// Monthly labor market statistics (lau.csv)
    Lau,
    /// Annual regional accounts (bea.csv)
    Bea,
}

impl From<DatasetArg> for Dataset {
    fn from(d: DatasetArg) -> Self {
        match d {
            DatasetArg::Pop => Dataset::Population,
            DatasetArg::Lau => Dataset::LaborMarket,
            DatasetArg::Bea => Dataset::RegionalAccounts,
        }
    }
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Metro/NECTA display name, e.g. "New York-Newark-Jersey City, NY-NJ-PA"
    #[arg(short, long)]
    area: String,
    /// Which hosted dataset to use (ignored with --input).
    #[arg(long, value_enum, default_value = "pop")]
    dataset: DatasetArg,
    /// Load the dataset from a local CSV instead of fetching it.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Metric column to analyze, e.g. Population or "Unemployment Rate".
    #[arg(short, long, default_value = "Population")]
    variable: String,
    /// Chart the source-cadence monthly series instead of annual averages.
    #[arg(long, default_value_t = false)]
    monthly: bool,
    /// Shade recession periods.
    #[arg(long, default_value_t = false)]
    recessions: bool,
    /// Chart output path (.svg or .png).
    #[arg(long, default_value = "chart.svg")]
    out: PathBuf,
    /// Width of the chart (default 1200).
    #[arg(long, default_value_t = 1200)]
    width: u32,
    /// Height of the chart (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Write the wide comparison table as CSV to this path.
    #[arg(long)]
    table: Option<PathBuf>,
    /// Write the working panel as tidy JSON to this path.
    #[arg(long)]
    dump: Option<PathBuf>,
    /// Signed vertical nudge for the nation label, in chart units.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    nation_shift: f64,
    /// Signed vertical nudge for the state label.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    state_shift: f64,
    /// Signed vertical nudge for the metro label.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    metro_shift: f64,
}

/// Chart plan for one metric, mirroring the dashboard tabs: which column is
/// plotted, how labels are spaced, and how the table is formatted.
struct ChartPlan {
    plot_variable: String,
    kind: LabelKind,
    title: String,
    y_axis_title: &'static str,
    table_format: TableFormat,
}

fn chart_plan(variable: &str, start_year: i32, monthly: bool) -> ChartPlan {
    match variable {
        "Unemployment Rate" => ChartPlan {
            plot_variable: variable.to_string(),
            kind: LabelKind::Rate,
            title: if monthly {
                "Monthly Unemployment Rate (Seasonally Adjusted)".to_string()
            } else {
                "Annual Average Unemployment Rate (Seasonally Adjusted)".to_string()
            },
            y_axis_title: "Percentage",
            table_format: TableFormat::Percentage,
        },
        "Real GDP (Millions)" => ChartPlan {
            plot_variable: INDEX_COLUMN.to_string(),
            kind: LabelKind::Level,
            title: format!("Real GDP Growth Index ({} Level=100)", start_year),
            y_axis_title: "Index",
            table_format: TableFormat::Thousands,
        },
        "Real Per Capita Personal Income" => ChartPlan {
            plot_variable: variable.to_string(),
            kind: LabelKind::PerCapitaLevel,
            title: "Real Per Capita Personal Income (2012 Dollars)".to_string(),
            y_axis_title: "Thousand Dollars",
            table_format: TableFormat::Thousands,
        },
        _ => ChartPlan {
            plot_variable: INDEX_COLUMN.to_string(),
            kind: if monthly {
                LabelKind::MonthlyIndex
            } else {
                LabelKind::Index
            },
            title: format!("{} Growth Index ({} Level=100)", variable, start_year),
            y_axis_title: "Index",
            table_format: TableFormat::Thousands,
        },
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Chart(args) => cmd_chart(args),
    }
}

fn cmd_chart(args: ChartArgs) -> Result<()> {
    let dataset = Dataset::from(args.dataset);
    let raw = match &args.input {
        Some(path) => storage::load_csv(path)?,
        None => Client::default().fetch(dataset)?,
    };
    let panel = raw.align(dataset.year_floor())?;
    log::info!(
        "aligned panel: {} rows across {} areas",
        panel.len(),
        panel.areas().len()
    );

    let triple = GeographyTriple::resolve(&args.area, &panel)?;
    let working = panel.select_areas(&triple.names());
    let key = if args.monthly {
        TimeKey::Date
    } else {
        dataset.time_key()
    };
    let start_year = working.year_range().map(|(lo, _)| lo).unwrap_or(2000);
    let plan = chart_plan(&args.variable, start_year, args.monthly);

    let working = growth::rebase(&working, &args.variable, key)?;
    let working = annotate_growth_rate(working, key)?;

    let offsets = TripleOffsets {
        nation: Offset::from_signed(args.nation_shift),
        state: Offset::from_signed(args.state_shift),
        metro: Offset::from_signed(args.metro_shift),
    };
    let figure = if args.monthly {
        viz::monthly_figure(
            &working,
            &triple,
            &plan.plot_variable,
            plan.kind,
            &plan.title,
            plan.y_axis_title,
            args.recessions,
            &offsets,
        )?
    } else {
        viz::trend_figure(
            &working,
            &triple,
            &plan.plot_variable,
            plan.kind,
            &plan.title,
            plan.y_axis_title,
            args.recessions,
            &offsets,
        )?
    };
    viz::render(&figure, &args.out, args.width, args.height)?;
    eprintln!("Wrote chart to {}", args.out.display());

    if let Some(path) = &args.table {
        let wide = table::format_table(&panel, &triple, &args.variable, plan.table_format)?;
        storage::save_table_csv(&wide, path)?;
        eprintln!("Wrote table to {}", path.display());
    }
    if let Some(path) = &args.dump {
        storage::save_json(&working, path)?;
        eprintln!("Wrote panel dump to {}", path.display());
    }
    Ok(())
}

/// CAGR over the rebased series. A single-period panel falls back to level
/// data without growth-rate annotation.
fn annotate_growth_rate(working: Panel, key: TimeKey) -> Result<Panel> {
    match growth::cagr(&working, INDEX_COLUMN, key) {
        Ok(panel) => Ok(panel),
        Err(Error::DegenerateRange) => {
            log::warn!("single-period panel; skipping growth-rate annotation");
            Ok(working)
        }
        Err(e) => Err(e.into()),
    }
}
