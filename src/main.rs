use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use glucose_dashboard::config::DashboardConfig;
use glucose_dashboard::dashboard::{Dashboard, DashboardView};
use glucose_dashboard::filter::FilterState;
use glucose_dashboard::models::{MealContext, SummaryPayload};
use glucose_dashboard::output::{load_readings, save_readings, save_summary, DirectorySink};
use glucose_dashboard::persistence::JsonFileStore;
use glucose_dashboard::simulation::{build_summary, ReadingSimulator};
use glucose_dashboard::sorting::{SortDirection, SortKey, SortOrder};
use glucose_dashboard::source::{source_from_config, DataLoader, LoadState};

#[derive(Parser)]
#[command(name = "glucose_dashboard")]
#[command(about = "Hyperglycemia alert summary dashboard")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate synthetic glucose readings as CSV
    Generate {
        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Number of readings (defaults to the configured count)
        #[arg(short, long)]
        records: Option<usize>,

        /// Random seed for reproducibility
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
    /// Detect hyperglycemia alerts in a readings CSV and write the summary JSON
    Summarize {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the dashboard for the configured summary source
    Report(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Only show alerts for this patient
    #[arg(long)]
    patient: Option<String>,

    /// Only show alerts for this meal context
    #[arg(long, value_parser = parse_meal_context)]
    context: Option<MealContext>,

    #[arg(long)]
    min_glucose: Option<f64>,

    #[arg(long)]
    max_glucose: Option<f64>,

    /// Drop any persisted filter before applying the options above
    #[arg(long)]
    clear: bool,

    /// Sort column: timestamp, patient, glucose, context or severity
    #[arg(long)]
    sort: Option<SortKey>,

    #[arg(long)]
    descending: bool,

    /// Write the filtered alerts as CSV into the export directory
    #[arg(long)]
    export: bool,
}

fn parse_meal_context(value: &str) -> Result<MealContext, String> {
    MealContext::from_label(value)
        .ok_or_else(|| "expected one of: Fasting, Post-prandial, Before sleep".to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let config = match &cli.config {
        Some(path) => {
            let config = DashboardConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {:?}", path))?;
            info!("Loaded configuration from {:?}", path);
            config
        },
        None => DashboardConfig::default(),
    };

    match cli.command {
        Command::Generate { output, records, seed } => {
            let mut generator_config = config.generator.clone();
            if let Some(n) = records {
                generator_config.records = n;
            }

            let mut simulator = ReadingSimulator::new(generator_config, Some(seed))?;
            let readings = simulator.generate()?;
            save_readings(&readings, &output)
                .with_context(|| format!("Failed to write readings to {:?}", output))?;
        },
        Command::Summarize { input, output } => {
            let readings = load_readings(&input)
                .with_context(|| format!("Failed to read readings from {:?}", input))?;
            let payload = build_summary(&readings, &config.summary, Local::now().naive_local());
            save_summary(&payload, &output)
                .with_context(|| format!("Failed to write summary to {:?}", output))?;
            info!("Summary with {} alerts saved to {:?}", payload.alerts.len(), output);
        },
        Command::Report(args) => run_report(&config, args)?,
    }

    Ok(())
}

fn run_report(config: &DashboardConfig, args: ReportArgs) -> Result<()> {
    let mut loader = DataLoader::new(source_from_config(&config.source));
    if let LoadState::Failed(message) = loader.load() {
        bail!("Could not load the summary ({}); run the report again to retry", message);
    }
    let payload = loader.into_payload()
        .context("Summary payload missing after load")?;

    let store = JsonFileStore::open(&config.filter_store)
        .with_context(|| format!("Failed to open filter store {:?}", config.filter_store))?;
    let mut dashboard = Dashboard::new(payload.alerts.clone(), store, config.trend.clone());

    if args.clear {
        dashboard.clear()?;
    }
    if let Some(patient) = args.patient {
        dashboard.set_patient(Some(patient))?;
    }
    if let Some(context) = args.context {
        dashboard.set_meal_context(Some(context))?;
    }
    dashboard.set_glucose_range(args.min_glucose, args.max_glucose)?;

    let direction = if args.descending { SortDirection::Descending } else { SortDirection::Ascending };
    let view = dashboard.view(args.sort.map(|key| SortOrder::new(key, direction)));
    print_report(&payload, dashboard.filter(), &view);

    if args.export {
        let mut sink = DirectorySink::new(&config.export_dir);
        let filename = dashboard.export_csv(&mut sink, Local::now().date_naive())?;
        println!("\nExported {}", sink.path_for(&filename).display());
    }

    Ok(())
}

fn print_report(payload: &SummaryPayload, filter: &FilterState, view: &DashboardView) {
    println!("Glucose alert summary (generated {})", payload.metadata.generated_at);
    println!("Threshold: {} mg/dL", payload.metadata.threshold);
    println!(
        "Filter: patient={} context={}",
        filter.patient.as_deref().unwrap_or("all"),
        filter.meal_context.as_ref().map(|c| c.label()).unwrap_or("all"),
    );
    if let Some((start, end)) = view.period {
        println!("Period: {} .. {}", start, end);
    }

    println!("\n== Overview ==");
    println!("Alerts:            {}", view.total_alerts());
    match view.max_glucose {
        Some(max) => println!("Max glucose:       {:.1} mg/dL", max),
        None => println!("Max glucose:       -"),
    }
    println!("Patients affected: {}", view.affected_patients());
    println!("Trend:             {}", view.trend);

    println!("\n== Average glucose by meal ==");
    for context in MealContext::ALL {
        let average = payload.meal_averages.get(&context).unwrap_or(0.0);
        println!("{:<15} {:>8.1} mg/dL", context.label(), average);
    }

    println!("\n== Alerts by context ==");
    for (context, count) in view.context_counts.iter() {
        println!("{:<15} {:>5}", context.label(), count);
    }

    println!("\n== Patients ==");
    for (patient, stats) in &view.patient_stats {
        println!(
            "{:<8} alerts={:<4} avg={:>7.1} max={:>7.1} min={:>7.1}",
            patient, stats.total_alerts, stats.avg_glucose, stats.max_glucose, stats.min_glucose
        );
    }

    println!("\n== Alerts ==");
    println!("{:<20} {:<8} {:>8} {:<15} {}", "Fecha/Hora", "Paciente", "Glucosa", "Contexto", "Severidad");
    for alert in &view.rows {
        println!(
            "{:<20} {:<8} {:>8.1} {:<15} {}",
            alert.timestamp, alert.patient_id, alert.glucose_level, alert.meal_context.label(), alert.severity
        );
    }
}
