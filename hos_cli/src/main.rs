use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use hos_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hos-plan")]
#[command(about = "Hours-of-service trip schedule planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a trip and print its duty schedule
    Plan {
        /// Total trip distance in miles
        #[arg(long, allow_negative_numbers = true)]
        distance: f64,

        /// Hours already used in the current duty cycle
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        cycle_used: f64,

        /// Where the driver starts
        #[arg(long, default_value = "Current location")]
        from: String,

        /// Pickup location
        #[arg(long, default_value = "Pickup")]
        pickup: String,

        /// Dropoff location
        #[arg(long, default_value = "Dropoff")]
        to: String,

        /// First day of the trip (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start_date: Option<String>,

        /// Write the plan as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write the daily log segments as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write JSON and CSV into the configured export directory
        #[arg(long)]
        export: bool,
    },

    /// Print the effective hours-of-service rules
    Rules,
}

fn main() -> Result<()> {
    // Initialize logging
    hos_core::logging::init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Plan {
            distance,
            cycle_used,
            from,
            pickup,
            to,
            start_date,
            json,
            csv,
            export,
        } => {
            let start_date = parse_start_date(start_date.as_deref())?;
            let request = TripRequest {
                current_location: from,
                pickup_location: pickup,
                drop_location: to,
                total_distance_miles: distance,
                cycle_used_hours: cycle_used,
                start_date,
            };
            cmd_plan(request, json, csv, export, &config)
        }
        Commands::Rules => cmd_rules(&config),
    }
}

fn parse_start_date(input: Option<&str>) -> Result<NaiveDate> {
    match input {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
            Error::InvalidInput(format!("start date {:?} is not YYYY-MM-DD: {}", s, e))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn cmd_plan(
    request: TripRequest,
    json: Option<PathBuf>,
    csv: Option<PathBuf>,
    export: bool,
    config: &Config,
) -> Result<()> {
    tracing::debug!("Planning with rules {:?}", config.rules);
    let engine = HosEngine::new(config.rules.clone())?;
    let plan = plan_trip(&engine, request)?;

    display_plan(&plan);

    let mut json_targets: Vec<PathBuf> = json.into_iter().collect();
    let mut csv_targets: Vec<PathBuf> = csv.into_iter().collect();
    if export {
        let stem = format!("trip-{}", plan.id);
        json_targets.push(config.output.export_dir.join(format!("{}.json", stem)));
        csv_targets.push(config.output.export_dir.join(format!("{}.csv", stem)));
    }

    for path in &json_targets {
        write_plan_json(&plan, path)?;
        println!("✓ Plan written to {}", path.display());
    }
    for path in &csv_targets {
        let rows = write_log_csv(&plan, path)?;
        println!("✓ {} log segments written to {}", rows, path.display());
    }

    Ok(())
}

fn cmd_rules(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(&config.rules)
        .map_err(|e| Error::Config(format!("Failed to render rules: {}", e)))?;
    print!("{}", rendered);
    Ok(())
}

fn display_plan(plan: &TripPlan) {
    let request = &plan.request;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  TRIP PLAN");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  {} → {} → {}",
        request.current_location, request.pickup_location, request.drop_location
    );
    println!(
        "  Distance: {:.1} miles, cycle used: {:.1}h",
        request.total_distance_miles, request.cycle_used_hours
    );

    if plan.daily_logs.is_empty() {
        println!();
        println!("  Nothing to schedule.");
        println!();
        return;
    }

    for log in &plan.daily_logs {
        println!();
        println!("  Day {} ({})", log.day, log.date);
        for segment in &log.segments {
            let activity = plan
                .stops
                .iter()
                .find(|s| s.day_number == segment.day && s.start_minute == segment.start_minute)
                .map(|s| format!("{} ({})", s.kind.as_str(), s.location_name))
                .unwrap_or_default();
            println!(
                "    {}-{}  {:<8} {}",
                clock(segment.start_minute),
                clock(segment.end_minute),
                segment.status.as_str(),
                activity
            );
        }
        println!(
            "    Driving {} | On duty {} | Off duty {}",
            hours_minutes(log.totals.driving_minutes),
            hours_minutes(log.totals.on_duty_minutes),
            hours_minutes(log.totals.off_duty_minutes)
        );
    }

    let summary = &plan.summary;
    println!();
    println!("─────────────────────────────────────────");
    println!("  Days: {}", summary.total_days);
    println!(
        "  Driving: {} ({:.1} miles)",
        hours_minutes(summary.total_driving_minutes),
        summary.simulated_miles
    );
    println!("  On duty: {}", hours_minutes(summary.total_on_duty_minutes));
    println!("  Cycle hours remaining: {:.2}", summary.cycle_hours_remaining);
    if !summary.is_complete() {
        println!(
            "  ⚠ Duty cycle exhausted with {:.1} miles left to drive",
            summary.unfinished_miles
        );
    }
    println!();
}

fn clock(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

fn hours_minutes(minutes: u32) -> String {
    format!("{}h{:02}m", minutes / 60, minutes % 60)
}
