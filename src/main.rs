use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use u_assign::ilp::{GoodLpSolver, IlpSolver};
use u_assign::io::{read_student_records_from_path, write_student_records};
use u_assign::models::{ActivityCatalog, AssignmentConfig};
use u_assign::pipeline::AssignmentPipeline;
use u_assign::scenario::ScenarioGenerator;

/// Assigns students to one activity per period from ranked choices.
#[derive(Debug, Parser)]
#[command(name = "u-assign", version)]
struct Arguments {
    /// Choices CSV to read (or, with --generate, the file to write).
    input: PathBuf,

    /// Where to write the assignment CSV.
    #[arg(short, long, default_value = "assignment_outputs.csv")]
    output: PathBuf,

    /// Number of periods.
    #[arg(long)]
    periods: Option<usize>,

    /// Minimum students per activity per period.
    #[arg(long)]
    min_size: Option<u32>,

    /// Maximum students per activity per period.
    #[arg(long)]
    max_size: Option<u32>,

    /// Comma-separated activity catalog (defaults to the science fair set).
    #[arg(long, value_delimiter = ',')]
    activities: Vec<String>,

    /// Write N synthetic students to INPUT instead of solving.
    #[arg(long, value_name = "N")]
    generate: Option<usize>,

    /// Seed for --generate.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Popularity skew for --generate (0 = uniform).
    #[arg(long, default_value_t = 1.0)]
    skew: f64,
}

impl Arguments {
    fn config(&self) -> AssignmentConfig {
        let mut config = AssignmentConfig::science_fair();
        if !self.activities.is_empty() {
            config = config.with_catalog(ActivityCatalog::from_names(
                self.activities.iter().map(|a| a.trim()),
            ));
        }
        if let Some(periods) = self.periods {
            config = config.with_periods(periods);
        }
        let min = self.min_size.unwrap_or(config.capacity.min);
        let max = self.max_size.unwrap_or(config.capacity.max);
        config.with_capacity(min, max)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Arguments::parse();
    let config = args.config();

    if let Some(students) = args.generate {
        return generate(&args, &config, students);
    }

    let records = read_student_records_from_path(&args.input, config.ranks())
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let solver = GoodLpSolver::new();
    info!(
        "assigning {} students to {} activities over {} periods with {}",
        records.len(),
        config.catalog.len(),
        config.periods,
        solver.name()
    );
    let outcome = AssignmentPipeline::new(config, solver)
        .run_to_path(&records, &args.output)
        .with_context(|| format!("assignment to {} failed", args.output.display()))?;

    if let Some(objective) = outcome.objective {
        info!("objective value: {objective}");
    }
    for line in outcome.report.to_string().lines() {
        info!("{line}");
    }
    Ok(())
}

fn generate(args: &Arguments, config: &AssignmentConfig, students: usize) -> Result<()> {
    let records = ScenarioGenerator::new(args.seed)
        .with_students(students)
        .with_ranks(config.ranks())
        .with_skew(args.skew)
        .generate(&config.catalog);

    let file = std::fs::File::create(&args.input)
        .with_context(|| format!("failed to create {}", args.input.display()))?;
    write_student_records(file, &records, config.ranks())?;
    info!(
        "wrote {} synthetic students to {}",
        records.len(),
        args.input.display()
    );
    Ok(())
}
