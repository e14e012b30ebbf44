use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dos_repattern::io::plan_file::{load_plan, write_plan_csv};
use dos_repattern::io::reporting::{
    breakdown_rows, format_units, render_breakdown, render_summary, write_breakdown_csv,
    write_json,
};
use dos_repattern::io::scenario::{
    default_plan, generate_seasonal_plan, SeasonalScenario, DEFAULT_SALES_TARGET,
};
use dos_repattern::{
    compare_plans, logging, max_feasible_sales, sales_repattern, validate, GoodLpBackend,
    PlanInputs, PlanningConfig, RepatternWeights, SolveStatus, SolverSettings,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(
    name = "dos-repattern",
    about = "Days-of-supply constrained sales repatterning",
    version
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve both models and compare ceiling against the recommended plan.
    Run(SolveArgs),
    /// Maximum sales achievable under the days-of-supply band.
    Envelope(SolveArgs),
    /// Rescale the baseline toward the sales target.
    Repattern(SolveArgs),
    /// Write a random seasonal plan as CSV.
    Sample(SampleArgs),
}

#[derive(Args, Debug, Clone)]
struct SolveArgs {
    /// Plan file (.csv in the planner table layout, or .json). Defaults to the built-in plan.
    #[arg(long, env = "DOS_REPATTERN_PLAN")]
    plan: Option<PathBuf>,
    #[arg(long, env = "DOS_REPATTERN_TARGET", default_value_t = DEFAULT_SALES_TARGET)]
    target: i64,
    #[arg(long, env = "DOS_REPATTERN_ALPHA", default_value_t = 1.0)]
    alpha: f64,
    #[arg(long, env = "DOS_REPATTERN_LAMBDA", default_value_t = 10.0)]
    lambda: f64,
    #[arg(long, env = "DOS_REPATTERN_TIME_LIMIT_SECS", default_value_t = 10.0)]
    time_limit_secs: f64,
    #[arg(long, env = "DOS_REPATTERN_MIP_GAP", default_value_t = 0.001)]
    mip_gap: f64,
    #[arg(long)]
    csv_out: Option<PathBuf>,
    #[arg(long)]
    json_out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct SampleArgs {
    #[arg(long)]
    out: PathBuf,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 10_000.0)]
    base_sales: f64,
    #[arg(long, default_value_t = 0.25)]
    amplitude: f64,
    #[arg(long, default_value_t = 800.0)]
    noise_sd: f64,
    #[arg(long, default_value_t = 0)]
    frozen_months: usize,
}

impl SolveArgs {
    fn config(&self) -> Result<PlanningConfig> {
        let time_limit = Duration::try_from_secs_f64(self.time_limit_secs)
            .with_context(|| format!("invalid --time-limit-secs {}", self.time_limit_secs))?;
        Ok(PlanningConfig {
            solver: SolverSettings {
                time_limit,
                mip_gap: self.mip_gap,
            },
            weights: RepatternWeights {
                alpha: self.alpha,
                lambda: self.lambda,
            },
            sales_target: self.target,
        })
    }

    fn inputs(&self) -> Result<PlanInputs> {
        match &self.plan {
            Some(path) => {
                load_plan(path).with_context(|| format!("loading plan {}", path.display()))
            }
            None => Ok(default_plan()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Run(args) => run(&args),
        Commands::Envelope(args) => envelope(&args),
        Commands::Repattern(args) => repattern(&args),
        Commands::Sample(args) => sample(&args),
    }
}

fn run(args: &SolveArgs) -> Result<()> {
    // 1. LOAD AND VALIDATE
    let config = args.config()?;
    let plan = validate(&args.inputs()?)?;

    // 2. SOLVE BOTH MODELS
    let comparison = compare_plans(&plan, &config, &GoodLpBackend::new())?;

    // 3. REPORT
    let rows = breakdown_rows(
        &plan,
        &comparison.repattern.projection,
        Some(&comparison.repattern.ratios),
    );
    println!("=== Summary ===");
    print!("{}", render_summary(&comparison));
    println!(
        "R_plus {:.4}  R_minus {:.4}  status {:?}",
        comparison.repattern.r_plus, comparison.repattern.r_minus, comparison.repattern.status
    );
    println!("\n=== Monthly Breakdown ===");
    print!("{}", render_breakdown(&rows));

    // 4. EXPORT
    if let Some(path) = &args.csv_out {
        write_breakdown_csv(path, &rows)?;
    }
    if let Some(path) = &args.json_out {
        write_json(path, &comparison)?;
    }
    Ok(())
}

fn envelope(args: &SolveArgs) -> Result<()> {
    let config = args.config()?;
    let plan = validate(&args.inputs()?)?;
    let result = max_feasible_sales(&plan, &config.solver, &GoodLpBackend::new())?;

    println!(
        "Max Sales Push: {}{}",
        format_units(result.max_total_sales),
        time_limit_note(result.status)
    );
    let rows = breakdown_rows(&plan, &result.projection, None);
    print!("{}", render_breakdown(&rows));

    if let Some(path) = &args.csv_out {
        write_breakdown_csv(path, &rows)?;
    }
    if let Some(path) = &args.json_out {
        write_json(path, &result)?;
    }
    Ok(())
}

fn repattern(args: &SolveArgs) -> Result<()> {
    let config = args.config()?;
    let plan = validate(&args.inputs()?)?;
    let result = sales_repattern(
        &plan,
        config.sales_target,
        &config.weights,
        &config.solver,
        &GoodLpBackend::new(),
    )?;

    println!(
        "Final Repattern: {}  Gap to Target: {}{}",
        format_units(result.projection.total_sales()),
        format_units(result.target_deviation),
        time_limit_note(result.status)
    );
    for warning in &result.warnings {
        println!("warning: {}", warning);
    }
    let rows = breakdown_rows(&plan, &result.projection, Some(&result.ratios));
    print!("{}", render_breakdown(&rows));

    if let Some(path) = &args.csv_out {
        write_breakdown_csv(path, &rows)?;
    }
    if let Some(path) = &args.json_out {
        write_json(path, &result)?;
    }
    Ok(())
}

fn sample(args: &SampleArgs) -> Result<()> {
    let scenario = SeasonalScenario {
        base_sales: args.base_sales,
        amplitude: args.amplitude,
        noise_sd: args.noise_sd,
        frozen_months: args.frozen_months,
        ..SeasonalScenario::default()
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let plan = generate_seasonal_plan(&mut rng, &scenario)?;

    let file = File::create(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    write_plan_csv(file, &plan)?;
    println!("Sample plan written to {}", args.out.display());
    Ok(())
}

fn time_limit_note(status: SolveStatus) -> &'static str {
    match status {
        SolveStatus::Optimal => "",
        SolveStatus::TimeLimited => " (time limit reached; best plan found so far)",
    }
}
