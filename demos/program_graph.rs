use clap::{Parser, ValueEnum};

use lts_rs::expand::Evaluators;
use lts_rs::pg::{PgTransition, ProgramGraph};

#[derive(Debug, Copy, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for simplelog::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => simplelog::LevelFilter::Off,
            LogLevel::Error => simplelog::LevelFilter::Error,
            LogLevel::Warn => simplelog::LevelFilter::Warn,
            LogLevel::Info => simplelog::LevelFilter::Info,
            LogLevel::Debug => simplelog::LevelFilter::Debug,
            LogLevel::Trace => simplelog::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Upper bound of the shared counter.
    #[arg(value_name = "INT", default_value = "4")]
    limit: i64,

    /// Print the expanded system in DOT format.
    #[clap(long)]
    dot: bool,

    #[clap(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

/// A process that bumps `var` by `step` while it stays below `limit`, then halts.
fn worker(var: &str, step: i64, limit: i64) -> color_eyre::Result<ProgramGraph<&'static str, String>> {
    let mut pg = ProgramGraph::new();
    pg.set_name(format!("worker-{}", var));
    pg.add_location("run");
    pg.add_location("halt");
    pg.add_initial_location("run")?;
    pg.add_transition(PgTransition::new(
        "run",
        format!("{} + {} <= {}", var, step, limit),
        format!("{} := {} + {}", var, var, step),
        "run",
    ))?;
    pg.add_transition(PgTransition::new(
        "run",
        format!("{} + {} > {}", var, step, limit),
        "skip".to_string(),
        "halt",
    ))?;
    pg.add_initialization([format!("{} := 0", var)]);
    Ok(pg)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level.into(),
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();
    println!("args = {:?}", args);

    let left = worker("x", 1, args.limit)?;
    let right = worker("y", 2, args.limit)?;
    let pg = left.interleave(&right)?;
    println!("product locations: {}", pg.locations().len());
    println!("product transitions: {}", pg.transitions().len());

    let ts = pg.expand(&Evaluators::standard())?;
    println!("states: {}", ts.states().len());
    println!("transitions: {}", ts.transitions().len());

    let terminal = ts
        .states()
        .iter()
        .filter(|s| ts.is_state_terminal(s).unwrap_or(false))
        .count();
    println!("terminal states: {}", terminal);

    if args.dot {
        println!("{}", ts.to_dot()?);
    }

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());
    Ok(())
}
