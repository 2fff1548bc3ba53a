use std::collections::HashSet;

use clap::{Parser, ValueEnum};

use lts_rs::transition::Transition;
use lts_rs::ts::TransitionSystem;

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
    /// Number of buffer slots shared by the producer and the consumer.
    #[arg(value_name = "INT", default_value = "2")]
    slots: usize,

    /// Synchronize the buffer with its neighbours on `put` and `get`.
    #[clap(long)]
    handshake: bool,

    /// Print the product in DOT format.
    #[clap(long)]
    dot: bool,

    #[clap(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

type Ts = TransitionSystem<String, String, String>;

/// Producer: `ready -produce-> loaded -put-> ready`.
fn producer() -> color_eyre::Result<Ts> {
    let mut ts = Ts::new();
    ts.set_name("producer");
    ts.add_all_states(["ready".to_string(), "loaded".to_string()]);
    ts.add_all_actions(["produce".to_string(), "put".to_string()]);
    ts.add_atomic_proposition("loaded".to_string());
    ts.add_initial_state("ready".to_string())?;
    ts.add_transition(Transition::new("ready".to_string(), "produce".to_string(), "loaded".to_string()))?;
    ts.add_transition(Transition::new("loaded".to_string(), "put".to_string(), "ready".to_string()))?;
    ts.add_to_label("loaded".to_string(), "loaded".to_string())?;
    Ok(ts)
}

/// Buffer with `n` slots: `k -put-> k+1` and `k -get-> k-1`.
fn buffer(n: usize) -> color_eyre::Result<Ts> {
    let mut ts = Ts::new();
    ts.set_name("buffer");
    ts.add_all_states((0..=n).map(|k| format!("b{}", k)));
    ts.add_all_actions(["put".to_string(), "get".to_string()]);
    ts.add_all_atomic_propositions(["empty".to_string(), "full".to_string()]);
    ts.add_initial_state("b0".to_string())?;
    for k in 0..n {
        ts.add_transition(Transition::new(format!("b{}", k), "put".to_string(), format!("b{}", k + 1)))?;
        ts.add_transition(Transition::new(format!("b{}", k + 1), "get".to_string(), format!("b{}", k)))?;
    }
    ts.add_to_label("b0".to_string(), "empty".to_string())?;
    ts.add_to_label(format!("b{}", n), "full".to_string())?;
    Ok(ts)
}

/// Consumer: `idle -get-> busy -consume-> idle`.
fn consumer() -> color_eyre::Result<Ts> {
    let mut ts = Ts::new();
    ts.set_name("consumer");
    ts.add_all_states(["idle".to_string(), "busy".to_string()]);
    ts.add_all_actions(["get".to_string(), "consume".to_string()]);
    ts.add_initial_state("idle".to_string())?;
    ts.add_transition(Transition::new("idle".to_string(), "get".to_string(), "busy".to_string()))?;
    ts.add_transition(Transition::new("busy".to_string(), "consume".to_string(), "idle".to_string()))?;
    Ok(ts)
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

    // The buffer takes `put` from the producer and hands out `get` to the consumer.
    let (put, get): (HashSet<String>, HashSet<String>) = if args.handshake {
        (HashSet::from(["put".to_string()]), HashSet::from(["get".to_string()]))
    } else {
        (HashSet::new(), HashSet::new())
    };

    let left = producer()?.interleave_with_handshake(&buffer(args.slots)?, &put)?;
    let system = left.interleave_with_handshake(&consumer()?, &get)?;

    println!("states: {}", system.states().len());
    println!("transitions: {}", system.transitions().len());
    println!("action-deterministic: {}", system.is_action_deterministic());
    println!("AP-deterministic: {}", system.is_ap_deterministic());

    let full = system
        .states()
        .iter()
        .filter(|s| system.label(s).map(|l| l.contains("full")).unwrap_or(false))
        .count();
    println!("states with a full buffer: {}", full);

    if args.dot {
        println!("{}", system.to_dot()?);
    }

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());
    Ok(())
}
