use clap::{Parser, ValueEnum};

use lts_rs::circuit::{state_space_bound, Assignment, Circuit, CircuitTs};

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
    /// Width of the counter (number of registers).
    #[arg(value_name = "INT", default_value = "3")]
    bits: usize,

    /// Print the unrolled system in DOT format.
    #[clap(long)]
    dot: bool,

    #[clap(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

/// Ripple-carry counter: input `inc`, registers `r0..rN`, output `carry` when all bits are set.
struct Counter {
    bits: usize,
}

impl Counter {
    fn register(&self, i: usize) -> String {
        format!("r{}", i)
    }
}

impl Circuit for Counter {
    fn input_port_names(&self) -> Vec<String> {
        vec!["inc".to_string()]
    }

    fn register_names(&self) -> Vec<String> {
        (0..self.bits).map(|i| self.register(i)).collect()
    }

    fn compute_outputs(&self, inputs: &Assignment, registers: &Assignment) -> Assignment {
        let all_set = registers.values().all(|&b| b);
        let inc = inputs.get("inc").copied().unwrap_or(false);
        Assignment::from([("carry".to_string(), inc && all_set)])
    }

    fn update_registers(&self, inputs: &Assignment, registers: &Assignment) -> Assignment {
        let mut carry = inputs.get("inc").copied().unwrap_or(false);
        let mut next = Assignment::new();
        for i in 0..self.bits {
            let name = self.register(i);
            let bit = registers.get(&name).copied().unwrap_or(false);
            next.insert(name, bit ^ carry);
            carry &= bit;
        }
        next
    }
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

    let circuit = Counter { bits: args.bits };
    println!("state space bound: {}", state_space_bound(&circuit));

    let ts = CircuitTs::from_circuit(&circuit)?;
    println!("states: {}", ts.states().len());
    println!("transitions: {}", ts.transitions().len());
    println!("initial states: {}", ts.initial_states().len());
    println!("atomic propositions: {}", ts.atomic_propositions().len());

    let carries = ts
        .states()
        .iter()
        .filter(|s| ts.label(s).map(|l| l.contains("carry")).unwrap_or(false))
        .count();
    println!("states raising carry: {}", carries);

    if args.dot {
        println!("{}", ts.to_dot()?);
    }

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());
    Ok(())
}
