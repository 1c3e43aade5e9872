//! Entropy Keylab CLI
//!
//! Runs the four-group experiment and prints a statistics and attack
//! report. Physical bits come from a serial device when built with the
//! `serial` feature, otherwise from a simulated biased device.

use clap::{Parser, ValueEnum};
use entropy_keylab::{
    config::ExperimentConfig,
    experiment::{Experiment, ExperimentReport, GroupOutcome, GroupReport},
    source::{LineChannel, MockChannel},
    AttackResult, StatReport,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON report
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "entropy-keylab",
    version,
    about = "Compare randomness sources by statistics and key-recovery resistance"
)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Message to encrypt (read from stdin if omitted)
    #[arg(short, long)]
    message: Option<String>,

    /// Seed of the deterministic group
    #[arg(long)]
    seed: Option<u64>,

    /// Seed search bound
    #[arg(long)]
    max_seed: Option<u64>,

    /// Brute-force attempt bound
    #[arg(long)]
    max_attempts: Option<u64>,

    /// Worker threads per attack
    #[arg(short, long)]
    workers: Option<usize>,

    /// Serial device of the physical source
    #[arg(long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(long)]
    baud: Option<u32>,

    /// Use a simulated physical device instead of the serial port
    #[arg(long)]
    mock_physical: bool,

    /// Seed of the simulated physical device
    #[arg(long, default_value_t = 1)]
    mock_seed: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(io::stderr)
        .init();

    info!("Entropy Keylab v{}", entropy_keylab::VERSION);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let experiment = match Experiment::new(config) {
        Ok(experiment) => experiment,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut channel = physical_channel(&cli, experiment.config().bit_count);
    let report = experiment.run(&mut *channel);

    match cli.format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to encode report: {}", e);
                std::process::exit(1);
            }
        },
    }
}

/// Builds the configuration from file, flags and stdin, in that order.
fn load_config(cli: &Cli) -> Result<ExperimentConfig, String> {
    let mut config = match &cli.config {
        Some(path) => ExperimentConfig::from_file(path).map_err(|e| e.to_string())?,
        None => ExperimentConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(max_seed) = cli.max_seed {
        config.attack.max_seed = max_seed;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.attack.max_attempts = max_attempts;
    }
    if let Some(workers) = cli.workers {
        config.attack.workers = workers;
    }
    if let Some(port) = &cli.port {
        config.channel.port = port.clone();
    }
    if let Some(baud) = cli.baud {
        config.channel.baud_rate = baud;
    }

    if let Some(message) = &cli.message {
        config.message = message.clone();
    } else if config.message.is_empty() {
        config.message = prompt_message().map_err(|e| format!("Failed to read message: {}", e))?;
    }

    Ok(config)
}

fn prompt_message() -> io::Result<String> {
    eprint!("Message: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(feature = "serial")]
fn physical_channel(cli: &Cli, bits: usize) -> Box<dyn LineChannel> {
    if cli.mock_physical {
        info!("Using simulated physical device");
        return Box::new(MockChannel::simulated_for_bits(cli.mock_seed, bits));
    }
    Box::new(entropy_keylab::source::physical::SerialChannel::new())
}

#[cfg(not(feature = "serial"))]
fn physical_channel(cli: &Cli, bits: usize) -> Box<dyn LineChannel> {
    if !cli.mock_physical {
        tracing::warn!("Built without the `serial` feature; using simulated physical device");
    }
    Box::new(MockChannel::simulated_for_bits(cli.mock_seed, bits))
}

fn print_report(report: &ExperimentReport) {
    println!("\n================ EXPERIMENT ================");
    println!("Started: {}", report.started_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Message: {}", report.message);

    println!("\n================ STATISTICS ================");
    for group in &report.groups {
        println!("\n--- Group: {} ---", group.kind);
        match &group.outcome {
            GroupOutcome::Completed {
                stats, ciphertext, ..
            } => {
                print_stats(stats);
                println!("  Ciphertext:          {}", ciphertext.to_hex());
            }
            GroupOutcome::Failed { error } => println!("  FAILED: {}", error),
        }
    }

    println!("\n================ FINAL REPORT ================");
    for group in &report.groups {
        print_attack(group);
    }
    println!("\n================ END ================");
}

fn print_stats(stats: &StatReport) {
    println!("  Total bits:          {}", stats.length);
    println!("  Frequency of ones:   {:.4}", stats.one_frequency);
    println!("  Shannon entropy:     {:.4}", stats.entropy);
    match stats.autocorrelation {
        Some(r) => println!("  Autocorrelation:     {:.4}", r),
        None => println!("  Autocorrelation:     n/a"),
    }
    println!("  Uniformity p-value:  {:.4}", stats.uniformity_p_value);
}

fn print_attack(group: &GroupReport) {
    println!("\n{}:", group.kind);
    let Some(attack) = group.attack() else {
        println!("   Not attacked (group failed)");
        return;
    };
    print_attack_result(attack);
}

fn print_attack_result(attack: &AttackResult) {
    println!("   Broken?  {}", attack.succeeded());
    println!("   Time:    {:.4} s", attack.elapsed().as_secs_f64());
    match attack.seed() {
        Some(seed) => println!("   Tried:   {} candidates (seed {})", attack.attempts(), seed),
        None => println!("   Tried:   {} candidates", attack.attempts()),
    }
    match attack.recovered_plaintext() {
        Some(text) => println!("   Recovered message: {}", text),
        None => println!("   Recovered message: COULD NOT DECRYPT"),
    }
}
