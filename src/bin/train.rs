//! Fits `sin(2πx₁)·sin(2πx₂)` with a freshly trained network and reports how
//! well it does on held-out samples.

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use curve_fit::data::{sin_product, Dataset, Split};
use curve_fit::network::Network;
use curve_fit::trainer::{Logging, Trainer, TrainerConfig};

#[derive(Parser, Debug)]
#[command(name = "train", about = "Curve fitting with a multilayer perceptron")]
struct Cli {
    /// Number of samples to generate before splitting
    #[arg(long, default_value_t = 1000)]
    samples: usize,

    /// Share of the samples held out for validation
    #[arg(long, default_value_t = 0.15)]
    validation_ratio: f64,

    /// Share of the samples held out for testing
    #[arg(long, default_value_t = 0.15)]
    test_ratio: f64,

    /// Number of weight layers (hidden layers + 1)
    #[arg(short, long, default_value_t = 2)]
    layers: usize,

    /// Neurons per hidden layer, bias included
    #[arg(long, default_value_t = 4)]
    hidden: usize,

    #[arg(short = 'r', long, default_value_t = 0.05)]
    learning_rate: f64,

    #[arg(long, default_value_t = 1000)]
    max_epoch: usize,

    #[arg(long, default_value_t = 40)]
    max_validation_checks: usize,

    /// Seed for data generation and weight initialization
    #[arg(long)]
    seed: Option<u64>,

    /// Log the validation error every N epochs
    #[arg(long)]
    log_every: Option<usize>,

    /// Number of independent training runs
    #[arg(long, default_value_t = 1)]
    runs: usize,

    /// Print each training summary as JSON
    #[arg(long)]
    json: bool,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    for run in 1..=cli.runs {
        info!("Run {} of {}", run, cli.runs);
        let data = Dataset::generate(&mut rng, cli.samples, 2, sin_product);
        let split = data.split(cli.validation_ratio, cli.test_ratio)?;
        fit(&cli, split, run as u64)?;
    }
    Ok(())
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn fit(cli: &Cli, split: Split, run: u64) -> Result<()> {
    let Split {
        training,
        validation,
        test,
    } = split;
    info!(
        "{} training, {} validation, {} test samples",
        training.len(),
        validation.len(),
        test.len()
    );

    let mut config = TrainerConfig::default()
        .learning_rate(cli.learning_rate)
        .max_epoch(cli.max_epoch)
        .max_validation_checks(cli.max_validation_checks);
    if let Some(seed) = cli.seed {
        config = config.seed(seed.wrapping_add(run));
    }
    if let Some(freq) = cli.log_every {
        config = config.logging(Logging::Iterations(freq));
    }

    let network = Network::new(training.feature_count(), cli.hidden, cli.layers)?;
    let mut trainer = Trainer::new(network, training, validation, config)?;
    info!("Training started...");
    let summary = trainer.train();
    info!(
        "Last epoch: {}, Validation checks: {}, Last MSE: {}",
        summary.epoch_count, summary.validation_check_count, summary.last_mse
    );
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if test.is_empty() {
        return Ok(());
    }
    println!("Test results: (values are rounded)");
    for (i, (input, answer)) in test.iter().enumerate() {
        let output = trainer.predict(&input.to_vec());
        println!(
            "{}. x1: {:.2}, x2: {:.2}, output: {:.2}, answer: {:.2}, error: {:.2}",
            i + 1,
            input[0],
            input[1],
            output,
            answer,
            (output - answer).abs()
        );
    }
    println!("Test MSE: {:.4}", trainer.mean_squared_error(&test));
    Ok(())
}
