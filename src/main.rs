//! decisiontree CLI: grow a tree on an encoded dataset and score it.

use std::error::Error as _;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use decisiontree::encoded::{DecodeError, EncodedDataset};
use decisiontree::eval::{evaluate, parse_fraction, train_test, EvalError, Holdout};
use decisiontree::logging::{self, LoggingError};
use decisiontree::{Criterion, TreeBuilder, TreeConfig};

#[derive(Parser, Debug)]
#[command(name = "decisiontree")]
#[command(about = "Grow a categorical decision tree and report its accuracy")]
#[command(version)]
struct Cli {
    /// Dataset directory holding label-values, feature-names, train and test
    #[arg(short, long, default_value = "data/mushrooms")]
    data: PathBuf,

    /// How candidate splits are scored
    #[arg(short, long, value_enum, default_value_t = Criterion::Summed)]
    criterion: Criterion,

    /// Grow sibling subtrees in parallel
    #[arg(long)]
    parallel: bool,

    /// Hold out this fraction of the training records for testing instead of
    /// reading the test file
    #[arg(long, value_parser = parse_fraction)]
    holdout: Option<f64>,

    /// Seed for the holdout shuffle
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Write the grown tree as JSON
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("failed to write {path}")]
    Dump {
        path: PathBuf,
        source: std::io::Error
    },
    #[error("failed to serialize tree")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Eval(#[from] EvalError)
}

fn run(cli: Cli) -> Result<(), Error> {
    logging::init(logging::level_for(cli.verbose))?;
    info!("Algorithm started.");

    let dataset = EncodedDataset::open(&cli.data)?;
    let holdout = cli.holdout.map(|fraction| Holdout {
        fraction: fraction,
        seed: cli.seed
    });
    let split = train_test(dataset, holdout)?;

    let config = TreeConfig::default()
        .with_criterion(cli.criterion)
        .with_parallel(cli.parallel);
    let root = TreeBuilder::from_config(&config).build(&split.train, &split.catalog);

    if let Some(path) = cli.dump {
        let file = File::create(&path).map_err(|e| Error::Dump {
            path: path.clone(),
            source: e
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), &root)?;
        info!(path = %path.display(), "wrote tree");
    }

    info!(records = split.test.len(), "starting predictions");
    evaluate(&root, &split.test);
    info!("Algorithm completed.");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            let mut cause = e.source();
            while let Some(c) = cause {
                eprintln!("  caused by: {}", c);
                cause = c.source();
            }
            ExitCode::FAILURE
        }
    }
}
