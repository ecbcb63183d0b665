//! `rnninit`: generate RNN weight matrices from a JSON parameter file.
//!
//! Examples:
//!   rnninit rec --config net.json --seed 1 --out w_rec.json
//!   rnninit inp --config net.json
//!   rnninit loadings --factor
//!   rnninit params --config net.json

mod options;
mod output;

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;

use rnninit::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use options::{Command, Options, UsageError};
use output::{MatrixDoc, RecurrentDoc};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error(transparent)]
    Init(#[from] InitError),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            _ => 1,
        }
    }
}

fn load_params(opts: &Options) -> Result<NetworkParams, CliError> {
    let mut params = match &opts.config {
        Some(path) => {
            info!("Loading parameters from {}", path.display());
            NetworkParams::from_json_file(path)?
        }
        None => NetworkParams::default(),
    };
    if let Some(seed) = opts.seed {
        params.seed = Some(seed);
    }
    params.validate()?;
    Ok(params)
}

fn emit<T: Serialize>(doc: &T, out: Option<&Path>) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(doc)?;
    match out {
        Some(path) => {
            fs::write(path, json)?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn run(opts: Options) -> Result<(), CliError> {
    if opts.command == Command::Help {
        print!("{}", options::usage());
        return Ok(());
    }

    let params = load_params(&opts)?;
    let out = opts.out.as_deref();

    match opts.command {
        Command::Params => emit(&params, out),
        Command::Rec => {
            let rec = MatrixInitializer::new(params).recurrent();
            info!(
                "Recurrent matrix {}x{}, spectral radius {:.4}, {} inhibitory",
                rec.w_rec.nrows(),
                rec.w_rec.ncols(),
                rec.spectral_radius,
                rec.inhibitory().len()
            );
            emit(&RecurrentDoc::from(&rec), out)
        }
        Command::Inp => {
            let w_inp = MatrixInitializer::new(params).input();
            emit(&MatrixDoc::from(&w_inp), out)
        }
        Command::Loadings { factor } => {
            let output = if factor {
                LoadingsOutput::CholeskyFactor
            } else {
                LoadingsOutput::Loadings
            };
            let m = MatrixInitializer::new(params).loadings(output)?;
            emit(&MatrixDoc::from(&m), out)
        }
        Command::Help => Ok(()),
    }
}

fn run_args<I, S>(args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    options::parse(args).map_err(CliError::from).and_then(run)
}

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let result = run_args(std::env::args().skip(1));

    if let Err(e) = result {
        error!("{}", e);
        if let CliError::Usage(_) = e {
            eprint!("{}", options::usage());
        }
        process::exit(e.exit_code());
    }
}
