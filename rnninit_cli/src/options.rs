//! Command-line parsing for `rnninit`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Rec,
    Inp,
    Loadings { factor: bool },
    Params,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub command: Command,
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub out: Option<PathBuf>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("missing command")]
    MissingCommand,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("{0} needs a value")]
    MissingValue(&'static str),
    #[error("seed must be a non-negative integer, got {0:?}")]
    BadSeed(String),
    #[error("--factor only applies to the loadings command")]
    FactorWithoutLoadings,
}

pub fn parse<I, S>(args: I) -> Result<Options, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);

    let cmd = args.next().ok_or(UsageError::MissingCommand)?;
    let mut command = match cmd.as_str() {
        "rec" => Command::Rec,
        "inp" => Command::Inp,
        "loadings" => Command::Loadings { factor: false },
        "params" => Command::Params,
        "help" | "--help" | "-h" => Command::Help,
        _ => return Err(UsageError::UnknownCommand(cmd)),
    };

    let mut config = None;
    let mut seed = None;
    let mut out = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let v = args.next().ok_or(UsageError::MissingValue("--config"))?;
                config = Some(PathBuf::from(v));
            }
            "--out" => {
                let v = args.next().ok_or(UsageError::MissingValue("--out"))?;
                out = Some(PathBuf::from(v));
            }
            "--seed" => {
                let v = args.next().ok_or(UsageError::MissingValue("--seed"))?;
                seed = Some(v.parse().map_err(|_| UsageError::BadSeed(v))?);
            }
            "--factor" => match &mut command {
                Command::Loadings { factor } => *factor = true,
                _ => return Err(UsageError::FactorWithoutLoadings),
            },
            _ => return Err(UsageError::UnknownOption(arg)),
        }
    }

    Ok(Options {
        command,
        config,
        seed,
        out,
    })
}

pub fn usage() -> &'static str {
    "rnninit - random weight initialization for recurrent networks\n\
     Usage: rnninit <command> [--config FILE] [--seed N] [--out FILE]\n\n\
     Commands:\n\
     \x20 rec                 Recurrent weights + Dale mask\n\
     \x20 inp                 Input weights [n_inp x n_rec]\n\
     \x20 loadings [--factor] Low-rank loadings (or their Cholesky factor)\n\
     \x20 params              Print the effective parameters\n\
     \x20 help                Show this message\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_command_line() {
        let o = parse(["rec", "--config", "net.json", "--seed", "7", "--out", "w.json"]).unwrap();
        assert_eq!(o.command, Command::Rec);
        assert_eq!(o.config, Some(PathBuf::from("net.json")));
        assert_eq!(o.seed, Some(7));
        assert_eq!(o.out, Some(PathBuf::from("w.json")));
    }

    #[test]
    fn factor_flag_only_for_loadings() {
        let o = parse(["loadings", "--factor"]).unwrap();
        assert_eq!(o.command, Command::Loadings { factor: true });
        assert_eq!(parse(["inp", "--factor"]), Err(UsageError::FactorWithoutLoadings));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse(Vec::<String>::new()), Err(UsageError::MissingCommand));
        assert_eq!(
            parse(["train"]),
            Err(UsageError::UnknownCommand("train".to_string()))
        );
        assert_eq!(parse(["rec", "--seed"]), Err(UsageError::MissingValue("--seed")));
        assert_eq!(
            parse(["rec", "--seed", "-1"]),
            Err(UsageError::BadSeed("-1".to_string()))
        );
        assert_eq!(
            parse(["rec", "--verbose"]),
            Err(UsageError::UnknownOption("--verbose".to_string()))
        );
    }
}
