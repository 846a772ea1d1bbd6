//! Command-line parsing for the ideal-curve selector.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the selection/classification code.
//!
//! Input paths, the tolerance factor and the output directory can also come
//! from the environment (and therefore from a `.env` file, which the binary
//! loads before parsing). Behavior switches are command-line only.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ACCEPTED_FACTOR, MissingXPolicy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "ideal",
    version,
    about = "Select ideal curves for training data and classify test points"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Select ideal curves, classify test points, and write databases/exports.
    Run(RunArgs),
    /// Select ideal curves and print the selection table only.
    Select(SelectArgs),
}

/// Inputs shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Training CSV (`x` column followed by one column per training curve).
    #[arg(long, env = "IDEAL_TRAIN", value_name = "CSV")]
    pub train: PathBuf,

    /// Candidate ("ideal") CSV (`x` column followed by one column per candidate).
    #[arg(long, env = "IDEAL_IDEAL", value_name = "CSV")]
    pub ideal: PathBuf,

    /// Factor applied to each fit's maximum deviation to get its tolerance.
    #[arg(long, env = "IDEAL_TOLERANCE_FACTOR", default_value_t = ACCEPTED_FACTOR)]
    pub tolerance_factor: f64,
}

/// Options for a full run.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Test CSV with a single `x,y` curve of points to classify.
    #[arg(long, env = "IDEAL_TEST", value_name = "CSV")]
    pub test: PathBuf,

    /// Directory for databases and exports.
    #[arg(long, env = "IDEAL_OUT_DIR", default_value = "output")]
    pub out_dir: PathBuf,

    /// Skip writing the SQLite databases.
    #[arg(long)]
    pub no_db: bool,

    /// What to do when a test point's x is missing from a selected curve.
    #[arg(long, value_enum, default_value_t = MissingXPolicy::FailFast)]
    pub on_missing_x: MissingXPolicy,

    /// Render ASCII plots of every fit and every classified point.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for selection only.
#[derive(Debug, Args, Clone)]
pub struct SelectArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Render ASCII plots of every fit.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from([
            "ideal", "run", "--train", "t.csv", "--ideal", "i.csv", "--test", "x.csv",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.inputs.tolerance_factor, std::f64::consts::SQRT_2);
        assert_eq!(args.on_missing_x, MissingXPolicy::FailFast);
        assert_eq!(args.out_dir, PathBuf::from("output"));
        assert!(!args.no_db);
    }

    #[test]
    fn env_backed_flags() {
        use clap::CommandFactory;

        let cmd = Cli::command();
        let run = cmd.find_subcommand("run").unwrap();
        let env_of = |id: &str| {
            run.get_arguments()
                .find(|a| a.get_id() == id)
                .unwrap()
                .get_env()
                .map(|e| e.to_string_lossy().into_owned())
        };

        assert_eq!(env_of("train").as_deref(), Some("IDEAL_TRAIN"));
        assert_eq!(env_of("ideal").as_deref(), Some("IDEAL_IDEAL"));
        assert_eq!(env_of("tolerance_factor").as_deref(), Some("IDEAL_TOLERANCE_FACTOR"));
        assert_eq!(env_of("test").as_deref(), Some("IDEAL_TEST"));
        assert_eq!(env_of("out_dir").as_deref(), Some("IDEAL_OUT_DIR"));
        for id in ["no_db", "on_missing_x", "plot", "width", "height"] {
            assert_eq!(env_of(id), None, "{id}");
        }
    }

    #[test]
    fn missing_x_policy_values() {
        let cli = Cli::try_parse_from([
            "ideal", "select", "--train", "t.csv", "--ideal", "i.csv", "--tolerance-factor", "2",
        ])
        .unwrap();
        let Command::Select(args) = cli.command else {
            panic!("expected select");
        };
        assert_eq!(args.inputs.tolerance_factor, 2.0);

        let cli = Cli::try_parse_from([
            "ideal", "run", "--train", "t", "--ideal", "i", "--test", "x", "--on-missing-x", "skip",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.on_missing_x, MissingXPolicy::Skip);
    }
}
