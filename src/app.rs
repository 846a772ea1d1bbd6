//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - runs selection + classification
//! - prints reports/plots
//! - writes databases and exports

use std::path::Path;

use clap::Parser;

use crate::cli::{Command, InputArgs, RunArgs, SelectArgs};
use crate::domain::{ClassificationResult, FittedCurve, RunConfig};
use crate::error::AppError;
use crate::io::export::{to_records, write_fits_json, write_mapping_csv};
use crate::io::sqlite::{write_curve_table, write_mapping_table};

pub mod logging;
pub mod pipeline;

/// Entry point for the `ideal` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is normal; anything else is worth a warning once logging is up.
    let dotenv = dotenvy::dotenv();
    logging::init();
    if let Err(err) = dotenv {
        if !err.not_found() {
            tracing::warn!(%err, "ignoring unreadable .env file");
        }
    }

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Select(args) => handle_select(args),
    }
}

fn handle_select(args: SelectArgs) -> Result<(), AppError> {
    let config = select_config_from_args(&args);
    let selection = pipeline::run_selection(&config)?;

    println!(
        "{}",
        crate::report::format_selection(&selection.fitted, &selection.rankings)
    );
    if config.plot {
        print_fit_plots(&selection.fitted, &config);
    }
    Ok(())
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let selection = pipeline::run_selection(&config)?;

    println!(
        "{}",
        crate::report::format_selection(&selection.fitted, &selection.rankings)
    );
    if config.plot {
        print_fit_plots(&selection.fitted, &config);
    }

    let points = pipeline::load_test_points(&config)?;
    let results = pipeline::classify(&points, &selection.fitted, config.missing_x)?;

    let summary = crate::report::summarize_classification(&results, &selection.fitted);
    println!("{}", crate::report::format_classification(&summary));
    if config.plot {
        print_classification_plots(&results, &config);
    }

    write_outputs(&config, &selection, &results)
}

fn write_outputs(
    config: &RunConfig,
    selection: &pipeline::Selection,
    results: &[ClassificationResult<'_>],
) -> Result<(), AppError> {
    let dir = &config.out_dir;
    std::fs::create_dir_all(dir).map_err(|e| {
        AppError::new(2, format!("Failed to create output dir '{}': {e}", dir.display()))
    })?;

    let records = to_records(results);
    let mut written = Vec::new();

    if config.write_db {
        let training_db = dir.join("training.db");
        write_curve_table(&training_db, "training", &selection.training, " (training func)")?;
        written.push(training_db);

        let ideal_db = dir.join("ideal.db");
        write_curve_table(&ideal_db, "ideal", &selection.ideal, " (ideal func)")?;
        written.push(ideal_db);

        let mapping_db = dir.join("mapping.db");
        write_mapping_table(&mapping_db, &records)?;
        written.push(mapping_db);
    }

    let mapping_csv = dir.join("mapping.csv");
    write_mapping_csv(&mapping_csv, &records)?;
    written.push(mapping_csv);

    let fits_json = dir.join("fits.json");
    write_fits_json(&fits_json, &selection.fitted)?;
    written.push(fits_json);

    println!("Files written:");
    for path in &written {
        println!("- {}", path.display());
    }
    Ok(())
}

fn print_fit_plots(fitted: &[FittedCurve], config: &RunConfig) {
    let mut sorted: Vec<&FittedCurve> = fitted.iter().collect();
    sorted.sort_by(|a, b| a.training().name().cmp(b.training().name()));
    for fit in sorted {
        println!(
            "{}",
            crate::plot::render_fit_plot(fit, config.plot_width, config.plot_height)
        );
    }
}

fn print_classification_plots(results: &[ClassificationResult<'_>], config: &RunConfig) {
    for result in results {
        if let Some(plot) =
            crate::plot::render_classification_plot(result, config.plot_width, config.plot_height)
        {
            println!("{plot}");
        }
    }
}

pub fn run_config_from_args(args: &RunArgs) -> RunConfig {
    RunConfig {
        test_path: Some(args.test.clone()),
        out_dir: args.out_dir.clone(),
        write_db: !args.no_db,
        missing_x: args.on_missing_x,
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
        ..base_config(&args.inputs)
    }
}

pub fn select_config_from_args(args: &SelectArgs) -> RunConfig {
    RunConfig {
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
        ..base_config(&args.inputs)
    }
}

fn base_config(inputs: &InputArgs) -> RunConfig {
    RunConfig {
        train_path: inputs.train.clone(),
        ideal_path: inputs.ideal.clone(),
        test_path: None,
        out_dir: Path::new("output").to_path_buf(),
        write_db: false,
        tolerance_factor: inputs.tolerance_factor,
        missing_x: Default::default(),
        plot: false,
        plot_width: 80,
        plot_height: 20,
    }
}
