use clap::Parser;

use log::{error, info};
use std::process::ExitCode;

use voc2yolo::{run_pipeline, Args, RecreateDir};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    for (flag, dir) in [
        ("annotations_dir", &args.annotations_dir),
        ("images_dir", &args.images_dir),
    ] {
        if !dir.is_dir() {
            error!("The specified {} does not exist: {}", flag, dir.display());
            return ExitCode::FAILURE;
        }
    }

    info!("Starting the conversion process...");

    match run_pipeline(&args.to_config(), &RecreateDir) {
        Ok(stats) => {
            stats.print_summary();
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to process dataset: {}", e);
            ExitCode::FAILURE
        }
    }
}
