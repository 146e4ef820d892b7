//! Batch CLI for scene_features
//!
//! Builds a report row for every image in a folder and prints the rows as
//! a JSON array, optionally using a JSON configuration file

use scene_features::batch::analyze_folder;
use scene_features::PipelineConfig;
use std::{env, path::Path, process};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 || args[1] == "--help" || args[1] == "-h" {
        print_help(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let folder = Path::new(&args[1]);
    if !folder.is_dir() {
        eprintln!("Error: '{}' is not a directory", folder.display());
        process::exit(1);
    }

    let config = match args.get(2) {
        Some(path) => match PipelineConfig::from_json_file(Path::new(path)) {
            Ok(config) => {
                eprintln!("Loaded configuration from {}", path);
                config
            }
            Err(e) => {
                eprintln!("Error loading config file: {}", e);
                process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };

    let reports = match analyze_folder(folder, &config, None) {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("Batch failed: {}", e);
            if e.is_recoverable() {
                eprintln!("Suggestion: {}", e.user_message());
            }
            process::exit(1);
        }
    };

    if reports.is_empty() {
        eprintln!("No image files found in {}", folder.display());
        process::exit(1);
    }

    let rows: Vec<_> = reports.iter().map(|report| report.to_row()).collect();
    match serde_json::to_string_pretty(&rows) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing reports: {}", e);
            process::exit(1);
        }
    }

    eprintln!();
    eprintln!("Batch Processing Summary:");
    eprintln!("  Total images: {}", reports.len());
    for report in &reports {
        let status = if report.diagnostics.is_empty() {
            "ok".to_string()
        } else {
            format!("{} defaulted", report.diagnostics.len())
        };
        eprintln!(
            "  {}: {} [{}]",
            report.file_name, report.top_colors_summary, status
        );
    }
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} <folder> [config.json]", program_name);
    eprintln!();
    eprintln!("Analyze every jpg/jpeg/png image in a folder and print JSON report rows.");
    eprintln!();
    eprintln!("Generate a starting configuration with the generate_config example.");
}
