//! Command-line interface for scene_features
//!
//! Extracts the feature vector of one image and prints it as JSON

use scene_features::{FeatureAssembler, PipelineConfig};
use std::{env, path::Path, process};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut config_path = None;
    let mut image_path_arg = None;

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    process::exit(1);
                }
                config_path = Some(args[i + 1].clone());
                i += 1;
            }
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if image_path_arg.is_none() {
                    image_path_arg = Some(arg.to_string());
                } else {
                    eprintln!("Error: Multiple image paths provided");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let image_path_str = match image_path_arg {
        Some(path) => path,
        None => {
            print_help(&args[0]);
            process::exit(1);
        }
    };
    let image_path = Path::new(&image_path_str);

    if !image_path.exists() {
        eprintln!("Error: File '{}' does not exist", image_path.display());
        process::exit(1);
    }

    let config = match config_path {
        Some(path) => match PipelineConfig::from_json_file(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config file: {}", e);
                process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };

    let assembler = match FeatureAssembler::new(&config) {
        Ok(assembler) => assembler,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let extraction = assembler.extract(image_path);

    // JSON to stdout for programmatic use
    match serde_json::to_string_pretty(&extraction) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing features: {}", e);
            process::exit(1);
        }
    }

    // Summary to stderr for human reading
    eprintln!();
    eprintln!("Feature Extraction Summary:");
    eprintln!("  Features: {}", extraction.features.len());
    if extraction.is_complete() {
        eprintln!("  All statistics computed");
    } else {
        eprintln!("  Defaulted statistics:");
        for diagnostic in &extraction.diagnostics {
            eprintln!(
                "    {} [{}]: {}",
                diagnostic.component,
                diagnostic.kind.as_str(),
                diagnostic.message
            );
        }
    }
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <image_path>", program_name);
    eprintln!();
    eprintln!("Extract the scene feature vector of an image file.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config FILE    Pipeline configuration (JSON)");
    eprintln!("  --help, -h       Show this help message");
    eprintln!();
    eprintln!("Set RUST_LOG=debug for per-statistic progress.");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} photo.jpg", program_name);
    eprintln!("  {} --config pipeline.json photo.png", program_name);
}
