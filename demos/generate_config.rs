//! Writes the default pipeline configuration as JSON

use scene_features::PipelineConfig;
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();
    let output = args.get(1).map(String::as_str).unwrap_or("pipeline_config.json");

    let config = PipelineConfig::default();
    if let Err(e) = config.to_json_file(Path::new(output)) {
        eprintln!("Error writing configuration: {}", e);
        process::exit(1);
    }
    eprintln!("Wrote default configuration to {}", output);
}
