use std::path::PathBuf;

use slackcards::cli;
use slackcards::config::DEFAULT_CONFIG_PATH;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let mut config_path: Option<PathBuf> = None;
    let mut output_dir: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                config_path = args.next().map(PathBuf::from);
                if config_path.is_none() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--out" | "-o" => {
                output_dir = args.next().map(PathBuf::from);
                if output_dir.is_none() {
                    eprintln!("Error: --out requires a directory argument");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                println!("slackcards - export a Slack workspace directory to vCard files");
                println!();
                println!("Usage: slackcards [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  -c, --config <PATH>  Config file path (default: {})",
                    DEFAULT_CONFIG_PATH
                );
                println!("  -o, --out <DIR>      Output directory (overrides config)");
                println!("  -h, --help           Show this help");
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Use --help for usage information.");
                std::process::exit(1);
            }
        }
    }

    let config_path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    if let Err(e) = cli::run(&config_path, output_dir) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
