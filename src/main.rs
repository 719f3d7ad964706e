use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jiggen::error::USAGE_EXIT_CODE;

#[derive(Parser)]
#[command(name = "jiggen", version, about = "Deterministic jigsaw puzzle generator for laser cutting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate cut files from a puzzle configuration
    Render {
        /// Input configuration file (YAML or JSON)
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        output: PathBuf,

        /// Enable debug mode
        #[arg(short, long)]
        debug: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            if err.use_stderr() {
                std::process::exit(USAGE_EXIT_CODE);
            }
            // --help and --version land here and exit cleanly.
            return;
        }
    };

    let result = match cli.command {
        Command::Render {
            config,
            output,
            debug,
        } => {
            init_tracing(debug);
            jiggen::render::run_render(config, output, debug).await
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("JIGGEN_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
