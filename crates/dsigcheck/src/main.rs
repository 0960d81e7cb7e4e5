#![forbid(unsafe_code)]

//! dsigcheck CLI: validate the XML signatures in a file.

use clap::Parser;
use dsigcheck::{telemetry, Settings};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "dsigcheck",
    about = "Validate the XML digital signatures embedded in a document",
    version
)]
struct Cli {
    /// Signed XML file
    file: PathBuf,

    /// Signature engine to validate with
    #[arg(long, env = "DSIGCHECK_ENGINE", default_value = dsigcheck::dsig::DEFAULT_ENGINE)]
    engine: String,

    /// Register additional ID attribute names
    #[arg(long = "id-attr")]
    id_attr: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Self {
            file: cli.file,
            engine: cli.engine,
            id_attrs: cli.id_attr,
            verbose: cli.verbose,
        }
    }
}

fn main() {
    let settings = Settings::from(Cli::parse());
    telemetry::init_tracing(settings.default_log_filter());

    match dsigcheck::run(&settings) {
        Ok(reports) => {
            for report in &reports {
                println!("{report}");
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
