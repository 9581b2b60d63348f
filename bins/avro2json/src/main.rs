mod cmd;

use clap::Parser;
use cmd::config::{ConvertArgs, Effective};

#[derive(Parser)]
#[command(
    name = "avro2json",
    version,
    about = "Print the records of an Avro container file as JSON lines or CSV rows"
)]
struct Cli {
    #[command(flatten)]
    args: ConvertArgs,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let eff = match Effective::new(&cli.args) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = cmd::run::run(&eff) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
