use clap::Parser;
use env_logger::Env;
use snappy_tools::cli::{self, Commands};
use snappy_tools::commands;
use snappy_tools::config::Config;

fn run(args: cli::Args) -> anyhow::Result<()> {
    match args.command {
        Commands::Assign(assign) => {
            let config = match &args.config {
                Some(path) => Config::load_from(path)?,
                None => Config::load(),
            };
            commands::assign::run(assign, &config, args.verbose || args.debug)
        }
        Commands::InitConfig { force } => commands::init_config::run(args.config, force),
    }
}

fn main() {
    let args = cli::Args::parse();

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_secs()
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
