use clap::Parser;
use tracing_subscriber::EnvFilter;

use ref_genome::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("ref_genome=debug,info")
    } else {
        EnvFilter::new("ref_genome=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut registry = cli::load_registry(&cli.references)?;

    match cli.command {
        cli::Commands::List => {
            cli::genome::run_list(&registry, cli.format)?;
        }
        cli::Commands::Show(args) => {
            cli::genome::run_show(&args, &registry, cli.format)?;
        }
        cli::Commands::Validate(args) => {
            cli::genome::run_validate(&args, &mut registry, cli.format)?;
        }
        cli::Commands::Position(args) => {
            cli::position::run(&args, &registry, cli.format)?;
        }
        cli::Commands::FromFai(args) => {
            cli::fasta::run(&args, &mut registry, cli.format)?;
        }
    }

    Ok(())
}
