use clap::Args;
use serde::Serialize;

use crate::catalog::registry::GenomeRegistry;
use crate::cli::OutputFormat;
use crate::core::locus::Locus;

#[derive(Args)]
pub struct PositionArgs {
    /// Reference genome name
    #[arg(required = true)]
    pub genome: String,

    /// Locus as 'contig:position', or a zero-based global position
    #[arg(required = true)]
    pub locus: String,
}

#[derive(Serialize)]
struct PositionReport {
    genome: String,
    contig: String,
    position: u64,
    global_position: u64,
    in_x_par: bool,
    in_y_par: bool,
}

pub fn run(args: &PositionArgs, registry: &GenomeRegistry, format: OutputFormat) -> anyhow::Result<()> {
    let genome = registry.get(&args.genome)?;

    let (locus, global_position) = match args.locus.parse::<u64>() {
        Ok(global) => (genome.locus_from_global_position(global)?, global),
        Err(_) => {
            let locus = Locus::parse(&args.locus)?;
            let global = genome.locus_global_position(&locus)?;
            (locus, global)
        }
    };

    let report = PositionReport {
        genome: genome.name().to_string(),
        in_x_par: genome.in_x_par(&locus),
        in_y_par: genome.in_y_par(&locus),
        contig: locus.contig,
        position: locus.position,
        global_position,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Tsv => {
            println!("genome\tcontig\tposition\tglobal_position\tin_x_par\tin_y_par");
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                report.genome,
                report.contig,
                report.position,
                report.global_position,
                report.in_x_par,
                report.in_y_par
            );
        }
        OutputFormat::Text => {
            println!("Locus:           {}:{}", report.contig, report.position);
            println!("Global position: {}", report.global_position);
            let par = if report.in_x_par {
                "yes (X)"
            } else if report.in_y_par {
                "yes (Y)"
            } else {
                "no"
            };
            println!("In PAR:          {par}");
        }
    }

    Ok(())
}
