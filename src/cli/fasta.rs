use std::path::PathBuf;

use clap::Args;

use crate::catalog::registry::GenomeRegistry;
use crate::cli::OutputFormat;
use crate::core::genome::default_index_path;
use crate::core::locus::Interval;

#[derive(Args)]
pub struct FromFaiArgs {
    /// Name for the new reference genome
    #[arg(long, required = true)]
    pub name: String,

    /// FASTA file (may be compressed)
    #[arg(long, required = true)]
    pub fasta: String,

    /// FASTA index; defaults to the FASTA path with its extension replaced by .fai
    #[arg(long)]
    pub index: Option<String>,

    /// Contig to treat as X (repeatable)
    #[arg(long = "x-contig")]
    pub x_contigs: Vec<String>,

    /// Contig to treat as Y (repeatable)
    #[arg(long = "y-contig")]
    pub y_contigs: Vec<String>,

    /// Contig to treat as mitochondrial (repeatable)
    #[arg(long = "mt-contig")]
    pub mt_contigs: Vec<String>,

    /// Pseudoautosomal region as contig:start-end (repeatable)
    #[arg(long)]
    pub par: Vec<String>,

    /// Output file (JSON). If not specified, prints to stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &FromFaiArgs, registry: &mut GenomeRegistry, format: OutputFormat) -> anyhow::Result<()> {
    let index = args
        .index
        .clone()
        .unwrap_or_else(|| default_index_path(&args.fasta));

    let par = args
        .par
        .iter()
        .map(|p| {
            let interval = Interval::parse(p)?;
            Ok((
                interval.contig().to_string(),
                interval.start.position,
                interval.end.position,
            ))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let genome = registry.from_fasta_file(
        &args.name,
        &args.fasta,
        &index,
        &args.x_contigs,
        &args.y_contigs,
        &args.mt_contigs,
        &par,
    )?;

    if let Some(output) = &args.output {
        genome.write(output)?;
        eprintln!(
            "Wrote reference genome '{}' ({} contigs) to {}",
            genome.name(),
            genome.contigs().len(),
            output.display()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", genome.to_json()?),
        OutputFormat::Text | OutputFormat::Tsv => {
            println!("Reference genome: {}", genome.name());
            println!("Contigs:          {}", genome.contigs().len());
            println!("Total length:     {}", genome.total_length());
            println!("Sequence:         {} ({index})", args.fasta);
            println!("\n{}", genome.to_json()?);
        }
    }

    Ok(())
}
