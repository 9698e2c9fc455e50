use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::catalog::builtin::is_builtin;
use crate::catalog::registry::GenomeRegistry;
use crate::cli::OutputFormat;
use crate::core::config::GenomeConfig;
use crate::core::genome::ReferenceGenome;

#[derive(Args)]
pub struct ShowArgs {
    /// Reference genome name
    #[arg(required = true)]
    pub name: String,

    /// Show all contigs
    #[arg(long)]
    pub all_contigs: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Reference genome JSON file
    #[arg(required = true)]
    pub input: PathBuf,
}

/// One row of `list` output
#[derive(Serialize)]
struct GenomeSummary<'a> {
    name: &'a str,
    contigs: usize,
    total_length: u64,
    builtin: bool,
    has_sequence: bool,
}

impl<'a> GenomeSummary<'a> {
    fn new(genome: &'a ReferenceGenome) -> Self {
        Self {
            name: genome.name(),
            contigs: genome.contigs().len(),
            total_length: genome.total_length(),
            builtin: is_builtin(genome.name()),
            has_sequence: genome.has_sequence(),
        }
    }
}

pub fn run_list(registry: &GenomeRegistry, format: OutputFormat) -> anyhow::Result<()> {
    let summaries: Vec<GenomeSummary> = registry.iter().map(GenomeSummary::new).collect();

    match format {
        OutputFormat::Text => {
            println!("{:<20} {:>8} {:>15}  Built-in", "Name", "Contigs", "Total length");
            println!("{}", "-".repeat(55));
            for s in &summaries {
                println!(
                    "{:<20} {:>8} {:>15}  {}",
                    s.name,
                    s.contigs,
                    s.total_length,
                    if s.builtin { "yes" } else { "no" }
                );
            }
            println!("\nTotal: {} reference genomes", summaries.len());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        OutputFormat::Tsv => {
            println!("name\tcontigs\ttotal_length\tbuiltin\thas_sequence");
            for s in &summaries {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    s.name, s.contigs, s.total_length, s.builtin, s.has_sequence
                );
            }
        }
    }

    Ok(())
}

pub fn run_show(args: &ShowArgs, registry: &GenomeRegistry, format: OutputFormat) -> anyhow::Result<()> {
    let genome = registry.get(&args.name)?;

    match format {
        OutputFormat::Json => {
            println!("{}", genome.to_json()?);
        }
        OutputFormat::Tsv => {
            println!("name\tlength\tglobal_position\tclass");
            for contig in genome.contigs() {
                println!(
                    "{}\t{}\t{}\t{}",
                    contig,
                    genome.contig_length(contig)?,
                    genome.global_position(contig)?,
                    contig_class(genome, contig)
                );
            }
        }
        OutputFormat::Text => print_genome(genome, args.all_contigs)?,
    }

    Ok(())
}

fn print_genome(genome: &ReferenceGenome, all_contigs: bool) -> anyhow::Result<()> {
    println!("Reference genome: {genome}");
    println!("Built-in:         {}", if is_builtin(genome.name()) { "yes" } else { "no" });
    println!("Contigs:          {}", genome.contigs().len());
    println!("Total length:     {}", genome.total_length());
    println!("X contigs:        {}", join_or_none(genome.x_contigs()));
    println!("Y contigs:        {}", join_or_none(genome.y_contigs()));
    println!("MT contigs:       {}", join_or_none(genome.mt_contigs()));

    if genome.par().is_empty() {
        println!("PAR:              none");
    } else {
        println!("PAR:");
        for interval in genome.par() {
            println!("  {interval}");
        }
    }

    match genome.sequence_files() {
        Some(files) => println!("Sequence:         {} ({})", files.fasta_file, files.index_file),
        None => println!("Sequence:         none"),
    }
    for (destination, chain) in genome.liftovers().iter() {
        println!("Liftover:         -> {destination} ({chain})");
    }

    println!("\n{:<25} {:>12} {:>15}  Class", "Contig", "Length", "Global offset");
    println!("{}", "-".repeat(62));

    let limit = if all_contigs { usize::MAX } else { 30 };
    for contig in genome.contigs().iter().take(limit) {
        println!(
            "{:<25} {:>12} {:>15}  {}",
            contig,
            genome.contig_length(contig)?,
            genome.global_position(contig)?,
            contig_class(genome, contig)
        );
    }
    if genome.contigs().len() > limit {
        println!(
            "... and {} more (use --all-contigs to show all)",
            genome.contigs().len() - limit
        );
    }

    Ok(())
}

fn contig_class(genome: &ReferenceGenome, contig: &str) -> String {
    let classes: Vec<&str> = [
        (genome.is_x(contig), "X"),
        (genome.is_y(contig), "Y"),
        (genome.is_mt(contig), "MT"),
    ]
    .into_iter()
    .filter_map(|(member, class)| member.then_some(class))
    .collect();

    if classes.is_empty() {
        "autosome".to_string()
    } else {
        classes.join(",")
    }
}

fn join_or_none(contigs: &[String]) -> String {
    if contigs.is_empty() {
        "none".to_string()
    } else {
        contigs.join(", ")
    }
}

/// Result of `validate` in JSON form
#[derive(Serialize)]
struct ValidationReport<'a> {
    name: &'a str,
    valid: bool,
    contigs: usize,
    total_length: u64,
    par: usize,
}

pub fn run_validate(args: &ValidateArgs, registry: &mut GenomeRegistry, format: OutputFormat) -> anyhow::Result<()> {
    let config = GenomeConfig::read(&args.input)?;
    let genome = registry.load_config(config)?;

    match format {
        OutputFormat::Json => {
            let report = ValidationReport {
                name: genome.name(),
                valid: true,
                contigs: genome.contigs().len(),
                total_length: genome.total_length(),
                par: genome.par().len(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text | OutputFormat::Tsv => {
            println!(
                "OK: '{}' ({} contigs, total length {}, {} PAR intervals)",
                genome.name(),
                genome.contigs().len(),
                genome.total_length(),
                genome.par().len()
            );
        }
    }

    Ok(())
}
