use std::path::Path;

const BUILTIN_GENOMES: [&str; 3] = [
    "genomes/GRCh37.json",
    "genomes/GRCh38.json",
    "genomes/GRCm38.json",
];

fn main() {
    for path in BUILTIN_GENOMES {
        validate_genome_file(Path::new(path));
    }
    set_build_dependencies();
}

fn validate_genome_file(path: &Path) {
    // Ensure the genome exists at build time
    assert!(
        path.exists(),
        "\n\nGENOME BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the built-in genome file before building.\n",
        path.display()
    );

    let contents = std::fs::read_to_string(path).unwrap_or_else(|e| {
        panic!(
            "\n\nGENOME BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            path.display()
        );
    });

    let genome: serde_json::Value = serde_json::from_str(&contents).unwrap_or_else(|e| {
        panic!(
            "\n\nGENOME BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            path.display()
        );
    });

    validate_genome_structure(&genome, path);
}

fn validate_genome_structure(genome: &serde_json::Value, path: &Path) {
    let file = path.display();
    assert!(
        genome.is_object(),
        "\n\nGENOME BUILD ERROR: Root of {file} must be a JSON object\n"
    );

    let name = genome
        .get("name")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_else(|| panic!("\n\nGENOME BUILD ERROR: {file} missing string 'name' field\n"));

    let contigs = genome
        .get("contigs")
        .and_then(serde_json::Value::as_array)
        .unwrap_or_else(|| panic!("\n\nGENOME BUILD ERROR: '{name}' missing 'contigs' array\n"));

    let mut lengths = std::collections::HashMap::new();
    for (index, contig) in contigs.iter().enumerate() {
        let (contig_name, length) = validate_contig(contig, name, index);
        assert!(
            lengths.insert(contig_name, length).is_none(),
            "\n\nGENOME BUILD ERROR: '{name}' has duplicate contig '{contig_name}'\n"
        );
    }

    for field in ["xContigs", "yContigs", "mtContigs"] {
        let listed = genome
            .get(field)
            .and_then(serde_json::Value::as_array)
            .unwrap_or_else(|| panic!("\n\nGENOME BUILD ERROR: '{name}' missing '{field}' array\n"));
        for contig in listed.iter().filter_map(serde_json::Value::as_str) {
            assert!(
                lengths.contains_key(contig),
                "\n\nGENOME BUILD ERROR: '{name}' {field} entry '{contig}' is not a contig\n"
            );
        }
    }

    let par = genome
        .get("par")
        .and_then(serde_json::Value::as_array)
        .unwrap_or_else(|| panic!("\n\nGENOME BUILD ERROR: '{name}' missing 'par' array\n"));
    for interval in par {
        validate_par(interval, name, &lengths);
    }

    println!(
        "cargo:warning=Validated built-in genome {name}: {} contigs, {} PAR intervals",
        contigs.len(),
        par.len()
    );
}

fn validate_contig<'a>(contig: &'a serde_json::Value, genome: &str, index: usize) -> (&'a str, u64) {
    let contig_name = contig
        .get("name")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_else(|| {
            panic!("\n\nGENOME BUILD ERROR: '{genome}' contig {index} missing 'name' field\n")
        });

    let length = contig
        .get("length")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or_else(|| {
            panic!("\n\nGENOME BUILD ERROR: '{genome}' contig '{contig_name}' missing 'length' field\n")
        });

    // Validate length is positive
    assert!(
        length > 0,
        "\n\nGENOME BUILD ERROR: '{genome}' contig '{contig_name}' has zero length\n\
         Contigs must have length > 0.\n"
    );

    (contig_name, length)
}

fn validate_par(interval: &serde_json::Value, genome: &str, lengths: &std::collections::HashMap<&str, u64>) {
    let (contig, start) = end_point(interval, "start", genome);
    let (end_contig, end) = end_point(interval, "end", genome);
    assert!(
        contig == end_contig,
        "\n\nGENOME BUILD ERROR: '{genome}' PAR entry spans contigs: {interval}\n"
    );

    let length = lengths.get(contig).copied().unwrap_or(0);
    assert!(
        start >= 1 && start < end && end <= length,
        "\n\nGENOME BUILD ERROR: '{genome}' PAR {contig}:{start}-{end} out of range (length {length})\n"
    );
}

fn end_point<'a>(interval: &'a serde_json::Value, key: &str, genome: &str) -> (&'a str, u64) {
    let locus = interval.get(key);
    let contig = locus
        .and_then(|l| l.get("contig"))
        .and_then(serde_json::Value::as_str);
    let position = locus
        .and_then(|l| l.get("position"))
        .and_then(serde_json::Value::as_u64);
    match (contig, position) {
        (Some(c), Some(p)) => (c, p),
        _ => panic!("\n\nGENOME BUILD ERROR: '{genome}' PAR entry has malformed '{key}': {interval}\n"),
    }
}

fn set_build_dependencies() {
    // Tell cargo to rerun if a built-in genome changes
    for path in BUILTIN_GENOMES {
        println!("cargo:rerun-if-changed={path}");
    }

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
