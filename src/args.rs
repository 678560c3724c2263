use clap::{App, Arg, ArgMatches, SubCommand};

use crate::errors::*;

#[derive(Debug)]
pub struct IndexArgs {
    pub fasta: String,
    pub output: Option<String>,
    pub utr_only: bool,
}

#[derive(Debug)]
pub struct AnalyzeArgs {
    pub index: String,
    pub table: String,
    pub output: Option<String>,
    pub max_seed_mismatches: u32,
    pub energy_threshold: f64,
    pub allow_wobble: bool,
    pub include_structure: bool,
    pub max_candidates: usize,
    pub conservation: Option<String>,
    pub threads: usize,
}

#[derive(Debug)]
pub struct InfoArgs {
    pub index: String,
}

pub enum Args {
    Index(IndexArgs),
    Analyze(AnalyzeArgs),
    Info(InfoArgs),
    None,
}

fn index_command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("index")
        .about("Build a seed index from a transcriptome in FASTA format")
        .arg(
            Arg::with_name("fasta")
                .help("Transcriptome FASTA file.")
                .required(true),
        )
        .arg(Arg::with_name("output"))
        .arg(
            Arg::with_name("utr-only")
                .long("utr-only")
                .help("Restrict indexing to annotated 3' UTR regions where present."),
        )
}

fn analyze_command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("analyze")
        .about("Predict off-targets for a table of siRNA guide strands")
        .arg(
            Arg::with_name("index")
                .help("Path to RIScan index file.")
                .required(true),
        )
        .arg(
            Arg::with_name("table")
                .help("Tab-separated table of name and guide sequence columns.")
                .required(true),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .takes_value(true)
                .help("Write the off-target CSV here instead of stdout."),
        )
        .arg(
            Arg::with_name("max-seed-mismatches")
                .long("max-seed-mismatches")
                .takes_value(true)
                .default_value("1")
                .help("Maximum seed mismatches (0, 1 or 2)."),
        )
        .arg(
            Arg::with_name("energy-threshold")
                .long("energy-threshold")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-10.0")
                .help("Only report sites at or below this binding energy (kcal/mol)."),
        )
        .arg(
            Arg::with_name("no-wobble")
                .long("no-wobble")
                .help("Count G:U pairs as plain mismatches."),
        )
        .arg(
            Arg::with_name("no-structure")
                .long("no-structure")
                .help("Skip the structural-accessibility proxy."),
        )
        .arg(
            Arg::with_name("max-candidates")
                .long("max-candidates")
                .takes_value(true)
                .default_value("50000")
                .help("Abort a query once it collects more candidates than this."),
        )
        .arg(
            Arg::with_name("conservation")
                .long("conservation")
                .takes_value(true)
                .help("Optional transcript_id<TAB>score conservation table."),
        )
        .arg(
            Arg::with_name("threads")
                .long("threads")
                .takes_value(true)
                .allow_hyphen_values(true)
                .number_of_values(1)
                .default_value("0")
                .help("Number of threads used for scoring (0 for automatic)."),
        )
}

fn info_command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("info")
        .about("Print the build status of an index")
        .arg(
            Arg::with_name("index")
                .help("Path to RIScan index file.")
                .required(true),
        )
}

fn get_str<'a>(matches: &'a ArgMatches, key: &str) -> Result<&'a str> {
    match matches.value_of(key) {
        Some(value) => Ok(value),
        None => Err(format!("Required option {:?} not set", key).into()),
    }
}

fn get_string(matches: &ArgMatches, key: &str) -> Result<String> {
    get_str(matches, key).map(|v| v.into())
}

fn parse_usize(matches: &ArgMatches, key: &str) -> Result<usize> {
    let raw = get_str(matches, key)?;

    match raw.parse() {
        Ok(value) => Ok(value),
        Err(err) => Err(format!("Invalid --{} ({:?}) value: {}", key, raw, err).into()),
    }
}

fn parse_u32(matches: &ArgMatches, key: &str) -> Result<u32> {
    let raw = get_str(matches, key)?;

    match raw.parse() {
        Ok(value) => Ok(value),
        Err(err) => Err(format!("Invalid --{} ({:?}) value: {}", key, raw, err).into()),
    }
}

fn parse_f64(matches: &ArgMatches, key: &str) -> Result<f64> {
    let raw = get_str(matches, key)?;

    match raw.parse() {
        Ok(value) => Ok(value),
        Err(err) => Err(format!("Invalid --{} ({:?}) value: {}", key, raw, err).into()),
    }
}

pub fn parse_args() -> Result<Args> {
    let matches = App::new("RIScan")
        .version("0.1.0")
        .about("Seed-indexed siRNA off-target prediction")
        .subcommand(index_command())
        .subcommand(analyze_command())
        .subcommand(info_command())
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("index") {
        Ok(Args::Index(IndexArgs {
            fasta: get_string(matches, "fasta")?,
            output: matches.value_of("output").map(|s| s.to_string()),
            utr_only: matches.is_present("utr-only"),
        }))
    } else if let Some(matches) = matches.subcommand_matches("analyze") {
        let max_seed_mismatches = parse_u32(matches, "max-seed-mismatches")?;
        if max_seed_mismatches > 2 {
            return Err(format!(
                "Invalid --max-seed-mismatches ({}); must be 0, 1 or 2",
                max_seed_mismatches
            )
            .into());
        }

        Ok(Args::Analyze(AnalyzeArgs {
            index: get_string(matches, "index")?,
            table: get_string(matches, "table")?,
            output: matches.value_of("output").map(|s| s.to_string()),
            max_seed_mismatches,
            energy_threshold: parse_f64(matches, "energy-threshold")?,
            allow_wobble: !matches.is_present("no-wobble"),
            include_structure: !matches.is_present("no-structure"),
            max_candidates: usize::max(1, parse_usize(matches, "max-candidates")?),
            conservation: matches.value_of("conservation").map(|s| s.to_string()),
            threads: parse_usize(matches, "threads")?,
        }))
    } else if let Some(matches) = matches.subcommand_matches("info") {
        Ok(Args::Info(InfoArgs {
            index: get_string(matches, "index")?,
        }))
    } else {
        eprintln!("{}", matches.usage());

        Ok(Args::None)
    }
}
