use std::fs::File;
use std::io;
use std::io::Write;

use crate::analysis::AnalysisResult;
use crate::errors::*;

pub const CSV_COLUMNS: [&str; 12] = [
    "sirna_name",
    "transcript_id",
    "gene_symbol",
    "position",
    "delta_g",
    "risk_score",
    "risk_class",
    "seed_matches",
    "mismatches",
    "wobbles",
    "au_content",
    "structure_accessibility",
];

pub fn open_file_or_stdout(path: &Option<String>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(
            File::create(path).chain_err(|| format!("failed to create output file {:?}", path))?,
        ),
        None => Box::new(io::stdout()),
    })
}

/// Writes a header row followed by one row per off-target. Energies carry
/// two decimals, risk scores three, percentages two.
pub fn write_csv<W: Write>(writer: W, results: &[&AnalysisResult]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&CSV_COLUMNS)?;

    for result in results {
        for offtarget in &result.offtargets {
            out.write_record(&[
                result.sirna_name.clone(),
                offtarget.transcript_id.clone(),
                offtarget.gene_symbol.clone(),
                offtarget.position.to_string(),
                format!("{:.2}", offtarget.delta_g),
                format!("{:.3}", offtarget.risk_score),
                offtarget.risk_class.to_string(),
                offtarget.seed_matches.to_string(),
                offtarget.mismatches.to_string(),
                offtarget.wobbles.to_string(),
                format!("{:.2}", offtarget.au_content),
                format!("{:.2}", offtarget.structure_accessibility),
            ])?;
        }
    }

    out.flush().chain_err(|| "failed to flush CSV output")?;

    Ok(())
}
