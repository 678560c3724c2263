use crate::analysis::{AnalysisRequest, AnalysisResult, Analyzer, CancelToken, JobState, Parameters, SirnaInput};
use crate::args::AnalyzeArgs;
use crate::errors::*;
use crate::export;
use crate::index::SeedIndex;
use crate::progress;
use crate::table;

fn read_guides(path: &str) -> Result<Vec<SirnaInput>> {
    eprintln!("Reading guides from {:?}", path);
    let rows = table::read(&path).chain_err(|| "failed to read guide table")?;

    let mut sirnas = Vec::with_capacity(rows.len());
    for row in rows {
        let sirna = match row.len() {
            0 => continue,
            // Single-column tables use the sequence as its own name
            1 => SirnaInput {
                name: row[0].clone(),
                sequence: row[0].clone(),
            },
            _ => SirnaInput {
                name: row[0].clone(),
                sequence: row[1].clone(),
            },
        };

        sirnas.push(sirna);
    }

    eprintln!("  read {} guides from table.", sirnas.len());

    Ok(sirnas)
}

pub fn main(args: &AnalyzeArgs) -> Result<()> {
    ::rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
        .chain_err(|| "failed to build thread pool")?;

    eprintln!("\nReading seed index from {:?}", args.index);
    let (index, store) = SeedIndex::read(&args.index)
        .chain_err(|| format!("failed to read seed index {:?}", &args.index))?;
    eprintln!("  {}", index.summarize());

    let request = AnalysisRequest {
        sirnas: read_guides(&args.table)?,
        parameters: Parameters {
            max_seed_mismatches: args.max_seed_mismatches,
            energy_threshold: args.energy_threshold,
            allow_wobble: args.allow_wobble,
            include_structure: args.include_structure,
            max_candidates: args.max_candidates,
        },
    };

    let mut analyzer = Analyzer::new(&store, &index);
    if let Some(path) = &args.conservation {
        eprintln!("Reading conservation scores from {:?}", path);
        analyzer = analyzer.with_conservation(table::read_conservation(path)?);
    }

    let cancel = CancelToken::new();
    let progress = progress::spinner("");
    let records = analyzer.run(&request, &cancel, &progress)?;
    progress.finish_and_clear();

    for record in &records {
        match (&record.state, &record.result) {
            (JobState::Completed, Some(result)) => eprintln!(
                "  {}: {} off-targets ({} high, {} moderate, {} low risk)",
                record.sirna_name,
                result.total_offtargets,
                result.high_risk_count,
                result.moderate_risk_count,
                result.low_risk_count,
            ),
            _ => eprintln!(
                "  {}: FAILED ({})",
                record.sirna_name,
                record.error.as_deref().unwrap_or("unknown"),
            ),
        }
    }

    let completed: Vec<&AnalysisResult> = records.iter().filter_map(|r| r.result.as_ref()).collect();
    let out = export::open_file_or_stdout(&args.output)?;
    export::write_csv(out, &completed)?;

    Ok(())
}
