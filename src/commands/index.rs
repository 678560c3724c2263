use std::fmt::Debug;
use std::path::Path;

use bio::io::fasta::Reader;

use crate::args::IndexArgs;
use crate::constants::*;
use crate::errors::*;
use crate::index::SeedIndex;
use crate::progress;
use crate::sequence;
use crate::store::{Transcript, TranscriptStore};

// Header descriptions carry gene annotations as key=value words,
// e.g. ">NM_000546.6 gene=TP53 gene_id=7157 tumor protein p53"
fn header_token(desc: Option<&str>, keys: &[&str]) -> Option<String> {
    desc.and_then(|desc| {
        desc.split_whitespace().find_map(|word| {
            keys.iter().find_map(|key| {
                word.strip_prefix(key)
                    .filter(|value| !value.is_empty())
                    .map(|value| value.to_owned())
            })
        })
    })
}

fn ingest<P: AsRef<Path> + Debug>(filename: &P) -> Result<TranscriptStore> {
    eprintln!("Reading transcripts from {:?}", filename);
    let reader = Reader::from_file(filename)
        .map_err(|e| ::std::io::Error::new(::std::io::ErrorKind::Other, e.to_string()))
        .chain_err(|| format!("failed to open FASTA file {:?}", filename))?;

    let mut store = TranscriptStore::new();
    for record in reader.records() {
        let record = record.chain_err(|| "failed to read FASTA record")?;

        let raw = ::std::str::from_utf8(record.seq())
            .chain_err(|| format!("transcript {:?} is not valid UTF-8", record.id()))?;
        let sequence = sequence::normalize_transcript(raw)
            .chain_err(|| format!("invalid sequence for transcript {:?}", record.id()))?;

        store.put(Transcript {
            transcript_id: record.id().to_owned(),
            gene_symbol: header_token(record.desc(), &["gene=", "symbol="]).unwrap_or_default(),
            gene_id: header_token(record.desc(), &["gene_id="]),
            sequence,
            utr3_start: None,
            utr3_end: None,
        });
    }

    eprintln!(
        "  read {} transcripts totalling {} bases",
        store.transcript_count(),
        store.total_bases()
    );

    Ok(store)
}

pub fn main(args: &IndexArgs) -> Result<()> {
    let store = ingest(&args.fasta)?;

    let mut index = SeedIndex::new();
    index.begin_build(args.utr_only);

    let progress = progress::default(store.transcript_count());
    for (slot, transcript) in store.stream().enumerate() {
        index.add_transcript(slot as u32, transcript);
        progress.inc(1);
    }
    progress.finish();

    index.commit();
    eprintln!("  {}", index.summarize());

    let filename = match &args.output {
        Some(filename) => filename.clone(),
        None => args.fasta.clone() + INDEX_EXTENSION,
    };

    eprintln!("Writing index to {:?}", filename);
    index
        .write(&filename, &store)
        .chain_err(|| "failed to write seed index")?;

    Ok(())
}
