extern crate riscan;

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use riscan::constants::SEED_KEY_COUNT;
use riscan::index::{BuildState, Posting, SeedIndex};
use riscan::sequence::{encode_seed, SeedKey};
use riscan::store::{Transcript, TranscriptStore};

fn transcript(id: &str, seq: &[u8]) -> Transcript {
    Transcript {
        transcript_id: id.to_owned(),
        gene_symbol: format!("GENE-{}", id),
        gene_id: None,
        sequence: seq.to_vec(),
        utr3_start: None,
        utr3_end: None,
    }
}

fn build(store: &TranscriptStore, utr_only: bool) -> SeedIndex {
    let mut index = SeedIndex::new();
    index.begin_build(utr_only);
    for (slot, entry) in store.stream().enumerate() {
        index.add_transcript(slot as u32, entry);
    }
    index.commit();

    index
}

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("riscan_test_{}_{}", std::process::id(), name));
    path
}

#[test]
fn test_fresh_index_is_not_searchable() {
    let index = SeedIndex::new();
    let err = index.lookup(SeedKey::new(0)).unwrap_err();

    assert_eq!(err.kind().code(), "IndexNotReady");
    assert_eq!(index.status().state, BuildState::Empty);
}

#[test]
fn test_search_fails_during_build_and_succeeds_after_commit() {
    let mut store = TranscriptStore::new();
    store.put(transcript("T1", b"ACGUACGUA"));

    let mut index = SeedIndex::new();
    index.begin_build(false);
    for (slot, entry) in store.stream().enumerate() {
        index.add_transcript(slot as u32, entry);
    }

    let key = encode_seed(b"ACGUACG").unwrap();
    let err = index.lookup(key).unwrap_err();
    assert_eq!(err.kind().code(), "IndexNotReady");

    index.commit();
    assert!(index.is_ready());
    assert_eq!(index.lookup(key).unwrap().len(), 1);
}

#[test]
fn test_index_completeness() {
    let mut store = TranscriptStore::new();
    store.put(transcript("T1", b"ACGUACGUA"));
    store.put(transcript("T2", b"UUUUGGGGCCCCAAAA"));

    let index = build(&store, false);

    for (slot, entry) in store.stream().enumerate() {
        for i in 0..=entry.len() - 7 {
            let key = encode_seed(&entry.sequence[i..i + 7]).unwrap();
            let expected = Posting {
                transcript: slot as u32,
                pos: i as u32,
            };

            let matches = index
                .lookup(key)
                .unwrap()
                .iter()
                .filter(|posting| **posting == expected)
                .count();
            assert_eq!(matches, 1, "expected one posting for {}:{}", slot, i);
        }
    }
}

#[test]
fn test_short_transcripts_emit_nothing() {
    let mut store = TranscriptStore::new();
    store.put(transcript("T1", b"ACGUAC"));

    let index = build(&store, false);

    assert_eq!(index.seed_count(), 0);
    assert_eq!(index.transcript_count(), 1);
}

#[test]
fn test_windows_with_ambiguity_codes_are_skipped() {
    let mut store = TranscriptStore::new();
    // N at offset 4 poisons windows 0 through 4
    store.put(transcript("T1", b"ACGUNACGUACG"));

    let index = build(&store, false);

    // positions 5..=5 remain: ACGUACG at offset 5
    assert_eq!(index.seed_count(), 1);
    let key = encode_seed(b"ACGUACG").unwrap();
    assert_eq!(
        index.lookup(key).unwrap(),
        &[Posting {
            transcript: 0,
            pos: 5
        }][..]
    );
}

#[test]
fn test_utr_restriction() {
    let mut entry = transcript("T1", b"AAAAAAAAAACGUACGUACG");
    entry.utr3_start = Some(10);
    entry.utr3_end = Some(20);

    let mut store = TranscriptStore::new();
    store.put(entry);

    let unrestricted = build(&store, false);
    let restricted = build(&store, true);

    assert_eq!(unrestricted.seed_count(), 14);
    // region [10, 20) holds 10 bases, so windows 10..=13
    assert_eq!(restricted.seed_count(), 4);

    let key = encode_seed(b"CGUACGU").unwrap();
    let postings = restricted.lookup(key).unwrap();
    assert!(postings.iter().all(|posting| posting.pos >= 10));
}

#[test]
fn test_rebuild_is_idempotent_and_bumps_generation() {
    let mut store = TranscriptStore::new();
    store.put(transcript("T1", b"ACGUACGUA"));

    let mut index = SeedIndex::new();

    index.begin_build(false);
    for (slot, entry) in store.stream().enumerate() {
        index.add_transcript(slot as u32, entry);
    }
    index.commit();
    let first_generation = index.generation();
    let first_count = index.seed_count();

    index.begin_build(false);
    let key = encode_seed(b"ACGUACG").unwrap();
    assert_eq!(index.lookup(key).unwrap_err().kind().code(), "IndexNotReady");
    for (slot, entry) in store.stream().enumerate() {
        index.add_transcript(slot as u32, entry);
    }
    index.commit();

    assert_eq!(index.generation(), first_generation + 1);
    assert_eq!(index.seed_count(), first_count);
}

#[test]
fn test_persistence_round_trip() {
    let mut store = TranscriptStore::new();
    store.put(transcript("T1", b"ACGUACGUA"));
    let mut annotated = transcript("T2", b"ACGUNACGUACGUUUU");
    annotated.gene_id = Some("7157".to_owned());
    annotated.utr3_start = Some(2);
    annotated.utr3_end = Some(16);
    store.put(annotated);

    let index = build(&store, false);

    let path = temp_path("round_trip.riscan");
    index.write(&path, &store).unwrap();

    let (read_index, read_store) = SeedIndex::read(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(read_index.status(), index.status());
    assert_eq!(read_index.unique_seed_count(), index.unique_seed_count());

    for raw in 0..SEED_KEY_COUNT {
        let key = SeedKey::new(raw as u16);
        assert_eq!(read_index.lookup(key).unwrap(), index.lookup(key).unwrap());
    }

    for entry in store.stream() {
        let read_entry = read_store.get(&entry.transcript_id).unwrap();
        assert_eq!(read_entry, entry);
    }
    assert_eq!(read_store.total_bases(), store.total_bases());
}

#[test]
fn test_uncommitted_index_cannot_be_written() {
    let store = TranscriptStore::new();
    let mut index = SeedIndex::new();
    index.begin_build(false);

    let path = temp_path("uncommitted.riscan");
    let err = index.write(&path, &store).unwrap_err();
    let _ = fs::remove_file(&path);

    assert_eq!(err.kind().code(), "IndexNotReady");
}

#[test]
fn test_reading_garbage_fails_with_corrupt_index() {
    let path = temp_path("garbage.riscan");
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(b"not an index at all").unwrap();
    drop(file);

    let err = SeedIndex::read(&path).unwrap_err();
    let _ = fs::remove_file(&path);

    assert_eq!(err.kind().code(), "IndexCorrupt");
}

#[test]
fn test_reading_truncated_index_fails() {
    let mut store = TranscriptStore::new();
    store.put(transcript("T1", b"ACGUACGUA"));
    let index = build(&store, false);

    let path = temp_path("truncated.riscan");
    index.write(&path, &store).unwrap();

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    assert!(SeedIndex::read(&path).is_err());
    let _ = fs::remove_file(&path);
}

#[test]
fn test_store_window_clamps_and_reports_range() {
    let mut store = TranscriptStore::new();
    store.put(transcript("T1", b"ACGUACGUACGU"));

    let (start, window) = store.window("T1", 2, 5).unwrap();
    assert_eq!(start, 0);
    assert_eq!(window, b"ACGUACGU");

    let (start, window) = store.window("T1", 10, 5).unwrap();
    assert_eq!(start, 5);
    assert_eq!(window, b"CGUACGU");

    let (start, window) = store.window("T1", 6, 2).unwrap();
    assert_eq!(start, 4);
    assert_eq!(window, b"ACGUA");
}

#[test]
fn test_store_window_unknown_transcript() {
    let store = TranscriptStore::new();
    let err = store.window("NOPE", 0, 5).unwrap_err();

    assert_eq!(err.kind().code(), "TranscriptMissing");
}
