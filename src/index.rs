use std::fmt;
use std::fmt::Debug;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::constants::*;
use crate::errors::*;
use crate::progress;
use crate::sequence::{encode_seed, PackedSeq, SeedKey};
use crate::store::{Transcript, TranscriptStore};

/// One seed occurrence: a transcript slot and the 0-indexed offset of the
/// 7-mer on the target strand.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Posting {
    pub transcript: u32,
    pub pos: u32,
}

impl Posting {
    pub fn from_u64(raw: u64) -> Posting {
        Posting {
            transcript: (raw >> 32) as u32,
            pos: raw as u32,
        }
    }

    pub fn to_u64(self) -> u64 {
        u64::from(self.transcript) << 32 | u64::from(self.pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Empty,
    Building,
    Ready,
}

impl BuildState {
    fn to_u8(self) -> u8 {
        match self {
            BuildState::Empty => 0,
            BuildState::Building => 1,
            BuildState::Ready => 2,
        }
    }

    fn from_u8(raw: u8) -> Option<BuildState> {
        match raw {
            0 => Some(BuildState::Empty),
            1 => Some(BuildState::Building),
            2 => Some(BuildState::Ready),
            _ => None,
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            BuildState::Empty => "empty",
            BuildState::Building => "building",
            BuildState::Ready => "ready",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildStatus {
    pub generation: u64,
    pub state: BuildState,
    pub transcript_count: u64,
    pub seed_count: u64,
}

/// Seed index over a transcript store: 4^7 postings lists keyed by the
/// 14-bit packed 7-mer. Searches are gated on the readiness flag, which
/// only ever moves from not-ready to ready at the commit point.
#[derive(Debug)]
pub struct SeedIndex {
    postings: Vec<Vec<Posting>>,
    status: BuildStatus,
    utr_only: bool,
}

impl SeedIndex {
    pub fn new() -> SeedIndex {
        SeedIndex {
            postings: Vec::new(),
            status: BuildStatus {
                generation: 0,
                state: BuildState::Empty,
                transcript_count: 0,
                seed_count: 0,
            },
            utr_only: false,
        }
    }

    /// Starts a fresh build. Exclusive access is guaranteed by &mut; any
    /// previous contents are discarded and the index becomes unsearchable
    /// until the next commit.
    pub fn begin_build(&mut self, utr_only: bool) {
        self.postings = vec![Vec::new(); SEED_KEY_COUNT];
        self.status.state = BuildState::Building;
        self.status.transcript_count = 0;
        self.status.seed_count = 0;
        self.utr_only = utr_only;
    }

    /// Emits one posting per 7-mer window of the searchable region.
    /// Windows containing ambiguity codes are skipped.
    pub fn add_transcript(&mut self, slot: u32, transcript: &Transcript) {
        assert!(
            self.status.state == BuildState::Building,
            "add_transcript outside of a build"
        );

        let (start, end) = transcript.searchable(self.utr_only);
        let region = &transcript.sequence[start..end];

        for (offset, window) in region.windows(SEED_LEN).enumerate() {
            if let Some(key) = encode_seed(window) {
                self.postings[key.key()].push(Posting {
                    transcript: slot,
                    pos: (start + offset) as u32,
                });
                self.status.seed_count += 1;
            }
        }

        self.status.transcript_count += 1;
    }

    /// Commit point: bumps the generation and flips the readiness flag.
    pub fn commit(&mut self) {
        assert!(
            self.status.state == BuildState::Building,
            "commit outside of a build"
        );

        self.status.generation += 1;
        self.status.state = BuildState::Ready;
    }

    pub fn is_ready(&self) -> bool {
        self.status.state == BuildState::Ready
    }

    pub fn status(&self) -> &BuildStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.status.generation
    }

    pub fn seed_count(&self) -> u64 {
        self.status.seed_count
    }

    pub fn transcript_count(&self) -> u64 {
        self.status.transcript_count
    }

    pub fn utr_only(&self) -> bool {
        self.utr_only
    }

    pub fn unique_seed_count(&self) -> usize {
        self.postings.iter().filter(|list| !list.is_empty()).count()
    }

    pub fn lookup(&self, key: SeedKey) -> Result<&[Posting]> {
        if self.status.state != BuildState::Ready {
            return Err(ErrorKind::IndexNotReady.into());
        }

        if !key.is_valid() {
            return Err(ErrorKind::IndexCorrupt(format!("seed key {} out of range", key.0)).into());
        }

        Ok(&self.postings[key.key()])
    }

    pub fn summarize(&self) -> String {
        format!(
            "Index generation {} holds {} seed entries across {} unique 7-mers for {} transcripts",
            self.status.generation,
            self.status.seed_count,
            self.unique_seed_count(),
            self.status.transcript_count,
        )
    }

    /// Serializes the committed index together with its transcript store.
    /// Uncommitted indexes are refused, so a partial build is never
    /// observable on disk.
    pub fn write<P: AsRef<Path> + Debug>(&self, filename: P, store: &TranscriptStore) -> Result<()> {
        if self.status.state != BuildState::Ready {
            return Err(ErrorKind::IndexNotReady.into());
        }

        let file = File::create(filename).chain_err(|| "failed to create index file")?;
        let mut writer = BufWriter::new(file);

        writer
            .write_all(INDEX_HEADER)
            .chain_err(|| "failed to write index header")?;
        writer
            .write_u8(INDEX_VERSION)
            .chain_err(|| "failed to write index version")?;

        let flags = if self.utr_only { FLAG_UTR_ONLY } else { 0 };
        writer
            .write_u64::<LittleEndian>(flags)
            .chain_err(|| "failed to write index flags")?;

        writer
            .write_u64::<LittleEndian>(self.status.generation)
            .chain_err(|| "failed to write index generation")?;
        writer
            .write_u8(self.status.state.to_u8())
            .chain_err(|| "failed to write build state")?;
        writer
            .write_u64::<LittleEndian>(self.status.transcript_count)
            .chain_err(|| "failed to write transcript count")?;
        writer
            .write_u64::<LittleEndian>(self.status.seed_count)
            .chain_err(|| "failed to write seed count")?;

        Self::write_transcripts(&mut writer, store)?;
        self.write_postings(&mut writer)?;

        Ok(())
    }

    pub fn read<P: AsRef<Path> + Debug>(filename: &P) -> Result<(SeedIndex, TranscriptStore)> {
        let file = File::open(filename).chain_err(|| "failed to open index file")?;
        let mut reader = BufReader::new(file);
        let mut buffer = Vec::new();

        reader
            .by_ref()
            .take(INDEX_HEADER.len() as u64)
            .read_to_end(&mut buffer)
            .chain_err(|| "failed to read index header")?;
        if buffer != INDEX_HEADER {
            return Err(ErrorKind::IndexCorrupt("not a RIScan index file".into()).into());
        }

        let version = reader
            .read_u8()
            .chain_err(|| "failed to read index version number")?;
        if version < INDEX_VERSION {
            return Err("index file is outdated; please re-index the transcriptome".into());
        } else if version > INDEX_VERSION {
            return Err("index generated by a newer version of RIScan;
                        please upgrade RIScan or re-index the transcriptome"
                .into());
        }

        let flags = reader
            .read_u64::<LittleEndian>()
            .chain_err(|| "failed to read index flags")?;

        let generation = reader
            .read_u64::<LittleEndian>()
            .chain_err(|| "failed to read index generation")?;
        let state = reader.read_u8().chain_err(|| "failed to read build state")?;
        let state = BuildState::from_u8(state)
            .ok_or_else(|| Error::from(ErrorKind::IndexCorrupt(format!("bad build state {}", state))))?;
        if state != BuildState::Ready {
            return Err(ErrorKind::IndexCorrupt("uncommitted index on disk".into()).into());
        }

        let transcript_count = reader
            .read_u64::<LittleEndian>()
            .chain_err(|| "failed to read transcript count")?;
        let seed_count = reader
            .read_u64::<LittleEndian>()
            .chain_err(|| "failed to read seed count")?;

        let store = Self::read_transcripts(&mut reader, transcript_count)?;
        let postings = Self::read_postings(&mut reader, &store)?;

        let index = SeedIndex {
            postings,
            status: BuildStatus {
                generation,
                state,
                transcript_count,
                seed_count,
            },
            utr_only: flags & FLAG_UTR_ONLY != 0,
        };

        Ok((index, store))
    }

    fn write_transcripts(writer: &mut BufWriter<File>, store: &TranscriptStore) -> Result<()> {
        writer
            .write_u64::<LittleEndian>(store.transcript_count() as u64)
            .chain_err(|| "failed to write number of transcripts")?;

        for transcript in store.stream() {
            Self::write_str(writer, &transcript.transcript_id)?;
            Self::write_str(writer, &transcript.gene_symbol)?;

            match &transcript.gene_id {
                Some(gene_id) => {
                    writer.write_u8(1).chain_err(|| "failed to write gene id flag")?;
                    Self::write_str(writer, gene_id)?;
                }
                None => {
                    writer.write_u8(0).chain_err(|| "failed to write gene id flag")?;
                }
            }

            match (transcript.utr3_start, transcript.utr3_end) {
                (Some(start), Some(end)) => {
                    writer.write_u8(1).chain_err(|| "failed to write UTR flag")?;
                    writer
                        .write_u64::<LittleEndian>(start as u64)
                        .chain_err(|| "failed to write UTR start")?;
                    writer
                        .write_u64::<LittleEndian>(end as u64)
                        .chain_err(|| "failed to write UTR end")?;
                }
                _ => {
                    writer.write_u8(0).chain_err(|| "failed to write UTR flag")?;
                }
            }

            writer
                .write_u64::<LittleEndian>(transcript.len() as u64)
                .chain_err(|| "failed to write sequence length")?;

            // Pure A/C/G/U sequences are stored 2-bit packed; sequences with
            // ambiguity codes fall back to raw bytes
            match PackedSeq::encode(&transcript.sequence) {
                Some(packed) => {
                    writer.write_u8(1).chain_err(|| "failed to write sequence encoding")?;
                    writer
                        .write_all(packed.bytes())
                        .chain_err(|| "failed to write packed sequence")?;
                }
                None => {
                    writer.write_u8(0).chain_err(|| "failed to write sequence encoding")?;
                    writer
                        .write_all(&transcript.sequence)
                        .chain_err(|| "failed to write sequence")?;
                }
            }
        }

        Ok(())
    }

    fn read_transcripts(reader: &mut BufReader<File>, count: u64) -> Result<TranscriptStore> {
        let mut store = TranscriptStore::new();

        let progress = progress::default(count as usize);
        for _ in 0..count {
            let transcript_id = Self::read_str(reader).chain_err(|| "failed to read transcript id")?;
            let gene_symbol = Self::read_str(reader).chain_err(|| "failed to read gene symbol")?;

            let gene_id = match reader.read_u8().chain_err(|| "failed to read gene id flag")? {
                0 => None,
                _ => Some(Self::read_str(reader).chain_err(|| "failed to read gene id")?),
            };

            let utr = match reader.read_u8().chain_err(|| "failed to read UTR flag")? {
                0 => (None, None),
                _ => {
                    let start = reader
                        .read_u64::<LittleEndian>()
                        .chain_err(|| "failed to read UTR start")?;
                    let end = reader
                        .read_u64::<LittleEndian>()
                        .chain_err(|| "failed to read UTR end")?;
                    (Some(start as usize), Some(end as usize))
                }
            };

            let length = reader
                .read_u64::<LittleEndian>()
                .chain_err(|| "failed to read sequence length")? as usize;
            let encoding = reader
                .read_u8()
                .chain_err(|| "failed to read sequence encoding")?;

            let sequence = match encoding {
                1 => {
                    let mut data = vec![0; PackedSeq::packed_size(length)];
                    reader
                        .read_exact(&mut data)
                        .chain_err(|| "failed to read packed sequence")?;
                    PackedSeq::from_raw(data, length).decode()
                }
                0 => {
                    let mut data = vec![0; length];
                    reader
                        .read_exact(&mut data)
                        .chain_err(|| "failed to read sequence")?;
                    data
                }
                other => {
                    return Err(ErrorKind::IndexCorrupt(format!(
                        "bad sequence encoding {} for transcript {:?}",
                        other, transcript_id
                    ))
                    .into());
                }
            };

            store.put(Transcript {
                transcript_id,
                gene_symbol,
                gene_id,
                sequence,
                utr3_start: utr.0,
                utr3_end: utr.1,
            });
            progress.inc(1);
        }

        progress.finish();

        Ok(store)
    }

    fn write_postings(&self, writer: &mut BufWriter<File>) -> Result<()> {
        writer
            .write_u64::<LittleEndian>(self.unique_seed_count() as u64)
            .chain_err(|| "failed to write number of unique seeds")?;

        for (key, postings) in self.postings.iter().enumerate() {
            if !postings.is_empty() {
                writer
                    .write_u16::<LittleEndian>(key as u16)
                    .chain_err(|| "failed to write seed key")?;
                writer
                    .write_u32::<LittleEndian>(postings.len() as u32)
                    .chain_err(|| "failed to write number of postings for seed")?;

                for posting in postings {
                    writer
                        .write_u64::<LittleEndian>(posting.to_u64())
                        .chain_err(|| "failed to write posting")?;
                }
            }
        }

        Ok(())
    }

    fn read_postings(
        reader: &mut BufReader<File>,
        store: &TranscriptStore,
    ) -> Result<Vec<Vec<Posting>>> {
        let mut postings = vec![Vec::new(); SEED_KEY_COUNT];
        let unique_seeds = reader
            .read_u64::<LittleEndian>()
            .chain_err(|| "failed to read number of unique seeds")?;

        let progress = progress::default(unique_seeds as usize);
        for _ in 0..unique_seeds {
            let key = reader
                .read_u16::<LittleEndian>()
                .chain_err(|| "failed to read seed key")?;
            if !SeedKey::new(key).is_valid() {
                return Err(ErrorKind::IndexCorrupt(format!("seed key {} out of range", key)).into());
            }

            let count = reader
                .read_u32::<LittleEndian>()
                .chain_err(|| "failed to read number of postings for seed")?;

            let mut list = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let posting = Posting::from_u64(
                    reader
                        .read_u64::<LittleEndian>()
                        .chain_err(|| "failed to read posting")?,
                );

                match store.get_slot(posting.transcript) {
                    Some(transcript) => {
                        if posting.pos as usize + SEED_LEN > transcript.len() {
                            return Err(ErrorKind::IndexCorrupt(format!(
                                "posting at {} overruns transcript {:?}",
                                posting.pos, transcript.transcript_id
                            ))
                            .into());
                        }
                    }
                    None => {
                        return Err(ErrorKind::IndexCorrupt(format!(
                            "posting references unknown transcript slot {}",
                            posting.transcript
                        ))
                        .into());
                    }
                }

                list.push(posting);
            }

            postings[key as usize] = list;
            progress.inc(1);
        }

        progress.finish();

        Ok(postings)
    }

    fn write_str(writer: &mut BufWriter<File>, value: &str) -> Result<()> {
        let bytes = value.as_bytes();

        writer
            .write_u16::<LittleEndian>(bytes.len() as u16)
            .chain_err(|| "failed to write string length")?;
        writer
            .write_all(bytes)
            .chain_err(|| "failed to write string")?;

        Ok(())
    }

    fn read_str(reader: &mut BufReader<File>) -> Result<String> {
        let length = reader
            .read_u16::<LittleEndian>()
            .chain_err(|| "failed to read string length")?;

        let mut buffer = vec![0; length as usize];
        reader
            .read_exact(&mut buffer)
            .chain_err(|| "failed to read string")?;

        String::from_utf8(buffer).chain_err(|| "failed to decode string")
    }
}

impl Default for SeedIndex {
    fn default() -> SeedIndex {
        SeedIndex::new()
    }
}
