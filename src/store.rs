use std::collections::HashMap;

use crate::errors::*;

/// A reference transcript with its optional 3' UTR annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub transcript_id: String,
    pub gene_symbol: String,
    pub gene_id: Option<String>,
    pub sequence: Vec<u8>,
    pub utr3_start: Option<usize>,
    pub utr3_end: Option<usize>,
}

impl Transcript {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Range searched during indexing: the annotated 3' UTR when
    /// restriction is requested and annotations are present, the whole
    /// sequence otherwise.
    pub fn searchable(&self, utr_only: bool) -> (usize, usize) {
        match (utr_only, self.utr3_start, self.utr3_end) {
            (true, Some(start), Some(end)) => {
                let end = usize::min(end, self.len());
                (usize::min(start, end), end)
            }
            _ => (0, self.len()),
        }
    }
}

/// In-memory keyed store with O(1) random access to any sequence range.
/// Slots are assigned in insertion order and referenced by the seed index.
#[derive(Debug, Default)]
pub struct TranscriptStore {
    transcripts: Vec<Transcript>,
    slots: HashMap<String, u32>,
    total_bases: u64,
}

impl TranscriptStore {
    pub fn new() -> TranscriptStore {
        Default::default()
    }

    pub fn put(&mut self, transcript: Transcript) -> u32 {
        if let Some(&slot) = self.slots.get(&transcript.transcript_id) {
            self.total_bases -= self.transcripts[slot as usize].len() as u64;
            self.total_bases += transcript.len() as u64;
            self.transcripts[slot as usize] = transcript;
            slot
        } else {
            let slot = self.transcripts.len() as u32;
            self.total_bases += transcript.len() as u64;
            self.slots.insert(transcript.transcript_id.clone(), slot);
            self.transcripts.push(transcript);
            slot
        }
    }

    pub fn get(&self, id: &str) -> Option<&Transcript> {
        self.slots
            .get(id)
            .map(|&slot| &self.transcripts[slot as usize])
    }

    pub fn get_slot(&self, slot: u32) -> Option<&Transcript> {
        self.transcripts.get(slot as usize)
    }

    pub fn slot_of(&self, id: &str) -> Option<u32> {
        self.slots.get(id).copied()
    }

    pub fn stream(&self) -> impl Iterator<Item = &Transcript> {
        self.transcripts.iter()
    }

    /// Clamped window of `2 * radius + 1` bases around `center`. The actual
    /// start is returned with the slice so callers know the range they got.
    pub fn window(&self, id: &str, center: usize, radius: usize) -> Result<(usize, &[u8])> {
        let transcript = self
            .get(id)
            .ok_or_else(|| Error::from(ErrorKind::TranscriptMissing(id.to_owned())))?;

        let end = usize::min(transcript.len(), center.saturating_add(radius) + 1);
        let start = usize::min(center.saturating_sub(radius), end);

        Ok((start, &transcript.sequence[start..end]))
    }

    pub fn transcript_count(&self) -> usize {
        self.transcripts.len()
    }

    pub fn total_bases(&self) -> u64 {
        self.total_bases
    }
}
