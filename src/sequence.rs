use bio::alphabets::rna;

use crate::constants::*;
use crate::errors::*;

/// 14-bit packed representation of a target-side 7-mer.
#[derive(Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy)]
pub struct SeedKey(pub u16);

impl SeedKey {
    pub fn new(key: u16) -> SeedKey {
        SeedKey(key)
    }

    pub fn key(self) -> usize {
        self.0 as usize
    }

    pub fn is_valid(self) -> bool {
        (self.0 as usize) < SEED_KEY_COUNT
    }
}

fn base_code(nuc: u8) -> Option<u16> {
    match nuc {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'U' => Some(3),
        _ => None,
    }
}

fn code_base(code: u16) -> u8 {
    match code & 3 {
        0 => b'A',
        1 => b'C',
        2 => b'G',
        _ => b'U',
    }
}

/// Packs a 7-mer into a 14-bit key; position 0 occupies the lowest bits.
/// Returns None if the window contains anything but A, C, G, U.
pub fn encode_seed(seq: &[u8]) -> Option<SeedKey> {
    assert!(seq.len() == SEED_LEN);

    let mut key = 0;
    for (pos, nuc) in seq.iter().enumerate() {
        key |= base_code(*nuc)? << (2 * pos);
    }

    Some(SeedKey::new(key))
}

pub fn decode_seed(key: SeedKey) -> [u8; SEED_LEN] {
    let mut seq = [0; SEED_LEN];
    for (pos, nuc) in seq.iter_mut().enumerate() {
        *nuc = code_base(key.0 >> (2 * pos));
    }

    seq
}

/// 2-bit packed RNA with an explicit length; the last byte may be partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedSeq {
    data: Vec<u8>,
    len: usize,
}

impl PackedSeq {
    /// Returns None if the sequence contains anything but A, C, G, U.
    pub fn encode(seq: &[u8]) -> Option<PackedSeq> {
        let mut data = vec![0u8; (seq.len() + 3) / 4];
        for (pos, nuc) in seq.iter().enumerate() {
            let code = base_code(*nuc)? as u8;
            data[pos / 4] |= code << (2 * (pos % 4));
        }

        Some(PackedSeq {
            data,
            len: seq.len(),
        })
    }

    pub fn decode(&self) -> Vec<u8> {
        (0..self.len)
            .map(|pos| code_base(u16::from(self.data[pos / 4] >> (2 * (pos % 4)))))
            .collect()
    }

    pub fn from_raw(data: Vec<u8>, len: usize) -> PackedSeq {
        PackedSeq { data, len }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn packed_size(len: usize) -> usize {
        (len + 3) / 4
    }
}

/// Base-wise complement of the reversed sequence (A<->U, C<->G).
pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    rna::revcomp(seq)
}

/// Strict normalization for guide strands: strips whitespace, uppercases,
/// maps T to U, rejects anything outside {A, C, G, U}, then enforces the
/// 19-23 nt length window.
pub fn normalize_guide(raw: &str) -> Result<Vec<u8>> {
    let seq = normalize(raw, false)?;

    if seq.len() < GUIDE_MIN_LEN || seq.len() > GUIDE_MAX_LEN {
        return Err(ErrorKind::InvalidLength(seq.len()).into());
    }

    Ok(seq)
}

/// Lenient normalization for reference transcripts: ambiguity codes such as
/// N are kept (the index builder skips seed windows containing them), but
/// non-alphabetic characters are rejected.
pub fn normalize_transcript(raw: &str) -> Result<Vec<u8>> {
    normalize(raw, true)
}

fn normalize(raw: &str, allow_ambiguous: bool) -> Result<Vec<u8>> {
    let mut seq = Vec::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_whitespace() {
            continue;
        }

        let up = ch.to_ascii_uppercase();
        match up {
            'T' => seq.push(b'U'),
            'A' | 'C' | 'G' | 'U' => seq.push(up as u8),
            _ if allow_ambiguous && up.is_ascii_alphabetic() => seq.push(up as u8),
            _ => return Err(ErrorKind::InvalidAlphabet(ch).into()),
        }
    }

    Ok(seq)
}

/// Target-side seed key for a validated guide: the reverse complement of
/// guide positions 2..8 (1-indexed).
pub fn target_seed_key(guide: &[u8]) -> Result<SeedKey> {
    let seed = &guide[1..1 + SEED_LEN];
    let target = revcomp(seed);

    match encode_seed(&target) {
        Some(key) => Ok(key),
        None => {
            let bad = target
                .iter()
                .find(|nuc| base_code(**nuc).is_none())
                .copied()
                .unwrap_or(b'N');
            Err(ErrorKind::InvalidAlphabet(bad as char).into())
        }
    }
}
