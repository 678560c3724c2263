use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::constants::*;
use crate::errors::*;
use crate::index::SeedIndex;
use crate::sequence::{decode_seed, target_seed_key, SeedKey};
use crate::store::TranscriptStore;

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    pub max_seed_mismatches: u32,
    pub allow_wobble: bool,
    pub max_candidates: usize,
}

/// One candidate binding site prior to scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateHit {
    pub transcript: u32,
    /// Offset of the matched seed 7-mer on the target strand.
    pub seed_pos: u32,
    /// 5' offset of the full alignment window on the transcript.
    pub site_start: u32,
    pub mismatches: u32,
    pub wobbles: u32,
}

#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub hits: Vec<CandidateHit>,
    /// Postings that referenced a transcript slot missing from the store;
    /// logged and skipped, the search continues.
    pub missing_transcripts: usize,
}

/// Guide seed: positions 2..8 of the guide, 1-indexed.
pub fn guide_seed(guide: &[u8]) -> &[u8] {
    &guide[1..1 + SEED_LEN]
}

fn substitute(probes: &mut Vec<(SeedKey, u32)>, key: SeedKey, distance: u32, max: u32, from: usize) {
    if distance < max {
        for pos in from..SEED_LEN {
            let current = (key.0 >> (2 * pos)) & 3;
            let template = key.0 & !(3 << (2 * pos));
            for code in 0..4u16 {
                if code != current {
                    let variant = SeedKey::new(template | (code << (2 * pos)));
                    probes.push((variant, distance + 1));

                    substitute(probes, variant, distance + 1, max, pos + 1);
                }
            }
        }
    }
}

/// Enumerates the probe set: the exact target seed plus every variant within
/// `max` substitutions. The forward-only position recursion generates each
/// key exactly once, tagged with its exact Hamming distance.
fn probe_set(target_seed: SeedKey, max: u32) -> Vec<(SeedKey, u32)> {
    let mut probes = vec![(target_seed, 0)];
    substitute(&mut probes, target_seed, 0, max, 0);

    probes
}

/// Splits a probe's differences from the exact target seed into wobbles and
/// mismatches. Position p of the target-side 7-mer pairs guide seed base
/// 6 - p (binding is antiparallel); G:U and U:G count as wobbles.
fn classify_probe(
    seed: &[u8],
    target_seed: &[u8; SEED_LEN],
    probe: SeedKey,
    allow_wobble: bool,
) -> (u32, u32) {
    let decoded = decode_seed(probe);

    let mut mismatches = 0;
    let mut wobbles = 0;
    for pos in 0..SEED_LEN {
        if decoded[pos] != target_seed[pos] {
            let guide_base = seed[SEED_LEN - 1 - pos];
            let target_base = decoded[pos];

            let wobble = (guide_base == b'G' && target_base == b'U')
                || (guide_base == b'U' && target_base == b'G');
            if allow_wobble && wobble {
                wobbles += 1;
            } else {
                mismatches += 1;
            }
        }
    }

    (mismatches, wobbles)
}

/// Collects candidate binding sites for a validated guide. Hits lacking the
/// flanking bases for a full-length alignment window are rejected; duplicate
/// (transcript, position) pairs are collapsed keeping the minimum
/// (mismatches, wobbles).
pub fn find_candidates(
    guide: &[u8],
    index: &SeedIndex,
    store: &TranscriptStore,
    params: &SearchParams,
) -> Result<SearchOutcome> {
    if params.max_seed_mismatches > 2 {
        bail!(
            "max_seed_mismatches must be 0, 1, or 2, got {}",
            params.max_seed_mismatches
        );
    }

    let seed = guide_seed(guide);
    let exact = target_seed_key(guide)?;
    let exact_seq = decode_seed(exact);
    let guide_len = guide.len();

    let mut outcome = SearchOutcome::default();
    let mut dedup: HashMap<(u32, u32), usize> = HashMap::new();

    for (key, _) in probe_set(exact, params.max_seed_mismatches) {
        let (mismatches, wobbles) = classify_probe(seed, &exact_seq, key, params.allow_wobble);

        for posting in index.lookup(key)? {
            let transcript = match store.get_slot(posting.transcript) {
                Some(transcript) => transcript,
                None => {
                    warn!(
                        "seed entry references unknown transcript slot {}; skipping",
                        posting.transcript
                    );
                    outcome.missing_transcripts += 1;
                    continue;
                }
            };

            // Guide position 1 pairs the base 3' of the target seed, so the
            // alignment window is [pos + 8 - L, pos + 8). Sites without full
            // flanking on either side are rejected.
            let seed_pos = posting.pos as usize;
            if seed_pos + SEED_LEN + 1 < guide_len || seed_pos + SEED_LEN + 1 > transcript.len() {
                continue;
            }
            let site_start = (seed_pos + SEED_LEN + 1 - guide_len) as u32;

            match dedup.entry((posting.transcript, posting.pos)) {
                Entry::Occupied(entry) => {
                    let hit = &mut outcome.hits[*entry.get()];
                    if (mismatches, wobbles) < (hit.mismatches, hit.wobbles) {
                        hit.mismatches = mismatches;
                        hit.wobbles = wobbles;
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(outcome.hits.len());
                    outcome.hits.push(CandidateHit {
                        transcript: posting.transcript,
                        seed_pos: posting.pos,
                        site_start,
                        mismatches,
                        wobbles,
                    });

                    if outcome.hits.len() > params.max_candidates {
                        return Err(ErrorKind::ResourceExhausted(
                            outcome.hits.len(),
                            params.max_candidates,
                        )
                        .into());
                    }
                }
            }
        }
    }

    Ok(outcome)
}
