use std::collections::HashMap;

use crate::errors::*;

/// Turner nearest-neighbor doublets, kcal/mol at 37 C. Keys are the guide
/// doublet (5'->3') followed by the target doublet aligned to it; contexts
/// absent from the table contribute nothing.
const DOUBLETS: [(&[u8; 2], &[u8; 2], f64); 18] = [
    // Watson-Crick stacks
    (b"AA", b"UU", -0.9),
    (b"AU", b"UA", -1.1),
    (b"UA", b"AU", -1.3),
    (b"UU", b"AA", -0.9),
    (b"GA", b"UC", -2.1),
    (b"GU", b"CA", -2.1),
    (b"CG", b"GC", -2.4),
    (b"GC", b"CG", -2.1),
    (b"CA", b"GU", -2.1),
    (b"UC", b"GA", -2.1),
    (b"CU", b"GA", -2.1),
    (b"AG", b"CU", -2.1),
    (b"GG", b"CC", -3.3),
    (b"CC", b"GG", -3.3),
    // G:U wobble stacks
    (b"GU", b"UG", -1.4),
    (b"UG", b"GU", -1.4),
    (b"GU", b"AU", -1.3),
    (b"UG", b"UA", -1.0),
];

pub const TERMINAL_AU_PENALTY: f64 = 0.45;
pub const MISMATCH_PENALTY: f64 = 0.5;

const SEED_WEIGHT: f64 = 1.5;
const CENTRAL_WEIGHT: f64 = 1.0;
const SUPPLEMENTARY_WEIGHT: f64 = 0.8;

lazy_static! {
    static ref NN_TABLE: HashMap<[u8; 4], f64> = {
        let mut table = HashMap::with_capacity(DOUBLETS.len());
        for (guide, target, energy) in &DOUBLETS {
            table.insert([guide[0], guide[1], target[0], target[1]], *energy);
        }

        table
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    WatsonCrick,
    Wobble,
    Mismatch,
}

/// Pairing between a guide base and the target base aligned to it.
pub fn pair_kind(guide: u8, target: u8) -> PairKind {
    match (guide, target) {
        (b'A', b'U') | (b'U', b'A') | (b'G', b'C') | (b'C', b'G') => PairKind::WatsonCrick,
        (b'G', b'U') | (b'U', b'G') => PairKind::Wobble,
        _ => PairKind::Mismatch,
    }
}

// Doublet weights keyed by the 5' guide index: seed 2..8 (0-indexed 1..7),
// central 9..12, supplementary elsewhere
fn position_weight(index: usize) -> f64 {
    match index {
        1..=7 => SEED_WEIGHT,
        8..=11 => CENTRAL_WEIGHT,
        _ => SUPPLEMENTARY_WEIGHT,
    }
}

fn step_energy(guide: &[u8], aligned: &[u8], paired: &[PairKind], i: usize) -> f64 {
    let kinds = [paired[i], paired[i + 1]];
    if kinds.contains(&PairKind::Mismatch) {
        return MISMATCH_PENALTY;
    }

    let key = [guide[i], guide[i + 1], aligned[i], aligned[i + 1]];
    let stack = NN_TABLE.get(&key).copied().unwrap_or(0.0);

    if kinds.contains(&PairKind::Wobble) {
        stack / 2.0
    } else {
        stack
    }
}

/// Nearest-neighbor duplex energy of the guide against a target window of
/// equal length. The window is the transcript slice read 5'->3'; binding is
/// antiparallel, so the window is reversed before position-wise alignment.
///
/// A length difference is a programmer error in the caller, never a property
/// of user input.
pub fn duplex_delta_g(guide: &[u8], target_window: &[u8]) -> Result<f64> {
    if guide.len() != target_window.len() {
        return Err(ErrorKind::LengthMismatch(guide.len(), target_window.len()).into());
    }

    let aligned: Vec<u8> = target_window.iter().rev().copied().collect();
    let paired: Vec<PairKind> = guide
        .iter()
        .zip(aligned.iter())
        .map(|(&g, &t)| pair_kind(g, t))
        .collect();

    let mut delta_g = 0.0;
    for i in 0..guide.len() - 1 {
        delta_g += position_weight(i) * step_energy(guide, &aligned, &paired, i);
    }

    for &end in &[0, guide.len() - 1] {
        if guide[end] == b'A' || guide[end] == b'U' {
            delta_g += TERMINAL_AU_PENALTY;
        }
    }

    Ok(delta_g)
}
