extern crate riscan;

use riscan::thermo::{duplex_delta_g, pair_kind, PairKind};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} but got {}",
        expected,
        actual
    );
}

#[test]
fn test_pair_kinds() {
    assert_eq!(pair_kind(b'A', b'U'), PairKind::WatsonCrick);
    assert_eq!(pair_kind(b'U', b'A'), PairKind::WatsonCrick);
    assert_eq!(pair_kind(b'G', b'C'), PairKind::WatsonCrick);
    assert_eq!(pair_kind(b'C', b'G'), PairKind::WatsonCrick);
    assert_eq!(pair_kind(b'G', b'U'), PairKind::Wobble);
    assert_eq!(pair_kind(b'U', b'G'), PairKind::Wobble);
    assert_eq!(pair_kind(b'A', b'G'), PairKind::Mismatch);
    assert_eq!(pair_kind(b'C', b'U'), PairKind::Mismatch);
    assert_eq!(pair_kind(b'A', b'A'), PairKind::Mismatch);
}

// 20 AA/UU stacks at -0.9, weighted 0.8 + 7 * 1.5 + 4 * 1.0 + 8 * 0.8
// = 21.7, plus 0.45 per A/U terminus
#[test]
fn test_perfect_poly_a_duplex() {
    let guide = vec![b'A'; 21];
    let window = vec![b'U'; 21];

    let delta_g = duplex_delta_g(&guide, &window).unwrap();
    assert_close(delta_g, -0.9 * 21.7 + 0.9);
}

// A GU/UG wobble stack is looked up at -1.4 and halved; the flanking
// steps fall outside the parameter table and contribute nothing
#[test]
fn test_wobble_stack_is_halved() {
    let mut guide = vec![b'A'; 21];
    guide[8] = b'G';
    guide[9] = b'U';

    // window index 11 pairs guide index 9
    let mut window = vec![b'U'; 21];
    window[11] = b'G';

    let delta_g = duplex_delta_g(&guide, &window).unwrap();

    // steps 0..7 minus the AG step at 7: 0.8 + 6 * 1.5 weights
    let flank5 = -0.9 * (0.8 + 6.0 * 1.5);
    let wobble = -1.4 / 2.0;
    let flank3 = -0.9 * (2.0 * 1.0 + 8.0 * 0.8);
    assert_close(delta_g, flank5 + wobble + flank3 + 0.9);
}

// A single internal mismatch replaces two -0.9 stacks with two +0.5
// penalties at weight 1.0
#[test]
fn test_mismatch_penalty() {
    let guide = vec![b'A'; 21];
    let mut window = vec![b'U'; 21];
    window[10] = b'G';

    let delta_g = duplex_delta_g(&guide, &window).unwrap();
    assert_close(delta_g, -0.9 * 21.7 + 0.9 + 2.0 * 0.9 + 2.0 * 0.5);
}

#[test]
fn test_terminal_au_penalty_applies_per_end() {
    // G and C termini carry no penalty
    let mut gc_guide = vec![b'A'; 21];
    gc_guide[0] = b'G';
    gc_guide[20] = b'C';
    let mut gc_window = vec![b'U'; 21];
    gc_window[20] = b'C'; // pairs guide[0]
    gc_window[0] = b'G'; // pairs guide[20]

    let au = duplex_delta_g(&vec![b'A'; 21], &vec![b'U'; 21]).unwrap();
    let gc = duplex_delta_g(&gc_guide, &gc_window).unwrap();

    // Same interior stacks differ only through terminal steps and the
    // penalty; verify the penalty by rebuilding both sums
    let au_stacks = -0.9 * 21.7;
    assert_close(au, au_stacks + 0.9);

    // GC guide: steps 0 and 19 leave the table (GA/CU and AC/UG unknown),
    // leaving 7 seed, 4 central and 7 supplementary AA/UU stacks
    let gc_stacks = -0.9 * (7.0 * 1.5 + 4.0 * 1.0 + 7.0 * 0.8);
    assert_close(gc, gc_stacks);
}

#[test]
fn test_length_mismatch_is_an_error() {
    let guide = vec![b'A'; 21];
    let window = vec![b'U'; 20];

    let err = duplex_delta_g(&guide, &window).unwrap_err();
    assert_eq!(err.kind().code(), "LengthMismatch");
}
