extern crate riscan;

use riscan::sequence::*;

#[test]
fn test_normalize_guide_maps_t_to_u() {
    let guide = normalize_guide("tttACGTAGCaaaaaaaaaaa").unwrap();

    assert_eq!(guide, b"UUUACGUAGCAAAAAAAAAAA".to_vec());
}

#[test]
fn test_normalize_guide_strips_whitespace() {
    let guide = normalize_guide(" UUU ACGUAGC\tAAAAAAAAAAA\n").unwrap();

    assert_eq!(guide, b"UUUACGUAGCAAAAAAAAAAA".to_vec());
}

#[test]
fn test_normalize_guide_rejects_bad_characters() {
    let err = normalize_guide("UUUACGUAGXAAAAAAAAAAA").unwrap_err();

    assert_eq!(err.kind().code(), "InvalidAlphabet");
}

#[test]
fn test_normalize_guide_rejects_ambiguity_codes() {
    let err = normalize_guide("UUUACGUAGNAAAAAAAAAAA").unwrap_err();

    assert_eq!(err.kind().code(), "InvalidAlphabet");
}

#[test]
fn test_normalize_guide_rejects_short_sequences() {
    let err = normalize_guide("UUUACGUAGCAAAAAAAA").unwrap_err();

    assert_eq!(err.kind().code(), "InvalidLength");
}

#[test]
fn test_normalize_guide_rejects_long_sequences() {
    let err = normalize_guide("UUUACGUAGCAAAAAAAAAAAAAA").unwrap_err();

    assert_eq!(err.kind().code(), "InvalidLength");
}

#[test]
fn test_normalize_guide_accepts_length_bounds() {
    assert!(normalize_guide("UUUACGUAGCAAAAAAAAA").is_ok());
    assert!(normalize_guide("UUUACGUAGCAAAAAAAAAAAAA").is_ok());
}

#[test]
fn test_normalize_transcript_keeps_ambiguity_codes() {
    let seq = normalize_transcript("ACGTNRYacgt").unwrap();

    assert_eq!(seq, b"ACGUNRYACGU".to_vec());
}

#[test]
fn test_normalize_transcript_rejects_non_alphabetic() {
    let err = normalize_transcript("ACG-U").unwrap_err();

    assert_eq!(err.kind().code(), "InvalidAlphabet");
}

#[test]
fn test_revcomp() {
    assert_eq!(revcomp(b"UUACGUA"), b"UACGUAA".to_vec());
}

#[test]
fn test_revcomp_involution() {
    let seq = b"AUGCUAGCUAGGCAUUACG";

    assert_eq!(revcomp(&revcomp(seq)), seq.to_vec());
}

#[test]
fn test_encode_seed_is_little_endian_over_positions() {
    assert_eq!(encode_seed(b"AAAAAAA"), Some(SeedKey::new(0)));
    assert_eq!(encode_seed(b"CAAAAAA"), Some(SeedKey::new(1)));
    assert_eq!(encode_seed(b"AAAAAAC"), Some(SeedKey::new(1 << 12)));
    assert_eq!(encode_seed(b"UUUUUUU"), Some(SeedKey::new(0x3FFF)));
}

#[test]
fn test_encode_seed_rejects_ambiguity_codes() {
    assert_eq!(encode_seed(b"ACGUANN"), None);
}

#[test]
fn test_seed_key_round_trip() {
    for seq in &[b"ACGUACG", b"UACGUAA", b"GGGGGGG", b"AUAUAUA"] {
        let key = encode_seed(*seq).unwrap();

        assert_eq!(&decode_seed(key), *seq);
    }
}

#[test]
fn test_packed_seq_round_trip() {
    for seq in &[
        &b""[..],
        &b"A"[..],
        &b"ACG"[..],
        &b"ACGU"[..],
        &b"ACGUACGUA"[..],
        &b"UUUUUUUUUUUGCUACGUAAA"[..],
    ] {
        let packed = PackedSeq::encode(seq).unwrap();

        assert_eq!(packed.len(), seq.len());
        assert_eq!(packed.decode(), seq.to_vec());
    }
}

#[test]
fn test_packed_seq_rejects_ambiguity_codes() {
    assert_eq!(PackedSeq::encode(b"ACGN"), None);
}

#[test]
fn test_target_seed_key_uses_guide_positions_2_to_8() {
    let guide = normalize_guide("UUUACGUAGCAAAAAAAAAAA").unwrap();
    let key = target_seed_key(&guide).unwrap();

    assert_eq!(key, encode_seed(b"UACGUAA").unwrap());
}
