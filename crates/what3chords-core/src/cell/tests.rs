use super::*;
use crate::rng::create_rng;
use rand::rngs::mock::StepRng;

const MANHATTAN: &str = "8a2a1072b59ffff";
const MANHATTAN_R5: &str = "85283473fffffff";

fn cell(hex: &str) -> HierarchicalCellId {
    hex.parse().unwrap()
}

fn default_encoder() -> CellEncoder {
    CellEncoder::new(&CellConfig::default(), 2141).unwrap()
}

fn exact_config() -> CellConfig {
    CellConfig {
        resolution: 5,
        scramble: vec![3, 1, 0, 2],
        finest_level: FinestLevel::Septenary,
    }
}

// =============================================================================
// Cell id parsing and layout
// =============================================================================

#[test]
fn test_parse_and_display() {
    let id = cell(MANHATTAN);
    assert_eq!(id.raw(), 0x08a2_a107_2b59_ffff);
    assert_eq!(id.to_string(), MANHATTAN);
    assert_eq!(cell("0x8a2a1072b59ffff"), id);
    assert_eq!(cell("08a2a1072b59ffff"), id);
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(matches!(
        HierarchicalCellId::from_hex(""),
        Err(EncodeError::InvalidHex(_))
    ));
    assert!(HierarchicalCellId::from_hex("8a2a1072b59fffz").is_err());
    assert!(HierarchicalCellId::from_hex("18a2a1072b59ffff0").is_err());
    assert!(HierarchicalCellId::from_hex("+8a2a").is_err());
}

#[test]
fn test_bit_string_is_zero_padded() {
    let bits = cell(MANHATTAN).to_bit_string();
    assert_eq!(bits.len(), 64);
    assert!(bits.starts_with("0000100010100010"));
    assert!(bits.ends_with("111111111111111"));
}

#[test]
fn test_resolution_field() {
    assert_eq!(cell(MANHATTAN).resolution_field(), 10);
    assert_eq!(cell(MANHATTAN_R5).resolution_field(), 5);
}

#[test]
fn test_split_cell() {
    let (digits, frame) = split_cell(cell(MANHATTAN), 10).unwrap();
    assert_eq!(digits.region, 21);
    assert_eq!(digits.digits, vec![0, 2, 0, 3, 4, 5, 3, 2, 6, 3]);
    assert_eq!(frame.prefix, 0x08a);
    assert_eq!(frame.suffix, 0x7fff);
    assert_eq!(frame.suffix_bits, 15);
    assert_eq!(frame.resolution(), 10);
}

#[test]
fn test_canonical_frame_matches_real_cell() {
    let (_, frame) = split_cell(cell(MANHATTAN), 10).unwrap();
    assert_eq!(CellFrame::canonical(10).unwrap(), frame);
}

#[test]
fn test_split_then_join_is_identity() {
    for hex in [MANHATTAN, "8a1f1d48a75ffff", MANHATTAN_R5] {
        let id = cell(hex);
        let (digits, frame) = split_cell(id, 10).unwrap();
        assert_eq!(frame.join(&digits).unwrap(), id);
    }
}

#[test]
fn test_join_rejects_wrong_length() {
    let frame = CellFrame::canonical(10).unwrap();
    let digits = CellDigits {
        region: 3,
        digits: vec![1; 9],
    };
    assert!(matches!(
        frame.join(&digits),
        Err(EncodeError::InvalidParameter(_))
    ));
}

#[test]
fn test_resolution_bounds() {
    assert!(split_cell(cell(MANHATTAN), 0).is_err());
    assert!(split_cell(cell(MANHATTAN), 16).is_err());
    assert!(split_cell(cell(MANHATTAN), 15).is_ok());
}

// =============================================================================
// Validity
// =============================================================================

#[test]
fn test_valid_cells() {
    assert!(is_valid_cell_id(cell(MANHATTAN), 10));
    assert!(is_valid_cell_id(cell(MANHATTAN_R5), 5));
}

#[test]
fn test_coarse_cell_at_fine_resolution_is_invalid() {
    assert!(!is_valid_cell_id(cell(MANHATTAN_R5), 10));
    let (digits, _) = split_cell(cell(MANHATTAN_R5), 10).unwrap();
    assert_eq!(digits.defect(), Some(CellDefect::InvalidDigit { position: 5 }));
}

#[test]
fn test_any_digit_seven_is_invalid() {
    let frame = CellFrame::canonical(10).unwrap();
    let (valid, _) = split_cell(cell(MANHATTAN), 10).unwrap();
    for position in 0..10 {
        let mut digits = valid.clone();
        digits.digits[position] = 7;
        let id = frame.join(&digits).unwrap();
        assert!(!is_valid_cell_id(id, 10), "digit {} set to 7", position);
    }
}

#[test]
fn test_region_bounds() {
    let frame = CellFrame::canonical(3).unwrap();
    let ok = frame
        .join(&CellDigits {
            region: MAX_REGION,
            digits: vec![0, 6, 3],
        })
        .unwrap();
    assert!(is_valid_cell_id(ok, 3));

    let bad = frame
        .join(&CellDigits {
            region: MAX_REGION + 1,
            digits: vec![0, 6, 3],
        })
        .unwrap();
    assert!(!is_valid_cell_id(bad, 3));
}

// =============================================================================
// Scramble
// =============================================================================

#[test]
fn test_scramble_rejects_non_permutations() {
    assert!(DigitScramble::new(vec![0, 1, 1]).is_err());
    assert!(DigitScramble::new(vec![0, 3, 1]).is_err());
    assert!(DigitScramble::new(vec![2, 0, 1]).is_ok());
    assert!(DigitScramble::new(Vec::new()).unwrap().is_empty());
}

#[test]
fn test_scramble_apply_and_invert() {
    let scramble = DigitScramble::new(vec![4, 7, 1, 8, 2, 5, 0, 6, 3]).unwrap();
    let groups = [0u8, 2, 0, 3, 4, 5, 3, 2, 6];
    let scrambled = scramble.apply(&groups);
    assert_eq!(scrambled, vec![4, 2, 2, 6, 0, 5, 0, 3, 3]);
    assert_eq!(scramble.invert(&scrambled), groups.to_vec());
}

#[test]
fn test_identity_scramble() {
    let scramble = DigitScramble::identity(9);
    let groups = [6u8, 5, 4, 3, 2, 1, 0, 1, 2];
    assert_eq!(scramble.apply(&groups), groups.to_vec());
    assert_eq!(scramble.invert(&groups), groups.to_vec());
}

// =============================================================================
// Encoding
// =============================================================================

#[test]
fn test_golden_default_config() {
    let index = default_encoder().encode(cell(MANHATTAN)).unwrap();
    assert_eq!(index.digits(), [380, 1431, 1282]);

    let index = default_encoder().encode(cell("8a1f1d48a75ffff")).unwrap();
    assert_eq!(index.digits(), [270, 868, 1499]);
}

#[test]
fn test_golden_identity_scramble() {
    let config = CellConfig {
        scramble: (0..9).collect(),
        ..CellConfig::default()
    };
    let encoder = CellEncoder::new(&config, 2141).unwrap();
    let (digits, _) = split_cell(cell(MANHATTAN), 10).unwrap();
    assert_eq!(encoder.mixed_radix_value(&digits).unwrap(), 1_698_269_481);
    assert_eq!(encoder.encode(cell(MANHATTAN)).unwrap().digits(), [370, 1043, 448]);
}

#[test]
fn test_mixed_radix_value_rejects_wrong_digit_count() {
    let encoder = default_encoder();
    for len in [0, 2, 9, 11] {
        let digits = CellDigits {
            region: 3,
            digits: vec![1; len],
        };
        assert!(
            matches!(
                encoder.mixed_radix_value(&digits),
                Err(EncodeError::InvalidParameter(_))
            ),
            "{} digits",
            len
        );
    }
}

#[test]
fn test_mixed_radix_value_rejects_invalid_digits() {
    let encoder = default_encoder();
    let (mut digits, _) = split_cell(cell(MANHATTAN), 10).unwrap();
    digits.digits[4] = 7;
    assert!(encoder.mixed_radix_value(&digits).is_err());

    let (mut digits, _) = split_cell(cell(MANHATTAN), 10).unwrap();
    digits.region = 122;
    assert!(encoder.mixed_radix_value(&digits).is_err());
}

#[test]
fn test_golden_septenary() {
    let encoder = CellEncoder::new(&exact_config(), 2141).unwrap();
    let index = encoder.encode(cell(MANHATTAN_R5)).unwrap();
    assert_eq!(index.value(), 345_433);
    assert_eq!(index.digits(), [0, 161, 732]);
}

#[test]
fn test_binary_keeps_only_low_bit() {
    let encoder = default_encoder();
    let frame = CellFrame::canonical(10).unwrap();
    let (mut digits, _) = split_cell(cell(MANHATTAN), 10).unwrap();
    let base = encoder.encode(frame.join(&digits).unwrap()).unwrap();

    // 3 -> 5 keeps the low bit, 3 -> 4 flips it
    digits.digits[9] = 5;
    assert_eq!(encoder.encode(frame.join(&digits).unwrap()).unwrap(), base);
    digits.digits[9] = 4;
    assert_ne!(encoder.encode(frame.join(&digits).unwrap()).unwrap(), base);
}

#[test]
fn test_invalid_cell_aborts_encoding() {
    let err = default_encoder().encode(cell(MANHATTAN_R5)).unwrap_err();
    assert_eq!(
        err,
        EncodeError::InvalidCellIdentifier {
            cell: MANHATTAN_R5.to_string(),
            defect: CellDefect::InvalidDigit { position: 5 },
        }
    );
}

#[test]
fn test_address_overflow_at_top_of_domain() {
    // 122 * 7^9 * 2 values do not all fit below 2141^3
    let frame = CellFrame::canonical(10).unwrap();
    let top = frame
        .join(&CellDigits {
            region: MAX_REGION,
            digits: vec![6; 10],
        })
        .unwrap();
    assert!(matches!(
        default_encoder().encode(top),
        Err(EncodeError::AddressOverflow { .. })
    ));
}

#[test]
fn test_encoder_rejects_wrong_scramble_length() {
    let config = CellConfig {
        resolution: 9,
        ..CellConfig::default()
    };
    assert!(matches!(
        CellEncoder::new(&config, 2141),
        Err(EncodeError::InvalidParameter(_))
    ));
}

#[test]
fn test_resolution_one_has_no_coarse_digits() {
    let config = CellConfig {
        resolution: 1,
        scramble: Vec::new(),
        finest_level: FinestLevel::Septenary,
    };
    let encoder = CellEncoder::new(&config, 2041).unwrap();
    let frame = CellFrame::canonical(1).unwrap();
    let id = frame
        .join(&CellDigits {
            region: 10,
            digits: vec![4],
        })
        .unwrap();
    assert_eq!(encoder.encode(id).unwrap().value(), 74);
}

#[test]
fn test_domain_size() {
    assert_eq!(CellConfig::default().domain_size(), Some(9_846_280_108));
    assert_eq!(exact_config().domain_size(), Some(122 * 7u64.pow(5)));
}

// =============================================================================
// Partial decode
// =============================================================================

#[test]
fn test_septenary_decode_is_exact() {
    let encoder = CellEncoder::new(&exact_config(), 2141).unwrap();
    let id = cell(MANHATTAN_R5);
    let (index, frame) = encoder.encode_framed(id).unwrap();

    let mut rng = create_rng(7);
    assert_eq!(encoder.partial_decode(&index, &frame, &mut rng).unwrap(), id);
}

#[test]
fn test_binary_decode_reencodes_to_same_index() {
    let encoder = default_encoder();
    let id = cell(MANHATTAN);
    let (index, frame) = encoder.encode_framed(id).unwrap();

    for seed in 0..32 {
        let mut rng = create_rng(seed);
        let decoded = encoder.partial_decode(&index, &frame, &mut rng).unwrap();
        assert_eq!(encoder.encode(decoded).unwrap(), index);

        let (original, _) = split_cell(id, 10).unwrap();
        let (guess, _) = split_cell(decoded, 10).unwrap();
        assert_eq!(guess.region, original.region);
        assert_eq!(guess.digits[..9], original.digits[..9]);
        assert_eq!(guess.digits[9] & 1, original.digits[9] & 1);
        assert!(guess.digits[9] < 7);
    }
}

#[test]
fn test_binary_decode_fixed_choice() {
    let encoder = default_encoder();
    let (index, frame) = encoder.encode_framed(cell(MANHATTAN)).unwrap();

    // a zero stream always takes the first candidate: 1 for an odd bit
    let mut rng = StepRng::new(0, 0);
    let decoded = encoder.partial_decode(&index, &frame, &mut rng).unwrap();
    let (digits, _) = split_cell(decoded, 10).unwrap();
    assert_eq!(digits.digits[9], 1);
}

#[test]
fn test_binary_decode_is_seed_reproducible() {
    let encoder = default_encoder();
    let (index, frame) = encoder.encode_framed(cell(MANHATTAN)).unwrap();
    let a = encoder
        .partial_decode(&index, &frame, &mut create_rng(99))
        .unwrap();
    let b = encoder
        .partial_decode(&index, &frame, &mut create_rng(99))
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_binary_decode_covers_all_candidates() {
    let encoder = default_encoder();
    let (index, frame) = encoder.encode_framed(cell(MANHATTAN)).unwrap();
    let mut rng = create_rng(1);
    let mut seen = std::collections::BTreeSet::new();
    for _ in 0..200 {
        let decoded = encoder.partial_decode(&index, &frame, &mut rng).unwrap();
        let (digits, _) = split_cell(decoded, 10).unwrap();
        seen.insert(digits.digits[9]);
    }
    assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![1, 3, 5]);
}

#[test]
fn test_decode_rejects_region_past_last_base_cell() {
    let encoder = CellEncoder::new(&exact_config(), 2141).unwrap();
    let frame = CellFrame::canonical(5).unwrap();
    // 122 * 7^5 is the first value past the domain
    let index = EncodedIndex::from_value(122 * 7u64.pow(5), 2141).unwrap();
    assert!(matches!(
        encoder.partial_decode(&index, &frame, &mut create_rng(0)),
        Err(EncodeError::InvalidParameter(_))
    ));
}

#[test]
fn test_decode_rejects_radix_mismatch() {
    let encoder = default_encoder();
    let frame = CellFrame::canonical(10).unwrap();
    let index = EncodedIndex::new([1, 2, 3], 2041).unwrap();
    assert!(encoder
        .partial_decode(&index, &frame, &mut create_rng(0))
        .is_err());
}

#[test]
fn test_decode_with_canonical_frame() {
    let encoder = default_encoder();
    let index = encoder.encode(cell(MANHATTAN)).unwrap();
    let frame = CellFrame::canonical(10).unwrap();
    let decoded = encoder
        .partial_decode(&index, &frame, &mut create_rng(5))
        .unwrap();
    assert_eq!(decoded.resolution_field(), 10);
    assert!(is_valid_cell_id(decoded, 10));
}
