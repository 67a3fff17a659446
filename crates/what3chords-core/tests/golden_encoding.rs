//! Pinned encoder outputs and catalog scenarios.
//!
//! The golden indices below were computed once from the preset
//! configurations. A change to any of them means previously shared chord
//! triples now point somewhere else.

use pretty_assertions::assert_eq;

use what3chords_core::{
    to_base, CatalogError, CellConfig, ChordCatalog, EncodeInput, EncodedIndex, Encoder,
    EncoderConfig, FinestLevel, Fret, GeoPoint, HierarchicalCellId, Session, ShuffleConfig,
};

const MINI_CATALOG: &str = include_str!("fixtures/guitar-chords-mini.json");

fn encode_point(config: &EncoderConfig, lon: f64, lat: f64) -> [u32; 3] {
    let encoder = Encoder::from_config(config).unwrap();
    let point = GeoPoint::new(lon, lat).unwrap();
    encoder.encode(&EncodeInput::Point(point)).unwrap().digits()
}

fn encode_cell(config: &EncoderConfig, hex: &str) -> EncodedIndex {
    let encoder = Encoder::from_config(config).unwrap();
    let cell: HierarchicalCellId = hex.parse().unwrap();
    encoder.encode(&EncodeInput::Cell(cell)).unwrap()
}

// ============================================================================
// Numeral Base
// ============================================================================

#[test]
fn zero_and_radix_in_base_2041() {
    assert_eq!(to_base(0, 2041, None).unwrap(), vec![0]);
    assert_eq!(to_base(2041, 2041, None).unwrap(), vec![1, 0]);
    assert_eq!(to_base(0, 2041, Some(3)).unwrap(), vec![0, 0, 0]);
}

// ============================================================================
// Coordinate Shuffle Preset
// ============================================================================

#[test]
fn shuffle_preset_goldens() {
    let config = EncoderConfig::by_name("shuffle").unwrap();
    let cases: [(f64, f64, [u32; 3]); 5] = [
        (0.0, 0.0, [1020, 1034, 186]),
        (13.405, 52.52, [416, 1917, 451]),
        (-0.1276, 51.5072, [0, 1783, 1163]),
        (-74.006, 40.7128, [1164, 1370, 1263]),
        (151.2093, -33.8688, [173, 1025, 1601]),
    ];
    for (lon, lat, expected) in cases {
        assert_eq!(encode_point(&config, lon, lat), expected, "({}, {})", lon, lat);
    }
}

#[test]
fn shuffle_preset_origin_value() {
    let config = EncoderConfig::by_name("shuffle").unwrap();
    let index = EncodedIndex::new(encode_point(&config, 0.0, 0.0), 2041).unwrap();
    assert_eq!(index.value(), 4_251_105_200);
}

#[test]
fn nearby_points_scatter() {
    let config = EncoderConfig::by_name("shuffle").unwrap();
    assert_eq!(encode_point(&config, 13.41, 52.52), [1193, 1836, 1904]);
    assert_ne!(
        encode_point(&config, 13.41, 52.52),
        encode_point(&config, 13.405, 52.52)
    );
}

#[test]
fn antimeridian_shares_a_column() {
    let config = EncoderConfig::by_name("shuffle").unwrap();
    assert_eq!(encode_point(&config, -180.0, 0.0), [1020, 1002, 298]);
    assert_eq!(encode_point(&config, 180.0, 0.0), [1020, 1002, 298]);
}

#[test]
fn unshuffled_grid() {
    let config = EncoderConfig {
        shuffle: ShuffleConfig {
            rounds: 0,
            ..ShuffleConfig::default()
        },
        ..EncoderConfig::default()
    };
    assert_eq!(encode_point(&config, 13.405, 52.52), [1650, 1381, 185]);
}

// ============================================================================
// Hierarchical Cell Presets
// ============================================================================

#[test]
fn cell_preset_goldens() {
    let config = EncoderConfig::by_name("cell").unwrap();
    assert_eq!(encode_cell(&config, "8a2a1072b59ffff").digits(), [380, 1431, 1282]);
    assert_eq!(encode_cell(&config, "8a1f1d48a75ffff").digits(), [270, 868, 1499]);
}

#[test]
fn identity_scramble_golden() {
    let mut config = EncoderConfig::by_name("cell").unwrap();
    config.cell.scramble = (0..9).collect();
    let index = encode_cell(&config, "8a2a1072b59ffff");
    assert_eq!(index.value(), 1_698_269_481);
    assert_eq!(index.to_string(), "370.1043.448");
}

#[test]
fn septenary_resolution_five_golden() {
    let config = EncoderConfig {
        radix: 2141,
        cell: CellConfig {
            resolution: 5,
            scramble: vec![3, 1, 0, 2],
            finest_level: FinestLevel::Septenary,
        },
        ..EncoderConfig::by_name("cell").unwrap()
    };
    let index = encode_cell(&config, "85283473fffffff");
    assert_eq!(index.value(), 345_433);
    assert_eq!(index.digits(), [0, 161, 732]);
}

#[test]
fn coarse_cell_read_too_fine_is_rejected() {
    let config = EncoderConfig::by_name("cell").unwrap();
    let encoder = Encoder::from_config(&config).unwrap();
    let cell: HierarchicalCellId = "85283473fffffff".parse().unwrap();
    assert!(encoder.encode(&EncodeInput::Cell(cell)).is_err());
}

// ============================================================================
// Catalog Scenarios
// ============================================================================

#[test]
fn two_roots_yield_two_entries_in_order() {
    let catalog = ChordCatalog::from_json(MINI_CATALOG).unwrap();
    assert_eq!(catalog.len(), 2);

    let a = catalog.get(0).unwrap();
    assert_eq!(a.label, "Amajor 0");
    assert_eq!(a.midi_notes, vec![45, 52, 57, 61, 64]);
    assert_eq!(a.fret_symbols(), "x 0 2 2 2 0");
    assert_eq!(a.capo_fret, 0);
    assert_eq!(a.fingers, "001230");

    let bb = catalog.get(1).unwrap();
    assert_eq!(bb.label, "Bbminor 0");
    assert_eq!(bb.frets[0], Fret::Muted);
    assert_eq!(bb.frets[1], Fret::At(1));
    assert_eq!(bb.capo_fret, 1);
    assert_eq!(bb.fingers, "013421");
}

#[test]
fn positions_follow_their_root() {
    let json = r#"{
        "chords": {
            "E": [{ "suffix": "m", "positions": [
                { "frets": [0, 2, 2, 0, 0, 0], "baseFret": 1, "midi": [40] },
                { "frets": [-1, 1, 3, 3, 2, 1], "baseFret": 7, "capo": true, "midi": [52] }
            ] }],
            "C": [{ "suffix": "7", "positions": [
                { "frets": [-1, 3, 2, 3, 1, 0], "baseFret": 1, "midi": [48] },
                { "frets": [-1, 1, 3, 1, 3, 1], "baseFret": 3, "midi": [48] }
            ] }]
        }
    }"#;
    let catalog = ChordCatalog::from_json(json).unwrap();
    let labels: Vec<_> = catalog.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["Em 0", "Em 1", "C7 0", "C7 1"]);
    assert_eq!(catalog.get(1).unwrap().capo_fret, 7);
}

#[test]
fn digit_equal_to_catalog_length_is_out_of_range() {
    let catalog = ChordCatalog::from_json(MINI_CATALOG).unwrap();
    let index = EncodedIndex::new([0, 1, 2], 2041).unwrap();
    match catalog.lookup(&index) {
        Err(CatalogError::IndexOutOfRange {
            position,
            digit,
            len,
        }) => {
            assert_eq!((position, digit, len), (2, 2, 2));
        }
        other => panic!("expected IndexOutOfRange, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn session_over_fixture() {
    let config = EncoderConfig {
        radix: 2,
        shuffle: ShuffleConfig {
            lon_steps: 4,
            lat_steps: 2,
            rounds: 3,
        },
        ..EncoderConfig::default()
    };
    let catalog = ChordCatalog::from_json(MINI_CATALOG).unwrap();
    let session = Session::new(config, catalog).unwrap();

    let point = GeoPoint::new(45.0, 20.0).unwrap();
    let selection = session.chords_for(&EncodeInput::Point(point)).unwrap();
    for (chord, digit) in selection.chords.iter().zip(selection.index.digits()) {
        assert_eq!(chord.label, ["Amajor 0", "Bbminor 0"][digit as usize]);
    }
}
