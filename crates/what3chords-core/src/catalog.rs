//! Chord dataset flattening and lookup.
//!
//! The dataset nests chords as root note -> suffix variants -> voicings. The
//! catalog flattens every `(root, suffix, position)` triple into one list in
//! source order; an [`EncodedIndex`] addresses it one digit at a time. Root
//! order is taken from the JSON document as written, so the same file always
//! yields the same catalog.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::CatalogError;
use crate::index::{EncodedIndex, INDEX_DIGITS};

/// A parsed chord dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordDataset {
    /// Root note to suffix variants, in document order.
    #[serde(with = "ordered_roots")]
    pub chords: Vec<(String, Vec<ChordVariant>)>,
}

impl ChordDataset {
    /// Parses a dataset from JSON text. Unknown top-level keys are ignored.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One chord quality (suffix) under a root note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordVariant {
    /// Root note name; falls back to the enclosing root key when empty.
    #[serde(default)]
    pub key: String,
    /// Chord quality, e.g. "major" or "m7".
    pub suffix: String,
    /// Voicings, each one catalog entry.
    pub positions: Vec<ChordPosition>,
}

/// One fingering of a chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordPosition {
    /// Fret per string relative to `base_fret`; negative means muted.
    pub frets: Vec<i32>,
    /// Finger per string, 0 for none.
    #[serde(default)]
    pub fingers: Vec<u8>,
    /// First fret shown in the diagram.
    #[serde(rename = "baseFret", default = "default_base_fret")]
    pub base_fret: u8,
    /// Whether the lowest barre is played with a capo.
    #[serde(default)]
    pub capo: bool,
    /// Sounding notes as MIDI numbers.
    #[serde(default)]
    pub midi: Vec<u8>,
    /// Barred frets.
    #[serde(default)]
    pub barres: Vec<u8>,
}

fn default_base_fret() -> u8 {
    1
}

/// A string's fret in a chord entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fret {
    /// String not played.
    Muted,
    /// Fret number, 0 for an open string.
    At(u8),
}

impl Fret {
    /// Symbol used for muted strings.
    pub const MUTED_SYMBOL: &'static str = "x";

    fn from_raw(raw: i32) -> Self {
        if raw < 0 {
            Fret::Muted
        } else {
            Fret::At(raw.min(u8::MAX as i32) as u8)
        }
    }
}

impl fmt::Display for Fret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fret::Muted => f.write_str(Self::MUTED_SYMBOL),
            Fret::At(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for Fret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Fret::Muted => serializer.serialize_str(Self::MUTED_SYMBOL),
            Fret::At(n) => serializer.serialize_u8(*n),
        }
    }
}

/// One flattened catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordEntry {
    /// Display label, `"{key}{suffix} {position}"`.
    pub label: String,
    /// Root note name.
    pub key: String,
    /// Chord quality.
    pub suffix: String,
    /// Position index within the variant.
    pub position: usize,
    /// Sounding notes as MIDI numbers.
    pub midi_notes: Vec<u8>,
    /// Fret per string, low string first.
    pub frets: Vec<Fret>,
    /// First fret shown in the diagram.
    pub base_fret: u8,
    /// Capo fret, 0 without capo.
    pub capo_fret: u8,
    /// Finger numbers concatenated, e.g. "032010".
    pub fingers: String,
}

impl ChordEntry {
    fn from_position(key: &str, suffix: &str, position: usize, voicing: &ChordPosition) -> Self {
        Self {
            label: format!("{}{} {}", key, suffix, position),
            key: key.to_string(),
            suffix: suffix.to_string(),
            position,
            midi_notes: voicing.midi.clone(),
            frets: voicing.frets.iter().map(|&f| Fret::from_raw(f)).collect(),
            base_fret: voicing.base_fret,
            capo_fret: if voicing.capo { voicing.base_fret } else { 0 },
            fingers: voicing.fingers.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Frets as display symbols joined by spaces, e.g. "x 3 2 0 1 0".
    pub fn fret_symbols(&self) -> String {
        self.frets
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The flattened, read-only chord list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChordCatalog {
    entries: Vec<ChordEntry>,
}

impl ChordCatalog {
    /// Flattens a dataset in root, suffix, position order.
    pub fn build(dataset: &ChordDataset) -> Self {
        let entries = dataset
            .chords
            .iter()
            .flat_map(|(root, variants)| {
                variants.iter().flat_map(move |variant| {
                    let key = if variant.key.is_empty() {
                        root.as_str()
                    } else {
                        variant.key.as_str()
                    };
                    variant
                        .positions
                        .iter()
                        .enumerate()
                        .map(move |(i, voicing)| {
                            ChordEntry::from_position(key, &variant.suffix, i, voicing)
                        })
                })
            })
            .collect();
        Self { entries }
    }

    /// Parses and flattens a dataset from JSON text.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(Self::build(&ChordDataset::from_json(json)?))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for an empty catalog.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&ChordEntry> {
        self.entries.get(index)
    }

    /// Iterates entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ChordEntry> {
        self.entries.iter()
    }

    /// Looks up one entry per index digit.
    ///
    /// A digit at or past the catalog length is an error; digits are never
    /// wrapped or clamped.
    pub fn lookup(&self, index: &EncodedIndex) -> Result<[&ChordEntry; INDEX_DIGITS], CatalogError> {
        let digits = index.digits();
        let entry = |position: usize| {
            let digit = digits[position];
            self.entries
                .get(digit as usize)
                .ok_or(CatalogError::IndexOutOfRange {
                    position,
                    digit,
                    len: self.entries.len(),
                })
        };
        Ok([entry(0)?, entry(1)?, entry(2)?])
    }
}

/// (De)serializes `Vec<(String, V)>` as a JSON object, keeping key order.
mod ordered_roots {
    use std::fmt;
    use std::marker::PhantomData;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S, V>(roots: &Vec<(String, V)>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        let mut map = serializer.serialize_map(Some(roots.len()))?;
        for (key, value) in roots {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        struct OrderedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
            type Value = Vec<(String, V)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of root notes to chord variants")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry()? {
                    out.push((key, value));
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}
