// ── Three-valued host inputs ──
//
// Every attribute handed over by the host is known, null, or unknown
// (value only determined at apply time). Consumers branch on the tag;
// null and unknown are never collapsed.

use std::collections::BTreeSet;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::diagnostics::{AttributePath, Diagnostic};

/// JSON marker for an unknown value: `{"$unknown": true}`.
pub const UNKNOWN_MARKER: &str = "$unknown";

/// A host-supplied attribute value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AttrValue<T> {
    Known(T),
    #[default]
    Null,
    Unknown,
}

/// A host collection of strings. Elements are themselves three-valued.
pub type StringCollection = AttrValue<Vec<AttrValue<String>>>;

impl<T> AttrValue<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            Self::Null | Self::Unknown => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AttrValue<U> {
        match self {
            Self::Known(v) => AttrValue::Known(f(v)),
            Self::Null => AttrValue::Null,
            Self::Unknown => AttrValue::Unknown,
        }
    }
}

impl<T: Clone> AttrValue<T> {
    /// Coerce into a native optional: null and unknown contribute nothing.
    pub fn coerce(&self) -> Option<T> {
        self.as_known().cloned()
    }
}

impl<T: Clone + Default> AttrValue<T> {
    /// Coerce, leaving the destination at its zero value for null/unknown.
    pub fn coerce_or_default(&self) -> T {
        self.coerce().unwrap_or_default()
    }
}

impl<T> From<Option<T>> for AttrValue<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Known)
    }
}

impl StringCollection {
    /// Convert a known collection into an ordered sequence.
    ///
    /// Null and unknown collections yield an empty sequence. A null or
    /// unknown element inside a known collection is a conversion error
    /// reported against `path`.
    pub fn coerce_list(&self, path: &AttributePath) -> Result<Vec<String>, Diagnostic> {
        let Self::Known(items) = self else {
            return Ok(Vec::new());
        };
        items
            .iter()
            .enumerate()
            .map(|(idx, item)| match item {
                AttrValue::Known(s) => Ok(s.clone()),
                AttrValue::Null => Err(Diagnostic::attribute_error(
                    path.clone(),
                    "Value Conversion Error",
                    format!("element {idx} of {path} is null; collection elements must be set"),
                )),
                AttrValue::Unknown => Err(Diagnostic::attribute_error(
                    path.clone(),
                    "Value Conversion Error",
                    format!("element {idx} of {path} is not yet known and cannot be converted"),
                )),
            })
            .collect()
    }

    /// Convert a known collection into a set (duplicates collapse).
    pub fn coerce_set(&self, path: &AttributePath) -> Result<BTreeSet<String>, Diagnostic> {
        self.coerce_list(path).map(|v| v.into_iter().collect())
    }

    /// Build a fully known collection.
    pub fn known_strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Known(items.into_iter().map(|s| AttrValue::Known(s.into())).collect())
    }
}

// ── Serde ────────────────────────────────────────────────────────────

impl<'de, T: Deserialize<'de>> Deserialize<'de> for AttrValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(deny_unknown_fields)]
        struct UnknownMarker {
            #[serde(rename = "$unknown")]
            unknown: bool,
        }

        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr<T> {
            Unknown(UnknownMarker),
            Known(T),
        }

        Ok(match Option::<Repr<T>>::deserialize(deserializer)? {
            None => Self::Null,
            Some(Repr::Unknown(marker)) if marker.unknown => Self::Unknown,
            Some(Repr::Unknown(_)) => Self::Null,
            Some(Repr::Known(v)) => Self::Known(v),
        })
    }
}

impl<T: Serialize> Serialize for AttrValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(v) => v.serialize(serializer),
            Self::Null => serializer.serialize_none(),
            Self::Unknown => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(UNKNOWN_MARKER, &true)?;
                map.end()
            }
        }
    }
}
