//! Form serialization.
//!
//! A submitted form is a flat stream of named text fields. Field names carry
//! a scope prefix: `ticker-<key>` belongs to the current ticker block,
//! `ticker-layout-<key>` to that block's nested layout, `sequence-<key>` to
//! the global sequence object, and anything else lands top-level. The
//! serializer folds the stream back into the nested configuration shape.

use crate::scalar;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Scope prefix of ticker block fields.
pub const TICKER_PREFIX: &str = "ticker-";
/// Scope prefix of layout fields, after the ticker prefix is stripped.
pub const LAYOUT_PREFIX: &str = "layout-";
/// Scope prefix of sequence fields.
pub const SEQUENCE_PREFIX: &str = "sequence-";
/// Reserved key holding the nested layout object on every ticker entry.
pub const LAYOUT_KEY: &str = "layout";

/// A single named form field captured at serialization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEntry {
    /// Field name, including any scope prefix.
    pub name: String,
    /// Raw textual value.
    pub value: String,
}

impl FormEntry {
    /// Build an entry from a name/value pair.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One ticker's serialized fields, with the reserved `layout` object nested
/// inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerEntry(Map<String, Value>);

impl TickerEntry {
    /// Empty entry with the `layout` object pre-created.
    #[must_use]
    pub fn new() -> Self {
        let mut fields = Map::new();
        fields.insert(LAYOUT_KEY.to_string(), Value::Object(Map::new()));
        Self(fields)
    }

    fn from_fields(fields: &[FormEntry]) -> Self {
        let mut entry = Self::new();
        for field in fields {
            let Some(scalar) = scalar::coerce(&field.value) else {
                continue;
            };
            let Some(key) = field.name.strip_prefix(TICKER_PREFIX) else {
                debug!(
                    field = field.name.as_str(),
                    "ignoring non-ticker field in block group"
                );
                continue;
            };
            match key.strip_prefix(LAYOUT_PREFIX) {
                Some(layout_key) => entry.insert_layout(layout_key, Value::from(scalar)),
                None => entry.insert(key, Value::from(scalar)),
            }
        }
        entry
    }

    /// Store a value under a stripped ticker key.
    pub fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    /// Store a value under a stripped layout key.
    ///
    /// Dropped without effect if the `layout` slot no longer holds an object.
    pub fn insert_layout(&mut self, key: &str, value: Value) {
        if let Some(Value::Object(layout)) = self.0.get_mut(LAYOUT_KEY) {
            layout.insert(key.to_string(), value);
        }
    }

    /// Look up a stored field by its stripped key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The nested layout object.
    #[must_use]
    pub fn layout(&self) -> Option<&Map<String, Value>> {
        self.0.get(LAYOUT_KEY).and_then(Value::as_object)
    }

    /// All fields, the `layout` object included.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl Default for TickerEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// The nested configuration produced from one form submission.
///
/// Serializes as `{ "tickers": [...], "sequence": {...} }` with the
/// unrecognized top-level fields flattened alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedForm {
    /// Ticker entries in block order; never empty.
    pub tickers: Vec<TickerEntry>,
    /// Global sequence configuration fields, prefix stripped.
    pub sequence: Map<String, Value>,
    /// Fields outside the recognized scopes, names unmodified.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SerializedForm {
    /// Encode as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to encode serialized form as JSON")
    }
}

/// Serialize a flat stream of form fields in document order.
///
/// The ticker-scoped sub-stream is split into blocks with the duplicate-key
/// rule (see [`split_blocks`]) and handed to [`serialize_grouped`].
/// Serialization never fails: every value is best-effort coerced and
/// unrecognized names land on the top-level object unvalidated.
#[must_use]
pub fn serialize(entries: &[FormEntry]) -> SerializedForm {
    let (blocks, rest) = split_blocks(entries);
    serialize_grouped(&blocks, &rest)
}

/// Serialize ticker fields already grouped per block, plus the remaining
/// fields.
///
/// The order-independent entry point: the caller decides where each block
/// begins instead of the duplicate-key rule, and the output shape matches
/// [`serialize`]'s. An empty `blocks` slice still yields one empty ticker
/// entry. Within one group a repeated key overwrites; it does not split.
#[must_use]
pub fn serialize_grouped(blocks: &[Vec<FormEntry>], rest: &[FormEntry]) -> SerializedForm {
    let mut tickers: Vec<TickerEntry> = blocks
        .iter()
        .map(|fields| TickerEntry::from_fields(fields))
        .collect();
    if tickers.is_empty() {
        tickers.push(TickerEntry::new());
    }

    let mut sequence = Map::new();
    let mut extra = Map::new();
    for entry in rest {
        let Some(scalar) = scalar::coerce(&entry.value) else {
            continue;
        };
        let value = Value::from(scalar);
        if let Some(key) = entry.name.strip_prefix(SEQUENCE_PREFIX) {
            sequence.insert(key.to_string(), value);
        } else {
            extra.insert(entry.name.clone(), value);
        }
    }

    SerializedForm {
        tickers,
        sequence,
        extra,
    }
}

/// Partition a flat field stream into per-block ticker field groups plus the
/// remaining (sequence and top-level) fields.
///
/// A stripped ticker key (or stripped layout key) seen again within the
/// running group starts a new group before the field is kept: duplicate keys
/// are the only signal that one block ended and the next began. Presence is
/// what splits, not the stored value, so re-emitting a key with the same
/// value still splits. This requires each block's fields to be emitted
/// contiguously and no field name to repeat meaningfully within one block.
/// Empty-valued fields are dropped before the duplicate test and never split
/// a block.
#[must_use]
pub fn split_blocks(entries: &[FormEntry]) -> (Vec<Vec<FormEntry>>, Vec<FormEntry>) {
    let mut groups: Vec<Vec<FormEntry>> = Vec::new();
    let mut group: Vec<FormEntry> = Vec::new();
    let mut rest: Vec<FormEntry> = Vec::new();
    let mut plain_seen: HashSet<&str> = HashSet::new();
    let mut layout_seen: HashSet<&str> = HashSet::new();

    for entry in entries {
        let Some(key) = entry.name.strip_prefix(TICKER_PREFIX) else {
            rest.push(entry.clone());
            continue;
        };
        if entry.value.is_empty() {
            continue;
        }

        let layout_key = key.strip_prefix(LAYOUT_PREFIX);
        let duplicate = match layout_key {
            Some(layout_key) => layout_seen.contains(layout_key),
            // `layout` is pre-created on every ticker entry, so a bare
            // `layout` field always reads as already present.
            None => key == LAYOUT_KEY || plain_seen.contains(key),
        };
        if duplicate {
            debug!(
                block = groups.len() + 1,
                field = entry.name.as_str(),
                "duplicate key starts a new ticker block"
            );
            groups.push(std::mem::take(&mut group));
            plain_seen.clear();
            layout_seen.clear();
        }
        match layout_key {
            Some(layout_key) => {
                layout_seen.insert(layout_key);
            }
            None => {
                plain_seen.insert(key);
            }
        }
        group.push(entry.clone());
    }

    groups.push(group);
    (groups, rest)
}
