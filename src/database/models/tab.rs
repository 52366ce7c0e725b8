use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A tablature document: ordered groups plus playback settings.
///
/// The whole tree (groups and their note grids) is persisted as one
/// document. Identifiers are serialized under `_id` and omitted when unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tab {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_id"
    )]
    pub id: Option<Uuid>,
    pub groups: Vec<TabGroup>,
    pub tempo: i64,
    pub capo: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TabGroup {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_id"
    )]
    pub id: Option<Uuid>,
    /// Advisory back-reference to the owning tab; never validated.
    pub tab_id: String,
    pub group_index: i64,
    /// Outer index is the instrument string, inner order is time position.
    pub notes: Vec<Vec<Note>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Note {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_id"
    )]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "optional_text")]
    pub tab_group_id: Option<String>,
    pub string_index: i64,
    /// Kept as text so symbolic markings (muted, open) survive.
    pub fret: String,
    pub position: i64,
    pub absolute_position: i64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Tab {
    /// Iterate every note of every group, in group then string then time order.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.groups
            .iter()
            .flat_map(|group| group.notes.iter().flatten())
    }
}

/// Parse a tab identifier as it appears in a request path. Only the
/// canonical hyphenated form is accepted, with no surrounding whitespace.
pub fn parse_tab_id(raw: &str) -> Option<Uuid> {
    if raw.len() != HYPHENATED_LEN {
        return None;
    }
    Uuid::parse_str(raw).ok()
}

const HYPHENATED_LEN: usize = 36;

// Clients that have not been assigned an id yet send `"_id": ""`.
fn optional_id<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}
