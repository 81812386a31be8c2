use crate::data::types::TypeId;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

impl BaseStats {
    pub fn new(hp: u32, atk: u32, def: u32, spa: u32, spd: u32, spe: u32) -> Self {
        Self {
            hp,
            atk,
            def,
            spa,
            spd,
            spe,
        }
    }
}

/// A creature as the storage layer hands it over: stats, typing and the tag
/// strings already merged from its species, ability and held item.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesData {
    pub name: String,
    #[serde(alias = "stats")]
    pub base_stats: BaseStats,
    pub type1: TypeId,
    #[serde(default)]
    pub type2: Option<TypeId>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
}

/// Decodes a persisted JSON-encoded tag array. Anything that is not an array
/// of strings yields no tags.
pub fn decode_tag_list(encoded: &str) -> Vec<String> {
    let trimmed = encoded.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<String>>(trimmed) {
        Ok(tags) => tags,
        Err(err) => {
            tracing::warn!(%err, "ignoring undecodable tag list");
            Vec::new()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsWire {
    List(Vec<String>),
    Encoded(String),
    Missing(()),
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TagsWire::deserialize(deserializer)? {
        TagsWire::List(tags) => tags,
        TagsWire::Encoded(encoded) => decode_tag_list(&encoded),
        TagsWire::Missing(()) => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_tag_list_tolerates_garbage() {
        assert_eq!(
            decode_tag_list(r#"["immune:fire","flag:avoid"]"#),
            vec!["immune:fire", "flag:avoid"]
        );
        assert!(decode_tag_list("").is_empty());
        assert!(decode_tag_list("not json").is_empty());
        assert!(decode_tag_list(r#"{"a":1}"#).is_empty());
    }

    #[test]
    fn species_accepts_encoded_or_listed_tags() {
        let listed: SpeciesData = serde_json::from_value(json!({
            "name": "Shedinja",
            "baseStats": {"hp": 1, "atk": 90, "def": 45, "spa": 30, "spd": 30, "spe": 40},
            "type1": 12,
            "type2": 14,
            "tags": ["flag:wonder_guard"]
        }))
        .expect("listed tags");
        assert_eq!(listed.tags, vec!["flag:wonder_guard"]);
        assert_eq!(listed.type2, Some(14));

        let encoded: SpeciesData = serde_json::from_value(json!({
            "name": "Charmander",
            "stats": {"hp": 39, "atk": 52, "def": 43, "spa": 60, "spd": 50, "spe": 65},
            "type1": 2,
            "tags": "[\"resist:grass\"]"
        }))
        .expect("encoded tags");
        assert_eq!(encoded.tags, vec!["resist:grass"]);
        assert_eq!(encoded.type2, None);
        assert_eq!(encoded.base_stats.spe, 65);

        let untagged: SpeciesData = serde_json::from_value(json!({
            "name": "Ditto",
            "baseStats": {"hp": 48, "atk": 48, "def": 48, "spa": 48, "spd": 48, "spe": 48},
            "type1": 1,
            "tags": null
        }))
        .expect("null tags");
        assert!(untagged.tags.is_empty());
    }
}
