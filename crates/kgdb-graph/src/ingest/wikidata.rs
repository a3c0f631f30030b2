//! Wikidata claim-value normalization and the identifier-class skip
//! set used while building the label vocabulary.

use serde_json::Value as Json;
use std::collections::HashSet;

/// A Wikidata entity prefix (`http://www.wikidata.org/entity/`),
/// stripped from `quantity` claim units.
const WD_ENTITY_PREFIX: &str = "http://www.wikidata.org/entity/";

/// A claim's `mainsnak.datavalue`, normalized to the shape the graph
/// store's `CLAIMS_LIT` column expects, after the Wikidata-specific
/// `time`/`quantity`/`monolingualtext` unwrapping the dump's raw JSON
/// requires.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    /// `wikibase-entityid`: the referenced item or property id.
    EntityId(String),
    /// `time`: an ISO-8601 date/time with the `T00:00:00Z` suffix and
    /// any leading `+` sign stripped.
    Time(String),
    /// `quantity`: a numeric amount plus its unit, with the unit's
    /// Wikidata-entity prefix stripped to a bare id (or left empty
    /// for a unitless quantity, i.e. unit `"1"`).
    Quantity {
        /// Amount with its leading `+` sign stripped.
        amount: String,
        /// Bare unit id, or empty for a unitless quantity.
        unit: String,
    },
    /// `monolingualtext`: just the text, language tag dropped.
    MonolingualText(String),
    /// `string`/`url`/`external-id` and anything else carrying a bare
    /// string payload.
    PlainString(String),
}

/// Normalize one claim's `datavalue` given its Wikidata `type` tag
/// (`"wikibase-entityid"`, `"time"`, `"quantity"`, `"monolingualtext"`,
/// or any plain-string type). Returns `None` if the JSON shape doesn't
/// match what the tagged type requires.
#[must_use]
pub fn normalize_claim_value(datavalue_type: &str, value: &Json) -> Option<ClaimValue> {
    match datavalue_type {
        "wikibase-entityid" => value
            .get("id")
            .and_then(Json::as_str)
            .map(|id| ClaimValue::EntityId(id.to_string())),
        "time" => value
            .get("time")
            .and_then(Json::as_str)
            .map(|t| ClaimValue::Time(normalize_time(t))),
        "quantity" => {
            let amount = value.get("amount").and_then(Json::as_str)?;
            let unit = value.get("unit").and_then(Json::as_str).unwrap_or("1");
            Some(ClaimValue::Quantity {
                amount: strip_leading_plus(amount),
                unit: strip_unit_prefix(unit),
            })
        }
        "monolingualtext" => value
            .get("text")
            .and_then(Json::as_str)
            .map(|t| ClaimValue::MonolingualText(t.to_string())),
        _ => value.as_str().map(|s| ClaimValue::PlainString(s.to_string())),
    }
}

fn normalize_time(raw: &str) -> String {
    strip_leading_plus(&raw.replace("T00:00:00Z", ""))
}

fn strip_leading_plus(s: &str) -> String {
    s.strip_prefix('+').unwrap_or(s).to_string()
}

fn strip_unit_prefix(unit: &str) -> String {
    if unit == "1" {
        return String::new();
    }
    unit.strip_prefix(WD_ENTITY_PREFIX).unwrap_or(unit).to_string()
}

/// A curated set of Wikidata ids that identify "identifier-class"
/// concepts (catalogs, external-id schemes, and similar) whose claims
/// are excluded when building the label vocabulary, the way the
/// source system loads its identifier skip list from a side file.
#[derive(Debug, Clone, Default)]
pub struct IdentifierClassSet(HashSet<String>);

impl IdentifierClassSet {
    /// An empty skip set.
    #[must_use]
    pub fn new() -> Self {
        IdentifierClassSet(HashSet::new())
    }

    /// Build a skip set from an explicit id list (as loaded from a
    /// config file's first column, one id per line).
    #[must_use]
    pub fn from_ids<I: IntoIterator<Item = S>, S: Into<String>>(ids: I) -> Self {
        IdentifierClassSet(ids.into_iter().map(Into::into).collect())
    }

    /// `true` if `id` is in the skip set.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// `true` if the skip set has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of ids in the skip set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_entity_id_claim() {
        let value = json!({"entity-type": "item", "id": "Q1490"});
        assert_eq!(
            normalize_claim_value("wikibase-entityid", &value),
            Some(ClaimValue::EntityId("Q1490".to_string()))
        );
    }

    #[test]
    fn normalizes_time_claim_stripping_suffix_and_sign() {
        let value = json!({"time": "+2022-06-01T00:00:00Z", "precision": 11});
        assert_eq!(
            normalize_claim_value("time", &value),
            Some(ClaimValue::Time("2022-06-01".to_string()))
        );
    }

    #[test]
    fn normalizes_quantity_claim_stripping_unit_prefix() {
        let value = json!({
            "amount": "+13929286",
            "unit": "http://www.wikidata.org/entity/Q1490",
        });
        assert_eq!(
            normalize_claim_value("quantity", &value),
            Some(ClaimValue::Quantity {
                amount: "13929286".to_string(),
                unit: "Q1490".to_string(),
            })
        );
    }

    #[test]
    fn unitless_quantity_has_empty_unit() {
        let value = json!({"amount": "+42", "unit": "1"});
        assert_eq!(
            normalize_claim_value("quantity", &value),
            Some(ClaimValue::Quantity {
                amount: "42".to_string(),
                unit: String::new(),
            })
        );
    }

    #[test]
    fn normalizes_monolingualtext_claim() {
        let value = json!({"text": "Tokyo", "language": "en"});
        assert_eq!(
            normalize_claim_value("monolingualtext", &value),
            Some(ClaimValue::MonolingualText("Tokyo".to_string()))
        );
    }

    #[test]
    fn identifier_class_set_skips_known_ids() {
        let set = IdentifierClassSet::from_ids(["Q19595382", "Q19847637"]);
        assert!(set.contains("Q19595382"));
        assert!(!set.contains("Q1490"));
        assert_eq!(set.len(), 2);
    }
}
