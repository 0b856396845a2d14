use std::collections::HashMap;

use log::warn;

use crate::models::PredictionRequest;

/// Property types the model was trained on. Anything else encodes as "Other".
pub const PROPERTY_TYPES: [&str; 21] = [
    "House",
    "Condominium",
    "Bed & Breakfast",
    "Loft",
    "Boat",
    "Boutique hotel",
    "Bungalow",
    "Camper/RV",
    "Casa particular",
    "Chalet",
    "Dorm",
    "Earth House",
    "Guest suite",
    "Guesthouse",
    "Hostel",
    "Other",
    "Serviced apartment",
    "Tent",
    "Timeshare",
    "Townhouse",
    "Villa",
];

/// Room types the model was trained on. There is no fallback for this group:
/// an unrecognized value leaves all three indicators at 0.
pub const ROOM_TYPES: [&str; 3] = ["Entire home/apt", "Private room", "Shared room"];

const PROPERTY_TYPE_PREFIX: &str = "property_type_";
const ROOM_TYPE_PREFIX: &str = "room_type_";

/// A request flattened into named numeric features: the three numeric fields
/// plus one indicator per known category. Immutable once built; the schema
/// reconciler projects it into the model's input order.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    fields: HashMap<String, f32>,
}

impl EncodedRecord {
    pub fn from_request(request: &PredictionRequest) -> Self {
        let mut fields =
            HashMap::with_capacity(3 + PROPERTY_TYPES.len() + ROOM_TYPES.len());
        fields.insert("bedrooms".to_string(), request.bedrooms as f32);
        fields.insert("bathrooms".to_string(), request.bathrooms as f32);
        fields.insert(
            "review_scores_rating".to_string(),
            request.review_scores_rating as f32,
        );
        fields.extend(encode_property_type(&request.property_type));
        fields.extend(encode_room_type(&request.room_type));
        Self { fields }
    }

    /// Builds a record from arbitrary named features, bypassing the encoders.
    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, f32)>,
    {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.fields.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Title-cases like the training pipeline did: a letter is uppercased when
/// the previous character is not a letter, lowercased otherwise.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_is_alpha = false;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if prev_is_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(ch);
            prev_is_alpha = false;
        }
    }
    out
}

/// One indicator per known property type; exactly one is set. Unknown values
/// fall back to "Other" with a data-quality notice in the log.
fn encode_property_type(raw: &str) -> HashMap<String, f32> {
    let normalized = title_case(raw.trim());
    let category = if PROPERTY_TYPES.contains(&normalized.as_str()) {
        normalized
    } else {
        warn!(
            "unknown property_type '{}', substituting 'Other'",
            normalized
        );
        "Other".to_string()
    };

    PROPERTY_TYPES
        .iter()
        .map(|name| {
            let value = if *name == category { 1.0 } else { 0.0 };
            (format!("{}{}", PROPERTY_TYPE_PREFIX, name), value)
        })
        .collect()
}

/// Three indicators, exact string match only. No normalization and no
/// catch-all category for this group.
fn encode_room_type(raw: &str) -> HashMap<String, f32> {
    ROOM_TYPES
        .iter()
        .map(|name| {
            let value = if *name == raw { 1.0 } else { 0.0 };
            (format!("{}{}", ROOM_TYPE_PREFIX, name), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(property_type: &str, room_type: &str) -> PredictionRequest {
        PredictionRequest {
            bedrooms: 2,
            bathrooms: 1,
            review_scores_rating: 90,
            property_type: property_type.to_string(),
            room_type: room_type.to_string(),
        }
    }

    fn property_indicators(record: &EncodedRecord) -> Vec<(String, f32)> {
        PROPERTY_TYPES
            .iter()
            .map(|name| {
                let key = format!("{}{}", PROPERTY_TYPE_PREFIX, name);
                let value = record.get(&key).unwrap();
                (key, value)
            })
            .collect()
    }

    #[test]
    fn title_case_matches_the_training_normalizer() {
        assert_eq!(title_case("house"), "House");
        assert_eq!(title_case("bed & breakfast"), "Bed & Breakfast");
        assert_eq!(title_case("EARTH HOUSE"), "Earth House");
        // Letters after a non-letter restart capitalization, so the slash
        // category never survives normalization intact.
        assert_eq!(title_case("camper/rv"), "Camper/Rv");
        assert_eq!(title_case("Camper/RV"), "Camper/Rv");
    }

    #[test]
    fn whitespace_and_casing_normalize_to_a_known_category() {
        let record = EncodedRecord::from_request(&request_with(" house ", "Private room"));
        assert_eq!(record.get("property_type_House"), Some(1.0));
        for (key, value) in property_indicators(&record) {
            if key != "property_type_House" {
                assert_eq!(value, 0.0, "{} should be 0", key);
            }
        }
    }

    #[test]
    fn unknown_property_type_encodes_as_other() {
        let record = EncodedRecord::from_request(&request_with("Spaceship", "Private room"));
        assert_eq!(record.get("property_type_Other"), Some(1.0));
        assert_eq!(record.get("property_type_House"), Some(0.0));
    }

    #[test]
    fn exactly_one_property_indicator_is_set() {
        for input in ["House", "Villa", "Spaceship", ""] {
            let record = EncodedRecord::from_request(&request_with(input, "Shared room"));
            let ones = property_indicators(&record)
                .iter()
                .filter(|(_, v)| *v == 1.0)
                .count();
            assert_eq!(ones, 1, "input {:?}", input);
        }
    }

    #[test]
    fn room_type_matches_exactly() {
        let record = EncodedRecord::from_request(&request_with("House", "Private room"));
        assert_eq!(record.get("room_type_Private room"), Some(1.0));
        assert_eq!(record.get("room_type_Entire home/apt"), Some(0.0));
        assert_eq!(record.get("room_type_Shared room"), Some(0.0));
    }

    #[test]
    fn unrecognized_room_type_leaves_the_whole_group_at_zero() {
        // Unlike property_type there is no catch-all category here.
        for input in ["private room", "Penthouse", ""] {
            let record = EncodedRecord::from_request(&request_with("House", input));
            for name in ROOM_TYPES {
                let key = format!("{}{}", ROOM_TYPE_PREFIX, name);
                assert_eq!(record.get(&key), Some(0.0), "input {:?}", input);
            }
        }
    }

    #[test]
    fn record_carries_numerics_and_both_indicator_groups() {
        let record = EncodedRecord::from_request(&request_with("House", "Entire home/apt"));
        assert_eq!(record.len(), 3 + PROPERTY_TYPES.len() + ROOM_TYPES.len());
        assert_eq!(record.get("bedrooms"), Some(2.0));
        assert_eq!(record.get("bathrooms"), Some(1.0));
        assert_eq!(record.get("review_scores_rating"), Some(90.0));
        // The raw categorical fields must not leak into the record.
        assert_eq!(record.get("property_type"), None);
        assert_eq!(record.get("room_type"), None);
    }
}
