use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bounds enforced on the numeric request fields.
pub const BEDROOMS_RANGE: (i64, i64) = (0, 10);
pub const BATHROOMS_RANGE: (i64, i64) = (0, 8);
pub const REVIEW_SCORE_RANGE: (i64, i64) = (0, 100);

/// One prediction request as received on the wire.
///
/// All five fields are required at the HTTP boundary; `Default` produces the
/// all-zero record used when the pipeline is driven directly and a numeric
/// field was never supplied.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PredictionRequest {
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub review_scores_rating: i64,
    pub property_type: String,
    pub room_type: String,
}

impl PredictionRequest {
    /// Checks the numeric fields against their ranges. The categorical
    /// fields are not validated here; the encoder normalizes them later.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks = [
            ("bedrooms", self.bedrooms, BEDROOMS_RANGE),
            ("bathrooms", self.bathrooms, BATHROOMS_RANGE),
            ("review_scores_rating", self.review_scores_rating, REVIEW_SCORE_RANGE),
        ];

        for (field, value, (min, max)) in checks {
            if !(min..=max).contains(&value) {
                return Err(ValidationError { field, value, min, max });
            }
        }

        Ok(())
    }
}

/// A numeric field outside its declared range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} must be between {min} and {max} (got {value})")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: i64,
    pub min: i64,
    pub max: i64,
}

/// Response body of `POST /predict/`: a label on success, a message when the
/// pipeline failed past validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionOutcome {
    Success { label: i64 },
    Failure { error: String },
}

#[derive(Debug, Serialize)]
pub struct ServiceMessage {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub version: String,
    pub feature_count: usize,
    pub features: Vec<String>,
}
