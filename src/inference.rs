use std::path::Path;

use anyhow::Context;
use log::info;
use thiserror::Error;
use tract_onnx::prelude::*;

use crate::encoding::EncodedRecord;
use crate::models::{PredictionOutcome, PredictionRequest, ValidationError};
use crate::schema::FeatureSchema;

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// A loaded regression model: an opaque function from one feature row to a
/// scalar, plus the schema describing the row's order. Implementations must
/// be shareable across workers; the server holds one behind an `Arc` for the
/// process lifetime.
pub trait Regressor: Send + Sync {
    fn feature_schema(&self) -> &FeatureSchema;

    /// Runs the model on a single row whose layout matches
    /// `feature_schema()`.
    fn predict_row(&self, row: &[f32]) -> anyhow::Result<f32>;
}

/// Anything the pipeline can fail with past the transport layer.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("model inference failed: {0}")]
    Inference(#[from] anyhow::Error),
}

/// The production model: an ONNX plan with its training-time feature schema
/// loaded from the sidecar JSON written by the export step.
pub struct OnnxPriceModel {
    plan: OnnxPlan,
    schema: FeatureSchema,
}

impl OnnxPriceModel {
    pub fn load<P, Q>(model_path: P, schema_path: Q) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let schema = FeatureSchema::from_file(schema_path)?;
        let model_path = model_path.as_ref();
        let plan = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("cannot read model {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, schema.len())),
            )?
            .into_optimized()?
            .into_runnable()?;

        info!(
            "loaded model {} ({} features)",
            model_path.display(),
            schema.len()
        );
        Ok(Self { plan, schema })
    }
}

impl Regressor for OnnxPriceModel {
    fn feature_schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict_row(&self, row: &[f32]) -> anyhow::Result<f32> {
        let input = Tensor::from_shape(&[1, row.len()], row)?;
        let outputs = self.plan.run(tvec!(input.into()))?;
        let value = outputs[0]
            .to_array_view::<f32>()?
            .iter()
            .next()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("model produced no output"))?;
        Ok(value)
    }
}

/// The single error boundary of the pipeline: every failure past this point
/// is returned as a response payload, never propagated.
pub fn predict_price(model: &dyn Regressor, request: &PredictionRequest) -> PredictionOutcome {
    match run_pipeline(model, request) {
        Ok(label) => PredictionOutcome::Success { label },
        Err(e) => PredictionOutcome::Failure {
            error: e.to_string(),
        },
    }
}

fn run_pipeline(
    model: &dyn Regressor,
    request: &PredictionRequest,
) -> Result<i64, PredictionError> {
    request.validate()?;
    let record = EncodedRecord::from_request(request);
    let row = model.feature_schema().reconcile(&record);
    let value = model.predict_row(&row)?;
    // Labels truncate toward zero, matching the training pipeline's integer
    // coercion of the regression output.
    Ok(value as i64)
}
