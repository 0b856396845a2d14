use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use log::{error, info};

use crate::inference::{predict_price, Regressor};
use crate::models::{
    ErrorResponse, HealthResponse, ModelInfo, PredictionRequest, ServiceMessage,
};

pub const SERVICE_DESCRIPTION: &str = "Property price prediction API";

async fn index() -> impl Responder {
    HttpResponse::Ok().json(ServiceMessage {
        message: SERVICE_DESCRIPTION.to_string(),
    })
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn model_info(model: web::Data<Arc<dyn Regressor>>) -> impl Responder {
    let schema = model.feature_schema();
    HttpResponse::Ok().json(ModelInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        feature_count: schema.len(),
        features: schema.names().to_vec(),
    })
}

/// Range violations reject with 400; anything the pipeline fails with past
/// that point comes back as a 200 with an error payload.
async fn predict(
    model: web::Data<Arc<dyn Regressor>>,
    request: web::Json<PredictionRequest>,
) -> impl Responder {
    let request = request.into_inner();
    info!("prediction request: {:?}", request);

    if let Err(e) = request.validate() {
        error!("validation failed: {}", e);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: e.to_string(),
        });
    }

    let model = model.get_ref().clone();
    match web::block(move || predict_price(model.as_ref(), &request)).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => {
            error!("blocking execution failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "prediction execution failed".to_string(),
            })
        }
    }
}

async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "not found".to_string(),
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health))
        .route("/model-info", web::get().to(model_info))
        .route("/predict/", web::post().to(predict))
        .default_service(web::route().to(not_found));
}
