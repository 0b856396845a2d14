use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{web, App, HttpServer};
use log::{error, info};

use price_api::inference::{OnnxPriceModel, Regressor};
use price_api::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    let model_path =
        std::env::var("MODEL_PATH").unwrap_or_else(|_| "models/price_model.onnx".to_string());
    let schema_path = std::env::var("FEATURE_SCHEMA_PATH")
        .unwrap_or_else(|_| "models/feature_schema.json".to_string());

    // Without a model no request can be answered; refuse to start.
    let model: Arc<dyn Regressor> = match OnnxPriceModel::load(&model_path, &schema_path) {
        Ok(model) => Arc::new(model),
        Err(e) => {
            error!("cannot load model: {:#}", e);
            std::process::exit(1);
        }
    };
    let model_data = web::Data::new(model);

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let workers = std::env::var("WORKERS")
        .ok()
        .and_then(|w| w.parse().ok())
        .unwrap_or_else(num_cpus::get);
    let bind_address = format!("{}:{}", host, port);

    info!("{} listening on http://{}", routes::SERVICE_DESCRIPTION, bind_address);
    info!("workers: {}", workers);
    info!("endpoints:");
    info!("  GET  /            - service description");
    info!("  GET  /health      - liveness check");
    info!("  GET  /model-info  - feature schema");
    info!("  POST /predict/    - price prediction");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST"])
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .wrap(cors)
            .app_data(model_data.clone())
            .app_data(web::JsonConfig::default().limit(16 * 1024))
            .configure(routes::configure)
    })
    .workers(workers)
    .bind(&bind_address)?
    .run()
    .await
}
