//! Property price prediction service.
//!
//! A validated request is one-hot encoded, reconciled against the model's
//! feature schema and fed to an ONNX regression model. The binary in
//! `main.rs` wires this pipeline behind an actix-web server.

pub mod encoding;
pub mod inference;
pub mod models;
pub mod routes;
pub mod schema;
