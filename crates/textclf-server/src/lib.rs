//! textclf Server
//!
//! Serves one text classifier over HTTP:
//! - `POST /predict` with `{"text": "..."}` returns `{"prediction": <class index>}`
//! - `GET /health` reports the loaded model
//! - `GET /metrics` renders Prometheus metrics
//!
//! Any failed prediction request returns `400 {"error": "..."}`.

pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use routes::create_router;
pub use state::AppState;
