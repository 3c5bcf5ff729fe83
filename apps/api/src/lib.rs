pub mod analysis;
pub mod config;
pub mod errors;
pub mod llm_client;
pub mod models;
pub mod routes;
pub mod state;
pub mod tailoring;
