pub mod api_models;
pub mod client;
