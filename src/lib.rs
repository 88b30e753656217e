pub mod authentication;
pub mod configuration;
pub mod domains;
pub mod errors;
pub mod routes;
pub mod startup;
pub mod store;
pub mod telemetry;
