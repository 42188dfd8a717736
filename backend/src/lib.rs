pub mod routes;
pub mod services;
