pub mod routes;
mod handler;
pub mod property_service;
