pub mod routes;
mod handler;
pub mod booking_service;
