pub mod broadcast;
pub mod bookings;
pub mod client;
pub mod core;
pub mod database;
pub mod errors;
pub mod model;
pub mod properties;
pub mod realtime;
pub mod router;
pub mod welcome;

#[cfg(test)]
mod test_support;
