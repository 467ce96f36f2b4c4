pub mod routes;
mod socket;

pub use socket::apply_client_message;
