// Core store module - records, ports and the outcome envelope shared by the
// settings, roles and points services.

pub mod envelope;
pub mod store_models;
pub mod store_ports;

pub use envelope::Envelope;
pub use store_models::*;
pub use store_ports::*;
