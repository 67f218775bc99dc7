pub mod connection;
pub mod line_protocol;
pub mod operations;

pub use connection::InfluxClient;
