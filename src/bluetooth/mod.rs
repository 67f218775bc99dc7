pub mod connection;
pub mod decoder;

pub use connection::BluetoothTransport;
