mod acquisition;
mod bluetooth;
mod config;
mod database;
mod error;
mod models;
mod utils;

use log::{error, info};

use acquisition::AcquisitionDriver;
use bluetooth::BluetoothTransport;
use config::WavePlusConfig;
use database::InfluxClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match WavePlusConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let sink = InfluxClient::new(&config)?;
    let transport = match BluetoothTransport::new().await {
        Ok(transport) => transport,
        Err(e) => {
            error!("Bluetooth unavailable: {}", e);
            return Err(e.into());
        }
    };

    // One invocation is one attempt; periodic polling is left to the scheduler that runs us
    let mut driver = AcquisitionDriver::new(config, transport, sink);
    match driver.run_cycle().await {
        Ok(_) => {
            info!("Acquisition cycle completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Acquisition cycle failed: {}", e);
            Err(e.into())
        }
    }
}
