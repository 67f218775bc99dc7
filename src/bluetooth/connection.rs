/// Bluetooth LE GATT access to the Wave Plus
use async_trait::async_trait;
use bluer::{Address, Device, Uuid};
use log::{debug, error, warn};
use tokio::time::{sleep, Duration, Instant};

use crate::bluetooth::decoder::RawFrame;
use crate::error::TransportError;

/// Current-values characteristic of the Airthings Wave Plus
pub const CURRENT_VALUES_UUID: Uuid = Uuid::from_u128(0xb42e4dcc_ade7_11e4_89d3_123b93f75cba);

const SERVICES_RESOLVE_TIMEOUT_MS: u64 = 10_000;
const SERVICES_POLL_INTERVAL_MS: u64 = 100;

/// The calls an acquisition cycle needs from the radio link.
///
/// Once `connect` has returned a connection, every later step may fail and the
/// caller still owes exactly one `disconnect`.
#[async_trait]
pub trait Transport {
    type Connection: Send + Sync;

    async fn connect(&mut self, address: Address) -> Result<Self::Connection, TransportError>;

    /// Make the device's characteristics readable
    async fn discover_services(
        &mut self,
        connection: &Self::Connection,
    ) -> Result<(), TransportError>;

    async fn read_characteristic(
        &mut self,
        connection: &Self::Connection,
        characteristic: Uuid,
    ) -> Result<RawFrame, TransportError>;

    async fn disconnect(&mut self, connection: Self::Connection) -> Result<(), TransportError>;
}

/// BlueZ-backed transport
pub struct BluetoothTransport {
    adapter: bluer::Adapter,
    // The D-Bus session must outlive every handle obtained from it
    _session: bluer::Session,
}

impl BluetoothTransport {
    /// Open a BlueZ session and power on the default adapter
    pub async fn new() -> Result<Self, TransportError> {
        let session = match bluer::Session::new().await {
            Ok(session) => session,
            Err(e) => {
                error!("Failed to create Bluetooth session: {}", e);
                return Err(e.into());
            }
        };

        let adapter = match session.default_adapter().await {
            Ok(adapter) => adapter,
            Err(e) => {
                error!("Failed to get default Bluetooth adapter: {}", e);
                return Err(e.into());
            }
        };

        if let Err(e) = adapter.set_powered(true).await {
            error!("Failed to power on adapter: {}", e);
            return Err(e.into());
        }

        debug!("Using Bluetooth adapter {}", adapter.name());

        Ok(BluetoothTransport {
            adapter,
            _session: session,
        })
    }
}

/// Wait until BlueZ has finished GATT service discovery on `device`
async fn wait_for_services(device: &Device) -> Result<(), TransportError> {
    let deadline = Instant::now() + Duration::from_millis(SERVICES_RESOLVE_TIMEOUT_MS);
    while !device.is_services_resolved().await? {
        if Instant::now() >= deadline {
            return Err(TransportError::ServicesNotResolved(
                SERVICES_RESOLVE_TIMEOUT_MS,
            ));
        }
        sleep(Duration::from_millis(SERVICES_POLL_INTERVAL_MS)).await;
    }
    Ok(())
}

#[async_trait]
impl Transport for BluetoothTransport {
    type Connection = Device;

    async fn connect(&mut self, address: Address) -> Result<Device, TransportError> {
        let device = self.adapter.device(address)?;

        // Connect only if BlueZ does not already hold a link to the device
        if device.is_connected().await? {
            debug!("Already connected to {}", address);
        } else {
            debug!("Connecting to {}", address);
            device.connect().await?;
        }

        Ok(device)
    }

    async fn discover_services(&mut self, connection: &Device) -> Result<(), TransportError> {
        wait_for_services(connection).await
    }

    async fn read_characteristic(
        &mut self,
        connection: &Device,
        characteristic: Uuid,
    ) -> Result<RawFrame, TransportError> {
        for service in connection.services().await? {
            for candidate in service.characteristics().await? {
                if candidate.uuid().await? == characteristic {
                    let bytes = candidate.read().await?;
                    debug!(
                        "Read {} bytes from characteristic {}",
                        bytes.len(),
                        characteristic
                    );
                    return Ok(RawFrame::new(bytes));
                }
            }
        }

        warn!(
            "Characteristic {} not found on {}",
            characteristic,
            connection.address()
        );
        Err(TransportError::CharacteristicNotFound(characteristic))
    }

    async fn disconnect(&mut self, connection: Device) -> Result<(), TransportError> {
        debug!("Disconnecting from {}", connection.address());
        connection.disconnect().await?;
        Ok(())
    }
}
