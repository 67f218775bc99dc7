/// One connect-read-decode-store cycle against a Wave Plus
use log::{debug, info, warn};
use time::OffsetDateTime;

use crate::bluetooth::connection::{Transport, CURRENT_VALUES_UUID};
use crate::bluetooth::decoder::{decode, RawFrame, Reading};
use crate::config::WavePlusConfig;
use crate::database::operations::{store_measurement, MeasurementSink};
use crate::error::{CycleError, TransportError};
use crate::models::{MeasurementRecord, Sensor};
use crate::utils::{celsius_to_fahrenheit, format_datetime};

pub struct AcquisitionDriver<T, S> {
    config: WavePlusConfig,
    transport: T,
    sink: S,
}

impl<T, S> AcquisitionDriver<T, S>
where
    T: Transport,
    S: MeasurementSink,
{
    pub fn new(config: WavePlusConfig, transport: T, sink: S) -> Self {
        AcquisitionDriver {
            config,
            transport,
            sink,
        }
    }

    /// Resolve services and read the current-values characteristic over an open connection
    pub async fn acquire_frame(
        &mut self,
        connection: &T::Connection,
    ) -> Result<RawFrame, TransportError> {
        self.transport.discover_services(connection).await?;
        self.transport
            .read_characteristic(connection, CURRENT_VALUES_UUID)
            .await
    }

    /// Run a single acquisition cycle
    ///
    /// Connects to the device, reads and decodes one frame, and writes one point.
    /// The connection is released exactly once on every path out of this function,
    /// including decode and write failures. Nothing is retried.
    ///
    /// # Returns
    /// The record that was written
    pub async fn run_cycle(&mut self) -> Result<MeasurementRecord, CycleError> {
        let address = self.config.device_address;
        info!("Connecting to Wave Plus {}", address);
        let connection = self.transport.connect(address).await?;

        let outcome = self.read_and_store(&connection).await;

        match (self.transport.disconnect(connection).await, outcome) {
            (Ok(()), outcome) => {
                debug!("Released connection to {}", address);
                outcome
            }
            (Err(e), Ok(_)) => Err(e.into()),
            (Err(e), Err(cycle_error)) => {
                warn!("Failed to disconnect from {}: {}", address, e);
                Err(cycle_error)
            }
        }
    }

    /// Cycle body, separated so `run_cycle` can always disconnect.
    async fn read_and_store(
        &mut self,
        connection: &T::Connection,
    ) -> Result<MeasurementRecord, CycleError> {
        let frame = self.acquire_frame(connection).await?;
        debug!("Acquired {} byte frame", frame.as_bytes().len());
        let reading = decode(frame)?;
        let captured_at = OffsetDateTime::now_utc();

        log_summary(&reading, &captured_at);

        let record = MeasurementRecord::new(&reading, &self.config.location, captured_at);
        store_measurement(
            &mut self.sink,
            &self.config.database,
            &record,
            self.config.write_timestamp,
        )
        .await?;

        info!("Successfully stored measurement for {}", self.config.location);
        Ok(record)
    }
}

/// Per-sensor lines for the cycle log, plus temperature as written (degF)
fn summary_lines(reading: &Reading) -> Vec<String> {
    let mut lines: Vec<String> = Sensor::ALL
        .iter()
        .map(|sensor| {
            format!(
                "{}: {} {}",
                sensor.label(),
                sensor.display_value(reading),
                sensor.unit()
            )
        })
        .collect();
    lines.push(format!(
        "Temperature: {:.2} degF",
        celsius_to_fahrenheit(reading.temperature_celsius())
    ));
    lines
}

fn log_summary(reading: &Reading, captured_at: &OffsetDateTime) {
    info!(
        "Reading at {} (format version {}):",
        format_datetime(captured_at),
        reading.format_version()
    );
    for line in summary_lines(reading) {
        info!("  {}", line);
    }
}
