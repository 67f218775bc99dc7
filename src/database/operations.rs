/// Database operations for storing Wave Plus measurements
use async_trait::async_trait;
use log::{debug, info};

use crate::database::connection::InfluxClient;
use crate::database::line_protocol::to_line;
use crate::error::PersistenceError;
use crate::models::MeasurementRecord;

/// Destination for rendered measurement points
#[async_trait]
pub trait MeasurementSink {
    /// Write one line-protocol point to `database`
    async fn write_point(&mut self, database: &str, line: &str) -> Result<(), PersistenceError>;
}

#[async_trait]
impl MeasurementSink for InfluxClient {
    async fn write_point(&mut self, database: &str, line: &str) -> Result<(), PersistenceError> {
        let url = self.write_url(database)?;

        let response = self
            .authorize(self.http.post(url))
            .body(line.to_string())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!("Write accepted with status {}", status);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(PersistenceError::Rejected {
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }
}

/// Store one measurement record
///
/// Renders the record as line protocol and hands it to the sink as a single-point write.
///
/// # Arguments
/// * `sink` - Where the point is written
/// * `database` - Target database name
/// * `record` - Record to store
/// * `with_timestamp` - Append the capture timestamp instead of letting the server stamp the point
///
/// # Returns
/// The rendered line on success
pub async fn store_measurement<S: MeasurementSink + ?Sized>(
    sink: &mut S,
    database: &str,
    record: &MeasurementRecord,
    with_timestamp: bool,
) -> Result<String, PersistenceError> {
    let line = to_line(record, with_timestamp);
    info!("Writing to '{}': {}", database, line);
    sink.write_point(database, &line).await?;
    Ok(line)
}
