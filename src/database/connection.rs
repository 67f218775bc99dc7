use log::error;
use reqwest::{Client, RequestBuilder};
use tokio::time::Duration;
use url::Url;

use crate::config::WavePlusConfig;
use crate::error::PersistenceError;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP handle on an InfluxDB 1.x server
#[derive(Debug, Clone)]
pub struct InfluxClient {
    pub(crate) http: Client,
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
    millisecond_precision: bool,
}

impl InfluxClient {
    pub fn new(config: &WavePlusConfig) -> Result<Self, PersistenceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                error!("HTTP client build error: {}", e);
                e
            })?;

        Ok(InfluxClient {
            http,
            base_url: config.influxdb_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            millisecond_precision: config.write_timestamp,
        })
    }

    /// `/write` endpoint for `database`; credentials never go into the url
    pub fn write_url(&self, database: &str) -> Result<Url, PersistenceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push("write");

        {
            let mut query = url.query_pairs_mut();
            query.clear().append_pair("db", database);
            if self.millisecond_precision {
                query.append_pair("precision", "ms");
            }
        }

        Ok(url)
    }

    /// Attach Basic credentials when a user is configured
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(user) => request.basic_auth(user, self.password.as_deref()),
            None => request,
        }
    }
}
