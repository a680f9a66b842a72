//! WSDL reading: fetch a document from a URL or a local path and parse it.

mod parser;
mod xml;

use std::{fs, path::Path, time::Duration};

use thiserror::Error;
use tracing::{debug, instrument};

use loopgen_core::{
    application::{ApplicationError, ports::WsdlReader},
    domain::WsdlDefinition,
    error::LoopgenResult,
};

pub use parser::parse_wsdl;

/// Default network timeout for remote WSDL documents.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure while turning WSDL text into a definition.
#[derive(Debug, Error)]
pub enum WsdlReadError {
    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("document is empty")]
    Empty,

    #[error("root element is <{root}>, expected <wsdl:definitions>")]
    NotWsdl { root: String },

    #[error("<{element}> is missing the '{attribute}' attribute")]
    MissingAttribute { element: String, attribute: String },

    #[error("invalid {attribute} value '{value}'")]
    InvalidValue { attribute: String, value: String },

    #[error("namespace prefix '{prefix}' in '{value}' is not declared")]
    UnboundPrefix { prefix: String, value: String },
}

/// [`WsdlReader`] for `http(s)://` URLs and filesystem paths.
pub struct XmlWsdlReader {
    timeout: Duration,
}

impl XmlWsdlReader {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn fetch(&self, location: &str) -> LoopgenResult<String> {
        if is_remote(location) {
            self.fetch_remote(location)
        } else {
            let path = location.strip_prefix("file://").unwrap_or(location);
            fs::read_to_string(Path::new(path)).map_err(|e| {
                ApplicationError::WsdlFetch {
                    location: location.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
        }
    }

    fn fetch_remote(&self, location: &str) -> LoopgenResult<String> {
        let fetch_error = |reason: String| ApplicationError::WsdlFetch {
            location: location.to_string(),
            reason,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("loopgen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| fetch_error(e.to_string()))?;

        let response = client
            .get(location)
            .send()
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("server answered {status}")).into());
        }

        response.text().map_err(|e| fetch_error(e.to_string()).into())
    }
}

impl Default for XmlWsdlReader {
    fn default() -> Self {
        Self::new()
    }
}

impl WsdlReader for XmlWsdlReader {
    #[instrument(skip(self))]
    fn read(&self, location: &str) -> LoopgenResult<WsdlDefinition> {
        let text = self.fetch(location)?;
        debug!(bytes = text.len(), "fetched WSDL document");

        parse_wsdl(&text).map_err(|e| {
            ApplicationError::WsdlParse {
                location: location.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
