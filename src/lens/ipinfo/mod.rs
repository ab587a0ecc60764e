//! Public IP geolocation lens
//!
//! This module asks a public geolocation provider where the caller's public
//! IP address is located, and renders the answer for display.
//!
//! # Example
//!
//! ```rust,ignore
//! use ipgeo::lens::ipinfo::IpInfoFetcher;
//!
//! let fetcher = IpInfoFetcher::new();
//! let info = fetcher.fetch()?;
//!
//! println!("{}", info);
//! ```

mod error;

pub use error::FetchOrParseError;

use crate::lens::utils::OutputFormat;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};

// =============================================================================
// Types
// =============================================================================

/// Deserialize a string field, mapping JSON `null` to an empty string
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a coordinate given as a number or a numeric string.
/// Anything else (null, garbage, objects) is treated as unknown.
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

/// Geolocation of a public IP address as reported by the provider
///
/// Any field missing from the provider response, or sent as `null`, is left
/// empty. Coordinates the provider sends in an unexpected shape are dropped
/// rather than failing the decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoInfo {
    /// The public IP address
    #[serde(deserialize_with = "null_as_empty")]
    pub ip: String,
    /// Country name
    #[serde(deserialize_with = "null_as_empty")]
    pub country: String,
    /// Region (state, province) name
    #[serde(
        rename(deserialize = "region_name"),
        deserialize_with = "null_as_empty"
    )]
    pub region: String,
    /// City name
    #[serde(deserialize_with = "null_as_empty")]
    pub city: String,
    /// Latitude, when the provider knows it
    #[serde(deserialize_with = "lenient_coordinate")]
    pub latitude: Option<f64>,
    /// Longitude, when the provider knows it
    #[serde(deserialize_with = "lenient_coordinate")]
    pub longitude: Option<f64>,
}

impl GeoInfo {
    /// Decode a provider response body
    pub fn from_json(body: &str) -> Result<Self, FetchOrParseError> {
        Ok(serde_json::from_str(body)?)
    }

    /// One-line summary of the four location fields
    pub fn summary(&self) -> String {
        self.to_string()
    }

    fn details(&self) -> String {
        let coordinate = |c: Option<f64>| c.map(|v| v.to_string()).unwrap_or_default();
        let rule = "-".repeat(40);
        let rows = [
            ("Public IP", self.ip.clone()),
            ("Country", self.country.clone()),
            ("Region Name", self.region.clone()),
            ("City", self.city.clone()),
            ("Latitude", coordinate(self.latitude)),
            ("Longitude", coordinate(self.longitude)),
        ];

        let mut lines = vec![
            rule.clone(),
            "🧐 Datos obtenidos de tu IP Publica:".to_string(),
            rule,
        ];
        lines.extend(rows.iter().map(|(k, v)| format!("➭ {}: {}", k, v)));
        lines.join("\n")
    }

    #[cfg(feature = "display")]
    fn table(&self) -> String {
        use tabled::settings::Style;
        use tabled::{Table, Tabled};

        #[derive(Tabled)]
        struct GeoField {
            field: &'static str,
            value: String,
        }

        let coordinate = |c: Option<f64>| c.map(|v| v.to_string()).unwrap_or_default();
        let rows = vec![
            GeoField {
                field: "ip",
                value: self.ip.clone(),
            },
            GeoField {
                field: "country",
                value: self.country.clone(),
            },
            GeoField {
                field: "region",
                value: self.region.clone(),
            },
            GeoField {
                field: "city",
                value: self.city.clone(),
            },
            GeoField {
                field: "latitude",
                value: coordinate(self.latitude),
            },
            GeoField {
                field: "longitude",
                value: coordinate(self.longitude),
            },
        ];

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        table.to_string()
    }

    // Without `tabled`, tables degrade to pretty JSON.
    #[cfg(not(feature = "display"))]
    fn table(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl fmt::Display for GeoInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IP: {} - Pais: {} - Region: {} - Ciudad {}",
            self.ip, self.country, self.region, self.city
        )
    }
}

// =============================================================================
// Lens
// =============================================================================

/// Geolocation provider queried for the caller's public IP
pub const PROVIDER_ENDPOINT: &str = "https://ifconfig.co/json";

/// Public IP geolocation lookup
///
/// Performs one blocking GET against the provider per call. Nothing is
/// retried or cached.
pub struct IpInfoFetcher {
    agent: ureq::Agent,
    endpoint: String,
}

impl IpInfoFetcher {
    /// Create a fetcher bound to [`PROVIDER_ENDPOINT`]
    pub fn new() -> Self {
        Self::with_endpoint(PROVIDER_ENDPOINT)
    }

    /// Create a fetcher that queries `endpoint` instead of the provider
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            endpoint: endpoint.into(),
        }
    }

    /// The URL this fetcher queries
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch and decode the geolocation of the caller's public IP
    pub fn fetch(&self) -> Result<GeoInfo, FetchOrParseError> {
        debug!("Requesting geolocation from {}", self.endpoint);

        let body = self.get_body().map_err(|source| {
            warn!("Geolocation request failed: {}", source);
            FetchOrParseError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            }
        })?;

        let geo = GeoInfo::from_json(&body).inspect_err(|e| {
            warn!("Geolocation response is not valid JSON: {}", e);
        })?;
        info!("Resolved public IP {}", geo.ip);
        Ok(geo)
    }

    /// Fetch the geolocation and render it in `format`
    pub fn lookup(&self, format: OutputFormat) -> Result<String, FetchOrParseError> {
        let geo = self.fetch()?;
        Ok(self.format_result(&geo, format))
    }

    /// Format geolocation info for display
    ///
    /// [`OutputFormat::Table`] falls back to pretty-printed JSON when the
    /// `display` feature is disabled.
    pub fn format_result(&self, geo: &GeoInfo, format: OutputFormat) -> String {
        match format {
            OutputFormat::Summary => geo.summary(),
            OutputFormat::Details => geo.details(),
            OutputFormat::Table => geo.table(),
            OutputFormat::Json => serde_json::to_string(geo).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(geo).unwrap_or_default(),
        }
    }

    fn get_body(&self) -> Result<String, ureq::Error> {
        let mut response = self
            .agent
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .call()?;
        debug!("Provider answered with status {}", response.status());
        response.body_mut().read_to_string()
    }
}

impl Default for IpInfoFetcher {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    const FULL_BODY: &str = r#"{"ip":"1.2.3.4","country":"US","region_name":"California","city":"Mountain View"}"#;

    /// Serve each `(status, body)` pair to one incoming connection, in order.
    fn serve(responses: Vec<(&'static str, &'static str)>) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                drain_request(&mut stream);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
        });
        (format!("http://{}/json", addr), handle)
    }

    fn drain_request(stream: &mut TcpStream) {
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
    }

    #[test]
    fn test_summary_all_fields() {
        let geo = GeoInfo::from_json(FULL_BODY).unwrap();
        assert_eq!(
            geo.summary(),
            "IP: 1.2.3.4 - Pais: US - Region: California - Ciudad Mountain View"
        );
    }

    #[test]
    fn test_summary_missing_fields() {
        let geo = GeoInfo::from_json(r#"{"ip":"1.2.3.4"}"#).unwrap();
        assert_eq!(geo.summary(), "IP: 1.2.3.4 - Pais:  - Region:  - Ciudad ");
        assert_eq!(geo.latitude, None);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let body = r#"{"ip":"9.9.9.9","country":"CH","country_iso":"CH","asn":"AS19281","latitude":47.3,"longitude":8.5,"city":"Zurich"}"#;
        let geo = GeoInfo::from_json(body).unwrap();
        assert_eq!(geo.ip, "9.9.9.9");
        assert_eq!(geo.city, "Zurich");
        assert_eq!(geo.region, "");
        assert_eq!(geo.latitude, Some(47.3));
        assert_eq!(geo.longitude, Some(8.5));
    }

    #[test]
    fn test_null_fields_render_empty() {
        let body = r#"{"ip":"1.2.3.4","country":"US","region_name":null,"city":null}"#;
        let geo = GeoInfo::from_json(body).unwrap();
        assert_eq!(geo.summary(), "IP: 1.2.3.4 - Pais: US - Region:  - Ciudad ");
    }

    #[test]
    fn test_coordinates_tolerate_odd_shapes() {
        let body = r#"{"ip":"1.2.3.4","city":"X","latitude":"37.4","longitude":" -122.08 "}"#;
        let geo = GeoInfo::from_json(body).unwrap();
        assert_eq!(geo.latitude, Some(37.4));
        assert_eq!(geo.longitude, Some(-122.08));

        let body = r#"{"ip":"1.2.3.4","city":"X","latitude":"north","longitude":null}"#;
        let geo = GeoInfo::from_json(body).unwrap();
        assert_eq!(geo.latitude, None);
        assert_eq!(geo.longitude, None);
        assert_eq!(geo.summary(), "IP: 1.2.3.4 - Pais:  - Region:  - Ciudad X");

        let body = r#"{"ip":"1.2.3.4","latitude":{"deg":37},"longitude":[1,2]}"#;
        let geo = GeoInfo::from_json(body).unwrap();
        assert_eq!(geo.latitude, None);
        assert_eq!(geo.longitude, None);
    }

    #[test]
    fn test_non_json_body_rejected() {
        let err = GeoInfo::from_json("<html>not found</html>").unwrap_err();
        assert!(matches!(err, FetchOrParseError::Decode(_)));
    }

    #[test]
    fn test_format_details() {
        let fetcher = IpInfoFetcher::new();
        let mut geo = GeoInfo::from_json(FULL_BODY).unwrap();

        let output = fetcher.format_result(&geo, OutputFormat::Details);
        assert!(output.contains("➭ Public IP: 1.2.3.4"));
        assert!(output.contains("➭ Region Name: California"));
        assert!(output.ends_with("➭ Longitude: "));

        geo.latitude = Some(37.4);
        geo.longitude = Some(-122.08);
        let output = fetcher.format_result(&geo, OutputFormat::Details);
        assert!(output.contains("➭ Latitude: 37.4"));
        assert!(output.ends_with("➭ Longitude: -122.08"));
    }

    #[test]
    fn test_format_json() {
        let fetcher = IpInfoFetcher::new();
        let geo = GeoInfo::from_json(FULL_BODY).unwrap();

        let output = fetcher.format_result(&geo, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["ip"], "1.2.3.4");
        assert_eq!(value["region"], "California");
        assert!(value["latitude"].is_null());
        assert!(!output.contains('\n'));

        let pretty = fetcher.format_result(&geo, OutputFormat::JsonPretty);
        assert!(pretty.contains('\n'));
    }

    #[cfg(feature = "display")]
    #[test]
    fn test_format_table() {
        let fetcher = IpInfoFetcher::new();
        let geo = GeoInfo::from_json(FULL_BODY).unwrap();

        let output = fetcher.format_result(&geo, OutputFormat::Table);
        assert!(output.contains("Mountain View"));
        assert!(output.contains("country"));
        assert!(serde_json::from_str::<serde_json::Value>(&output).is_err());
    }

    #[cfg(not(feature = "display"))]
    #[test]
    fn test_format_table_without_display() {
        let fetcher = IpInfoFetcher::new();
        let geo = GeoInfo::from_json(FULL_BODY).unwrap();

        let output = fetcher.format_result(&geo, OutputFormat::Table);
        assert_eq!(
            output,
            fetcher.format_result(&geo, OutputFormat::JsonPretty)
        );
    }

    #[test]
    fn test_fetch_from_fixture() {
        let (endpoint, server) = serve(vec![("200 OK", FULL_BODY)]);
        let fetcher = IpInfoFetcher::with_endpoint(endpoint);

        let output = fetcher.lookup(OutputFormat::Summary).unwrap();
        assert_eq!(
            output,
            "IP: 1.2.3.4 - Pais: US - Region: California - Ciudad Mountain View"
        );
        server.join().unwrap();
    }

    #[test]
    fn test_fetch_is_repeatable() {
        let (endpoint, server) = serve(vec![("200 OK", FULL_BODY), ("200 OK", FULL_BODY)]);
        let fetcher = IpInfoFetcher::with_endpoint(endpoint);

        let first = fetcher.lookup(OutputFormat::Summary).unwrap();
        let second = fetcher.lookup(OutputFormat::Summary).unwrap();
        assert_eq!(first, second);
        server.join().unwrap();
    }

    #[test]
    fn test_fetch_malformed_body() {
        let (endpoint, server) = serve(vec![("200 OK", "definitely not json")]);
        let fetcher = IpInfoFetcher::with_endpoint(endpoint);

        let err = fetcher.lookup(OutputFormat::Summary).unwrap_err();
        assert!(matches!(err, FetchOrParseError::Decode(_)));
        assert!(!err.to_string().contains("IP:"));
        server.join().unwrap();
    }

    #[test]
    fn test_fetch_error_status() {
        let (endpoint, server) = serve(vec![("503 Service Unavailable", "{}")]);
        let fetcher = IpInfoFetcher::with_endpoint(endpoint);

        let err = fetcher.fetch().unwrap_err();
        assert!(matches!(err, FetchOrParseError::Transport { .. }));
        server.join().unwrap();
    }

    #[test]
    fn test_fetch_unreachable() {
        // Bind then release a port so nothing is listening on it.
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let fetcher = IpInfoFetcher::with_endpoint(format!("http://{}/json", addr));

        let err = fetcher.lookup(OutputFormat::Summary).unwrap_err();
        assert!(matches!(err, FetchOrParseError::Transport { .. }));
        let message = err.to_string();
        assert!(message.contains(fetcher.endpoint()));
        assert!(!message.contains("Pais:"));
    }

    #[test]
    fn test_default_endpoint() {
        assert_eq!(IpInfoFetcher::default().endpoint(), PROVIDER_ENDPOINT);
    }
}
