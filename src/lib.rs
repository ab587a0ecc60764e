#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! ipgeo - where is my public IP?
//!
//! ipgeo asks a public geolocation provider (`https://ifconfig.co/json`) about
//! the caller's public IP address and prints the IP, country, region and
//! city. It can be used as both a command-line application and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | CLI binary | `display` + `clap`, `tracing-subscriber` |
//!
//! ```toml
//! # Library only
//! ipgeo = { version = "0.1", default-features = false }
//! ```
//!
//! # Architecture
//!
//! - **[`lens`]**: the lookup itself and its output formats
//!   - `ipinfo`: provider request, response decoding, rendering
//!   - `utils`: [`OutputFormat`]
//! - **[`config`]**: Configuration management
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ipgeo::{IpInfoFetcher, OutputFormat};
//!
//! let fetcher = IpInfoFetcher::new();
//! match fetcher.lookup(OutputFormat::Summary) {
//!     Ok(line) => println!("{}", line),
//!     Err(e) => println!("{}", e),
//! }
//! ```

pub mod config;
pub mod lens;

pub use config::IpgeoConfig;

pub use lens::ipinfo::{FetchOrParseError, GeoInfo, IpInfoFetcher, PROVIDER_ENDPOINT};
pub use lens::utils::OutputFormat;
