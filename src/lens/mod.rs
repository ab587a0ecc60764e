//! Lens module
//!
//! This module provides high-level "lens" abstractions that combine a lookup
//! with output formatting. Lenses are designed to be reusable across different
//! interfaces (CLI, library callers).
//!
//! # Architecture
//!
//! Each lens module exports:
//! - A **Lens struct** (e.g., `IpInfoFetcher`) - the main entry point for all operations
//! - **Output types** - return types and errors
//!
//! Internal implementation details (HTTP calls, rendering helpers) are kept
//! private within each lens module.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ipgeo::lens::ipinfo::{GeoInfo, IpInfoFetcher};
//! use ipgeo::lens::utils::OutputFormat;
//! ```

// =============================================================================
// Utility module
// =============================================================================
pub mod utils;

// =============================================================================
// Lenses
// =============================================================================

// IpInfoFetcher - public IP geolocation lookup
pub mod ipinfo;
