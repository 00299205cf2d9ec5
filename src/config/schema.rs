//! Service configuration schema.
//!
//! `ServiceConfig` is the record the `service-conf` binaries load. The loader
//! itself is generic: any `Deserialize + Default` type can take its place.
//!
//! Keys use the service's historical PascalCase spelling (`Proxy`,
//! `AccountURI`, `[DB.Cloud]`, ...). Every field has a zero default so a
//! minimal file such as `Proxy = true` is a complete configuration.
//! Timeouts and expiries are duration strings (`"1s"`, `"250ms"`, `"1h"`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Root configuration for the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Run as a proxy for another region.
    #[serde(rename = "Proxy")]
    pub proxy: bool,

    /// Account service base URI.
    #[serde(rename = "AccountURI")]
    pub account_uri: String,

    /// Passport service base URI.
    #[serde(rename = "PassportURI")]
    pub passport_uri: String,

    /// Log output settings.
    #[serde(rename = "Xlog", skip_serializing_if = "Option::is_none")]
    pub xlog: Option<LogConfig>,

    /// Trace reporting.
    #[serde(rename = "Tracer", skip_serializing_if = "Option::is_none")]
    pub tracer: Option<TracerConfig>,

    /// Database connections.
    #[serde(rename = "DB", skip_serializing_if = "Option::is_none")]
    pub db: Option<DbConfig>,

    /// Memcache pool.
    #[serde(rename = "Memcache", skip_serializing_if = "Option::is_none")]
    pub memcache: Option<MemcacheConfig>,

    /// Outbound HTTP client.
    #[serde(rename = "HTTPClient", skip_serializing_if = "Option::is_none")]
    pub http_client: Option<HttpClientConfig>,

    /// Inbound HTTP server.
    #[serde(rename = "BM", skip_serializing_if = "Option::is_none")]
    pub bm: Option<HttpServerConfig>,

    /// Request dispatch tables.
    #[serde(rename = "Dispatcher", skip_serializing_if = "Option::is_none")]
    pub dispatcher: Option<DispatcherConfig>,
}

/// Log output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LogConfig {
    /// Directory for log files; empty disables file output.
    pub dir: String,
    /// Also write to stdout.
    pub stdout: bool,
    /// Verbosity (0 = info).
    #[serde(rename = "V")]
    pub verbosity: i32,
}

/// Trace reporting configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct TracerConfig {
    /// Reporting network, e.g. `"unixgram"` or `"udp"`.
    pub network: String,
    pub addr: String,
    #[serde(with = "crate::config::duration")]
    pub timeout: Duration,
    pub disable_sample: bool,
}

/// Database connections, one per region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DbConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud: Option<SqlConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_region: Option<SqlConfig>,
}

/// A single SQL connection pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SqlConfig {
    pub addr: String,
    #[serde(rename = "DSN")]
    pub dsn: String,
    /// Maximum open connections.
    pub active: u32,
    /// Maximum idle connections.
    pub idle: u32,
    #[serde(with = "crate::config::duration")]
    pub idle_timeout: Duration,
    #[serde(with = "crate::config::duration")]
    pub query_timeout: Duration,
    #[serde(with = "crate::config::duration")]
    pub exec_timeout: Duration,
    #[serde(with = "crate::config::duration")]
    pub tran_timeout: Duration,
}

/// Memcache pool configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct MemcacheConfig {
    pub name: String,
    pub proto: String,
    pub addr: String,
    pub active: u32,
    pub idle: u32,
    #[serde(with = "crate::config::duration")]
    pub dial_timeout: Duration,
    #[serde(with = "crate::config::duration")]
    pub read_timeout: Duration,
    #[serde(with = "crate::config::duration")]
    pub write_timeout: Duration,
    #[serde(with = "crate::config::duration")]
    pub idle_timeout: Duration,
    /// Item expiry.
    #[serde(with = "crate::config::duration")]
    pub expire: Duration,
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct HttpClientConfig {
    /// App key used to sign requests.
    pub key: String,
    pub secret: String,
    #[serde(with = "crate::config::duration")]
    pub dial: Duration,
    #[serde(with = "crate::config::duration")]
    pub timeout: Duration,
    #[serde(with = "crate::config::duration")]
    pub keep_alive: Duration,
}

/// Inbound HTTP server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct HttpServerConfig {
    pub addr: String,
    #[serde(with = "crate::config::duration")]
    pub timeout: Duration,
}

/// Per-app dispatch tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DispatcherConfig {
    pub name: String,
    /// App key → OAuth endpoint.
    pub oauth: BTreeMap<String, String>,
    /// App key → token renewal endpoint.
    pub renew_token: BTreeMap<String, String>,
    pub region_infos: Vec<RegionInfo>,
}

/// A region served by the dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RegionInfo {
    pub region: String,
    pub app_id: i64,
    pub app_key: String,
}
