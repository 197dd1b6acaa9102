//! The versioned object categories.
//!
//! Every type here doubles as the desired-state representation loaded from
//! config files, so all fields default. Fields skipped while zero or empty are
//! filled in by the server when omitted; `cdnsync_core::normalize` applies the
//! same defaults to desired objects so that they compare equal to what the
//! API reports.

use serde::{Deserialize, Serialize};

use super::{compat, ConfigObject, ObjectKind};

macro_rules! config_object {
    ($ty:ident, $kind:expr $(, $extra:ident)*) => {
        impl ConfigObject for $ty {
            const KIND: ObjectKind = $kind;

            fn name(&self) -> &str {
                &self.name
            }

            fn clear_server_fields(&mut self) {
                self.service_id = None;
                self.version = None;
                $(self.$extra = None;)*
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderType {
    Request,
    Fetch,
    Cache,
    Response,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderAction {
    Set,
    Append,
    Delete,
    Regex,
    RegexRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheSettingAction {
    Cache,
    Pass,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionType {
    #[serde(alias = "request")]
    Request,
    #[serde(alias = "response")]
    Response,
    #[serde(alias = "cache")]
    Cache,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Classic,
    Loggly,
    Logplex,
    Blank,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Domain {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub comment: String,
}
config_object!(Domain, ObjectKind::Domain);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Backend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub port: u32,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub connect_timeout: u32,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub max_conn: u32,
    #[serde(deserialize_with = "compat::number")]
    pub error_threshold: u32,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub first_byte_timeout: u32,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub between_bytes_timeout: u32,
    #[serde(deserialize_with = "compat::flag")]
    pub auto_loadbalance: bool,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub weight: u32,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub request_condition: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub healthcheck: String,
    #[serde(deserialize_with = "compat::flag")]
    pub use_ssl: bool,
    #[serde(deserialize_with = "compat::flag")]
    pub ssl_check_cert: bool,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub ssl_cert_hostname: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub ssl_sni_hostname: String,

    // The API keeps these four in sync with each other.
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub address: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub hostname: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub ipv4: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub ipv6: String,

    // The API refuses to set these to ''.
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub ssl_hostname: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub ssl_ciphers: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub min_tls_version: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub max_tls_version: String,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub shield: String,
}
config_object!(Backend, ObjectKind::Backend);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub statement: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<ConditionType>,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub comment: String,
    // Listed as a quoted string, created as a number.
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub priority: u32,
}
config_object!(Condition, ObjectKind::Condition);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<CacheSettingAction>,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub cache_condition: String,
    #[serde(deserialize_with = "compat::number")]
    pub stale_ttl: u32,
    #[serde(deserialize_with = "compat::number")]
    pub ttl: u32,
}
config_object!(CacheSetting, ObjectKind::CacheSetting);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<HeaderAction>,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub cache_condition: String,
    #[serde(deserialize_with = "compat::flag")]
    pub ignore_if_set: bool,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub priority: u32,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub regex: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub request_condition: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub response_condition: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub src: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub dst: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub substitution: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<HeaderType>,
}
config_object!(Header, ObjectKind::Header);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheck {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub check_interval: u32,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub initial: u32,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub threshold: u32,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub timeout: u32,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub window: u32,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub comment: String,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub expected_response: u32,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub host: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub http_version: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub method: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub path: String,
}
config_object!(HealthCheck, ObjectKind::HealthCheck);

// content_types is filled in by the API when left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gzip {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub cache_condition: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub content_types: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub extensions: String,
}
config_object!(Gzip, ObjectKind::Gzip);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub bucket_name: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub domain: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub access_key: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub secret_key: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub path: String,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub period: u32,
    #[serde(deserialize_with = "compat::number")]
    pub gzip_level: u32,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub format: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub response_condition: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub timestamp_format: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub redundancy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageType>,
}
config_object!(S3, ObjectKind::S3);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Syslog {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub address: String,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub port: u32,
    #[serde(deserialize_with = "compat::flag")]
    pub use_tls: bool,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub tls_ca_cert: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub tls_hostname: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub token: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub format: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub response_condition: String,
}
config_object!(Syslog, ObjectKind::Syslog);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(skip_serializing_if = "compat::is_false", deserialize_with = "compat::flag")]
    pub bypass_busy_wait: bool,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub default_host: String,
    #[serde(skip_serializing_if = "compat::is_false", deserialize_with = "compat::flag")]
    pub force_miss: bool,
    #[serde(skip_serializing_if = "compat::is_false", deserialize_with = "compat::flag")]
    pub force_ssl: bool,
    #[serde(skip_serializing_if = "compat::is_false", deserialize_with = "compat::flag")]
    pub geo_headers: bool,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub hash_keys: String,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub max_stale_age: u32,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub request_condition: String,
    #[serde(skip_serializing_if = "compat::is_false", deserialize_with = "compat::flag")]
    pub timer_support: bool,
    /// One of the API's fixed `X-Forwarded-For` modes.
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub xff: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub action: String,
}
config_object!(RequestSetting, ObjectKind::RequestSetting);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub cache_condition: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub content: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub content_type: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub status: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub response: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub request_condition: String,
}
config_object!(ResponseObject, ObjectKind::ResponseObject);

/// An edge dictionary container. Its items live outside of versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dictionary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
}
config_object!(Dictionary, ObjectKind::Dictionary, id);

/// An edge ACL container. Its entries live outside of versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Acl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
}
config_object!(Acl, ObjectKind::Acl, id);

/// A custom VCL file. `main` marks the one the service boots from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vcl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub content: String,
    #[serde(skip_serializing_if = "compat::is_false", deserialize_with = "compat::flag")]
    pub main: bool,
}
config_object!(Vcl, ObjectKind::Vcl);

/// Balances requests over the backends attached to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Director {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub comment: String,
    /// 1 random, 3 hash, 4 client.
    #[serde(
        rename = "type",
        skip_serializing_if = "compat::is_zero",
        deserialize_with = "compat::number"
    )]
    pub type_: u32,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub quorum: u32,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub retries: u32,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub capacity: u32,
}
config_object!(Director, ObjectKind::Director);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Papertrail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub address: String,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub port: u32,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub format: String,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub format_version: u32,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub response_condition: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub placement: String,
}
config_object!(Papertrail, ObjectKind::Papertrail);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sumologic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub url: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub format: String,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub format_version: u32,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub response_condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageType>,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub placement: String,
}
config_object!(Sumologic, ObjectKind::Sumologic);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ftp {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub address: String,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub port: u32,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub username: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub password: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub public_key: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub path: String,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub period: u32,
    #[serde(deserialize_with = "compat::number")]
    pub gzip_level: u32,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub format: String,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub format_version: u32,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub response_condition: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub timestamp_format: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub placement: String,
}
config_object!(Ftp, ObjectKind::Ftp);

/// Google Cloud Storage logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gcs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,

    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub bucket_name: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub user: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub secret_key: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub path: String,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub period: u32,
    #[serde(deserialize_with = "compat::number")]
    pub gzip_level: u32,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub format: String,
    #[serde(skip_serializing_if = "compat::is_zero", deserialize_with = "compat::number")]
    pub format_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageType>,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub response_condition: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub timestamp_format: String,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "compat::nullable_string"
    )]
    pub placement: String,
}
config_object!(Gcs, ObjectKind::Gcs);
