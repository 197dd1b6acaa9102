//! Shapes of the objects exchanged with the configuration API.

mod compat;
mod objects;

pub use objects::*;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::{Debug, Display};

use crate::error::ApiError;

/// A CDN service. The tool never modifies services, only their versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    #[serde(deserialize_with = "compat::nullable_string")]
    pub id: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub name: String,
    /// Number of the active version. Some listings leave this unset.
    #[serde(deserialize_with = "compat::number")]
    pub version: u32,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub comment: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub customer_id: String,
    pub versions: Vec<Version>,
}

impl Service {
    /// The number of the version currently serving traffic.
    ///
    /// Depending on how the service was fetched, the number is either given
    /// directly or has to be recovered from the embedded version list.
    pub fn active_version(&self) -> Result<u32, ApiError> {
        if self.version != 0 {
            return Ok(self.version);
        }
        self.versions
            .iter()
            .find(|v| v.active)
            .map(|v| v.number)
            .ok_or_else(|| ApiError::NoActiveVersion(self.name.clone()))
    }
}

/// A numbered configuration snapshot of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Version {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(deserialize_with = "compat::number")]
    pub number: u32,
    #[serde(deserialize_with = "compat::flag")]
    pub active: bool,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub comment: String,
    #[serde(deserialize_with = "compat::flag")]
    pub deployed: bool,
    #[serde(deserialize_with = "compat::flag")]
    pub locked: bool,
    #[serde(deserialize_with = "compat::flag")]
    pub staging: bool,
    #[serde(deserialize_with = "compat::flag")]
    pub testing: bool,
    /// Server-populated; the API rejects it when echoed back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Server-populated; the API rejects it when echoed back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffFormat {
    Text,
}

impl DiffFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffFormat::Text => "text",
        }
    }
}

/// A rendered difference between two versions of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diff {
    #[serde(deserialize_with = "compat::number")]
    pub from: u32,
    #[serde(deserialize_with = "compat::number")]
    pub to: u32,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub format: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub diff: String,
}

/// Result of asking the API whether a version is internally consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Validation {
    #[serde(deserialize_with = "compat::nullable_string")]
    pub status: String,
    /// Whatever is in `warnings` or `errors`, flattened.
    #[serde(deserialize_with = "compat::nullable_string")]
    pub msg: String,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Service-wide settings of a version. Unlike the other categories this is a
/// single object rather than a named list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub version: Option<u32>,
    #[serde(
        rename = "general.default_ttl",
        alias = "default_ttl",
        skip_serializing_if = "compat::is_zero",
        deserialize_with = "compat::number"
    )]
    pub default_ttl: u32,
    #[serde(
        rename = "general.default_host",
        alias = "default_host",
        deserialize_with = "compat::nullable_string"
    )]
    pub default_host: String,
}

impl Settings {
    pub fn clear_server_fields(&mut self) {
        self.service_id = None;
        self.version = None;
    }
}

/// A key/value entry of an edge dictionary. Items are not versioned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryItem {
    #[serde(skip_serializing)]
    pub service_id: Option<String>,
    #[serde(skip_serializing)]
    pub dictionary_id: Option<String>,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub item_key: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub item_value: String,
}

/// An IP entry of an edge ACL. Entries are not versioned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AclEntry {
    #[serde(skip_serializing)]
    pub service_id: Option<String>,
    #[serde(skip_serializing)]
    pub acl_id: Option<String>,
    #[serde(skip_serializing)]
    pub id: Option<String>,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub ip: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::option_number"
    )]
    pub subnet: Option<u32>,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub comment: String,
    #[serde(deserialize_with = "compat::flag")]
    pub negated: bool,
}

/// Attaches a backend to a director within one version. The API has no way
/// to list these, only to fetch a single mapping by both names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorBackend {
    #[serde(skip_serializing)]
    pub service_id: Option<String>,
    #[serde(skip_serializing, deserialize_with = "compat::option_number")]
    pub version: Option<u32>,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub director: String,
    #[serde(deserialize_with = "compat::nullable_string")]
    pub backend: String,
}

/// The categories of versioned, named configuration objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectKind {
    Acl,
    Backend,
    CacheSetting,
    Condition,
    Dictionary,
    Director,
    Domain,
    Ftp,
    Gcs,
    Gzip,
    Header,
    HealthCheck,
    Papertrail,
    RequestSetting,
    ResponseObject,
    S3,
    Sumologic,
    Syslog,
    Vcl,
}

impl ObjectKind {
    /// Path segments below `/service/<id>/version/<n>/`.
    pub fn path_segments(&self) -> &'static [&'static str] {
        match self {
            ObjectKind::Acl => &["acl"],
            ObjectKind::Backend => &["backend"],
            ObjectKind::CacheSetting => &["cache_settings"],
            ObjectKind::Condition => &["condition"],
            ObjectKind::Dictionary => &["dictionary"],
            ObjectKind::Director => &["director"],
            ObjectKind::Domain => &["domain"],
            ObjectKind::Ftp => &["logging", "ftp"],
            ObjectKind::Gcs => &["logging", "gcs"],
            ObjectKind::Gzip => &["gzip"],
            ObjectKind::Header => &["header"],
            ObjectKind::HealthCheck => &["healthcheck"],
            ObjectKind::Papertrail => &["logging", "papertrail"],
            ObjectKind::RequestSetting => &["request_settings"],
            ObjectKind::ResponseObject => &["response_object"],
            ObjectKind::S3 => &["logging", "s3"],
            ObjectKind::Sumologic => &["logging", "sumologic"],
            ObjectKind::Syslog => &["logging", "syslog"],
            ObjectKind::Vcl => &["vcl"],
        }
    }

    /// Human readable singular name, used in log messages.
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Acl => "acl",
            ObjectKind::Backend => "backend",
            ObjectKind::CacheSetting => "cache setting",
            ObjectKind::Condition => "condition",
            ObjectKind::Dictionary => "dictionary",
            ObjectKind::Director => "director",
            ObjectKind::Domain => "domain",
            ObjectKind::Ftp => "ftp",
            ObjectKind::Gcs => "gcs",
            ObjectKind::Gzip => "gzip",
            ObjectKind::Header => "header",
            ObjectKind::HealthCheck => "health check",
            ObjectKind::Papertrail => "papertrail",
            ObjectKind::RequestSetting => "request setting",
            ObjectKind::ResponseObject => "response object",
            ObjectKind::S3 => "s3",
            ObjectKind::Sumologic => "sumologic",
            ObjectKind::Syslog => "syslog",
            ObjectKind::Vcl => "vcl",
        }
    }

    /// Human readable plural name, used in progress and error messages.
    pub fn plural(&self) -> &'static str {
        match self {
            ObjectKind::Acl => "ACLs",
            ObjectKind::Backend => "backends",
            ObjectKind::CacheSetting => "cache settings",
            ObjectKind::Condition => "conditions",
            ObjectKind::Dictionary => "dictionaries",
            ObjectKind::Director => "directors",
            ObjectKind::Domain => "domains",
            ObjectKind::Ftp => "FTP endpoints",
            ObjectKind::Gcs => "GCS endpoints",
            ObjectKind::Gzip => "gzips",
            ObjectKind::Header => "headers",
            ObjectKind::HealthCheck => "health checks",
            ObjectKind::Papertrail => "papertrail endpoints",
            ObjectKind::RequestSetting => "request settings",
            ObjectKind::ResponseObject => "response objects",
            ObjectKind::S3 => "S3s",
            ObjectKind::Sumologic => "sumologic endpoints",
            ObjectKind::Syslog => "syslogs",
            ObjectKind::Vcl => "VCLs",
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A versioned configuration object, identified by name within its category.
pub trait ConfigObject:
    Debug + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: ObjectKind;

    fn name(&self) -> &str;

    /// Reset the fields the server fills in (service id, version number and
    /// similar), so that a listed object can be compared with a desired one.
    fn clear_server_fields(&mut self);
}
