use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
};

use cdnsync_api::schema::{
    Acl, Backend, CacheSetting, Condition, ConfigObject, Dictionary, Director, DirectorBackend,
    Domain, Ftp, Gcs, Gzip, Header, HealthCheck, Papertrail, RequestSetting, ResponseObject,
    Settings, Sumologic, Syslog, S3,
};
use serde::Deserialize;

use crate::{
    entry::{present, Entry},
    error::ConfigError,
};

/// Name of the config entry every other service falls back to.
pub const DEFAULT_SERVICE: &str = "_default_";

/// A VCL as written in a config file. Exactly one of `content` and `file`
/// must be set; see [`crate::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VclSource {
    pub name: String,
    pub content: Option<String>,
    /// Relative to the directory of the config file.
    pub file: Option<PathBuf>,
    pub main: bool,
}

/// Desired state of a single service.
///
/// A category that is `None` was not mentioned in the file. After defaults
/// are applied, a category that is still `None` is treated as an empty list,
/// except for `settings`, which are then left alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub settings: Option<Settings>,
    pub domains: Option<Vec<Entry<Domain>>>,
    pub backends: Option<Vec<Entry<Backend>>>,
    pub conditions: Option<Vec<Entry<Condition>>>,
    pub cache_settings: Option<Vec<Entry<CacheSetting>>>,
    pub headers: Option<Vec<Entry<Header>>>,
    pub s3s: Option<Vec<Entry<S3>>>,
    pub syslogs: Option<Vec<Entry<Syslog>>>,
    pub papertrails: Option<Vec<Entry<Papertrail>>>,
    pub sumologics: Option<Vec<Entry<Sumologic>>>,
    pub ftps: Option<Vec<Entry<Ftp>>>,
    pub gcss: Option<Vec<Entry<Gcs>>>,
    pub gzips: Option<Vec<Entry<Gzip>>>,
    pub healthchecks: Option<Vec<Entry<HealthCheck>>>,
    pub dictionaries: Option<Vec<Entry<Dictionary>>>,
    pub acls: Option<Vec<Entry<Acl>>>,
    pub vcls: Option<Vec<Entry<VclSource>>>,
    pub request_settings: Option<Vec<Entry<RequestSetting>>>,
    pub response_objects: Option<Vec<Entry<ResponseObject>>>,
    pub directors: Option<Vec<Entry<Director>>>,
    /// Backends to attach to directors, by name.
    pub director_backends: Option<Vec<DirectorBackend>>,

    /// Overrides `ssl_cert_hostname` of every backend when not empty.
    pub ssl_cert_hostname: Option<String>,
    /// Replaces `_prefix_` in addresses and hostnames.
    pub ip_prefix: Option<String>,
    /// Replaces `_suffix_` in addresses and hostnames.
    pub ip_suffix: Option<String>,
    pub s3_access_key: Option<String>,
    pub s3_secret_key: Option<String>,
}

macro_rules! inherit {
    ($this:ident, $defaults:ident, $($field:ident),+ $(,)?) => {
        $(
            if $this.$field.is_none() {
                $this.$field = $defaults.$field.clone();
            }
        )+
    };
}

impl ServiceConfig {
    /// Fill every field left unspecified with the value from `defaults`.
    ///
    /// A field that was given, even as an empty list, is kept as is.
    pub fn apply_defaults(&mut self, defaults: &ServiceConfig) {
        inherit!(
            self,
            defaults,
            settings,
            domains,
            backends,
            conditions,
            cache_settings,
            headers,
            s3s,
            syslogs,
            papertrails,
            sumologics,
            ftps,
            gcss,
            gzips,
            healthchecks,
            dictionaries,
            acls,
            vcls,
            request_settings,
            response_objects,
            directors,
            director_backends,
            ssl_cert_hostname,
            ip_prefix,
            ip_suffix,
            s3_access_key,
            s3_secret_key,
        );
    }

    /// Check that no category names an object twice, and that every
    /// object has a name.
    pub fn validate(&self, service: &str) -> Result<(), ConfigError> {
        check_names(service, self.domains.as_deref())?;
        check_names(service, self.backends.as_deref())?;
        check_names(service, self.conditions.as_deref())?;
        check_names(service, self.cache_settings.as_deref())?;
        check_names(service, self.headers.as_deref())?;
        check_names(service, self.s3s.as_deref())?;
        check_names(service, self.syslogs.as_deref())?;
        check_names(service, self.papertrails.as_deref())?;
        check_names(service, self.sumologics.as_deref())?;
        check_names(service, self.ftps.as_deref())?;
        check_names(service, self.gcss.as_deref())?;
        check_names(service, self.directors.as_deref())?;
        for mapping in self.director_backends.iter().flatten() {
            if mapping.director.is_empty() || mapping.backend.is_empty() {
                return Err(ConfigError::MissingName {
                    service: service.to_string(),
                    category: "director backend",
                });
            }
        }
        check_names(service, self.gzips.as_deref())?;
        check_names(service, self.healthchecks.as_deref())?;
        check_names(service, self.dictionaries.as_deref())?;
        check_names(service, self.acls.as_deref())?;
        check_names(service, self.request_settings.as_deref())?;
        check_names(service, self.response_objects.as_deref())?;
        check_unique(
            service,
            "VCL",
            self.vcls
                .iter()
                .flat_map(|vcls| present(vcls))
                .map(|v| v.name.as_str()),
        )
    }
}

fn check_names<T: ConfigObject>(
    service: &str,
    entries: Option<&[Entry<T>]>,
) -> Result<(), ConfigError> {
    let Some(entries) = entries else {
        return Ok(());
    };
    check_unique(service, T::KIND.label(), present(entries).map(|o| o.name()))
}

fn check_unique<'a>(
    service: &str,
    category: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if name.is_empty() {
            return Err(ConfigError::MissingName {
                service: service.to_string(),
                category,
            });
        }
        if !seen.insert(name) {
            return Err(ConfigError::DuplicateName {
                service: service.to_string(),
                category,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// The desired state of every service named in a config file, with
/// `_default_` already merged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesiredConfig {
    services: BTreeMap<String, ServiceConfig>,
    /// Directory that relative paths in the config refer to.
    base_dir: PathBuf,
}

impl DesiredConfig {
    /// Merge `_default_` into every other entry and validate the result.
    pub fn new(
        mut raw: BTreeMap<String, ServiceConfig>,
        base_dir: PathBuf,
    ) -> Result<Self, ConfigError> {
        let defaults = raw.remove(DEFAULT_SERVICE).unwrap_or_default();
        defaults.validate(DEFAULT_SERVICE)?;
        for (name, config) in raw.iter_mut() {
            config.apply_defaults(&defaults);
            config.validate(name)?;
        }
        Ok(Self {
            services: raw,
            base_dir,
        })
    }

    /// The config for `service`, if the file names it.
    pub fn service(&self, service: &str) -> Option<&ServiceConfig> {
        self.services.get(service)
    }

    pub fn contains(&self, service: &str) -> bool {
        self.services.contains_key(service)
    }

    pub fn base_dir(&self) -> &std::path::Path {
        &self.base_dir
    }
}
