//! Turn a [`ServiceConfig`] into the objects the reconciler compares.
//!
//! The API fills in some fields by itself: a backend's `address` mirrors its
//! hostname or IP, and numbers left out of a create get a server default.
//! Those rules are repeated here so that an object that was created from the
//! config compares equal to the config on the next run.

use std::{
    net::IpAddr,
    path::{Path, PathBuf},
};

use cdnsync_api::schema::{
    Acl, Backend, CacheSetting, Condition, Dictionary, Director, DirectorBackend, Domain, Ftp,
    Gcs, Gzip, Header, HealthCheck, MessageType, Papertrail, RequestSetting, ResponseObject,
    Settings, Sumologic, Syslog, Vcl, S3,
};

use crate::{
    config::{ServiceConfig, VclSource},
    entry::Entry,
    error::ConfigError,
};

pub const DEFAULT_HEALTHCHECK_HTTP_VERSION: &str = "1.1";
pub const DEFAULT_S3_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000";

pub const DEFAULT_TTL: u32 = 3600;

pub const DEFAULT_BACKEND_PORT: u32 = 80;
pub const DEFAULT_CONNECT_TIMEOUT: u32 = 1000;
pub const DEFAULT_FIRST_BYTE_TIMEOUT: u32 = 15000;
pub const DEFAULT_BETWEEN_BYTES_TIMEOUT: u32 = 10000;
pub const DEFAULT_MAX_CONN: u32 = 200;
pub const DEFAULT_WEIGHT: u32 = 100;

/// Random.
pub const DEFAULT_DIRECTOR_TYPE: u32 = 1;
pub const DEFAULT_DIRECTOR_QUORUM: u32 = 75;
pub const DEFAULT_DIRECTOR_RETRIES: u32 = 5;
pub const DEFAULT_DIRECTOR_CAPACITY: u32 = 100;

pub const DEFAULT_SYSLOG_PORT: u32 = 514;
pub const DEFAULT_PAPERTRAIL_PORT: u32 = 514;
pub const DEFAULT_FTP_PORT: u32 = 21;
pub const DEFAULT_LOG_PERIOD: u32 = 3600;
pub const DEFAULT_LOG_FORMAT_VERSION: u32 = 2;

/// S3 credentials given outside the config file. They take precedence over
/// the `s3_access_key`/`s3_secret_key` config values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct S3Credentials {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

/// The fully resolved desired state of one service, in the shape that is
/// sent to the API. Unspecified categories are empty lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesiredService {
    pub settings: Option<Settings>,
    pub dictionaries: Vec<Entry<Dictionary>>,
    pub acls: Vec<Entry<Acl>>,
    pub conditions: Vec<Entry<Condition>>,
    pub healthchecks: Vec<Entry<HealthCheck>>,
    pub cache_settings: Vec<Entry<CacheSetting>>,
    pub response_objects: Vec<Entry<ResponseObject>>,
    pub request_settings: Vec<Entry<RequestSetting>>,
    pub backends: Vec<Entry<Backend>>,
    pub headers: Vec<Entry<Header>>,
    pub syslogs: Vec<Entry<Syslog>>,
    pub s3s: Vec<Entry<S3>>,
    pub domains: Vec<Entry<Domain>>,
    pub papertrails: Vec<Entry<Papertrail>>,
    pub sumologics: Vec<Entry<Sumologic>>,
    pub ftps: Vec<Entry<Ftp>>,
    pub gcss: Vec<Entry<Gcs>>,
    pub gzips: Vec<Entry<Gzip>>,
    pub vcls: Vec<Entry<Vcl>>,
    pub directors: Vec<Entry<Director>>,
    pub director_backends: Vec<DirectorBackend>,
}

/// Replaces placeholder tokens such as `_servicename_`, in a single pass.
#[derive(Debug, Clone)]
pub struct Tokens {
    pairs: Vec<(&'static str, String)>,
}

impl Tokens {
    pub fn new(pairs: Vec<(&'static str, String)>) -> Self {
        Self { pairs }
    }

    pub fn replace(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        'outer: while !rest.is_empty() {
            for (token, value) in &self.pairs {
                if let Some(tail) = rest.strip_prefix(token) {
                    out.push_str(value);
                    rest = tail;
                    continue 'outer;
                }
            }
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
        out
    }

    fn replace_in(&self, field: &mut String) {
        if !field.is_empty() {
            *field = self.replace(field);
        }
    }
}

/// Replace `field` with `default` while it is zero.
fn or_default(field: &mut u32, default: u32) {
    if *field == 0 {
        *field = default;
    }
}

fn cloned<T: Clone>(list: &Option<Vec<Entry<T>>>) -> Vec<Entry<T>> {
    list.clone().unwrap_or_default()
}

fn each<T>(
    list: &Option<Vec<Entry<T>>>,
    f: impl Fn(T) -> Result<T, ConfigError>,
) -> Result<Vec<Entry<T>>, ConfigError>
where
    T: Clone,
{
    cloned(list)
        .into_iter()
        .map(|entry| match entry {
            Entry::Present(t) => f(t).map(Entry::Present),
            Entry::Absent => Ok(Entry::Absent),
        })
        .collect()
}

pub fn normalize(
    service_name: &str,
    config: &ServiceConfig,
    base_dir: &Path,
    credentials: &S3Credentials,
) -> Result<DesiredService, ConfigError> {
    let name_only = Tokens::new(vec![("_servicename_", service_name.to_string())]);
    let addressing = Tokens::new(vec![
        ("_servicename_", service_name.to_string()),
        ("_prefix_", config.ip_prefix.clone().unwrap_or_default()),
        ("_suffix_", config.ip_suffix.clone().unwrap_or_default()),
    ]);
    let access_key = credentials
        .access_key
        .clone()
        .filter(|k| !k.is_empty())
        .or_else(|| config.s3_access_key.clone())
        .unwrap_or_default();
    let secret_key = credentials
        .secret_key
        .clone()
        .filter(|k| !k.is_empty())
        .or_else(|| config.s3_secret_key.clone())
        .unwrap_or_default();
    let s3_tokens = Tokens::new(vec![
        ("_servicename_", service_name.to_string()),
        ("_s3accesskey_", access_key),
        ("_s3secretkey_", secret_key),
    ]);

    let cert_hostname = config.ssl_cert_hostname.as_deref().filter(|h| !h.is_empty());

    Ok(DesiredService {
        settings: config.settings.clone().map(settings),
        dictionaries: cloned(&config.dictionaries),
        acls: cloned(&config.acls),
        conditions: cloned(&config.conditions),
        healthchecks: each(&config.healthchecks, |h| Ok(healthcheck(h)))?,
        cache_settings: cloned(&config.cache_settings),
        response_objects: cloned(&config.response_objects),
        request_settings: cloned(&config.request_settings),
        backends: each(&config.backends, |b| backend(b, &addressing, cert_hostname))?,
        headers: cloned(&config.headers),
        syslogs: each(&config.syslogs, |s| Ok(syslog(s, &addressing)))?,
        papertrails: each(&config.papertrails, |p| Ok(papertrail(p, &addressing)))?,
        sumologics: each(&config.sumologics, |s| Ok(sumologic(s, &name_only)))?,
        ftps: each(&config.ftps, |f| Ok(ftp(f, &addressing)))?,
        gcss: each(&config.gcss, |g| Ok(gcs(g, &name_only)))?,
        s3s: each(&config.s3s, |s| Ok(s3(s, &s3_tokens)))?,
        domains: each(&config.domains, |mut d| {
            name_only.replace_in(&mut d.name);
            Ok(d)
        })?,
        gzips: cloned(&config.gzips),
        vcls: cloned(&config.vcls)
            .into_iter()
            .map(|entry| match entry {
                Entry::Present(v) => vcl(v, base_dir).map(Entry::Present),
                Entry::Absent => Ok(Entry::Absent),
            })
            .collect::<Result<_, _>>()?,
        directors: each(&config.directors, |d| Ok(director(d)))?,
        director_backends: config.director_backends.clone().unwrap_or_default(),
    })
}

pub fn settings(mut s: Settings) -> Settings {
    or_default(&mut s.default_ttl, DEFAULT_TTL);
    s
}

/// `cert_hostname`, when given, replaces every backend's own
/// `ssl_cert_hostname` before tokens are substituted.
pub fn backend(
    mut b: Backend,
    tokens: &Tokens,
    cert_hostname: Option<&str>,
) -> Result<Backend, ConfigError> {
    if let Some(hostname) = cert_hostname {
        b.ssl_cert_hostname = hostname.to_string();
    }
    or_default(&mut b.port, DEFAULT_BACKEND_PORT);
    or_default(&mut b.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
    or_default(&mut b.first_byte_timeout, DEFAULT_FIRST_BYTE_TIMEOUT);
    or_default(&mut b.between_bytes_timeout, DEFAULT_BETWEEN_BYTES_TIMEOUT);
    or_default(&mut b.max_conn, DEFAULT_MAX_CONN);
    or_default(&mut b.weight, DEFAULT_WEIGHT);

    tokens.replace_in(&mut b.address);
    tokens.replace_in(&mut b.hostname);
    tokens.replace_in(&mut b.ipv4);
    tokens.replace_in(&mut b.ipv6);
    tokens.replace_in(&mut b.ssl_cert_hostname);

    let given = [&b.address, &b.hostname, &b.ipv4, &b.ipv6]
        .iter()
        .filter(|s| !s.is_empty())
        .count();
    if given > 1 {
        return Err(ConfigError::BackendAddress(b.name));
    }

    if !b.address.is_empty() {
        match b.address.parse::<IpAddr>() {
            Ok(IpAddr::V4(ip)) => b.ipv4 = ip.to_string(),
            Ok(IpAddr::V6(ip)) => b.ipv6 = ip.to_string(),
            Err(_) => b.hostname = b.address.clone(),
        }
    } else if !b.hostname.is_empty() {
        b.address = b.hostname.clone();
    } else if !b.ipv4.is_empty() {
        b.address = b.ipv4.clone();
    } else if !b.ipv6.is_empty() {
        b.address = b.ipv6.clone();
    }
    Ok(b)
}

pub fn healthcheck(mut h: HealthCheck) -> HealthCheck {
    if h.http_version.is_empty() {
        h.http_version = DEFAULT_HEALTHCHECK_HTTP_VERSION.to_string();
    }
    h
}

pub fn syslog(mut s: Syslog, tokens: &Tokens) -> Syslog {
    or_default(&mut s.port, DEFAULT_SYSLOG_PORT);
    tokens.replace_in(&mut s.address);
    tokens.replace_in(&mut s.tls_hostname);
    s
}

pub fn director(mut d: Director) -> Director {
    or_default(&mut d.type_, DEFAULT_DIRECTOR_TYPE);
    or_default(&mut d.quorum, DEFAULT_DIRECTOR_QUORUM);
    or_default(&mut d.retries, DEFAULT_DIRECTOR_RETRIES);
    or_default(&mut d.capacity, DEFAULT_DIRECTOR_CAPACITY);
    d
}

pub fn papertrail(mut p: Papertrail, tokens: &Tokens) -> Papertrail {
    or_default(&mut p.port, DEFAULT_PAPERTRAIL_PORT);
    or_default(&mut p.format_version, DEFAULT_LOG_FORMAT_VERSION);
    tokens.replace_in(&mut p.address);
    p
}

pub fn sumologic(mut s: Sumologic, tokens: &Tokens) -> Sumologic {
    or_default(&mut s.format_version, DEFAULT_LOG_FORMAT_VERSION);
    if s.message_type.is_none() {
        s.message_type = Some(MessageType::Classic);
    }
    tokens.replace_in(&mut s.url);
    s
}

pub fn ftp(mut f: Ftp, tokens: &Tokens) -> Ftp {
    or_default(&mut f.port, DEFAULT_FTP_PORT);
    or_default(&mut f.period, DEFAULT_LOG_PERIOD);
    or_default(&mut f.format_version, DEFAULT_LOG_FORMAT_VERSION);
    if f.timestamp_format.is_empty() {
        f.timestamp_format = DEFAULT_S3_TIMESTAMP_FORMAT.to_string();
    }
    tokens.replace_in(&mut f.address);
    tokens.replace_in(&mut f.path);
    f
}

pub fn gcs(mut g: Gcs, tokens: &Tokens) -> Gcs {
    or_default(&mut g.period, DEFAULT_LOG_PERIOD);
    or_default(&mut g.format_version, DEFAULT_LOG_FORMAT_VERSION);
    if g.message_type.is_none() {
        g.message_type = Some(MessageType::Classic);
    }
    if g.timestamp_format.is_empty() {
        g.timestamp_format = DEFAULT_S3_TIMESTAMP_FORMAT.to_string();
    }
    tokens.replace_in(&mut g.bucket_name);
    tokens.replace_in(&mut g.path);
    g
}

pub fn s3(mut s: S3, tokens: &Tokens) -> S3 {
    if s.timestamp_format.is_empty() {
        s.timestamp_format = DEFAULT_S3_TIMESTAMP_FORMAT.to_string();
    }
    or_default(&mut s.period, DEFAULT_LOG_PERIOD);
    if s.message_type.is_none() {
        s.message_type = Some(MessageType::Classic);
    }
    tokens.replace_in(&mut s.bucket_name);
    tokens.replace_in(&mut s.path);
    tokens.replace_in(&mut s.access_key);
    tokens.replace_in(&mut s.secret_key);
    s
}

pub fn vcl(source: VclSource, base_dir: &Path) -> Result<Vcl, ConfigError> {
    let content = match (source.file, source.content) {
        (Some(_), Some(_)) => return Err(ConfigError::VclBoth(source.name)),
        (None, None) => return Err(ConfigError::VclNeither(source.name)),
        (None, Some(content)) => content,
        (Some(file), None) => {
            let path: PathBuf = base_dir.join(file);
            std::fs::read_to_string(&path).map_err(|e| ConfigError::VclFile {
                name: source.name.clone(),
                path,
                source: e,
            })?
        }
    };
    Ok(Vcl {
        name: source.name,
        content,
        main: source.main,
        ..Default::default()
    })
}
