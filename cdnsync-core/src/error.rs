use std::path::PathBuf;

use thiserror::Error;

/// Problems with the desired state, found before talking to the API.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("toml parsing error in {path}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("json parsing error in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown config file type for file {0}; expected .toml or .json")]
    UnknownFormat(PathBuf),

    #[error("service {service} lists {category} {name} more than once")]
    DuplicateName {
        service: String,
        category: &'static str,
        name: String,
    },

    #[error("service {service} has a {category} without a name")]
    MissingName {
        service: String,
        category: &'static str,
    },

    #[error("backend {0} can only have one of address, hostname, ipv4, or ipv6 specified")]
    BackendAddress(String),

    #[error("cannot specify both a file and content for VCL {0}")]
    VclBoth(String),

    #[error("no content or file specified for VCL {0}")]
    VclNeither(String),

    #[error("could not read file {path} for VCL {name}")]
    VclFile {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
