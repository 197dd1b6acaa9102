//! The desired state of a set of CDN services, as read from a config file.
//!
//! Loading goes through [`load::load_file`], which parses the file, merges
//! the `_default_` entry into every service and checks the result.
//! [`normalize`] then turns a [`ServiceConfig`] into the exact objects that
//! are compared against what the API reports.

pub mod config;
pub mod entry;
pub mod error;
pub mod load;
pub mod normalize;

pub use config::{DesiredConfig, ServiceConfig, VclSource, DEFAULT_SERVICE};
pub use entry::Entry;
pub use error::ConfigError;
