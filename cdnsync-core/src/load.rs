use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    config::{DesiredConfig, ServiceConfig},
    error::ConfigError,
};

/// Read a TOML or JSON config file, chosen by extension.
pub fn load_file(path: &Path) -> Result<DesiredConfig, ConfigError> {
    let body = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = parse(path, &body)?;
    debug!(services = raw.len(), "loaded {}", path.display());
    let base_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    DesiredConfig::new(raw, base_dir)
}

fn parse(path: &Path, body: &str) -> Result<BTreeMap<String, ServiceConfig>, ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(body).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        Some("json") => serde_json::from_str(body).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        }),
        _ => Err(ConfigError::UnknownFormat(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use std::io::Write as _;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn toml_with_defaults_and_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "config.toml",
            r#"
            [_default_]
            ip_prefix = "10.1"

            [[_default_.gzips]]
            name = "text"
            extensions = "css js html"

            [www]
            settings = { default_ttl = 3600 }

            [[www.domains]]
            name = "www.example.com"

            [[www.domains]]

            [[www.backends]]
            name = "origin"
            hostname = "_prefix_.0.1"
            port = 443
            "#,
        );
        let config = load_file(&path).unwrap();
        assert_eq!(config.base_dir(), dir.path());
        let www = config.service("www").unwrap();
        let domains = www.domains.as_ref().unwrap();
        assert_eq!(domains.len(), 2);
        assert_eq!(domains[1], Entry::Absent);
        assert_eq!(www.settings.as_ref().unwrap().default_ttl, 3600);
        assert_eq!(www.ip_prefix.as_deref(), Some("10.1"));
        assert_eq!(www.gzips.as_ref().unwrap().len(), 1);
        assert_eq!(www.conditions, None);
    }

    #[test]
    fn json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "config.json",
            r#"{"api": {"conditions": [{"name": "is_post", "statement": "req.method == \"POST\"", "type": "REQUEST"}]}}"#,
        );
        let config = load_file(&path).unwrap();
        let conditions = config.service("api").unwrap().conditions.as_ref().unwrap();
        assert_eq!(conditions.len(), 1);
    }

    #[test]
    fn unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "config.yaml", "www: {}");
        assert!(matches!(
            load_file(&path),
            Err(ConfigError::UnknownFormat(_))
        ));
    }

    #[test]
    fn unknown_keys_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "config.toml", "[www]\nbackend = []\n");
        assert!(matches!(load_file(&path), Err(ConfigError::Toml { .. })));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_file(&dir.path().join("nope.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
