//! [`ConfigApi`] over HTTPS.

use async_trait::async_trait;
use reqwest::{header, Client, Method, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    client::ConfigApi,
    error::{ApiError, Result},
    schema::{
        AclEntry, Diff, DiffFormat, DictionaryItem, DirectorBackend, ObjectKind, Service,
        Settings, Validation, Version,
    },
};

pub const DEFAULT_BASE_URL: &str = "https://api.fastly.com/";

const KEY_HEADER: &str = "fastly-key";

pub struct HttpApi {
    client: Client,
    base: Url,
}

/// The body the API sends along with a failure status.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ErrorBody {
    msg: Option<String>,
    detail: Option<String>,
}

impl HttpApi {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let base =
            Url::parse(base_url).map_err(|e| ApiError::BaseUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(base_url.to_string()));
        }
        let mut key = header::HeaderValue::from_str(api_key).map_err(|_| ApiError::InvalidKey)?;
        key.set_sensitive(true);
        let mut headers = header::HeaderMap::new();
        headers.insert(KEY_HEADER, key);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let client = Client::builder()
            .user_agent(concat!("cdnsync/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;
        Ok(Self { client, base })
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    fn url<S: AsRef<str>>(&self, segments: &[S]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for s in segments {
                path.push(s.as_ref());
            }
        }
        url
    }

    fn version_url(&self, service_id: &str, version: u32, rest: &[&str]) -> Url {
        let version = version.to_string();
        let mut segments = vec!["service", service_id, "version", version.as_str()];
        segments.extend_from_slice(rest);
        self.url(&segments)
    }

    fn object_url(&self, kind: ObjectKind, service_id: &str, version: u32, name: Option<&str>) -> Url {
        let mut rest: Vec<&str> = kind.path_segments().to_vec();
        rest.extend(name);
        self.version_url(service_id, version, &rest)
    }

    async fn send<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!("{} {}", method, url);
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let body: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
            let message = match (body.msg, body.detail) {
                (Some(msg), Some(detail)) => format!("{msg}: {detail}"),
                (Some(msg), None) => msg,
                (None, Some(detail)) => detail,
                (None, None) => String::from_utf8_lossy(&bytes).into_owned(),
            };
            return Err(ApiError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            what: format!("response to {} {}", method, url),
            source,
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.send::<T, Value>(Method::GET, url, None).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<T> {
        self.send(Method::PUT, url, Some(body)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<T> {
        self.send(Method::POST, url, Some(body)).await
    }

    /// Deletions answer with `{"status": "ok"}`, which carries nothing of use.
    async fn delete(&self, url: Url) -> Result<()> {
        let _: Value = self.send::<Value, Value>(Method::DELETE, url, None).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigApi for HttpApi {
    async fn list_services(&self) -> Result<Vec<Service>> {
        self.get(self.url(&["service"])).await
    }

    async fn search_service(&self, name: &str) -> Result<Service> {
        let mut url = self.url(&["service", "search"]);
        url.query_pairs_mut().append_pair("name", name);
        self.get(url).await
    }

    async fn list_versions(&self, service_id: &str) -> Result<Vec<Version>> {
        self.get(self.url(&["service", service_id, "version"])).await
    }

    async fn clone_version(&self, service_id: &str, version: u32) -> Result<Version> {
        let url = self.version_url(service_id, version, &["clone"]);
        self.send::<_, Value>(Method::PUT, url, None).await
    }

    async fn update_version(&self, service_id: &str, version: &Version) -> Result<Version> {
        let url = self.version_url(service_id, version.number, &[]);
        self.put(url, version).await
    }

    async fn activate_version(&self, service_id: &str, version: u32) -> Result<Version> {
        let url = self.version_url(service_id, version, &["activate"]);
        self.send::<_, Value>(Method::PUT, url, None).await
    }

    async fn validate_version(&self, service_id: &str, version: u32) -> Result<Validation> {
        self.get(self.version_url(service_id, version, &["validate"]))
            .await
    }

    async fn diff(
        &self,
        service_id: &str,
        from: u32,
        to: u32,
        format: DiffFormat,
    ) -> Result<Diff> {
        let (from, to) = (from.to_string(), to.to_string());
        let mut url = self.url(&[
            "service",
            service_id,
            "diff",
            "from",
            from.as_str(),
            "to",
            to.as_str(),
        ]);
        url.query_pairs_mut().append_pair("format", format.as_str());
        self.get(url).await
    }

    async fn list_objects(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
    ) -> Result<Vec<Value>> {
        self.get(self.object_url(kind, service_id, version, None))
            .await
    }

    async fn get_object(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
        name: &str,
    ) -> Result<Value> {
        self.get(self.object_url(kind, service_id, version, Some(name)))
            .await
    }

    async fn create_object(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
        body: Value,
    ) -> Result<Value> {
        self.post(self.object_url(kind, service_id, version, None), &body)
            .await
    }

    async fn update_object(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
        name: &str,
        body: Value,
    ) -> Result<Value> {
        self.put(self.object_url(kind, service_id, version, Some(name)), &body)
            .await
    }

    async fn delete_object(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
        name: &str,
    ) -> Result<()> {
        self.delete(self.object_url(kind, service_id, version, Some(name)))
            .await
    }

    async fn get_settings(&self, service_id: &str, version: u32) -> Result<Settings> {
        self.get(self.version_url(service_id, version, &["settings"]))
            .await
    }

    async fn update_settings(
        &self,
        service_id: &str,
        version: u32,
        settings: &Settings,
    ) -> Result<Settings> {
        self.put(self.version_url(service_id, version, &["settings"]), settings)
            .await
    }

    async fn list_dictionary_items(
        &self,
        service_id: &str,
        dictionary_id: &str,
    ) -> Result<Vec<DictionaryItem>> {
        self.get(self.url(&["service", service_id, "dictionary", dictionary_id, "items"]))
            .await
    }

    async fn create_dictionary_item(
        &self,
        service_id: &str,
        dictionary_id: &str,
        item: &DictionaryItem,
    ) -> Result<DictionaryItem> {
        let url = self.url(&["service", service_id, "dictionary", dictionary_id, "item"]);
        self.post(url, item).await
    }

    async fn delete_dictionary_item(
        &self,
        service_id: &str,
        dictionary_id: &str,
        item_key: &str,
    ) -> Result<()> {
        self.delete(self.url(&[
            "service",
            service_id,
            "dictionary",
            dictionary_id,
            "item",
            item_key,
        ]))
        .await
    }

    async fn list_acl_entries(&self, service_id: &str, acl_id: &str) -> Result<Vec<AclEntry>> {
        self.get(self.url(&["service", service_id, "acl", acl_id, "entries"]))
            .await
    }

    async fn create_acl_entry(
        &self,
        service_id: &str,
        acl_id: &str,
        entry: &AclEntry,
    ) -> Result<AclEntry> {
        self.post(self.url(&["service", service_id, "acl", acl_id, "entry"]), entry)
            .await
    }

    async fn delete_acl_entry(
        &self,
        service_id: &str,
        acl_id: &str,
        entry_id: &str,
    ) -> Result<()> {
        self.delete(self.url(&["service", service_id, "acl", acl_id, "entry", entry_id]))
            .await
    }

    async fn get_director_backend(
        &self,
        service_id: &str,
        version: u32,
        director: &str,
        backend: &str,
    ) -> Result<DirectorBackend> {
        let url = self.version_url(service_id, version, &["director", director, "backend", backend]);
        self.get(url).await
    }

    async fn create_director_backend(
        &self,
        service_id: &str,
        version: u32,
        director: &str,
        backend: &str,
    ) -> Result<DirectorBackend> {
        let url = self.version_url(service_id, version, &["director", director, "backend", backend]);
        self.send::<_, Value>(Method::POST, url, None).await
    }
}
