//! The interface the sync engine talks to.
//!
//! [`ConfigApi`] is object safe so that the engine can hold a
//! `&dyn ConfigApi` and tests can substitute an in-memory implementation.
//! Versioned objects cross the trait as [`serde_json::Value`]; the free
//! functions at the bottom of this module provide the typed view.

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::{ApiError, Result},
    schema::{
        AclEntry, ConfigObject, Diff, DiffFormat, DictionaryItem, DirectorBackend, ObjectKind,
        Service, Settings, Validation, Version,
    },
};

#[async_trait]
pub trait ConfigApi: Send + Sync {
    async fn list_services(&self) -> Result<Vec<Service>>;

    /// Look up a single service by its name.
    async fn search_service(&self, name: &str) -> Result<Service>;

    async fn list_versions(&self, service_id: &str) -> Result<Vec<Version>>;

    /// Copy `version` into a new, unlocked version and return the copy.
    async fn clone_version(&self, service_id: &str, version: u32) -> Result<Version>;

    async fn update_version(&self, service_id: &str, version: &Version) -> Result<Version>;

    async fn activate_version(&self, service_id: &str, version: u32) -> Result<Version>;

    async fn validate_version(&self, service_id: &str, version: u32) -> Result<Validation>;

    async fn diff(
        &self,
        service_id: &str,
        from: u32,
        to: u32,
        format: DiffFormat,
    ) -> Result<Diff>;

    async fn list_objects(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
    ) -> Result<Vec<Value>>;

    async fn get_object(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
        name: &str,
    ) -> Result<Value>;

    async fn create_object(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
        body: Value,
    ) -> Result<Value>;

    /// Replace the fields of the object currently called `name`.
    async fn update_object(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
        name: &str,
        body: Value,
    ) -> Result<Value>;

    async fn delete_object(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
        name: &str,
    ) -> Result<()>;

    async fn get_settings(&self, service_id: &str, version: u32) -> Result<Settings>;

    async fn update_settings(
        &self,
        service_id: &str,
        version: u32,
        settings: &Settings,
    ) -> Result<Settings>;

    async fn list_dictionary_items(
        &self,
        service_id: &str,
        dictionary_id: &str,
    ) -> Result<Vec<DictionaryItem>>;

    async fn create_dictionary_item(
        &self,
        service_id: &str,
        dictionary_id: &str,
        item: &DictionaryItem,
    ) -> Result<DictionaryItem>;

    async fn delete_dictionary_item(
        &self,
        service_id: &str,
        dictionary_id: &str,
        item_key: &str,
    ) -> Result<()>;

    async fn list_acl_entries(&self, service_id: &str, acl_id: &str) -> Result<Vec<AclEntry>>;

    async fn create_acl_entry(
        &self,
        service_id: &str,
        acl_id: &str,
        entry: &AclEntry,
    ) -> Result<AclEntry>;

    async fn delete_acl_entry(&self, service_id: &str, acl_id: &str, entry_id: &str)
        -> Result<()>;

    /// Fetch the mapping of `backend` into `director`. A missing mapping is
    /// reported as a 404, see [`ApiError::is_not_found`].
    async fn get_director_backend(
        &self,
        service_id: &str,
        version: u32,
        director: &str,
        backend: &str,
    ) -> Result<DirectorBackend>;

    async fn create_director_backend(
        &self,
        service_id: &str,
        version: u32,
        director: &str,
        backend: &str,
    ) -> Result<DirectorBackend>;
}

fn decode<T: ConfigObject>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| ApiError::Decode {
        what: T::KIND.label().to_string(),
        source,
    })
}

fn encode<T: ConfigObject>(object: &T) -> Result<Value> {
    serde_json::to_value(object).map_err(|source| ApiError::Encode {
        what: format!("{} {}", T::KIND, object.name()),
        source,
    })
}

pub async fn list<T: ConfigObject>(
    api: &dyn ConfigApi,
    service_id: &str,
    version: u32,
) -> Result<Vec<T>> {
    api.list_objects(T::KIND, service_id, version)
        .await?
        .into_iter()
        .map(decode)
        .collect()
}

pub async fn get<T: ConfigObject>(
    api: &dyn ConfigApi,
    service_id: &str,
    version: u32,
    name: &str,
) -> Result<T> {
    decode(api.get_object(T::KIND, service_id, version, name).await?)
}

pub async fn create<T: ConfigObject>(
    api: &dyn ConfigApi,
    service_id: &str,
    version: u32,
    object: &T,
) -> Result<T> {
    let body = encode(object)?;
    decode(api.create_object(T::KIND, service_id, version, body).await?)
}

pub async fn update<T: ConfigObject>(
    api: &dyn ConfigApi,
    service_id: &str,
    version: u32,
    name: &str,
    object: &T,
) -> Result<T> {
    let body = encode(object)?;
    decode(
        api.update_object(T::KIND, service_id, version, name, body)
            .await?,
    )
}

pub async fn delete<T: ConfigObject>(
    api: &dyn ConfigApi,
    service_id: &str,
    version: u32,
    name: &str,
) -> Result<()> {
    api.delete_object(T::KIND, service_id, version, name).await
}
