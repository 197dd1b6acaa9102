//! An in-memory [`ConfigApi`] for tests.
//!
//! It keeps versions, objects and settings per service, renders diffs from
//! its own contents and records every call, so that tests can assert on the
//! exact mutations issued.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use cdnsync_api::{
    schema::{
        AclEntry, ConfigObject, Diff, DiffFormat, DictionaryItem, DirectorBackend, ObjectKind,
        Service, Settings, Validation, Version,
    },
    ApiError, ConfigApi, Result,
};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    ListServices,
    SearchService(String),
    ListVersions,
    CloneVersion(u32),
    UpdateVersion(u32),
    ActivateVersion(u32),
    ValidateVersion(u32),
    Diff(u32, u32),
    ListObjects(ObjectKind),
    GetObject(ObjectKind, String),
    CreateObject(ObjectKind, String),
    UpdateObject(ObjectKind, String),
    DeleteObject(ObjectKind, String),
    GetSettings,
    UpdateSettings,
    ListDictionaryItems(String),
    CreateDictionaryItem(String),
    DeleteDictionaryItem(String),
    ListAclEntries(String),
    CreateAclEntry(String),
    DeleteAclEntry(String),
    GetDirectorBackend(String, String),
    CreateDirectorBackend(String, String),
}

impl Call {
    pub(crate) fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::CloneVersion(_)
                | Call::UpdateVersion(_)
                | Call::ActivateVersion(_)
                | Call::CreateObject(..)
                | Call::UpdateObject(..)
                | Call::DeleteObject(..)
                | Call::UpdateSettings
                | Call::CreateDictionaryItem(_)
                | Call::DeleteDictionaryItem(_)
                | Call::CreateAclEntry(_)
                | Call::DeleteAclEntry(_)
                | Call::CreateDirectorBackend(..)
        )
    }
}

type ObjectKey = (String, u32, ObjectKind);
/// Service, version, director and backend.
type MappingKey = (String, u32, String, String);

#[derive(Default)]
struct State {
    services: Vec<Service>,
    versions: BTreeMap<String, Vec<Version>>,
    objects: BTreeMap<ObjectKey, Vec<Value>>,
    settings: BTreeMap<(String, u32), Settings>,
    dictionary_items: BTreeMap<String, Vec<DictionaryItem>>,
    acl_entries: BTreeMap<String, Vec<AclEntry>>,
    director_backends: BTreeSet<MappingKey>,
    /// Fields the server fills in when a create or update leaves them out.
    server_defaults: Vec<(ObjectKind, &'static str, Value)>,
    /// Fields that never show up in rendered diffs.
    hidden: Vec<&'static str>,
    validation: Option<Validation>,
    failures: Vec<Call>,
    calls: Vec<Call>,
    next_id: u32,
}

fn error(method: &str, what: String, status: u16, message: &str) -> ApiError {
    ApiError::Status {
        method: method.to_string(),
        url: format!("fake:///{what}"),
        status,
        message: message.to_string(),
    }
}

fn not_found(what: String) -> ApiError {
    error("GET", what, 404, "Record not found")
}

fn stamp(mut body: Value, service_id: &str, version: u32) -> Value {
    if let Value::Object(fields) = &mut body {
        fields.insert("service_id".to_string(), Value::from(service_id));
        // The real API quotes most numbers.
        fields.insert("version".to_string(), Value::from(version.to_string()));
    }
    body
}

fn object_name(body: &Value) -> String {
    body.get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

impl State {
    fn record(&mut self, call: Call) -> Result<()> {
        let failed = self.failures.contains(&call);
        self.calls.push(call.clone());
        if failed {
            return Err(error("FAKE", format!("{call:?}"), 500, "injected failure"));
        }
        Ok(())
    }

    fn version_mut(&mut self, service_id: &str, number: u32) -> Result<&mut Version> {
        self.versions
            .get_mut(service_id)
            .and_then(|vs| vs.iter_mut().find(|v| v.number == number))
            .ok_or_else(|| not_found(format!("service/{service_id}/version/{number}")))
    }

    fn writable(&mut self, service_id: &str, number: u32) -> Result<()> {
        let v = self.version_mut(service_id, number)?;
        if v.locked || v.active {
            return Err(error(
                "PUT",
                format!("service/{service_id}/version/{number}"),
                400,
                "Version is locked",
            ));
        }
        Ok(())
    }

    fn fill_defaults(&self, kind: ObjectKind, body: &mut Value) {
        let Value::Object(fields) = body else {
            return;
        };
        for (k, field, value) in &self.server_defaults {
            if *k == kind && !fields.contains_key(*field) {
                fields.insert(field.to_string(), value.clone());
            }
        }
    }

    /// One line per object, without the fields that differ between versions.
    /// Dictionaries and ACLs are left out, like in the real diff.
    fn render(&self, service_id: &str, number: u32) -> BTreeSet<String> {
        let mut lines = BTreeSet::new();
        for ((sid, v, kind), objects) in &self.objects {
            if sid != service_id
                || *v != number
                || matches!(kind, ObjectKind::Dictionary | ObjectKind::Acl)
            {
                continue;
            }
            for object in objects {
                let mut object = object.clone();
                if let Value::Object(fields) = &mut object {
                    fields.remove("service_id");
                    fields.remove("version");
                    fields.remove("id");
                    for field in &self.hidden {
                        fields.remove(*field);
                    }
                }
                lines.insert(format!("{kind:?} {object}"));
            }
        }
        for (sid, v, director, backend) in &self.director_backends {
            if sid == service_id && *v == number {
                lines.insert(format!("DirectorBackend {director} {backend}"));
            }
        }
        if let Some(settings) = self.settings.get(&(service_id.to_string(), number)) {
            let mut settings = settings.clone();
            settings.clear_server_fields();
            lines.insert(format!("settings {settings:?}"));
        }
        lines
    }
}

pub(crate) struct FakeApi {
    state: Mutex<State>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1,
                ..Default::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Add a service whose active version is 1.
    pub(crate) fn add_service(&self, id: &str, name: &str) -> Service {
        let v1 = Version {
            service_id: Some(id.to_string()),
            number: 1,
            active: true,
            locked: true,
            ..Default::default()
        };
        let service = Service {
            id: id.to_string(),
            name: name.to_string(),
            version: 1,
            versions: vec![v1.clone()],
            ..Default::default()
        };
        let mut st = self.lock();
        st.services.push(service.clone());
        st.versions.insert(id.to_string(), vec![v1]);
        service
    }

    /// Add an empty, unlocked version and return its number.
    pub(crate) fn add_version(&self, service_id: &str, comment: &str) -> u32 {
        let mut st = self.lock();
        let versions = st.versions.entry(service_id.to_string()).or_default();
        let number = versions.len() as u32 + 1;
        versions.push(Version {
            service_id: Some(service_id.to_string()),
            number,
            comment: comment.to_string(),
            ..Default::default()
        });
        number
    }

    pub(crate) fn lock_version(&self, service_id: &str, number: u32) {
        self.lock().version_mut(service_id, number).unwrap().locked = true;
    }

    pub(crate) fn service(&self, id: &str) -> Service {
        let st = self.lock();
        st.services.iter().find(|s| s.id == id).cloned().unwrap()
    }

    pub(crate) fn version(&self, service_id: &str, number: u32) -> Version {
        self.lock().version_mut(service_id, number).unwrap().clone()
    }

    /// Store `objects` as if they had been created in the given version.
    pub(crate) fn put<T: ConfigObject>(&self, service_id: &str, version: u32, objects: Vec<T>) {
        let mut st = self.lock();
        let mut values = Vec::new();
        for object in objects {
            let mut value = stamp(serde_json::to_value(&object).unwrap(), service_id, version);
            if matches!(T::KIND, ObjectKind::Dictionary | ObjectKind::Acl) {
                let id = format!("{}-{}", T::KIND.label(), st.next_id);
                st.next_id += 1;
                value["id"] = Value::from(id);
            }
            values.push(value);
        }
        st.objects
            .insert((service_id.to_string(), version, T::KIND), values);
    }

    /// The objects of a version, as the reconciler would see them.
    pub(crate) fn objects<T: ConfigObject>(&self, service_id: &str, version: u32) -> Vec<T> {
        let st = self.lock();
        st.objects
            .get(&(service_id.to_string(), version, T::KIND))
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|v| {
                let mut t: T = serde_json::from_value(v).unwrap();
                t.clear_server_fields();
                t
            })
            .collect()
    }

    pub(crate) fn names<T: ConfigObject>(&self, service_id: &str, version: u32) -> Vec<String> {
        let mut names: Vec<String> = self
            .objects::<T>(service_id, version)
            .iter()
            .map(|o| o.name().to_string())
            .collect();
        names.sort();
        names
    }

    pub(crate) fn set_settings(&self, service_id: &str, version: u32, settings: Settings) {
        self.lock()
            .settings
            .insert((service_id.to_string(), version), settings);
    }

    /// Fill `field` of every `kind` object created or updated without it.
    pub(crate) fn server_default(&self, kind: ObjectKind, field: &'static str, value: Value) {
        self.lock().server_defaults.push((kind, field, value));
    }

    /// Leave `field` out of rendered diffs, as the real renderer does for
    /// comments.
    pub(crate) fn hide_in_diff(&self, field: &'static str) {
        self.lock().hidden.push(field);
    }

    pub(crate) fn director_backends(&self, service_id: &str, version: u32) -> Vec<(String, String)> {
        self.lock()
            .director_backends
            .iter()
            .filter(|(sid, v, _, _)| sid == service_id && *v == version)
            .map(|(_, _, d, b)| (d.clone(), b.clone()))
            .collect()
    }

    pub(crate) fn set_validation(&self, validation: Validation) {
        self.lock().validation = Some(validation);
    }

    /// Make every future `call` fail with a 500.
    pub(crate) fn fail_on(&self, call: Call) {
        self.lock().failures.push(call);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub(crate) fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub(crate) fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

#[async_trait]
impl ConfigApi for FakeApi {
    async fn list_services(&self) -> Result<Vec<Service>> {
        let mut st = self.lock();
        st.record(Call::ListServices)?;
        Ok(st.services.clone())
    }

    async fn search_service(&self, name: &str) -> Result<Service> {
        let mut st = self.lock();
        st.record(Call::SearchService(name.to_string()))?;
        st.services
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| not_found(format!("service/search?name={name}")))
    }

    async fn list_versions(&self, service_id: &str) -> Result<Vec<Version>> {
        let mut st = self.lock();
        st.record(Call::ListVersions)?;
        Ok(st.versions.get(service_id).cloned().unwrap_or_default())
    }

    async fn clone_version(&self, service_id: &str, version: u32) -> Result<Version> {
        let mut st = self.lock();
        st.record(Call::CloneVersion(version))?;
        let source = st.version_mut(service_id, version)?.clone();
        let versions = st.versions.entry(service_id.to_string()).or_default();
        let number = versions.iter().map(|v| v.number).max().unwrap_or(0) + 1;
        let copy = Version {
            service_id: Some(service_id.to_string()),
            number,
            comment: source.comment,
            created_at: Some("2026-10-19T12:00:00Z".to_string()),
            updated_at: Some("2026-10-19T12:00:00Z".to_string()),
            ..Default::default()
        };
        versions.push(copy.clone());

        let copied: Vec<(ObjectKey, Vec<Value>)> = st
            .objects
            .iter()
            .filter(|((sid, v, _), _)| sid == service_id && *v == version)
            .map(|((sid, _, kind), objects)| {
                let objects = objects
                    .iter()
                    .map(|o| stamp(o.clone(), service_id, number))
                    .collect();
                ((sid.clone(), number, *kind), objects)
            })
            .collect();
        st.objects.extend(copied);
        if let Some(settings) = st.settings.get(&(service_id.to_string(), version)).cloned() {
            st.settings
                .insert((service_id.to_string(), number), settings);
        }
        let mappings: Vec<MappingKey> = st
            .director_backends
            .iter()
            .filter(|(sid, v, _, _)| sid == service_id && *v == version)
            .map(|(sid, _, d, b)| (sid.clone(), number, d.clone(), b.clone()))
            .collect();
        st.director_backends.extend(mappings);
        Ok(copy)
    }

    async fn update_version(&self, service_id: &str, version: &Version) -> Result<Version> {
        let mut st = self.lock();
        st.record(Call::UpdateVersion(version.number))?;
        if version.created_at.is_some() || version.updated_at.is_some() {
            return Err(error(
                "PUT",
                format!("service/{service_id}/version/{}", version.number),
                400,
                "Timestamps are read-only",
            ));
        }
        st.writable(service_id, version.number)?;
        let stored = st.version_mut(service_id, version.number)?;
        stored.comment = version.comment.clone();
        Ok(stored.clone())
    }

    async fn activate_version(&self, service_id: &str, version: u32) -> Result<Version> {
        let mut st = self.lock();
        st.record(Call::ActivateVersion(version))?;
        st.version_mut(service_id, version)?;
        let versions = st.versions.entry(service_id.to_string()).or_default();
        for v in versions.iter_mut() {
            v.active = v.number == version;
            if v.active {
                v.locked = true;
            }
        }
        let versions = versions.clone();
        if let Some(service) = st.services.iter_mut().find(|s| s.id == service_id) {
            service.version = version;
            service.versions = versions;
        }
        st.version_mut(service_id, version).map(|v| v.clone())
    }

    async fn validate_version(&self, service_id: &str, version: u32) -> Result<Validation> {
        let mut st = self.lock();
        st.record(Call::ValidateVersion(version))?;
        st.version_mut(service_id, version)?;
        Ok(st.validation.clone().unwrap_or_else(|| Validation {
            status: "ok".to_string(),
            ..Default::default()
        }))
    }

    async fn diff(
        &self,
        service_id: &str,
        from: u32,
        to: u32,
        format: DiffFormat,
    ) -> Result<Diff> {
        let mut st = self.lock();
        st.record(Call::Diff(from, to))?;
        st.version_mut(service_id, from)?;
        st.version_mut(service_id, to)?;
        let old = st.render(service_id, from);
        let new = st.render(service_id, to);
        let mut diff = String::new();
        for line in old.union(&new) {
            let marker = match (old.contains(line), new.contains(line)) {
                (true, true) => ' ',
                (true, false) => '-',
                _ => '+',
            };
            diff.push(marker);
            diff.push_str(line);
            diff.push('\n');
        }
        Ok(Diff {
            from,
            to,
            format: format.as_str().to_string(),
            diff,
        })
    }

    async fn list_objects(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
    ) -> Result<Vec<Value>> {
        let mut st = self.lock();
        st.record(Call::ListObjects(kind))?;
        st.version_mut(service_id, version)?;
        Ok(st
            .objects
            .get(&(service_id.to_string(), version, kind))
            .cloned()
            .unwrap_or_default())
    }

    async fn get_object(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
        name: &str,
    ) -> Result<Value> {
        let mut st = self.lock();
        st.record(Call::GetObject(kind, name.to_string()))?;
        st.objects
            .get(&(service_id.to_string(), version, kind))
            .and_then(|objects| objects.iter().find(|o| object_name(o) == name))
            .cloned()
            .ok_or_else(|| not_found(format!("{kind}/{name}")))
    }

    async fn create_object(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
        body: Value,
    ) -> Result<Value> {
        let mut st = self.lock();
        let name = object_name(&body);
        st.record(Call::CreateObject(kind, name.clone()))?;
        st.writable(service_id, version)?;
        let mut body = stamp(body, service_id, version);
        st.fill_defaults(kind, &mut body);
        if matches!(kind, ObjectKind::Dictionary | ObjectKind::Acl) {
            body["id"] = Value::from(format!("{}-{}", kind.label(), st.next_id));
            st.next_id += 1;
        }
        let objects = st
            .objects
            .entry((service_id.to_string(), version, kind))
            .or_default();
        if objects.iter().any(|o| object_name(o) == name) {
            return Err(error("POST", format!("{kind}/{name}"), 409, "Duplicate record"));
        }
        objects.push(body.clone());
        Ok(body)
    }

    async fn update_object(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
        name: &str,
        body: Value,
    ) -> Result<Value> {
        let mut st = self.lock();
        st.record(Call::UpdateObject(kind, name.to_string()))?;
        st.writable(service_id, version)?;
        let mut body = stamp(body, service_id, version);
        st.fill_defaults(kind, &mut body);
        let objects = st
            .objects
            .entry((service_id.to_string(), version, kind))
            .or_default();
        let existing = objects
            .iter_mut()
            .find(|o| object_name(o) == name)
            .ok_or_else(|| not_found(format!("{kind}/{name}")))?;
        let id = existing.get("id").cloned();
        if let Some(id) = id {
            body["id"] = id;
        }
        *existing = body.clone();
        Ok(body)
    }

    async fn delete_object(
        &self,
        kind: ObjectKind,
        service_id: &str,
        version: u32,
        name: &str,
    ) -> Result<()> {
        let mut st = self.lock();
        st.record(Call::DeleteObject(kind, name.to_string()))?;
        st.writable(service_id, version)?;
        let objects = st
            .objects
            .entry((service_id.to_string(), version, kind))
            .or_default();
        let before = objects.len();
        objects.retain(|o| object_name(o) != name);
        if objects.len() == before {
            return Err(not_found(format!("{kind}/{name}")));
        }
        if kind == ObjectKind::Director {
            st.director_backends
                .retain(|(sid, v, d, _)| !(sid == service_id && *v == version && d == name));
        }
        Ok(())
    }

    async fn get_settings(&self, service_id: &str, version: u32) -> Result<Settings> {
        let mut st = self.lock();
        st.record(Call::GetSettings)?;
        st.version_mut(service_id, version)?;
        let mut settings = st
            .settings
            .get(&(service_id.to_string(), version))
            .cloned()
            .unwrap_or_default();
        settings.service_id = Some(service_id.to_string());
        settings.version = Some(version);
        Ok(settings)
    }

    async fn update_settings(
        &self,
        service_id: &str,
        version: u32,
        settings: &Settings,
    ) -> Result<Settings> {
        let mut st = self.lock();
        st.record(Call::UpdateSettings)?;
        st.writable(service_id, version)?;
        let mut stored = settings.clone();
        stored.clear_server_fields();
        st.settings
            .insert((service_id.to_string(), version), stored.clone());
        stored.service_id = Some(service_id.to_string());
        stored.version = Some(version);
        Ok(stored)
    }

    async fn list_dictionary_items(
        &self,
        _service_id: &str,
        dictionary_id: &str,
    ) -> Result<Vec<DictionaryItem>> {
        let mut st = self.lock();
        st.record(Call::ListDictionaryItems(dictionary_id.to_string()))?;
        Ok(st
            .dictionary_items
            .get(dictionary_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_dictionary_item(
        &self,
        service_id: &str,
        dictionary_id: &str,
        item: &DictionaryItem,
    ) -> Result<DictionaryItem> {
        let mut st = self.lock();
        st.record(Call::CreateDictionaryItem(item.item_key.clone()))?;
        let mut item = item.clone();
        item.service_id = Some(service_id.to_string());
        item.dictionary_id = Some(dictionary_id.to_string());
        let items = st
            .dictionary_items
            .entry(dictionary_id.to_string())
            .or_default();
        items.retain(|i| i.item_key != item.item_key);
        items.push(item.clone());
        Ok(item)
    }

    async fn delete_dictionary_item(
        &self,
        _service_id: &str,
        dictionary_id: &str,
        item_key: &str,
    ) -> Result<()> {
        let mut st = self.lock();
        st.record(Call::DeleteDictionaryItem(item_key.to_string()))?;
        let items = st
            .dictionary_items
            .entry(dictionary_id.to_string())
            .or_default();
        let before = items.len();
        items.retain(|i| i.item_key != item_key);
        if items.len() == before {
            return Err(not_found(format!("dictionary/{dictionary_id}/item/{item_key}")));
        }
        Ok(())
    }

    async fn list_acl_entries(&self, _service_id: &str, acl_id: &str) -> Result<Vec<AclEntry>> {
        let mut st = self.lock();
        st.record(Call::ListAclEntries(acl_id.to_string()))?;
        Ok(st.acl_entries.get(acl_id).cloned().unwrap_or_default())
    }

    async fn create_acl_entry(
        &self,
        service_id: &str,
        acl_id: &str,
        entry: &AclEntry,
    ) -> Result<AclEntry> {
        let mut st = self.lock();
        st.record(Call::CreateAclEntry(entry.ip.clone()))?;
        let mut entry = entry.clone();
        entry.service_id = Some(service_id.to_string());
        entry.acl_id = Some(acl_id.to_string());
        entry.id = Some(format!("entry-{}", st.next_id));
        st.next_id += 1;
        st.acl_entries
            .entry(acl_id.to_string())
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }

    async fn delete_acl_entry(
        &self,
        _service_id: &str,
        acl_id: &str,
        entry_id: &str,
    ) -> Result<()> {
        let mut st = self.lock();
        st.record(Call::DeleteAclEntry(entry_id.to_string()))?;
        let entries = st.acl_entries.entry(acl_id.to_string()).or_default();
        let before = entries.len();
        entries.retain(|e| e.id.as_deref() != Some(entry_id));
        if entries.len() == before {
            return Err(not_found(format!("acl/{acl_id}/entry/{entry_id}")));
        }
        Ok(())
    }

    async fn get_director_backend(
        &self,
        service_id: &str,
        version: u32,
        director: &str,
        backend: &str,
    ) -> Result<DirectorBackend> {
        let mut st = self.lock();
        st.record(Call::GetDirectorBackend(
            director.to_string(),
            backend.to_string(),
        ))?;
        let key = (
            service_id.to_string(),
            version,
            director.to_string(),
            backend.to_string(),
        );
        if !st.director_backends.contains(&key) {
            return Err(not_found(format!("director/{director}/backend/{backend}")));
        }
        Ok(DirectorBackend {
            service_id: Some(service_id.to_string()),
            version: Some(version),
            director: director.to_string(),
            backend: backend.to_string(),
        })
    }

    async fn create_director_backend(
        &self,
        service_id: &str,
        version: u32,
        director: &str,
        backend: &str,
    ) -> Result<DirectorBackend> {
        let mut st = self.lock();
        st.record(Call::CreateDirectorBackend(
            director.to_string(),
            backend.to_string(),
        ))?;
        st.writable(service_id, version)?;
        let exists = |kind: ObjectKind, name: &str| {
            st.objects
                .get(&(service_id.to_string(), version, kind))
                .is_some_and(|objects| objects.iter().any(|o| object_name(o) == name))
        };
        if !exists(ObjectKind::Director, director) || !exists(ObjectKind::Backend, backend) {
            return Err(not_found(format!("director/{director}/backend/{backend}")));
        }
        st.director_backends.insert((
            service_id.to_string(),
            version,
            director.to_string(),
            backend.to_string(),
        ));
        Ok(DirectorBackend {
            service_id: Some(service_id.to_string()),
            version: Some(version),
            director: director.to_string(),
            backend: backend.to_string(),
        })
    }
}
