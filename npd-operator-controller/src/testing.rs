//! In-memory [`ClusterStore`] for tests.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Mutex,
};

use kube::core::ErrorResponse;

use crate::{ClusterStore, StoreError, StoreObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Verb {
    Get,
    Create,
    Update,
}

/// A successful write against the store. Reads are never recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Write {
    pub verb: Verb,
    pub kind: String,
    pub namespace: Option<String>,
    pub name: String,
}

type Key = (String, Option<String>, String);
type Interference = Box<dyn FnOnce(&mut serde_json::Value) + Send>;

#[derive(Default)]
pub(crate) struct FakeStore {
    objects: Mutex<BTreeMap<Key, serde_json::Value>>,
    writes: Mutex<Vec<Write>>,
    forced_conflicts: Mutex<u32>,
    interference: Mutex<Option<Interference>>,
    failing: Mutex<BTreeSet<(Verb, String)>>,
}

fn key_of<K: StoreObject>(namespace: Option<&str>, name: &str) -> Key {
    (
        K::kind(&()).into_owned(),
        namespace.map(String::from),
        name.to_string(),
    )
}

fn resource_version(obj: &serde_json::Value) -> Option<u64> {
    obj["metadata"]["resourceVersion"]
        .as_str()
        .and_then(|rv| rv.parse().ok())
}

fn bump_resource_version(obj: &mut serde_json::Value) {
    let next = resource_version(obj).unwrap_or(0) + 1;
    obj["metadata"]["resourceVersion"] = serde_json::Value::String(next.to_string());
}

fn server_error() -> StoreError {
    StoreError::from(kube::Error::Api(ErrorResponse {
        status: "Failure".into(),
        message: "injected failure".into(),
        reason: "InternalError".into(),
        code: 500,
    }))
}

impl FakeStore {
    /// Seeds an object without recording a write.
    pub fn insert<K: StoreObject>(&self, obj: &K) {
        let meta = obj.meta();
        let key = key_of::<K>(meta.namespace.as_deref(), meta.name.as_deref().unwrap_or_default());
        let mut value = serde_json::to_value(obj).expect("serializable object");
        bump_resource_version(&mut value);
        self.objects.lock().expect("lock").insert(key, value);
    }

    pub fn object<K: StoreObject>(&self, namespace: Option<&str>, name: &str) -> Option<K> {
        self.objects
            .lock()
            .expect("lock")
            .get(&key_of::<K>(namespace, name))
            .map(|v| serde_json::from_value(v.clone()).expect("stored object deserializes"))
    }

    pub fn count<K: StoreObject>(&self) -> usize {
        let kind = K::kind(&());
        self.objects
            .lock()
            .expect("lock")
            .keys()
            .filter(|(k, _, _)| *k == kind)
            .count()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().expect("lock").clone()
    }

    pub fn clear_writes(&self) {
        self.writes.lock().expect("lock").clear();
    }

    /// The next update sees the stored object modified by another writer.
    pub fn interfere_once(&self, f: impl FnOnce(&mut serde_json::Value) + Send + 'static) {
        *self.interference.lock().expect("lock") = Some(Box::new(f));
    }

    /// The next `n` updates fail with a conflict.
    pub fn conflict_updates(&self, n: u32) {
        *self.forced_conflicts.lock().expect("lock") = n;
    }

    /// Every `verb` against kind `K` fails with a server error.
    pub fn fail<K: StoreObject>(&self, verb: Verb) {
        self.failing
            .lock()
            .expect("lock")
            .insert((verb, K::kind(&()).into_owned()));
    }

    fn is_failing<K: StoreObject>(&self, verb: Verb) -> bool {
        self.failing
            .lock()
            .expect("lock")
            .contains(&(verb, K::kind(&()).into_owned()))
    }

    fn record<K: StoreObject>(&self, verb: Verb, key: &Key) {
        self.writes.lock().expect("lock").push(Write {
            verb,
            kind: K::kind(&()).into_owned(),
            namespace: key.1.clone(),
            name: key.2.clone(),
        });
    }
}

impl ClusterStore for FakeStore {
    async fn create<K: StoreObject>(&self, obj: &K) -> Result<K, StoreError> {
        if self.is_failing::<K>(Verb::Create) {
            return Err(server_error());
        }
        let meta = obj.meta();
        let name = meta
            .name
            .as_deref()
            .ok_or_else(|| StoreError::InvalidObject("missing name".into()))?;
        let key = key_of::<K>(meta.namespace.as_deref(), name);

        let mut objects = self.objects.lock().expect("lock");
        if objects.contains_key(&key) {
            return Err(StoreError::AlreadyExists);
        }
        let mut value = serde_json::to_value(obj)?;
        bump_resource_version(&mut value);
        let created = serde_json::from_value(value.clone())?;
        objects.insert(key.clone(), value);
        drop(objects);

        self.record::<K>(Verb::Create, &key);
        Ok(created)
    }

    async fn get<K: StoreObject>(&self, namespace: Option<&str>, name: &str) -> Result<K, StoreError> {
        if self.is_failing::<K>(Verb::Get) {
            return Err(server_error());
        }
        let objects = self.objects.lock().expect("lock");
        let value = objects
            .get(&key_of::<K>(namespace, name))
            .ok_or(StoreError::NotFound)?;
        Ok(serde_json::from_value(value.clone())?)
    }

    async fn update<K: StoreObject>(&self, obj: &K) -> Result<K, StoreError> {
        if self.is_failing::<K>(Verb::Update) {
            return Err(server_error());
        }
        {
            let mut forced = self.forced_conflicts.lock().expect("lock");
            if *forced > 0 {
                *forced -= 1;
                return Err(StoreError::Conflict);
            }
        }

        let meta = obj.meta();
        let name = meta
            .name
            .as_deref()
            .ok_or_else(|| StoreError::InvalidObject("missing name".into()))?;
        let key = key_of::<K>(meta.namespace.as_deref(), name);

        let mut objects = self.objects.lock().expect("lock");
        let stored = objects.get_mut(&key).ok_or(StoreError::NotFound)?;
        if let Some(interfere) = self.interference.lock().expect("lock").take() {
            interfere(stored);
            bump_resource_version(stored);
        }

        let mut value = serde_json::to_value(obj)?;
        let sent = resource_version(&value);
        if sent.is_some() && sent != resource_version(stored) {
            return Err(StoreError::Conflict);
        }
        value["metadata"]["resourceVersion"] = stored["metadata"]["resourceVersion"].clone();
        bump_resource_version(&mut value);
        let updated = serde_json::from_value(value.clone())?;
        *stored = value;
        drop(objects);

        self.record::<K>(Verb::Update, &key);
        Ok(updated)
    }
}
