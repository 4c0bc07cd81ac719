use std::fmt::Debug;

use kube::{
    Client, Resource, ResourceExt,
    api::{GetParams, PostParams},
    core::Request,
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::trace;

use crate::StoreError;

/// Objects the reconciler reads and writes.
pub trait StoreObject:
    Resource<DynamicType = ()> + Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static
{
}

impl<K> StoreObject for K where
    K: Resource<DynamicType = ()>
        + Serialize
        + DeserializeOwned
        + Clone
        + Debug
        + Send
        + Sync
        + 'static
{
}

/// Cluster API capability used by the reconciler.
///
/// Objects are addressed by kind, namespace and name. Cluster-scoped kinds
/// must be passed without a namespace.
pub trait ClusterStore: Send + Sync {
    fn create<K: StoreObject>(&self, obj: &K) -> impl Future<Output = Result<K, StoreError>> + Send;

    fn get<K: StoreObject>(
        &self,
        namespace: Option<&str>,
        name: &str,
    ) -> impl Future<Output = Result<K, StoreError>> + Send;

    /// Replaces the object. The write is rejected with [`StoreError::Conflict`]
    /// if its resourceVersion is stale.
    fn update<K: StoreObject>(&self, obj: &K) -> impl Future<Output = Result<K, StoreError>> + Send;
}

#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn request<K: StoreObject>(namespace: Option<&str>) -> Request {
        Request::new(K::url_path(&(), namespace))
    }
}

impl ClusterStore for KubeStore {
    async fn create<K: StoreObject>(&self, obj: &K) -> Result<K, StoreError> {
        trace!("creating {} {}", K::kind(&()), obj.name_any());
        let body = serde_json::to_vec(obj)?;
        let req = Self::request::<K>(obj.meta().namespace.as_deref())
            .create(&PostParams::default(), body)
            .map_err(kube::Error::BuildRequest)?;
        Ok(self.client.request::<K>(req).await?)
    }

    async fn get<K: StoreObject>(&self, namespace: Option<&str>, name: &str) -> Result<K, StoreError> {
        trace!("getting {} {}", K::kind(&()), name);
        let req = Self::request::<K>(namespace)
            .get(name, &GetParams::default())
            .map_err(kube::Error::BuildRequest)?;
        Ok(self.client.request::<K>(req).await?)
    }

    async fn update<K: StoreObject>(&self, obj: &K) -> Result<K, StoreError> {
        let name = obj
            .meta()
            .name
            .clone()
            .ok_or_else(|| StoreError::InvalidObject(format!("{} has no name", K::kind(&()))))?;
        trace!("updating {} {}", K::kind(&()), name);
        let body = serde_json::to_vec(obj)?;
        let req = Self::request::<K>(obj.meta().namespace.as_deref())
            .replace(&name, &PostParams::default(), body)
            .map_err(kube::Error::BuildRequest)?;
        Ok(self.client.request::<K>(req).await?)
    }
}
