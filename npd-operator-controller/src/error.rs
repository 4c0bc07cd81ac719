use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to {action}: {source}")]
    Apply {
        action: &'static str,
        source: StoreError,
    },

    #[error("encountered invalid resource")]
    InvalidResource,

    #[error("gave up adding {user} to {scc} securitycontextconstraints after {attempts} conflicts")]
    SccUpdateExhausted {
        scc: String,
        user: String,
        attempts: u32,
    },
}

impl Error {
    pub fn metric_label(&self) -> String {
        match self {
            Error::Apply { source, .. } => format!("apply_{}", source.metric_label()),
            Error::InvalidResource => "invalidresource".into(),
            Error::SccUpdateExhausted { .. } => "sccupdateexhausted".into(),
        }
    }

    pub(crate) fn apply(action: &'static str) -> impl FnOnce(StoreError) -> Error {
        move |source| Error::Apply { action, source }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Outcome classes of a single cluster store call.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("object already exists")]
    AlreadyExists,

    #[error("object not found")]
    NotFound,

    #[error("object was modified concurrently")]
    Conflict,

    #[error("invalid object: {0}")]
    InvalidObject(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("kube error: {0}")]
    KubeError(kube::Error),
}

impl StoreError {
    pub fn metric_label(&self) -> &'static str {
        match self {
            StoreError::AlreadyExists => "alreadyexists",
            StoreError::NotFound => "notfound",
            StoreError::Conflict => "conflict",
            StoreError::InvalidObject(_) => "invalidobject",
            StoreError::Json(_) => "json",
            StoreError::KubeError(_) => "kubeerror",
        }
    }
}

impl From<kube::Error> for StoreError {
    fn from(err: kube::Error) -> Self {
        match &err {
            kube::Error::Api(ae) if ae.code == 409 && ae.reason == "AlreadyExists" => {
                StoreError::AlreadyExists
            }
            kube::Error::Api(ae) if ae.code == 409 => StoreError::Conflict,
            kube::Error::Api(ae) if ae.code == 404 => StoreError::NotFound,
            _ => StoreError::KubeError(err),
        }
    }
}
