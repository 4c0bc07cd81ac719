use std::{
    borrow::Cow,
    sync::{LazyLock, RwLock},
};

use kube::ResourceExt;
use prometheus_client::{
    encoding::EncodeLabelSet,
    metrics::{counter::Counter, family::Family, histogram::Histogram},
    registry::{Registry, Unit},
};
use tokio::time::Instant;

use crate::Error;

pub static REGISTRY: LazyLock<RwLock<Registry>> =
    LazyLock::new(|| RwLock::new(Registry::with_prefix("npd_operator")));

const DURATION_BUCKETS: [f64; 8] = [0.01, 0.1, 0.25, 0.5, 1.0, 5.0, 15.0, 60.0];

#[derive(Clone)]
pub struct ControllerMetrics {
    pub runs: Family<ControllerLabels, Counter>,
    pub failures: Family<ErrorLabels, Counter>,
    pub duration: Histogram,
}

impl Default for ControllerMetrics {
    fn default() -> Self {
        Self {
            runs: Family::default(),
            failures: Family::default(),
            duration: Histogram::new(DURATION_BUCKETS.into_iter()),
        }
    }
}

impl ControllerMetrics {
    /// Register controller metrics to start tracking them.
    pub fn new(controller_name: &str, registry: &mut Registry) -> Self {
        let metrics = Self::default();
        let registry = registry.sub_registry_with_label((
            Cow::Borrowed("controller_name"),
            Cow::Owned(controller_name.into()),
        ));
        registry.register_with_unit(
            "reconcile_duration",
            "reconcile duration",
            Unit::Seconds,
            metrics.duration.clone(),
        );
        registry.register(
            "reconcile_failures",
            "Number of reconciliation errors",
            metrics.failures.clone(),
        );
        registry.register(
            "reconcile_runs",
            "Number of reconciliations",
            metrics.runs.clone(),
        );
        metrics
    }

    pub fn count_failure<K>(&self, _k: &K, e: &Error)
    where
        K: ResourceExt<DynamicType = ()>,
    {
        self.failures
            .get_or_create(&ErrorLabels {
                resource: K::kind(&()).into_owned().to_lowercase(),
                error: e.metric_label(),
            })
            .inc();
    }

    pub fn count_and_measure<K>(&self, _k: &K) -> ReconcileMeasurer
    where
        K: ResourceExt<DynamicType = ()>,
    {
        self.runs
            .get_or_create(&ControllerLabels {
                resource: K::kind(&()).into_owned().to_lowercase(),
            })
            .inc();
        ReconcileMeasurer {
            start: Instant::now(),
            metric: self.duration.clone(),
        }
    }
}

pub struct ReconcileMeasurer {
    start: Instant,
    metric: Histogram,
}

impl Drop for ReconcileMeasurer {
    fn drop(&mut self) {
        self.metric.observe(self.start.elapsed().as_secs_f64());
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ControllerLabels {
    pub resource: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ErrorLabels {
    pub resource: String,
    pub error: String,
}
