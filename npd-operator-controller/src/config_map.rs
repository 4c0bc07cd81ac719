use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::ObjectMeta;
use npd_operator_assets::{Asset, MONITOR_CONFIGS, PLUGIN_SCRIPTS};

pub const CONFIG_MAP_NAME: &str = "node-problem-detector";
pub const PLUGINS_CONFIG_MAP_NAME: &str = "node-problem-detector-plugins";

/// Monitor definitions mounted at `/etc/npd`.
pub fn monitor_config_map(namespace: &str) -> ConfigMap {
    bundle(CONFIG_MAP_NAME, namespace, &MONITOR_CONFIGS)
}

/// Custom plugin scripts mounted at `/etc/npd-plugins`.
pub fn plugin_config_map(namespace: &str) -> ConfigMap {
    bundle(PLUGINS_CONFIG_MAP_NAME, namespace, &PLUGIN_SCRIPTS)
}

fn bundle(name: &str, namespace: &str, assets: &[Asset]) -> ConfigMap {
    let data: BTreeMap<String, String> = assets
        .iter()
        .map(|a| (a.file_name().to_string(), a.contents().to_string()))
        .collect();

    ConfigMap {
        metadata: ObjectMeta {
            name: Some(name.into()),
            namespace: Some(namespace.into()),
            ..Default::default()
        },
        data: Some(data),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(cm: &ConfigMap) -> Vec<&str> {
        cm.data
            .as_ref()
            .map(|d| d.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_monitor_config_map() {
        let cm = monitor_config_map("ns-a");
        assert_eq!(cm.metadata.name.as_deref(), Some(CONFIG_MAP_NAME));
        assert_eq!(cm.metadata.namespace.as_deref(), Some("ns-a"));
        assert_eq!(
            keys(&cm),
            vec![
                "docker-monitor.json",
                "file-existence-monitor.json",
                "kernel-monitor.json",
                "kubelet-monitor.json",
            ]
        );
        let data = cm.data.as_ref().expect("data");
        assert_eq!(data["kernel-monitor.json"], Asset::KernelMonitor.contents());
    }

    #[test]
    fn test_plugin_config_map() {
        let cm = plugin_config_map("ns-a");
        assert_eq!(cm.metadata.name.as_deref(), Some(PLUGINS_CONFIG_MAP_NAME));
        assert_eq!(
            keys(&cm),
            vec!["check-file-existence.sh", "kubelet-health.sh"]
        );
    }
}
