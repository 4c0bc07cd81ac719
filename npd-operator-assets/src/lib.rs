/// Files shipped to the node-problem-detector daemon through ConfigMaps.
///
/// Contents are compiled into the binary, so every variant always resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Asset {
    DockerMonitor,
    KernelMonitor,
    KubeletMonitor,
    FileExistenceMonitor,
    KubeletHealth,
    CheckFileExistence,
}

pub const MONITOR_CONFIGS: [Asset; 4] = [
    Asset::DockerMonitor,
    Asset::KernelMonitor,
    Asset::KubeletMonitor,
    Asset::FileExistenceMonitor,
];

pub const PLUGIN_SCRIPTS: [Asset; 2] = [Asset::KubeletHealth, Asset::CheckFileExistence];

pub const ALL: [Asset; 6] = [
    Asset::DockerMonitor,
    Asset::KernelMonitor,
    Asset::KubeletMonitor,
    Asset::FileExistenceMonitor,
    Asset::KubeletHealth,
    Asset::CheckFileExistence,
];

impl Asset {
    /// Bundle path the asset is addressed by.
    pub const fn key(self) -> &'static str {
        match self {
            Asset::DockerMonitor => "assets/configs/journald/docker_monitor.json",
            Asset::KernelMonitor => "assets/configs/journald/kernel_monitor.json",
            Asset::KubeletMonitor => "assets/configs/custom/kubelet_monitor.json",
            Asset::FileExistenceMonitor => "assets/configs/custom/file-existence-monitor.json",
            Asset::KubeletHealth => "assets/plugins/kubelet-health.sh",
            Asset::CheckFileExistence => "assets/plugins/check-file-existence.sh",
        }
    }

    /// Name of the entry inside the ConfigMap, which is also the file name
    /// the daemon sees under its mount path.
    pub const fn file_name(self) -> &'static str {
        match self {
            Asset::DockerMonitor => "docker-monitor.json",
            Asset::KernelMonitor => "kernel-monitor.json",
            Asset::KubeletMonitor => "kubelet-monitor.json",
            Asset::FileExistenceMonitor => "file-existence-monitor.json",
            Asset::KubeletHealth => "kubelet-health.sh",
            Asset::CheckFileExistence => "check-file-existence.sh",
        }
    }

    pub const fn contents(self) -> &'static str {
        match self {
            Asset::DockerMonitor => include_str!("../assets/configs/journald/docker_monitor.json"),
            Asset::KernelMonitor => include_str!("../assets/configs/journald/kernel_monitor.json"),
            Asset::KubeletMonitor => include_str!("../assets/configs/custom/kubelet_monitor.json"),
            Asset::FileExistenceMonitor => {
                include_str!("../assets/configs/custom/file-existence-monitor.json")
            }
            Asset::KubeletHealth => include_str!("../assets/plugins/kubelet-health.sh"),
            Asset::CheckFileExistence => include_str!("../assets/plugins/check-file-existence.sh"),
        }
    }
}
