use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use npd_operator_controller::{
    DEFAULT_IMAGE, DEFAULT_SCC_UPDATE_ATTEMPTS, Settings, WorkloadSettings,
};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand, Debug)]
pub enum Commands {
    /// Run the NodeProblemDetector controller
    Controller(ControllerArgs),
    /// Print the NodeProblemDetector CustomResourceDefinition
    Crdgen,
}

#[derive(Parser, Debug, Clone)]
pub struct ControllerArgs {
    /// Metrics and readiness listener
    #[arg(long, env = "METRICS_ADDRESS", default_value = "0.0.0.0:9090")]
    pub metrics_address: SocketAddr,

    /// Only watch NodeProblemDetectors in this namespace
    #[arg(long, env = "WATCH_NAMESPACE")]
    pub namespace: Option<String>,

    /// node-problem-detector image run by the DaemonSet
    #[arg(long, env = "NPD_IMAGE", default_value = DEFAULT_IMAGE)]
    pub image: String,

    /// Octal file mode of the mounted plugin scripts
    #[arg(long, env = "PLUGIN_FILE_MODE", default_value = "0766", value_parser = parse_file_mode)]
    pub plugin_file_mode: i32,

    /// SecurityContextConstraints granting the daemon privileged execution
    #[arg(long, env = "SCC_NAME", default_value = "privileged")]
    pub scc_name: String,

    /// Attempts at adding the service account to the SCC on write conflicts
    #[arg(long, env = "SCC_UPDATE_ATTEMPTS", default_value_t = DEFAULT_SCC_UPDATE_ATTEMPTS)]
    pub scc_update_attempts: u32,
}

impl From<&ControllerArgs> for Settings {
    fn from(args: &ControllerArgs) -> Self {
        Settings {
            namespace: args.namespace.clone(),
            workload: WorkloadSettings {
                image: args.image.clone(),
                plugin_file_mode: args.plugin_file_mode,
            },
            scc_name: args.scc_name.clone(),
            scc_update_attempts: args.scc_update_attempts,
        }
    }
}

fn parse_file_mode(s: &str) -> Result<i32, String> {
    let digits = s.strip_prefix("0o").unwrap_or(s);
    let mode = i32::from_str_radix(digits, 8).map_err(|e| format!("invalid octal mode {s}: {e}"))?;
    if !(0..=0o777).contains(&mode) {
        return Err(format!("file mode {s} out of range"));
    }
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use npd_operator_controller::DEFAULT_PLUGIN_FILE_MODE;

    use super::*;

    #[test]
    fn test_parse_file_mode() {
        assert_eq!(parse_file_mode("0766"), Ok(0o766));
        assert_eq!(parse_file_mode("0o755"), Ok(0o755));
        assert_eq!(parse_file_mode("644"), Ok(0o644));
        assert!(parse_file_mode("0899").is_err());
        assert!(parse_file_mode("01777").is_err());
    }

    #[test]
    fn test_controller_defaults() {
        let cli = Cli::try_parse_from(["npd-operator", "controller"]).expect("parses");
        let Commands::Controller(args) = cli.command else {
            panic!("expected controller command");
        };
        let settings = Settings::from(&args);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.workload.plugin_file_mode, DEFAULT_PLUGIN_FILE_MODE);
        assert_eq!(args.metrics_address.port(), 9090);
    }

    #[test]
    fn test_controller_overrides() {
        let cli = Cli::try_parse_from([
            "npd-operator",
            "controller",
            "--namespace",
            "openshift-node-problem-detector",
            "--plugin-file-mode",
            "0755",
            "--scc-update-attempts",
            "2",
        ])
        .expect("parses");
        let Commands::Controller(args) = cli.command else {
            panic!("expected controller command");
        };
        let settings = Settings::from(&args);
        assert_eq!(
            settings.namespace.as_deref(),
            Some("openshift-node-problem-detector")
        );
        assert_eq!(settings.workload.plugin_file_mode, 0o755);
        assert_eq!(settings.scc_update_attempts, 2);
    }
}
