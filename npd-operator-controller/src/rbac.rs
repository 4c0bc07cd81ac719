use k8s_openapi::api::{
    core::v1::ServiceAccount,
    rbac::v1::{ClusterRoleBinding, RoleRef, Subject},
};
use kube::api::ObjectMeta;

pub const SERVICE_ACCOUNT_NAME: &str = "node-problem-detector";
pub const CLUSTER_ROLE_NAME: &str = "system:node-problem-detector";

pub fn service_account(namespace: &str) -> ServiceAccount {
    ServiceAccount {
        metadata: ObjectMeta {
            name: Some(SERVICE_ACCOUNT_NAME.into()),
            namespace: Some(namespace.into()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// User name the service account authenticates as.
pub fn service_account_user(namespace: &str) -> String {
    format!("system:serviceaccount:{namespace}:{SERVICE_ACCOUNT_NAME}")
}

/// ClusterRoleBindings are cluster-scoped, so the binding for each namespace
/// is suffixed with a hash of the namespace. Two namespaces hashing to the
/// same value would share one binding; that risk is accepted.
pub fn cluster_role_binding_name(namespace: &str) -> String {
    format!("{CLUSTER_ROLE_NAME}-{}", fnv1a_32(namespace.as_bytes()))
}

pub fn cluster_role_binding(namespace: &str) -> ClusterRoleBinding {
    ClusterRoleBinding {
        metadata: ObjectMeta {
            name: Some(cluster_role_binding_name(namespace)),
            ..Default::default()
        },
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".into(),
            kind: "ClusterRole".into(),
            name: CLUSTER_ROLE_NAME.into(),
        },
        subjects: Some(vec![Subject {
            kind: "ServiceAccount".into(),
            name: SERVICE_ACCOUNT_NAME.into(),
            namespace: Some(namespace.into()),
            ..Default::default()
        }]),
    }
}

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, b| {
        (hash ^ u32::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_32_vectors() {
        assert_eq!(fnv1a_32(b""), 2166136261);
        assert_eq!(fnv1a_32(b"a"), 3826002220);
        assert_eq!(fnv1a_32(b"default"), 2470140894);
        assert_eq!(fnv1a_32(b"openshift-node-problem-detector"), 2200398493);
        assert_eq!(fnv1a_32(b"kube-system"), 2725615454);
    }

    #[test]
    fn test_cluster_role_binding_name_is_deterministic() {
        assert_eq!(
            cluster_role_binding_name("openshift-node-problem-detector"),
            "system:node-problem-detector-2200398493"
        );
        assert_eq!(
            cluster_role_binding_name("monitoring"),
            cluster_role_binding_name("monitoring")
        );
        assert_ne!(
            cluster_role_binding_name("monitoring"),
            cluster_role_binding_name("kube-system")
        );
    }

    #[test]
    fn test_cluster_role_binding() {
        let crb = cluster_role_binding("ns-a");
        assert_eq!(crb.metadata.namespace, None);
        assert_eq!(crb.role_ref.kind, "ClusterRole");
        assert_eq!(crb.role_ref.name, CLUSTER_ROLE_NAME);
        let subjects = crb.subjects.expect("subjects");
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].kind, "ServiceAccount");
        assert_eq!(subjects[0].name, SERVICE_ACCOUNT_NAME);
        assert_eq!(subjects[0].namespace.as_deref(), Some("ns-a"));
    }

    #[test]
    fn test_service_account_user() {
        assert_eq!(
            service_account_user("openshift-node-problem-detector"),
            "system:serviceaccount:openshift-node-problem-detector:node-problem-detector"
        );
    }
}
