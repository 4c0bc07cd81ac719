use npd_operator_crds::security::SecurityContextConstraints;
use tracing::{debug, info, warn};

use crate::{ClusterStore, Error, Result, StoreError};

/// Adds `user` to the users of the named SecurityContextConstraints.
///
/// The SCC is never created here; it must already exist. Conflicting writes
/// are retried with a fresh read up to `attempts` times.
pub(crate) async fn ensure_scc_user<S: ClusterStore>(
    store: &S,
    scc_name: &str,
    user: &str,
    attempts: u32,
) -> Result<()> {
    let attempts = attempts.max(1);
    for attempt in 1..=attempts {
        let mut scc: SecurityContextConstraints = store
            .get(None, scc_name)
            .await
            .map_err(Error::apply("get securitycontextconstraints"))?;

        if !scc.add_user(user) {
            debug!("{} already in {} securitycontextconstraints", user, scc_name);
            return Ok(());
        }

        match store.update(&scc).await {
            Ok(_) => {
                info!("added {} to {} securitycontextconstraints", user, scc_name);
                return Ok(());
            }
            Err(StoreError::Conflict) => {
                warn!(
                    attempt,
                    "conflict adding {} to {} securitycontextconstraints", user, scc_name
                );
            }
            Err(source) => {
                return Err(Error::Apply {
                    action: "add user to securitycontextconstraints",
                    source,
                });
            }
        }
    }

    Err(Error::SccUpdateExhausted {
        scc: scc_name.into(),
        user: user.into(),
        attempts,
    })
}
