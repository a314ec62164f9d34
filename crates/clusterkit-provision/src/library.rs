//! Library installation.

use clusterkit_client::{InstallLibraries, Library, WorkspaceApi};
use tracing::{error, info};

use crate::error::ProvisionResult;

/// Install one PyPI package on one cluster.
pub async fn install_library<A>(api: &A, cluster_id: &str, package_name: &str) -> ProvisionResult<()>
where
    A: WorkspaceApi + ?Sized,
{
    let request = InstallLibraries {
        cluster_id: cluster_id.to_string(),
        libraries: vec![Library::pypi(package_name)],
    };
    api.install_libraries(&request).await.inspect_err(|e| {
        error!(%cluster_id, package = %package_name, error = %e, "library installation failed");
    })?;
    info!(%cluster_id, package = %package_name, "library installed");
    Ok(())
}
