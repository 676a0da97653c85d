use std::path::PathBuf;
use worldmerge_kernel::KernelError;

/// Errors from reading saves and building or storing merge plans.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad region filename {name:?}: {reason}")]
    FilenameParse { name: String, reason: String },
    #[error("no region directory at {}", path.display())]
    MissingRegionDir { path: PathBuf },
    #[error("plan needs one listing per world: {worlds} worlds, {listings} listings")]
    PlanMismatch { worlds: usize, listings: usize },
    #[error(transparent)]
    Kernel(#[from] KernelError),
}
