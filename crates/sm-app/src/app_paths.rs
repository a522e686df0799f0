use std::path::PathBuf;

use sm_core::app_dirs::AppDirs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Node data directory (keystore, state store, localstore).
    pub storage_path: PathBuf,
    pub preferences_path: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    pub fn from_app_dirs(dirs: &AppDirs) -> Self {
        Self {
            storage_path: dirs.app_data_root.join("node"),
            preferences_path: dirs.app_data_root.join("preferences.json"),
            logs_dir: dirs.app_data_root.join("logs"),
        }
    }
}
