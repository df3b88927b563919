//! Location of files written by the discovery core.
//!
//! The only files the crate writes are span exports. They go to an explicit
//! directory from the configuration when one is set, otherwise to a
//! per-user state directory.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CAMPUS_DISCOVERY_DATA_DIR";

/// Returns the directory for trace exports.
///
/// Resolution order:
/// 1. `$CAMPUS_DISCOVERY_DATA_DIR`
/// 2. `$XDG_STATE_HOME/campus-discovery`
/// 3. `$HOME/.local/state/campus-discovery`
/// 4. `./.campus-discovery` when no home directory is known
#[must_use]
pub fn get_data_dir() -> PathBuf {
    resolve_data_dir(
        std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
        std::env::var_os("XDG_STATE_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn resolve_data_dir(explicit: Option<PathBuf>, xdg_state: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit.filter(|dir| !dir.as_os_str().is_empty()) {
        return dir;
    }
    if let Some(state) = xdg_state.filter(|dir| dir.is_absolute()) {
        return state.join("campus-discovery");
    }
    home.filter(|dir| !dir.as_os_str().is_empty()).map_or_else(
        || PathBuf::from(".campus-discovery"),
        |home| home.join(".local").join("state").join("campus-discovery"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directory_wins() {
        let dir = resolve_data_dir(
            Some(PathBuf::from("/srv/discovery")),
            Some(PathBuf::from("/state")),
            Some(PathBuf::from("/home/ana")),
        );
        assert_eq!(dir, PathBuf::from("/srv/discovery"));
    }

    #[test]
    fn relative_xdg_state_is_ignored() {
        let dir = resolve_data_dir(None, Some(PathBuf::from("state")), Some(PathBuf::from("/home/ana")));
        assert_eq!(dir, PathBuf::from("/home/ana/.local/state/campus-discovery"));
    }

    #[test]
    fn falls_back_to_working_directory() {
        assert_eq!(resolve_data_dir(None, None, None), PathBuf::from(".campus-discovery"));
    }
}
