//! Icon path resolution against an extension's install root.

use crate::contribution::model::{Command, IconSpec, ThemableIcon};
use std::path::{Component, Path, PathBuf};

/// Resolves every icon path of `icon` against `root`.
///
/// The result always stays under `root`: root and prefix components of the
/// declared path are dropped and `..` never climbs above `root`.
pub fn resolve_icon(icon: IconSpec, root: &Path) -> IconSpec {
    match icon {
        IconSpec::Path(path) => IconSpec::Path(join_under_root(root, &path)),
        IconSpec::Themable(ThemableIcon { dark, light }) => IconSpec::Themable(ThemableIcon {
            dark: join_under_root(root, &dark),
            light: join_under_root(root, &light),
        }),
    }
}

fn join_under_root(root: &Path, declared: &Path) -> PathBuf {
    // Why: `Path::join` discards `root` for absolute input, and icon paths
    // come from third-party manifests; keep only segments relative to root.
    let mut relative = PathBuf::new();
    for component in declared.components() {
        match component {
            Component::Normal(segment) => relative.push(segment),
            Component::ParentDir => {
                relative.pop();
            }
            Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
        }
    }
    root.join(relative)
}

/// Returns `command` with its icon rooted at `root`; other fields are untouched.
pub fn normalize_command(mut command: Command, root: &Path) -> Command {
    command.icon = command.icon.map(|icon| resolve_icon(icon, root));
    command
}
