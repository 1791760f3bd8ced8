//! Default local-path visibility rules.

use std::path::{Path, PathBuf};

use nb_core::VisibilityPredicate;

/// Filesystem predicate that hides dotfiles and anything outside the
/// configured root. A rejected path must be indistinguishable from a
/// missing one, so callers answer 404 either way.
pub struct FsVisibility {
    root: PathBuf,
}

impl FsVisibility {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl VisibilityPredicate for FsVisibility {
    fn can_show(&self, absolute_path: &Path) -> bool {
        let Ok(root) = self.root.canonicalize() else {
            return false;
        };
        // Canonicalization fails for missing paths, which is the same
        // verdict as hidden ones.
        let Ok(resolved) = absolute_path.canonicalize() else {
            return false;
        };
        let Ok(relative) = resolved.strip_prefix(&root) else {
            return false;
        };
        !relative
            .components()
            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
    }
}
