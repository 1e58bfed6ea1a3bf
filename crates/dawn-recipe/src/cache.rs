//! Defines the on-disk cache layout of the recipe.

use std::path::PathBuf;

/// Returns path to the directory where all cached trees are located.
///
/// Possible values by OS are:
/// * Windows: `C:/users/<user>/AppData/Local/dawn-pkg`
/// * Mac: `~/Library/Caches/dawn-pkg`
/// * Linux: `~/.cache/dawn-pkg`
///
/// # Errors
///
/// Fails if there is no cache directory available.
#[inline]
pub fn cache_dir() -> Result<PathBuf, CacheDirError> {
    let dir = directories::BaseDirs::new()
        .ok_or(CacheDirError(()))?
        .cache_dir()
        .join("dawn-pkg");
    Ok(dir)
}

/// An error indicating that there is no cache directory available.
#[derive(Debug, Clone, thiserror::Error)]
#[error("could not find cache directory")]
pub struct CacheDirError(());

/// On-disk trees of a single pinned release inside the cache.
///
/// Each pipeline stage owns a subtree: `src/` holds the pristine upstream
/// checkout, `build/` the CMake build tree and `pkg/` the install prefix
/// the packaged artifact lands in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ReleaseLayout {
    /// Pristine upstream checkout.
    pub checkout_dir: PathBuf,
    /// CMake build tree.
    pub build_dir: PathBuf,
    /// Install prefix of the packaged artifact.
    pub package_dir: PathBuf,
}

impl ReleaseLayout {
    /// Computes the layout for the given sanitized tag dirname.
    ///
    /// # Errors
    ///
    /// Fails if there is no cache directory available.
    #[inline]
    pub fn new(tag_dirname: &str) -> Result<Self, CacheDirError> {
        let root = cache_dir()?;
        Ok(Self {
            checkout_dir: root.join("src").join(tag_dirname),
            build_dir: root.join("build").join(tag_dirname),
            package_dir: root.join("pkg").join(tag_dirname),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_log::test]
    fn layout_separates_pipeline_stages() {
        let layout = ReleaseLayout::new("chromium_7187").unwrap();
        assert!(layout.checkout_dir.ends_with("src/chromium_7187"));
        assert!(layout.build_dir.ends_with("build/chromium_7187"));
        assert!(layout.package_dir.ends_with("pkg/chromium_7187"));
        assert_ne!(layout.checkout_dir, layout.build_dir);
    }
}
