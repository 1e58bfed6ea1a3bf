//! The pinned upstream source of Dawn and the git fetch step.
//!
//! The recipe never floats: every fetch clones exactly one chromium release
//! tag, shallow and blob-filtered, and pins the checkout to that tag. The
//! fetch itself is a pass-through to `git`; building the invocation is kept
//! separate from running it so the pinning can be tested without a network.

use core::fmt::{self, Display};
use std::{
    fs, io,
    path::{Path, PathBuf},
    process::Command,
};

use crate::{
    cache::{CacheDirError, ReleaseLayout},
    command::{run_tool, ToolError},
};

/// Upstream repository the recipe builds.
pub const DAWN_GIT_URL: &str = "https://dawn.googlesource.com/dawn";

/// Chromium release the recipe is pinned to by default.
pub const DEFAULT_RELEASE: &str = "7187";

/// A pinned upstream revision: repository URL plus chromium release number.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct UpstreamSource {
    /// Repository URL.
    pub url: String,
    /// Chromium release number, e.g. `"7187"`.
    pub release: String,
}

impl Default for UpstreamSource {
    #[inline]
    fn default() -> Self {
        Self::new(DAWN_GIT_URL, DEFAULT_RELEASE)
    }
}

impl Display for UpstreamSource {
    #[expect(
        clippy::min_ident_chars,
        reason = "It's a core library trait implementation"
    )]
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.url, self.tag())
    }
}

impl UpstreamSource {
    /// Creates a pinned source from a repository URL and release number.
    #[inline]
    #[must_use]
    pub fn new<U, R>(url: U, release: R) -> Self
    where
        U: Into<String>,
        R: Into<String>,
    {
        Self {
            url: url.into(),
            release: release.into(),
        }
    }

    /// The git tag the release is pinned to.
    #[inline]
    #[must_use]
    pub fn tag(&self) -> String {
        format!("chromium/{}", self.release)
    }

    /// Returns a string suitable to use as a directory name for this
    /// release, e.g. `chromium_7187`.
    #[inline]
    #[must_use]
    pub fn tag_dirname(&self) -> String {
        self.tag()
            .replace([std::path::MAIN_SEPARATOR, '\\', '/', '.', ':', '@'], "_")
    }

    /// Cache trees this release is fetched, built and packaged in.
    ///
    /// # Errors
    ///
    /// Fails if there is no cache directory available.
    #[inline]
    pub fn layout(&self) -> Result<ReleaseLayout, CacheDirError> {
        ReleaseLayout::new(&self.tag_dirname())
    }

    /// Returns `true` if `checkout` already contains a git checkout.
    #[inline]
    #[must_use]
    pub fn is_fetched(&self, checkout: &Path) -> bool {
        checkout.join(".git").exists()
    }

    /// Builds the `git clone` invocation for this release.
    ///
    /// Shallow, single-branch and blob-filtered: the checkout serves one
    /// build, not development on upstream.
    #[must_use]
    pub fn clone_command(&self, checkout: &Path) -> Command {
        let mut command = Command::new("git");
        command
            .arg("clone")
            .args(["--branch", &self.tag()])
            .args(["--single-branch", "--filter=blob:none", "--depth=1"])
            .arg(&self.url)
            .arg(checkout);
        command
    }

    /// Builds the `git checkout` invocation pinning the tag.
    #[must_use]
    pub fn checkout_command(&self, checkout: &Path) -> Command {
        let mut command = Command::new("git");
        command
            .arg("-C")
            .arg(checkout)
            .args(["checkout", &self.tag()]);
        command
    }

    /// Fetches the pinned release into `checkout`.
    ///
    /// An existing checkout is reused as-is. After a fresh clone the
    /// bundled `test` directory is removed; it is not part of the packaged
    /// artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout directory cannot be created or any
    /// of the `git` invocations fails.
    #[inline]
    pub fn fetch(&self, checkout: &Path) -> Result<(), FetchError> {
        if self.is_fetched(checkout) {
            log::info!("reusing existing checkout at '{}'", checkout.display());
            return Ok(());
        }

        if let Some(parent) = checkout.parent() {
            if let Err(source) = fs::create_dir_all(parent) {
                let checkout_dir = parent.to_path_buf();
                return Err(FetchError::CreateCheckoutDir {
                    checkout_dir,
                    source,
                });
            }
        }

        log::info!("cloning {self} into '{}'", checkout.display());
        run_tool(self.clone_command(checkout)).map_err(FetchError::Clone)?;
        run_tool(self.checkout_command(checkout)).map_err(FetchError::Checkout)?;

        let test_dir = checkout.join("test");
        if test_dir.is_dir() {
            log::debug!("removing bundled test data at '{}'", test_dir.display());
            fs::remove_dir_all(&test_dir)
                .map_err(|source| FetchError::RemoveTestDir { test_dir, source })?;
        }

        Ok(())
    }
}

/// An error indicating that fetching the pinned release failed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FetchError {
    /// Failed to create the parent of the checkout directory.
    #[error("failed to create checkout directory {checkout_dir}: {source}")]
    CreateCheckoutDir {
        /// Path to the directory we tried to create.
        checkout_dir: PathBuf,
        /// Source of the error.
        source: io::Error,
    },
    /// `git clone` of the pinned tag failed.
    #[error("failed to clone the pinned release: {0}")]
    Clone(#[source] ToolError),
    /// Pinning the checkout to the tag failed.
    #[error("failed to check out the pinned tag: {0}")]
    Checkout(#[source] ToolError),
    /// Failed to remove the bundled `test` directory.
    #[error("failed to remove bundled test directory {test_dir}: {source}")]
    RemoveTestDir {
        /// Path to the directory we tried to remove.
        test_dir: PathBuf,
        /// Source of the error.
        source: io::Error,
    },
}

#[expect(
    clippy::indexing_slicing,
    reason = "We don't need to be so strict in tests"
)]
#[cfg(test)]
mod test {
    use super::*;

    fn command_args(command: &Command) -> Vec<String> {
        command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test_log::test]
    fn tag_is_derived_from_release() {
        let source = UpstreamSource::default();
        assert_eq!(source.tag(), "chromium/7187");
        assert_eq!(source.url, DAWN_GIT_URL);
    }

    #[test_log::test]
    fn tag_dirname_sanity() {
        let source = UpstreamSource::new("https://example.com/dawn", "7187");
        assert_eq!(source.tag_dirname(), "chromium_7187");
    }

    #[test_log::test]
    fn clone_is_shallow_and_pinned() {
        let source = UpstreamSource::default();
        let args = command_args(&source.clone_command(Path::new("/tmp/dawn")));
        assert_eq!(args[0], "clone");
        assert!(args.contains(&"--branch".to_owned()));
        assert!(args.contains(&"chromium/7187".to_owned()));
        assert!(args.contains(&"--single-branch".to_owned()));
        assert!(args.contains(&"--filter=blob:none".to_owned()));
        assert!(args.contains(&"--depth=1".to_owned()));
        assert!(args.contains(&DAWN_GIT_URL.to_owned()));
    }

    #[test_log::test]
    fn checkout_pins_the_tag() {
        let source = UpstreamSource::default();
        let args = command_args(&source.checkout_command(Path::new("/tmp/dawn")));
        assert_eq!(args[args.len() - 2..], ["checkout", "chromium/7187"]);
    }

    #[test_log::test]
    fn fresh_directory_is_not_fetched() {
        let dir = tempfile::tempdir().unwrap();
        let source = UpstreamSource::default();
        assert!(!source.is_fetched(dir.path()));

        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        assert!(source.is_fetched(dir.path()));
    }
}
