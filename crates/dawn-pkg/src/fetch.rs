//! `dawn-pkg fetch`, the source step of the recipe.

use std::path::PathBuf;

use dawn_recipe::source::{UpstreamSource, DAWN_GIT_URL, DEFAULT_RELEASE};

use crate::user_consent::ask_for_fetch_consent;

/// Fetch the pinned upstream checkout.
#[derive(Debug, Clone, clap::Parser, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Fetch {
    /// Upstream repository to clone.
    #[clap(long, default_value = DAWN_GIT_URL)]
    pub url: String,

    /// Chromium release to pin, e.g. "7187".
    #[clap(long, default_value = DEFAULT_RELEASE)]
    pub release: String,

    /// Skip the consent prompt before cloning.
    #[clap(long, short = 'y')]
    pub yes: bool,
}

impl Default for Fetch {
    #[inline]
    fn default() -> Self {
        Self {
            url: DAWN_GIT_URL.to_owned(),
            release: DEFAULT_RELEASE.to_owned(),
            yes: false,
        }
    }
}

impl Fetch {
    /// The pinned source selected by the flags.
    #[inline]
    #[must_use]
    pub fn source(&self) -> UpstreamSource {
        UpstreamSource::new(self.url.as_str(), self.release.as_str())
    }

    /// Entrypoint; returns the checkout directory.
    ///
    /// # Errors
    /// Any errors during execution, usually printed to the user
    #[inline]
    pub fn run(&self) -> anyhow::Result<PathBuf> {
        let source = self.source();
        let layout = source.layout()?;

        if !source.is_fetched(&layout.checkout_dir) {
            ask_for_fetch_consent(&source, self.yes)?;
            crate::user_output!("Fetching {source}\n");
        }
        source.fetch(&layout.checkout_dir)?;
        Ok(layout.checkout_dir)
    }
}
