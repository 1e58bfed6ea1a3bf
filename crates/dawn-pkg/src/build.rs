//! `dawn-pkg build`, the configure and compile steps of the recipe.

use std::path::PathBuf;

use anyhow::Context as _;
use dawn_recipe::{cmake::CmakeBuild, options::RecipeOptions, platform::Platform, resolve::resolve};

use crate::{config, fetch::Fetch};

/// Fetch if needed, then configure and compile the build tree.
#[derive(Debug, Clone, clap::Parser, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Build {
    /// CLI args for fetching the upstream checkout.
    #[clap(flatten)]
    #[serde(flatten)]
    pub fetch: Fetch,

    /// Feature toggles of the recipe.
    #[clap(flatten)]
    #[serde(flatten)]
    pub options: RecipeOptions,

    /// `CMAKE_BUILD_TYPE` of the build tree.
    #[clap(long, default_value = "Release")]
    pub build_type: String,

    /// TOML file with recipe options; explicit flags win over it.
    ///
    /// Keys mirror the flags in snake case, e.g. `force_vulkan = true`.
    #[clap(long)]
    pub options_file: Option<PathBuf>,
}

impl Default for Build {
    #[inline]
    fn default() -> Self {
        Self {
            fetch: Fetch::default(),
            options: RecipeOptions::default(),
            build_type: "Release".to_owned(),
            options_file: None,
        }
    }
}

impl Build {
    /// Applies the options file between defaults and explicit flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the options file cannot be read or parsed.
    #[inline]
    pub fn merged(&self) -> anyhow::Result<Self> {
        config::with_options_file(self, self.options_file.as_deref())
    }

    /// Entrypoint; returns the compiled build tree.
    ///
    /// # Errors
    /// Any errors during execution, usually printed to the user
    #[inline]
    pub fn run(&self) -> anyhow::Result<CmakeBuild> {
        let merged = self.merged()?;
        log::debug!("building with final merged arguments: {merged:#?}");
        merged.execute()
    }

    /// Runs fetch, configure and compile with already-merged args.
    pub(crate) fn execute(&self) -> anyhow::Result<CmakeBuild> {
        let checkout_dir = self.fetch.run()?;
        let source = self.fetch.source();
        let layout = source.layout()?;

        let mut options = self.options.clone();
        options.normalize();
        let platform = Platform::host();
        let build_config = resolve(&options, platform);
        log::debug!(
            "resolved {} build variables for {platform}",
            build_config.len()
        );

        let canonical_checkout = dunce::canonicalize(&checkout_dir)
            .with_context(|| format!("checkout '{}' does not exist", checkout_dir.display()))?;
        let cmake = CmakeBuild::new(canonical_checkout, layout.build_dir, &self.build_type);

        crate::user_output!("Configuring Dawn {}\n", source.tag());
        cmake.configure(&build_config)?;
        crate::user_output!("Compiling Dawn {}\n", source.tag());
        cmake.build()?;
        Ok(cmake)
    }
}
