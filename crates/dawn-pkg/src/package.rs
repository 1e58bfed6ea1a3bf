//! `dawn-pkg package`, the install and describe steps of the recipe.

use std::path::PathBuf;

use dawn_recipe::package::PackageManifest;

use crate::build::Build;

/// Build, install into the package prefix and write the manifest.
#[derive(Debug, Clone, Default, clap::Parser, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Package {
    /// CLI args for building the release.
    #[clap(flatten)]
    #[serde(flatten)]
    pub build: Build,
}

impl Package {
    /// Entrypoint; returns the path of the written manifest.
    ///
    /// # Errors
    /// Any errors during execution, usually printed to the user
    #[inline]
    pub fn run(&self) -> anyhow::Result<PathBuf> {
        let merged = self.build.merged()?;
        log::debug!("packaging with final merged arguments: {merged:#?}");
        let cmake = merged.execute()?;

        let source = merged.fetch.source();
        let layout = source.layout()?;
        crate::user_output!(
            "Installing Dawn {} into '{}'\n",
            source.tag(),
            layout.package_dir.display()
        );
        cmake.install(&layout.package_dir)?;

        let mut options = merged.options.clone();
        options.normalize();
        let manifest =
            PackageManifest::from_prefix(&source.release, options.shared, &layout.package_dir)?;
        let path = manifest.write(&layout.package_dir)?;
        crate::user_output!(
            "Packaged Dawn {} as CMake target `{}`\n",
            source.tag(),
            manifest.cmake_target_name
        );
        Ok(path)
    }
}
