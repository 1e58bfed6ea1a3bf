//! Driving the external CMake configure → build → install steps.
//!
//! The three steps are sequential and opaque: each one must succeed before
//! the next starts, failures surface verbatim, and the recipe never
//! interprets CMake's output. The resolved [`BuildConfig`] enters the build
//! exclusively through the configure invocation.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::Command,
};

use crate::{
    command::{run_tool, ToolError},
    resolve::BuildConfig,
};

/// CMake generator used for all builds.
pub const GENERATOR: &str = "Ninja";

/// A CMake build tree bound to a source checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CmakeBuild {
    /// Source checkout to configure.
    pub source_dir: PathBuf,
    /// Build tree the generator writes into.
    pub build_dir: PathBuf,
    /// `CMAKE_BUILD_TYPE` of the tree.
    pub build_type: String,
}

impl CmakeBuild {
    /// Binds a build tree to a source checkout.
    #[inline]
    #[must_use]
    pub fn new<S, B, T>(source_dir: S, build_dir: B, build_type: T) -> Self
    where
        S: Into<PathBuf>,
        B: Into<PathBuf>,
        T: Into<String>,
    {
        Self {
            source_dir: source_dir.into(),
            build_dir: build_dir.into(),
            build_type: build_type.into(),
        }
    }

    /// Builds the configure invocation carrying the resolved variables.
    #[must_use]
    pub fn configure_command(&self, config: &BuildConfig) -> Command {
        let mut command = Command::new("cmake");
        command
            .arg("-S")
            .arg(&self.source_dir)
            .arg("-B")
            .arg(&self.build_dir)
            .args(["-G", GENERATOR])
            .arg(format!("-DCMAKE_BUILD_TYPE={}", self.build_type));
        for variable in config {
            command.arg(format!("-D{variable}"));
        }
        command
    }

    /// Builds the compile invocation.
    #[must_use]
    pub fn build_command(&self) -> Command {
        let mut command = Command::new("cmake");
        command.arg("--build").arg(&self.build_dir);
        command
    }

    /// Builds the install invocation for the given prefix.
    #[must_use]
    pub fn install_command(&self, prefix: &Path) -> Command {
        let mut command = Command::new("cmake");
        command
            .arg("--install")
            .arg(&self.build_dir)
            .arg("--prefix")
            .arg(prefix);
        command
    }

    /// Configures the build tree with the resolved variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the build tree cannot be created or the
    /// configure step fails.
    #[inline]
    pub fn configure(&self, config: &BuildConfig) -> Result<(), CmakeError> {
        if let Err(source) = fs::create_dir_all(&self.build_dir) {
            let build_dir = self.build_dir.clone();
            return Err(CmakeError::CreateBuildDir { build_dir, source });
        }
        log::info!(
            "configuring '{}' with {} cache variables",
            self.build_dir.display(),
            config.len()
        );
        run_tool(self.configure_command(config)).map_err(|source| CmakeError::Configure {
            build_dir: self.build_dir.clone(),
            source,
        })
    }

    /// Compiles the configured build tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the compile step fails.
    #[inline]
    pub fn build(&self) -> Result<(), CmakeError> {
        run_tool(self.build_command()).map_err(|source| CmakeError::Build {
            build_dir: self.build_dir.clone(),
            source,
        })
    }

    /// Installs the built artifacts into `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the install step fails.
    #[inline]
    pub fn install(&self, prefix: &Path) -> Result<(), CmakeError> {
        run_tool(self.install_command(prefix)).map_err(|source| CmakeError::Install {
            prefix: prefix.to_path_buf(),
            source,
        })
    }
}

/// An error indicating that one of the CMake steps failed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CmakeError {
    /// Failed to create the build tree directory.
    #[error("failed to create build directory {build_dir}: {source}")]
    CreateBuildDir {
        /// Path to the directory we tried to create.
        build_dir: PathBuf,
        /// Source of the error.
        source: io::Error,
    },
    /// The configure step failed.
    #[error("failed to configure build tree {build_dir}: {source}")]
    Configure {
        /// Path to the build tree.
        build_dir: PathBuf,
        /// Source of the error.
        source: ToolError,
    },
    /// The compile step failed.
    #[error("failed to compile build tree {build_dir}: {source}")]
    Build {
        /// Path to the build tree.
        build_dir: PathBuf,
        /// Source of the error.
        source: ToolError,
    },
    /// The install step failed.
    #[error("failed to install into {prefix}: {source}")]
    Install {
        /// Install prefix.
        prefix: PathBuf,
        /// Source of the error.
        source: ToolError,
    },
}

#[expect(
    clippy::indexing_slicing,
    reason = "We don't need to be so strict in tests"
)]
#[cfg(test)]
mod test {
    use super::*;

    use crate::{options::RecipeOptions, platform::Platform, resolve::resolve};

    fn command_args(command: &Command) -> Vec<String> {
        command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test_log::test]
    fn configure_carries_resolved_variables_in_order() {
        let config = resolve(&RecipeOptions::default(), Platform::Macos);
        let cmake = CmakeBuild::new("/src/dawn", "/build/dawn", "Release");
        let args = command_args(&cmake.configure_command(&config));

        assert!(args.contains(&"-G".to_owned()));
        assert!(args.contains(&GENERATOR.to_owned()));
        assert!(args.contains(&"-DCMAKE_BUILD_TYPE=Release".to_owned()));

        let defines: Vec<&String> = args
            .iter()
            .filter(|arg| arg.starts_with("-D") && !arg.starts_with("-DCMAKE_BUILD_TYPE"))
            .collect();
        let expected: Vec<String> = config
            .iter()
            .map(|variable| format!("-D{variable}"))
            .collect();
        assert_eq!(defines.len(), expected.len());
        for (actual, wanted) in defines.iter().zip(&expected) {
            assert_eq!(*actual, wanted);
        }
        assert!(expected.contains(&"-DDAWN_ENABLE_METAL=ON".to_owned()));
    }

    #[test_log::test]
    fn install_targets_the_prefix() {
        let cmake = CmakeBuild::new("/src/dawn", "/build/dawn", "Release");
        let args = command_args(&cmake.install_command(Path::new("/pkg/dawn")));
        assert_eq!(args[0], "--install");
        assert!(args.contains(&"--prefix".to_owned()));
        assert!(args.contains(&"/pkg/dawn".to_owned()));
    }

    #[test_log::test]
    fn build_addresses_the_tree() {
        let cmake = CmakeBuild::new("/src/dawn", "/build/dawn", "Debug");
        let args = command_args(&cmake.build_command());
        assert_eq!(args, ["--build", "/build/dawn"]);
    }
}
