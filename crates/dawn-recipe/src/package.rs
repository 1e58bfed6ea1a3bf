//! The consumer-facing description of the packaged artifact.
//!
//! After a successful install the recipe writes a small json manifest next
//! to the artifact. Consumers link against the fixed CMake target name
//! recorded there and never need to know the internal cache variable names.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Recipe name recorded in the manifest.
pub const RECIPE_NAME: &str = "dawn";

/// CMake target name consumers link against.
pub const CMAKE_TARGET_NAME: &str = "dawn::webgpu_dawn";

/// File name of the manifest written into the install prefix.
pub const MANIFEST_FILE_NAME: &str = "dawn-pkg.json";

/// Description of an installed package, serialized as the manifest.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct PackageManifest {
    /// Recipe name.
    pub name: String,
    /// Pinned chromium release.
    pub release: String,
    /// CMake target consumers link against.
    pub cmake_target_name: String,
    /// Whether the artifact is linked as a shared library.
    pub shared: bool,
    /// Library names found under the install prefix, sorted.
    pub libs: Vec<String>,
}

impl PackageManifest {
    /// Describes the install prefix of the given release.
    ///
    /// # Errors
    ///
    /// Returns an error if the libraries under the prefix cannot be listed.
    #[inline]
    pub fn from_prefix(release: &str, shared: bool, prefix: &Path) -> Result<Self, PackageError> {
        Ok(Self {
            name: RECIPE_NAME.to_owned(),
            release: release.to_owned(),
            cmake_target_name: CMAKE_TARGET_NAME.to_owned(),
            shared,
            libs: collect_libs(prefix)?,
        })
    }

    /// Writes the manifest into the install prefix, returning its path.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    #[inline]
    pub fn write(&self, prefix: &Path) -> Result<PathBuf, PackageError> {
        let path = prefix.join(MANIFEST_FILE_NAME);
        let json = serde_json::to_string_pretty(self).map_err(PackageError::Serialize)?;
        fs::write(&path, json).map_err(|source| PackageError::WriteManifest {
            path: path.clone(),
            source,
        })?;
        log::info!("wrote package manifest to '{}'", path.display());
        Ok(path)
    }
}

/// Collects the library names produced under `prefix`.
///
/// Platform lib prefixes and suffixes are stripped
/// (`libwebgpu_dawn.so` → `webgpu_dawn`); the result is sorted and deduped
/// so the manifest is deterministic. A prefix without a `lib` directory
/// yields an empty list.
///
/// # Errors
///
/// Returns an error if the `lib` directory exists but cannot be read.
#[inline]
pub fn collect_libs(prefix: &Path) -> Result<Vec<String>, PackageError> {
    let lib_dir = prefix.join("lib");
    if !lib_dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(&lib_dir).map_err(|source| PackageError::ReadLibDir {
        lib_dir: lib_dir.clone(),
        source,
    })?;

    let mut libs = Vec::new();
    for maybe_entry in entries {
        let entry = maybe_entry.map_err(|source| PackageError::ReadLibDir {
            lib_dir: lib_dir.clone(),
            source,
        })?;
        if let Some(lib) = lib_name(&entry.path()) {
            libs.push(lib);
        }
    }
    libs.sort();
    libs.dedup();
    Ok(libs)
}

/// Extracts a linkable library name from a file path, if it is one.
fn lib_name(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?;
    if !matches!(extension, "a" | "so" | "dylib" | "lib" | "dll") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    Some(stem.strip_prefix("lib").unwrap_or(stem).to_owned())
}

/// An error indicating that describing the installed package failed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PackageError {
    /// Failed to list the libraries under the install prefix.
    #[error("failed to read library directory {lib_dir}: {source}")]
    ReadLibDir {
        /// Path to the library directory.
        lib_dir: PathBuf,
        /// Source of the error.
        source: io::Error,
    },
    /// Failed to serialize the manifest.
    #[error("failed to serialize package manifest: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Failed to write the manifest file.
    #[error("failed to write package manifest {path}: {source}")]
    WriteManifest {
        /// Path to the manifest file.
        path: PathBuf,
        /// Source of the error.
        source: io::Error,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    fn prefix_with_libs(names: &[&str]) -> tempfile::TempDir {
        let prefix = tempfile::tempdir().unwrap();
        let lib_dir = prefix.path().join("lib");
        fs::create_dir_all(&lib_dir).unwrap();
        for name in names {
            fs::write(lib_dir.join(name), b"").unwrap();
        }
        prefix
    }

    #[test_log::test]
    fn libs_are_stripped_sorted_and_deduped() {
        let prefix = prefix_with_libs(&[
            "libwebgpu_dawn.so",
            "libwebgpu_dawn.a",
            "libabsl_strings.a",
            "cmake_install.cmake",
        ]);
        let libs = collect_libs(prefix.path()).unwrap();
        assert_eq!(libs, ["absl_strings", "webgpu_dawn"]);
    }

    #[test_log::test]
    fn windows_import_libs_are_collected() {
        let prefix = prefix_with_libs(&["webgpu_dawn.lib", "webgpu_dawn.dll"]);
        let libs = collect_libs(prefix.path()).unwrap();
        assert_eq!(libs, ["webgpu_dawn"]);
    }

    #[test_log::test]
    fn missing_lib_dir_yields_no_libs() {
        let prefix = tempfile::tempdir().unwrap();
        assert!(collect_libs(prefix.path()).unwrap().is_empty());
    }

    #[test_log::test]
    fn manifest_records_the_fixed_target_name() {
        let prefix = prefix_with_libs(&["libwebgpu_dawn.so"]);
        let manifest = PackageManifest::from_prefix("7187", true, prefix.path()).unwrap();
        assert_eq!(manifest.cmake_target_name, "dawn::webgpu_dawn");
        assert_eq!(manifest.name, "dawn");
        assert_eq!(manifest.release, "7187");
        assert!(manifest.shared);
        assert_eq!(manifest.libs, ["webgpu_dawn"]);
    }

    #[test_log::test]
    fn manifest_round_trips_through_json() {
        let prefix = prefix_with_libs(&["libwebgpu_dawn.so"]);
        let manifest = PackageManifest::from_prefix("7187", false, prefix.path()).unwrap();
        let path = manifest.write(prefix.path()).unwrap();
        assert!(path.ends_with(MANIFEST_FILE_NAME));

        let read: PackageManifest =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(read, manifest);
    }
}
