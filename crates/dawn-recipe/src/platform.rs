//! Detection of the build target platform.

use core::fmt::{self, Display};

/// The detected build target.
///
/// Only consulted to seed platform-sensitive toggles that were left
/// unspecified; it never overrides an explicit option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[expect(
    clippy::exhaustive_enums,
    reason = "the recipe only distinguishes these targets"
)]
pub enum Platform {
    /// Linux and other unix-likes without rules of their own.
    Linux,
    /// Apple macOS.
    Macos,
    /// Microsoft Windows.
    Windows,
}

impl Platform {
    /// Detects the platform this binary was built for.
    #[inline]
    #[expect(clippy::must_use_candidate, reason = "cheap and `Copy`")]
    pub const fn host() -> Self {
        if cfg!(target_os = "macos") {
            Self::Macos
        } else if cfg!(windows) {
            Self::Windows
        } else {
            Self::Linux
        }
    }
}

impl Display for Platform {
    #[expect(
        clippy::min_ident_chars,
        reason = "It's a core library trait implementation"
    )]
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linux => "Linux",
            Self::Macos => "Macos",
            Self::Windows => "Windows",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_log::test]
    fn host_matches_compile_target() {
        let host = Platform::host();
        if cfg!(target_os = "macos") {
            assert_eq!(host, Platform::Macos);
        } else if cfg!(windows) {
            assert_eq!(host, Platform::Windows);
        } else {
            assert_eq!(host, Platform::Linux);
        }
    }

    #[test_log::test]
    fn display_uses_recipe_spelling() {
        assert_eq!(Platform::Macos.to_string(), "Macos");
        assert_eq!(Platform::Linux.to_string(), "Linux");
        assert_eq!(Platform::Windows.to_string(), "Windows");
    }
}
