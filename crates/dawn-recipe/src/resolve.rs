//! Translation of [`RecipeOptions`] into the cache variables of Dawn's
//! CMake build.
//!
//! The policy, in resolution order:
//! * a fixed set of infrastructure variables is always emitted first,
//! * platform defaulting rules seed the platform-sensitive backend toggles
//!   that were left unspecified,
//! * every remaining toggle translates 1:1 to its cache variable, with
//!   unspecified toggles emitting nothing at all,
//! * a fixed suppression set (tests, samples, command line tools) is forced
//!   off last and is not exposed as an option.
//!
//! Emission order is insertion order and stable across calls; the external
//! build system does not care, but reproducible output does.

use core::fmt::{self, Display};

use crate::{
    options::{RecipeOptions, Toggle, TriState},
    platform::Platform,
};

/// A single name/value pair destined for the external build system.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct BuildVariable {
    /// Cache variable name, e.g. `DAWN_ENABLE_VULKAN`.
    pub name: String,
    /// Cache variable value, verbatim (`"ON"`, `"OFF"`, `"SHARED"`, ...).
    pub value: String,
}

impl Display for BuildVariable {
    #[expect(
        clippy::min_ident_chars,
        reason = "It's a core library trait implementation"
    )]
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// The ordered build variable mapping produced by [`resolve`].
///
/// Preserves insertion order. A variable that was never set is absent,
/// which downstream build logic treats differently from an explicit `OFF`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// The variables, in insertion order.
    variables: Vec<BuildVariable>,
}

impl BuildConfig {
    /// Sets `name` to `value`, keeping the original position if it was
    /// already set.
    fn set(&mut self, name: &str, value: &str) {
        if let Some(variable) = self
            .variables
            .iter_mut()
            .find(|variable| variable.name == name)
        {
            value.clone_into(&mut variable.value);
        } else {
            self.variables.push(BuildVariable {
                name: name.to_owned(),
                value: value.to_owned(),
            });
        }
    }

    /// Sets `name` to `"ON"` or `"OFF"`.
    fn set_enabled(&mut self, name: &str, enabled: bool) {
        self.set(name, if enabled { "ON" } else { "OFF" });
    }

    /// Returns the value of `name`, or [`None`] if the variable is absent.
    #[inline]
    #[expect(clippy::must_use_candidate, reason = "returns a reference")]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|variable| variable.name == name)
            .map(|variable| variable.value.as_str())
    }

    /// Iterates over the variables in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &BuildVariable> {
        self.variables.iter()
    }

    /// Number of emitted variables.
    #[inline]
    #[expect(clippy::must_use_candidate, reason = "cheap")]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if no variable was emitted.
    #[inline]
    #[expect(clippy::must_use_candidate, reason = "cheap")]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl<'config> IntoIterator for &'config BuildConfig {
    type Item = &'config BuildVariable;
    type IntoIter = core::slice::Iter<'config, BuildVariable>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}

/// Infrastructure variables emitted unconditionally, first, in this order.
const INFRASTRUCTURE: &[(&str, &str)] = &[
    ("CMAKE_POSITION_INDEPENDENT_CODE", "ON"),
    ("DAWN_BUILD_MONOLITHIC_LIBRARY", "SHARED"),
    ("DAWN_ENABLE_INSTALL", "ON"),
    ("DAWN_FETCH_DEPENDENCIES", "ON"),
];

/// 1:1 translation from toggles to cache variable names, in emission order.
const TOGGLE_VARIABLES: &[(Toggle, &str)] = &[
    (Toggle::Vulkan, "DAWN_ENABLE_VULKAN"),
    (Toggle::D3d12, "DAWN_ENABLE_D3D12"),
    (Toggle::Metal, "DAWN_ENABLE_METAL"),
    (Toggle::D3d11, "DAWN_ENABLE_D3D11"),
    (Toggle::Null, "DAWN_ENABLE_NULL"),
    (Toggle::DesktopGl, "DAWN_ENABLE_DESKTOP_GL"),
    (Toggle::OpenGles, "DAWN_ENABLE_OPENGLES"),
    (Toggle::Asan, "DAWN_ENABLE_ASAN"),
    (Toggle::Tsan, "DAWN_ENABLE_TSAN"),
    (Toggle::Msan, "DAWN_ENABLE_MSAN"),
    (Toggle::Ubsan, "DAWN_ENABLE_UBSAN"),
    (Toggle::Wayland, "DAWN_USE_WAYLAND"),
    (Toggle::X11, "DAWN_USE_X11"),
    (Toggle::Glfw, "DAWN_USE_GLFW"),
    (Toggle::BuiltDxc, "DAWN_USE_BUILT_DXC"),
];

/// Platform defaults applied to toggles that were left unspecified.
///
/// Evaluated in order, once, before the generic translation. New rules are
/// appended here; an explicit option value always wins over a rule.
const PLATFORM_DEFAULTS: &[(Platform, Toggle, bool)] = &[
    (Platform::Macos, Toggle::Vulkan, false),
    (Platform::Macos, Toggle::Metal, true),
];

/// Variables always forced off, deliberately not exposed as options.
const SUPPRESSED: &[&str] = &[
    "TINT_BUILD_SPV_READER",
    "TINT_BUILD_CMD_TOOLS",
    "TINT_BUILD_TESTS",
    "TINT_BUILD_IR_BINARY",
    "DAWN_BUILD_SAMPLES",
    "DAWN_BUILD_TESTS",
];

/// Resolves the declarative option set into the ordered build variable
/// mapping for the given platform.
///
/// Pure and deterministic: identical inputs produce identical output,
/// including order. Toggles left unspecified with no applicable platform
/// rule emit no variable, deferring to upstream auto-detection.
#[must_use]
#[inline]
pub fn resolve(options: &RecipeOptions, platform: Platform) -> BuildConfig {
    let mut config = BuildConfig::default();
    for &(name, value) in INFRASTRUCTURE {
        config.set(name, value);
    }

    let mut seeded = options.clone();
    for &(rule_platform, toggle, default) in PLATFORM_DEFAULTS {
        if rule_platform == platform && seeded.toggle(toggle).is_unspecified() {
            *seeded.toggle_mut(toggle) = TriState::from(default);
        }
    }

    for &(toggle, name) in TOGGLE_VARIABLES {
        if let Some(enabled) = seeded.toggle(toggle).as_bool() {
            config.set_enabled(name, enabled);
        }
    }

    for &name in SUPPRESSED {
        config.set_enabled(name, false);
    }

    config
}

#[expect(
    clippy::indexing_slicing,
    reason = "We don't need to be so strict in tests"
)]
#[cfg(test)]
mod test {
    use super::*;

    fn all_forced_on() -> RecipeOptions {
        let mut options = RecipeOptions::default();
        for &(toggle, _) in TOGGLE_VARIABLES {
            *options.toggle_mut(toggle) = TriState::True;
        }
        options
    }

    #[test_log::test]
    fn infrastructure_is_emitted_first_and_fixed() {
        let config = resolve(&RecipeOptions::default(), Platform::Linux);
        let names: Vec<&str> = config.iter().map(|variable| variable.name.as_str()).collect();
        assert_eq!(
            &names[..4],
            &[
                "CMAKE_POSITION_INDEPENDENT_CODE",
                "DAWN_BUILD_MONOLITHIC_LIBRARY",
                "DAWN_ENABLE_INSTALL",
                "DAWN_FETCH_DEPENDENCIES",
            ]
        );
        assert_eq!(config.get("DAWN_BUILD_MONOLITHIC_LIBRARY"), Some("SHARED"));
        assert_eq!(config.get("DAWN_FETCH_DEPENDENCIES"), Some("ON"));
    }

    #[test_log::test]
    fn unspecified_toggles_emit_nothing() {
        let config = resolve(&RecipeOptions::default(), Platform::Linux);
        for name in [
            "DAWN_ENABLE_ASAN",
            "DAWN_ENABLE_TSAN",
            "DAWN_ENABLE_MSAN",
            "DAWN_ENABLE_UBSAN",
            "DAWN_USE_WAYLAND",
            "DAWN_USE_X11",
            "DAWN_USE_GLFW",
            "DAWN_USE_BUILT_DXC",
        ] {
            assert_eq!(config.get(name), None, "{name} should be absent");
        }
    }

    #[test_log::test]
    fn macos_seeds_metal_over_vulkan() {
        let config = resolve(&RecipeOptions::default(), Platform::Macos);
        assert_eq!(config.get("DAWN_ENABLE_VULKAN"), Some("OFF"));
        assert_eq!(config.get("DAWN_ENABLE_METAL"), Some("ON"));
    }

    #[test_log::test]
    fn linux_has_no_backend_defaults() {
        let config = resolve(&RecipeOptions::default(), Platform::Linux);
        assert_eq!(config.get("DAWN_ENABLE_VULKAN"), None);
        assert_eq!(config.get("DAWN_ENABLE_METAL"), None);
    }

    #[test_log::test]
    fn explicit_value_beats_platform_default() {
        let mut options = RecipeOptions::default();
        options.force_vulkan = TriState::True;
        let config = resolve(&options, Platform::Macos);
        assert_eq!(config.get("DAWN_ENABLE_VULKAN"), Some("ON"));
        assert_eq!(config.get("DAWN_ENABLE_METAL"), Some("ON"));
    }

    #[test_log::test]
    fn suppressed_variables_are_always_off() {
        let config = resolve(&all_forced_on(), Platform::Macos);
        for name in SUPPRESSED {
            assert_eq!(config.get(name), Some("OFF"), "{name} must stay off");
        }
    }

    #[test_log::test]
    fn no_option_reaches_a_suppressed_variable() {
        // The translation table is the only path from an option to a
        // variable; no suppressed name may appear in it.
        for &(_, name) in TOGGLE_VARIABLES {
            assert!(!SUPPRESSED.contains(&name), "{name} must not be forceable");
        }
    }

    #[test_log::test]
    fn built_dxc_translates_verbatim() {
        let config = resolve(&RecipeOptions::default(), Platform::Windows);
        assert_eq!(config.get("DAWN_USE_BUILT_DXC"), None);

        let mut options = RecipeOptions::default();
        options.use_built_dxc = TriState::True;
        let config = resolve(&options, Platform::Windows);
        assert_eq!(config.get("DAWN_USE_BUILT_DXC"), Some("ON"));
    }

    #[test_log::test]
    fn resolution_is_idempotent_and_order_stable() {
        let options = all_forced_on();
        let first = resolve(&options, Platform::Macos);
        let second = resolve(&options, Platform::Macos);
        assert_eq!(first, second);

        let names: Vec<&str> = first.iter().map(|variable| variable.name.as_str()).collect();
        let suffix = &names[names.len() - SUPPRESSED.len()..];
        assert_eq!(suffix, SUPPRESSED, "suppressions are emitted last");
    }

    #[test_log::test]
    fn toggles_emit_in_table_order() {
        let config = resolve(&all_forced_on(), Platform::Linux);
        let names: Vec<&str> = config.iter().map(|variable| variable.name.as_str()).collect();
        let toggled = &names[INFRASTRUCTURE.len()..names.len() - SUPPRESSED.len()];
        let expected: Vec<&str> = TOGGLE_VARIABLES.iter().map(|&(_, name)| name).collect();
        assert_eq!(toggled, expected);
    }
}
