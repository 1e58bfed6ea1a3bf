//! The declarative option set of the recipe.
//!
//! Backend, sanitizer and windowing toggles are tri-state: next to the two
//! explicit boolean states there is [`Unspecified`](TriState::Unspecified),
//! which defers to the platform defaulting rules or, failing those, emits no
//! build variable at all.

use core::fmt::{self, Display};

/// A configuration toggle with an explicit "let the defaults decide" state.
///
/// Deliberately a three-value enumeration rather than an `Option<bool>`, so
/// that the "omit the variable" branch is a first-class code path.
///
/// Serialized as a plain boolean; [`Unspecified`](Self::Unspecified) maps to
/// null and deserializes from null or an absent field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[expect(clippy::exhaustive_enums, reason = "the three states are the point")]
pub enum TriState {
    /// The toggle is explicitly enabled.
    True,
    /// The toggle is explicitly disabled.
    False,
    /// No explicit value was given; defaulting rules or omission apply.
    #[default]
    Unspecified,
}

impl TriState {
    /// Returns the explicit boolean value, or [`None`] when unspecified.
    #[inline]
    #[expect(clippy::must_use_candidate, reason = "cheap and `Copy`")]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            Self::Unspecified => None,
        }
    }

    /// Returns `true` if no explicit value was given.
    #[inline]
    #[expect(clippy::must_use_candidate, reason = "cheap and `Copy`")]
    pub const fn is_unspecified(self) -> bool {
        matches!(self, Self::Unspecified)
    }
}

impl From<bool> for TriState {
    #[inline]
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}

impl From<Option<bool>> for TriState {
    #[inline]
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unspecified, Self::from)
    }
}

impl Display for TriState {
    #[expect(
        clippy::min_ident_chars,
        reason = "It's a core library trait implementation"
    )]
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::True => "true",
            Self::False => "false",
            Self::Unspecified => "unspecified",
        };
        f.write_str(text)
    }
}

impl serde::Serialize for TriState {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.as_bool() {
            Some(value) => serializer.serialize_bool(value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> serde::Deserialize<'de> for TriState {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let maybe = Option::<bool>::deserialize(deserializer)?;
        Ok(maybe.into())
    }
}

/// Identifies one tri-state toggle of [`RecipeOptions`].
///
/// Used by the defaulting rules and the translation table of
/// [`resolve`](crate::resolve::resolve) to address toggles by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(
    clippy::exhaustive_enums,
    reason = "the set of toggles is fixed per recipe revision"
)]
pub enum Toggle {
    /// The Vulkan rendering backend.
    Vulkan,
    /// The Direct3D 12 rendering backend.
    D3d12,
    /// The Metal rendering backend.
    Metal,
    /// The Direct3D 11 rendering backend.
    D3d11,
    /// The null (headless stub) rendering backend.
    Null,
    /// The desktop OpenGL rendering backend.
    DesktopGl,
    /// The OpenGL ES rendering backend.
    OpenGles,
    /// AddressSanitizer instrumentation.
    Asan,
    /// ThreadSanitizer instrumentation.
    Tsan,
    /// MemorySanitizer instrumentation.
    Msan,
    /// UndefinedBehaviorSanitizer instrumentation.
    Ubsan,
    /// Wayland windowing support.
    Wayland,
    /// X11 windowing support.
    X11,
    /// GLFW windowing support.
    Glfw,
    /// Use the DXC compiler built from the checkout instead of a system one.
    BuiltDxc,
}

/// The declarative option set of the recipe.
///
/// Unset tri-state fields are equivalent to
/// [`Unspecified`](TriState::Unspecified). The resolver never rejects a
/// value; validation is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::Parser))]
#[serde(default)]
#[non_exhaustive]
pub struct RecipeOptions {
    /// Link the packaged artifact as a shared library.
    #[cfg_attr(feature = "clap", clap(long))]
    pub shared: bool,

    /// Build position independent code.
    ///
    /// Irrelevant when `shared` is set; [`normalize`](Self::normalize)
    /// clears it in that case.
    #[cfg_attr(
        feature = "clap",
        clap(long = "no-fpic", default_value = "true", action = clap::ArgAction::SetFalse)
    )]
    pub fpic: bool,

    /// Force the Vulkan backend on or off.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub force_vulkan: TriState,

    /// Force the Direct3D 12 backend on or off.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub force_d3d12: TriState,

    /// Force the Metal backend on or off.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub force_metal: TriState,

    /// Force the Direct3D 11 backend on or off.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub force_d3d11: TriState,

    /// Force the null backend on or off.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub force_null: TriState,

    /// Force the desktop OpenGL backend on or off.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub force_desktop_gl: TriState,

    /// Force the OpenGL ES backend on or off.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub force_opengles: TriState,

    /// Force AddressSanitizer instrumentation on or off.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub force_asan: TriState,

    /// Force ThreadSanitizer instrumentation on or off.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub force_tsan: TriState,

    /// Force MemorySanitizer instrumentation on or off.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub force_msan: TriState,

    /// Force UndefinedBehaviorSanitizer instrumentation on or off.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub force_ubsan: TriState,

    /// Force Wayland windowing support on or off.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub force_wayland: TriState,

    /// Force X11 windowing support on or off.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub force_x11: TriState,

    /// Force GLFW windowing support on or off.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub force_glfw: TriState,

    /// Use the DXC compiler built from the checkout.
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t))]
    pub use_built_dxc: TriState,
}

impl Default for RecipeOptions {
    #[inline]
    fn default() -> Self {
        Self {
            shared: false,
            fpic: true,
            force_vulkan: TriState::Unspecified,
            force_d3d12: TriState::Unspecified,
            force_metal: TriState::Unspecified,
            force_d3d11: TriState::Unspecified,
            force_null: TriState::Unspecified,
            force_desktop_gl: TriState::Unspecified,
            force_opengles: TriState::Unspecified,
            force_asan: TriState::Unspecified,
            force_tsan: TriState::Unspecified,
            force_msan: TriState::Unspecified,
            force_ubsan: TriState::Unspecified,
            force_wayland: TriState::Unspecified,
            force_x11: TriState::Unspecified,
            force_glfw: TriState::Unspecified,
            use_built_dxc: TriState::Unspecified,
        }
    }
}

impl RecipeOptions {
    /// Returns the value of the given tri-state toggle.
    #[inline]
    #[expect(clippy::must_use_candidate, reason = "cheap and `Copy`")]
    pub const fn toggle(&self, toggle: Toggle) -> TriState {
        match toggle {
            Toggle::Vulkan => self.force_vulkan,
            Toggle::D3d12 => self.force_d3d12,
            Toggle::Metal => self.force_metal,
            Toggle::D3d11 => self.force_d3d11,
            Toggle::Null => self.force_null,
            Toggle::DesktopGl => self.force_desktop_gl,
            Toggle::OpenGles => self.force_opengles,
            Toggle::Asan => self.force_asan,
            Toggle::Tsan => self.force_tsan,
            Toggle::Msan => self.force_msan,
            Toggle::Ubsan => self.force_ubsan,
            Toggle::Wayland => self.force_wayland,
            Toggle::X11 => self.force_x11,
            Toggle::Glfw => self.force_glfw,
            Toggle::BuiltDxc => self.use_built_dxc,
        }
    }

    /// Returns a mutable reference to the given tri-state toggle.
    #[inline]
    pub fn toggle_mut(&mut self, toggle: Toggle) -> &mut TriState {
        match toggle {
            Toggle::Vulkan => &mut self.force_vulkan,
            Toggle::D3d12 => &mut self.force_d3d12,
            Toggle::Metal => &mut self.force_metal,
            Toggle::D3d11 => &mut self.force_d3d11,
            Toggle::Null => &mut self.force_null,
            Toggle::DesktopGl => &mut self.force_desktop_gl,
            Toggle::OpenGles => &mut self.force_opengles,
            Toggle::Asan => &mut self.force_asan,
            Toggle::Tsan => &mut self.force_tsan,
            Toggle::Msan => &mut self.force_msan,
            Toggle::Ubsan => &mut self.force_ubsan,
            Toggle::Wayland => &mut self.force_wayland,
            Toggle::X11 => &mut self.force_x11,
            Toggle::Glfw => &mut self.force_glfw,
            Toggle::BuiltDxc => &mut self.use_built_dxc,
        }
    }

    /// Drops option combinations that make no sense together.
    ///
    /// A shared artifact is position independent by construction, so `fpic`
    /// is cleared when `shared` is set.
    #[inline]
    pub fn normalize(&mut self) {
        if self.shared {
            self.fpic = false;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_log::test]
    fn tri_state_from_bool() {
        assert_eq!(TriState::from(true), TriState::True);
        assert_eq!(TriState::from(false), TriState::False);
        assert_eq!(TriState::from(None), TriState::Unspecified);
        assert_eq!(TriState::from(Some(true)), TriState::True);
    }

    #[test_log::test]
    fn tri_state_serializes_as_bool_or_null() {
        assert_eq!(serde_json::to_value(TriState::True).unwrap(), true);
        assert_eq!(serde_json::to_value(TriState::False).unwrap(), false);
        assert_eq!(
            serde_json::to_value(TriState::Unspecified).unwrap(),
            serde_json::Value::Null
        );
    }

    #[test_log::test]
    fn tri_state_deserializes_from_bool_or_null() {
        assert_eq!(
            serde_json::from_str::<TriState>("true").unwrap(),
            TriState::True
        );
        assert_eq!(
            serde_json::from_str::<TriState>("false").unwrap(),
            TriState::False
        );
        assert_eq!(
            serde_json::from_str::<TriState>("null").unwrap(),
            TriState::Unspecified
        );
    }

    #[test_log::test]
    fn defaults_leave_all_toggles_unspecified() {
        let options = RecipeOptions::default();
        assert!(!options.shared);
        assert!(options.fpic);
        for toggle in [
            Toggle::Vulkan,
            Toggle::D3d12,
            Toggle::Metal,
            Toggle::D3d11,
            Toggle::Null,
            Toggle::DesktopGl,
            Toggle::OpenGles,
            Toggle::Asan,
            Toggle::Tsan,
            Toggle::Msan,
            Toggle::Ubsan,
            Toggle::Wayland,
            Toggle::X11,
            Toggle::Glfw,
            Toggle::BuiltDxc,
        ] {
            assert!(options.toggle(toggle).is_unspecified(), "{toggle:?}");
        }
    }

    #[test_log::test]
    fn missing_toml_fields_fall_back_to_defaults() {
        let options: RecipeOptions = serde_json::from_str("{\"force_metal\": true}").unwrap();
        assert_eq!(options.force_metal, TriState::True);
        assert_eq!(options.force_vulkan, TriState::Unspecified);
        assert!(options.fpic);
    }

    #[test_log::test]
    fn normalize_clears_fpic_for_shared_builds() {
        let mut options = RecipeOptions::default();
        options.shared = true;
        options.normalize();
        assert!(!options.fpic);

        let mut untouched = RecipeOptions::default();
        untouched.normalize();
        assert!(untouched.fpic);
    }

    #[cfg(feature = "clap")]
    #[test_log::test]
    fn tri_state_flags_parse_from_cli() {
        use clap::Parser as _;

        let options = RecipeOptions::parse_from([
            "dawn-pkg",
            "--force-vulkan",
            "true",
            "--force-asan",
            "false",
            "--no-fpic",
        ]);
        assert_eq!(options.force_vulkan, TriState::True);
        assert_eq!(options.force_asan, TriState::False);
        assert_eq!(options.force_metal, TriState::Unspecified);
        assert!(!options.fpic);
    }
}
