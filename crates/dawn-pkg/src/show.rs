//! `dawn-pkg show`, display values of interest.

use dawn_recipe::{
    cache::cache_dir, options::RecipeOptions, platform::Platform, resolve::resolve,
};

/// Show some useful values.
#[derive(Debug, clap::Parser)]
#[non_exhaustive]
pub struct Show {
    /// The value to show.
    #[clap(subcommand)]
    pub value: Value,
}

/// Values that can be shown.
#[derive(Debug, clap::Subcommand)]
#[non_exhaustive]
pub enum Value {
    /// Displays the root of the cache directory.
    CacheDir,

    /// Displays the detected host platform.
    Platform,

    /// Displays the build variables the given flags resolve to.
    Config(Box<ConfigArgs>),
}

/// Flags whose resolution is displayed by `show config`.
#[derive(Debug, clap::Parser)]
#[non_exhaustive]
pub struct ConfigArgs {
    /// Feature toggles of the recipe.
    #[clap(flatten)]
    pub options: RecipeOptions,

    /// Resolve for this platform instead of the host.
    #[clap(long, value_enum)]
    pub platform: Option<Platform>,
}

impl Show {
    /// Entrypoint
    ///
    /// # Errors
    /// Any errors during execution, usually printed to the user
    #[inline]
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.value {
            Value::CacheDir => {
                crate::user_output!("{}\n", cache_dir()?.display());
            }
            Value::Platform => {
                crate::user_output!("{}\n", Platform::host());
            }
            Value::Config(args) => {
                let mut options = args.options.clone();
                options.normalize();
                let platform = args.platform.unwrap_or_else(Platform::host);
                for variable in &resolve(&options, platform) {
                    crate::user_output!("{variable}\n");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use clap::Parser as _;
    use dawn_recipe::options::TriState;

    use super::*;

    #[test_log::test]
    fn show_config_accepts_a_platform_override() {
        let show = Show::parse_from(["dawn-pkg", "config", "--platform", "macos"]);
        if let Value::Config(args) = &show.value {
            assert_eq!(args.platform, Some(Platform::Macos));
            assert_eq!(args.options.force_metal, TriState::Unspecified);
        } else {
            panic!("was not a config value");
        }
    }
}
