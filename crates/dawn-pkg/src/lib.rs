//! Command line tool for building Dawn, the cross-platform implementation
//! of the WebGPU standard, from a pinned upstream release.
//!
//! The tool drives the full recipe pipeline: fetch the pinned chromium tag,
//! resolve the declarative feature toggles into CMake cache variables,
//! configure and compile the checkout, and finally install and describe the
//! packaged artifact.
//!
//! ## Where the trees are
//!
//! Checkouts, build trees and packaged artifacts are stored under the
//! [cache directory](dawn_recipe::cache::cache_dir), which path differs by
//! OS you are using.

pub mod build;
pub mod fetch;
pub mod package;
pub mod show;

mod config;
mod user_consent;

use self::{build::Build, fetch::Fetch, package::Package, show::Show};

/// Central function to write to the user.
#[macro_export]
macro_rules! user_output {
    ($($args: tt)*) => { {
        #[allow(
            clippy::allow_attributes,
            clippy::useless_attribute,
            unused_imports,
            reason = "`std::io::Write` is only sometimes called??"
        )]
        use ::std::io::Write as _;

        print!($($args)*);
        ::std::io::stdout().flush().ok();
    } }
}

/// All of the available subcommands for `dawn-pkg`
#[derive(clap::Subcommand)]
#[non_exhaustive]
pub enum Command {
    /// Fetch the pinned upstream checkout.
    Fetch(Box<Fetch>),

    /// Fetch if needed, then configure and compile the build tree.
    Build(Box<Build>),

    /// Build, install into the package prefix and write the manifest.
    Package(Box<Package>),

    /// Show some useful values.
    Show(Show),
}

impl Command {
    /// Runs the command
    ///
    /// # Errors
    /// Any errors during execution, usually printed to the user
    #[inline]
    pub fn run(&self) -> anyhow::Result<()> {
        match self {
            Self::Fetch(fetch) => {
                let checkout_dir = fetch.run()?;
                user_output!("Fetched into '{}'\n", checkout_dir.display());
            }
            Self::Build(build) => {
                build.run()?;
            }
            Self::Package(package) => {
                package.run()?;
            }
            Self::Show(show) => show.run()?,
        }
        Ok(())
    }
}

/// The struct representing the main CLI.
#[derive(clap::Parser)]
#[clap(author, version, about, subcommand_required = true)]
#[non_exhaustive]
pub struct Cli {
    /// The command to run.
    #[clap(subcommand)]
    pub command: Command,
}
