//! Package recipe for Dawn, the cross-platform implementation of the WebGPU standard.
//!
//! This library fetches a pinned chromium-tagged revision of the upstream
//! Dawn repository, resolves a declarative set of feature toggles into the
//! cache variables of Dawn's CMake build and drives the external
//! configure/build/install steps.
//!
//! # How it works
//!
//! The heart of the crate is [`resolve`](resolve::resolve): a pure function
//! that translates [`RecipeOptions`](options::RecipeOptions) plus a detected
//! [`Platform`](platform::Platform) into the ordered list of build variables
//! handed to CMake. A toggle left unspecified emits no variable at all,
//! leaving the upstream build free to auto-detect; a fixed suppression set
//! (tests, samples, command line tools) is always forced off.
//!
//! Everything around the resolver is a thin, typed wrapper over the external
//! tools (`git`, `cmake`) that do the actual work, plus the
//! [cache layout](cache) the fetched and built trees live in.

pub mod cache;
pub mod cmake;
pub mod command;
pub mod options;
pub mod package;
pub mod platform;
pub mod resolve;
pub mod source;
