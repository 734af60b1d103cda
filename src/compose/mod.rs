//! Page composition.
//!
//! The [`Resolver`] is the only API the rendering layer depends on: given a
//! template identifier it returns the enabled sections, in order, each with
//! its renderer and verbatim properties.

pub mod resolver;

pub use resolver::{Resolution, ResolvedSection, Resolver};
