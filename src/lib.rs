//! Triliteral root-and-pattern morphology.
//!
//! Roots live in a height-balanced tree, schemes in a registry keyed by
//! name. A scheme turns the three letters of a root into a word; the
//! engine records every word it generates or validates against its root.
//!
//! Layers:
//! - `domain`: roots, patterns, schemes, the balanced root store
//! - `application`: the morphology engine and its thread-safe wrapper
//! - `infrastructure`: roots files, snapshot persistence, wiring
//! - `cli`: command line surface

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
