//! # SYLVAN Shared
//!
//! Plain-data math types used by every generator crate.
//!
//! ## RULE
//!
//! Types only. Nothing in here knows about grammars, nodes or volumes.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod math;

pub use math::{Mat3, NodePos, Vec3};
