/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # triowire Registry
//!
//! Message-type registry and runtime dispatch.
//!
//! Schemas are registered on a [`RegistryBuilder`] and frozen into a
//! [`SchemaRegistry`], which resolves message types such as `"c1101"` or
//! `"c1101OutBlock2"` to their schema and dispatches decode and encode calls.
//!
//! ## Lifecycle
//!
//! - **Uninitialized**: Nothing registered
//! - **Populated**: The builder holds at least one schema
//! - **ReadOnly**: Frozen by [`RegistryBuilder::build`] or [`install`]

pub mod global;
pub mod registry;

pub use global::{global, install, state};
pub use registry::{RegistryBuilder, RegistryState, SchemaRegistry};
