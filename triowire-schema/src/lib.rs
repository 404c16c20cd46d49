/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # triowire Schema
//!
//! Fixed-width record schemas for triowire.
//!
//! This crate provides:
//! - **Field descriptors**: Width, kind, and padding of each fixed-width field
//! - **Nested records**: Fixed-count repeating groups and embedded blocks
//! - **Record schemas**: Validated layouts that tile a record with no gaps
//! - **Schema builder**: Offsets computed from widths, with optional
//!   trailing attribute slots
//! - **Layout format**: A line-oriented table format for blocks and messages

pub mod builder;
pub mod field;
pub mod group;
pub mod layout;
pub mod record;

pub use builder::{AttributeLayout, SchemaBuilder};
pub use field::{FieldDescriptor, FieldKind, FillerDescriptor, MAX_SCALE, Padding};
pub use group::{EmbeddedBlock, RepeatingGroupDescriptor};
pub use layout::Layout;
pub use record::{Entry, RecordSchema};
