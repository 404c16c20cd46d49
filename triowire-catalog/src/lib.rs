/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # triowire Catalog
//!
//! The venue's message shapes, embedded at build time.
//!
//! The catalog is a layout document (see [`triowire_schema::Layout`]) holding
//! every input, output and realtime block together with the composite
//! transactions (`c1101`, `s4101`, ...) assembled from them. Blocks are
//! registered under their block name and transactions under their code.

use std::sync::Arc;
use tracing::debug;
use triowire_codec::CodecConfig;
use triowire_core::{Result, SchemaError};
use triowire_registry::{RegistryBuilder, SchemaRegistry};
use triowire_schema::Layout;

/// Layout text of the venue catalog.
pub const TRIO_LAYOUT: &str = include_str!("../layouts/trio.layout");

/// Parses the embedded catalog.
///
/// # Errors
/// Returns a `SchemaError` if the embedded layout is invalid.
pub fn layout() -> std::result::Result<Layout, SchemaError> {
    Layout::parse(TRIO_LAYOUT)
}

/// Registers every block and transaction of a layout.
///
/// # Returns
/// The number of registered schemas.
///
/// # Errors
/// Returns `Error::Registry` if a name is already registered.
pub fn register_layout(builder: &mut RegistryBuilder, layout: &Layout) -> Result<usize> {
    let mut count = 0;
    for schema in layout.schemas() {
        builder.register_schema(Arc::new(schema.clone()))?;
        count += 1;
    }
    debug!(
        "registered {} blocks and {} transactions",
        layout.blocks().len(),
        layout.messages().len()
    );
    Ok(count)
}

/// Builds a registry holding the whole catalog with the default codec
/// configuration.
///
/// # Errors
/// Returns `Error::Schema` if the embedded layout is invalid.
pub fn registry() -> Result<SchemaRegistry> {
    registry_with(CodecConfig::default())
}

/// Builds a registry holding the whole catalog.
///
/// # Errors
/// Returns `Error::Schema` if the embedded layout is invalid.
pub fn registry_with(config: CodecConfig) -> Result<SchemaRegistry> {
    let mut builder = RegistryBuilder::new().with_config(config);
    register_layout(&mut builder, &layout()?)?;
    Ok(builder.build())
}
