/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Process-wide registry.
//!
//! A registry may be installed once; afterwards it is read-only for the rest
//! of the process.

use crate::registry::{RegistryState, SchemaRegistry};
use std::sync::OnceLock;
use tracing::info;
use triowire_core::RegistryError;

static GLOBAL: OnceLock<SchemaRegistry> = OnceLock::new();

/// Installs the process-wide registry.
///
/// # Errors
/// Returns `RegistryError::AlreadyInstalled` if a registry was installed
/// before.
pub fn install(registry: SchemaRegistry) -> Result<&'static SchemaRegistry, RegistryError> {
    let count = registry.len();
    GLOBAL
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    info!("schema registry installed with {} message types", count);
    GLOBAL.get().ok_or(RegistryError::AlreadyInstalled)
}

/// Returns the process-wide registry, if one is installed.
#[must_use]
pub fn global() -> Option<&'static SchemaRegistry> {
    GLOBAL.get()
}

/// Returns the state of the process-wide registry.
#[must_use]
pub fn state() -> RegistryState {
    if GLOBAL.get().is_some() {
        RegistryState::ReadOnly
    } else {
        RegistryState::Uninitialized
    }
}
