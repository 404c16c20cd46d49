/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # triowire Core
//!
//! Core values, keys, and error definitions for the triowire fixed-width
//! record codec.
//!
//! This crate provides the building blocks shared by every triowire crate:
//! - **Error types**: Stage-specific errors built with `thiserror`
//! - **Values**: `FieldValue`, `Value`, and the ordered `DecodedRecord`
//! - **Keys**: `MessageType`, the registry identifier of a record shape

pub mod error;
pub mod types;
pub mod value;

pub use error::{DecodeError, EncodeError, Error, RegistryError, Result, SchemaError};
pub use types::{MESSAGE_TYPE_MAX_LEN, MessageType};
pub use value::{DecodedRecord, FieldValue, Value};
