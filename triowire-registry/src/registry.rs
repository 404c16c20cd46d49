/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema registry.
//!
//! Registration happens on a [`RegistryBuilder`]; [`RegistryBuilder::build`]
//! freezes it into a [`SchemaRegistry`] that has no mutating API. Lookups by
//! message type dispatch to the shared [`Codec`].

use bytes::BytesMut;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use triowire_codec::{Codec, CodecConfig, RealtimeHeader};
use triowire_core::{DecodedRecord, MessageType, RegistryError, Result};
use triowire_schema::RecordSchema;

type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Lifecycle state of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryState {
    /// No schema has been registered.
    Uninitialized,
    /// Schemas are registered and more may be added.
    Populated,
    /// The registry is frozen.
    ReadOnly,
}

impl fmt::Display for RegistryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Populated => write!(f, "populated"),
            Self::ReadOnly => write!(f, "read-only"),
        }
    }
}

/// Builder that accepts schema registrations.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Registered schemas.
    schemas: HashMap<MessageType, Arc<RecordSchema>>,
    /// Codec configuration for the built registry.
    config: CodecConfig,
}

impl RegistryBuilder {
    /// Creates an empty builder with the default codec configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the codec configuration used by the built registry.
    #[must_use]
    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a schema under a message type.
    ///
    /// # Arguments
    /// * `key` - The message type, e.g. `"c1101"` or `"c1101OutBlock2"`
    /// * `schema` - The schema to dispatch to
    ///
    /// # Errors
    /// Returns `RegistryError::DuplicateKey` if the key is already
    /// registered, or `InvalidKey` if it is not a valid identifier.
    pub fn register(&mut self, key: &str, schema: Arc<RecordSchema>) -> RegistryResult<()> {
        let key: MessageType = key.parse()?;
        if self.schemas.contains_key(&key) {
            return Err(RegistryError::DuplicateKey {
                key: key.to_string(),
            });
        }
        debug!("registered {} ({} bytes)", key, schema.length());
        self.schemas.insert(key, schema);
        Ok(())
    }

    /// Registers a schema under its own name.
    ///
    /// # Errors
    /// Same as [`register`](Self::register).
    pub fn register_schema(&mut self, schema: Arc<RecordSchema>) -> RegistryResult<()> {
        let key = schema.name().to_string();
        self.register(&key, schema)
    }

    /// Returns true if a schema is registered under the key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        MessageType::new(key).is_some_and(|k| self.schemas.contains_key(&k))
    }

    /// Returns the number of registered schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> RegistryState {
        if self.schemas.is_empty() {
            RegistryState::Uninitialized
        } else {
            RegistryState::Populated
        }
    }

    /// Freezes the builder into a read-only registry.
    #[must_use]
    pub fn build(self) -> SchemaRegistry {
        debug!("schema registry frozen with {} message types", self.schemas.len());
        SchemaRegistry {
            schemas: self.schemas,
            codec: Codec::new(self.config),
        }
    }
}

/// Read-only mapping from message type to schema, with codec dispatch.
///
/// A registry is immutable and may be shared between threads.
#[derive(Debug)]
pub struct SchemaRegistry {
    /// Registered schemas.
    schemas: HashMap<MessageType, Arc<RecordSchema>>,
    /// Codec used for dispatch.
    codec: Codec,
}

impl SchemaRegistry {
    /// Returns the schema registered under a key.
    ///
    /// # Errors
    /// Returns `RegistryError::UnknownMessageType` if nothing is registered.
    pub fn schema(&self, key: &str) -> RegistryResult<&Arc<RecordSchema>> {
        MessageType::new(key)
            .and_then(|k| self.schemas.get(&k))
            .ok_or_else(|| RegistryError::UnknownMessageType {
                key: key.to_string(),
            })
    }

    /// Returns true if a schema is registered under the key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.schema(key).is_ok()
    }

    /// Returns the registered message types in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<MessageType> {
        let mut keys: Vec<_> = self.schemas.keys().copied().collect();
        keys.sort();
        keys
    }

    /// Returns the number of registered schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Returns the lifecycle state, which is always read-only.
    #[must_use]
    pub const fn state(&self) -> RegistryState {
        RegistryState::ReadOnly
    }

    /// Returns the codec used for dispatch.
    #[must_use]
    pub const fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Decodes a buffer with the schema registered under `key`.
    ///
    /// # Errors
    /// Returns `Error::Registry` for an unknown key, otherwise the decode
    /// error of the schema.
    pub fn decode(&self, key: &str, buf: &[u8]) -> Result<DecodedRecord> {
        let schema = self.schema(key)?;
        Ok(self.codec.decode(schema, buf)?)
    }

    /// Decodes a buffer of back-to-back records of the schema under `key`.
    ///
    /// # Errors
    /// Returns `Error::Registry` for an unknown key, otherwise the decode
    /// error of the schema.
    pub fn decode_array(&self, key: &str, buf: &[u8]) -> Result<Vec<DecodedRecord>> {
        let schema = self.schema(key)?;
        Ok(self.codec.decode_array(schema, buf)?)
    }

    /// Strips the realtime frame header and decodes the block under `key`.
    ///
    /// # Errors
    /// Returns `Error::Registry` for an unknown key, otherwise the decode
    /// error of the frame or the schema.
    pub fn decode_realtime(
        &self,
        key: &str,
        packet: &[u8],
    ) -> Result<(RealtimeHeader, DecodedRecord)> {
        let schema = self.schema(key)?;
        Ok(self.codec.decode_realtime(schema, packet)?)
    }

    /// Encodes a record with the schema registered under `key`.
    ///
    /// # Errors
    /// Returns `Error::Registry` for an unknown key, otherwise the encode
    /// error of the schema.
    pub fn encode(&self, key: &str, record: &DecodedRecord) -> Result<BytesMut> {
        let schema = self.schema(key)?;
        Ok(self.codec.encode(schema, record)?)
    }

    /// Encodes a record behind a realtime frame header.
    ///
    /// # Errors
    /// Same as [`encode`](Self::encode).
    pub fn encode_realtime(
        &self,
        key: &str,
        header: RealtimeHeader,
        record: &DecodedRecord,
    ) -> Result<BytesMut> {
        let schema = self.schema(key)?;
        Ok(self.codec.encode_realtime(schema, header, record)?)
    }
}
