/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Codec entry point.
//!
//! [`Codec`] owns a [`CodecConfig`] and exposes every decode and encode
//! operation. Record-level errors are reported with paths that start at the
//! schema name (`c1101.c1101OutBlock2[3].price`).

use crate::config::CodecConfig;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::frame::RealtimeHeader;
use bytes::BytesMut;
use triowire_core::{DecodeError, DecodedRecord, EncodeError, FieldValue};
use triowire_schema::{FieldDescriptor, RecordSchema, RepeatingGroupDescriptor};

/// Fixed-width record codec.
///
/// A codec is immutable and may be shared between threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Creates a codec with the given configuration.
    #[must_use]
    pub const fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Returns a decoder bound to this codec's configuration.
    #[inline]
    #[must_use]
    pub const fn decoder(&self) -> Decoder<'_> {
        Decoder::new(&self.config)
    }

    /// Returns an encoder bound to this codec's configuration.
    #[inline]
    #[must_use]
    pub const fn encoder(&self) -> Encoder<'_> {
        Encoder::new(&self.config)
    }

    /// Decodes one record.
    ///
    /// # Arguments
    /// * `schema` - Layout of the record
    /// * `buf` - Exactly `schema.length()` bytes
    ///
    /// # Errors
    /// Returns `DecodeError::LengthMismatch` for a buffer of the wrong
    /// length, `MalformedField` for content that does not match its kind.
    pub fn decode(&self, schema: &RecordSchema, buf: &[u8]) -> Result<DecodedRecord, DecodeError> {
        self.decoder()
            .decode(schema, buf)
            .map_err(|e| e.within(schema.name()))
    }

    /// Decodes a buffer of back-to-back records of one schema.
    ///
    /// # Errors
    /// Returns `DecodeError::LengthMismatch` if the buffer length is not a
    /// multiple of the record length.
    pub fn decode_array(
        &self,
        schema: &RecordSchema,
        buf: &[u8],
    ) -> Result<Vec<DecodedRecord>, DecodeError> {
        self.decoder().decode_array(schema, buf)
    }

    /// Decodes the elements of a repeating group from a slice.
    ///
    /// # Errors
    /// Returns `DecodeError::TruncatedBuffer` if the slice is too short.
    pub fn decode_group(
        &self,
        group: &RepeatingGroupDescriptor,
        slice: &[u8],
    ) -> Result<Vec<DecodedRecord>, DecodeError> {
        self.decoder().decode_group(group, slice)
    }

    /// Decodes one scalar field.
    ///
    /// # Errors
    /// Returns `DecodeError::MalformedField` under the reject policy.
    pub fn decode_field(
        &self,
        field: &FieldDescriptor,
        bytes: &[u8],
    ) -> Result<FieldValue, DecodeError> {
        self.decoder().decode_field(field, bytes)
    }

    /// Strips the realtime frame header and decodes the block.
    ///
    /// # Arguments
    /// * `schema` - Layout of the block that follows the header
    /// * `packet` - The packet including its three-byte header
    ///
    /// # Errors
    /// Returns `DecodeError::FrameTooShort` if the packet is shorter than the
    /// header, otherwise the errors of [`decode`](Self::decode).
    pub fn decode_realtime(
        &self,
        schema: &RecordSchema,
        packet: &[u8],
    ) -> Result<(RealtimeHeader, DecodedRecord), DecodeError> {
        let (header, body) = RealtimeHeader::split(packet)?;
        let record = self.decode(schema, body)?;
        Ok((header, record))
    }

    /// Encodes one record.
    ///
    /// # Returns
    /// A buffer of exactly `schema.length()` bytes.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueTooWide`, `InvalidValue`, `MissingField`
    /// (strict mode), or `GroupCountMismatch`.
    pub fn encode(
        &self,
        schema: &RecordSchema,
        record: &DecodedRecord,
    ) -> Result<BytesMut, EncodeError> {
        self.encoder()
            .encode(schema, record)
            .map_err(|e| e.within(schema.name()))
    }

    /// Encodes one record behind a realtime frame header.
    ///
    /// # Errors
    /// Same as [`encode`](Self::encode).
    pub fn encode_realtime(
        &self,
        schema: &RecordSchema,
        header: RealtimeHeader,
        record: &DecodedRecord,
    ) -> Result<BytesMut, EncodeError> {
        let mut out = BytesMut::with_capacity(crate::frame::REALTIME_HEADER_LEN + schema.length());
        header.write_to(&mut out);
        self.encoder()
            .encode_into(schema, record, &mut out)
            .map_err(|e| e.within(schema.name()))?;
        Ok(out)
    }

    /// Encodes one scalar field.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueTooWide` or `InvalidValue`.
    pub fn encode_field(
        &self,
        field: &FieldDescriptor,
        value: &FieldValue,
    ) -> Result<BytesMut, EncodeError> {
        self.encoder().encode_field(field, value)
    }
}
