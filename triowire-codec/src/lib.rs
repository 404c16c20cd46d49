/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # triowire Codec
//!
//! Schema-driven decoding and encoding of fixed-width records.
//!
//! This crate turns raw venue buffers into [`DecodedRecord`] values and back,
//! following the offsets and kinds recorded in a [`RecordSchema`].
//!
//! ## Features
//!
//! - **Strict lengths**: Buffers must match the schema length exactly
//! - **Blank-aware**: Blank fields decode to empty values, never to errors
//! - **CP949 text**: Venue text decoded with `encoding_rs`
//! - **Malformed-field policy**: Reject the record or keep the raw text
//! - **Realtime framing**: Three-byte realtime packet header handling
//!
//! [`DecodedRecord`]: triowire_core::DecodedRecord
//! [`RecordSchema`]: triowire_schema::RecordSchema

pub mod codec;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod frame;
pub mod scalar;
pub mod text;

pub use codec::Codec;
pub use config::{CodecConfig, MalformedPolicy};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use frame::{REALTIME_HEADER_LEN, RealtimeHeader};
pub use text::TextEncoding;
