/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Realtime packet framing.
//!
//! Realtime ("sise") packets carry a three-byte prefix before the block
//! bytes: a two-byte packet type followed by a one-byte compression flag.

use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use triowire_core::DecodeError;

/// Length of the realtime frame header in bytes.
pub const REALTIME_HEADER_LEN: usize = 3;

/// Header of a realtime packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RealtimeHeader {
    /// Two-byte packet type.
    pub packet_type: [u8; 2],
    /// Compression flag byte.
    pub compression: u8,
}

impl RealtimeHeader {
    /// Creates a header for an uncompressed packet.
    #[must_use]
    pub const fn new(packet_type: [u8; 2]) -> Self {
        Self {
            packet_type,
            compression: b'0',
        }
    }

    /// Returns the packet type as text, if it is ASCII.
    #[must_use]
    pub fn packet_type_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.packet_type)
            .ok()
            .filter(|s| s.is_ascii())
    }

    /// Returns true if the compression flag is set.
    #[must_use]
    pub const fn is_compressed(&self) -> bool {
        !matches!(self.compression, b'0' | b' ' | 0)
    }

    /// Splits a realtime packet into its header and block bytes.
    ///
    /// # Arguments
    /// * `packet` - The packet including its header
    ///
    /// # Errors
    /// Returns `DecodeError::FrameTooShort` if the packet is shorter than
    /// the header.
    pub fn split(packet: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let Some((header, body)) = packet.split_first_chunk::<REALTIME_HEADER_LEN>() else {
            return Err(DecodeError::FrameTooShort {
                needed: REALTIME_HEADER_LEN,
                available: packet.len(),
            });
        };
        let [t0, t1, compression] = *header;
        Ok((
            Self {
                packet_type: [t0, t1],
                compression,
            },
            body,
        ))
    }

    /// Appends the header bytes to `out`.
    pub fn write_to(&self, out: &mut BytesMut) {
        out.put_slice(&self.packet_type);
        out.put_u8(self.compression);
    }
}
