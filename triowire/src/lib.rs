/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # triowire
//!
//! A fixed-width record schema and codec engine for securities market-data
//! blocks.
//!
//! Venue messages are flat byte buffers whose fields sit at fixed offsets,
//! with fixed-count repeating groups and embedded sub-blocks. triowire
//! describes each shape as a [`RecordSchema`](schema::RecordSchema) value and
//! runs one generic codec over all of them.
//!
//! ## Features
//!
//! - **Validated layouts**: Offsets are computed from widths and checked for
//!   overlaps and gaps when a schema is built
//! - **Strict lengths**: Decoding rejects buffers of the wrong length
//! - **Error paths**: Errors name the field as `c1101.c1101OutBlock2[3].price`
//! - **Embedded catalog**: The venue's blocks and transactions ship with the
//!   crate
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use triowire::prelude::*;
//!
//! let registry = triowire::catalog::registry()?;
//! let record = registry.decode("c1101InBlock", b"k 005930 ")?;
//! println!("{}", record.to_json()?);
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Values, keys, and error definitions
//! - [`schema`]: Field descriptors, record schemas, and the layout format
//! - [`codec`]: Decoding, encoding, and realtime framing
//! - [`registry`]: Message-type registry and dispatch
//! - [`catalog`]: The embedded venue catalog

pub mod core {
    //! Values, keys, and error definitions.
    pub use triowire_core::*;
}

pub mod schema {
    //! Field descriptors, record schemas, and the layout format.
    pub use triowire_schema::*;
}

pub mod codec {
    //! Decoding, encoding, and realtime framing.
    pub use triowire_codec::*;
}

pub mod registry {
    //! Message-type registry and dispatch.
    pub use triowire_registry::*;
}

pub mod catalog {
    //! The embedded venue catalog.
    pub use triowire_catalog::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use triowire_core::{
        DecodeError, DecodedRecord, EncodeError, Error, FieldValue, MessageType, RegistryError,
        Result, SchemaError, Value,
    };

    // Schema
    pub use triowire_schema::{
        AttributeLayout, Entry, FieldDescriptor, FieldKind, Layout, Padding, RecordSchema,
        RepeatingGroupDescriptor, SchemaBuilder,
    };

    // Codec
    pub use triowire_codec::{Codec, CodecConfig, MalformedPolicy, RealtimeHeader, TextEncoding};

    // Registry
    pub use triowire_registry::{RegistryBuilder, RegistryState, SchemaRegistry};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let _key = MessageType::new("c1101").unwrap();
        let _config = CodecConfig::default().with_malformed(MalformedPolicy::Substitute);
        let _kind = FieldKind::fixed(2);
    }

    #[test]
    fn test_catalog_through_facade() {
        let registry = crate::catalog::registry().unwrap();
        assert_eq!(registry.state(), RegistryState::ReadOnly);
        let record = registry.decode("c1101InBlock", b"e 005930 ").unwrap();
        assert_eq!(record.field("formlang"), Some(&FieldValue::Text("e".to_string())));
    }
}
