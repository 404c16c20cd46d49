/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Encodes query input blocks and a realtime quote packet.
//!
//! Input blocks use the trailing-attribute layout, so the attribute bytes
//! are filled with NUL as the venue expects. The realtime `h1` quote is
//! framed with its three-byte header and decoded back.

mod common;

use common::init_logging;
use rust_decimal::Decimal;
use tracing::{info, warn};
use triowire::prelude::*;

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = CodecConfig::default().with_fill_byte(b'\0');
    let registry = triowire::catalog::registry_with(config)?;

    let request = DecodedRecord::new()
        .with("formlang", "k")
        .with("code", "005930");
    let bytes = registry.encode("c1101InBlock", &request)?;
    info!("c1101InBlock: {:?}", String::from_utf8_lossy(&bytes));

    let futures = DecodedRecord::new()
        .with("formlang", "k")
        .with("fuitemz9", "101V3000");
    let bytes = registry.encode("s4101InBlock", &futures)?;
    info!("s4101InBlock: {:?}", String::from_utf8_lossy(&bytes));

    // Values wider than their field are rejected.
    let bad = DecodedRecord::new().with("formlang", "k").with("code", "00593012");
    if let Err(e) = registry.encode("c1101InBlock", &bad) {
        warn!("rejected request: {}", e);
    }

    let quote = DecodedRecord::new()
        .with("code", "005930")
        .with("hotime", "09000100")
        .with("offer", Decimal::new(59400, 0))
        .with("bid", Decimal::new(59300, 0))
        .with("offerrem", 1_520_i64)
        .with("bidrem", 830_i64);
    let packet = registry.encode_realtime("h1OutBlock", RealtimeHeader::new(*b"h1"), &quote)?;
    info!("h1 packet: {} bytes", packet.len());

    let (header, decoded) = registry.decode_realtime("h1OutBlock", &packet)?;
    info!(
        "packet type {:?}, compressed={}, offer={:?} bid={:?}",
        header.packet_type_str(),
        header.is_compressed(),
        decoded.field("offer"),
        decoded.field("bid")
    );

    Ok(())
}
