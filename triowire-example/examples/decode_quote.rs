/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Decodes a `c1101` stock quote reply with the embedded catalog.
//!
//! The reply is assembled from a blank buffer with the input block and the
//! first tick row filled in, then decoded and printed as JSON.

mod common;

use common::init_logging;
use rust_decimal::Decimal;
use tracing::info;
use triowire::prelude::*;

fn main() -> anyhow::Result<()> {
    init_logging();

    let registry = triowire::catalog::registry()?;
    info!("catalog loaded with {} message types", registry.len());

    let schema = registry.schema("c1101")?;
    let mut reply = vec![b' '; schema.length()];

    // Input block echo: formlang, attribute, code, attribute.
    reply[..9].copy_from_slice(b"k 005930 ");

    let row = DecodedRecord::new()
        .with("time", "09:00:01")
        .with("price", Decimal::new(59300, 0))
        .with("sign", "2")
        .with("change", Decimal::new(500, 0))
        .with("movolume", 12_i64)
        .with("volume", 1_204_331_i64);
    let row_bytes = registry.encode("c1101OutBlock2", &row)?;
    let Some(Entry::Group(ticks)) = schema.entry("c1101OutBlock2") else {
        anyhow::bail!("c1101 has no tick group");
    };
    let first = ticks.element_range(0);
    reply[first].copy_from_slice(&row_bytes);

    let record = registry.decode("c1101", &reply)?;
    let ticks = record.group("c1101OutBlock2").unwrap_or_default();
    info!("decoded {} tick rows", ticks.len());
    if let Some(tick) = ticks.first() {
        info!(
            "first tick: time={:?} price={:?} volume={:?}",
            tick.field("time"),
            tick.field("price"),
            tick.field("volume")
        );
    }

    println!("{}", serde_json::to_string_pretty(&record.to_json()?)?);
    Ok(())
}
