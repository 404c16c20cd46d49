/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Defines schemas outside the catalog.
//!
//! One schema is built in code and registered next to one loaded from JSON.
//! A back-to-back array of ticks is then decoded with the substitute policy,
//! so a corrupt price is kept as raw text instead of failing the batch.

mod common;

use common::init_logging;
use std::sync::Arc;
use tracing::info;
use triowire::prelude::*;

const TRADE_JSON: &str = r#"{
  "name": "trade",
  "entries": [
    { "entry": "field", "name": "code", "length": 6, "kind": "text" },
    { "entry": "field", "name": "date", "length": 8, "kind": "date(%Y%m%d)" },
    { "entry": "field", "name": "qty", "length": 7, "kind": "signed" },
    { "entry": "field", "name": "rate", "length": 6, "kind": "fixed(2)" },
    { "entry": "filler", "name": "reserved", "length": 2 }
  ]
}"#;

fn main() -> anyhow::Result<()> {
    init_logging();

    let tick = SchemaBuilder::new("tick")
        .field("code", 6, FieldKind::Text)
        .field("price", 7, FieldKind::Unsigned)
        .field("side", 1, FieldKind::code(["1", "2"]))
        .build()?;
    let trade = RecordSchema::from_json(TRADE_JSON)?;
    info!("trade schema is {} bytes", trade.length());

    let mut builder = RegistryBuilder::new()
        .with_config(CodecConfig::default().with_malformed(MalformedPolicy::Substitute));
    builder.register_schema(Arc::new(tick))?;
    builder.register_schema(Arc::new(trade))?;
    let registry = builder.build();

    let ticks = registry.decode_array("tick", b"00593000593001000660012x4502")?;
    for (i, tick) in ticks.iter().enumerate() {
        match tick.field("price") {
            Some(FieldValue::Unparsed(raw)) => info!("tick {}: unparsed price {:?}", i, raw),
            price => info!("tick {}: price {:?}", i, price),
        }
    }

    let record = registry.decode("trade", b"00593020240215-000012000125  ")?;
    println!("{}", serde_json::to_string_pretty(&record.to_json()?)?);

    let encoded = registry.encode("trade", &record)?;
    info!("re-encoded: {:?}", String::from_utf8_lossy(&encoded));
    Ok(())
}
