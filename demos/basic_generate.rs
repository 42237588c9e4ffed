//! Basic generation example

use shapefuzz_core::{aggregate, Generator};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Order {
    customer: String,
    quantity: u16,
    express: bool,
    items: Vec<u8>,
    notes: BTreeMap<u8, String>,
}

aggregate!(Order {
    customer,
    quantity,
    express,
    items,
    notes,
});

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Shapefuzz Basic Generation Example\n");

    // A fuzz input as the engine would hand it over
    let inputs: [&[u8]; 3] = [
        b"\x05alice\x03\x00\x00\x02\x03\x0a\x0b\x0c\x01\x07\x02hi",
        b"\x03bob\xff\x00\x01\x01\x00\x00",
        b"\x09truncated",
    ];

    for (i, input) in inputs.iter().enumerate() {
        let mut generator = Generator::new(input.to_vec());
        match generator.generate::<Order>() {
            Ok(order) => {
                println!("Input {}: {:?}", i + 1, order);
                println!(
                    "  {} ordered {} ({} items, express: {}, {} notes)",
                    order.customer,
                    order.quantity,
                    order.items.len(),
                    order.express,
                    order.notes.len()
                );
                println!("  consumed {} of {} bytes", generator.consumed(), input.len());
            }
            Err(e) if e.is_insufficient_bytes() => {
                println!("Input {}: skipped ({})", i + 1, e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    // Optional containers become empty once nil_chance is raised
    let mut generator = Generator::builder(b"\x00\x01\x02".to_vec())
        .nil_chance(1.0)
        .build()?;
    let maybe: (Option<u8>, Vec<u8>) = generator.generate()?;
    println!("\nWith nil_chance = 1.0: {:?}", maybe);

    Ok(())
}
