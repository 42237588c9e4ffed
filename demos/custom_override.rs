//! Overriding generation for a domain type

use shapefuzz_core::{aggregate, Generate, Generator, UnknownStrategy};

/// A port number restricted to the unprivileged range
#[derive(Debug, Default)]
struct Port(u16);

impl Generate for Port {}

#[derive(Debug, Default)]
struct Endpoint {
    host: String,
    port: Port,
    backup: Option<Port>,
}

aggregate!(Endpoint { host, port, backup });

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Shapefuzz Custom Override Example\n");

    let input = b"\x04node\x10\x27\x00\x05\x00\x01\x00".to_vec();

    let mut generator = Generator::builder(input)
        .unknown_shapes(UnknownStrategy::Fail)
        .with_override::<Port, _>(|port, cont| {
            let raw = cont.u16()?;
            port.0 = 1024 + raw % (u16::MAX - 1024);
            Ok(())
        })
        .with_override::<String, _>(|host, cont| {
            let length = usize::from(cont.byte()? % 8) + 1;
            *host = cont.string_from_alphabet("abcdefghijklmnopqrstuvwxyz", length)?;
            Ok(())
        })
        .build()?;

    let endpoint: Endpoint = generator.generate()?;
    println!("Endpoint: {:?}", endpoint);
    println!("Primary port {} on {}", endpoint.port.0, endpoint.host);
    println!("Consumed {} bytes", generator.consumed());

    // Without overrides Port has no structural generation
    let mut strict = Generator::builder(b"\x04node".to_vec())
        .unknown_shapes(UnknownStrategy::Fail)
        .build()?;
    match strict.generate::<Endpoint>() {
        Ok(endpoint) => println!("Unexpected success: {:?}", endpoint),
        Err(e) => println!("Without overrides: {}", e),
    }

    Ok(())
}
