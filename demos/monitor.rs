// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Monitor program: print every event of a Labox box until Ctrl-C.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example monitor -- <address> [<ca.pem> <keystore.p12> <passphrase>]
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=labox_lib=debug cargo run --example monitor -- 192.168.1.20 ca.pem keystore.p12 secret
//! ```

use std::env;

use labox_lib::{DeviceEvent, LaboxClient, TlsConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    let tls = match args.len() {
        2 => TlsConfig::default(),
        5 => TlsConfig::from_files(&args[2], &args[3], &args[4])?,
        _ => {
            eprintln!("Usage: {} <address> [<ca.pem> <keystore.p12> <passphrase>]", args[0]);
            eprintln!();
            eprintln!("Example:");
            eprintln!("  cargo run --example monitor -- 192.168.1.20 ca.pem keystore.p12 secret");
            std::process::exit(1);
        }
    };

    let address = &args[1];
    println!("Connecting to {address}...");

    let client = LaboxClient::builder(address.as_str())
        .debug(true)
        .tls(tls)
        .start()?;
    let mut events = client.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(DeviceEvent::Open) => println!("Connected"),
                Ok(DeviceEvent::Close) => println!("Disconnected"),
                Ok(DeviceEvent::Power(on)) => println!("Power: {}", if on { "on" } else { "standby" }),
                Ok(DeviceEvent::Volume(volume)) => println!("Volume: {volume}"),
                Ok(DeviceEvent::Mute(mute)) => println!("Mute: {mute}"),
                Ok(DeviceEvent::Channel(channel)) => println!(
                    "Channel: {} {}",
                    channel.number,
                    channel.name.as_deref().unwrap_or("-")
                ),
                Ok(DeviceEvent::Program(program)) => {
                    println!("Program: {}", program.name.as_deref().unwrap_or("-"));
                }
                Ok(DeviceEvent::Update(state)) => println!("State: {}", serde_json::to_string(&state)?),
                Err(e) => eprintln!("Event stream: {e}"),
            },
        }
    }

    client.shutdown();
    println!("Bye");
    Ok(())
}
