//! This example connects to the test network, sends a ping through the raw
//! API, and that's it.
//!
//! ```sh
//! TG_API_ID=... TG_API_HASH=... cargo run --example ping
//! ```

use telecraft_client::tl;
use telecraft_client::{Client, Config};

async fn async_main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let api_id = std::env::var("TG_API_ID")?.parse()?;
    let api_hash = std::env::var("TG_API_HASH")?;

    println!("Connecting to the test network...");
    let mut client = Client::connect(Config::test(api_id, api_hash)).await?;
    println!("Connected!");

    println!("Sending ping...");
    dbg!(client.invoke(&tl::functions::Ping { ping_id: 0 }).await?);
    println!("Ping sent successfully!");

    client.close().await;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}
