//! Log in as a user on the test network and reply to every private
//! message with the same text.
//!
//! ```sh
//! TG_API_ID=... TG_API_HASH=... TG_PHONE=... cargo run --example echo
//! ```

use std::io::{self, BufRead, Write};
use telecraft_client::tl::enums;
use telecraft_client::{Client, Config, Peer, PeerRef, SignInError, Update};

fn prompt(text: &str) -> io::Result<String> {
    print!("{}", text);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn async_main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .init()?;

    let api_id = std::env::var("TG_API_ID")?.parse()?;
    let api_hash = std::env::var("TG_API_HASH")?;
    let phone = std::env::var("TG_PHONE")?;

    let mut config = Config::test(api_id, api_hash);
    config.session_path = Some("echo.session.json".into());

    let mut client = Client::connect(config).await?;

    if !client.is_authorized().await? {
        let token = client.send_code(&phone).await?;
        let code = prompt("Enter the code you received: ")?;
        match client.sign_in(&token, &code).await {
            Ok(user) => println!("Signed in as {:?}!", user.first_name),
            Err(SignInError::PasswordRequired) => {
                let password = prompt("Enter your 2FA password: ")?;
                client.check_password(&password).await?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    client.start_updates().await?;
    println!("Waiting for messages...");

    while let Some(update) = client.next_update().await? {
        let message = match update {
            Update::NewMessage(enums::Message::Message(m)) if !m.out => m,
            _ => continue,
        };
        if let enums::Peer::User(user) = message.peer_id {
            println!("Echoing {:?}", message.message);
            client
                .send_message(&PeerRef::Peer(Peer::User(user.user_id)), &message.message)
                .await?;
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}
