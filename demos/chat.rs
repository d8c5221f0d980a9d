use dotenv::dotenv;
use resilient_chat::{ChatClient, EnvKeyStore, Message};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("resilient_chat=info")),
        )
        .init();

    let model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
    let base_url = std::env::var("CHAT_BASE_URL").ok();
    let client = ChatClient::new(&model, base_url.as_deref(), &EnvKeyStore)?;

    let turns = vec![
        Message::user("What is the tallest mountain on Earth?"),
        Message::assistant("Mount Everest."),
        Message::user("And the second tallest?"),
    ];

    let reply = client
        .send_request(&turns, "You are a concise geography tutor.")
        .await;
    println!("{reply}");

    match client.embed(&reply).await {
        Ok(vector) => println!("embedding has {} dimensions", vector.len()),
        Err(e) => println!("embedding unavailable: {e}"),
    }

    Ok(())
}
