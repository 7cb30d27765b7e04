//! Fetch the model list from an OpenAI-compatible endpoint.
//!
//! ```sh
//! OPENAI_API_KEY=sk-... cargo run --example list_models
//! ```

use satchel_client::{authorization_bearer, Transport};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let key = std::env::var("OPENAI_API_KEY")?;
    let transport = Transport::new()?;

    let body = transport.get("https://api.openai.com/v1/models", &authorization_bearer(&key))?;
    println!("{}", String::from_utf8_lossy(&body));
    Ok(())
}
