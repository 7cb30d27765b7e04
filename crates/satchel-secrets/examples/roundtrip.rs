//! Save a credential blob next to the working directory and read it back.
//!
//! ```sh
//! cargo run --example roundtrip
//! ```

use std::path::Path;

use satchel_secrets::{KeychainProtector, SecretStore};
use secrecy::ExposeSecret;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let store = SecretStore::new(KeychainProtector::new("satchel-demo"));
    let path = Path::new("satchel-demo.bin");

    store.encrypt_and_save(path, b"sk-demo-credential")?;
    let secret = store.load_and_decrypt(path)?;
    println!("recovered {} bytes", secret.expose_secret().len());

    std::fs::remove_file(path)?;
    Ok(())
}
