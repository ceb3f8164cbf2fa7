//! Recv command implementation.

use lancrypt_core::Receiver;

use crate::ui::{BarProgress, StdinConfirm};

/// Start a receiver session for the given transfer code.
pub async fn recv(code: String, passphrase: String) -> anyhow::Result<()> {
    let receiver = Receiver::new(code.clone(), passphrase)?;
    println!("\x1b[1;34m🔎\x1b[0m Searching for sender '\x1b[1m{}\x1b[0m' on the local network...", code);
    let path = receiver
        .receive(&StdinConfirm, &BarProgress::new("Receiving"))
        .await?;

    println!("\n\x1b[1;32m✓\x1b[0m File transfer complete: {}", path.display());
    println!("Session finished.");
    Ok(())
}
