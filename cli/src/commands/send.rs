//! Send command implementation.

use std::path::PathBuf;

use lancrypt_core::Sender;

use crate::ui::{BarProgress, StdinConfirm};

/// Start a sender session for one file.
pub async fn send(path: PathBuf, passphrase: String) -> anyhow::Result<()> {
    let sender = Sender::new(path, passphrase)?;
    let ready = sender.start().await?;

    println!("\x1b[1;32m✓\x1b[0m Sender is ready.");
    println!("Your transfer code is: \x1b[1m{}\x1b[0m\n", ready.code());
    println!("The receiver can now find you automatically.");
    println!(
        "On the other device, run: \x1b[1mlancrypt recv --code {}\x1b[0m\n",
        ready.code()
    );

    ready
        .transfer(&StdinConfirm, &BarProgress::new("Sending"))
        .await?;

    println!("\n\x1b[1;32m✓\x1b[0m File transfer complete.");
    println!("Session finished.");
    Ok(())
}
