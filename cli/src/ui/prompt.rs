//! The SAS confirmation prompt.

use std::io::{self, Write};

use lancrypt_core::{Result, SasConfirm};

/// Displays the SAS and waits for the operator's y/n on stdin.
pub struct StdinConfirm;

impl SasConfirm for StdinConfirm {
    fn confirm(&self, sas: &str) -> Result<bool> {
        println!("--------------------------------------------------");
        println!("Please verify the following authentication string");
        println!("with the other user:");
        println!("\n    \x1b[1;32m{}\x1b[0m\n", sas);
        println!("--------------------------------------------------");
        print!("Do these strings match? (y/n): ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let answer = input.trim().to_lowercase();

        Ok(answer == "y" || answer == "yes")
    }
}
