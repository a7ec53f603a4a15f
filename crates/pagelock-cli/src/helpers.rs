//! Input helpers for passwords and fragment bodies.

use std::io::{self, Read};

use dialoguer::Password;
use zeroize::Zeroizing;

use crate::constants::PASSWORD_ENV;

/// Password from PAGELOCK_PASSWORD, if set. Empty is a valid password.
pub fn env_password() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV).ok().map(Zeroizing::new)
}

/// Prompt for a page password.
pub fn prompt_password(interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if !interactive {
        return Err(anyhow::anyhow!(
            "No password provided and no TTY available. Set {}.",
            PASSWORD_ENV
        ));
    }
    Password::new()
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Prompt for a new password with confirmation (for seal), or read it from
/// PAGELOCK_PASSWORD.
pub fn prompt_new_password(interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(password) = env_password() {
        return Ok(password);
    }
    if !interactive {
        return Err(anyhow::anyhow!(
            "No password provided and no TTY available. Set {}.",
            PASSWORD_ENV
        ));
    }
    Password::new()
        .with_prompt("Enter password")
        .allow_empty_password(true)
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Read a file argument, or stdin for `None` / "-".
pub fn read_input(input: Option<&str>) -> anyhow::Result<String> {
    match input {
        Some(path) if path != "-" => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e)),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
            Ok(buffer)
        }
    }
}

/// Write to a file, or stdout when no path is given.
pub fn write_output(output: Option<&str>, contents: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, contents)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e)),
        None => {
            print!("{}", contents);
            Ok(())
        }
    }
}
