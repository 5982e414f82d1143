use std::io::IsTerminal;

use anyhow::{bail, Context, Result};
use dialoguer::{Input, Password};

/// True when stdin and stdout are both attached to a terminal.
pub fn is_interactive_terminal() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Return `given`, or ask for it. An empty answer is an error.
pub fn username_or_prompt(given: Option<String>) -> Result<String> {
    if let Some(u) = given.filter(|u| !u.trim().is_empty()) {
        return Ok(u);
    }
    require_interactive("--username")?;
    let u: String = Input::new()
        .with_prompt("Azure AD username (user@domain.com)")
        .interact_text()
        .context("Failed to read username")?;
    if u.trim().is_empty() {
        bail!("a username is required");
    }
    Ok(u.trim().to_string())
}

/// Return `given`, or ask for it with input masked.
pub fn password_or_prompt(given: Option<String>) -> Result<String> {
    if let Some(p) = given.filter(|p| !p.is_empty()) {
        return Ok(p);
    }
    require_interactive("--password")?;
    Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read password")
}

fn require_interactive(flag: &str) -> Result<()> {
    if !is_interactive_terminal() {
        bail!("{flag} is required when not running in a terminal");
    }
    Ok(())
}
