//! Config inspection command.

use crate::config::{self, Config};

/// Print the config file location and the effective settings
pub fn cmd_config(config: &Config, init: bool) -> anyhow::Result<()> {
    let path = config::config_path();
    match &path {
        Some(path) if path.exists() => println!("Config file: {}", path.display()),
        Some(path) => println!("Config file: {} (not created yet)", path.display()),
        None => println!("Config file: unavailable on this platform"),
    }

    if init {
        match &path {
            Some(path) if path.exists() => println!("Leaving existing config file untouched"),
            _ => {
                config::save(config)?;
                println!("Wrote default settings");
            }
        }
    }

    let mut shown = config.clone();
    if let Some(key) = shown.credentials.lastfm_api_key.as_mut() {
        *key = mask(key);
    }
    println!();
    print!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}

/// Keep only the last four characters of a secret
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let visible = chars.len().saturating_sub(4);
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i < visible { '*' } else { *c })
        .collect()
}
