//! extension::configure
//!
//! The `configure` command family: interactive credential/preference
//! setup plus `list`, `get` and `set` sub-operations.
//!
//! # Behavior
//!
//! - `cirrus configure` prompts for access key id, access key secret,
//!   default region and default output format. Existing secrets are
//!   shown masked (`****************abcd`); an empty answer keeps the
//!   current value. The secret prompt never echoes.
//! - Credential keys are written to the `credentials` file, everything
//!   else to `config`, each under the selected profile's section.
//! - First-time configuration seeds `ignore=no` so the telemetry
//!   opt-out is always explicit in the file.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::paths;
use crate::profile::{
    ini, KEY_ACCESS_KEY_ID, KEY_ACCESS_KEY_SECRET, KEY_IGNORE, KEY_OUTPUT, KEY_REGION,
};

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct ConfigureCli {
    /// Profile section to configure.
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    action: Option<ConfigureAction>,
}

#[derive(Subcommand, Debug)]
enum ConfigureAction {
    /// Show the resolved values of the profile.
    List,
    /// Print one configuration value.
    Get { key: String },
    /// Set one configuration value.
    Set { key: String, value: String },
}

/// Keys that belong in the credentials file.
const CREDENTIAL_KEYS: &[&str] = &[KEY_ACCESS_KEY_ID, KEY_ACCESS_KEY_SECRET];
/// Keys that belong in the config file.
const CONFIG_KEYS: &[&str] = &[KEY_REGION, KEY_OUTPUT, KEY_IGNORE];

/// Entry point for `cirrus configure ...`.
pub fn run(raw_args: &[String]) -> Result<()> {
    let cli = ConfigureCli::try_parse_from(raw_args)
        .map_err(|e| anyhow::anyhow!("invalid arguments: {}", e))?;
    let profile = cli.profile.as_deref().unwrap_or("default");
    let credentials_path = paths::credentials_file()?;
    let config_path = paths::config_file()?;

    match cli.action {
        None => interactive(&credentials_path, &config_path, profile),
        Some(ConfigureAction::List) => list(&credentials_path, &config_path, profile),
        Some(ConfigureAction::Get { key }) => {
            get(&credentials_path, &config_path, profile, &key)
        }
        Some(ConfigureAction::Set { key, value }) => {
            set(&credentials_path, &config_path, profile, &key, &value)
        }
    }
}

fn interactive(credentials_path: &Path, config_path: &Path, profile: &str) -> Result<()> {
    let section = ini::section_name(profile);
    let current_creds = read_section(credentials_path, &section);
    let current_config = read_section(config_path, &section);

    let mut new_creds = BTreeMap::new();
    let mut new_config = BTreeMap::new();

    let stdin = std::io::stdin();
    let mut lines = stdin.lock();

    if let Some(value) = prompt(
        &mut lines,
        "Access Key ID",
        &mask(current_creds.get(KEY_ACCESS_KEY_ID).map(String::as_str)),
    )? {
        new_creds.insert(KEY_ACCESS_KEY_ID.to_string(), value);
    }

    let secret_prompt = format!(
        "Access Key Secret [{}]: ",
        mask(current_creds.get(KEY_ACCESS_KEY_SECRET).map(String::as_str))
    );
    let secret = rpassword::prompt_password(secret_prompt)?;
    if !secret.is_empty() {
        new_creds.insert(KEY_ACCESS_KEY_SECRET.to_string(), secret);
    }

    if let Some(value) = prompt(
        &mut lines,
        "Default Region Id",
        current_config.get(KEY_REGION).map(String::as_str).unwrap_or("None"),
    )? {
        new_config.insert(KEY_REGION.to_string(), value);
    }
    if let Some(value) = prompt(
        &mut lines,
        "Default output format",
        current_config.get(KEY_OUTPUT).map(String::as_str).unwrap_or("None"),
    )? {
        new_config.insert(KEY_OUTPUT.to_string(), value);
    }

    if !current_config.contains_key(KEY_IGNORE) && !new_config.contains_key(KEY_IGNORE) {
        new_config.insert(KEY_IGNORE.to_string(), "no".to_string());
    }

    if !new_creds.is_empty() {
        ini::set_values(credentials_path, &section, &new_creds)?;
    }
    if !new_config.is_empty() {
        ini::set_values(config_path, &section, &new_config)?;
    }
    Ok(())
}

fn list(credentials_path: &Path, config_path: &Path, profile: &str) -> Result<()> {
    let section = ini::section_name(profile);
    let creds = read_section(credentials_path, &section);
    let config = read_section(config_path, &section);

    println!("profile: {}", profile);
    println!(
        "{}: {}",
        KEY_ACCESS_KEY_ID,
        mask(creds.get(KEY_ACCESS_KEY_ID).map(String::as_str))
    );
    println!(
        "{}: {}",
        KEY_ACCESS_KEY_SECRET,
        mask(creds.get(KEY_ACCESS_KEY_SECRET).map(String::as_str))
    );
    for key in [KEY_REGION, KEY_OUTPUT, KEY_IGNORE] {
        println!(
            "{}: {}",
            key,
            config.get(key).map(String::as_str).unwrap_or("None")
        );
    }
    Ok(())
}

fn get(credentials_path: &Path, config_path: &Path, profile: &str, key: &str) -> Result<()> {
    let section = ini::section_name(profile);
    let value = if CREDENTIAL_KEYS.contains(&key) {
        read_section(credentials_path, &section).get(key).cloned()
    } else if CONFIG_KEYS.contains(&key) {
        read_section(config_path, &section).get(key).cloned()
    } else {
        bail!("unknown configuration key '{}'", key);
    };

    match value {
        Some(value) => {
            println!("{}", value);
            Ok(())
        }
        None => bail!("'{}' is not set for profile '{}'", key, profile),
    }
}

fn set(
    credentials_path: &Path,
    config_path: &Path,
    profile: &str,
    key: &str,
    value: &str,
) -> Result<()> {
    let section = ini::section_name(profile);
    let mut values = BTreeMap::new();
    values.insert(key.to_string(), value.to_string());

    if CREDENTIAL_KEYS.contains(&key) {
        ini::set_values(credentials_path, &section, &values)?;
    } else if CONFIG_KEYS.contains(&key) {
        ini::set_values(config_path, &section, &values)?;
    } else {
        bail!("unknown configuration key '{}'", key);
    }
    Ok(())
}

/// Mask a stored secret for display, keeping the last four characters.
fn mask(value: Option<&str>) -> String {
    match value {
        None | Some("") => "None".to_string(),
        Some(value) => {
            let tail: String = value
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("{}{}", "*".repeat(16), tail)
        }
    }
}

/// Prompt on stdout, read one line; empty input keeps the current value.
fn prompt(
    reader: &mut impl BufRead,
    label: &str,
    current: &str,
) -> Result<Option<String>> {
    print!("{} [{}]: ", label, current);
    std::io::stdout().flush()?;
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let answer = line.trim();
    if answer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(answer.to_string()))
    }
}

fn read_section(path: &Path, section: &str) -> BTreeMap<String, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => ini::read_section(&contents, section),
        Err(_) => BTreeMap::new(),
    }
}
