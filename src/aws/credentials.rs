//! AWS credential resolution from multiple sources

use dialoguer::{theme::ColorfulTheme, Select};
use log::debug;
use std::collections::HashMap;
use std::fs;

use crate::config::credentials;
use crate::error::{EcsError, Result};

/// Credential resolution with fallback logic
pub struct CredentialsResolver {
    profile: Option<String>,
    batch_mode: bool,
}

impl CredentialsResolver {
    /// Create a new resolver
    ///
    /// # Arguments
    /// * `profile` - Named profile to read from the shared credentials file
    /// * `batch_mode` - If true, error on ambiguous profiles instead of interactive selection
    pub fn new(profile: Option<&str>, batch_mode: bool) -> Self {
        Self {
            profile: profile.map(|p| p.to_string()),
            batch_mode,
        }
    }

    /// Resolve a credential from multiple sources with fallback:
    /// 1. CLI argument (if provided)
    /// 2. AWS_SESSION_TOKEN environment variable
    /// 3. AWS_ACCESS_KEY_ID + AWS_SECRET_ACCESS_KEY environment variables
    /// 4. Shared credentials file (~/.aws/credentials):
    ///    - Explicit profile: use it, error if missing
    ///    - No profile: `default` section, then a single section, then
    ///      interactive selection (or error in batch mode)
    ///
    /// `AWS_ROLE_ARN` without session credentials is rejected rather than
    /// silently ignored; role use requires an assumed-role session.
    pub fn resolve(&self, cli_token: Option<&str>) -> Result<String> {
        // 1. CLI argument takes precedence
        if let Some(token) = cli_token {
            debug!("Using credential from CLI argument");
            return Ok(token.to_string());
        }

        // 2. Session token from the environment
        if let Ok(token) = std::env::var(credentials::SESSION_TOKEN_ENV) {
            if !token.is_empty() {
                debug!(
                    "Using credential from {} environment variable",
                    credentials::SESSION_TOKEN_ENV
                );
                return Ok(token);
            }
        }

        // A role ARN is only usable with session credentials, which were
        // not found above.
        if let Ok(role_arn) = std::env::var(credentials::ROLE_ARN_ENV) {
            if !role_arn.is_empty() {
                return Err(EcsError::NotAuthenticated(format!(
                    "{} is set ('{}') but no session credentials are available.\n\
                     Assume the role first and export {}, or unset {} to use static keys.",
                    credentials::ROLE_ARN_ENV,
                    role_arn,
                    credentials::SESSION_TOKEN_ENV,
                    credentials::ROLE_ARN_ENV
                )));
            }
        }

        // 3. Static key pair from the environment
        if let (Ok(key_id), Ok(secret)) = (
            std::env::var(credentials::ACCESS_KEY_ENV),
            std::env::var(credentials::SECRET_KEY_ENV),
        ) {
            if !key_id.is_empty() && !secret.is_empty() {
                debug!(
                    "Using credential from {} + {} environment variables",
                    credentials::ACCESS_KEY_ENV,
                    credentials::SECRET_KEY_ENV
                );
                return Ok(compose_key_pair(&key_id, &secret));
            }
        }

        // 4. Shared credentials file
        debug!(
            "No credential in environment variables [{}], trying shared credentials file",
            ENV_VARS_CHECKED.join(", ")
        );
        self.read_from_credentials_file()
    }

    /// Read a credential from the shared credentials file
    fn read_from_credentials_file(&self) -> Result<String> {
        let credentials_path = Self::get_credentials_path()
            .ok_or_else(|| EcsError::NotAuthenticated(self.not_found_message(None, None)))?;

        debug!(
            "Looking for credentials file at: {}",
            credentials_path.display()
        );

        let content = match fs::read_to_string(&credentials_path) {
            Ok(content) => content,
            Err(_) => {
                return Err(EcsError::NotAuthenticated(
                    self.not_found_message(Some(&credentials_path), None),
                ));
            }
        };

        let profiles = parse_profiles(&content);
        let selected = self.pick_profile(&profiles, &credentials_path)?;

        let section = profiles.get(&selected).ok_or_else(|| {
            EcsError::NotAuthenticated(self.not_found_message(Some(&credentials_path), None))
        })?;

        credential_from_section(section).ok_or_else(|| {
            EcsError::NotAuthenticated(format!(
                "Profile '{}' in {} has no usable credential (expected aws_session_token \
                 or aws_access_key_id + aws_secret_access_key).",
                selected,
                credentials_path.display()
            ))
        })
    }

    /// Choose which profile section to read
    fn pick_profile(
        &self,
        profiles: &HashMap<String, HashMap<String, String>>,
        credentials_path: &std::path::Path,
    ) -> Result<String> {
        let mut names: Vec<String> = profiles.keys().cloned().collect();
        names.sort(); // Sort for consistent ordering

        // Explicit profile wins, and its absence is an error
        if let Some(profile) = &self.profile {
            if profiles.contains_key(profile) {
                debug!("Using profile '{}' from CLI or environment", profile);
                return Ok(profile.clone());
            }
            return Err(EcsError::NotAuthenticated(format!(
                "Profile '{}' not found in {}. Available profiles: {}",
                profile,
                credentials_path.display(),
                if names.is_empty() {
                    "none".to_string()
                } else {
                    names.join(", ")
                }
            )));
        }

        if names.is_empty() {
            return Err(EcsError::NotAuthenticated(
                self.not_found_message(Some(credentials_path), None),
            ));
        }

        // AWS convention: an unnamed selection means the default profile
        if profiles.contains_key(credentials::DEFAULT_PROFILE) {
            debug!(
                "Using '{}' profile from credentials file",
                credentials::DEFAULT_PROFILE
            );
            return Ok(credentials::DEFAULT_PROFILE.to_string());
        }

        if names.len() == 1 {
            let name = names.into_iter().next().unwrap();
            debug!(
                "Using single profile from credentials file {}: {}",
                credentials_path.display(),
                name
            );
            return Ok(name);
        }

        if self.batch_mode {
            return Err(EcsError::NotAuthenticated(
                self.not_found_message(Some(credentials_path), Some(&names)),
            ));
        }

        Self::interactive_profile_selection(&names, credentials_path)
    }

    /// Prompt user to select a profile interactively
    fn interactive_profile_selection(
        names: &[String],
        credentials_path: &std::path::Path,
    ) -> Result<String> {
        eprintln!(
            "\nMultiple profiles found in {}:",
            credentials_path.display()
        );

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select a profile")
            .items(names)
            .default(0)
            .interact()
            .map_err(|e| {
                EcsError::NotAuthenticated(format!("Failed to select profile: {}", e))
            })?;

        let name = names[selection].clone();
        debug!("User selected profile: {}", name);
        Ok(name)
    }

    /// Generate helpful error message when no credential is found
    fn not_found_message(
        &self,
        credentials_path: Option<&std::path::Path>,
        available_profiles: Option<&[String]>,
    ) -> String {
        let creds_info = match (credentials_path, available_profiles) {
            (Some(p), Some(profiles)) => format!(
                "\n   Credentials file: {} ({} profiles found)\n   Available profiles: {}\n   \
                 Pick one with --profile <NAME> or batch with AWS_PROFILE.",
                p.display(),
                profiles.len(),
                profiles.join(", ")
            ),
            (Some(p), None) => {
                format!("\n   Credentials file: {} (no profiles found)", p.display())
            }
            (None, _) => "\n   Credentials file: not found".to_string(),
        };

        format!(
            "No AWS credentials found. Please provide credentials using one of:\n\
             \n\
             1. CLI argument:      ecsctl --token <SESSION_TOKEN>\n\
             2. Environment var:   export {}=<TOKEN>  (also: {} + {})\n\
             3. Shared file:       ~/{}  (select with --profile <NAME>)\n\
             \n\
             Checked: env vars [{}]{}",
            credentials::SESSION_TOKEN_ENV,
            credentials::ACCESS_KEY_ENV,
            credentials::SECRET_KEY_ENV,
            credentials::FILE_PATH,
            ENV_VARS_CHECKED.join(", "),
            creds_info
        )
    }

    /// Get the path to the shared credentials file (~/.aws/credentials)
    fn get_credentials_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|p| p.join(credentials::FILE_PATH))
    }
}

const ENV_VARS_CHECKED: [&str; 3] = [
    credentials::SESSION_TOKEN_ENV,
    credentials::ACCESS_KEY_ENV,
    credentials::SECRET_KEY_ENV,
];

/// Compose a static key pair into a single credential string
fn compose_key_pair(key_id: &str, secret: &str) -> String {
    format!("{}:{}", key_id, secret)
}

/// Extract a credential from one profile section, preferring a session
/// token over a static key pair
fn credential_from_section(section: &HashMap<String, String>) -> Option<String> {
    if let Some(token) = section.get("aws_session_token") {
        if !token.is_empty() {
            return Some(token.clone());
        }
    }
    match (
        section.get("aws_access_key_id"),
        section.get("aws_secret_access_key"),
    ) {
        (Some(key_id), Some(secret)) if !key_id.is_empty() && !secret.is_empty() => {
            Some(compose_key_pair(key_id, secret))
        }
        _ => None,
    }
}

/// Minimal INI parser for the shared credentials file. Lines outside a
/// `[section]` header and comment lines (`#`, `;`) are ignored.
fn parse_profiles(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut profiles: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            let name = name.trim().to_string();
            profiles.entry(name.clone()).or_default();
            current = Some(name);
        } else if let Some((key, value)) = line.split_once('=') {
            if let Some(name) = &current {
                if let Some(section) = profiles.get_mut(name) {
                    section.insert(
                        key.trim().to_ascii_lowercase(),
                        value.trim().to_string(),
                    );
                }
            }
        }
    }

    profiles
}
