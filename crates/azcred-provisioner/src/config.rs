use std::path::{Path, PathBuf};

use azcred_domain::{OutputStyle, RoleName, SubscriptionId};

pub const DEFAULT_OUTPUT_PATH: &str = "./credentials";

/// Everything one provisioning run needs, resolved up front by the caller.
#[derive(Clone)]
pub struct ProvisionConfig {
    /// AAD user (`user@domain.com`).
    pub username: String,
    pub password: String,
    /// Explicit subscriptions to process. Empty means every visible subscription.
    pub subscriptions: Vec<SubscriptionId>,
    pub role: RoleName,
    pub output_style: OutputStyle,
    pub output_path: PathBuf,
    /// Also show the rendered credentials to the operator.
    pub echo: bool,
}

impl ProvisionConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            subscriptions: Vec::new(),
            role: RoleName::default(),
            output_style: OutputStyle::Chef,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            echo: false,
        }
    }

    /// Output path with a leading `~` expanded and relative paths anchored at
    /// the working directory.
    pub fn resolved_output_path(&self) -> PathBuf {
        let expanded = expand_home(&self.output_path);
        if expanded.is_absolute() {
            return expanded;
        }
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(expanded),
            Err(_) => expanded,
        }
    }
}

impl std::fmt::Debug for ProvisionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisionConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("subscriptions", &self.subscriptions)
            .field("role", &self.role)
            .field("output_style", &self.output_style)
            .field("output_path", &self.output_path)
            .field("echo", &self.echo)
            .finish()
    }
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
