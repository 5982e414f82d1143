use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use azcred_domain::{OutputStyle, RoleName};

#[derive(Debug, Parser)]
#[command(
    name = "azure-credentials",
    about = "Create Azure AD service principals and write their credentials for Chef, Puppet or Terraform",
    version
)]
pub struct Cli {
    /// Azure AD username (must be an Azure AD user, e.g. user@domain.com).
    #[arg(short, long, env = "AZURE_USERNAME")]
    pub username: Option<String>,

    /// Password for the Azure AD user. Prompted for when omitted.
    #[arg(short, long, env = "AZURE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Subscription to work against; repeat for several. Default: every subscription in the tenant.
    #[arg(short = 's', long = "subscription", value_name = "ID")]
    pub subscriptions: Vec<String>,

    /// Built-in role granted to the service principal on each subscription.
    #[arg(short, long, default_value = "contributor")]
    pub role: RoleArg,

    /// Output format of the credentials file.
    #[arg(short = 't', long = "type", default_value = "chef")]
    pub output_type: OutputArg,

    /// Log level.
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// File to save the credentials to.
    #[arg(short, long = "output", default_value = "./credentials")]
    pub output_file: PathBuf,

    /// Also print the credentials after creation (will contain secrets).
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Contributor,
    Owner,
}

impl From<RoleArg> for RoleName {
    fn from(r: RoleArg) -> Self {
        match r {
            RoleArg::Contributor => RoleName::Contributor,
            RoleArg::Owner => RoleName::Owner,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputArg {
    Chef,
    Puppet,
    Terraform,
    Generic,
}

impl From<OutputArg> for OutputStyle {
    fn from(o: OutputArg) -> Self {
        match o {
            OutputArg::Chef => OutputStyle::Chef,
            OutputArg::Puppet => OutputStyle::Puppet,
            OutputArg::Terraform => OutputStyle::Terraform,
            OutputArg::Generic => OutputStyle::Generic,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// `EnvFilter` directive for this level. `fatal` has no tracing
    /// counterpart and maps to `error`.
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error | LogLevel::Fatal => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["azure-credentials", "-u", "u@d.com", "-p", "p"]).unwrap();
        assert!(cli.subscriptions.is_empty());
        assert_eq!(RoleName::from(cli.role), RoleName::Contributor);
        assert_eq!(OutputStyle::from(cli.output_type), OutputStyle::Chef);
        assert_eq!(cli.output_file, PathBuf::from("./credentials"));
        assert_eq!(cli.log_level.directive(), "info");
        assert!(!cli.verbose);
    }

    #[test]
    fn repeated_subscriptions_keep_order() {
        let cli = Cli::try_parse_from([
            "azure-credentials", "-s", "S2", "--subscription", "S1", "-t", "terraform", "-r", "owner", "-v",
        ])
        .unwrap();
        assert_eq!(cli.subscriptions, vec!["S2".to_string(), "S1".to_string()]);
        assert_eq!(OutputStyle::from(cli.output_type), OutputStyle::Terraform);
        assert_eq!(RoleName::from(cli.role), RoleName::Owner);
        assert!(cli.verbose);
    }

    #[test]
    fn unknown_output_type_is_rejected() {
        assert!(Cli::try_parse_from(["azure-credentials", "-t", "yaml"]).is_err());
    }

    #[test]
    fn fatal_maps_to_error() {
        let cli = Cli::try_parse_from(["azure-credentials", "-l", "fatal"]).unwrap();
        assert_eq!(cli.log_level.directive(), "error");
    }
}
