//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// mutt-wizard - Configure neomutt, isync, and msmtp for your mail accounts
#[derive(Parser, Debug)]
#[command(name = "mw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every command and by `mailsync`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (default: $XDG_CONFIG_HOME/mutt-wizard.toml)
    #[arg(long, global = true, env = "MW_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Add an account
    ///
    /// Examples:
    ///   mw add --email me@example.org --imap imap.example.org --smtp smtp.example.org
    ///   mw add --email me@gmail.com --gmail --pass-prefix mail/
    ///   mw add --email me@gmail.com --gmail-oauth --client-secrets ~/client_secret.json
    Add(AddArgs),

    /// List configured accounts
    List,

    /// OAuth helpers
    Oauth {
        #[command(subcommand)]
        action: OauthAction,
    },

    /// Remove mutt-wizard config and entries
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Synchronize mail for configured accounts
    Sync(SyncArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    /// Email address of the account
    #[arg(long)]
    pub email: String,

    /// Use Gmail with an app password
    #[arg(long, conflicts_with = "gmail_oauth")]
    pub gmail: bool,

    /// Use Gmail OAuth (requires client secrets)
    #[arg(long)]
    pub gmail_oauth: bool,

    /// Path to Google OAuth client secrets JSON
    #[arg(long)]
    pub client_secrets: Option<PathBuf>,

    /// Login name (default: the email address)
    #[arg(long)]
    pub login: Option<String>,

    /// Display name (default: the part of the email before @)
    #[arg(long)]
    pub realname: Option<String>,

    /// IMAP server
    #[arg(long)]
    pub imap: Option<String>,

    #[arg(long)]
    pub imap_port: Option<u16>,

    /// SMTP server
    #[arg(long)]
    pub smtp: Option<String>,

    #[arg(long)]
    pub smtp_port: Option<u16>,

    /// Prefix of the password entry in `pass`
    #[arg(long, default_value = "")]
    pub pass_prefix: String,

    /// Per-mailbox message cap for syncing, 0 for unlimited
    #[arg(long)]
    pub max_messages: Option<u32>,

    /// Print the authorization URL instead of opening a browser
    #[arg(long)]
    pub no_browser: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum OauthAction {
    /// Refresh OAuth token
    Login {
        #[arg(long)]
        email: String,

        /// Print the authorization URL instead of opening a browser
        #[arg(long)]
        no_browser: bool,
    },

    /// Print access token
    Token {
        email: String,
    },
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncArgs {
    /// Accounts to sync (default: all)
    pub accounts: Vec<String>,

    /// Skip running notmuch after syncing
    #[arg(long)]
    pub no_notmuch: bool,

    /// Path to SASL plugin directory
    #[arg(long)]
    pub sasl_path: Option<PathBuf>,
}

/// mailsync - Synchronize mail for mutt-wizard accounts
#[derive(Parser, Debug)]
#[command(name = "mailsync")]
#[command(author, version, about, long_about = None)]
pub struct MailsyncCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub sync: SyncArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
        MailsyncCli::command().debug_assert();
    }

    #[test]
    fn parse_add_generic() {
        let cli = Cli::try_parse_from([
            "mw", "add", "--email", "a@x.com", "--imap", "imap.x.com", "--smtp", "smtp.x.com",
        ])
        .unwrap();
        let Some(Commands::Add(args)) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.email, "a@x.com");
        assert_eq!(args.imap.as_deref(), Some("imap.x.com"));
        assert_eq!(args.imap_port, None);
        assert!(!args.gmail);
    }

    #[test]
    fn gmail_flags_conflict() {
        let result = Cli::try_parse_from(["mw", "add", "--email", "a@gmail.com", "--gmail", "--gmail-oauth"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_oauth_token() {
        let cli = Cli::try_parse_from(["mw", "oauth", "token", "a@gmail.com"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Oauth {
                action: OauthAction::Token {
                    email: "a@gmail.com".into()
                }
            })
        );
    }

    #[test]
    fn parse_mailsync() {
        let cli = MailsyncCli::try_parse_from(["mailsync", "a@x.com", "b@x.com", "--no-notmuch"]).unwrap();
        assert_eq!(cli.sync.accounts, vec!["a@x.com", "b@x.com"]);
        assert!(cli.sync.no_notmuch);
        assert!(!cli.global.verbose);
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["mw", "list", "-v"]).unwrap();
        assert!(cli.global.verbose);
    }
}
