//! Environment-driven configuration for confirmation mail delivery.
//!
//! Settings are read when the transporter initialises, not at startup, so a
//! missing credential only affects the send path.

use std::fmt;

/// Provider selector; `gmail` picks the Gmail relay, anything else means SMTP.
pub const EMAIL_SERVICE_ENV: &str = "EMAIL_SERVICE";
/// SMTP username, also used as the sender address.
pub const EMAIL_USER_ENV: &str = "EMAIL_USER";
/// SMTP password.
pub const EMAIL_PASS_ENV: &str = "EMAIL_PASS";
/// Display name of the sender.
pub const EMAIL_FROM_NAME_ENV: &str = "EMAIL_FROM_NAME";
/// SMTP host for the generic provider.
pub const SMTP_HOST_ENV: &str = "SMTP_HOST";
/// SMTP port for the generic provider.
pub const SMTP_PORT_ENV: &str = "SMTP_PORT";
/// `true` selects implicit TLS for the generic provider.
pub const SMTP_SECURE_ENV: &str = "SMTP_SECURE";

const DEFAULT_SERVICE: &str = "gmail";
const DEFAULT_FROM_NAME: &str = "ScriptChain Email System";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Environment abstraction for mail configuration lookups.
///
/// Lets tests supply values without mutating the process environment.
#[cfg_attr(test, mockall::automock)]
pub trait MailEnv: Send + Sync {
    /// Fetch a string value by name.
    fn string(&self, name: &str) -> Option<String>;
}

/// Environment access backed by the real process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultMailEnv;

impl MailEnv for DefaultMailEnv {
    fn string(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Where confirmation mail is relayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailProvider {
    /// Gmail's submission relay.
    Gmail,
    /// Any SMTP server.
    Smtp {
        host: String,
        port: u16,
        /// Implicit TLS when set, STARTTLS otherwise.
        secure: bool,
    },
}

/// Reasons the mail configuration cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailConfigError {
    /// A required variable is unset or blank.
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Resolved mail settings.
#[derive(Clone, PartialEq, Eq)]
pub struct MailSettings {
    provider: MailProvider,
    user: String,
    password: String,
    from_name: String,
}

impl MailSettings {
    /// Read settings from an environment source.
    ///
    /// `EMAIL_USER` and `EMAIL_PASS` are required. An unparsable `SMTP_PORT`
    /// falls back to 587.
    pub fn from_env_with(env: &dyn MailEnv) -> Result<Self, MailConfigError> {
        let user = required(env, EMAIL_USER_ENV)?;
        let password = required(env, EMAIL_PASS_ENV)?;

        let service = env
            .string(EMAIL_SERVICE_ENV)
            .unwrap_or_else(|| DEFAULT_SERVICE.to_owned());
        let provider = if service == DEFAULT_SERVICE {
            MailProvider::Gmail
        } else {
            MailProvider::Smtp {
                host: env
                    .string(SMTP_HOST_ENV)
                    .filter(|host| !host.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_owned()),
                port: env
                    .string(SMTP_PORT_ENV)
                    .and_then(|raw| raw.trim().parse::<u16>().ok())
                    .filter(|port| *port != 0)
                    .unwrap_or(DEFAULT_SMTP_PORT),
                secure: env.string(SMTP_SECURE_ENV).as_deref() == Some("true"),
            }
        };
        let from_name = env
            .string(EMAIL_FROM_NAME_ENV)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FROM_NAME.to_owned());

        Ok(Self {
            provider,
            user,
            password,
            from_name,
        })
    }

    pub fn provider(&self) -> &MailProvider {
        &self.provider
    }

    /// SMTP username and sender address.
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Display name placed in the `From` header.
    pub fn from_name(&self) -> &str {
        &self.from_name
    }
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("provider", &self.provider)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("from_name", &self.from_name)
            .finish()
    }
}

fn required(env: &dyn MailEnv, name: &'static str) -> Result<String, MailConfigError> {
    env.string(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or(MailConfigError::Missing(name))
}
