//! Session cookie settings taken from the environment.
//!
//! | variable | meaning | debug default |
//! |---|---|---|
//! | `SESSION_KEY_FILE` | file holding the cookie key material | `/var/run/secrets/session_key` |
//! | `SESSION_COOKIE_SECURE` | mark the cookie `Secure` | `true` |
//! | `SESSION_ALLOW_EPHEMERAL` | accept a random key when the file is unreadable | `false` |
//!
//! Release builds treat a missing or malformed toggle as fatal, need at least
//! 64 bytes of key material, and never accept an ephemeral key. Debug builds
//! warn and carry on with the defaults.

use std::path::PathBuf;

use actix_web::cookie::Key;
use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

const KEY_FILE_VAR: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_VAR: &str = "SESSION_COOKIE_SECURE";
const ALLOW_EPHEMERAL_VAR: &str = "SESSION_ALLOW_EPHEMERAL";
const DEFAULT_KEY_FILE: &str = "/var/run/secrets/session_key";
const MIN_KEY_BYTES: usize = 64;

/// Whether configuration gaps are fatal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// `Debug` when compiled with debug assertions.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Resolved cookie settings handed to the server.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("{name} must be set in release builds")]
    MissingEnv { name: &'static str },
    #[error("{name}={value:?} is not a boolean (use 1/0, true/false or yes/no)")]
    InvalidEnv { name: &'static str, value: String },
    #[error("cannot read session key file {file}: {source}", file = .path.display())]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key file {file} holds {length} bytes; at least {min} are required", file = .path.display(), min = MIN_KEY_BYTES)]
    KeyTooShort { path: PathBuf, length: usize },
    #[error("SESSION_ALLOW_EPHEMERAL cannot be enabled in release builds")]
    EphemeralNotAllowed,
}

/// Read the session settings for `mode`.
///
/// # Examples
/// ```
/// use mockable::MockEnv;
/// use revision_tracker::inbound::http::session_config::{BuildMode, session_settings_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_KEY_FILE" => Some("/nonexistent/session_key".to_owned()),
///     "SESSION_COOKIE_SECURE" => Some("0".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug fallback");
/// assert!(!settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let reader = SessionEnv { env, mode };
    let cookie_secure = reader.toggle(COOKIE_SECURE_VAR, true)?;
    let allow_ephemeral = reader.toggle(ALLOW_EPHEMERAL_VAR, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = reader.key(allow_ephemeral)?;
    Ok(SessionSettings { key, cookie_secure })
}

struct SessionEnv<'a, E> {
    env: &'a E,
    mode: BuildMode,
}

impl<E: Env> SessionEnv<'_, E> {
    /// In debug builds a problem is logged and `fallback` used instead.
    fn tolerate<T>(&self, problem: SessionConfigError, fallback: T) -> Result<T, SessionConfigError> {
        match self.mode {
            BuildMode::Debug => {
                warn!(error = %problem, "using session default");
                Ok(fallback)
            }
            BuildMode::Release => Err(problem),
        }
    }

    fn toggle(&self, name: &'static str, default: bool) -> Result<bool, SessionConfigError> {
        let Some(value) = self.env.string(name) else {
            return self.tolerate(SessionConfigError::MissingEnv { name }, default);
        };
        match parse_toggle(&value) {
            Some(flag) => Ok(flag),
            None => self.tolerate(SessionConfigError::InvalidEnv { name, value }, default),
        }
    }

    fn key(&self, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
        let path = self
            .env
            .string(KEY_FILE_VAR)
            .map_or_else(|| PathBuf::from(DEFAULT_KEY_FILE), PathBuf::from);
        let material = match std::fs::read(&path) {
            Ok(bytes) => Zeroizing::new(bytes),
            Err(source) => {
                if self.mode == BuildMode::Debug || allow_ephemeral {
                    warn!(path = %path.display(), error = %source, "generating an ephemeral session key");
                    return Ok(Key::generate());
                }
                return Err(SessionConfigError::KeyRead { path, source });
            }
        };
        if self.mode == BuildMode::Release && material.len() < MIN_KEY_BYTES {
            return Err(SessionConfigError::KeyTooShort {
                path,
                length: material.len(),
            });
        }
        Ok(Key::derive_from(&material))
    }
}

fn parse_toggle(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if ["1", "true", "yes"].iter().any(|t| raw.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if ["0", "false", "no"].iter().any(|f| raw.eq_ignore_ascii_case(f)) {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;

    fn env_of(vars: &'static [(&'static str, &'static str)]) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string().returning(move |name| {
            vars.iter()
                .find_map(|(key, value)| (*key == name).then(|| (*value).to_owned()))
        });
        env
    }

    #[rstest]
    #[case("1", Some(true))]
    #[case("Yes", Some(true))]
    #[case(" FALSE ", Some(false))]
    #[case("no", Some(false))]
    #[case("sometimes", None)]
    fn toggles_accept_common_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_toggle(raw), expected);
    }

    #[rstest]
    fn debug_build_runs_without_any_configuration() {
        let env = env_of(&[("SESSION_KEY_FILE", "/nonexistent/session_key")]);
        let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug settings");
        assert!(settings.cookie_secure);
    }

    #[rstest]
    fn process_environment_is_read_through_default_env() {
        let _guard = env_lock::lock_env([
            ("SESSION_KEY_FILE", Some("/nonexistent/session_key")),
            ("SESSION_COOKIE_SECURE", Some("no")),
            ("SESSION_ALLOW_EPHEMERAL", None),
        ]);
        let settings = session_settings_from_env(&mockable::DefaultEnv::new(), BuildMode::Debug)
            .expect("debug settings");
        assert!(!settings.cookie_secure);
    }

    #[rstest]
    #[case::missing_toggle(&[], "SESSION_COOKIE_SECURE must be set")]
    #[case::bad_toggle(&[("SESSION_COOKIE_SECURE", "sometimes")], "is not a boolean")]
    #[case::ephemeral(
        &[("SESSION_COOKIE_SECURE", "1"), ("SESSION_ALLOW_EPHEMERAL", "1")],
        "cannot be enabled in release"
    )]
    #[case::unreadable_key(
        &[
            ("SESSION_COOKIE_SECURE", "1"),
            ("SESSION_ALLOW_EPHEMERAL", "0"),
            ("SESSION_KEY_FILE", "/nonexistent/session_key"),
        ],
        "cannot read session key file"
    )]
    fn release_build_is_strict(
        #[case] vars: &'static [(&'static str, &'static str)],
        #[case] expected: &str,
    ) {
        let env = env_of(vars);
        let Err(err) = session_settings_from_env(&env, BuildMode::Release) else {
            panic!("release configuration should be rejected");
        };
        assert!(
            err.to_string().contains(expected),
            "unexpected error: {err}"
        );
    }
}
