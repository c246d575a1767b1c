//! AWS credentials for the UNLOAD `CREDENTIALS` clause.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UnloadError};

/// Key holding the access key id.
pub const ACCESS_KEY_ID: &str = "aws_access_key_id";
/// Key holding the secret access key.
pub const SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
/// Key holding the optional session token.
pub const SESSION_TOKEN: &str = "token";

const REDACTED: &str = "[REDACTED]";

/// Credentials supplied by the caller.
///
/// Only [`ACCESS_KEY_ID`], [`SECRET_ACCESS_KEY`] and [`SESSION_TOKEN`] ever
/// reach the generated command. Any other key is ignored.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialSet {
    values: HashMap<String, String>,
}

impl CredentialSet {
    /// Wrap an existing key/value map.
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Read credentials from `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`
    /// and, if set, `AWS_SESSION_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let mut values = HashMap::new();
        for (var, key) in [
            ("AWS_ACCESS_KEY_ID", ACCESS_KEY_ID),
            ("AWS_SECRET_ACCESS_KEY", SECRET_ACCESS_KEY),
            ("AWS_SESSION_TOKEN", SESSION_TOKEN),
        ] {
            if let Ok(value) = std::env::var(var) {
                values.insert(key.to_string(), value);
            }
        }

        let credentials = Self { values };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Look up any key, recognized or not.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The access key id.
    pub fn access_key_id(&self) -> Result<&str> {
        self.required(ACCESS_KEY_ID)
    }

    /// The secret access key.
    pub fn secret_access_key(&self) -> Result<&str> {
        self.required(SECRET_ACCESS_KEY)
    }

    /// The session token, if one was supplied. An empty token counts as absent.
    pub fn token(&self) -> Option<&str> {
        self.get(SESSION_TOKEN).filter(|t| !t.is_empty())
    }

    /// Check that both mandatory keys are present and no recognized value
    /// could break out of the credentials literal.
    pub fn validate(&self) -> Result<()> {
        check_value(ACCESS_KEY_ID, self.access_key_id()?)?;
        check_value(SECRET_ACCESS_KEY, self.secret_access_key()?)?;
        if let Some(token) = self.token() {
            check_value(SESSION_TOKEN, token)?;
        }
        Ok(())
    }

    /// `aws_access_key_id=<id>;aws_secret_access_key=<secret>[;token=<token>]`
    pub fn fragment(&self) -> Result<String> {
        self.validate()?;
        Ok(self.render(self.secret_access_key()?, self.token()))
    }

    /// Same shape as [`fragment`](Self::fragment) with the secret and token masked.
    pub fn redacted_fragment(&self) -> Result<String> {
        self.validate()?;
        Ok(self.render(REDACTED, self.token().map(|_| REDACTED)))
    }

    fn render(&self, secret: &str, token: Option<&str>) -> String {
        let mut fragment = format!(
            "{}={};{}={}",
            ACCESS_KEY_ID,
            self.get(ACCESS_KEY_ID).unwrap_or_default(),
            SECRET_ACCESS_KEY,
            secret
        );
        if let Some(token) = token {
            fragment.push_str(&format!(";{}={}", SESSION_TOKEN, token));
        }
        fragment
    }

    fn required(&self, key: &str) -> Result<&str> {
        match self.get(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(UnloadError::Credentials(format!("{} is required", key))),
        }
    }
}

fn check_value(key: &str, value: &str) -> Result<()> {
    if value.contains([';', '\'', '\\', '\0']) {
        return Err(UnloadError::Credentials(format!(
            "{} contains a character not allowed in a credentials string",
            key
        )));
    }
    Ok(())
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CredentialSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_map()
            .entries(keys.into_iter().map(|k| (k, REDACTED)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> CredentialSet {
        [(ACCESS_KEY_ID, "foo"), (SECRET_ACCESS_KEY, "bar")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_fragment_without_token() {
        assert_eq!(
            base().fragment().unwrap(),
            "aws_access_key_id=foo;aws_secret_access_key=bar"
        );
    }

    #[test]
    fn test_fragment_with_token() {
        let creds: CredentialSet = [
            (ACCESS_KEY_ID, "foo"),
            (SECRET_ACCESS_KEY, "bar"),
            (SESSION_TOKEN, "123"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            creds.fragment().unwrap(),
            "aws_access_key_id=foo;aws_secret_access_key=bar;token=123"
        );
    }

    #[test]
    fn test_fragment_ignores_unknown_keys() {
        let creds: CredentialSet = [
            (ACCESS_KEY_ID, "foo"),
            (SECRET_ACCESS_KEY, "bar"),
            ("hello", "world"),
            ("foo", "bar"),
        ]
        .into_iter()
        .collect();
        let fragment = creds.fragment().unwrap();
        assert_eq!(fragment, "aws_access_key_id=foo;aws_secret_access_key=bar");
        assert!(!fragment.contains("hello"));
        assert!(!fragment.contains("world"));
    }

    #[test]
    fn test_empty_token_is_absent() {
        let mut values = HashMap::new();
        values.insert(ACCESS_KEY_ID.to_string(), "foo".to_string());
        values.insert(SECRET_ACCESS_KEY.to_string(), "bar".to_string());
        values.insert(SESSION_TOKEN.to_string(), String::new());
        let creds = CredentialSet::from_map(values);
        assert!(creds.token().is_none());
        assert!(!creds.fragment().unwrap().contains("token"));
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("AWS_ACCESS_KEY_ID", "envfoo");
        std::env::set_var("AWS_SECRET_ACCESS_KEY", "envbar");
        std::env::remove_var("AWS_SESSION_TOKEN");

        let creds = CredentialSet::from_env().unwrap();
        assert_eq!(
            creds.fragment().unwrap(),
            "aws_access_key_id=envfoo;aws_secret_access_key=envbar"
        );
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let creds: CredentialSet = [(ACCESS_KEY_ID, "foo")].into_iter().collect();
        let err = creds.fragment().unwrap_err();
        assert!(matches!(err, UnloadError::Credentials(_)));
        assert!(err.to_string().contains(SECRET_ACCESS_KEY));
    }

    #[test]
    fn test_value_cannot_inject_clause() {
        let creds: CredentialSet = [
            (ACCESS_KEY_ID, "foo"),
            (SECRET_ACCESS_KEY, "bar' ALLOWOVERWRITE --"),
        ]
        .into_iter()
        .collect();
        assert!(creds.fragment().is_err());

        let creds: CredentialSet = [
            (ACCESS_KEY_ID, "foo;master_symmetric_key=x"),
            (SECRET_ACCESS_KEY, "bar"),
        ]
        .into_iter()
        .collect();
        assert!(creds.fragment().is_err());
    }

    #[test]
    fn test_redacted_fragment_hides_secrets() {
        let creds: CredentialSet = [
            (ACCESS_KEY_ID, "foo"),
            (SECRET_ACCESS_KEY, "bar"),
            (SESSION_TOKEN, "123"),
        ]
        .into_iter()
        .collect();
        let redacted = creds.redacted_fragment().unwrap();
        assert_eq!(
            redacted,
            "aws_access_key_id=foo;aws_secret_access_key=[REDACTED];token=[REDACTED]"
        );
    }

    #[test]
    fn test_debug_redacts_values() {
        let debug_output = format!("{:?}", base());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("bar"));
    }

    #[test]
    fn test_deserializes_from_plain_map() {
        let creds: CredentialSet =
            serde_yaml::from_str("aws_access_key_id: foo\naws_secret_access_key: bar\n").unwrap();
        assert_eq!(creds.access_key_id().unwrap(), "foo");
        assert_eq!(creds.secret_access_key().unwrap(), "bar");
    }
}
