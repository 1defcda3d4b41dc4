//! Module identities.
//!
//! A module identity names a loadable unit of implementations. Beyond the
//! plain name it may carry a version and a public key token; those qualifiers
//! are what the resolver strips when it retries a failed load with a relaxed
//! identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a module identity from its display form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityParseError {
    /// The identity string had no module name.
    #[error("Module identity has an empty name")]
    EmptyName,

    /// A qualifier was not of the form `Key=Value`.
    #[error("Malformed module identity qualifier: {0}")]
    MalformedQualifier(String),

    /// A qualifier key is not recognised.
    #[error("Unknown module identity qualifier: {0}")]
    UnknownQualifier(String),
}

/// Full identity of a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleIdentity {
    /// Simple module name, e.g. `Abstractions.Platform`.
    pub name: String,
    /// Optional version qualifier.
    pub version: Option<String>,
    /// Optional strong-signing qualifier.
    pub public_key_token: Option<String>,
}

impl ModuleIdentity {
    /// Create an unqualified identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            public_key_token: None,
        }
    }

    /// Set the version qualifier.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the public key token qualifier.
    #[must_use]
    pub fn with_public_key_token(mut self, token: impl Into<String>) -> Self {
        self.public_key_token = Some(token.into());
        self
    }

    /// Copy of this identity under another name, qualifiers preserved.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: self.version.clone(),
            public_key_token: self.public_key_token.clone(),
        }
    }

    /// Whether the identity carries any version or signing qualifier.
    pub const fn is_qualified(&self) -> bool {
        self.version.is_some() || self.public_key_token.is_some()
    }

    /// Copy of this identity with the signing and version qualifiers stripped.
    #[must_use]
    pub fn relaxed(&self) -> Self {
        Self::new(self.name.clone())
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(ref version) = self.version {
            write!(f, ", Version={version}")?;
        }
        if let Some(ref token) = self.public_key_token {
            write!(f, ", PublicKeyToken={token}")?;
        }
        Ok(())
    }
}

impl FromStr for ModuleIdentity {
    type Err = IdentityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);
        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return Err(IdentityParseError::EmptyName);
        }

        let mut identity = Self::new(name);
        for part in parts {
            let (key, value) = part
                .split_once('=')
                .map(|(k, v)| (k.trim(), v.trim()))
                .filter(|(k, v)| !k.is_empty() && !v.is_empty())
                .ok_or_else(|| IdentityParseError::MalformedQualifier(part.to_string()))?;

            if key.eq_ignore_ascii_case("Version") {
                identity.version = Some(value.to_string());
            } else if key.eq_ignore_ascii_case("PublicKeyToken") {
                // "null" is the conventional spelling of an unsigned module
                if !value.eq_ignore_ascii_case("null") {
                    identity.public_key_token = Some(value.to_string());
                }
            } else {
                return Err(IdentityParseError::UnknownQualifier(key.to_string()));
            }
        }

        Ok(identity)
    }
}
