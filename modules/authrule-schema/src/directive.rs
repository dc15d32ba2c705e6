use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::DirectiveError;

/// Decoded attributes of one `@opsmxAuthRule(...)` marker.
///
/// Values are kept verbatim. Neither `=` nor a space can appear inside a
/// value, since tokens are split on both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directive {
    /// Raw comma-separated nesting path, outermost field first.
    pub path: String,
    /// Query variable holding the caller's group ids, e.g. `$Groups`.
    pub var: String,
    /// Root query field the rule hangs off.
    pub base: String,
    /// Comma list of permission names, substituted inside `[...]`.
    pub permissions: String,
    /// Keys with no meaning to the expander.
    pub extra: BTreeMap<String, String>,
}

impl Directive {
    /// Non-empty path segments in nesting order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split(',').filter(|s| !s.is_empty())
    }

    /// Parse a raw marker argument list as captured from the input line.
    pub fn from_bytes(body: &[u8]) -> Result<Self, DirectiveError> {
        match std::str::from_utf8(body) {
            Ok(text) => text.trim().parse(),
            Err(_) => Err(DirectiveError::NotUtf8 {
                body: String::from_utf8_lossy(body).into_owned(),
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        let value = value.to_string();
        match key {
            "path" => self.path = value,
            "var" => self.var = value,
            "base" => self.base = value,
            "permissions" => self.permissions = value,
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
    }
}

impl FromStr for Directive {
    type Err = DirectiveError;

    /// Parses a space-separated `key=value` list. All malformed tokens are
    /// collected into one error; later keys override earlier ones.
    fn from_str(body: &str) -> Result<Self, Self::Err> {
        let mut directive = Directive::default();
        let mut malformed = Vec::new();

        for token in body.split(' ') {
            let mut parts = token.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) => directive.set(key, value),
                _ => malformed.push(token.to_string()),
            }
        }

        if !malformed.is_empty() {
            return Err(DirectiveError::MalformedTokens {
                body: body.to_string(),
                tokens: malformed,
            });
        }
        Ok(directive)
    }
}
