// src/extractors/role.rs

/// Role tokens excluded from the harvest unless configured otherwise.
pub const DEFAULT_BLACKLIST: [&str; 4] = ["veileder", "sfo", "assistent", "barneveileder"];

/// Decides whether a role string marks a row to be left out.
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    tokens: Vec<String>,
}

impl RoleClassifier {
    /// Tokens are lowercased once here; blank tokens are ignored so they
    /// can't match every role.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { tokens }
    }

    /// `true` when a role is present and its lowercase form contains any token.
    pub fn is_blacklisted(&self, role: Option<&str>) -> bool {
        match role {
            Some(role) => {
                let role = role.to_lowercase();
                self.tokens.iter().any(|t| role.contains(t.as_str()))
            }
            None => false,
        }
    }
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_BLACKLIST)
    }
}
