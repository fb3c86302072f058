use std::fmt::Display;
use std::ops::Deref;

use crate::error::TreeError;

/// A validated node name.
///
/// Names key the per-node child index and appear in rendered paths, so they
/// follow the identifier rule: non-empty, every character alphanumeric, and
/// the first character not a digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeName(String);

impl NodeName {
    pub fn new(name: impl Into<String>) -> Result<Self, TreeError> {
        let name = name.into();
        match Self::offense(&name) {
            None => Ok(Self(name)),
            Some(reason) => Err(TreeError::InvalidName { name, reason }),
        }
    }

    /// Checks a candidate without constructing a name.
    pub fn validate(name: &str) -> Result<(), TreeError> {
        match Self::offense(name) {
            None => Ok(()),
            Some(reason) => Err(TreeError::InvalidName {
                name: name.into(),
                reason,
            }),
        }
    }

    fn offense(name: &str) -> Option<&'static str> {
        let mut chars = name.chars();
        let first = match chars.next() {
            Some(first) => first,
            None => return Some("name is empty"),
        };
        if first.is_numeric() {
            return Some("name starts with a digit");
        }
        if !first.is_alphanumeric() || !chars.all(char::is_alphanumeric) {
            return Some("name contains a non-alphanumeric character");
        }
        None
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for NodeName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for NodeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for NodeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for NodeName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::NodeName;
    use crate::error::TreeError;

    #[test]
    fn accepts_alphanumeric() {
        for name in ["root", "Node1", "x", "café", "数据"] {
            assert!(NodeName::new(name).is_ok(), "rejected {name:?}");
        }
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            NodeName::new(""),
            Err(TreeError::InvalidName { reason, .. }) if reason.contains("empty")
        ));
    }

    #[test]
    fn rejects_leading_digit() {
        assert!(matches!(
            NodeName::new("9lives"),
            Err(TreeError::InvalidName { reason, .. }) if reason.contains("digit")
        ));
    }

    #[test]
    fn rejects_punctuation_and_whitespace() {
        for name in ["has space", "dash-ed", "under_score", "dot.ted", "tab\there"] {
            assert!(NodeName::new(name).is_err(), "accepted {name:?}");
        }
    }

    #[test]
    fn compares_against_str() {
        let name = NodeName::new("branch").unwrap();
        assert_eq!(name, *"branch");
        assert_eq!(name.as_str(), "branch");
        assert_eq!(name.to_string(), "branch");
    }
}
