/// Longest name a DNS label may carry.
const MAX_DNS_LABEL_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("name must not be empty")]
    Empty,
    #[error("name '{name}' exceeds 63 characters (got {len})")]
    TooLong { name: String, len: usize },
    #[error("name '{0}' must not start or end with a hyphen")]
    EdgeHyphen(String),
    #[error("name '{name}' contains '{ch}'; only [a-z0-9-] is allowed")]
    InvalidChar { name: String, ch: char },
}

/// Check that `name` is usable as a DNS label, and therefore as a project
/// name from which namespace and object names are derived.
pub fn validate_dns_label(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.len() > MAX_DNS_LABEL_LEN {
        return Err(NameError::TooLong {
            name: name.to_string(),
            len: name.len(),
        });
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(NameError::EdgeHyphen(name.to_string()));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(NameError::InvalidChar {
            name: name.to_string(),
            ch,
        });
    }
    Ok(())
}
