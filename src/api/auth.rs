use std::fmt;

/// Bearer credential for the roster API. Injected at startup, never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(BearerToken(trimmed.to_string()))
    }

    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tokens_are_rejected() {
        assert!(BearerToken::new("").is_none());
        assert!(BearerToken::new("   ").is_none());
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let token = BearerToken::new("s3cret").unwrap();
        assert_eq!(format!("{:?}", token), "BearerToken(***)");
        assert_eq!(token.header_value(), "Bearer s3cret");
    }
}
