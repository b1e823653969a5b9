use serde_json::{Map, Value};

use crate::errors::ModelError;

/// Minimal address shape check: one `@`, non-blank local part and a dotted-or-not domain without spaces.
pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let trimmed = email.trim();
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(ModelError::Validation("invalid email".into()));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') || trimmed.contains(char::is_whitespace) {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

/// Extra fields are stored verbatim, but may not carry the store-assigned `_id`.
pub fn validate_extra(extra: &Map<String, Value>) -> Result<(), ModelError> {
    if extra.contains_key("_id") {
        return Err(ModelError::Validation("_id is assigned by the store".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("  owner@garage.io ").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "plain", "@x.com", "a@", "a@b@c", "a b@x.com"] {
            assert!(validate_email(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn extra_may_not_override_id() {
        let mut extra = Map::new();
        extra.insert("note".into(), Value::from("ok"));
        assert!(validate_extra(&extra).is_ok());
        extra.insert("_id".into(), Value::from("x"));
        assert!(validate_extra(&extra).is_err());
    }
}
