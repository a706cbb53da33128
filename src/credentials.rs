//! Credentials for the advertising platform.

use std::fmt;

/// OAuth and developer credentials used to open a session.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub developer_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    pub customer_id: Option<String>,
    pub login_customer_id: Option<String>,
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl Credentials {
    /// True when the four required fields are non-blank.
    pub fn is_complete(&self) -> bool {
        is_present(&self.developer_token)
            && is_present(&self.client_id)
            && is_present(&self.client_secret)
            && is_present(&self.refresh_token)
    }

    /// Optional default customer id, ignored when blank.
    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Optional manager account id, ignored when blank.
    pub fn login_customer_id(&self) -> Option<&str> {
        self.login_customer_id
            .as_deref()
            .filter(|v| !v.trim().is_empty())
    }
}

// Secrets never show up in logs or panics.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn mask(value: &Option<String>) -> &'static str {
            if is_present(value) { "***" } else { "<unset>" }
        }

        f.debug_struct("Credentials")
            .field("developer_token", &mask(&self.developer_token))
            .field("client_id", &mask(&self.client_id))
            .field("client_secret", &mask(&self.client_secret))
            .field("refresh_token", &mask(&self.refresh_token))
            .field("customer_id", &self.customer_id)
            .field("login_customer_id", &self.login_customer_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Credentials {
        Credentials {
            developer_token: Some("dev".into()),
            client_id: Some("id".into()),
            client_secret: Some("secret".into()),
            refresh_token: Some("refresh".into()),
            customer_id: None,
            login_customer_id: None,
        }
    }

    #[test]
    fn test_complete_credentials() {
        assert!(complete().is_complete());
    }

    #[test]
    fn test_each_missing_field_is_incomplete() {
        let clear: [fn(&mut Credentials); 4] = [
            |c| c.developer_token = None,
            |c| c.client_id = None,
            |c| c.client_secret = None,
            |c| c.refresh_token = None,
        ];
        for f in clear {
            let mut creds = complete();
            f(&mut creds);
            assert!(!creds.is_complete());
        }
    }

    #[test]
    fn test_each_blank_field_is_incomplete() {
        let blank: [fn(&mut Credentials); 4] = [
            |c| c.developer_token = Some("   ".into()),
            |c| c.client_id = Some("".into()),
            |c| c.client_secret = Some("\t".into()),
            |c| c.refresh_token = Some(" \n ".into()),
        ];
        for f in blank {
            let mut creds = complete();
            f(&mut creds);
            assert!(!creds.is_complete());
        }
    }

    #[test]
    fn test_optional_ids_do_not_affect_completeness() {
        let mut creds = complete();
        creds.customer_id = Some("123".into());
        creds.login_customer_id = Some("  ".into());
        assert!(creds.is_complete());
        assert_eq!(creds.customer_id(), Some("123"));
        assert_eq!(creds.login_customer_id(), None);
    }

    #[test]
    fn test_debug_masks_secrets() {
        let output = format!("{:?}", complete());
        assert!(!output.contains("secret\""));
        assert!(!output.contains("refresh\""));
        assert!(output.contains("***"));
    }
}
