use crate::error::PostGenError;
use chrono::{DateTime, Local};
use std::fmt;

/// The fields the user fills in before asking for a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub topic: String,
    pub industry: String,
    pub expertise: String,
    pub story: String,
}

impl PostForm {
    /// Snapshot the current fields into a request for one submission.
    pub fn to_request(&self) -> PostRequest {
        PostRequest {
            topic: self.topic.trim().to_string(),
            industry: self.industry.trim().to_string(),
            expertise: non_empty(&self.expertise),
            story: non_empty(&self.story),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub topic: String,
    pub industry: String,
    pub expertise: Option<String>,
    pub story: Option<String>,
}

impl PostRequest {
    pub fn validate(&self) -> Result<(), PostGenError> {
        if self.topic.trim().is_empty() || self.industry.trim().is_empty() {
            return Err(PostGenError::Validation(
                "Please enter both topic and industry".into(),
            ));
        }
        Ok(())
    }
}

/// API key entered for this session only. Never printed.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into().trim().to_string())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self) -> Result<(), PostGenError> {
        if self.is_empty() {
            return Err(PostGenError::Validation(
                "Please enter your OpenAI API key".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPost {
    pub text: String,
    pub generated_at: DateTime<Local>,
}

impl GeneratedPost {
    pub fn new(text: String, generated_at: DateTime<Local>) -> Self {
        Self { text, generated_at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_trims_and_drops_blank_optionals() {
        let form = PostForm {
            topic: "  Impact of Food on Leadership ".into(),
            industry: "Business Management".into(),
            expertise: "   ".into(),
            story: String::new(),
        };
        let req = form.to_request();
        assert_eq!(req.topic, "Impact of Food on Leadership");
        assert_eq!(req.expertise, None);
        assert_eq!(req.story, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn missing_topic_or_industry_is_rejected() {
        let no_topic = PostForm {
            industry: "Tech".into(),
            ..Default::default()
        };
        let no_industry = PostForm {
            topic: "Hiring".into(),
            industry: " ".into(),
            ..Default::default()
        };
        assert!(matches!(
            no_topic.to_request().validate(),
            Err(PostGenError::Validation(_))
        ));
        assert!(matches!(
            no_industry.to_request().validate(),
            Err(PostGenError::Validation(_))
        ));
    }

    #[test]
    fn credential_debug_is_redacted() {
        let cred = Credential::new("sk-secret");
        assert_eq!(format!("{cred:?}"), "Credential(***)");
        assert_eq!(cred.expose(), "sk-secret");
    }

    #[test]
    fn blank_credential_fails_validation() {
        assert!(matches!(
            Credential::new("  ").validate(),
            Err(PostGenError::Validation(_))
        ));
    }
}
