//! Post and comment body validation

use super::ValidationError;

/// Maximum length for a post body, in characters
pub const MAX_POST_LEN: usize = 5000;

/// Maximum length for a comment body, in characters
pub const MAX_COMMENT_LEN: usize = 2000;

/// Blank and length checks look at the trimmed text; the stored text is unchanged.
fn validate_body(s: &str, field: &'static str, max: usize) -> Result<String, ValidationError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(s.to_owned())
}

/// Validated post body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent(String);

impl PostContent {
    /// Create post content.
    ///
    /// # Rules
    /// - Must not be empty or whitespace-only
    /// - Max 5000 characters, ignoring leading/trailing whitespace
    /// - Stored as given
    ///
    /// # Example
    /// ```
    /// use socialgraph_server::models::PostContent;
    ///
    /// assert!(PostContent::new("hello").is_ok());
    /// assert!(PostContent::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate_body(s, "post content", MAX_POST_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated comment body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent(String);

impl CommentContent {
    /// Create comment content. Same rules as posts, capped at 2000 characters.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate_body(s, "comment content", MAX_COMMENT_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
