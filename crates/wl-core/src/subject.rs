//! Subject filtering on entry comments.

/// Whitespace-separated tokens that must appear in a comment, in order.
///
/// Matching is case-sensitive and equivalent to the SQL pattern
/// `%tok1%tok2%`: each token is searched for after the end of the previous
/// match. An empty filter matches every comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectFilter {
    tokens: Vec<String>,
}

impl SubjectFilter {
    pub fn new(text: &str) -> Self {
        Self {
            tokens: text.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn matches(&self, comment: &str) -> bool {
        let mut rest = comment;
        for token in &self.tokens {
            let Some(pos) = rest.find(token.as_str()) else {
                return false;
            };
            rest = &rest[pos + token.len()..];
        }
        true
    }
}
