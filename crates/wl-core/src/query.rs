//! Grammar for `done` queries: `[since <time expression>] [on <subject>]`.

use crate::SubjectFilter;

/// A parsed `done` query.
///
/// `since` is the raw time expression, left for a [`crate::TimeParser`] to
/// resolve. `None` means no lower bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub since: Option<String>,
    pub subject: String,
}

#[derive(Clone, Copy)]
enum Section {
    Leading,
    Since,
    On,
}

impl Query {
    /// Parses command words.
    ///
    /// `since` collects words up to the next `on`; `on` takes the rest
    /// verbatim, including further keywords. Words before the first keyword
    /// are ignored.
    pub fn parse<S: AsRef<str>>(words: &[S]) -> Self {
        let mut since: Vec<&str> = Vec::new();
        let mut subject: Vec<&str> = Vec::new();
        let mut section = Section::Leading;

        for word in words {
            let word: &str = word.as_ref();
            match (section, word) {
                (Section::Leading, "since") => section = Section::Since,
                (Section::Leading | Section::Since, "on") => section = Section::On,
                (Section::Leading, other) => {
                    tracing::debug!(word = other, "ignoring word outside since/on");
                }
                (Section::Since, word) => since.push(word),
                (Section::On, word) => subject.push(word),
            }
        }

        Self {
            since: Some(since.join(" ")).filter(|s| !s.is_empty()),
            subject: subject.join(" "),
        }
    }

    pub fn subject_filter(&self) -> SubjectFilter {
        SubjectFilter::new(&self.subject)
    }
}
