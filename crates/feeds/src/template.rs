// crates/feeds/src/template.rs
//! URL templates with `{name}` placeholders

use crate::error::{FeedError, FeedResult};
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed URL template
///
/// Placeholder values are percent-encoded on expansion; literal text is
/// copied as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl UrlTemplate {
    /// Parses `source`
    ///
    /// Fails on unbalanced braces and empty or malformed placeholder names.
    pub fn parse(source: &str) -> FeedResult<Self> {
        let invalid = |reason: &str| FeedError::InvalidTemplate {
            template: source.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut rest = source;

        while !rest.is_empty() {
            match rest.find(['{', '}']) {
                None => {
                    segments.push(Segment::Literal(rest.to_string()));
                    break;
                }
                Some(pos) if rest[pos..].starts_with('}') => {
                    return Err(invalid("unmatched '}'"));
                }
                Some(pos) => {
                    if pos > 0 {
                        segments.push(Segment::Literal(rest[..pos].to_string()));
                    }
                    let after = &rest[pos + 1..];
                    let end = after.find('}').ok_or_else(|| invalid("unclosed '{'"))?;
                    let name = &after[..end];

                    if name.is_empty() {
                        return Err(invalid("empty placeholder"));
                    }
                    if !name
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                    {
                        return Err(invalid("placeholder names use letters, digits, '_' and '-'"));
                    }

                    segments.push(Segment::Placeholder(name.to_string()));
                    rest = &after[end + 1..];
                }
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Returns the template text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns placeholder names in order of appearance
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitutes every placeholder with the value `lookup` returns for it
    pub fn expand<'a, L>(&self, lookup: L) -> FeedResult<String>
    where
        L: Fn(&str) -> Option<Cow<'a, str>>,
    {
        let mut url = String::with_capacity(self.source.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => url.push_str(text),
                Segment::Placeholder(name) => {
                    let value =
                        lookup(name).ok_or_else(|| FeedError::MissingVariable(name.clone()))?;
                    url.push_str(&urlencoding::encode(&value));
                }
            }
        }

        Ok(url)
    }
}
