//! A small XPath subset evaluated against the open-element stack.
//!
//! The XML extractor is streaming, so queries are matched against the path of
//! element local names from the root element down to the element that just
//! opened. Supported grammar:
//!
//! ```text
//! query       := alternative ( '|' alternative )*
//! alternative := ( ( '/' | '//' ) name )+
//! name        := '*' | [prefix ':'] local-name
//! ```
//!
//! ```rust
//! use loader::PathQuery;
//!
//! let q: PathQuery = "//abstract/p|//body/sec//p".parse().unwrap();
//! assert!(q.matches(&["article", "front", "abstract", "p"]));
//! assert!(q.matches(&["article", "body", "sec", "sec", "p"]));
//! assert!(!q.matches(&["article", "body", "p"]));
//! ```
use std::str::FromStr;

use crate::error::LoaderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Local(String),
}

impl NameTest {
    fn accepts(&self, name: &str) -> bool {
        match self {
            NameTest::Any => true,
            NameTest::Local(local) => local == name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    name: NameTest,
}

/// Compiled selection query. See the module docs for the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    alternatives: Vec<Vec<Step>>,
}

impl PathQuery {
    /// Returns true when the element at the end of `path` is selected.
    ///
    /// `path` lists element local names from the root element to the current
    /// element, inclusive.
    pub fn matches<S: AsRef<str>>(&self, path: &[S]) -> bool {
        if path.is_empty() {
            return false;
        }
        self.alternatives
            .iter()
            .any(|steps| match_step(steps, steps.len() - 1, path, path.len() - 1))
    }
}

/// Matches `steps[step]` against `path[pos]` and recursively the steps before it
/// against the ancestors of `path[pos]`.
fn match_step<S: AsRef<str>>(steps: &[Step], step: usize, path: &[S], pos: usize) -> bool {
    let current = &steps[step];
    if !current.name.accepts(path[pos].as_ref()) {
        return false;
    }

    if step == 0 {
        return match current.axis {
            Axis::Child => pos == 0,
            Axis::Descendant => true,
        };
    }

    match current.axis {
        Axis::Child => pos > 0 && match_step(steps, step - 1, path, pos - 1),
        Axis::Descendant => (0..pos).rev().any(|p| match_step(steps, step - 1, path, p)),
    }
}

impl FromStr for PathQuery {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut alternatives = Vec::new();
        for raw in s.split('|') {
            alternatives.push(parse_alternative(raw.trim())?);
        }
        Ok(Self { alternatives })
    }
}

fn parse_alternative(raw: &str) -> Result<Vec<Step>, LoaderError> {
    if raw.is_empty() {
        return Err(LoaderError::InvalidPathQuery("empty alternative".into()));
    }
    if !raw.starts_with('/') {
        return Err(LoaderError::InvalidPathQuery(format!(
            "`{raw}` must start with `/` or `//`"
        )));
    }

    let mut steps = Vec::new();
    let mut rest = raw;
    while !rest.is_empty() {
        let axis = if let Some(after) = rest.strip_prefix("//") {
            rest = after;
            Axis::Descendant
        } else if let Some(after) = rest.strip_prefix('/') {
            rest = after;
            Axis::Child
        } else {
            unreachable!("loop only continues on a separator");
        };

        let end = rest.find('/').unwrap_or(rest.len());
        let name = &rest[..end];
        rest = &rest[end..];
        steps.push(Step {
            axis,
            name: parse_name(name, raw)?,
        });
    }

    Ok(steps)
}

fn parse_name(name: &str, alternative: &str) -> Result<NameTest, LoaderError> {
    if name.is_empty() {
        return Err(LoaderError::InvalidPathQuery(format!(
            "missing element name in `{alternative}`"
        )));
    }
    if name == "*" {
        return Ok(NameTest::Any);
    }

    let local = name.rsplit(':').next().unwrap_or(name);
    let valid = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid {
        return Err(LoaderError::InvalidPathQuery(format!(
            "unsupported step `{name}` in `{alternative}`"
        )));
    }
    Ok(NameTest::Local(local.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PATH_QUERY;

    fn q(s: &str) -> PathQuery {
        s.parse().expect("query parses")
    }

    #[test]
    fn default_query_selects_abstract_and_body() {
        let query = q(DEFAULT_PATH_QUERY);
        assert!(query.matches(&["article", "front", "article-meta", "abstract", "p"]));
        assert!(query.matches(&["article", "front", "abstract", "title"]));
        assert!(query.matches(&["article", "body", "sec", "p"]));
        assert!(query.matches(&["article", "body", "sec", "sec", "title"]));
        assert!(query.matches(&["article", "body", "sec", "list", "list-item", "p"]));
    }

    #[test]
    fn default_query_skips_other_content() {
        let query = q(DEFAULT_PATH_QUERY);
        // body paragraphs outside a section
        assert!(!query.matches(&["article", "body", "p"]));
        // abstract paragraph nested deeper than one level
        assert!(!query.matches(&["article", "abstract", "sec", "p"]));
        // back matter
        assert!(!query.matches(&["article", "back", "ack", "p"]));
        // sec that is not a direct child of body
        assert!(!query.matches(&["article", "body", "boxed-text", "sec", "p"]));
        // the container itself
        assert!(!query.matches(&["article", "abstract"]));
    }

    #[test]
    fn rooted_child_axis_requires_root_match() {
        let query = q("/article/body");
        assert!(query.matches(&["article", "body"]));
        assert!(!query.matches(&["wrapper", "article", "body"]));
    }

    #[test]
    fn wildcard_and_prefix() {
        let query = q("//body/*/mml:math");
        assert!(query.matches(&["body", "sec", "math"]));
        assert!(!query.matches(&["body", "math"]));
    }

    #[test]
    fn empty_path_never_matches() {
        let empty: [&str; 0] = [];
        assert!(!q("//p").matches(&empty));
    }

    #[test]
    fn parse_errors() {
        for bad in ["", "p", "//abstract/", "//a|", "//a b", "///p"] {
            assert!(
                matches!(bad.parse::<PathQuery>(), Err(LoaderError::InvalidPathQuery(_))),
                "expected `{bad}` to be rejected"
            );
        }
    }
}
