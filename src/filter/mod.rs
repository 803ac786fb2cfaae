pub mod lower_case;

pub use lower_case::FileLowerCase;

use crate::errors::LowerResult;
use crate::input::FilterInput;

/// A single step of a filter chain.
///
/// Filters hand inputs they have no use for back unchanged, so that a chain
/// can mix filters expecting different input shapes.
pub trait Filter {
    fn filter(&self, input: FilterInput) -> LowerResult<FilterInput>;
}

/// Runs filters in insertion order, feeding each output into the next.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(mut self, filter: impl Filter + 'static) -> Self {
        self.push(filter);
        self
    }

    pub fn push(&mut self, filter: impl Filter + 'static) {
        self.filters.push(Box::new(filter));
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Filter for FilterChain {
    /// Stops at the first failing filter.
    fn filter(&self, input: FilterInput) -> LowerResult<FilterInput> {
        self.filters.iter().try_fold(input, |acc, f| f.filter(acc))
    }
}

#[cfg(test)]
struct Tag(&'static str);

#[cfg(test)]
impl Filter for Tag {
    fn filter(&self, input: FilterInput) -> LowerResult<FilterInput> {
        match input {
            FilterInput::Other(serde_json::Value::String(s)) => {
                Ok(FilterInput::Other(serde_json::Value::String(s + self.0)))
            }
            FilterInput::Other(serde_json::Value::Null) => Err(crate::errors::LowerError::Other(
                format!("{} got null", self.0),
            )),
            other => Ok(other),
        }
    }
}

#[test]
fn chain_applies_filters_in_order() {
    let chain = FilterChain::new().attach(Tag("a")).attach(Tag("b"));
    assert_eq!(chain.len(), 2);

    let out = chain
        .filter(FilterInput::Other(serde_json::json!("x")))
        .unwrap();
    assert_eq!(out, FilterInput::Other(serde_json::json!("xab")));
}

#[test]
fn chain_stops_at_first_error() {
    let chain = FilterChain::new().attach(Tag("first")).attach(Tag("second"));
    let err = chain
        .filter(FilterInput::Other(serde_json::Value::Null))
        .unwrap_err();
    assert_eq!(err.to_string(), "other: first got null");
}

#[test]
fn empty_chain_is_identity() {
    let chain = FilterChain::new();
    assert!(chain.is_empty());
    let input = FilterInput::Path("/nowhere".into());
    assert_eq!(chain.filter(input.clone()).unwrap(), input);
}

#[test]
fn lowercase_filter_composes_in_a_chain() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chained.txt");
    std::fs::write(&path, "Chained FILE").unwrap();

    let chain = FilterChain::new().attach(FileLowerCase::new()).attach(Tag("!"));
    let out = chain.filter(FilterInput::from(path.as_path())).unwrap();

    assert_eq!(out, FilterInput::from(path.as_path()));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "chained file");
}
