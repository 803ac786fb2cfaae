use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Key of a descriptor mapping that holds the path of the uploaded file.
pub const TMP_NAME: &str = "tmp_name";

/// The value flowing through a filter.
///
/// Only the first two arms name a file. `Other` carries anything else and
/// file filters hand it back untouched.
///
/// A mapping counts as a descriptor only when its `tmp_name` is a string.
/// `{"tmp_name": 42}` is `Other` and passes through a file filter instead
/// of failing with not-found: it cannot name a file, and a filter chain
/// must not stop on values it was never meant to handle.
///
/// `Path` keeps the `PathBuf` as given, so file names that are not UTF-8
/// reach the file system untouched. Only [`FilterInput::into_value`] has to
/// render them as (lossy) JSON strings.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterInput {
    Path(PathBuf),
    Descriptor(Map<String, Value>),
    Other(Value),
}

impl FilterInput {
    /// Path of the file this input refers to, if any.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            FilterInput::Path(p) => Some(p.as_path()),
            FilterInput::Descriptor(map) => map.get(TMP_NAME).and_then(Value::as_str).map(Path::new),
            FilterInput::Other(_) => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            FilterInput::Path(p) => Value::String(p.to_string_lossy().into_owned()),
            FilterInput::Descriptor(map) => Value::Object(map),
            FilterInput::Other(v) => v,
        }
    }
}

impl From<Value> for FilterInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(p) => FilterInput::Path(PathBuf::from(p)),
            Value::Object(map) if map.get(TMP_NAME).is_some_and(Value::is_string) => {
                FilterInput::Descriptor(map)
            }
            other => FilterInput::Other(other),
        }
    }
}

impl From<FilterInput> for Value {
    fn from(input: FilterInput) -> Self {
        input.into_value()
    }
}

impl From<&str> for FilterInput {
    fn from(p: &str) -> Self {
        FilterInput::Path(PathBuf::from(p))
    }
}

impl From<String> for FilterInput {
    fn from(p: String) -> Self {
        FilterInput::Path(PathBuf::from(p))
    }
}

impl From<&Path> for FilterInput {
    fn from(p: &Path) -> Self {
        FilterInput::Path(p.to_path_buf())
    }
}

impl From<PathBuf> for FilterInput {
    fn from(p: PathBuf) -> Self {
        FilterInput::Path(p)
    }
}

#[test]
fn json_values_are_classified_by_shape() {
    use serde_json::json;

    assert_eq!(FilterInput::from(json!("/tmp/a.txt")), FilterInput::Path("/tmp/a.txt".into()));

    let desc = FilterInput::from(json!({ "tmp_name": "/tmp/b.txt", "name": "b.txt" }));
    assert!(matches!(desc, FilterInput::Descriptor(_)));
    assert_eq!(desc.file_path(), Some(Path::new("/tmp/b.txt")));

    let cases = [
        json!(null),
        json!({}),
        json!({ "name": "c.txt" }),
        json!({ "tmp_name": 42 }),
        json!(["/tmp/c.txt", "/tmp/d.txt"]),
    ];
    for value in cases {
        let input = FilterInput::from(value.clone());
        assert_eq!(input, FilterInput::Other(value.clone()), "case: {value}");
        assert_eq!(input.file_path(), None);
    }
}

#[cfg(unix)]
#[test]
fn non_utf8_paths_are_kept_byte_for_byte() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let raw = Path::new(OsStr::from_bytes(b"/tmp/UP\xFF.txt"));
    let input = FilterInput::from(raw);

    assert_eq!(input.file_path().map(|p| p.as_os_str().as_bytes()), Some(&b"/tmp/UP\xFF.txt"[..]));
    assert_eq!(FilterInput::from(raw.to_path_buf()), input);
}

#[test]
fn into_value_returns_the_original_shape() {
    use serde_json::json;

    let value = json!({ "tmp_name": "/tmp/e.txt", "size": 12 });
    assert_eq!(FilterInput::from(value.clone()).into_value(), value);
}
