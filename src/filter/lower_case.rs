use crate::errors::{LowerError, LowerResult};
use crate::filter::Filter;
use crate::fold::CaseFolding;
use crate::input::FilterInput;
use std::fs;
use std::io;
use std::path::Path;

/// Lowercases the contents of a file in place.
///
/// Accepts a path or a descriptor with a `tmp_name` entry and returns the
/// input unchanged once the file is rewritten. Any other input passes
/// through without touching the file system.
///
/// The rewrite is a plain truncate-and-write with no locking: callers must
/// not run two filters over the same file at once.
#[derive(Debug, Clone, Default)]
pub struct FileLowerCase {
    encoding: Option<String>,
    folding: CaseFolding,
}

impl FileLowerCase {
    /// Filter using byte-wise ASCII folding.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoding(encoding: &str) -> LowerResult<Self> {
        let mut filter = Self::new();
        filter.set_encoding(Some(encoding))?;
        Ok(filter)
    }

    /// Switch the folding strategy. `None` goes back to ASCII folding.
    ///
    /// Fails if the encoding is unknown or multi-byte folding is not
    /// compiled in; the current setting is kept in that case.
    pub fn set_encoding(&mut self, encoding: Option<&str>) -> LowerResult<()> {
        let folding = match encoding {
            Some(label) => CaseFolding::for_label(label)?,
            None => CaseFolding::Ascii,
        };
        self.encoding = encoding.map(str::to_owned);
        self.folding = folding;
        Ok(())
    }

    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    pub fn apply(&self, input: FilterInput) -> LowerResult<FilterInput> {
        let Some(path) = input.file_path() else {
            tracing::debug!("input names no file, passing it through");
            return Ok(input);
        };
        self.lowercase_file(path)?;
        Ok(input)
    }

    fn lowercase_file(&self, path: &Path) -> LowerResult<()> {
        if !path.is_file() {
            return Err(LowerError::FileNotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path).map_err(|e| read_error(path, e))?;
        let len = bytes.len();
        let folded = self
            .folding
            .fold(bytes)
            .ok_or_else(|| LowerError::MalformedContent {
                path: path.to_path_buf(),
                encoding: self.folding.name().to_owned(),
            })?;

        fs::write(path, folded)?;
        tracing::debug!(
            path = %path.display(),
            bytes = len,
            folding = self.folding.name(),
            "lowercased file"
        );
        Ok(())
    }
}

/// A file that vanished or cannot be opened for reading counts as not found.
fn read_error(path: &Path, err: io::Error) -> LowerError {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            LowerError::FileNotFound(path.to_path_buf())
        }
        _ => LowerError::Io(err),
    }
}

impl Filter for FileLowerCase {
    fn filter(&self, input: FilterInput) -> LowerResult<FilterInput> {
        self.apply(input)
    }
}

#[cfg(test)]
fn fixture(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("testfile2.txt");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[cfg(test)]
const SAMPLE: &[u8] = b"This is a File\nWith SOME Mixed Case\n";

#[test]
fn lowercases_file_given_a_path() {
    let (_dir, path) = fixture(SAMPLE);
    let filter = FileLowerCase::new();

    let out = filter.apply(FilterInput::from(path.as_path())).unwrap();

    assert_eq!(out, FilterInput::from(path.as_path()));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("this is a file"));
    assert_eq!(content, "this is a file\nwith some mixed case\n");
}

#[test]
fn lowercases_file_given_a_descriptor() {
    let (_dir, path) = fixture(SAMPLE);
    let descriptor = serde_json::json!({
        "name": "Upload.TXT",
        "tmp_name": path.to_str().unwrap(),
        "size": SAMPLE.len(),
    });

    let out = FileLowerCase::new()
        .apply(FilterInput::from(descriptor.clone()))
        .unwrap();

    assert_eq!(out.into_value(), descriptor);
    assert!(fs::read_to_string(&path).unwrap().contains("this is a file"));
}

#[test]
fn missing_file_is_reported_as_not_found() {
    let (_dir, path) = fixture(SAMPLE);
    let missing = format!("{}unknown", path.display());

    let err = FileLowerCase::new()
        .apply(FilterInput::from(missing.as_str()))
        .unwrap_err();

    assert!(matches!(err, LowerError::FileNotFound(_)));
    let msg = err.to_string();
    assert!(msg.contains("not found"));
    assert!(msg.contains(&missing));
}

#[test]
fn read_errors_map_to_not_found_when_unreadable() {
    let path = Path::new("/srv/uploads/locked.txt");

    let denied = read_error(path, io::Error::from(io::ErrorKind::PermissionDenied));
    assert!(matches!(&denied, LowerError::FileNotFound(p) if p == path));
    assert!(denied.to_string().contains("not found"));

    let gone = read_error(path, io::Error::from(io::ErrorKind::NotFound));
    assert!(matches!(gone, LowerError::FileNotFound(_)));

    let other = read_error(path, io::Error::from(io::ErrorKind::InvalidData));
    assert!(matches!(other, LowerError::Io(_)));
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_reported_as_not_found() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = fixture(SAMPLE);
    fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

    // root reads through mode 000; nothing to check then
    if fs::File::open(&path).is_ok() {
        return;
    }

    let err = FileLowerCase::new()
        .apply(FilterInput::from(path.as_path()))
        .unwrap_err();
    assert!(matches!(err, LowerError::FileNotFound(_)));

    fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
    assert_eq!(fs::read(&path).unwrap(), SAMPLE);
}

#[test]
fn directory_is_not_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = FileLowerCase::new()
        .apply(FilterInput::from(dir.path()))
        .unwrap_err();
    assert!(matches!(err, LowerError::FileNotFound(_)));
}

#[test]
fn encoding_given_at_construction() {
    let (_dir, path) = fixture(SAMPLE);
    match FileLowerCase::with_encoding("ISO-8859-1") {
        Ok(filter) => {
            assert_eq!(filter.encoding(), Some("ISO-8859-1"));
            filter.apply(FilterInput::from(path.as_path())).unwrap();
            assert!(fs::read_to_string(&path).unwrap().contains("this is a file"));
        }
        Err(e) => assert!(e.to_string().contains("mbstring is required"), "{e}"),
    }
}

#[test]
fn encoding_given_through_setter() {
    let (_dir, path) = fixture(SAMPLE);
    let mut filter = FileLowerCase::new();
    match filter.set_encoding(Some("ISO-8859-1")) {
        Ok(()) => {
            filter.apply(FilterInput::from(path.as_path())).unwrap();
            assert!(fs::read_to_string(&path).unwrap().contains("this is a file"));
        }
        Err(e) => {
            assert!(e.to_string().contains("mbstring is required"), "{e}");
            assert_eq!(filter.encoding(), None);
        }
    }
}

#[cfg(feature = "mbstring")]
#[test]
fn named_encoding_folds_non_ascii_in_that_encoding() {
    let (_dir, path) = fixture(b"\xC4RGER \xDCBER \xD6L");
    FileLowerCase::with_encoding("latin1")
        .unwrap()
        .apply(FilterInput::from(path.as_path()))
        .unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"\xE4rger \xFCber \xF6l");

    fs::write(&path, "ÄRGER Über".as_bytes()).unwrap();
    FileLowerCase::with_encoding("UTF-8")
        .unwrap()
        .apply(FilterInput::from(path.as_path()))
        .unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "ärger über");
}

#[test]
fn ascii_label_never_folds_high_bytes() {
    let (_dir, path) = fixture(b"\xC4BC");
    FileLowerCase::with_encoding("us-ascii")
        .unwrap()
        .apply(FilterInput::from(path.as_path()))
        .unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"\xC4bc");
}

#[cfg(feature = "mbstring")]
#[test]
fn iso_8859_1_keeps_c1_control_bytes() {
    let (_dir, path) = fixture(b"\x8A\x8C\x9F \xC9T\xC9");
    FileLowerCase::with_encoding("ISO-8859-1")
        .unwrap()
        .apply(FilterInput::from(path.as_path()))
        .unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"\x8A\x8C\x9F \xE9t\xE9");
}

#[cfg(unix)]
#[test]
fn non_utf8_file_name_is_used_as_given() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(OsStr::from_bytes(b"UP\xFF.txt"));
    fs::write(&path, "ABC").unwrap();

    let out = FileLowerCase::new()
        .apply(FilterInput::from(path.clone()))
        .unwrap();

    assert_eq!(out, FilterInput::Path(path.clone()));
    assert_eq!(fs::read_to_string(&path).unwrap(), "abc");
}

#[cfg(feature = "mbstring")]
#[test]
fn malformed_content_leaves_file_untouched() {
    let original = b"BAD \xFF BYTES";
    let (_dir, path) = fixture(original);

    let err = FileLowerCase::with_encoding("utf-8")
        .unwrap()
        .apply(FilterInput::from(path.as_path()))
        .unwrap_err();

    assert!(matches!(err, LowerError::MalformedContent { .. }));
    assert_eq!(fs::read(&path).unwrap(), original);
}

#[cfg(feature = "mbstring")]
#[test]
fn unknown_encoding_keeps_previous_setting() {
    let mut filter = FileLowerCase::with_encoding("utf-8").unwrap();
    let err = filter.set_encoding(Some("no-such-charset")).unwrap_err();
    assert!(matches!(err, LowerError::UnsupportedEncoding(_)));
    assert_eq!(filter.encoding(), Some("utf-8"));

    filter.set_encoding(None).unwrap();
    assert_eq!(filter.encoding(), None);
}

#[cfg(not(feature = "mbstring"))]
#[test]
fn named_encoding_without_mbstring_fails_eagerly() {
    let err = FileLowerCase::with_encoding("ISO-8859-1").unwrap_err();
    assert!(matches!(err, LowerError::ExtensionUnavailable(_)));
    assert!(err.to_string().contains("mbstring is required"));
}

#[test]
fn ascii_mode_keeps_non_ascii_bytes() {
    let (_dir, path) = fixture(b"\xC4RGER Caf\xC3\xA9");
    FileLowerCase::new()
        .apply(FilterInput::from(path.as_path()))
        .unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"\xC4rger caf\xC3\xA9");
}

#[test]
fn unrelated_inputs_pass_through_without_io() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");

    let cases = [
        serde_json::Value::Null,
        serde_json::json!({}),
        serde_json::json!([a.to_str().unwrap(), b.to_str().unwrap()]),
    ];

    let filter = FileLowerCase::new();
    for value in cases {
        let out = filter.apply(FilterInput::from(value.clone())).unwrap();
        assert_eq!(out.into_value(), value);
    }
    assert!(!a.exists());
    assert!(!b.exists());
}

#[test]
fn applying_twice_matches_applying_once() {
    let (_dir, path) = fixture(SAMPLE);
    let filter = FileLowerCase::new();

    filter.apply(FilterInput::from(path.as_path())).unwrap();
    let once = fs::read(&path).unwrap();
    filter.apply(FilterInput::from(path.as_path())).unwrap();

    assert_eq!(fs::read(&path).unwrap(), once);
}
