use crate::errors::{LowerError, LowerResult};
#[cfg(feature = "mbstring")]
use encoding_rs::{Encoding, REPLACEMENT, UTF_16BE, UTF_16LE};

/// How file bytes are lowercased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseFolding {
    /// Byte-wise ASCII folding. Every other byte is left as is.
    #[default]
    Ascii,
    /// ISO-8859-1: every byte is the code point of the same value.
    #[cfg(feature = "mbstring")]
    Latin1,
    /// Decode, Unicode-lowercase, encode back with the same encoding.
    #[cfg(feature = "mbstring")]
    Encoded(&'static Encoding),
}

impl CaseFolding {
    /// Resolve an encoding label into a folding strategy.
    ///
    /// ASCII labels always resolve to ASCII folding. Without the `mbstring`
    /// feature every other named encoding is refused.
    pub fn for_label(label: &str) -> LowerResult<Self> {
        let key = label.trim().to_ascii_lowercase();
        if ASCII_LABELS.contains(&key.as_str()) {
            return Ok(CaseFolding::Ascii);
        }

        #[cfg(feature = "mbstring")]
        {
            // WHATWG folds these into windows-1252, which reads 0x80-0x9F as letters.
            if LATIN1_LABELS.contains(&key.as_str()) {
                return Ok(CaseFolding::Latin1);
            }
            match Encoding::for_label(label.as_bytes()) {
                Some(enc) if enc != REPLACEMENT => Ok(CaseFolding::Encoded(enc)),
                _ => Err(LowerError::UnsupportedEncoding(label.to_owned())),
            }
        }
        #[cfg(not(feature = "mbstring"))]
        {
            Err(LowerError::ExtensionUnavailable(label.to_owned()))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CaseFolding::Ascii => "ascii",
            #[cfg(feature = "mbstring")]
            CaseFolding::Latin1 => "ISO-8859-1",
            #[cfg(feature = "mbstring")]
            CaseFolding::Encoded(enc) => enc.name(),
        }
    }

    /// Lowercase `bytes`. `None` when the content is not valid in the
    /// encoding, or the lowercased text cannot be encoded back.
    pub fn fold(&self, bytes: Vec<u8>) -> Option<Vec<u8>> {
        match self {
            CaseFolding::Ascii => {
                let mut bytes = bytes;
                bytes.make_ascii_lowercase();
                Some(bytes)
            }
            #[cfg(feature = "mbstring")]
            CaseFolding::Latin1 => fold_latin1(&bytes),
            #[cfg(feature = "mbstring")]
            CaseFolding::Encoded(enc) => fold_encoded(*enc, &bytes),
        }
    }
}

const ASCII_LABELS: &[&str] = &[
    "ascii",
    "us-ascii",
    "us",
    "ansi_x3.4-1968",
    "iso646-us",
    "iso-ir-6",
    "cp367",
    "ibm367",
    "csascii",
];

#[cfg(feature = "mbstring")]
const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso88591",
    "iso_8859-1",
    "iso_8859-1:1987",
    "latin1",
    "l1",
    "iso-ir-100",
    "cp819",
    "ibm819",
    "csisolatin1",
];

#[cfg(feature = "mbstring")]
fn fold_latin1(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        for c in char::from(b).to_lowercase() {
            out.push(u8::try_from(c).ok()?);
        }
    }
    Some(out)
}

#[cfg(feature = "mbstring")]
fn fold_encoded(enc: &'static Encoding, bytes: &[u8]) -> Option<Vec<u8>> {
    let text = enc.decode_without_bom_handling_and_without_replacement(bytes)?;
    let lower = text.to_lowercase();

    // encoding_rs only encodes UTF-16 input as UTF-8 output.
    if enc == UTF_16LE {
        return Some(lower.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if enc == UTF_16BE {
        return Some(lower.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }

    let (out, used, unmappable) = enc.encode(&lower);
    if unmappable || used != enc {
        return None;
    }
    Some(out.into_owned())
}

#[test]
fn ascii_folding_leaves_other_bytes_alone() {
    let folded = CaseFolding::Ascii.fold(b"\xC4BC Mixed\x00CASE".to_vec());
    assert_eq!(folded.as_deref(), Some(&b"\xC4bc mixed\x00case"[..]));
}

#[cfg(feature = "mbstring")]
#[test]
fn labels_resolve_through_encoding_rs() {
    assert_eq!(CaseFolding::for_label("utf-8").unwrap().name(), "UTF-8");
    assert_eq!(CaseFolding::for_label("windows-1252").unwrap().name(), "windows-1252");
    assert_eq!(CaseFolding::for_label("ISO-8859-1").unwrap(), CaseFolding::Latin1);
    assert_eq!(CaseFolding::for_label(" Latin1 ").unwrap(), CaseFolding::Latin1);
    assert!(matches!(
        CaseFolding::for_label("klingon-8"),
        Err(LowerError::UnsupportedEncoding(_))
    ));
    assert!(matches!(
        CaseFolding::for_label("iso-2022-kr"),
        Err(LowerError::UnsupportedEncoding(_))
    ));
}

#[cfg(feature = "mbstring")]
#[test]
fn encoded_folding_handles_non_ascii() {
    let latin = CaseFolding::for_label("windows-1252").unwrap();
    assert_eq!(latin.fold(b"\xC4\xD6\xDC Abc".to_vec()).unwrap(), b"\xE4\xF6\xFC abc");

    let utf8 = CaseFolding::for_label("utf-8").unwrap();
    assert_eq!(
        utf8.fold("ÄÖÜ Straße ΣΑΣ".as_bytes().to_vec()).unwrap(),
        "äöü straße σας".as_bytes()
    );

    let utf16 = CaseFolding::for_label("utf-16le").unwrap();
    let input: Vec<u8> = "ÉCOLE".encode_utf16().flat_map(u16::to_le_bytes).collect();
    let expected: Vec<u8> = "école".encode_utf16().flat_map(u16::to_le_bytes).collect();
    assert_eq!(utf16.fold(input).unwrap(), expected);
}

#[cfg(feature = "mbstring")]
#[test]
fn encoded_folding_rejects_malformed_content() {
    let utf8 = CaseFolding::for_label("utf-8").unwrap();
    assert_eq!(utf8.fold(b"ABC\xFF".to_vec()), None);
}

#[test]
fn ascii_labels_keep_high_bytes() {
    for label in ["ascii", "US-ASCII", "ANSI_X3.4-1968"] {
        let folding = CaseFolding::for_label(label).unwrap();
        assert_eq!(folding, CaseFolding::Ascii, "label: {label}");
        assert_eq!(folding.fold(b"\xC4BC".to_vec()).unwrap(), b"\xC4bc");
    }
}

#[cfg(feature = "mbstring")]
#[test]
fn latin1_leaves_c1_controls_alone() {
    let latin = CaseFolding::for_label("ISO-8859-1").unwrap();
    assert_eq!(latin.fold(b"\x8A\x8C\x9F".to_vec()).unwrap(), b"\x8A\x8C\x9F");
    assert_eq!(
        latin.fold(b"\xC0\xC4\xDE\xD7 ABC".to_vec()).unwrap(),
        b"\xE0\xE4\xFE\xD7 abc"
    );
}

#[cfg(not(feature = "mbstring"))]
#[test]
fn named_encodings_need_mbstring() {
    let err = CaseFolding::for_label("ISO-8859-1").unwrap_err();
    assert!(err.to_string().contains("mbstring is required"));
}
