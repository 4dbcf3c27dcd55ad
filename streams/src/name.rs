// Stream name codec
// Parses the raw `:name:$TYPE` records returned by stream enumeration and
// builds the `path:name:$DATA` addressing strings the open/delete calls take.

use std::ffi::OsString;
use std::path::Path;

use adsview_core::AdsError;

/// Type tag of an ordinary data stream in the on-disk addressing syntax.
pub const DATA_STREAM_TYPE: &str = "$DATA";

/// Characters a stream name may not contain.
///
/// `:` is the addressing delimiter; `\` and `/` are path separators; NUL
/// terminates the native wide string.
const RESERVED_CHARS: [char; 4] = [':', '\\', '/', '\0'];

/// Outcome of classifying one raw enumeration record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The record names the unnamed (primary) stream, e.g. `::$DATA`.
    /// Not an alternate stream; enumeration skips it silently.
    NotAStream,
    /// The record does not match the `:name:$TYPE` shape at all.
    Malformed(String),
}

/// Extract the user-facing name from a raw enumeration record.
///
/// `":notes:$DATA"` → `"notes"`. The unnamed-stream record `"::$DATA"` is
/// rejected with [`ParseError::NotAStream`]; records missing either
/// delimiter or carrying a type tag that does not start with `$` are
/// rejected with [`ParseError::Malformed`].
pub fn parse(raw: &str) -> Result<String, ParseError> {
    let rest = raw
        .strip_prefix(':')
        .ok_or_else(|| ParseError::Malformed(format!("missing leading ':' in {:?}", raw)))?;

    let (name, stream_type) = rest
        .split_once(':')
        .ok_or_else(|| ParseError::Malformed(format!("missing type delimiter in {:?}", raw)))?;

    if !stream_type.starts_with('$') || stream_type.len() < 2 {
        return Err(ParseError::Malformed(format!(
            "bad type tag {:?} in {:?}",
            stream_type, raw
        )));
    }

    if name.is_empty() {
        return Err(ParseError::NotAStream);
    }

    Ok(name.to_string())
}

/// Check that `stream_name` is usable as an alternate stream name.
///
/// Empty and whitespace-only names are rejected: an absent name is the
/// shell's wildcard for "every stream", so a literal empty name here is
/// always a caller error rather than a request for the unnamed stream.
pub fn validate_name(stream_name: &str) -> Result<(), AdsError> {
    if stream_name.trim().is_empty() {
        return Err(AdsError::InvalidName(
            "stream name is empty or whitespace-only".to_string(),
        ));
    }
    if let Some(c) = stream_name.chars().find(|c| RESERVED_CHARS.contains(c)) {
        return Err(AdsError::InvalidName(format!(
            "stream name {:?} contains reserved character {:?}",
            stream_name, c
        )));
    }
    Ok(())
}

/// Build the addressing string that opens `stream_name` on `entry_path`
/// through the ordinary open-by-path API: `<entry>:<name>:$DATA`.
///
/// The literal form matters; any deviation makes the platform's open call
/// fail with its own error instead of this layer's typed ones. The entry
/// path is carried over as-is (no lossy re-encoding), so entries with
/// non-Unicode names stay addressable.
pub fn build_path(entry_path: &Path, stream_name: &str) -> Result<OsString, AdsError> {
    validate_name(stream_name)?;
    let mut path = entry_path.as_os_str().to_os_string();
    path.push(format!(":{}:{}", stream_name, DATA_STREAM_TYPE));
    Ok(path)
}

impl From<ParseError> for AdsError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::NotAStream => {
                AdsError::InvalidName("the unnamed stream is not an alternate stream".to_string())
            }
            ParseError::Malformed(msg) => AdsError::Malformed(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_record() {
        assert_eq!(parse(":notes:$DATA"), Ok("notes".to_string()));
    }

    #[test]
    fn test_parse_rejects_unnamed_stream() {
        assert_eq!(parse("::$DATA"), Err(ParseError::NotAStream));
    }

    #[test]
    fn test_parse_rejects_missing_leading_colon() {
        assert!(matches!(parse("notes:$DATA"), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn test_parse_rejects_missing_type_delimiter() {
        assert!(matches!(parse(":notes"), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn test_parse_rejects_bad_type_tag() {
        assert!(matches!(parse(":notes:DATA"), Err(ParseError::Malformed(_))));
        assert!(matches!(parse(":notes:$"), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn test_parse_keeps_name_before_first_type_delimiter() {
        // A second ':' lands in the type tag, which then fails validation
        assert!(matches!(parse(":a:b:$DATA"), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn test_build_path_literal_form() {
        let path = build_path(Path::new("report.txt"), "notes").unwrap();
        assert_eq!(path, "report.txt:notes:$DATA");
    }

    #[test]
    fn test_build_path_rejects_empty_and_whitespace() {
        assert!(matches!(
            build_path(Path::new("f"), ""),
            Err(AdsError::InvalidName(_))
        ));
        assert!(matches!(
            build_path(Path::new("f"), "   "),
            Err(AdsError::InvalidName(_))
        ));
    }

    #[test]
    fn test_build_path_rejects_reserved_characters() {
        for name in ["a:b", "a\\b", "a/b", "a\0b"] {
            assert!(
                matches!(build_path(Path::new("f"), name), Err(AdsError::InvalidName(_))),
                "expected rejection of {:?}",
                name
            );
        }
    }

    #[test]
    fn test_parse_errors_convert_to_typed_failures() {
        let err: AdsError = parse("garbage").unwrap_err().into();
        assert!(matches!(err, AdsError::Malformed(_)));

        let err: AdsError = parse("::$DATA").unwrap_err().into();
        assert!(matches!(err, AdsError::InvalidName(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_path_preserves_non_unicode_entries() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::{OsStrExt, OsStringExt};

        let entry = OsStr::from_bytes(b"report\xFF.txt");
        let built = build_path(Path::new(entry), "notes").unwrap();
        assert_eq!(built.into_vec(), b"report\xFF.txt:notes:$DATA".to_vec());
    }

    #[test]
    fn test_name_round_trips_through_record_form() {
        let name = "Zone.Identifier";
        let record = format!(":{}:{}", name, DATA_STREAM_TYPE);
        assert_eq!(parse(&record), Ok(name.to_string()));
    }
}
