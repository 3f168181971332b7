//! Setup code parsing.
//!
//! A setup code is a `;`-separated list of `name:default:required` triplets,
//! e.g. `Name:John:T;Age::F`. The required flag is `T` or `F` in either case.
//! Blank segments (such as the one after a trailing `;`) are ignored.
//!
//! Parsing is all-or-nothing: every malformed segment is reported, and a
//! single bad segment rejects the whole code so a half-applied schema never
//! replaces the current one.

use tracing::{debug, warn};

use crate::codec::{SEGMENT_SEPARATOR, TRIPLET_SEPARATOR};
use crate::error::{SegmentError, SetupParseError};
use crate::model::FieldSpec;

/// Parses a scanned setup code into an ordered list of field specifications.
pub fn parse_setup(text: &str) -> Result<Vec<FieldSpec>, SetupParseError> {
    if text.trim().is_empty() {
        warn!("setup code is empty");
        return Err(SetupParseError::Empty);
    }

    let mut specs = Vec::new();
    let mut errors = Vec::new();

    for (index, segment) in text.split(SEGMENT_SEPARATOR).enumerate() {
        if segment.trim().is_empty() {
            continue;
        }
        match parse_segment(index, segment) {
            Ok(spec) => specs.push(spec),
            Err(err) => {
                warn!(%err, "malformed setup segment");
                errors.push(err);
            }
        }
    }

    if !errors.is_empty() {
        return Err(SetupParseError::Malformed { errors });
    }
    if specs.is_empty() {
        return Err(SetupParseError::NoFields);
    }

    debug!(fields = specs.len(), "parsed setup code");
    Ok(specs)
}

fn parse_segment(index: usize, segment: &str) -> Result<FieldSpec, SegmentError> {
    let parts: Vec<&str> = segment.split(TRIPLET_SEPARATOR).collect();
    let [name, value, flag] = parts.as_slice() else {
        return Err(SegmentError::WrongPartCount {
            index,
            segment: segment.to_string(),
            parts: parts.len(),
        });
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(SegmentError::EmptyName {
            index,
            segment: segment.to_string(),
        });
    }

    let required = match flag.trim() {
        f if f.eq_ignore_ascii_case("T") => true,
        f if f.eq_ignore_ascii_case("F") => false,
        f => {
            return Err(SegmentError::InvalidRequiredFlag {
                index,
                segment: segment.to_string(),
                flag: f.to_string(),
            });
        }
    };

    Ok(FieldSpec::new(name, value.trim(), required))
}
