//! Filename allow-list.
//!
//! A filename is one or more `/`-separated segments. Each segment starts with
//! one of `[a-zA-Z0-9_-]` and continues with any of `[a-zA-Z0-9_. :-]`.
//! Empty segments, leading dots and anything outside those classes are
//! rejected. Space and colon are deliberately part of the continuation class.

use regex::Regex;
use std::sync::LazyLock;

static VALID_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9_-][a-zA-Z0-9_. :-]*/)*[a-zA-Z0-9_-][a-zA-Z0-9_. :-]*$")
        .unwrap_or_else(|e| panic!("filename pattern must compile: {e}"))
});

/// Returns true if `filename` is safe to append to the origin URL prefix.
pub fn validate_filename(filename: &str) -> bool {
    VALID_FILENAME.is_match(filename)
}
