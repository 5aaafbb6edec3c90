//! Field tag parsing.
//!
//! A field tag is a serialized name followed by comma-separated options:
//! `"<name>,<option>,…"`. The name `-` omits the field entirely.
//! Recognized options are `secure`, `hash`, and `omitempty`; anything
//! else is ignored.

/// Tag option enabling sparse encryption of a field.
pub const SECURE_OPTION: &str = "secure";

/// Tag option hashing a string field. Defaults to sha256.
pub const HASH_OPTION: &str = "hash";

/// Tag option omitting a field whose value is empty.
pub const OMIT_EMPTY_OPTION: &str = "omitempty";

/// Field name that omits the field from the encoding.
pub const IGNORE_NAME: &str = "-";

/// The default (and currently only) hash transform name.
pub const HASH_SHA256: &str = "sha256";

const TAG_SEPARATOR: char = ',';

/// Splits a field tag into its name and options.
pub fn parse_tag(tag: &str) -> (&str, Vec<&str>) {
    let mut parts = tag.split(TAG_SEPARATOR);
    let name = parts.next().unwrap_or_default();
    if ignore_field(name) {
        return (name, Vec::new());
    }
    (name, parts.collect())
}

/// True if the name marks the field as omitted.
pub fn ignore_field(name: &str) -> bool {
    name == IGNORE_NAME
}

/// True if the options contain `opt`.
pub fn has_option(opts: &[&str], opt: &str) -> bool {
    opts.contains(&opt)
}

/// Returns the hash transform name selected by the options, if any.
/// The field must be a string to be hashable.
pub fn hash_name(opts: &[&str]) -> Option<&'static str> {
    has_option(opts, HASH_OPTION).then_some(HASH_SHA256)
}

/// True if the secure option is set.
pub fn is_secure(opts: &[&str]) -> bool {
    has_option(opts, SECURE_OPTION)
}

/// True if the omitempty option is set.
pub fn is_omit_empty(opts: &[&str]) -> bool {
    has_option(opts, OMIT_EMPTY_OPTION)
}
