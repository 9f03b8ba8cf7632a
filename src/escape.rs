//! Attribute value escaping for structural queries
//!
//! Query literals are delimited by either `'` or `"`, and neither style can
//! express a value containing both characters. Such values are split on `'`
//! and reassembled with `concat(...)`, quoting each piece with the delimiter
//! it does not contain. Every string, including the empty string, has an
//! exact literal.
//!
//! ## Example
//!
//! ```
//! use junit_merge::escape::escape;
//!
//! assert_eq!(escape("plain"), "'plain'");
//! assert_eq!(escape("it's"), "\"it's\"");
//! assert_eq!(escape("it's \"x\""), "concat('it', \"'\", 's \"x\"')");
//! ```

/// Build a query literal that compares equal to exactly `value`.
pub fn escape(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }

    // Both quote characters are present, so at least one segment is non-empty
    // and at least one apostrophe separator is emitted: concat() gets two or
    // more arguments.
    let mut parts = Vec::new();
    for (index, segment) in value.split('\'').enumerate() {
        if index > 0 {
            parts.push("\"'\"".to_string());
        }
        if !segment.is_empty() {
            parts.push(format!("'{}'", segment));
        }
    }
    format!("concat({})", parts.join(", "))
}

/// Build a `[@attribute=literal]` predicate matching `value` exactly.
pub fn attribute_predicate(attribute: &str, value: &str) -> String {
    format!("[@{}={}]", attribute, escape(value))
}
