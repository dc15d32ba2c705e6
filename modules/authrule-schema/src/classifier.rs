use regex::bytes::Regex;
use std::sync::LazyLock;

// Whitespace is the ASCII set `[\t\n\f\r ]` only; NBSP or `\v` around a
// marker leaves the line untouched. The argument list may hold any bytes
// except `)`.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\t\n\f\r ]*@opsmxAuthRule\(((?-u:[^)])+)\)[\t\n\f\r ]*$").unwrap()
});

/// What a single schema line turns out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Copied to the output as-is.
    Passthrough(&'a [u8]),
    /// An `@opsmxAuthRule(...)` marker; holds the trimmed argument list.
    Directive(&'a [u8]),
}

pub fn classify(line: &[u8]) -> LineKind<'_> {
    match MARKER_RE.captures(line).and_then(|c| c.get(1)) {
        Some(args) => LineKind::Directive(args.as_bytes().trim_ascii()),
        None => LineKind::Passthrough(line),
    }
}
