use std::io::{BufRead, Read};

use crate::classifier::{classify, LineKind};
use crate::directive::Directive;
use crate::error::TransformError;
use crate::rule;

/// Header Dgraph looks for to find the global authorization object.
pub const DGRAPH_AUTHORIZATION: &str = "# Dgraph.Authorization";

/// Longest single input line accepted, terminator excluded.
pub const MAX_LINE_BYTES: usize = 256 * 1024;

/// Append-only output buffer for one schema. Passthrough lines are copied
/// byte for byte, whatever their encoding.
#[derive(Debug, Default)]
pub struct SchemaAssembler {
    buf: Vec<u8>,
    lines: usize,
    rules: usize,
}

impl SchemaAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next input line, without its terminator.
    pub fn push_line(&mut self, line: &[u8]) -> Result<(), TransformError> {
        self.lines += 1;
        match classify(line) {
            LineKind::Passthrough(bytes) => {
                self.buf.extend_from_slice(bytes);
                self.buf.push(b'\n');
            }
            LineKind::Directive(body) => {
                let directive =
                    Directive::from_bytes(body).map_err(|source| TransformError::Directive {
                        line: self.lines,
                        source,
                    })?;
                tracing::debug!(line = self.lines, base = %directive.base, "Expanded auth rule");
                self.buf
                    .extend_from_slice(rule::expand(&directive).as_bytes());
                self.rules += 1;
            }
        }
        Ok(())
    }

    /// Output so far, without the authorization block.
    pub fn body(&self) -> &[u8] {
        &self.buf
    }

    pub fn rules_expanded(&self) -> usize {
        self.rules
    }

    /// Append the authorization block and hand back the finished schema.
    pub fn finish(mut self, authorization: &str) -> Vec<u8> {
        self.buf.extend_from_slice(DGRAPH_AUTHORIZATION.as_bytes());
        self.buf.push(b' ');
        self.buf.extend_from_slice(authorization.as_bytes());
        self.buf.push(b'\n');
        tracing::info!(lines = self.lines, rules = self.rules, "Schema assembled");
        self.buf
    }
}

/// Read one line into `line` with its `\n` or `\r\n` stripped. Never buffers
/// more than `MAX_LINE_BYTES` plus a terminator. Returns false at end of input.
fn read_line<R: BufRead>(input: &mut R, line: &mut Vec<u8>) -> std::io::Result<bool> {
    line.clear();
    let read = input
        .by_ref()
        .take(MAX_LINE_BYTES as u64 + 2)
        .read_until(b'\n', line)?;
    if read == 0 {
        return Ok(false);
    }
    if line.last() == Some(&b'\n') {
        line.pop();
    }
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(true)
}

/// Run every line of `input` through the assembler and close it with the
/// authorization block. Stops at the first bad line.
pub fn transform<R: BufRead>(mut input: R, authorization: &str) -> Result<Vec<u8>, TransformError> {
    let mut assembler = SchemaAssembler::new();
    let mut line = Vec::new();
    while read_line(&mut input, &mut line)? {
        if line.len() > MAX_LINE_BYTES {
            return Err(TransformError::LineTooLong {
                line: assembler.lines + 1,
                max: MAX_LINE_BYTES,
            });
        }
        assembler.push_line(&line)?;
    }
    Ok(assembler.finish(authorization))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DirectiveError;
    use std::io::Cursor;

    const SCHEMA: &str = "type Node @auth(\n  query: { or: [\n    @opsmxAuthRule(path=owner,team base=queryNode var=$groups permissions=READ)\n  ]}\n) {\n  id: ID!\n}\n";

    fn transform_str(input: &str, authorization: &str) -> String {
        String::from_utf8(transform(input.as_bytes(), authorization).unwrap()).unwrap()
    }

    #[test]
    fn passthrough_lines_are_identical() {
        let plain = "type A {\n  id: ID!\n}\n\n  # comment (with parens)\n";
        let mut assembler = SchemaAssembler::new();
        for line in plain.lines() {
            assembler.push_line(line.as_bytes()).unwrap();
        }
        assert_eq!(assembler.body(), plain.as_bytes());
        assert_eq!(assembler.rules_expanded(), 0);
    }

    #[test]
    fn non_utf8_passthrough_round_trips() {
        let out = transform(&b"# caf\xe9\ntype A {}\n"[..], "{}").unwrap();
        assert_eq!(out, b"# caf\xe9\ntype A {}\n# Dgraph.Authorization {}\n");
    }

    #[test]
    fn non_ascii_whitespace_marker_passes_through() {
        let input = "\u{a0}@opsmxAuthRule(base=Q var=$V permissions=R)\n\u{0b}@opsmxAuthRule(base=Q)\n";
        let out = transform_str(input, "{}");
        assert_eq!(out, format!("{input}# Dgraph.Authorization {{}}\n"));
    }

    #[test]
    fn non_utf8_directive_is_rejected() {
        match transform(&b"@opsmxAuthRule(base=\xe9)\n"[..], "{}") {
            Err(TransformError::Directive { line: 1, source }) => {
                assert!(matches!(source, DirectiveError::NotUtf8 { .. }));
            }
            other => panic!("expected directive error, got {other:?}"),
        }
    }

    #[test]
    fn expands_markers_in_place() {
        let out = transform_str(SCHEMA, "{\"Header\":\"X\"}");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[1], "  query: { or: [");
        assert_eq!(
            lines[2],
            "{ rule: \"query($groups: [String!]) { queryNode @cascade { owner { team { roles(filter: {group: {in: $groups}, permission: {in: [READ]}}) { __typename }}}}}\"},"
        );
        assert_eq!(lines[3], "  ]}");
        assert_eq!(lines[7], "# Dgraph.Authorization {\"Header\":\"X\"}");
    }

    #[test]
    fn authorization_block_appended_once_without_markers() {
        let out = transform_str("type A {}\n", "{}");
        assert_eq!(out, "type A {}\n# Dgraph.Authorization {}\n");
        assert_eq!(out.matches(DGRAPH_AUTHORIZATION).count(), 1);
    }

    #[test]
    fn empty_input_still_gets_authorization_block() {
        assert_eq!(transform_str("", ""), "# Dgraph.Authorization \n");
    }

    #[test]
    fn line_endings_are_normalized() {
        assert_eq!(
            transform_str("a\r\nb\r\nc", "{}"),
            "a\nb\nc\n# Dgraph.Authorization {}\n"
        );
    }

    #[test]
    fn single_marker_end_to_end() {
        let out = transform_str(
            "@opsmxAuthRule(path= base=Node var=$Groups permissions=VIEW)",
            "{...}",
        );
        assert_eq!(
            out,
            "{ rule: \"query($Groups: [String!]) { Node @cascade { roles(filter: {group: {in: $Groups}, permission: {in: [VIEW]}}) { __typename }}}\"},\n# Dgraph.Authorization {...}\n"
        );
    }

    #[test]
    fn malformed_directive_reports_line() {
        let input = "type A {}\n\n@opsmxAuthRule(base var=$V)\n";
        match transform(input.as_bytes(), "{}") {
            Err(TransformError::Directive { line, source }) => {
                assert_eq!(line, 3);
                assert_eq!(
                    source,
                    DirectiveError::MalformedTokens {
                        body: "base var=$V".to_string(),
                        tokens: vec!["base".to_string()],
                    }
                );
            }
            other => panic!("expected directive error, got {other:?}"),
        }
    }

    #[test]
    fn line_at_limit_is_accepted() {
        let long = "x".repeat(MAX_LINE_BYTES);
        let out = transform_str(&format!("{long}\r\n"), "{}");
        assert!(out.starts_with(&format!("{long}\n")));
    }

    #[test]
    fn rejects_oversized_line() {
        let input = format!("ok\n{}\n", "x".repeat(MAX_LINE_BYTES + 1));
        let err = transform(input.as_bytes(), "{}").unwrap_err();
        assert!(
            matches!(err, TransformError::LineTooLong { line: 2, .. }),
            "{err:?}"
        );
    }

    #[test]
    fn oversized_line_is_not_read_to_the_end() {
        let mut input = Cursor::new(format!("{}\nnext\n", "x".repeat(4 * MAX_LINE_BYTES)));
        let err = transform(&mut input, "{}").unwrap_err();
        assert!(matches!(err, TransformError::LineTooLong { line: 1, .. }));
        assert_eq!(input.position(), MAX_LINE_BYTES as u64 + 2);
    }

    #[test]
    fn marker_free_output_is_a_fixed_point() {
        let mut first = SchemaAssembler::new();
        for line in SCHEMA.lines() {
            first.push_line(line.as_bytes()).unwrap();
        }
        let expanded = first.body().to_vec();

        let mut second = SchemaAssembler::new();
        for line in expanded.split(|b| *b == b'\n').filter(|l| !l.is_empty()) {
            second.push_line(line).unwrap();
        }
        assert_eq!(second.body(), &expanded[..]);
        assert_eq!(second.rules_expanded(), 0);
    }
}
