use crate::directive::Directive;

/// Expand a directive into one `@auth` rule entry, newline included.
///
/// Each non-empty path segment opens a nested selection around the `roles`
/// filter and closes it again afterwards. `var` and `permissions` are
/// substituted verbatim; they end up inside a quoted string, so callers must
/// not pass unescaped quotes.
pub fn expand(d: &Directive) -> String {
    let mut out = format!(
        "{{ rule: \"query({}: [String!]) {{ {} @cascade {{ ",
        d.var, d.base
    );
    let mut depth = 0;
    for segment in d.segments() {
        out.push_str(segment);
        out.push_str(" { ");
        depth += 1;
    }
    out.push_str(&format!(
        "roles(filter: {{group: {{in: {}}}, permission: {{in: [{}]}}}}) {{ __typename }}",
        d.var, d.permissions
    ));
    out.push_str(&"}".repeat(depth));
    out.push_str("}}\"},\n");
    out
}
