use schemadrift_core::{EquivalencePolicy, Expr};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MysqlEquivalencePolicy;

pub(crate) static MYSQL_EQUIVALENCE_POLICY: MysqlEquivalencePolicy = MysqlEquivalencePolicy;

impl EquivalencePolicy for MysqlEquivalencePolicy {
    fn is_equivalent_expr(&self, left: &Expr, right: &Expr) -> bool {
        let Some(left_canonical) = canonical_expr(left) else {
            return false;
        };
        let Some(right_canonical) = canonical_expr(right) else {
            return false;
        };

        left_canonical == right_canonical
    }
}

/// Normalization owns structural expression canonicalization in MySQL. This
/// policy is only a residual safety valve for `Expr::Raw` spellings that
/// remain textually different after normalization (whitespace, redundant
/// parens around a `CHECK`/`DEFAULT` clause).
fn canonical_expr(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Raw(raw) => Some(canonical_raw_expr(raw)),
        Expr::Paren(inner) => canonical_expr(inner),
        _ => None,
    }
}

fn canonical_raw_expr(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    strip_redundant_outer_parens(collapsed)
}

fn strip_redundant_outer_parens(input: String) -> String {
    let mut candidate = input;
    loop {
        let trimmed = candidate.trim();
        if !trimmed.starts_with('(') || !trimmed.ends_with(')') {
            return trimmed.to_string();
        }
        if !outer_parens_wrap_entire_expr(trimmed) {
            return trimmed.to_string();
        }

        let inner = trimmed
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(trimmed)
            .trim();
        candidate = inner.to_string();
    }
}

fn outer_parens_wrap_entire_expr(expr: &str) -> bool {
    let mut depth = 0i32;
    let mut in_quote = false;
    let mut chars = expr.char_indices().peekable();

    while let Some((_index, ch)) = chars.next() {
        if ch == '\'' {
            if in_quote {
                if matches!(chars.peek(), Some((_, '\''))) {
                    chars.next();
                } else {
                    in_quote = false;
                }
            } else {
                in_quote = true;
            }
            continue;
        }

        if in_quote {
            continue;
        }

        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
                if depth == 0 && chars.peek().is_some() {
                    return false;
                }
            }
            _ => {}
        }
    }

    depth == 0 && !in_quote
}

fn collapse_whitespace(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_quote = false;
    let mut pending_space = false;

    for ch in input.chars() {
        if ch == '\'' {
            if pending_space && !output.is_empty() {
                output.push(' ');
            }
            pending_space = false;
            output.push(ch);
            in_quote = !in_quote;
            continue;
        }

        if !in_quote && ch.is_whitespace() {
            pending_space = true;
            continue;
        }

        if pending_space && !output.is_empty() {
            output.push(' ');
        }
        pending_space = false;
        output.push(ch);
    }

    output.trim().to_string()
}
