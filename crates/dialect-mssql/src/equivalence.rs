use schemadrift_core::{EquivalencePolicy, Expr};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MssqlEquivalencePolicy;

pub(crate) static MSSQL_EQUIVALENCE_POLICY: MssqlEquivalencePolicy = MssqlEquivalencePolicy;

impl EquivalencePolicy for MssqlEquivalencePolicy {
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

/// Normalization owns structural expression canonicalization in MSSQL. This
/// policy is the residual safety valve for `Expr::Raw` `CHECK` clause
/// spellings, including folding an `OR`-chain of equality comparisons
/// against a single column into the same canonical form as an equivalent
/// `IN (...)` list (e.g. `status = 'a' OR status = 'b'` vs
/// `status IN ('a', 'b')`).
fn canonical_expr(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Raw(raw) => Some(canonical_raw_expr(raw)),
        Expr::Paren(inner) => canonical_expr(inner),
        _ => None,
    }
}

fn canonical_raw_expr(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    let unwrapped = strip_redundant_outer_parens(collapsed);

    if let Some(canonical) = fold_equality_predicate(&unwrapped) {
        return canonical;
    }

    unwrapped
}

/// Recognizes `col = 'a' OR col = 'b' ...` and `col IN ('a', 'b', ...)`
/// (optionally negated) and renders both to the same sorted `IN` form.
fn fold_equality_predicate(expr: &str) -> Option<String> {
    if let Some((column, literals)) = parse_or_chain(expr) {
        return Some(render_in_predicate(&column, literals, false));
    }

    if let Some((column, negated, literals)) = parse_in_list(expr) {
        return Some(render_in_predicate(&column, literals, negated));
    }

    None
}

fn render_in_predicate(column: &str, mut literals: Vec<String>, negated: bool) -> String {
    literals.sort();
    let joined = literals
        .iter()
        .map(|literal| format!("'{literal}'"))
        .collect::<Vec<_>>()
        .join(", ");
    let keyword = if negated { "NOT IN" } else { "IN" };
    format!("{column} {keyword} ({joined})")
}

fn parse_or_chain(expr: &str) -> Option<(String, Vec<String>)> {
    let clauses = split_top_level(expr, " OR ")?;
    if clauses.len() < 2 {
        return None;
    }

    let mut column = None;
    let mut literals = Vec::with_capacity(clauses.len());

    for clause in clauses {
        let clause = strip_redundant_outer_parens(clause.trim().to_string());
        let (lhs, rhs) = clause.split_once('=')?;
        let lhs = normalize_ident(lhs.trim());
        let literal = parse_quoted_literal(rhs.trim())?;

        match &column {
            None => column = Some(lhs),
            Some(existing) if *existing == lhs => {}
            Some(_) => return None,
        }
        literals.push(literal);
    }

    Some((column?, literals))
}

fn parse_in_list(expr: &str) -> Option<(String, bool, Vec<String>)> {
    let upper = expr.to_ascii_uppercase();
    let (needle, negated) = if upper.contains(" NOT IN ") {
        (" NOT IN ", true)
    } else if upper.contains(" IN ") {
        (" IN ", false)
    } else {
        return None;
    };

    let index = upper.find(needle)?;
    let column = normalize_ident(expr[..index].trim());
    let rest = expr[index + needle.len()..].trim();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;

    let literals = split_top_level(inner, ",")?
        .into_iter()
        .map(|item| parse_quoted_literal(item.trim()))
        .collect::<Option<Vec<_>>>()?;

    Some((column, negated, literals))
}

fn parse_quoted_literal(raw: &str) -> Option<String> {
    let inner = raw.strip_prefix('\'')?.strip_suffix('\'')?;
    if inner.contains('\'') {
        return None;
    }
    Some(inner.to_string())
}

fn normalize_ident(raw: &str) -> String {
    raw.trim_matches(|ch| ch == '[' || ch == ']').to_string()
}

/// Splits on a separator at bracket/paren depth zero, outside quotes.
fn split_top_level(input: &str, separator: &str) -> Option<Vec<String>> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_quote = false;
    let mut start = 0usize;
    let bytes = input.as_bytes();
    let sep_bytes = separator.as_bytes();
    let mut index = 0usize;

    while index < bytes.len() {
        let ch = bytes[index] as char;
        if ch == '\'' {
            in_quote = !in_quote;
            index += 1;
            continue;
        }
        if in_quote {
            index += 1;
            continue;
        }
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            _ => {}
        }
        if depth == 0 && input[index..].len() >= sep_bytes.len() && input.as_bytes()[index..index + sep_bytes.len()] == *sep_bytes
        {
            parts.push(input[start..index].to_string());
            index += sep_bytes.len();
            start = index;
            continue;
        }
        index += 1;
    }

    if in_quote || depth != 0 {
        return None;
    }

    parts.push(input[start..].to_string());
    Some(parts)
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
