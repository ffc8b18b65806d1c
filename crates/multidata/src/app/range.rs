//! Range expressions such as `[1:20]`, `[1.2.3]`, `[:3]` and `[]`.

use crate::domain::errors::ConfigError;

const SPEC_SEPARATOR: char = '.';
const SPAN_SEPARATOR: char = ':';
/// Upper bound on the number of indices one expression may resolve to.
pub const MAX_INDICES: usize = 1_000_000;

/// Resolve a bracketed range expression into concrete indices.
///
/// An empty expression (or `[]`) yields no indices, which asks the extractor to auto-detect the
/// range per file. Specs keep their written order; duplicates and inversions are preserved.
/// Spans are inclusive at both ends and must name an upper bound.
pub fn parse_range(expr: &str) -> Result<Vec<usize>, ConfigError> {
    let body = expr.trim().trim_matches(|c| c == '[' || c == ']');
    let mut indices = Vec::new();

    for spec in body.split(SPEC_SEPARATOR).map(str::trim) {
        if spec.is_empty() {
            continue;
        }

        match spec.split_once(SPAN_SEPARATOR) {
            Some((start, end)) => {
                let start = match start.trim() {
                    "" => 0,
                    raw => parse_index(expr, raw)?,
                };
                let end = match end.trim() {
                    "" => {
                        return Err(ConfigError::UnboundedRange {
                            spec: spec.to_string(),
                        });
                    }
                    raw => parse_index(expr, raw)?,
                };
                let span = if end < start { 0 } else { end - start + 1 };
                check_capacity(expr, indices.len(), span)?;
                indices.extend(start..=end);
            }
            None => {
                check_capacity(expr, indices.len(), 1)?;
                indices.push(parse_index(expr, spec)?);
            }
        }
    }

    Ok(indices)
}

fn check_capacity(expr: &str, resolved: usize, additional: usize) -> Result<(), ConfigError> {
    if additional > MAX_INDICES - resolved {
        return Err(ConfigError::InvalidRange {
            expr: expr.to_string(),
            reason: format!("resolves to more than {MAX_INDICES} indices"),
        });
    }
    Ok(())
}

fn parse_index(expr: &str, raw: &str) -> Result<usize, ConfigError> {
    raw.parse::<usize>().map_err(|_| ConfigError::InvalidRange {
        expr: expr.to_string(),
        reason: format!("'{raw}' is not a non-negative integer"),
    })
}
