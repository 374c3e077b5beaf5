use crate::ir::FlowEdge;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static INIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%%\{\s*init\s*:\s*(\{.*\})\s*\}%%").unwrap());
static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^sankey(-beta)?\s*$").unwrap());

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid JSON input: {0}")]
    Json(String),

    #[error("expected a JSON array of flows or an object with a `data` array")]
    UnexpectedShape,

    #[error("flow #{index}: {reason}")]
    InvalidFlow { index: usize, reason: String },

    #[error("line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub edges: Vec<FlowEdge>,
    /// Settings carried alongside the data (`settings` object or `%%{init}%%`).
    pub settings: Option<Value>,
}

/// Accepts either a JSON flow list (optionally wrapped as
/// `{"data": [...], "settings": {...}}`) or `from, to, value` text lines.
pub fn parse_flows(input: &str) -> Result<ParseOutput, ParseError> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        parse_json_flows(trimmed)
    } else {
        parse_text_flows(input)
    }
}

fn parse_json_flows(input: &str) -> Result<ParseOutput, ParseError> {
    let value: Value = match serde_json::from_str(input) {
        Ok(value) => value,
        Err(json_err) => json5::from_str(input)
            .map_err(|json5_err| ParseError::Json(format!("{json_err} (json5: {json5_err})")))?,
    };

    let (data, settings) = match value {
        Value::Array(items) => (items, None),
        Value::Object(mut map) => {
            let Some(Value::Array(items)) = map.remove("data") else {
                return Err(ParseError::UnexpectedShape);
            };
            (items, map.remove("settings"))
        }
        _ => return Err(ParseError::UnexpectedShape),
    };

    let edges = data
        .iter()
        .enumerate()
        .map(|(index, item)| json_edge(index, item))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!(flows = edges.len(); "Parsed JSON flows");
    Ok(ParseOutput { edges, settings })
}

fn json_edge(index: usize, item: &Value) -> Result<FlowEdge, ParseError> {
    let invalid = |reason: String| ParseError::InvalidFlow { index, reason };
    let Value::Object(map) = item else {
        return Err(invalid(format!("expected an object, got {item}")));
    };
    let node = |key: &str| -> Result<String, ParseError> {
        match map.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
            Some(Value::String(_)) => Err(invalid(format!("`{key}` is empty"))),
            Some(other) => Err(invalid(format!("`{key}` must be a string, got {other}"))),
            None => Err(invalid(format!("missing `{key}`"))),
        }
    };
    let from = node("from")?;
    let to = node("to")?;
    let value = match map.get("value") {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| invalid(format!("`value` {n} is out of range")))?,
        Some(other) => return Err(invalid(format!("`value` must be a number, got {other}"))),
        None => return Err(invalid("missing `value`".to_string())),
    };
    check_value(value).map_err(invalid)?;
    Ok(FlowEdge { from, to, value })
}

fn parse_text_flows(input: &str) -> Result<ParseOutput, ParseError> {
    let mut output = ParseOutput::default();

    for (line_idx, raw_line) in input.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = INIT_RE.captures(line) {
            if let Some(json_str) = caps.get(1).map(|m| m.as_str()) {
                if let Ok(value) = serde_json::from_str::<Value>(json_str) {
                    output.settings = Some(value);
                } else if let Ok(value) = json5::from_str::<Value>(json_str) {
                    output.settings = Some(value);
                } else {
                    log::warn!(line = line_no; "Ignoring unparseable init directive");
                }
            }
            continue;
        }
        if line.starts_with("%%") || HEADER_RE.is_match(line) {
            continue;
        }

        let invalid = |reason: String| ParseError::InvalidLine {
            line: line_no,
            reason,
        };
        let parts = split_args(line);
        if parts.len() != 3 {
            return Err(invalid(format!(
                "expected `from, to, value`, got {} field(s)",
                parts.len()
            )));
        }
        let from = strip_quotes(&parts[0]);
        let to = strip_quotes(&parts[1]);
        if from.is_empty() || to.is_empty() {
            return Err(invalid("node names must not be empty".to_string()));
        }
        let value: f64 = parts[2]
            .parse()
            .map_err(|_| invalid(format!("`{}` is not a number", parts[2])))?;
        check_value(value).map_err(invalid)?;
        output.edges.push(FlowEdge { from, to, value });
    }

    log::debug!(flows = output.edges.len(); "Parsed text flows");
    Ok(output)
}

fn check_value(value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("value {value} is not a finite number"));
    }
    if value < 0.0 {
        return Err(format!("value {value} is negative"));
    }
    Ok(())
}

fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for ch in input.chars() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            current.push(ch);
            continue;
        }
        if ch == '"' || ch == '\'' {
            quote = Some(ch);
            current.push(ch);
            continue;
        }
        if ch == ',' {
            args.push(current.trim().to_string());
            current.clear();
            continue;
        }
        current.push(ch);
    }
    args.push(current.trim().to_string());
    args
}

fn strip_quotes(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}
