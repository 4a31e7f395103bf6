//! Glob patterns over registry paths.
//!
//! A pattern is split on `/` and every segment becomes `\/<segment>`, with
//! the wildcard segment `*` becoming `\/(.*)`. The wildcard is not limited
//! to one segment: `/*/x` matches `/A/B/x`.

use crate::error::{GuiError, GuiResult};
use regex::Regex;

pub const WILDCARD: &str = "*";

pub fn pattern_to_regex(pattern: &str) -> GuiResult<Regex> {
    let mut segments: Vec<&str> = pattern.split('/').collect();
    if segments.first() == Some(&"") {
        segments.remove(0);
    }

    let mut expr = String::from("^");
    for segment in segments {
        expr.push_str("\\/");
        if segment == WILDCARD {
            expr.push_str("(.*)");
        } else {
            expr.push_str(&regex::escape(segment));
        }
    }
    expr.push('$');

    Regex::new(&expr).map_err(|e| GuiError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
