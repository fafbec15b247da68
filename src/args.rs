//! Splitting raw filter tokens into [`FilterSpec`]s.
//!
//! ```text
//! -crop 100 80 -gs -drop 3 -1 -1
//! └── crop [100, 80] ┘ └ gs ┘ └ drop [3, -1, -1] ┘
//! ```
//!
//! A token starting with `-` opens a new spec unless it reads as a number,
//! in which case it is a parameter of the current spec. The first token
//! always opens a spec, so a stray leading word such as `foo` surfaces as an
//! unknown filter instead of vanishing.

use crate::pipeline::FilterSpec;

/// Group `tokens` into filter specs in command-line order.
pub fn parse_filters<S: AsRef<str>>(tokens: &[S]) -> Vec<FilterSpec> {
    let mut specs: Vec<FilterSpec> = Vec::new();
    for token in tokens.iter().map(AsRef::as_ref) {
        match specs.last_mut() {
            Some(current) if !is_filter_name(token) => current.params.push(token.to_string()),
            _ => specs.push(FilterSpec {
                name: token.to_string(),
                params: Vec::new(),
            }),
        }
    }
    specs
}

fn is_filter_name(token: &str) -> bool {
    token.starts_with('-') && token.parse::<f64>().is_err()
}
