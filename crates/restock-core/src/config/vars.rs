//! Environment variable interpolation for config files.
//!
//! Supports the following syntax:
//! - `${VAR}` - substitute with env var value, error if missing
//! - `${VAR:-default}` - use default if VAR is unset or empty
//! - `$$` - escape sequence for literal `$`

use regex::Regex;
use std::env;
use std::sync::LazyLock;

/// Regex pattern for environment variable interpolation.
static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \$\$                           # Escape sequence $$
        |
        \$\{                           # Opening ${
            ([A-Za-z_][A-Za-z0-9_]*)   # Variable name (capture group 1)
            (?:
                :-                     # Default value separator
                ([^}]*)                # Default value (capture group 2)
            )?
        \}                             # Closing }
        ",
    )
    .expect("Invalid regex pattern")
});

/// Result of environment variable interpolation.
#[derive(Debug)]
pub struct InterpolationResult {
    /// The interpolated text.
    pub text: String,
    /// Any errors encountered during interpolation.
    pub errors: Vec<String>,
}

impl InterpolationResult {
    /// Returns true if there were no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Interpolate environment variables in the given text.
///
/// All errors are accumulated so the user can see every missing variable at
/// once instead of fixing them one by one.
pub fn interpolate(input: &str) -> InterpolationResult {
    let mut errors = Vec::new();

    let text = ENV_VAR_PATTERN
        .replace_all(input, |caps: &regex::Captures| {
            let full_match = caps.get(0).unwrap().as_str();

            if full_match == "$$" {
                return "$".to_string();
            }

            let var_name = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let default_value = caps.get(2).map(|m| m.as_str());

            match env::var(var_name) {
                Ok(value) if !value.is_empty() => value,
                // Set but empty: the default applies if one was given,
                // otherwise the empty value passes through.
                Ok(value) => match default_value {
                    Some(default) => default.to_string(),
                    None => value,
                },
                Err(_) => match default_value {
                    Some(default) => default.to_string(),
                    None => {
                        errors.push(format!("environment variable '{var_name}' is not set"));
                        full_match.to_string()
                    }
                },
            }
        })
        .to_string();

    InterpolationResult { text, errors }
}
