use std::str::FromStr;

use serde::Deserialize;

/// What to do with captured output when the command fails.
///
/// - `Discard`: print only the error line; whatever the command wrote before
///   failing is dropped (default).
/// - `Print`: print the error line followed by the captured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureOutput {
    #[default]
    Discard,
    Print,
}

impl FromStr for FailureOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "discard" => Ok(FailureOutput::Discard),
            "print" => Ok(FailureOutput::Print),
            other => Err(format!(
                "invalid on_failure: {other} (expected \"discard\" or \"print\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_output_from_str() {
        assert_eq!("print".parse::<FailureOutput>(), Ok(FailureOutput::Print));
        assert_eq!(" DISCARD".parse::<FailureOutput>(), Ok(FailureOutput::Discard));
        assert!("keep".parse::<FailureOutput>().is_err());
    }
}
