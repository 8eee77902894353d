use crate::value::Value;
use serde::Serialize;
use std::fmt;

/// One input/output pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Example {
    pub input: Value,
    pub output: Value,
}

impl Example {
    pub fn new(input: impl Into<Value>, output: impl Into<Value>) -> Self {
        Example {
            input: input.into(),
            output: output.into(),
        }
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.input, self.output)
    }
}
