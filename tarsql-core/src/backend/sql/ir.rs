use serde::Serialize;

use crate::ir::value::Value;

/// Compiled statement with its positional bindings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PatternWithParams {
    pub pattern: String,
    pub params: Vec<Value>,
}

impl PatternWithParams {
    #[must_use]
    pub fn new(pattern: String, params: Vec<Value>) -> Self {
        PatternWithParams { pattern, params }
    }
}

impl From<PatternWithParams> for String {
    fn from(p: PatternWithParams) -> Self {
        format!("pattern: {}, parameters: {:?}", p.pattern, p.params)
    }
}
