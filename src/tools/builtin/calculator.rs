// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Calculator tool
//!
//! Evaluates an arithmetic formula with `evalexpr`. Integer operands stay
//! integers, so `7/2` is `3` while `7.0/2` is `3.5`.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AgentError, Result};
use crate::llm::provider::FunctionDefinition;
use crate::tools::{SchemaBuilder, Tool};

/// Tool for evaluating math formulas
#[derive(Debug, Default, Clone, Copy)]
pub struct CalculatorTool;

impl CalculatorTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn definition(&self) -> FunctionDefinition {
        FunctionDefinition {
            name: "calculator".to_string(),
            description: "用于完成数学公式计算的工具，例如 1+4、(3+5)*2、2^10".to_string(),
            parameters: SchemaBuilder::new()
                .string(
                    "math_formula",
                    "需要计算的数学公式，只包含数字和运算符",
                    true,
                )
                .build(),
            responses: Some(
                SchemaBuilder::new()
                    .number("formula_result", "数学公式的计算结果", true)
                    .build(),
            ),
        }
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let formula = args["math_formula"]
            .as_str()
            .ok_or_else(|| AgentError::InvalidInput("math_formula is required".to_string()))?
            .trim();
        if formula.is_empty() {
            return Err(AgentError::InvalidInput(
                "math_formula must not be empty".to_string(),
            ));
        }

        let result = evalexpr::eval(formula)
            .map_err(|e| AgentError::ToolExecution(format!("cannot evaluate '{}': {}", formula, e)))?;

        let value = if let Ok(i) = result.as_int() {
            serde_json::json!(i)
        } else if let Ok(f) = result.as_float() {
            if !f.is_finite() {
                return Err(AgentError::ToolExecution(format!(
                    "'{}' has no finite result",
                    formula
                )));
            }
            serde_json::json!(f)
        } else {
            return Err(AgentError::ToolExecution(format!(
                "'{}' is not a numeric formula",
                formula
            )));
        };

        Ok(serde_json::json!({ "formula_result": value }))
    }
}
