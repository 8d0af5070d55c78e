//! Form helpers that prefill a new wash job from stock data.

use serde::Serialize;

use super::controller::{WashLifecycle, WashResult};
use crate::error::WashError;
use crate::model::NO_EMPLOYEE;

/// What the stock knows about a uniform code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformOptions {
    /// Size of the first variant.
    pub size: String,
    /// Distinct colors, in stock order.
    pub colors: Vec<String>,
}

/// Who holds a specific uniform variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    pub emp_id: String,
    pub emp_name: String,
    pub size: String,
}

impl WashLifecycle {
    /// Size and available colors for `code`.
    pub async fn uniform_options(&self, code: &str) -> WashResult<UniformOptions> {
        let result = self.uniform_options_inner(code).await;
        self.report(result, "load uniform information", |_| None)
    }

    async fn uniform_options_inner(&self, code: &str) -> WashResult<UniformOptions> {
        let code = code.trim();
        let variants = self.stores().master.find_uniforms_by_code(code, None).await?;
        let Some(first) = variants.first() else {
            return Err(WashError::not_found("Uniform", code));
        };

        let mut colors: Vec<String> = Vec::new();
        for variant in &variants {
            if !colors.contains(&variant.color) {
                colors.push(variant.color.clone());
            }
        }
        Ok(UniformOptions {
            size: first.size.clone(),
            colors,
        })
    }

    /// Employee holding `code` in `color`, or `-` placeholders when nobody
    /// does or the variant is unknown.
    pub async fn assignee_for(&self, code: &str, color: &str) -> WashResult<Assignee> {
        let result = self.assignee_for_inner(code, color).await;
        self.report(result, "autofill employee information", |_| None)
    }

    async fn assignee_for_inner(&self, code: &str, color: &str) -> WashResult<Assignee> {
        let variants = self
            .stores()
            .master
            .find_uniforms_by_code(code.trim(), Some(color))
            .await?;

        let placeholder = || NO_EMPLOYEE.to_string();
        Ok(match variants.into_iter().next() {
            Some(v) => Assignee {
                emp_id: v.emp_id.filter(|s| !s.is_empty()).unwrap_or_else(placeholder),
                emp_name: v.emp_name.filter(|s| !s.is_empty()).unwrap_or_else(placeholder),
                size: v.size,
            },
            None => Assignee {
                emp_id: placeholder(),
                emp_name: placeholder(),
                size: String::new(),
            },
        })
    }
}
