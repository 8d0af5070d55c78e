//! Uniform stock and employee commands.

use anyhow::Result;
use uniwash::{Employee, StockStatus, UniformVariant};

use super::emit;
use crate::state::AppState;

pub struct UniformInput {
    pub uniform_code: String,
    pub color: String,
    pub size: String,
    pub uniform_type: String,
    pub emp_id: Option<String>,
    pub emp_name: Option<String>,
}

impl UniformInput {
    /// Variants with a holder start out assigned.
    fn into_variant(self) -> UniformVariant {
        let emp_id = self.emp_id.filter(|id| !id.trim().is_empty());
        let stock_status = if emp_id.is_some() {
            StockStatus::Assigned
        } else {
            StockStatus::Available
        };
        UniformVariant {
            uniform_code: self.uniform_code.trim().to_string(),
            color: self.color.trim().to_string(),
            size: self.size,
            uniform_type: self.uniform_type,
            emp_id,
            emp_name: self.emp_name,
            stock_status,
            rewash_count: 0,
        }
    }
}

pub async fn add_uniform(state: &AppState, json: bool, input: UniformInput) -> Result<()> {
    let variant = input.into_variant();
    state.store.register_uniform(&variant)?;
    emit(json, &variant, |v| {
        println!("Registered {} ({}) as {}", v.uniform_code, v.color, v.stock_status.as_str())
    })
}

pub async fn add_employee(state: &AppState, json: bool, employee: Employee) -> Result<()> {
    state.store.register_employee(&employee)?;
    emit(json, &employee, |e| println!("Registered {} {}", e.emp_id, e.emp_name))
}

pub async fn options(state: &AppState, json: bool, code: &str) -> Result<()> {
    let options = state.lifecycle.uniform_options(code).await?;
    emit(json, &options, |o| {
        println!("Size    {}", if o.size.is_empty() { "-" } else { &o.size });
        println!("Colors  {}", o.colors.join(", "));
    })
}

pub async fn assignee(state: &AppState, json: bool, code: &str, color: &str) -> Result<()> {
    let assignee = state.lifecycle.assignee_for(code, color).await?;
    emit(json, &assignee, |a| println!("{} {}", a.emp_id, a.emp_name))
}
