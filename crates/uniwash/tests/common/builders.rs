//! Builders for master data used across tests.

#![allow(dead_code)]

use uniwash::{Employee, StockStatus, UniformVariant};

/// Builder for `UniformVariant` stock rows.
pub struct UniformBuilder {
    variant: UniformVariant,
}

impl UniformBuilder {
    pub fn new(code: &str, color: &str) -> Self {
        Self {
            variant: UniformVariant {
                uniform_code: code.to_string(),
                color: color.to_string(),
                size: "M".to_string(),
                uniform_type: "Smock".to_string(),
                emp_id: None,
                emp_name: None,
                stock_status: StockStatus::Available,
                rewash_count: 0,
            },
        }
    }

    pub fn size(mut self, size: &str) -> Self {
        self.variant.size = size.to_string();
        self
    }

    pub fn assigned_to(mut self, emp_id: &str, emp_name: &str) -> Self {
        self.variant.emp_id = Some(emp_id.to_string());
        self.variant.emp_name = Some(emp_name.to_string());
        self.variant.stock_status = StockStatus::Assigned;
        self
    }

    pub fn rewash_count(mut self, count: u32) -> Self {
        self.variant.rewash_count = count;
        self
    }

    pub fn stock_status(mut self, status: StockStatus) -> Self {
        self.variant.stock_status = status;
        self
    }

    pub fn build(self) -> UniformVariant {
        self.variant
    }
}

pub fn employee(emp_id: &str, emp_name: &str) -> Employee {
    Employee {
        emp_id: emp_id.to_string(),
        emp_name: emp_name.to_string(),
        department: "Cleanroom".to_string(),
    }
}
