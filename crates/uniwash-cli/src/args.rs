use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// uniwash - uniform wash-cycle tracker
#[derive(Parser, Debug)]
#[command(name = "uniwash")]
#[command(version, about = "Track uniform wash jobs, ESD tests and scrapping", long_about = None)]
pub struct Cli {
    /// Path to the JSON config file (default: ~/.uniwash/config.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Wash jobs ===
    /// Start a wash job for a uniform
    Add {
        uniform_code: String,
        color: String,

        #[arg(long)]
        size: Option<String>,

        /// Employee id; the name is looked up when --emp-name is not given
        #[arg(long)]
        emp_id: Option<String>,

        #[arg(long)]
        emp_name: Option<String>,
    },

    /// List active wash jobs
    #[command(alias = "ls")]
    List {
        /// Substring of uniform code, employee id or name
        #[arg(short, long)]
        search: Option<String>,

        /// Exact status, e.g. "Re-Washing #2"
        #[arg(long)]
        status: Option<String>,

        #[arg(short, long, default_value = "1")]
        page: usize,

        #[arg(long)]
        per_page: Option<usize>,
    },

    /// Remove an active wash job
    Delete { id: String },

    /// Move a job's creation date by whole days
    Shift {
        wash_id: String,

        /// Days to add; negative moves the date back
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },

    /// Stream board updates until interrupted
    Watch,

    // === ESD testing ===
    /// ESD test commands
    #[command(subcommand)]
    Esd(EsdCommands),

    // === Read side ===
    /// Show the wash history
    History {
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Show summary counters
    Summary,

    /// Export a table as CSV
    Export {
        #[arg(value_enum)]
        table: ExportKind,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    // === Master data ===
    /// Uniform stock commands
    #[command(subcommand)]
    Uniform(UniformCommands),

    /// Employee commands
    #[command(subcommand)]
    Employee(EmployeeCommands),
}

#[derive(Subcommand, Debug)]
pub enum EsdCommands {
    /// Check that a job is ready for testing
    Begin { id: String },

    /// Record a passed test
    Pass { id: String },

    /// Record a failed test
    Fail { id: String },
}

#[derive(Subcommand, Debug)]
pub enum UniformCommands {
    /// Register or update a uniform variant
    Add {
        uniform_code: String,
        color: String,

        #[arg(long, default_value = "")]
        size: String,

        #[arg(long = "type", default_value = "")]
        uniform_type: String,

        #[arg(long)]
        emp_id: Option<String>,

        #[arg(long)]
        emp_name: Option<String>,
    },

    /// Size and colors known for a uniform code
    Options { uniform_code: String },

    /// Holder of a uniform variant
    Assignee { uniform_code: String, color: String },
}

#[derive(Subcommand, Debug)]
pub enum EmployeeCommands {
    /// Register or update an employee
    Add {
        emp_id: String,
        emp_name: String,

        #[arg(long, default_value = "")]
        department: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    Active,
    History,
}
