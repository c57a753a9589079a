pub mod check_cmd;
pub mod completions_cmd;
pub mod config;
pub mod default;
pub mod rules_cmd;
