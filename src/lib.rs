pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::app::run_with_config;
pub use frameworks::terminal::run;
