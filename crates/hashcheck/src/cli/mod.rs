mod app;
mod check;
mod limit;

pub use app::{App, Commands};
pub use check::{CheckArgs, run_check};
pub use limit::run_limit;
