pub mod report;
pub mod state;

pub use report::RunReport;
pub use state::App;
