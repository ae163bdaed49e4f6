pub mod extract;
pub mod history;
pub mod providers;
pub mod recommendations;
pub mod suggestions;

pub use history::HistoryRecorder;
pub use recommendations::Resolver;
