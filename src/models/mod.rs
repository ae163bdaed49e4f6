pub mod genre;
pub mod history;
pub mod movie;
pub mod post;
pub mod user;

pub use genre::Genre;
pub use history::HistoryEntry;
pub use movie::{MovieRecord, RecommendationResult, Suggestion};
pub use post::{Comment, Post};
pub use user::User;
