pub mod detail;
pub mod movie;
pub mod summary;
pub mod watched;

pub use detail::MovieDetail;
pub use movie::MovieSummary;
pub use summary::WatchedSummary;
pub use watched::WatchedEntry;
