pub mod client;
pub mod models;
pub mod query;

pub use client::{ArxivClient, PaperSource, SearchRequest, SortCriterion, ARXIV_API_URL};
pub use models::PaperRecord;
pub use query::{build_query, Filter};
