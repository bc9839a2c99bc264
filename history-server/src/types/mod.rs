pub mod pagination;

pub use pagination::{Page, PaginationInfo, PaginationParams};
