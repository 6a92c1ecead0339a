//! Project-specific utilities live here.

pub mod pagination;

pub use pagination::{paginate, Page, PageQuery, PAGE_SIZE};
