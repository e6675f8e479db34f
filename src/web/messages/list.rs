// one page of a listing as returned by a backend

use serde::{Deserialize, Serialize};

/// `page` is zero-based, `total` counts every item server-side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PagedList<T> {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub values: Vec<T>,
}

impl<T> PagedList<T> {
    pub fn new(total: u64, page: u64, page_size: u64, values: Vec<T>) -> Self {
        Self { total, page, page_size, values }
    }
}
