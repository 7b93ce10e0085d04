use cinecat_dal::{
    movie::{MovieFilter, MovieSort},
    Batch, ListingParams,
};
use garde::Validate;
use serde::Serialize;

/// Query parameters of the movie listing
#[derive(Debug, Clone, Default, Validate, serde::Deserialize)]
pub struct Paging {
    #[garde(length(max = 255))]
    search: Option<String>,
    #[garde(length(max = 255))]
    genre: Option<String>,
    #[garde(length(max = 255))]
    sort: Option<String>,
    #[garde(range(min = 1))]
    page: Option<u32>,
    #[garde(range(min = 1, max = 1000))]
    per_page: Option<u32>,
}

impl Paging {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self, default_page_size: u32) -> u32 {
        self.per_page.unwrap_or(default_page_size)
    }

    pub fn listing_params(&self, default_page_size: u32) -> ListingParams {
        let page_size = i64::from(self.page_size(default_page_size));
        let offset = (i64::from(self.page()) - 1) * page_size;
        ListingParams::new(offset, page_size)
    }

    pub fn into_filter(self) -> MovieFilter {
        let sort = MovieSort::from_param(self.sort.as_deref());
        MovieFilter::new(self.search, self.genre, sort)
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub items: Vec<T>,
}

impl<T> Page<T>
where
    T: Serialize,
{
    pub fn from_batch(batch: Batch<T>, page: u32, per_page: u32) -> Self {
        Self {
            total: batch.total,
            page,
            per_page,
            items: batch.rows,
        }
    }
}
