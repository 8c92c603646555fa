//! Page slicing of already formatted listings.

use serde::{Deserialize, Deserializer};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of items on one page, taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(pub usize);

impl Default for PageSize {
    fn default() -> Self {
        PageSize(DEFAULT_PAGE_SIZE)
    }
}

/// `?page=` query, 1-indexed. Missing or non-numeric values mean page 1.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: u64,
}

fn first_page() -> u64 {
    1
}

// query strings carry the page as text. Integers below 1 become page 0 and
// integers past u64 saturate, so both slice to nothing. Other text is page 1.
fn deserialize_page<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map_or(1, |v| parse_page(v.trim())))
}

fn parse_page(value: &str) -> u64 {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return first_page();
    }
    if negative {
        return 0;
    }
    digits.parse::<u64>().unwrap_or(u64::MAX)
}

/// Returns items `[(page - 1) * size, page * size)`. Pages past the end and page 0 are empty.
pub fn paginate<T>(items: Vec<T>, page: u64, size: PageSize) -> Vec<T> {
    if page == 0 {
        return Vec::new();
    }
    let start = usize::try_from(page - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(size.0);
    items.into_iter().skip(start).take(size.0).collect()
}
