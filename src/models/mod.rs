mod category;
mod news;

pub use category::Category;
pub use news::{
    NewNewsItem, NewsItem, ACCENT_COLOR_MAX_LEN, DEFAULT_ACCENT_COLOR, SUMMARY_MAX_LEN,
    TITLE_MAX_LEN,
};
