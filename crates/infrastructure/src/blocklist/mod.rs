pub mod fetcher;
pub mod parser;

pub use fetcher::HttpBlocklistFetcher;
pub use parser::{parse_list_line, parse_list_text};
