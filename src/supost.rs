use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDate};
use lazy_static::lazy_static;
use reqwest::Url;
use select::document::Document;
use select::predicate::{Attr, Name, Predicate};

pub const SUPOST_URL: &str = "http://supost.com";

const SEARCH_PATH: &str = "/search/index/5";
const POST_MARKER: &str = "post/index";
const CUTOFF_FORMAT: &str = "%a, %b %d";

lazy_static! {
    static ref SUPOST_BASE: Url = Url::parse(SUPOST_URL).expect("Invalid supost base url");
}

/// Builds the search index url for the given offset, the first page has no
/// offset parameter.
pub fn index_url(offset: usize) -> String {
    match offset {
        0 => format!("{SUPOST_URL}{SEARCH_PATH}"),
        _ => format!("{SUPOST_URL}{SEARCH_PATH}?offset={offset}"),
    }
}

/// Links to post pages found in an index page, in document order.
pub fn post_links(index_html: &str) -> Vec<String> {
    let document = Document::from(index_html);

    document
        .find(Name("a"))
        .filter_map(|a| a.attr("href"))
        .filter(|href| href.contains(POST_MARKER))
        .filter_map(|href| match SUPOST_BASE.join(href) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                log::warn!("Skipping link {href} got: {e}");
                None
            }
        })
        .collect()
}

/// Whole text content of an html page.
pub fn page_text(html: &str) -> String {
    Document::from(html)
        .find(Name("html"))
        .next()
        .map(|root| root.text())
        .unwrap_or_default()
}

pub fn post_title(post_html: &str) -> Result<String> {
    Document::from(post_html)
        .find(Name("h2").and(Attr("id", "posttitle")))
        .next()
        .map(|h2| h2.text())
        .ok_or_else(|| anyhow!("Missing post title (h2#posttitle)"))
}

/// Date string that shows up on the index once results reach `days_to_check`
/// days back from `today`.
pub fn cutoff_marker(today: NaiveDate, days_to_check: u32) -> Result<String> {
    let oldest = today
        .checked_sub_signed(Duration::days(i64::from(days_to_check)))
        .ok_or_else(|| anyhow!("Cannot look {days_to_check} days back from {today}"))?;
    Ok(oldest.format(CUTOFF_FORMAT).to_string())
}
