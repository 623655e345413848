use std::future::Future;
use std::pin::Pin;

use anyhow::{anyhow, Context, Result};
use futures::{stream, StreamExt, TryStreamExt};
use lazy_static::lazy_static;
use reqwest::header::USER_AGENT;
use serde::Serialize;

use crate::config::ScrapConfig;
use crate::supost;

lazy_static! {
    static ref HTTP_CLI: reqwest::Client = reqwest::ClientBuilder::new()
        .gzip(true)
        .deflate(true)
        .build()
        .unwrap();
}

/// Downloads a page as text.
pub trait Fetch {
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = Result<String>> + 'a>>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl Fetch for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = Result<String>> + 'a>> {
        Box::pin(async move {
            let resp = HTTP_CLI
                .get(url)
                .header(USER_AGENT, &self.user_agent)
                .send()
                .await
                .with_context(|| format!("Couldn't download {url}"))?
                .error_for_status()?;

            Ok(resp.text().await?)
        })
    }
}

/// A post containing one of the watched keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub keyword: String,
    pub link: String,
    pub title: String,
}

/// Fetches a single post and returns one match per keyword found in its text.
pub async fn scrape_post<F>(fetcher: &F, link: &str, keywords: &[String]) -> Result<Vec<Match>>
where
    F: Fetch + ?Sized,
{
    log::info!("scraping post: {link}...");

    let page = fetcher.fetch(link).await?;
    let text = supost::page_text(&page).to_lowercase();

    let found: Vec<&String> = keywords
        .iter()
        .filter(|keyword| text.contains(&keyword.to_lowercase()))
        .collect();
    if found.is_empty() {
        return Ok(vec![]);
    }

    let title = supost::post_title(&page).with_context(|| format!("Couldn't scrape {link}"))?;

    Ok(found
        .into_iter()
        .map(|keyword| Match {
            keyword: keyword.clone(),
            link: link.to_string(),
            title: title.clone(),
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub offset: usize,
    pub cutoff: String,
}

impl SearchState {
    pub fn new(cutoff: impl Into<String>) -> Self {
        Self {
            offset: 0,
            cutoff: cutoff.into(),
        }
    }
}

/// Walks the search index from the first page, scraping every post it lists,
/// until a page mentions the cutoff date.
///
/// Without `max_pages` the walk only ends on the cutoff marker, a site that
/// never shows it keeps the walker paging forever.
pub async fn walk_index<F>(fetcher: &F, config: &ScrapConfig, cutoff: &str) -> Result<Vec<Match>>
where
    F: Fetch + ?Sized,
{
    let mut state = SearchState::new(cutoff);
    let mut matches = vec![];
    let mut pages = 0;

    loop {
        let index_url = supost::index_url(state.offset);
        log::info!("scraping index at offset {}: {index_url}", state.offset);

        let index_page = fetcher.fetch(&index_url).await?;
        let links = supost::post_links(&index_page);

        let found: Vec<Match> = stream::iter(links)
            .then(|link| async move { scrape_post(fetcher, &link, &config.keywords).await })
            .try_concat()
            .await?;
        matches.extend(found);
        pages += 1;

        if supost::page_text(&index_page).contains(&state.cutoff) {
            log::info!("Found {} at offset {}, stopping", state.cutoff, state.offset);
            return Ok(matches);
        }

        if let Some(max_pages) = config.max_pages {
            if pages >= max_pages {
                log::warn!(
                    "Stopping after {pages} pages without finding {}",
                    state.cutoff
                );
                return Ok(matches);
            }
        }

        state.offset = state
            .offset
            .checked_add(config.offset_step)
            .ok_or_else(|| anyhow!("Offset overflow after {}", state.offset))?;
    }
}
