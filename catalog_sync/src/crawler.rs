//! Paginated listing crawler
//!
//! Walks a chain of listing pages from a start URL, collecting entity names from
//! every page until a page has no next-page link.

use crate::listing::{CrawlSelectors, ListingParser};
use market_common::{CatalogError, Result};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = "catalog_sync/0.1";

/// Upper bound on pages followed from one start URL
pub const DEFAULT_MAX_PAGES: usize = 500;

/// Source of listing page bodies
pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> Result<String>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch(&self, url: &Url) -> Result<String> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP page fetcher with a per-request timeout
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: reqwest::blocking::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CatalogError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch(&self, url: &Url) -> Result<String> {
        log::debug!("Fetching listing page: {}", url);

        let response = self
            .client
            .get(url.as_str())
            .send()
            .map_err(|e| CatalogError::from_request(url.as_str(), e))?;

        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        response
            .text()
            .map_err(|e| CatalogError::from_request(url.as_str(), e))
    }
}

/// Crawl settings
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub selectors: CrawlSelectors,
    pub max_pages: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            selectors: CrawlSelectors::default(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

pub struct Crawler<F> {
    fetcher: F,
    parser: ListingParser,
    max_pages: usize,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F, config: &CrawlConfig) -> Result<Self> {
        if config.max_pages == 0 {
            return Err(CatalogError::Config("max_pages must be at least 1".to_string()));
        }
        Ok(Self {
            fetcher,
            parser: ListingParser::new(&config.selectors)?,
            max_pages: config.max_pages,
        })
    }

    /// Collect entity names from `start_url` and every page linked after it.
    ///
    /// Names keep page order and within-page order. Any fetch or parse failure
    /// aborts the crawl and discards what was collected so far.
    pub fn crawl(&self, start_url: &str) -> Result<Vec<String>> {
        let start = Url::parse(start_url)
            .map_err(|e| CatalogError::parse(format!("start URL `{start_url}`"), e))?;

        let mut names = Vec::new();
        match self.walk(start, &mut names) {
            Ok(pages) => {
                log::info!(
                    "Crawled {} names from {} page(s) starting at {}",
                    names.len(),
                    pages,
                    start_url
                );
                Ok(names)
            }
            Err(e) => {
                log::warn!(
                    "Crawl from {} failed, discarding {} names collected so far: {}",
                    start_url,
                    names.len(),
                    e
                );
                Err(e)
            }
        }
    }

    fn walk(&self, start: Url, names: &mut Vec<String>) -> Result<usize> {
        let mut visited: HashSet<Url> = HashSet::new();
        let mut current = start;

        loop {
            visited.insert(current.clone());

            let body = self.fetcher.fetch(&current)?;
            let page = self.parser.parse(&current, &body)?;
            log::debug!("{}: {} names", current, page.names.len());
            names.extend(page.names);

            let Some(next) = page.next else {
                return Ok(visited.len());
            };
            if visited.contains(&next) {
                return Err(CatalogError::PaginationCycle {
                    url: next.to_string(),
                });
            }
            if visited.len() >= self.max_pages {
                return Err(CatalogError::PaginationLimit {
                    limit: self.max_pages,
                    url: next.to_string(),
                });
            }
            current = next;
        }
    }
}

#[cfg(test)]
#[path = "crawler_tests.rs"]
mod tests;
