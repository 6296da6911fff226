//! Extraction of entity names and the next-page link from one listing page

use market_common::{CatalogError, Result};
use scraper::{Html, Selector};
use url::Url;

/// Entity links on a fandom category page
pub const DEFAULT_MEMBER_SELECTOR: &str = ".category-page__member-link";
/// "Next" pagination control on a fandom category page
pub const DEFAULT_NEXT_SELECTOR: &str = "a.category-page__pagination-next";

/// CSS selectors describing a listing page layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSelectors {
    pub member: String,
    pub next: String,
}

impl Default for CrawlSelectors {
    fn default() -> Self {
        Self {
            member: DEFAULT_MEMBER_SELECTOR.to_string(),
            next: DEFAULT_NEXT_SELECTOR.to_string(),
        }
    }
}

/// Parsed contents of one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Entity names in page order
    pub names: Vec<String>,
    /// Absolute URL of the next page, `None` on the last page
    pub next: Option<Url>,
}

/// Compiled form of [`CrawlSelectors`]
#[derive(Debug, Clone)]
pub struct ListingParser {
    member: Selector,
    next: Selector,
}

fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| CatalogError::parse(format!("selector `{css}`"), format!("{e:?}")))
}

impl ListingParser {
    pub fn new(selectors: &CrawlSelectors) -> Result<Self> {
        Ok(Self {
            member: compile(&selectors.member)?,
            next: compile(&selectors.next)?,
        })
    }

    /// Parse `html` served from `page_url`.
    ///
    /// Relative next-page links are resolved against `page_url`. A next control
    /// without a usable `href` is a parse failure.
    pub fn parse(&self, page_url: &Url, html: &str) -> Result<ListingPage> {
        let document = Html::parse_document(html);

        let names = document
            .select(&self.member)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        let next = match document.select(&self.next).next() {
            None => None,
            Some(link) => {
                let href = link.value().attr("href").ok_or_else(|| {
                    CatalogError::parse(page_url.as_str(), "next-page link has no href")
                })?;
                let target = page_url.join(href).map_err(|e| {
                    let reason = format!("bad next-page href `{href}`: {e}");
                    CatalogError::parse(page_url.as_str(), reason)
                })?;
                Some(target)
            }
        };

        Ok(ListingPage { names, next })
    }
}
