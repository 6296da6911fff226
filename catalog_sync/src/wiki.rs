//! Wiki mod listings per locale

use crate::crawler::{Crawler, PageFetcher};
use crate::sync::ModSource;
use market_common::{Locale, Result};

pub const DEFAULT_MODS_URL_EN: &str = "https://warframe.fandom.com/wiki/Category:Mods";
pub const DEFAULT_MODS_URL_RU: &str = "https://warframe.fandom.com/ru/wiki/Категория:Моды";

/// Category page each locale's crawl starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiUrls {
    pub en: String,
    pub ru: String,
}

impl Default for WikiUrls {
    fn default() -> Self {
        Self {
            en: DEFAULT_MODS_URL_EN.to_string(),
            ru: DEFAULT_MODS_URL_RU.to_string(),
        }
    }
}

impl WikiUrls {
    pub fn for_locale(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Ru => &self.ru,
        }
    }
}

/// Crawls the wiki mod category for a locale
pub struct WikiModSource<F> {
    crawler: Crawler<F>,
    urls: WikiUrls,
}

impl<F: PageFetcher> WikiModSource<F> {
    pub fn new(crawler: Crawler<F>, urls: WikiUrls) -> Self {
        Self { crawler, urls }
    }
}

impl<F: PageFetcher> ModSource for WikiModSource<F> {
    fn mod_names(&self, locale: Locale) -> Result<Vec<String>> {
        let url = self.urls.for_locale(locale);
        log::info!("Crawling {} mod names from {}", locale, url);
        self.crawler.crawl(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::CrawlConfig;
    use market_common::CatalogError;
    use url::Url;

    struct OnePage;

    impl PageFetcher for OnePage {
        fn fetch(&self, url: &Url) -> Result<String> {
            let name = if url.path().starts_with("/ru/") { "Живучесть" } else { "Vitality" };
            Ok(format!(r#"<a class="category-page__member-link" href="/x">{name}</a>"#))
        }
    }

    #[test]
    fn test_crawls_locale_specific_url() {
        let crawler = Crawler::new(OnePage, &CrawlConfig::default()).unwrap();
        let source = WikiModSource::new(crawler, WikiUrls::default());

        assert_eq!(source.mod_names(Locale::En).unwrap(), vec!["Vitality"]);
        assert_eq!(source.mod_names(Locale::Ru).unwrap(), vec!["Живучесть"]);
    }

    #[test]
    fn test_invalid_url_surfaces_parse_error() {
        let crawler = Crawler::new(OnePage, &CrawlConfig::default()).unwrap();
        let urls = WikiUrls {
            en: "::not-a-url".to_string(),
            ..WikiUrls::default()
        };
        let source = WikiModSource::new(crawler, urls);

        assert!(matches!(
            source.mod_names(Locale::En),
            Err(CatalogError::Parse { .. })
        ));
    }
}
