// src/crawler/linkedin.rs
use anyhow::{Context, Result};
use reqwest::{Client, Url};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

const SEARCH_PATH: &str = "/jobs-guest/jobs/api/seeAllJobPostings/search";
const RESULTS_PER_PAGE: u32 = 25;
pub const MAX_PAGES: u32 = 5;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlRequest {
    pub keywords: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_pages")]
    pub pages: u32,
    #[serde(default)]
    pub fetch_descriptions: bool,
}

fn default_pages() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawledJob {
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub url: String,
    pub posted_at: Option<String>,
    pub description: Option<String>,
}

pub struct LinkedInCrawler {
    client: Client,
    base_url: String,
}

impl LinkedInCrawler {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn search_url(&self, keywords: &str, location: Option<&str>, start: u32) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, SEARCH_PATH))
            .with_context(|| format!("Invalid LinkedIn base URL: {}", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("keywords", keywords)
            .append_pair("location", location.unwrap_or_default())
            .append_pair("start", &start.to_string());
        Ok(url)
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error {} for {}", response.status(), url);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }

    /// Search result cards, page by page, stopping at the first empty page
    pub async fn search(&self, request: &CrawlRequest) -> Result<Vec<CrawledJob>> {
        let pages = request.pages.clamp(1, MAX_PAGES);
        let mut jobs = Vec::new();

        for page in 0..pages {
            let url = self.search_url(
                &request.keywords,
                request.location.as_deref(),
                page * RESULTS_PER_PAGE,
            )?;
            info!("Fetching LinkedIn search page {}: {}", page + 1, url);

            let html = self.fetch(url.as_str()).await?;
            let page_jobs = parse_search_results(&html, &self.base_url);
            if page_jobs.is_empty() {
                break;
            }
            jobs.extend(page_jobs);
        }

        info!("Found {} LinkedIn job cards for '{}'", jobs.len(), request.keywords);
        Ok(jobs)
    }

    pub async fn fetch_description(&self, url: &str) -> Result<String> {
        let html = self.fetch(url).await?;
        parse_job_description(&html).context("Failed to extract job description from page")
    }

    /// Search plus, when requested, each posting's description; description failures are skipped
    pub async fn crawl(&self, request: &CrawlRequest) -> Result<Vec<CrawledJob>> {
        let mut jobs = self.search(request).await?;

        if request.fetch_descriptions {
            for job in &mut jobs {
                match self.fetch_description(&job.url).await {
                    Ok(description) => job.description = Some(description),
                    Err(e) => warn!("Could not fetch description for {}: {:#}", job.url, e),
                }
            }
        }

        Ok(jobs)
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn child_text(element: &ElementRef<'_>, css: &str) -> Option<String> {
    let selector = selector(css)?;
    element
        .select(&selector)
        .next()
        .map(|e| clean_text(&e.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| !text.is_empty())
}

fn child_attr(element: &ElementRef<'_>, css: &str, attr: &str) -> Option<String> {
    let selector = selector(css)?;
    element
        .select(&selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Job cards from a guest search listing; cards without a title or link are dropped
pub fn parse_search_results(html: &str, base_url: &str) -> Vec<CrawledJob> {
    let document = Html::parse_fragment(html);
    let Some(card_selector) = selector("div.base-card") else {
        return Vec::new();
    };

    document
        .select(&card_selector)
        .filter_map(|card| {
            let title = child_text(&card, "h3.base-search-card__title")?;
            let href = child_attr(&card, "a.base-card__full-link", "href")?;

            Some(CrawledJob {
                title,
                company: child_text(&card, "h4.base-search-card__subtitle"),
                location: child_text(&card, "span.job-search-card__location"),
                url: strip_tracking(&href, base_url),
                posted_at: child_attr(&card, "time", "datetime"),
                description: None,
            })
        })
        .collect()
}

pub fn parse_job_description(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let linkedin_selectors = [
        "div.show-more-less-html__markup",
        ".description__text",
        ".jobs-box__html-content",
        ".jobs-description__container",
        "[data-test-id='job-description']",
    ];
    let generic_selectors = ["[class*='description']", "main", "article"];

    find_text_by_selectors(&document, &linkedin_selectors).or_else(|| {
        warn!("Falling back to generic description parsing");
        find_text_by_selectors(&document, &generic_selectors)
    })
}

fn find_text_by_selectors(document: &Html, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Some(selector) = selector(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if text.len() > 5 {
                    return Some(text);
                }
            }
        }
    }
    None
}

/// Absolute link without query string or fragment
pub fn strip_tracking(href: &str, base_url: &str) -> String {
    let parsed = Url::parse(href).or_else(|_| Url::parse(base_url).and_then(|base| base.join(href)));

    match parsed {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => href
            .split(['?', '#'])
            .next()
            .unwrap_or(href)
            .to_string(),
    }
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FIXTURE: &str = r#"
<li>
  <div class="base-card relative job-search-card">
    <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/rust-engineer-at-acme-123?refId=abc&trackingId=xyz">
      <span class="sr-only">Rust Engineer</span>
    </a>
    <div class="base-search-card__info">
      <h3 class="base-search-card__title">
        Rust Engineer
      </h3>
      <h4 class="base-search-card__subtitle">
        <a href="https://www.linkedin.com/company/acme">Acme</a>
      </h4>
      <div class="base-search-card__metadata">
        <span class="job-search-card__location">Berlin, Germany</span>
        <time class="job-search-card__listdate" datetime="2024-05-01">1 week ago</time>
      </div>
    </div>
  </div>
</li>
<li>
  <div class="base-card relative job-search-card">
    <a class="base-card__full-link" href="/jobs/view/backend-dev-456?position=2">link</a>
    <h3 class="base-search-card__title">Backend Developer</h3>
  </div>
</li>
<li>
  <div class="base-card">
    <h3 class="base-search-card__title">No link here</h3>
  </div>
</li>
"#;

    #[test]
    fn test_parse_search_results() {
        let jobs = parse_search_results(SEARCH_FIXTURE, "https://www.linkedin.com");
        assert_eq!(jobs.len(), 2);

        assert_eq!(jobs[0].title, "Rust Engineer");
        assert_eq!(jobs[0].company.as_deref(), Some("Acme"));
        assert_eq!(jobs[0].location.as_deref(), Some("Berlin, Germany"));
        assert_eq!(jobs[0].posted_at.as_deref(), Some("2024-05-01"));
        assert_eq!(
            jobs[0].url,
            "https://www.linkedin.com/jobs/view/rust-engineer-at-acme-123"
        );

        assert_eq!(jobs[1].title, "Backend Developer");
        assert_eq!(jobs[1].company, None);
        assert_eq!(
            jobs[1].url,
            "https://www.linkedin.com/jobs/view/backend-dev-456"
        );
    }

    #[test]
    fn test_parse_empty_listing() {
        assert!(parse_search_results("", "https://www.linkedin.com").is_empty());
    }

    #[test]
    fn test_parse_job_description() {
        let html = r#"<html><body>
            <div class="show-more-less-html__markup">
              <p>Build   reliable services.</p>
              <ul><li>Rust</li><li>SQL</li></ul>
            </div>
        </body></html>"#;
        assert_eq!(
            parse_job_description(html).as_deref(),
            Some("Build reliable services. Rust SQL")
        );
    }

    #[test]
    fn test_description_generic_fallback() {
        let html = "<html><body><main>We are hiring engineers.</main></body></html>";
        assert_eq!(
            parse_job_description(html).as_deref(),
            Some("We are hiring engineers.")
        );
    }

    #[test]
    fn test_strip_tracking() {
        assert_eq!(
            strip_tracking("https://example.com/jobs/1?trk=abc#top", "https://example.com"),
            "https://example.com/jobs/1"
        );
    }

    #[test]
    fn test_search_url() {
        let crawler = LinkedInCrawler::new("https://www.linkedin.com/").unwrap();
        let url = crawler.search_url("rust developer", Some("Paris"), 25).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.linkedin.com/jobs-guest/jobs/api/seeAllJobPostings/search?keywords=rust+developer&location=Paris&start=25"
        );
    }
}
