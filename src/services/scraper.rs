//! Review scraping seam
//!
//! A scraper hands out sessions that hold whatever heavy resource scraping
//! needs. Jobs open one session per company and always close it, and
//! dropping a session releases it as well.

use super::places::PlacesClient;
use crate::core::models::{Company, Review, ReviewFilter};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    MostRelevant,
    Newest,
    HighestRating,
    LowestRating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapingOptions {
    pub max_reviews: usize,
    pub from_date: Option<DateTime<Utc>>,
    pub sort_by: SortOrder,
}

impl Default for ScrapingOptions {
    fn default() -> Self {
        Self {
            max_reviews: 100,
            from_date: None,
            sort_by: SortOrder::default(),
        }
    }
}

impl ScrapingOptions {
    /// Drop reviews older than `from_date`, order them and keep at most `max_reviews`
    pub fn apply(&self, reviews: Vec<Review>) -> Vec<Review> {
        let filter = ReviewFilter {
            from_date: self.from_date,
            ..Default::default()
        };
        let mut reviews: Vec<Review> = reviews.into_iter().filter(|r| filter.matches(r)).collect();
        match self.sort_by {
            SortOrder::MostRelevant => {}
            SortOrder::Newest => reviews.sort_by(|a, b| b.time.cmp(&a.time)),
            SortOrder::HighestRating => reviews.sort_by(|a, b| b.rating.cmp(&a.rating)),
            SortOrder::LowestRating => reviews.sort_by(|a, b| a.rating.cmp(&b.rating)),
        }
        reviews.truncate(self.max_reviews);
        reviews
    }
}

#[async_trait]
pub trait ReviewScraper: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn ScrapeSession>>;
}

#[async_trait]
pub trait ScrapeSession: Send {
    async fn scrape(&mut self, company: &Company, options: &ScrapingOptions) -> Result<Vec<Review>>;

    /// Release the session, reporting failures to do so
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Scraper reading reviews through the Places API
pub struct PlacesScraper {
    client: PlacesClient,
    open: Arc<AtomicUsize>,
}

impl PlacesScraper {
    pub fn new(client: PlacesClient) -> Self {
        Self {
            client,
            open: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sessions handed out and not yet released
    pub fn open_sessions(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewScraper for PlacesScraper {
    async fn open_session(&self) -> Result<Box<dyn ScrapeSession>> {
        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(PlacesSession {
            client: self.client.clone(),
            open: self.open.clone(),
        }))
    }
}

struct PlacesSession {
    client: PlacesClient,
    open: Arc<AtomicUsize>,
}

#[async_trait]
impl ScrapeSession for PlacesSession {
    async fn scrape(&mut self, company: &Company, options: &ScrapingOptions) -> Result<Vec<Review>> {
        let data = self.client.get_reviews(company).await?;
        let reviews = options.apply(data.reviews);
        debug!(company = %company.name, reviews = reviews.len(), "Scraped reviews");
        Ok(reviews)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

impl Drop for PlacesSession {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}
