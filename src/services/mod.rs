//! Services driven by the batch engine

pub mod jobs;
pub mod notifier;
pub mod places;
pub mod scheduler;
pub mod scraper;

pub use notifier::{LogNotifier, NotificationSender};
pub use places::PlacesClient;
pub use scheduler::MonitorScheduler;
pub use scraper::{PlacesScraper, ReviewScraper, ScrapingOptions};
