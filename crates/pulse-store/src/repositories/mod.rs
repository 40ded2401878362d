//! Stateless repositories — every method takes `&Connection`.

pub mod analytics;
pub mod event;
pub mod notification;

pub use analytics::AnalyticsRepo;
pub use event::EventRepo;
pub use notification::NotificationRepo;
