//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`Mailer`]) are implemented by outbound
//! adapters. Driving ports (`*Query`, `*Command`, [`LoginService`]) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_repository;
mod admin_use_cases;
mod article_repository;
mod article_use_cases;
mod mailer;
mod notification_repository;
mod notification_use_cases;
mod page_repository;
mod page_use_cases;
mod subscriber_repository;
mod subscriber_use_cases;

#[cfg(test)]
pub use admin_repository::{MockAdminRepository, MockLoginCodeRepository};
pub use admin_repository::{
    AdminRepository, AdminRepositoryError, LoginCodeRepository, LoginCodeRepositoryError,
};
#[cfg(test)]
pub use admin_use_cases::{
    MockAdminProfileCommand, MockAdminProfileQuery, MockDashboardStatsQuery, MockLoginService,
};
pub use admin_use_cases::{
    AdminProfileCommand, AdminProfileQuery, DashboardStatsQuery, LoginCredentials, LoginService,
};
#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{ArticleRepository, ArticleRepositoryError};
#[cfg(test)]
pub use article_use_cases::{MockArticlesCommand, MockArticlesQuery};
pub use article_use_cases::{ArticlesCommand, ArticlesQuery};
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{Mailer, MailerError, OutgoingEmail};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use notification_use_cases::{
    MockNewsletterCommand, MockNotificationsCommand, MockNotificationsQuery,
};
pub use notification_use_cases::{
    NewsletterCommand, NewsletterReceipt, NewsletterRequest, NotificationsCommand,
    NotificationsQuery,
};
#[cfg(test)]
pub use page_repository::MockPageRepository;
pub use page_repository::{PageRepository, PageRepositoryError};
#[cfg(test)]
pub use page_use_cases::{MockPagesCommand, MockPagesQuery};
pub use page_use_cases::{PagesCommand, PagesQuery};
#[cfg(test)]
pub use subscriber_repository::MockSubscriberRepository;
pub use subscriber_repository::{SubscriberRepository, SubscriberRepositoryError};
#[cfg(test)]
pub use subscriber_use_cases::{MockSubscribersCommand, MockSubscribersQuery};
pub use subscriber_use_cases::{SubscribersCommand, SubscribersQuery};
