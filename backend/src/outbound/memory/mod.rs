//! In-process record store implementing every repository port.
//!
//! Used when the server starts without `DATABASE_URL` and by the HTTP
//! scenario tests. All tables sit behind one `tokio::sync::RwLock`, so each
//! port call observes and mutates a consistent snapshot, which keeps view
//! counting and idempotent subscribing exact under concurrent requests.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{
    AdminRepository, AdminRepositoryError, ArticleRepository, ArticleRepositoryError,
    LoginCodeRepository, LoginCodeRepositoryError, NotificationRepository,
    NotificationRepositoryError, PageRepository, PageRepositoryError, SubscriberRepository,
    SubscriberRepositoryError,
};
use crate::domain::{
    AdminAccount, AdminChanges, Article, ArticleChanges, EmailAddress, LoginCode, Notification,
    Page, PageChanges, PageSlug, Subscriber, SubscriberChanges,
};

/// Slugs and titles of the pages that exist from first start.
pub const SEEDED_PAGES: [(&str, &str); 2] = [("about", "About"), ("contact", "Contact")];

#[derive(Default)]
struct Tables {
    articles: HashMap<Uuid, Article>,
    pages: HashMap<PageSlug, Page>,
    subscribers: HashMap<Uuid, Subscriber>,
    notifications: Vec<Notification>,
    admins: HashMap<Uuid, AdminAccount>,
    login_codes: HashMap<EmailAddress, LoginCode>,
}

/// Volatile store; contents are lost when the process exits.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the default `about` and `contact` pages.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let mut tables = Tables::default();
        for (slug, title) in SEEDED_PAGES {
            if let Ok(slug) = PageSlug::new(slug) {
                tables.pages.insert(
                    slug.clone(),
                    Page {
                        slug,
                        title: title.to_owned(),
                        content: String::new(),
                        updated_at: now,
                    },
                );
            }
        }
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Insert or replace a page directly, bypassing the merge rules.
    pub async fn put_page(&self, page: Page) {
        self.tables.write().await.pages.insert(page.slug.clone(), page);
    }
}

fn newest_published_first(articles: &mut [Article]) {
    articles.sort_by_key(|article| {
        (
            article.published_at.is_none(),
            Reverse(article.published_at),
            Reverse(article.created_at),
        )
    });
}

#[async_trait]
impl ArticleRepository for InMemoryStore {
    async fn list_published(&self) -> Result<Vec<Article>, ArticleRepositoryError> {
        let tables = self.tables.read().await;
        let mut articles: Vec<Article> = tables
            .articles
            .values()
            .filter(|article| article.published)
            .cloned()
            .collect();
        newest_published_first(&mut articles);
        Ok(articles)
    }

    async fn list_all(&self) -> Result<Vec<Article>, ArticleRepositoryError> {
        let tables = self.tables.read().await;
        let mut articles: Vec<Article> = tables.articles.values().cloned().collect();
        articles.sort_by_key(|article| Reverse(article.created_at));
        Ok(articles)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, ArticleRepositoryError> {
        Ok(self.tables.read().await.articles.get(&id).cloned())
    }

    async fn record_view(&self, id: Uuid) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .articles
            .get_mut(&id)
            .filter(|article| article.published)
            .map(|article| {
                article.views = article.views.saturating_add(1);
                article.clone()
            }))
    }

    async fn insert(&self, article: &Article) -> Result<(), ArticleRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.articles.contains_key(&article.id) {
            return Err(ArticleRepositoryError::query(format!(
                "duplicate article id {}",
                article.id
            )));
        }
        tables.articles.insert(article.id, article.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &ArticleChanges,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables.articles.get_mut(&id).map(|article| {
            changes.apply_to(article);
            article.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ArticleRepositoryError> {
        Ok(self.tables.write().await.articles.remove(&id).is_some())
    }
}

#[async_trait]
impl PageRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Page>, PageRepositoryError> {
        let tables = self.tables.read().await;
        let mut pages: Vec<Page> = tables.pages.values().cloned().collect();
        pages.sort_by(|left, right| left.slug.as_str().cmp(right.slug.as_str()));
        Ok(pages)
    }

    async fn find_by_slug(&self, slug: &PageSlug) -> Result<Option<Page>, PageRepositoryError> {
        Ok(self.tables.read().await.pages.get(slug).cloned())
    }

    async fn update(
        &self,
        slug: &PageSlug,
        changes: &PageChanges,
    ) -> Result<Option<Page>, PageRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables.pages.get_mut(slug).map(|page| {
            changes.apply_to(page);
            page.clone()
        }))
    }
}

fn newest_subscribers_first(mut subscribers: Vec<Subscriber>) -> Vec<Subscriber> {
    subscribers.sort_by_key(|subscriber| Reverse(subscriber.subscribed_at));
    subscribers
}

#[async_trait]
impl SubscriberRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Subscriber>, SubscriberRepositoryError> {
        let tables = self.tables.read().await;
        Ok(newest_subscribers_first(
            tables.subscribers.values().cloned().collect(),
        ))
    }

    async fn list_active(&self) -> Result<Vec<Subscriber>, SubscriberRepositoryError> {
        let tables = self.tables.read().await;
        Ok(newest_subscribers_first(
            tables
                .subscribers
                .values()
                .filter(|subscriber| subscriber.active)
                .cloned()
                .collect(),
        ))
    }

    async fn insert_if_absent(
        &self,
        subscriber: &Subscriber,
    ) -> Result<Option<Subscriber>, SubscriberRepositoryError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .subscribers
            .values()
            .any(|existing| existing.email == subscriber.email);
        if taken {
            return Ok(None);
        }
        tables.subscribers.insert(subscriber.id, subscriber.clone());
        Ok(Some(subscriber.clone()))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &SubscriberChanges,
    ) -> Result<Option<Subscriber>, SubscriberRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables.subscribers.get_mut(&id).map(|subscriber| {
            changes.apply_to(subscriber);
            subscriber.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, SubscriberRepositoryError> {
        Ok(self.tables.write().await.subscribers.remove(&id).is_some())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let tables = self.tables.read().await;
        let mut notifications = tables.notifications.clone();
        notifications.sort_by_key(|notification| Reverse(notification.sent_at));
        Ok(notifications)
    }

    async fn append(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        self.tables
            .write()
            .await
            .notifications
            .push(notification.clone());
        Ok(())
    }
}

#[async_trait]
impl AdminRepository for InMemoryStore {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<AdminAccount>, AdminRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .admins
            .values()
            .find(|account| &account.profile.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminAccount>, AdminRepositoryError> {
        Ok(self.tables.read().await.admins.get(&id).cloned())
    }

    async fn insert(&self, account: &AdminAccount) -> Result<(), AdminRepositoryError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .admins
            .values()
            .any(|existing| existing.profile.email == account.profile.email);
        if taken {
            return Err(AdminRepositoryError::email_taken(
                account.profile.email.as_str(),
            ));
        }
        tables.admins.insert(account.profile.id, account.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &AdminChanges,
    ) -> Result<Option<AdminAccount>, AdminRepositoryError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email {
            let taken = tables
                .admins
                .values()
                .any(|existing| existing.profile.id != id && &existing.profile.email == email);
            if taken {
                return Err(AdminRepositoryError::email_taken(email.as_str()));
            }
        }
        Ok(tables.admins.get_mut(&id).map(|account| {
            changes.apply_to(account);
            account.clone()
        }))
    }
}

#[async_trait]
impl LoginCodeRepository for InMemoryStore {
    async fn replace(&self, code: &LoginCode) -> Result<(), LoginCodeRepositoryError> {
        self.tables
            .write()
            .await
            .login_codes
            .insert(code.email.clone(), code.clone());
        Ok(())
    }

    async fn find(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<LoginCode>, LoginCodeRepositoryError> {
        Ok(self.tables.read().await.login_codes.get(email).cloned())
    }

    async fn record_failure(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<u32>, LoginCodeRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables.login_codes.get_mut(email).map(|code| {
            code.failed_attempts = code.failed_attempts.saturating_add(1);
            code.failed_attempts
        }))
    }

    async fn consume(&self, email: &EmailAddress) -> Result<bool, LoginCodeRepositoryError> {
        Ok(self.tables.write().await.login_codes.remove(email).is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{
        AdminProfile, Category, SecretDigest, SubscriberPreferences,
    };

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0)
            .single()
            .expect("valid timestamp")
    }

    fn article(published: bool, published_at: Option<DateTime<Utc>>, created: i64) -> Article {
        Article {
            id: Uuid::new_v4(),
            title: "T".to_owned(),
            content: "C".to_owned(),
            excerpt: "C".to_owned(),
            category: Category::Predictions,
            tags: Vec::new(),
            published,
            featured: false,
            image_url: None,
            published_at,
            created_at: at(created),
            updated_at: at(created),
            read_time: 1,
            views: 0,
            author: "FootballVoice".to_owned(),
        }
    }

    fn subscriber(email: &str) -> Subscriber {
        Subscriber {
            id: Uuid::new_v4(),
            email: EmailAddress::parse(email).expect("valid email"),
            name: None,
            subscribed_at: at(0),
            active: true,
            preferences: SubscriberPreferences::default(),
        }
    }

    #[fixture]
    fn store() -> InMemoryStore {
        InMemoryStore::seeded(at(0))
    }

    #[rstest]
    #[tokio::test]
    async fn published_list_orders_by_publication_then_creation(store: InMemoryStore) {
        let undated = article(true, None, 50);
        let older = article(true, Some(at(10)), 1);
        let newer = article(true, Some(at(20)), 2);
        let draft = article(false, None, 99);
        for item in [&undated, &older, &newer, &draft] {
            ArticleRepository::insert(&store, item).await.expect("insert");
        }

        let ids: Vec<Uuid> = store
            .list_published()
            .await
            .expect("list")
            .into_iter()
            .map(|article| article.id)
            .collect();

        assert_eq!(ids, vec![newer.id, older.id, undated.id]);
    }

    #[rstest]
    #[tokio::test]
    async fn drafts_are_not_viewable(store: InMemoryStore) {
        let draft = article(false, None, 0);
        ArticleRepository::insert(&store, &draft).await.expect("insert");

        assert!(store.record_view(draft.id).await.expect("view").is_none());
        let stored = ArticleRepository::find_by_id(&store, draft.id)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.views, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_views_are_all_counted(store: InMemoryStore) {
        let store = Arc::new(store);
        let live = article(true, Some(at(1)), 0);
        ArticleRepository::insert(store.as_ref(), &live).await.expect("insert");

        let tasks: Vec<_> = (0..25)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.record_view(live.id).await })
            })
            .collect();
        for task in tasks {
            task.await.expect("join").expect("view");
        }

        let stored = ArticleRepository::find_by_id(store.as_ref(), live.id)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.views, 25);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_ignored(store: InMemoryStore) {
        let first = subscriber("a@x.com");
        let second = subscriber("a@x.com");

        assert!(store.insert_if_absent(&first).await.expect("insert").is_some());
        assert!(store.insert_if_absent(&second).await.expect("insert").is_none());
        assert_eq!(SubscriberRepository::list(&store).await.expect("list").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn seeded_pages_are_listed(store: InMemoryStore) {
        let slugs: Vec<String> = PageRepository::list(&store)
            .await
            .expect("list")
            .into_iter()
            .map(|page| page.slug.as_str().to_owned())
            .collect();
        assert_eq!(slugs, vec!["about", "contact"]);
    }

    #[rstest]
    #[tokio::test]
    async fn admin_email_change_to_taken_address_conflicts(store: InMemoryStore) {
        let account = |email: &str| AdminAccount {
            profile: AdminProfile {
                id: Uuid::new_v4(),
                name: "Admin".to_owned(),
                email: EmailAddress::parse(email).expect("valid email"),
            },
            password: SecretDigest::derive("password1"),
        };
        let first = account("one@x.com");
        let second = account("two@x.com");
        AdminRepository::insert(&store, &first).await.expect("insert");
        AdminRepository::insert(&store, &second).await.expect("insert");

        let changes = AdminChanges {
            name: None,
            email: Some(second.profile.email.clone()),
            password: None,
        };
        let err = AdminRepository::update(&store, first.profile.id, &changes)
            .await
            .expect_err("conflict");
        assert!(matches!(err, AdminRepositoryError::EmailTaken { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn login_codes_are_replaced_and_consumed(store: InMemoryStore) {
        let email = EmailAddress::parse("admin@x.com").expect("valid email");
        let (first, _) = LoginCode::issue(email.clone(), at(0), Duration::seconds(600));
        let (second, _) = LoginCode::issue(email.clone(), at(5), Duration::seconds(600));
        store.replace(&first).await.expect("replace");
        store.replace(&second).await.expect("replace");

        let pending = store.find(&email).await.expect("find").expect("present");
        assert_eq!(pending.expires_at, second.expires_at);
        assert!(store.consume(&email).await.expect("consume"));
        assert!(!store.consume(&email).await.expect("consume"));
    }

    #[rstest]
    #[tokio::test]
    async fn failures_accumulate_until_the_code_is_replaced(store: InMemoryStore) {
        let email = EmailAddress::parse("admin@x.com").expect("valid email");
        assert_eq!(store.record_failure(&email).await.expect("record"), None);

        let (code, _) = LoginCode::issue(email.clone(), at(0), Duration::seconds(600));
        store.replace(&code).await.expect("replace");
        assert_eq!(store.record_failure(&email).await.expect("record"), Some(1));
        assert_eq!(store.record_failure(&email).await.expect("record"), Some(2));

        let (fresh, _) = LoginCode::issue(email.clone(), at(5), Duration::seconds(600));
        store.replace(&fresh).await.expect("replace");
        let pending = store.find(&email).await.expect("find").expect("present");
        assert_eq!(pending.failed_attempts, 0);
    }
}
