//! Client cache against a live server bound to an ephemeral port.

mod support;

use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use actix_web::HttpServer;
use actix_web::dev::ServerHandle;
use url::Url;

use footballvoice::client::{
    ApiClient, ArticleBoard, ArticleFilter, CacheState, CategoryFilter, StatusFilter,
    SubscriberBoard,
};
use footballvoice::domain::{Category, Patch, Subscription, SubscriberPreferences};
use footballvoice::inbound::http::articles::{CreateArticleRequest, UpdateArticleRequest};
use footballvoice::inbound::http::subscribers::SubscribeRequest;

use support::{ADMIN_EMAIL, ADMIN_PASSWORD, Harness, build_app};

fn start(harness: &Harness) -> (SocketAddr, ServerHandle) {
    let state = harness.state.clone();
    let health = harness.health.clone();
    let key = harness.key.clone();
    let server = HttpServer::new(move || build_app(state.clone(), health.clone(), key.clone()))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind ephemeral port");
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (addr, handle)
}

fn base(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}/")).expect("base url")
}

fn draft(title: &str, category: Category) -> CreateArticleRequest {
    CreateArticleRequest {
        title: title.to_owned(),
        content: format!("{title} in depth."),
        excerpt: None,
        category,
        tags: vec!["weekend".to_owned()],
        published: false,
        featured: false,
        image_url: None,
        published_at: None,
        author: None,
    }
}

#[actix_web::test]
async fn board_refetches_after_each_mutation() {
    let harness = Harness::new().await;
    let (addr, handle) = start(&harness);
    let client = ApiClient::new(base(addr)).expect("client");
    client
        .login(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("login");
    let mut board = ArticleBoard::new(client);
    assert!(board.cache().is_loading());

    board.load().await;
    assert!(matches!(board.cache().state(), CacheState::Ready(records) if records.is_empty()));

    let derby = board
        .create(&draft("Derby preview", Category::Predictions))
        .await
        .expect("create derby");
    board
        .create(&draft("Summer window", Category::NewsTransfers))
        .await
        .expect("create window");
    assert_eq!(board.cache().records().len(), 2);

    let patch = UpdateArticleRequest {
        published: Patch::Set(true),
        ..UpdateArticleRequest::default()
    };
    board.update(derby.id, &patch).await.expect("publish");

    let published = ArticleFilter::default().with_status(StatusFilter::Published);
    let titles: Vec<&str> = board
        .visible(&published)
        .into_iter()
        .map(|article| article.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Derby preview"]);

    let transfers = ArticleFilter::default()
        .with_category(CategoryFilter::One(Category::NewsTransfers))
        .with_search("WINDOW");
    assert_eq!(board.visible(&transfers).len(), 1);

    board.delete(derby.id).await.expect("delete");
    assert_eq!(board.cache().records().len(), 1);

    let missing = board.delete(derby.id).await.expect_err("already deleted");
    assert_eq!(missing.status(), Some(404));
    assert_eq!(board.cache().records().len(), 1);

    handle.stop(true).await;
}

#[actix_web::test]
async fn subscriber_board_tracks_duplicates() {
    let harness = Harness::new().await;
    let (addr, handle) = start(&harness);
    let client = ApiClient::new(base(addr)).expect("client");
    client
        .login(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("login");
    let mut board = SubscriberBoard::new(client);
    let request = SubscribeRequest {
        email: "ultra@example.com".to_owned(),
        name: Some("Ultra".to_owned()),
        preferences: SubscriberPreferences::default(),
    };

    let first = board.subscribe(&request).await.expect("subscribe");
    assert!(matches!(first, Subscription::Created(_)));
    let second = board.subscribe(&request).await.expect("subscribe again");
    assert_eq!(second, Subscription::AlreadySubscribed);
    assert_eq!(board.cache().records().len(), 1);

    handle.stop(true).await;
}

#[actix_web::test]
async fn unreachable_server_marks_the_cache_failed() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr").port()
    };
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let client =
        ApiClient::with_timeout(base(addr), Duration::from_secs(2)).expect("client");
    let mut board = ArticleBoard::new(client);

    board.load().await;

    assert!(board.cache().is_failed());
    assert!(board.cache().failure().is_some());
    assert!(board.cache().records().is_empty());
}
