use super::*;
use crate::optimistic::Removal;
use crate::protocol::{DeleteAd, GetAdStats, GetLatestAd, ListAds, ListUsers, LoginRequest};
use crate::request::ReqwestTransport;
use crate::route::{self, AppRoute};
use crate::session::{self, KeyValueStore, LoginError, MemoryStore, SessionStore};
use crate::{Ad, Role, STORAGE_TOKEN_KEY};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

// =========================================================
// Shared Mock Components
// =========================================================

struct TestContext {
    /// Requests in the order they reached the transport
    sent: RefCell<Vec<HttpRequest>>,
    /// Canned replies, consumed front to back
    replies: RefCell<VecDeque<ApiResult<HttpResponse>>>,
}

impl TestContext {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            sent: RefCell::new(Vec::new()),
            replies: RefCell::new(VecDeque::new()),
        })
    }

    fn reply(&self, status: u16, body: &str) {
        self.replies.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    fn fail(&self, message: &str) {
        self.replies
            .borrow_mut()
            .push_back(Err(ApiError::Network(message.to_string())));
    }

    fn last(&self) -> HttpRequest {
        self.sent.borrow().last().cloned().expect("no request sent")
    }

    fn count(&self, m: HttpMethod) -> usize {
        self.sent.borrow().iter().filter(|r| r.method == m).count()
    }
}

#[derive(Clone)]
struct TestTransport {
    ctx: Rc<TestContext>,
}

#[async_trait(?Send)]
impl HttpTransport for TestTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        self.ctx.sent.borrow_mut().push(req);
        self.ctx
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no reply queued".into())))
    }
}

/// Mirrors the browser wiring: token read from the session, 401 clears it and
/// forces the login view unless that view is already showing.
struct Harness {
    ctx: Rc<TestContext>,
    store: MemoryStore,
    active: Rc<Cell<AppRoute>>,
    forced_logins: Rc<Cell<u32>>,
    client: ApiClient<TestTransport>,
}

impl Harness {
    fn new() -> Self {
        Self::at(AppRoute::Dashboard)
    }

    fn at(start: AppRoute) -> Self {
        let ctx = TestContext::new();
        let store = MemoryStore::new();
        let active = Rc::new(Cell::new(start));
        let forced_logins = Rc::new(Cell::new(0));

        let session = SessionStore::new(store.clone());
        let expired = SessionStore::new(store.clone());
        let hook_active = Rc::clone(&active);
        let hook_count = Rc::clone(&forced_logins);

        let client = ApiClient::builder(
            ClientConfig::new("http://api.test/"),
            TestTransport { ctx: Rc::clone(&ctx) },
        )
        .token_source(move || session.token())
        .on_unauthorized(move || {
            expired.expire();
            if route::forces_login_reload(hook_active.get().to_path()) {
                hook_active.set(AppRoute::Login);
                hook_count.set(hook_count.get() + 1);
            }
        })
        .build();

        Self {
            ctx,
            store,
            active,
            forced_logins,
            client,
        }
    }

    fn session(&self) -> SessionStore<MemoryStore> {
        SessionStore::new(self.store.clone())
    }
}

fn ad(id: &str) -> Ad {
    Ad {
        id: id.to_string(),
        text: String::new(),
        image_url: None,
        score: None,
        created_at: None,
    }
}

// =========================================================
// Request interceptor
// =========================================================

#[tokio::test]
async fn attaches_bearer_token_when_present() {
    let h = Harness::new();
    h.session().begin("abc123", Role::Admin);
    h.ctx.reply(200, "[]");

    let _: Vec<Ad> = h.client.get("/ads-library/all").await.unwrap();

    let req = h.ctx.last();
    assert_eq!(req.url, "http://api.test/ads-library/all");
    assert_eq!(req.header("Authorization"), Some("Bearer abc123"));
    assert_eq!(req.header("Content-Type"), Some("application/json"));
}

#[tokio::test]
async fn omits_authorization_without_token() {
    let h = Harness::new();
    h.ctx.reply(200, "[]");

    let _: Vec<Ad> = h.client.get("ads-library/all").await.unwrap();

    let req = h.ctx.last();
    assert_eq!(req.url, "http://api.test/ads-library/all");
    assert_eq!(req.header("Authorization"), None);
}

#[tokio::test]
async fn token_is_read_for_every_request() {
    let h = Harness::new();
    h.ctx.reply(200, "null");
    h.ctx.reply(200, "null");

    let _: serde_json::Value = h.client.get("/users/stats").await.unwrap();
    assert_eq!(h.ctx.last().header("Authorization"), None);

    h.session().begin("later", Role::User);
    let _: serde_json::Value = h.client.get("/users/stats").await.unwrap();
    assert_eq!(h.ctx.last().header("Authorization"), Some("Bearer later"));
}

#[tokio::test]
async fn header_overrides_and_form_bodies() {
    let h = Harness::new();
    h.ctx.reply(200, r#"{"access_token":"t","role":"user"}"#);

    let login = LoginRequest {
        username: "u@example.com".into(),
        password: "pw".into(),
    };
    h.client.send(&login).await.unwrap();

    let req = h.ctx.last();
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(
        req.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        req.body.as_deref(),
        Some("username=u%40example.com&password=pw")
    );

    h.ctx.reply(200, "{}");
    let _: serde_json::Value = h
        .client
        .request(HttpMethod::Get, "/x", None, &[("X-Trace", "1")])
        .await
        .unwrap();
    assert_eq!(h.ctx.last().header("x-trace"), Some("1"));
}

#[tokio::test]
async fn post_serializes_json_body() {
    let h = Harness::new();
    h.ctx.reply(200, r#"{"text":"t","image_url":"/static/a.png","score":9}"#);

    let body = serde_json::json!({ "text": "hello", "platform": "instagram" });
    let out: crate::GeneratedAd = h
        .client
        .post("/ads-library/generate-enhanced", Some(&body))
        .await
        .unwrap();

    assert_eq!(out.score, Some(9.0));
    let req = h.ctx.last();
    let sent: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(sent, body);
}

// =========================================================
// Response interceptor
// =========================================================

#[tokio::test]
async fn unauthorized_clears_token_and_forces_login() {
    let h = Harness::new();
    h.session().begin("stale", Role::Admin);
    h.ctx.reply(401, r#"{"detail":"Invalid or expired token"}"#);

    let err = h.client.send(&ListAds).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.detail(), Some("Invalid or expired token"));
    assert_eq!(h.store.get(STORAGE_TOKEN_KEY), None);
    assert_eq!(h.active.get(), AppRoute::Login);
    assert_eq!(h.forced_logins.get(), 1);

    // Reload after the forced navigation lands on login as well.
    let landed = route::resolve("/dashboard", h.session().snapshot());
    assert_eq!(landed.route, AppRoute::Login);
}

#[tokio::test]
async fn other_failures_pass_through_untouched() {
    let h = Harness::new();
    h.session().begin("good", Role::Admin);
    h.ctx.reply(404, r#"{"detail":"Ad not found"}"#);
    h.ctx.reply(500, "");
    h.ctx.fail("connection refused");

    let not_found = h.client.send(&DeleteAd { id: "7".into() }).await.unwrap_err();
    let server = h.client.send(&ListAds).await.unwrap_err();
    let network = h.client.send(&ListAds).await.unwrap_err();

    assert_eq!(not_found.kind(), crate::ErrorKind::ClientError);
    assert_eq!(not_found.user_message("delete failed"), "Ad not found");
    assert_eq!(server.kind(), crate::ErrorKind::ServerError);
    assert_eq!(network.kind(), crate::ErrorKind::Network);

    assert_eq!(h.forced_logins.get(), 0);
    assert_eq!(h.session().token().as_deref(), Some("good"));
    assert_eq!(h.ctx.sent.borrow().len(), 3);
}

#[tokio::test]
async fn decode_failure_on_success_status() {
    let h = Harness::new();
    h.ctx.reply(200, "not json");
    let err = h.client.send(&GetAdStats).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert_eq!(h.forced_logins.get(), 0);
}

// =========================================================
// Login and role routing
// =========================================================

#[tokio::test]
async fn admin_login_lands_on_admin_tree() {
    let h = Harness::new();
    h.ctx
        .reply(200, r#"{"access_token":"jwt-a","token_type":"bearer","role":"admin"}"#);

    let started = session::login(&h.client, &h.session(), "boss@example.com", "pw")
        .await
        .unwrap();

    assert_eq!(AppRoute::landing(started.effective_role()), AppRoute::Dashboard);
    assert_eq!(h.session().token().as_deref(), Some("jwt-a"));
    assert_eq!(h.session().role(), Some(Role::Admin));
}

#[tokio::test]
async fn other_roles_land_on_user_tree() {
    let h = Harness::new();
    h.ctx.reply(200, r#"{"access_token":"jwt-b","role":"analyst"}"#);

    let started = session::login(&h.client, &h.session(), "a@example.com", "pw")
        .await
        .unwrap();

    assert_eq!(
        AppRoute::landing(started.effective_role()),
        AppRoute::UserDashboard
    );
}

#[tokio::test]
async fn login_without_token_is_rejected() {
    let h = Harness::new();
    h.ctx.reply(200, r#"{"role":"admin"}"#);

    let err = session::login(&h.client, &h.session(), "a@example.com", "pw")
        .await
        .unwrap_err();

    assert_eq!(err, LoginError::MissingToken);
    assert_eq!(h.session().token(), None);
}

#[tokio::test]
async fn bad_credentials_surface_backend_detail() {
    let h = Harness::at(AppRoute::Login);
    h.ctx.reply(401, r#"{"detail":"Invalid credentials"}"#);

    let err = session::login(&h.client, &h.session(), "a@example.com", "nope")
        .await
        .unwrap_err();

    match err {
        LoginError::Request(e) => assert_eq!(e.user_message("Login failed"), "Invalid credentials"),
        other => panic!("unexpected error: {:?}", other),
    }
    // Already on the login view: no reload, the inline error stays visible
    assert_eq!(h.active.get(), AppRoute::Login);
    assert_eq!(h.forced_logins.get(), 0);
    assert!(h.session().token().is_none());
}

// =========================================================
// Page flows
// =========================================================

#[tokio::test]
async fn concurrent_dashboard_requests_settle_together() {
    let h = Harness::new();
    h.ctx
        .reply(200, r#"{"total_ads":12,"analyzed_ads":5,"generated_ads":3,"platforms":[]}"#);
    h.ctx.reply(200, r#"{"message":"none yet"}"#);

    let (stats, latest) = tokio::join!(h.client.send(&GetAdStats), h.client.send(&GetLatestAd));

    assert_eq!(stats.unwrap().total_ads, 12);
    assert!(latest.unwrap().into_option().is_none());
    assert_eq!(h.ctx.count(HttpMethod::Get), 2);
}

#[tokio::test]
async fn failed_list_loads_produce_an_inline_message() {
    let h = Harness::new();
    h.ctx.reply(500, "");
    h.ctx.reply(503, r#"{"detail":"ads store unavailable"}"#);

    let users = h.client.send(&ListUsers).await.unwrap_err();
    let latest = h.client.send(&GetLatestAd).await.unwrap_err();

    assert_eq!(users.user_message("Failed to load users"), "Failed to load users");
    assert_eq!(
        latest.user_message("Failed to load the latest ad"),
        "ads store unavailable"
    );
    assert_eq!(h.forced_logins.get(), 0);
}

#[tokio::test]
async fn optimistic_delete_of_repeated_rows_commits_all_of_them() {
    let h = Harness::new();
    h.ctx.reply(200, r#"{"message":"deleted"}"#);
    let mut ads = vec![ad("a"), ad("b"), ad("c"), ad("b")];

    let removal = Removal::take(&mut ads, "b").unwrap();
    h.client.send(&DeleteAd { id: "b".into() }).await.unwrap();
    assert_eq!(removal.commit().len(), 2);

    let ids: Vec<_> = ads.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["a", "c"]);
}

#[tokio::test]
async fn optimistic_delete_commits_on_success() {
    let h = Harness::new();
    h.ctx.reply(200, r#"{"message":"deleted"}"#);
    let mut ads = vec![ad("a"), ad("b"), ad("c")];

    let removal = Removal::take(&mut ads, "b").unwrap();
    let result = h.client.send(&DeleteAd { id: "b".into() }).await;
    assert!(result.is_ok());
    let _ = removal.commit();

    let ids: Vec<_> = ads.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["a", "c"]);
    assert_eq!(h.ctx.count(HttpMethod::Delete), 1);
    assert_eq!(h.ctx.last().url, "http://api.test/ads-library/delete/b");
}

#[tokio::test]
async fn optimistic_delete_rolls_back_on_failure() {
    let h = Harness::new();
    h.ctx.reply(500, r#"{"detail":"db locked"}"#);
    let original = vec![ad("a"), ad("b"), ad("c")];
    let mut ads = original.clone();

    let removal = Removal::take(&mut ads, "b").unwrap();
    let err = h
        .client
        .send(&DeleteAd { id: "b".into() })
        .await
        .unwrap_err();
    removal.rollback(&mut ads);

    assert_eq!(ads, original);
    assert_eq!(err.user_message("Failed to delete ad"), "db locked");
    assert_eq!(h.ctx.count(HttpMethod::Delete), 1);
}

// =========================================================
// Wire-level tests against a mock server
// =========================================================

fn wire_client(
    base: String,
    store: MemoryStore,
    forced: Rc<Cell<u32>>,
) -> ApiClient<ReqwestTransport> {
    let session = SessionStore::new(store.clone());
    let expired = SessionStore::new(store);
    ApiClient::builder(ClientConfig::new(base), ReqwestTransport::new())
        .token_source(move || session.token())
        .on_unauthorized(move || {
            expired.expire();
            forced.set(forced.get() + 1);
        })
        .build()
}

#[tokio::test]
async fn wire_bearer_header_and_form_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("username=a%40b.c&password=secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "access_token": "wire-token", "role": "admin" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/all"))
        .and(header("authorization", "Bearer wire-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "u-1", "email": "a@b.c", "full_name": null, "role": "admin",
              "is_active": true, "created_at": "2024-01-02T03:04:05" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let forced = Rc::new(Cell::new(0));
    let client = wire_client(server.uri(), store.clone(), Rc::clone(&forced));
    let session = SessionStore::new(store);

    let started = session::login(&client, &session, "a@b.c", "secret")
        .await
        .unwrap();
    assert_eq!(started.role, Some(Role::Admin));

    let users = client.send(&crate::protocol::ListUsers).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, Role::Admin);
    assert_eq!(forced.get(), 0);
}

#[tokio::test]
async fn wire_no_authorization_header_without_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads-library/all"))
        .respond_with(|req: &Request| {
            if req.headers.contains_key("authorization") {
                ResponseTemplate::new(400)
            } else {
                ResponseTemplate::new(200).set_body_json(serde_json::json!([]))
            }
        })
        .mount(&server)
        .await;

    let client = wire_client(server.uri(), MemoryStore::new(), Rc::new(Cell::new(0)));
    let ads = client.send(&ListAds).await.unwrap().into_vec();
    assert!(ads.is_empty());
}

#[tokio::test]
async fn wire_unauthorized_expires_session() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/ads-library/delete/42"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "detail": "Invalid or expired token" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    SessionStore::new(store.clone()).begin("expired", Role::User);
    let forced = Rc::new(Cell::new(0));
    let client = wire_client(server.uri(), store.clone(), Rc::clone(&forced));

    let err = client.send(&DeleteAd { id: "42".into() }).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(forced.get(), 1);
    assert_eq!(store.get(STORAGE_TOKEN_KEY), None);
}
