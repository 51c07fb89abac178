use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use leiscope_core::{
    EntityRegistry, GleifRegistry, HttpClient, HttpError, HttpRequest, HttpResponse, Lei,
    RegistrySearch, SourceErrorKind, ValidationError,
};

/// Serves one canned response per URL prefix and records every request.
#[derive(Default)]
struct CannedHttpClient {
    routes: Vec<(String, HttpResponse)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl CannedHttpClient {
    fn with_route(mut self, url_prefix: &str, response: HttpResponse) -> Self {
        self.routes.push((url_prefix.to_owned(), response));
        self
    }

    fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("request log")
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }
}

impl HttpClient for CannedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self
            .routes
            .iter()
            .find(|(prefix, _)| request.url.starts_with(prefix.as_str()))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| HttpError::non_retryable(format!("no route for {}", request.url)));
        self.requests.lock().expect("request log").push(request);
        Box::pin(async move { response })
    }
}

const SEARCH_PREFIX: &str = "https://api.gleif.org/api/v1/lei-records?";

fn record_json(lei: &str, name: &str) -> String {
    format!(
        r#"{{"type": "lei-records", "id": "{lei}", "attributes": {{"lei": "{lei}",
            "entity": {{"legalName": {{"name": "{name}"}}, "status": "ACTIVE",
                        "legalAddress": {{"addressLines": ["1 Main St"], "city": "Springfield", "country": "US"}}}}}}}}"#
    )
}

fn page(records: &[String]) -> HttpResponse {
    HttpResponse::ok_json(format!(r#"{{"data": [{}]}}"#, records.join(",")))
}

fn registry_with(client: CannedHttpClient) -> (Arc<CannedHttpClient>, GleifRegistry) {
    let client = Arc::new(client);
    let registry = GleifRegistry::new(client.clone());
    (client, registry)
}

#[tokio::test]
async fn zero_candidates_is_an_empty_list_not_an_error() {
    let (_, registry) = registry_with(CannedHttpClient::default().with_route(
        SEARCH_PREFIX,
        HttpResponse::ok_json(r#"{"meta": {"pagination": {"total": 0}}, "data": []}"#),
    ));

    let records = registry
        .search_by_name("Nonexistent Co")
        .await
        .expect("empty page is a success");

    assert!(records.is_empty());
}

#[tokio::test]
async fn candidates_keep_registry_order_without_filtering() {
    let (_, registry) = registry_with(CannedHttpClient::default().with_route(
        SEARCH_PREFIX,
        page(&[
            record_json("LEI0000000000000000B", "Foo Bar LLC"),
            record_json("LEI0000000000000000A", "Foo LLC"),
            record_json("LEI0000000000000000C", "Unrelated Widgets Inc"),
        ]),
    ));

    let records = registry.search_by_name("Foo").await.expect("search succeeds");

    let names: Vec<_> = records.iter().map(|r| r.legal_name.as_str()).collect();
    assert_eq!(names, ["Foo Bar LLC", "Foo LLC", "Unrelated Widgets Inc"]);
    assert_eq!(records[0].address, "1 Main St, Springfield, US");
}

#[tokio::test]
async fn default_search_asks_for_ten_active_records() {
    let (client, registry) = registry_with(
        CannedHttpClient::default().with_route(SEARCH_PREFIX, page(&[])),
    );

    registry.search_by_name("Acme").await.expect("search succeeds");

    let urls = client.urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("page[size]=10"), "{}", urls[0]);
    assert!(urls[0].contains("page[number]=1"), "{}", urls[0]);
    assert!(urls[0].contains("filter[entity.status]=ACTIVE"), "{}", urls[0]);
}

#[tokio::test]
async fn page_size_never_exceeds_registry_ceiling() {
    let (client, registry) = registry_with(
        CannedHttpClient::default().with_route(SEARCH_PREFIX, page(&[])),
    );
    let request = RegistrySearch::new("Acme")
        .expect("valid")
        .with_page_size(1_000)
        .all_statuses();

    registry.search(request).await.expect("search succeeds");

    let url = &client.urls()[0];
    assert!(url.contains("page[size]=200"), "{url}");
    assert!(!url.contains("filter[entity.status]"), "{url}");
}

#[tokio::test]
async fn blank_name_fails_before_any_request() {
    let (client, registry) = registry_with(CannedHttpClient::default());

    let error = registry
        .search_by_name(" ")
        .await
        .expect_err("blank name must fail");

    assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
    assert!(!error.retryable());
    assert!(client.urls().is_empty());
}

#[tokio::test]
async fn configured_page_size_flows_into_default_search() {
    let (client, registry) = registry_with(
        CannedHttpClient::default().with_route(SEARCH_PREFIX, page(&[])),
    );
    let registry = registry.with_page_size(25);

    registry.search_by_name("Acme").await.expect("search succeeds");

    assert!(client.urls()[0].contains("page[size]=25"));
}

#[tokio::test]
async fn lookup_finds_a_record_or_reports_none() {
    let found = "5493006MHB84DD0ZWV18";
    let missing = "529900AAAAAAAAAAAA00";
    let (_, registry) = registry_with(
        CannedHttpClient::default()
            .with_route(
                &format!("https://api.gleif.org/api/v1/lei-records/{found}"),
                HttpResponse::ok_json(format!(
                    r#"{{"data": {}}}"#,
                    record_json(found, "Alphabet Inc.")
                )),
            )
            .with_route(
                &format!("https://api.gleif.org/api/v1/lei-records/{missing}"),
                HttpResponse::new(404, r#"{"errors": [{"status": "404"}]}"#),
            ),
    );

    let record = registry
        .lookup(&Lei::parse(found).expect("valid"))
        .await
        .expect("lookup succeeds")
        .expect("record exists");
    assert_eq!(record.id, found);
    assert_eq!(record.legal_name, "Alphabet Inc.");

    let absent = registry
        .lookup(&Lei::parse(missing).expect("valid"))
        .await
        .expect("404 is not an error");
    assert_eq!(absent, None);
}

#[test]
fn malformed_identifiers_are_rejected_without_network() {
    assert!(matches!(
        Lei::parse("TOO-SHORT"),
        Err(ValidationError::InvalidLeiLength { len: 9, .. })
    ));
    assert!(matches!(
        Lei::parse("5493006MHB84DD0ZWV1*"),
        Err(ValidationError::InvalidLeiChar { ch: '*', index: 19 })
    ));
}

#[test]
fn registry_identifies_itself() {
    let registry = GleifRegistry::new(Arc::new(CannedHttpClient::default()));
    assert_eq!(registry.id(), "gleif");
    assert_eq!(registry.page_size(), 10);
}
