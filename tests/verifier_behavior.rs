//! Behavior-driven tests for legal-name verification
//!
//! These tests exercise the Gemini verifier and the full GLEIF + Gemini
//! pipeline against scripted HTTP transports, with tokio's paused clock
//! standing in for real retry delays.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use leiscope_core::{
    FailureKind, GeminiVerifier, GleifRegistry, HttpClient, HttpError, HttpRequest, HttpResponse,
    LeiResolver, LeiscopeConfig, LookupOutcome, NameVerifier, Pricing, RetryPolicy,
    SourceCitation, SourceErrorKind,
};

/// Answers GLEIF and Gemini requests from separate scripts.
#[derive(Default)]
struct ScriptedTransport {
    gleif: Mutex<VecDeque<HttpResponse>>,
    gemini: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    log: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    fn gleif(self, response: HttpResponse) -> Self {
        self.gleif.lock().expect("script").push_back(response);
        self
    }

    fn gemini(self, response: Result<HttpResponse, HttpError>) -> Self {
        self.gemini.lock().expect("script").push_back(response);
        self
    }

    fn gemini_calls(&self) -> usize {
        self.log
            .lock()
            .expect("log")
            .iter()
            .filter(|request| request.url.contains(":generateContent"))
            .count()
    }
}

impl HttpClient for ScriptedTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let scripted = if request.url.contains("gleif") {
            self.gleif.lock().expect("script").pop_front().map(Ok)
        } else {
            self.gemini.lock().expect("script").pop_front()
        };
        let next =
            scripted.unwrap_or_else(|| Err(HttpError::non_retryable("unscripted request")));
        self.log.lock().expect("log").push(request);
        Box::pin(async move { next })
    }
}

fn gemini_answer(text: &str, sources: &[(&str, &str)]) -> HttpResponse {
    let chunks: Vec<String> = sources
        .iter()
        .map(|(uri, title)| format!(r#"{{"web": {{"uri": "{uri}", "title": "{title}"}}}}"#))
        .collect();
    HttpResponse::ok_json(format!(
        r#"{{"candidates": [{{"content": {{"parts": [{{"text": "{text}"}}]}},
             "groundingMetadata": {{"groundingChunks": [{}]}}}}],
           "usageMetadata": {{"promptTokenCount": 2000, "candidatesTokenCount": 100}}}}"#,
        chunks.join(",")
    ))
}

fn gleif_page(records: &[(&str, &str)]) -> HttpResponse {
    let data: Vec<String> = records
        .iter()
        .map(|(lei, name)| {
            format!(
                r#"{{"id": "{lei}", "attributes": {{"lei": "{lei}", "entity": {{
                    "legalName": {{"name": "{name}"}},
                    "legalAddress": {{"addressLines": ["1600 Amphitheatre Parkway"],
                                     "city": "Mountain View", "region": "US-CA",
                                     "postalCode": "94043", "country": "US"}}}}}}}}"#
            )
        })
        .collect();
    HttpResponse::ok_json(format!(r#"{{"data": [{}]}}"#, data.join(",")))
}

fn config() -> LeiscopeConfig {
    LeiscopeConfig::default().with_api_key("test-key")
}

fn pipeline(transport: &Arc<ScriptedTransport>) -> LeiResolver {
    let config = config();
    let registry = GleifRegistry::with_http_client(transport.clone(), &config);
    let verifier =
        GeminiVerifier::with_http_client(transport.clone(), &config).expect("key configured");
    LeiResolver::new(Arc::new(registry), Arc::new(verifier))
}

// =============================================================================
// Verifier: Answers
// =============================================================================

#[tokio::test]
async fn when_gemini_answers_verifier_reports_name_sources_and_cost() {
    // Given: A grounded answer citing two pages
    let transport = Arc::new(ScriptedTransport::default().gemini(Ok(gemini_answer(
        "Google LLC",
        &[
            ("https://about.google", "about.google"),
            ("https://en.wikipedia.org/wiki/Google", "wikipedia.org"),
        ],
    ))));
    let verifier =
        GeminiVerifier::with_http_client(transport.clone(), &config()).expect("key configured");

    // When: The website is verified
    let result = verifier
        .verify_legal_name("https://google.com")
        .await
        .expect("verification succeeds");

    // Then: Name, citations in order, and cost are all reported
    assert_eq!(result.legal_name.as_deref(), Some("Google LLC"));
    assert_eq!(
        result.sources,
        vec![
            SourceCitation::new("https://about.google", "about.google"),
            SourceCitation::new("https://en.wikipedia.org/wiki/Google", "wikipedia.org"),
        ]
    );
    // 2000 * 0.075 / 1e6 + 100 * 0.30 / 1e6
    assert!((result.estimated_cost - 0.000_18).abs() < 1e-12);
}

#[tokio::test]
async fn when_pricing_is_overridden_cost_follows_it() {
    // Given: A verifier with custom pricing
    let transport =
        Arc::new(ScriptedTransport::default().gemini(Ok(gemini_answer("Acme Ltd", &[]))));
    let verifier = GeminiVerifier::with_http_client(transport.clone(), &config())
        .expect("key configured")
        .with_pricing(Pricing {
            input_per_million: 1.0,
            output_per_million: 10.0,
        });

    // When: The website is verified
    let result = verifier
        .verify_legal_name("acme.test")
        .await
        .expect("verification succeeds");

    // Then: The custom rates are applied
    assert!((result.estimated_cost - 0.003).abs() < 1e-12);
}

// =============================================================================
// Verifier: Retries
// =============================================================================

#[tokio::test(start_paused = true)]
async fn when_gemini_keeps_failing_verifier_stops_after_four_attempts() {
    // Given: A transport that never recovers
    let mut transport = ScriptedTransport::default();
    for _ in 0..6 {
        transport = transport.gemini(Err(HttpError::new("connection reset by peer")));
    }
    let transport = Arc::new(transport);
    let verifier =
        GeminiVerifier::with_http_client(transport.clone(), &config()).expect("key configured");
    let started = tokio::time::Instant::now();

    // When: The website is verified
    let error = verifier
        .verify_legal_name("acme.test")
        .await
        .expect_err("every attempt fails");

    // Then: Four attempts were made, sixty seconds apart
    assert_eq!(transport.gemini_calls(), 4);
    assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    assert!(error
        .message()
        .starts_with("gemini request failed after 4 attempts: "));
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(180), "waited {waited:?}");
    assert!(waited < Duration::from_secs(181), "waited {waited:?}");
}

#[tokio::test(start_paused = true)]
async fn when_rate_limited_verifier_waits_as_long_as_gemini_asks() {
    // Given: One rate-limit response carrying a retry delay
    let transport = Arc::new(
        ScriptedTransport::default()
            .gemini(Ok(HttpResponse::new(
                429,
                r#"{"error": {"code": 429, "message": "quota", "status": "RESOURCE_EXHAUSTED",
                    "details": [{"@type": "type.googleapis.com/google.rpc.RetryInfo",
                                 "retryDelay": "5s"}]}}"#,
            )))
            .gemini(Ok(gemini_answer("Acme Ltd", &[]))),
    );
    let verifier =
        GeminiVerifier::with_http_client(transport.clone(), &config()).expect("key configured");
    let started = tokio::time::Instant::now();

    // When: The website is verified
    let result = verifier
        .verify_legal_name("acme.test")
        .await
        .expect("second attempt succeeds");

    // Then: The server delay replaced the sixty-second default
    assert_eq!(result.legal_name.as_deref(), Some("Acme Ltd"));
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(5), "waited {waited:?}");
    assert!(waited < Duration::from_secs(6), "waited {waited:?}");
}

#[tokio::test]
async fn when_retry_policy_is_injected_verifier_uses_it() {
    // Given: A verifier allowed a single attempt
    let transport = Arc::new(
        ScriptedTransport::default()
            .gemini(Ok(HttpResponse::new(503, "overloaded")))
            .gemini(Ok(gemini_answer("Acme Ltd", &[]))),
    );
    let verifier = GeminiVerifier::with_http_client(transport.clone(), &config())
        .expect("key configured")
        .with_retry_policy(RetryPolicy::no_retry());

    // When: The website is verified
    let error = verifier
        .verify_legal_name("acme.test")
        .await
        .expect_err("single attempt fails");

    // Then: No retry happened
    assert_eq!(transport.gemini_calls(), 1);
    assert_eq!(
        error.message(),
        "gemini request failed after 1 attempts: gemini upstream returned status 503: overloaded"
    );
}

// =============================================================================
// Pipeline: GLEIF + Gemini
// =============================================================================

#[tokio::test]
async fn full_pipeline_resolves_lei_from_gleif_and_gemini() {
    // Given: GLEIF knows two Google entities; Gemini names the US one
    let transport = Arc::new(
        ScriptedTransport::default()
            .gleif(gleif_page(&[
                ("7ZW8QJWVPR4P1J1KQY45", "Google LLC"),
                ("549300MTWYS1CP9X6O92", "Google Ireland Limited"),
            ]))
            .gemini(Ok(gemini_answer(
                "Google LLC",
                &[("https://about.google", "about.google")],
            ))),
    );

    // When: The lookup runs
    let outcome = pipeline(&transport)
        .find_lei("Google", "https://google.com")
        .await;

    // Then: The first matching GLEIF record is returned with its address
    match outcome {
        LookupOutcome::Success {
            lei,
            legal_name,
            address,
            sources,
            estimated_cost,
        } => {
            assert_eq!(lei, "7ZW8QJWVPR4P1J1KQY45");
            assert_eq!(legal_name, "Google LLC");
            assert_eq!(
                address,
                "1600 Amphitheatre Parkway, Mountain View, US-CA, 94043, US"
            );
            assert_eq!(sources.len(), 1);
            assert!(estimated_cost > 0.0);
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn full_pipeline_skips_gemini_when_gleif_is_empty() {
    // Given: GLEIF returns no records
    let transport = Arc::new(ScriptedTransport::default().gleif(gleif_page(&[])));

    // When: The lookup runs
    let outcome = pipeline(&transport)
        .find_lei("Nonexistent Co", "nonexistent.test")
        .await;

    // Then: Gemini is never called
    assert_eq!(outcome.failure_kind(), Some(FailureKind::NoRecords));
    assert_eq!(transport.gemini_calls(), 0);
}

#[tokio::test]
async fn full_pipeline_reports_gleif_outage_as_lookup_error() {
    // Given: GLEIF answers with a server error
    let transport = Arc::new(
        ScriptedTransport::default().gleif(HttpResponse::new(502, "Bad Gateway")),
    );

    // When: The lookup runs
    let outcome = pipeline(&transport).find_lei("Google", "google.com").await;

    // Then: The status and body reach the caller
    assert_eq!(
        outcome.message(),
        Some("Error during LEI lookup: gleif upstream returned status 502: Bad Gateway")
    );
    assert_eq!(transport.gemini_calls(), 0);
}
