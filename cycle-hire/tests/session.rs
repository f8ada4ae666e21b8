//! End-to-end session tests over HTTP against a WireMock upstream.

use cycle_hire::CycleHireError;
use cycle_hire::domain::StationId;
use cycle_hire::registry::StaticLocationKey;
use cycle_hire::service::{CycleHireSession, HireOptions, SearchOptions, SessionConfig};
use cycle_hire::tokens::{Provenance, Tier};
use cycle_hire::transport::{HttpTransport, HttpTransportConfig};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path},
};

const CROMER_ENCODING: &str = "Kv6OJKA1JWRui1R+UltG2iCZBcb3+EMMfBu5aAhZNEXnA3QTJHKcKBLT+Hd097N5";
const TAVITON_ENCODING: &str = "hjQd5cl1SN7BOdmflRPMZwu1UnranBQaYc1W+u/ofJSmJa24Ca9fbkVYjg5SZ+Lg";

fn session(server: &MockServer) -> CycleHireSession<HttpTransport> {
    let transport =
        HttpTransport::new(HttpTransportConfig::new().with_base_url(server.uri())).unwrap();
    CycleHireSession::new(transport, SessionConfig::default())
}

fn release_page(code: &str) -> serde_json::Value {
    json!({
        "Children": [
            {"ID": "page_title", "Type": "Node.Label", "Name": "Hire confirmed"},
            {"ID": "page_code", "Type": "Node.Label",
             "Name": "Your cycle hire release code:", "Subtitle": code}
        ]
    })
}

fn search_page() -> serde_json::Value {
    json!({
        "Children": [
            {"ID": "lchs_search_header", "Type": "Node.Label", "Name": "Results"},
            {"ID": "lchs_searchresult_200017_link", "Type": "Node.Link",
             "Name": "Soho Square, Soho", "Subtitle": "9 bikes",
             "Tags": {"LCHS.StationID": "200017", "LCHS.DockLocation": "51.5156,-0.1321"}},
            {"ID": "lchs_searchresult_200017_hire", "Type": "Node.Media.Image",
             "Name": "Hire now",
             "Tags": {"Terminal": "300077", "PointName": "Soho Square, Soho", "StationID": "200017"}}
        ]
    })
}

#[tokio::test]
async fn primed_tokens_hire_a_different_station() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Workflows/HandleEventWithNode"))
        .and(header("c3-encoding", CROMER_ENCODING))
        .and(body_string_contains("c3-clienttime=1748480905.359684"))
        .and(body_string_contains("TerminalName%253D001009"))
        .respond_with(ResponseTemplate::new(200).set_body_json(release_page("12312")))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session(&server);
    session
        .prime_tokens_from_static_location(StaticLocationKey::CromerStreet)
        .unwrap();

    let outcome = session
        .hire_static(StaticLocationKey::TavitonStreet, HireOptions::new())
        .await
        .unwrap();

    assert_eq!(outcome.code.as_str(), "12312");
    assert_eq!(outcome.tier, Tier::FullReuse);
    assert_eq!(outcome.station, "Taviton Street, Bloomsbury");
}

#[tokio::test]
async fn rejected_tokens_fall_back_to_static() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Workflows/HandleEventWithNode"))
        .and(header("c3-encoding", CROMER_ENCODING))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/Workflows/HandleEventWithNode"))
        .and(header("c3-encoding", TAVITON_ENCODING))
        .respond_with(ResponseTemplate::new(200).set_body_json(release_page("33211")))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session(&server);
    session
        .prime_tokens_from_static_location(StaticLocationKey::CromerStreet)
        .unwrap();

    let outcome = session
        .hire_static(StaticLocationKey::TavitonStreet, HireOptions::new())
        .await
        .unwrap();

    assert_eq!(outcome.code.as_str(), "33211");
    assert_eq!(
        outcome.tier,
        Tier::StaticFallback(StaticLocationKey::TavitonStreet)
    );
    assert_eq!(
        session.active_tokens().provenance(),
        Provenance::StaticPrimed(StaticLocationKey::TavitonStreet)
    );
}

#[tokio::test]
async fn search_then_hire_by_station_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Clients/TfL/GenerateLCHSDynamicSearch"))
        .and(body_string_contains("lchs_search_text=soho"))
        .and(body_string_contains("postback=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/Workflows/HandleEventWithNode"))
        .and(body_string_contains("TerminalName%253D300077"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Children": [{"ID": "hire_unlockbar", "Name": "Release code 12123"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session(&server);
    let stations = session
        .search_stations(
            "soho",
            SearchOptions::new().with_prime_from(StaticLocationKey::CromerStreet),
        )
        .await
        .unwrap();

    assert_eq!(stations.len(), 1);
    assert_eq!(stations[0].dock_location(), Some("51.5156,-0.1321"));

    let id = StationId::parse("200017").unwrap();
    let outcome = session
        .hire_by_station_id(&id, HireOptions::new())
        .await
        .unwrap();

    assert_eq!(outcome.code.as_str(), "12123");
    assert_eq!(outcome.tier, Tier::FullReuse);
}

#[tokio::test]
async fn upstream_error_without_fallback_source() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session(&server);
    let err = session
        .search_stations("soho", SearchOptions::new())
        .await
        .unwrap_err();

    match err {
        CycleHireError::Transport(e) => assert_eq!(e.status(), Some(503)),
        other => panic!("unexpected error: {other}"),
    }
}
