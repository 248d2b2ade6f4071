//! HTTP backend integration tests against a local mock server

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use govlens_client::backend::ListProposalsRequest;
use govlens_client::{
    ClientError, GovernanceBackend, GovernanceClient, HttpConfig, HttpGovernanceBackend,
    HttpUserBackend, RemoteResult, UserBackend, UserClient, UserError,
};
use govlens_core::{ProposalStatus, UserArgs};

fn proposal_json(id: u64, topic: i32) -> serde_json::Value {
    json!({
        "id": id,
        "proposal": {"title": format!("Proposal {id}"), "summary": "", "url": ""},
        "topic": topic,
        "status": 1,
        "proposer": null,
        "proposal_timestamp_seconds": 1_700_000_000u64 + id,
        "deadline_timestamp_seconds": null,
        "latest_tally": {"yes": 1, "no": 0, "total": 1}
    })
}

fn governance(server: &MockServer) -> HttpGovernanceBackend {
    HttpGovernanceBackend::new(HttpConfig::new(server.uri())).unwrap()
}

fn users(server: &MockServer, token: Option<&str>) -> HttpUserBackend {
    HttpUserBackend::new(HttpConfig::new(server.uri()), token.map(String::from)).unwrap()
}

#[tokio::test]
async fn test_list_proposals_sends_open_filter_and_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/list_proposals"))
        .and(body_json(json!({
            "include_status": [1],
            "limit": 2,
            "before_proposal": 500,
            "exclude_topic": []
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "proposals": [proposal_json(499, 7), proposal_json(498, 4)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = governance(&server)
        .list_proposals(ListProposalsRequest::open(2).with_before(Some(500)))
        .await
        .unwrap();
    let summaries = response.into_summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, 499);
    assert_eq!(summaries[0].status, ProposalStatus::Open);
}

#[tokio::test]
async fn test_get_proposal_not_found_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/proposals/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/proposals/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(proposal_json(7, 9)))
        .mount(&server)
        .await;

    let backend = governance(&server);
    assert!(backend.get_proposal(42).await.unwrap().is_none());
    let info = backend.get_proposal(7).await.unwrap().unwrap();
    assert_eq!(info.id, Some(7));
    assert_eq!(info.topic, 9);
}

#[tokio::test]
async fn test_server_error_is_swallowed_by_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/list_proposals"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let backend = governance(&server);
    let err = backend
        .list_proposals(ListProposalsRequest::open(10))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 503, ref message } if message == "overloaded"));

    let client = GovernanceClient::new(Arc::new(backend));
    let page = client.list_open_proposals(None, None).await;
    assert!(page.is_empty());
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_topic_fetch_filters_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/list_proposals"))
        .and(body_partial_json(json!({"limit": 100})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "proposals": [proposal_json(3, 7), proposal_json(2, 9), proposal_json(1, 7)]
        })))
        .mount(&server)
        .await;

    let client = GovernanceClient::new(Arc::new(governance(&server)));
    let found = client.list_proposals_by_topic("subnet-management").await;
    let ids: Vec<_> = found.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 1]);
}

#[tokio::test]
async fn test_user_calls_carry_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "principal_id": "aaaaa-aa",
            "username": "alice",
            "logo_url": null,
            "neuron_id": 12
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = users(&server, Some("secret"))
        .get_current_user()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.principal_id, "aaaaa-aa");
    assert_eq!(profile.neuron_id, Some(12));
}

#[tokio::test]
async fn test_missing_profile_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/nobody"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let backend = users(&server, None);
    assert!(backend.get_current_user().await.unwrap().is_none());
    assert!(backend.get_user("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_rejection_surfaces_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({"username": "alice", "logo_url": null, "neuron_id": null})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"Err": "User already exists"})),
        )
        .mount(&server)
        .await;

    let backend = users(&server, Some("t"));
    let args = UserArgs {
        username: Some("alice".into()),
        ..Default::default()
    };
    assert_eq!(
        backend.create_user(args.clone()).await.unwrap(),
        RemoteResult::Err("User already exists".to_string())
    );

    let client = UserClient::new(Arc::new(backend));
    let err = client.create_user(args).await.unwrap_err();
    assert!(matches!(err, UserError::Rejected(_)));
    assert_eq!(err.to_string(), "User already exists");
}

#[tokio::test]
async fn test_follow_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/me/follows/kyc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Ok": null})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/me/follows/kyc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Ok": null})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me/follows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["kyc", "governance"])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/me/neuron"))
        .and(body_json(json!({"neuron_id": 77})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Ok": null})))
        .expect(1)
        .mount(&server)
        .await;

    let client = UserClient::new(Arc::new(users(&server, Some("t"))));
    client.follow_topic("kyc").await.unwrap();
    client.unfollow_topic("kyc").await.unwrap();
    client.add_neuron_id(77).await.unwrap();

    let followed = client.get_followed_topics().await.unwrap();
    assert_eq!(
        followed.into_iter().collect::<Vec<_>>(),
        vec!["governance".to_string(), "kyc".to_string()]
    );
}

#[tokio::test]
async fn test_user_count_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(3)))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let backend = users(&server, Some("t"));
    assert_eq!(backend.user_count().await.unwrap(), 3);
    backend.delete_user().await.unwrap();
}

#[tokio::test]
async fn test_list_users_sends_page_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "principal_id": "ccccc-cc",
            "username": null,
            "logo_url": null,
            "neuron_id": null
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let profiles = users(&server, None).list_users(1, 2).await.unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].principal_id, "ccccc-cc");
}
