//! ArmMonitorClient against an in-process fake management endpoint.
//!
//! The fake serves the autoscale-settings collection with two-page
//! listings, accepts PUTs, enforces a bearer token, and hosts a token
//! endpoint for the client-credentials flow.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde_json::{Value, json};

use scaleq_core::AzureConfig;
use scaleq_monitor::*;

const TOKEN: &str = "test-token";

#[derive(Clone, Default)]
struct Fake {
    base: Arc<Mutex<String>>,
    settings: Arc<Mutex<Vec<Value>>>,
    token_requests: Arc<AtomicUsize>,
    put_bodies: Arc<Mutex<Vec<Value>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TOKEN}"))
        .unwrap_or(false)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"code": "InvalidAuthenticationToken", "message": "bad token"}})),
    )
}

async fn list(
    State(fake): State<Fake>,
    Path((sub, rg)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    if query.get("api-version").map(String::as_str) != Some("2015-04-01") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": "MissingApiVersionParameter", "message": "api-version"}})),
        );
    }
    if rg == "missing-rg" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"code": "ResourceGroupNotFound", "message": "Resource group 'missing-rg' could not be found."}})),
        );
    }

    let settings = fake.settings.lock().unwrap().clone();
    let (page, next) = if query.contains_key("$skiptoken") {
        (settings.iter().skip(1).cloned().collect::<Vec<_>>(), None)
    } else if settings.len() > 1 {
        let base = fake.base.lock().unwrap().clone();
        let next = format!(
            "{base}/subscriptions/{sub}/resourceGroups/{rg}/providers/microsoft.insights/autoscalesettings?api-version=2015-04-01&$skiptoken=page2"
        );
        (vec![settings[0].clone()], Some(next))
    } else {
        (settings, None)
    };

    let mut body = json!({ "value": page });
    if let Some(next) = next {
        body["nextLink"] = json!(next);
    }
    (StatusCode::OK, Json(body))
}

async fn put(
    State(fake): State<Fake>,
    Path((sub, rg, name)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let profiles = body["properties"]["profiles"].as_array().cloned().unwrap_or_default();
    if profiles.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": "InvalidRequest", "message": "at least one profile is required"}})),
        );
    }

    fake.put_bodies.lock().unwrap().push(body.clone());
    let mut resource = body.clone();
    resource["id"] = json!(format!(
        "/subscriptions/{sub}/resourceGroups/{rg}/providers/microsoft.insights/autoscalesettings/{name}"
    ));
    resource["name"] = json!(name);
    resource["type"] = json!("Microsoft.Insights/autoscaleSettings");
    fake.settings.lock().unwrap().push(resource.clone());
    (StatusCode::CREATED, Json(resource))
}

async fn token(
    State(fake): State<Fake>,
    Path(tenant): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    fake.token_requests.fetch_add(1, Ordering::SeqCst);
    let ok = tenant == "tenant-1"
        && form.get("grant_type").map(String::as_str) == Some("client_credentials")
        && form.get("client_secret").map(String::as_str) == Some("s3cret");
    if !ok {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid_client"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"token_type": "Bearer", "expires_in": 3599, "access_token": TOKEN})),
    )
}

async fn start() -> (Fake, String) {
    let fake = Fake::default();
    let router = Router::new()
        .route(
            "/subscriptions/{sub}/resourceGroups/{rg}/providers/microsoft.insights/autoscalesettings",
            get(list),
        )
        .route(
            "/subscriptions/{sub}/resourceGroups/{rg}/providers/microsoft.insights/autoscalesettings/{name}",
            axum::routing::put(put),
        )
        .route("/{tenant}/oauth2/v2.0/token", post(token))
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    *fake.base.lock().unwrap() = base.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (fake, base)
}

fn config(base: &str) -> AzureConfig {
    let mut config = AzureConfig::new("sub-1", "fuzz-rg", "eastus");
    config.management_endpoint = base.to_string();
    config
}

fn setting(name: &str, target: &str) -> Value {
    json!({
        "id": format!("/subscriptions/sub-1/resourceGroups/fuzz-rg/providers/microsoft.insights/autoscalesettings/{name}"),
        "name": name,
        "location": "eastus",
        "properties": {
            "profiles": [],
            "enabled": true,
            "targetResourceUri": target,
            "notifications": []
        }
    })
}

fn params(target: &str) -> AutoscaleSettingParams {
    AutoscaleSettingParams {
        location: "eastus".to_string(),
        profiles: vec![AutoscaleProfile {
            name: "profile-1".to_string(),
            capacity: ScaleCapacity { minimum: 0, maximum: 5, default: 5 },
            rules: vec![ScaleRule {
                metric_trigger: MetricTrigger {
                    metric_name: "ApproximateMessageCount".to_string(),
                    metric_resource_uri: "/queues/pool".to_string(),
                    time_grain: Duration::from_secs(60),
                    statistic: MetricStatisticType::Count,
                    time_window: Duration::from_secs(600),
                    time_aggregation: TimeAggregationType::Average,
                    operator: ComparisonOperationType::GreaterThan,
                    threshold: 1.0,
                },
                scale_action: ScaleAction {
                    direction: ScaleDirection::Increase,
                    scale_type: ScaleType::ChangeCount,
                    value: 1,
                    cooldown: Duration::from_secs(300),
                },
            }],
        }],
        target_resource_uri: target.to_string(),
        enabled: true,
    }
}

#[tokio::test]
async fn list_follows_next_link() {
    let (fake, base) = start().await;
    fake.settings.lock().unwrap().push(setting("a", "/vmss/one"));
    fake.settings.lock().unwrap().push(setting("b", "/vmss/two"));

    let client = ArmMonitorClient::new(&config(&base), Arc::new(StaticToken::new(TOKEN)));
    let listed = client.list_by_resource_group("fuzz-rg").await.unwrap();

    let names: Vec<_> = listed.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(listed[1].target_resource_uri(), Some("/vmss/two"));
}

#[tokio::test]
async fn list_empty_group() {
    let (_fake, base) = start().await;
    let client = ArmMonitorClient::new(&config(&base), Arc::new(StaticToken::new(TOKEN)));
    assert!(client.list_by_resource_group("fuzz-rg").await.unwrap().is_empty());
}

#[tokio::test]
async fn list_missing_group_is_not_found() {
    let (_fake, base) = start().await;
    let client = ArmMonitorClient::new(&config(&base), Arc::new(StaticToken::new(TOKEN)));
    let err = client.list_by_resource_group("missing-rg").await.unwrap_err();
    assert!(matches!(err, MonitorError::NotFound(_)), "{err:?}");
}

#[tokio::test]
async fn bad_token_is_auth_failure() {
    let (_fake, base) = start().await;
    let client = ArmMonitorClient::new(&config(&base), Arc::new(StaticToken::new("wrong")));
    let err = client.list_by_resource_group("fuzz-rg").await.unwrap_err();
    assert!(err.is_auth_failure(), "{err:?}");
}

#[tokio::test]
async fn put_sends_arm_body() {
    let (fake, base) = start().await;
    let client = ArmMonitorClient::new(&config(&base), Arc::new(StaticToken::new(TOKEN)));

    let created = client
        .create_or_update("fuzz-rg", "setting-1", &params("/vmss/three"))
        .await
        .unwrap();
    assert_eq!(created.name, "setting-1");
    assert!(created.id.ends_with("/autoscalesettings/setting-1"));
    assert_eq!(created.target_resource_uri(), Some("/vmss/three"));

    let bodies = fake.put_bodies.lock().unwrap().clone();
    let body = &bodies[0];
    assert_eq!(body["location"], "eastus");
    assert_eq!(body["properties"]["enabled"], true);
    let profile = &body["properties"]["profiles"][0];
    assert_eq!(profile["capacity"]["maximum"], "5");
    let rule = &profile["rules"][0];
    assert_eq!(rule["metricTrigger"]["timeGrain"], "PT1M");
    assert_eq!(rule["metricTrigger"]["timeWindow"], "PT10M");
    assert_eq!(rule["metricTrigger"]["operator"], "GreaterThan");
    assert_eq!(rule["scaleAction"]["type"], "ChangeCount");
    assert_eq!(rule["scaleAction"]["value"], "1");
    assert_eq!(rule["scaleAction"]["cooldown"], "PT5M");
}

#[tokio::test]
async fn put_rejection_is_cloud_error() {
    let (_fake, base) = start().await;
    let client = ArmMonitorClient::new(&config(&base), Arc::new(StaticToken::new(TOKEN)));

    let mut p = params("/vmss/four");
    p.profiles.clear();
    let err = client.create_or_update("fuzz-rg", "setting-2", &p).await.unwrap_err();
    match err {
        MonitorError::Cloud { status, code, .. } => {
            assert_eq!(status, 400);
            assert_eq!(code, "InvalidRequest");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn client_secret_credential_caches_token() {
    let (fake, base) = start().await;
    let cred = ClientSecretCredential::new("tenant-1", "client-1", "s3cret", &base)
        .with_authority(&base);
    let client = ArmMonitorClient::new(&config(&base), Arc::new(cred));

    client.list_by_resource_group("fuzz-rg").await.unwrap();
    client.list_by_resource_group("fuzz-rg").await.unwrap();
    assert_eq!(fake.token_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_client_secret_is_auth_failure() {
    let (_fake, base) = start().await;
    let cred = ClientSecretCredential::new("tenant-1", "client-1", "wrong", &base)
        .with_authority(&base);
    let client = ArmMonitorClient::new(&config(&base), Arc::new(cred));

    let err = client.list_by_resource_group("fuzz-rg").await.unwrap_err();
    assert!(err.is_auth_failure(), "{err:?}");
}
