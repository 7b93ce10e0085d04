use cinecat_e2e_tests::launch_env;
use serde_json::Value;
use tracing::info;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_health() {
    let (client, base_url, _config_guard) = launch_env("test_health").await.unwrap();

    let url = base_url.join("health").unwrap();
    let response = client.get(url).send().await.unwrap();
    info! {"Response: {:#?}", response};
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!("ok", body["status"]);
}

#[tokio::test]
#[traced_test]
async fn test_unknown_route() {
    let (client, base_url, _config_guard) = launch_env("test_unknown_route").await.unwrap();

    let url = base_url.join("no/such/thing").unwrap();
    let response = client.get(url).send().await.unwrap();
    assert_eq!(404, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!("Not found", body["error"]);
}

#[tokio::test]
#[traced_test]
async fn test_rejections_are_json() {
    let (client, base_url, _config_guard) = launch_env("test_rejections").await.unwrap();

    let response = client
        .patch(base_url.join("movies/1").unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(405, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!("Method not allowed", body["error"]);

    let response = client
        .get(base_url.join("movies/abc").unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let response = client
        .post(base_url.join("health").unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(405, response.status().as_u16());
}
