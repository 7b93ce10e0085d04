use cinecat_dal::genre::Genre;
use cinecat_e2e_tests::{extend_url, launch_env, rest::create_genre};
use serde_json::{Value, json};
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_genres() {
    let (client, base_url, _config_guard) = launch_env("test_genres").await.unwrap();
    let api_url = base_url.join("genres").unwrap();

    for name in ["Western", "Drama", "Noir"] {
        create_genre(&client, &base_url, name).await.unwrap();
    }

    let response = client
        .post(api_url.clone())
        .json(&json!({"genre_name": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());

    let genres: Vec<Genre> = client
        .get(api_url.clone())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<_> = genres.iter().map(|g| g.genre_name.as_str()).collect();
    assert_eq!(vec!["Drama", "Noir", "Western"], names);

    let noir = &genres[1];
    let genre_url = extend_url(&api_url, noir.genre_id);
    let response = client
        .put(genre_url.clone())
        .json(&json!({"genre_name": "Film Noir"}))
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());
    let updated: Genre = response.json().await.unwrap();
    assert_eq!("Film Noir", updated.genre_name);

    let fetched: Genre = client
        .get(genre_url.clone())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated, fetched);

    let response = client.delete(genre_url.clone()).send().await.unwrap();
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!("Genre deleted successfully", body["message"]);

    let response = client.get(genre_url.clone()).send().await.unwrap();
    assert_eq!(404, response.status().as_u16());
    let response = client
        .get(extend_url(&genre_url, "movies"))
        .send()
        .await
        .unwrap();
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
#[traced_test]
async fn test_roles() {
    let (client, base_url, _config_guard) = launch_env("test_roles").await.unwrap();

    let roles: Value = client
        .get(base_url.join("roles").unwrap())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<_> = roles
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["role_name"].as_str().unwrap())
        .collect();
    assert_eq!(vec!["Actor", "Director", "Writer", "Producer"], names);
}
