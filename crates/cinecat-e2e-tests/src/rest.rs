use anyhow::Result;
use cinecat_dal::{genre::Genre, movie::MovieShort, person::Person};
use reqwest::Url;
use serde_json::json;
use tracing::info;

use crate::extend_url;

pub async fn create_movie(
    client: &reqwest::Client,
    base_url: &Url,
    title: &str,
    release_year: Option<i64>,
    rating: Option<f64>,
) -> Result<MovieShort> {
    let payload = json!({"title": title, "release_year": release_year, "rating": rating});
    let api_url = base_url.join("movies")?;

    let response = client.post(api_url).json(&payload).send().await?;
    assert_eq!(201, response.status().as_u16());

    let new_movie: MovieShort = response.json().await?;
    Ok(new_movie)
}

pub async fn create_genre(client: &reqwest::Client, base_url: &Url, name: &str) -> Result<Genre> {
    let payload = json!({"genre_name": name});
    let api_url = base_url.join("genres")?;

    let response = client.post(api_url).json(&payload).send().await?;
    assert_eq!(201, response.status().as_u16());

    let new_genre: Genre = response.json().await?;
    Ok(new_genre)
}

pub async fn create_person(
    client: &reqwest::Client,
    base_url: &Url,
    first_name: &str,
    last_name: &str,
) -> Result<Person> {
    let payload = json!({"first_name": first_name, "last_name": last_name});
    let api_url = base_url.join("people")?;

    let response = client.post(api_url).json(&payload).send().await?;
    info!("Person response: {:#?}", response);
    assert_eq!(201, response.status().as_u16());

    let new_person: Person = response.json().await?;
    Ok(new_person)
}

/// Returns status of the association request
pub async fn add_genre(
    client: &reqwest::Client,
    base_url: &Url,
    movie_id: i64,
    genre_id: i64,
) -> Result<u16> {
    let api_url = extend_url(&base_url.join("movies")?, format!("{movie_id}/genres"));
    let response = client
        .post(api_url)
        .json(&json!({"genre_id": genre_id}))
        .send()
        .await?;
    Ok(response.status().as_u16())
}

pub async fn add_person(
    client: &reqwest::Client,
    base_url: &Url,
    movie_id: i64,
    person_id: i64,
    role_id: i64,
) -> Result<u16> {
    let api_url = extend_url(&base_url.join("movies")?, format!("{movie_id}/people"));
    let response = client
        .post(api_url)
        .json(&json!({"person_id": person_id, "role_id": role_id}))
        .send()
        .await?;
    Ok(response.status().as_u16())
}
