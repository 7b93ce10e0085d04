use cinecat_e2e_tests::{
    extend_url, launch_env,
    rest::{add_genre, add_person, create_genre, create_movie, create_person},
};
use serde_json::{Value, json};
use tracing::info;
use tracing_test::traced_test;

fn titles(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
#[traced_test]
async fn test_paging_and_sorting() {
    let (client, base_url, _config_guard) = launch_env("test_movie_paging").await.unwrap();

    for i in 1..=25 {
        let rating = if i % 5 == 0 { None } else { Some(i as f64 / 3.0) };
        create_movie(&client, &base_url, &format!("Movie {i:02}"), Some(1990 + i), rating)
            .await
            .unwrap();
    }

    let api_url = base_url.join("movies").unwrap();
    let response = client.get(api_url.clone()).send().await.unwrap();
    assert!(response.status().is_success());
    let page: Value = response.json().await.unwrap();
    assert_eq!(25, page["total"]);
    assert_eq!(1, page["page"]);
    assert_eq!(10, page["per_page"]);
    assert_eq!(10, page["items"].as_array().unwrap().len());
    assert_eq!("Movie 01", page["items"][0]["title"]);

    let mut url = api_url.clone();
    url.set_query(Some("page=3&per_page=10"));
    let page: Value = client.get(url).send().await.unwrap().json().await.unwrap();
    assert_eq!(5, page["items"].as_array().unwrap().len());

    let mut url = api_url.clone();
    url.set_query(Some("page=9"));
    let page: Value = client.get(url).send().await.unwrap().json().await.unwrap();
    assert_eq!(25, page["total"]);
    assert!(page["items"].as_array().unwrap().is_empty());

    let mut url = api_url.clone();
    url.set_query(Some("sort=rating&per_page=100"));
    let page: Value = client.get(url).send().await.unwrap().json().await.unwrap();
    let items = page["items"].as_array().unwrap();
    assert_eq!("Movie 24", items[0]["title"]);
    assert_eq!(8.0, items[0]["rating"].as_f64().unwrap());
    assert!(items[24]["rating"].is_null());
    assert!(items[19]["rating"].is_number());

    let mut url = api_url.clone();
    url.set_query(Some("sort=release_year&per_page=1"));
    let page: Value = client.get(url).send().await.unwrap().json().await.unwrap();
    assert_eq!("Movie 25", page["items"][0]["title"]);

    let mut url = api_url.clone();
    url.set_query(Some("search=movie 1"));
    let page: Value = client.get(url).send().await.unwrap().json().await.unwrap();
    assert_eq!(10, page["total"]);

    let mut url = api_url.clone();
    url.set_query(Some("per_page=0"));
    let response = client.get(url).send().await.unwrap();
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
#[traced_test]
async fn test_movie_crud() {
    let (client, base_url, _config_guard) = launch_env("test_movie_crud").await.unwrap();
    let api_url = base_url.join("movies").unwrap();

    let response = client
        .post(api_url.clone())
        .json(&json!({"release_year": 2000}))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
    let page: Value = client
        .get(api_url.clone())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(0, page["total"]);

    let movie = create_movie(&client, &base_url, "Memento", Some(2000), Some(8.44))
        .await
        .unwrap();
    assert_eq!(Some(8.4), movie.rating);

    let movie_url = extend_url(&api_url, movie.movie_id);
    let response = client
        .put(movie_url.clone())
        .json(&json!({"title": "Memento (2000)", "duration": 113}))
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());
    let updated: Value = response.json().await.unwrap();
    assert_eq!("Memento (2000)", updated["title"]);
    assert_eq!(113, updated["duration"]);
    assert_eq!(2000, updated["release_year"]);

    let response = client
        .put(movie_url.clone())
        .json(&json!({"title": null}))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());

    let response = client
        .put(extend_url(&api_url, 9999))
        .json(&json!({"title": "Nothing"}))
        .send()
        .await
        .unwrap();
    assert_eq!(404, response.status().as_u16());

    let response = client.delete(movie_url.clone()).send().await.unwrap();
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!("Movie deleted successfully", body["message"]);

    let response = client.get(movie_url.clone()).send().await.unwrap();
    assert_eq!(404, response.status().as_u16());
    let response = client.delete(movie_url).send().await.unwrap();
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
#[traced_test]
async fn test_relations() {
    let (client, base_url, _config_guard) = launch_env("test_movie_relations").await.unwrap();

    let movie = create_movie(&client, &base_url, "Heat", Some(1995), Some(8.3))
        .await
        .unwrap();
    let crime = create_genre(&client, &base_url, "Crime").await.unwrap();
    let thriller = create_genre(&client, &base_url, "Thriller").await.unwrap();
    let mann = create_person(&client, &base_url, "Michael", "Mann").await.unwrap();
    let pacino = create_person(&client, &base_url, "Al", "Pacino").await.unwrap();

    assert_eq!(201, add_genre(&client, &base_url, movie.movie_id, crime.genre_id).await.unwrap());
    assert_eq!(
        201,
        add_genre(&client, &base_url, movie.movie_id, thriller.genre_id)
            .await
            .unwrap()
    );
    assert_eq!(400, add_genre(&client, &base_url, movie.movie_id, crime.genre_id).await.unwrap());
    assert_eq!(
        201,
        add_person(&client, &base_url, movie.movie_id, mann.person_id, 2)
            .await
            .unwrap()
    );
    assert_eq!(
        201,
        add_person(&client, &base_url, movie.movie_id, mann.person_id, 3)
            .await
            .unwrap()
    );
    assert_eq!(
        201,
        add_person(&client, &base_url, movie.movie_id, pacino.person_id, 1)
            .await
            .unwrap()
    );
    assert_eq!(
        400,
        add_person(&client, &base_url, movie.movie_id, pacino.person_id, 1)
            .await
            .unwrap()
    );
    assert_eq!(
        400,
        add_person(&client, &base_url, movie.movie_id, pacino.person_id, 77)
            .await
            .unwrap()
    );

    let movie_url = extend_url(&base_url.join("movies").unwrap(), movie.movie_id);
    let detail: Value = client
        .get(movie_url.clone())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    info!("Movie detail: {detail:#?}");
    let mut genres: Vec<_> = detail["genres"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g.as_str().unwrap())
        .collect();
    genres.sort();
    assert_eq!(vec!["Crime", "Thriller"], genres);
    assert_eq!(3, detail["people"].as_array().unwrap().len());

    let response = client
        .delete(extend_url(
            &movie_url,
            format!("people/{}/roles/3", mann.person_id),
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!("Person removed from movie successfully", body["message"]);

    let response = client
        .delete(extend_url(&movie_url, format!("genres/{}", thriller.genre_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());

    let person_url = extend_url(&base_url.join("people").unwrap(), mann.person_id);
    let person: Value = client
        .get(person_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!("Michael Mann", person["name"]);
    assert_eq!(1, person["movies"].as_array().unwrap().len());
    assert_eq!("Director", person["movies"][0]["role"]);

    // deleting movie removes its associations
    let response = client.delete(movie_url).send().await.unwrap();
    assert_eq!(200, response.status().as_u16());
    let genre_movies_url = extend_url(
        &base_url.join("genres").unwrap(),
        format!("{}/movies", crime.genre_id),
    );
    let genre_movies: Value = client
        .get(genre_movies_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!("Crime", genre_movies["genre"]);
    assert!(genre_movies["movies"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_catalog_views() {
    let (client, base_url, _config_guard) = launch_env("test_movie_views").await.unwrap();

    create_movie(&client, &base_url, "Fight Club", Some(1999), Some(8.8))
        .await
        .unwrap();
    create_movie(&client, &base_url, "The Matrix", Some(1999), Some(8.7))
        .await
        .unwrap();
    create_movie(&client, &base_url, "Alien", Some(1979), Some(8.5))
        .await
        .unwrap();
    create_movie(&client, &base_url, "Untitled", None, None)
        .await
        .unwrap();

    let api_url = base_url.join("movies").unwrap();

    let years: Vec<i64> = client
        .get(extend_url(&api_url, "years"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(vec![1999, 1979], years);

    let by_year: Value = client
        .get(extend_url(&api_url, "by-year/1999"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(vec!["Fight Club", "The Matrix"], titles(&by_year));

    let response = client
        .get(extend_url(&api_url, "by-year/2050"))
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());
    let empty: Value = response.json().await.unwrap();
    assert!(empty.as_array().unwrap().is_empty());

    let mut top_url = extend_url(&api_url, "top-rated");
    top_url.set_query(Some("limit=2"));
    let top: Value = client.get(top_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(vec!["Fight Club", "The Matrix"], titles(&top));
    assert!(top[0]["genres"].is_array());

    let stats: Value = client
        .get(extend_url(&api_url, "stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(4, stats["total_movies"]);
    assert_eq!(8.67, stats["average_rating"].as_f64().unwrap());
    assert_eq!(0, stats["total_genres"]);
    assert_eq!(0, stats["total_people"]);

    let mut search_url = base_url.join("search").unwrap();
    search_url.set_query(Some("q=the"));
    let found: Value = client
        .get(search_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(vec!["The Matrix"], titles(&found["movies"]));
    assert!(found["people"].as_array().unwrap().is_empty());
    assert!(found["genres"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_unicode_search() {
    let (client, base_url, _config_guard) = launch_env("test_movie_unicode").await.unwrap();

    for title in ["Amélie", "Ёлки", "Heat"] {
        create_movie(&client, &base_url, title, None, None)
            .await
            .unwrap();
    }

    let mut url = base_url.join("movies").unwrap();
    url.set_query(Some("search=AMÉLIE"));
    let page: Value = client.get(url).send().await.unwrap().json().await.unwrap();
    assert_eq!(1, page["total"]);
    assert_eq!("Amélie", page["items"][0]["title"]);

    let mut search_url = base_url.join("search").unwrap();
    search_url.set_query(Some("q=ёлки"));
    let found: Value = client
        .get(search_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(vec!["Ёлки"], titles(&found["movies"]));
}
