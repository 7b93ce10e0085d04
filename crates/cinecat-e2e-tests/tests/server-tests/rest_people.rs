use cinecat_dal::person::Person;
use cinecat_e2e_tests::{extend_url, launch_env, rest::create_person};
use serde_json::{Value, json};
use tracing::info;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_people() {
    let (client, base_url, _config_guard) = launch_env("test_people").await.unwrap();
    let api_url = base_url.join("people").unwrap();

    let keanu = create_person(&client, &base_url, "Keanu", "Reeves").await.unwrap();
    create_person(&client, &base_url, "Ridley", "Scott").await.unwrap();
    create_person(&client, &base_url, "Sigourney", "Weaver").await.unwrap();
    assert_eq!("Keanu Reeves", keanu.name);
    assert!(keanu.dob.is_none());

    let response = client
        .post(api_url.clone())
        .json(&json!({"first_name": "Nobody"}))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());

    let all: Value = client
        .get(api_url.clone())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(3, all.as_array().unwrap().len());
    assert_eq!("Keanu Reeves", all[0]["name"]);

    // full name is searched, across first and last name
    let mut search_url = api_url.clone();
    search_url.set_query(Some("name=u reev"));
    let found: Value = client
        .get(search_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(1, found.as_array().unwrap().len());

    let person_url = extend_url(&api_url, keanu.person_id);
    let response = client
        .put(person_url.clone())
        .json(&json!({"dob": "1964-09-02"}))
        .send()
        .await
        .unwrap();
    info!("Update response: {response:#?}");
    assert_eq!(200, response.status().as_u16());
    let updated: Person = response.json().await.unwrap();
    assert_eq!("Reeves", updated.last_name);
    assert!(updated.dob.is_some());

    let detail: Value = client
        .get(person_url.clone())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!("1964-09-02", detail["dob"]);
    assert!(detail["movies"].as_array().unwrap().is_empty());

    let response = client
        .put(person_url.clone())
        .json(&json!({"dob": null}))
        .send()
        .await
        .unwrap();
    let updated: Person = response.json().await.unwrap();
    assert!(updated.dob.is_none());

    let response = client.delete(person_url.clone()).send().await.unwrap();
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!("Person deleted successfully", body["message"]);
    let response = client.get(person_url).send().await.unwrap();
    assert_eq!(404, response.status().as_u16());
}
