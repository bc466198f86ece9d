#![cfg(feature = "test-utils")]

// Inspection queries against a disposable Neo4j.
//
// Requirements: Docker (for Neo4j via testcontainers)
//
// Run with: cargo test -p graphprobe-graph --features test-utils --test inspection_test

use graphprobe_common::{
    DataRow, DatabaseEntry, PersonRow, DATA_LABEL, DATA_NODE_LIMIT, PERSON_LABEL,
};
use graphprobe_graph::testutil::{neo4j_container, TEST_DATABASE, TEST_USER};
use graphprobe_graph::{query, GraphClient, InspectionStore};

async fn seed(client: &GraphClient, cypher: &str) {
    client
        .inner()
        .run(query(cypher))
        .await
        .expect("seed query failed");
}

async fn databases(client: &GraphClient) -> Vec<DatabaseEntry> {
    let mut rows = Vec::new();
    client
        .list_databases(&mut |db| {
            rows.push(db);
            Ok(())
        })
        .await
        .unwrap();
    rows
}

async fn people(client: &GraphClient) -> Vec<PersonRow> {
    let mut rows = Vec::new();
    let count = client
        .person_nodes(TEST_DATABASE, &mut |p| {
            rows.push(p);
            Ok(())
        })
        .await
        .unwrap();
    assert_eq!(count, rows.len());
    rows
}

async fn data(client: &GraphClient) -> Vec<DataRow> {
    let mut rows = Vec::new();
    client
        .data_nodes(TEST_DATABASE, DATA_NODE_LIMIT, &mut |r| {
            rows.push(r);
            Ok(())
        })
        .await
        .unwrap();
    rows
}

#[tokio::test]
async fn verify_connectivity_succeeds_with_valid_credentials() {
    let (_container, _uri, client) = neo4j_container().await;
    client.verify_connectivity().await.unwrap();
    client.close();
}

#[tokio::test]
async fn verify_connectivity_reports_bad_password() {
    let (_container, uri, client) = neo4j_container().await;
    client.close();

    let wrong = GraphClient::connect(&uri, TEST_USER, "not-the-password")
        .await
        .expect("handle construction does not contact the server");
    let err = wrong.verify_connectivity().await.unwrap_err();
    assert!(err.is_connectivity(), "unexpected error kind: {err:?}");
}

#[tokio::test]
async fn catalog_lists_system_and_default_database() {
    let (_container, _uri, client) = neo4j_container().await;

    let databases = databases(&client).await;
    let names: Vec<&str> = databases.iter().map(|d| d.name.as_str()).collect();
    assert!(names.contains(&"system"), "got {names:?}");
    assert!(names.contains(&TEST_DATABASE), "got {names:?}");
    assert!(databases.iter().all(|d| !d.current_status.is_empty()));
}

#[tokio::test]
async fn empty_database_has_no_labels() {
    let (_container, _uri, client) = neo4j_container().await;
    let labels = client.list_labels(TEST_DATABASE).await.unwrap();
    assert!(labels.is_empty(), "got {labels:?}");
}

#[tokio::test]
async fn person_nodes_come_back_sorted_by_name() {
    let (_container, _uri, client) = neo4j_container().await;
    seed(
        &client,
        "CREATE (:Person {name: 'Carol', birthday: date('1990-04-12'), info: 'ops',
                          age: 36, location: 'Oslo', occupation: 'sre'}),
                (:Person {name: 'Alice', birthday: '1985-01-30', info: 'eng'}),
                (:Person {name: 'Bob', info: 'sales'}),
                (:Other {name: 'Zed'})",
    )
    .await;

    let labels = client.list_labels(TEST_DATABASE).await.unwrap();
    assert!(labels.iter().any(|l| l == PERSON_LABEL));
    assert!(labels.iter().any(|l| l == "Other"));

    let people = people(&client).await;
    let names: Vec<_> = people.iter().map(|p| p.name.as_deref().unwrap()).collect();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);

    assert_eq!(people[0].birthday.as_deref(), Some("1985-01-30"));
    assert_eq!(people[1].birthday, None);
    assert_eq!(people[2].birthday.as_deref(), Some("1990-04-12"));
    assert_eq!(people[2].info.as_deref(), Some("ops"));
    assert_eq!(people[2].details().as_deref(), Some("age 36, Oslo, sre"));
    assert_eq!(people[0].details(), None);
}

#[tokio::test]
async fn data_nodes_are_capped() {
    let (_container, _uri, client) = neo4j_container().await;
    seed(
        &client,
        "UNWIND range(1, 40) AS i CREATE (:data {data: 'row-' + toString(i)})",
    )
    .await;

    let labels = client.list_labels(TEST_DATABASE).await.unwrap();
    assert_eq!(labels, vec![DATA_LABEL.to_string()]);

    let rows = data(&client).await;
    assert_eq!(rows.len(), DATA_NODE_LIMIT);
    assert!(rows
        .iter()
        .all(|r| r.data.as_deref().is_some_and(|d| d.starts_with("row-"))));
}

#[tokio::test]
async fn non_string_data_values_render_as_text() {
    let (_container, _uri, client) = neo4j_container().await;
    seed(
        &client,
        "CREATE (:data {data: 42}), (:data {data: ['a', 'b']}), (:data),
                (:data {data: 1.0}), (:data {data: [0.5, 1.0]})",
    )
    .await;

    let mut rendered: Vec<String> = data(&client)
        .await
        .into_iter()
        .map(|r| r.to_string())
        .collect();
    rendered.sort();
    assert_eq!(rendered, vec!["1.0", "42", "None", "[0.5, 1.0]", "[a, b]"]);
}
