//! Schema discovery against an in-memory provider.

mod helpers;

use std::ops::ControlFlow;

use serde_json::json;

use helpers::{client_over, database, folder, MockTransport};
use stat_xplore::schema::{ExplorerOptions, NodeKind};
use stat_xplore::transport::TransportResponse;

fn ids(datasets: &[stat_xplore::DatasetReference]) -> Vec<&str> {
    datasets.iter().map(|d| d.id.as_str()).collect()
}

#[tokio::test]
async fn lists_datasets_depth_first_in_provider_order() {
    let mock = MockTransport::new()
        .json(
            "/schema",
            folder(
                "str:folder:root",
                "Root",
                Some(vec![
                    folder("str:folder:fuc", "Universal Credit", None),
                    database("str:database:ESA", "ESA"),
                ]),
            ),
        )
        .json(
            "/schema/str:folder:fuc",
            folder(
                "str:folder:fuc",
                "Universal Credit",
                Some(vec![
                    database("str:database:UC_Monthly", "People on UC"),
                    folder(
                        "str:folder:fuc-hh",
                        "Households",
                        Some(vec![database("str:database:UC_Households", "Households on UC")]),
                    ),
                ]),
            ),
        );
    let (client, mock) = client_over(mock);

    let datasets = client.list_datasets().await.unwrap();

    assert_eq!(
        ids(&datasets),
        vec![
            "str:database:UC_Monthly",
            "str:database:UC_Households",
            "str:database:ESA"
        ]
    );
    assert_eq!(datasets[0].label, "People on UC");
    // Populated folders are never re-fetched.
    assert_eq!(mock.gets(), vec!["/schema", "/schema/str:folder:fuc"]);
}

#[tokio::test]
async fn dataset_reachable_twice_is_listed_once() {
    let shared = database("str:database:PIP_Monthly", "PIP");
    let mock = MockTransport::new().json(
        "/schema",
        folder(
            "str:folder:root",
            "Root",
            Some(vec![
                folder("str:folder:a", "A", Some(vec![shared.clone()])),
                folder("str:folder:b", "B", Some(vec![shared])),
            ]),
        ),
    );
    let (client, _) = client_over(mock);

    let datasets = client.list_datasets().await.unwrap();
    assert_eq!(ids(&datasets), vec!["str:database:PIP_Monthly"]);
}

#[tokio::test]
async fn same_unloaded_folder_is_expanded_once() {
    let mock = MockTransport::new()
        .json(
            "/schema",
            folder(
                "str:folder:root",
                "Root",
                Some(vec![
                    folder("str:folder:shared", "Shared", None),
                    folder("str:folder:shared", "Shared", None),
                ]),
            ),
        )
        .json(
            "/schema/str:folder:shared",
            folder(
                "str:folder:shared",
                "Shared",
                Some(vec![database("str:database:JSA", "JSA")]),
            ),
        );
    let (client, mock) = client_over(mock);

    let datasets = client.list_datasets().await.unwrap();
    assert_eq!(ids(&datasets), vec!["str:database:JSA"]);
    assert_eq!(mock.get_count("/schema/str:folder:shared"), 1);
}

#[tokio::test]
async fn failing_folder_does_not_hide_siblings() {
    let mock = MockTransport::new()
        .json(
            "/schema",
            folder(
                "str:folder:root",
                "Root",
                Some(vec![
                    folder("str:folder:broken", "Broken", None),
                    folder("str:folder:gone", "Gone", None),
                    folder("str:folder:ok", "Fine", None),
                ]),
            ),
        )
        .fail("/schema/str:folder:broken", "connection reset")
        .respond(
            "/schema/str:folder:gone",
            TransportResponse::new(500, "internal error"),
        )
        .json(
            "/schema/str:folder:ok",
            folder(
                "str:folder:ok",
                "Fine",
                Some(vec![database("str:database:CA", "Carers Allowance")]),
            ),
        );
    let (client, _) = client_over(mock);

    let mut found = Vec::new();
    let stats = client
        .explorer()
        .visit_datasets(|d| {
            found.push(d.id.clone());
            ControlFlow::Continue(())
        })
        .await
        .unwrap();

    assert_eq!(found, vec!["str:database:CA"]);
    assert_eq!(stats.folders_failed, 2);
    assert_eq!(stats.folders_expanded, 1);
    assert_eq!(stats.datasets, 1);
}

#[tokio::test]
async fn root_failure_is_an_error() {
    let (client, _) = client_over(MockTransport::new().fail("/schema", "dns failure"));
    let err = client.list_datasets().await.unwrap_err();
    assert_eq!(err.kind(), "transport");

    let (client, _) = client_over(
        MockTransport::new().respond("/schema", TransportResponse::new(401, "bad key")),
    );
    let err = client.list_datasets().await.unwrap_err();
    assert_eq!(err.kind(), "upstream_status");
    assert_eq!(err.upstream(), Some((401, "bad key")));
}

#[tokio::test]
async fn malformed_root_is_a_schema_parse_error() {
    let (client, _) = client_over(
        MockTransport::new().respond("/schema", TransportResponse::new(200, "[1, 2, 3]")),
    );
    let err = client.get_schema(None).await.unwrap_err();
    assert_eq!(err.kind(), "schema_parse");
}

#[tokio::test]
async fn depth_limit_stops_descent() {
    let mock = MockTransport::new().json(
        "/schema",
        folder(
            "str:folder:root",
            "Root",
            Some(vec![
                database("str:database:UC_Monthly", "People on UC"),
                folder("str:folder:deep", "Deep", None),
            ]),
        ),
    );
    let (client, mock) = client_over(mock);
    let client = client.with_explorer_options(ExplorerOptions { max_depth: 1 });

    let mut found = Vec::new();
    let stats = client
        .explorer()
        .visit_datasets(|d| {
            found.push(d.id.clone());
            ControlFlow::Continue(())
        })
        .await
        .unwrap();

    assert_eq!(found, vec!["str:database:UC_Monthly"]);
    assert_eq!(stats.depth_limited, 1);
    assert_eq!(mock.get_count("/schema/str:folder:deep"), 0);
}

#[tokio::test]
async fn visitor_can_stop_early() {
    let mock = MockTransport::new().json(
        "/schema",
        folder(
            "str:folder:root",
            "Root",
            Some(vec![
                database("str:database:A", "A"),
                folder("str:folder:later", "Later", None),
                database("str:database:B", "B"),
            ]),
        ),
    );
    let (client, mock) = client_over(mock);

    let mut found = Vec::new();
    let stats = client
        .explorer()
        .visit_datasets(|d| {
            found.push(d.id.clone());
            ControlFlow::Break(())
        })
        .await
        .unwrap();

    assert_eq!(found, vec!["str:database:A"]);
    assert!(stats.stopped_early);
    assert_eq!(mock.gets(), vec!["/schema"]);
}

#[tokio::test]
async fn fetched_empty_folder_is_not_refetched() {
    let mock = MockTransport::new().json(
        "/schema",
        folder(
            "str:folder:root",
            "Root",
            Some(vec![folder("str:folder:empty", "Empty", Some(vec![]))]),
        ),
    );
    let (client, mock) = client_over(mock);

    let datasets = client.list_datasets().await.unwrap();
    assert!(datasets.is_empty());
    assert_eq!(mock.gets(), vec!["/schema"]);
}

#[tokio::test]
async fn only_folders_are_descended() {
    let mut view = json!({
        "id": "str:view:uc",
        "label": "View",
        "location": "https://stat-xplore.test/schema/str:view:uc",
        "type": "VIEW",
    });
    view["children"] = json!([database("str:database:Hidden", "Hidden")]);
    let mut untyped = json!({
        "id": "str:thing:x",
        "label": "Untyped",
        "location": "https://stat-xplore.test/schema/str:thing:x",
    });
    untyped["children"] = json!([database("str:database:AlsoHidden", "Also hidden")]);

    let mock = MockTransport::new().json(
        "/schema",
        folder("str:folder:root", "Root", Some(vec![view, untyped])),
    );
    let (client, _) = client_over(mock);

    let datasets = client.list_datasets().await.unwrap();
    assert!(datasets.is_empty());
}

#[tokio::test]
async fn dataset_detail_accepts_bare_and_prefixed_ids() {
    let detail = json!({
        "id": "str:database:UC_Monthly",
        "label": "People on Universal Credit",
        "location": "https://stat-xplore.test/schema/str:database:UC_Monthly",
        "type": "DATABASE",
        "children": [
            {"id": "str:count:UC_Monthly:V_F_UC_CASELOAD_FULL", "label": "People on UC",
             "location": "x", "type": "COUNT"}
        ]
    });
    let (client, mock) = client_over(
        MockTransport::new().json("/schema/str:database:UC_Monthly", detail),
    );

    let bare = client.get_dataset_detail("UC_Monthly").await.unwrap();
    let prefixed = client
        .get_dataset_detail("str:database:UC_Monthly")
        .await
        .unwrap();

    assert_eq!(bare, prefixed);
    assert_eq!(bare.kind, Some(NodeKind::Database));
    assert_eq!(bare.children.as_slice().len(), 1);
    assert_eq!(
        mock.gets(),
        vec![
            "/schema/str:database:UC_Monthly",
            "/schema/str:database:UC_Monthly"
        ]
    );
}

#[tokio::test]
async fn unknown_dataset_is_an_upstream_error() {
    let (client, _) = client_over(MockTransport::new());
    let err = client.get_dataset_detail("NOPE").await.unwrap_err();
    assert_eq!(err.kind(), "upstream_status");
    assert_eq!(err.http_status(), 404);
}

#[tokio::test]
async fn reserved_characters_in_ids_stay_in_the_path() {
    let mock = MockTransport::new().json(
        "/schema/str:folder:a%3Fb%23c",
        folder("str:folder:a?b#c", "Odd", Some(vec![])),
    );
    let (client, mock) = client_over(mock);

    let node = client.get_schema(Some("str:folder:a?b#c")).await.unwrap();
    assert_eq!(node.id, "str:folder:a?b#c");
    assert_eq!(mock.gets(), vec!["/schema/str:folder:a%3Fb%23c"]);
}
