//! End-to-end pipeline behavior: stage ordering, cross-field deduplication,
//! independent field degradation, and placeholder completeness.

mod common;

use cms_richtext::RichTextDocument;
use common::{mock_image_detail, mock_page_detail, test_pipeline};
use mockito::Server;

#[tokio::test]
async fn resolves_all_stages_for_one_item() {
    let mut server = Server::new_async().await;
    mock_image_detail(&mut server, 42, "http://localhost:8000/media/pose.png").await;
    mock_page_detail(&mut server, 7, "conditions.ConditionPage", "type-1-diabetes").await;

    let pipeline = test_pipeline(&server);
    let body = RichTextDocument::new(
        "body",
        concat!(
            r#"<h2>Overview</h2>"#,
            r#"<img src="/media/hero.jpg">"#,
            r#"<embed embedtype="image" id="42" alt="Pose"/>"#,
            r#"<h2>Related</h2>"#,
            r#"<p><a linktype="page" id="7">type 1 diabetes</a></p>"#,
        ),
    );

    let item = pipeline.resolve_item("body", &[body]).await;
    let html = item.field("body").expect("body field present");

    assert!(html.contains(r#"src="/cms-media/hero.jpg""#));
    assert!(html.contains(r#"<img src="/cms-media/pose.png" alt="Pose" loading="lazy">"#));
    assert!(html.contains(r#"href="/conditions/type-1-diabetes""#));
    // No CMS-internal placeholder syntax survives.
    assert!(!html.contains("<embed"));
    assert!(!html.contains("linktype"));

    let anchors: Vec<&str> = item.outline.iter().map(|e| e.anchor_id.as_str()).collect();
    assert_eq!(anchors, vec!["overview", "related"]);
    assert!(html.contains(r#"<h2 id="overview">"#));
}

#[tokio::test]
async fn same_embed_id_across_fields_is_fetched_once() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/images/42/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 42, "title": "Shared", "meta": {"download_url": "/media/s.png"}}"#)
        .expect(1)
        .create_async()
        .await;

    let pipeline = test_pipeline(&server);
    let fields = vec![
        RichTextDocument::new("body", r#"<embed embedtype="image" id="42"/>"#),
        RichTextDocument::new("benefits", r#"<embed embedtype="image" id="42"/>"#),
        RichTextDocument::new("instructions", r#"<embed embedtype="image" id="42"/>"#),
    ];

    let item = pipeline.resolve_item("body", &fields).await;

    mock.assert_async().await;
    for name in ["body", "benefits", "instructions"] {
        let html = item.field(name).expect("field present");
        assert!(html.contains(r#"src="/cms-media/s.png""#), "field {name} unresolved");
    }
}

#[tokio::test]
async fn failing_field_degrades_without_blocking_others() {
    let mut server = Server::new_async().await;
    // References field's embed 404s; body's page link resolves.
    mock_page_detail(&mut server, 7, "drugs.DrugPage", "metformin").await;

    let pipeline = test_pipeline(&server);
    let fields = vec![
        RichTextDocument::new("body", r#"<p><a linktype="page" id="7">metformin</a></p>"#),
        RichTextDocument::new("references", r#"<embed embedtype="image" id="404"/>"#),
    ];

    let item = pipeline.resolve_item("body", &fields).await;

    assert!(item.field("body").expect("body").contains(r#"href="/drugs/metformin""#));
    let references = item.field("references").expect("references");
    assert!(!references.contains("<embed"));
}

#[tokio::test]
async fn outline_comes_from_body_field_only() {
    let server = Server::new_async().await;
    let pipeline = test_pipeline(&server);
    let fields = vec![
        RichTextDocument::new("body", "<h2>Benefits</h2>"),
        RichTextDocument::new("instructions", "<h2>Steps</h2>"),
    ];

    let item = pipeline.resolve_item("body", &fields).await;

    assert_eq!(item.outline.len(), 1);
    assert_eq!(item.outline[0].anchor_id, "benefits");
    // Non-body fields keep their headings but get no injected ids.
    assert_eq!(item.field("instructions"), Some("<h2>Steps</h2>"));
}

#[tokio::test]
async fn resolve_fragment_handles_standalone_html() {
    let server = Server::new_async().await;
    let pipeline = test_pipeline(&server);

    let out = pipeline
        .resolve_fragment(r#"<img src="/media/x.png">"#)
        .await;
    assert_eq!(out, r#"<img src="/cms-media/x.png">"#);
}
