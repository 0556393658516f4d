//! Test utilities shared across the cms_richtext integration suite.

use cms_richtext::{ResolverConfig, ResolverPipeline};
use mockito::{Mock, Server};

/// Initialize logging once for the test binary; `RUST_LOG` controls output.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Config pointing at a mock CMS server.
#[allow(dead_code)]
pub fn test_config(server: &Server) -> ResolverConfig {
    init_logging();
    ResolverConfig::builder()
        .cms_base(server.url())
        .site_host("health.example.com")
        .build()
        .expect("Failed to create test config")
}

/// Pipeline wired to a mock CMS server.
#[allow(dead_code)]
pub fn test_pipeline(server: &Server) -> ResolverPipeline {
    ResolverPipeline::new(test_config(server)).expect("Failed to create test pipeline")
}

/// Mock an image detail lookup returning a download URL.
#[allow(dead_code)]
pub async fn mock_image_detail(server: &mut Server, id: u64, download_url: &str) -> Mock {
    server
        .mock("GET", format!("/api/v2/images/{id}/").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"id": {id}, "title": "Image {id}", "meta": {{"download_url": "{download_url}"}}}}"#
        ))
        .create_async()
        .await
}

/// Mock a page detail lookup with a content type and slug.
#[allow(dead_code)]
pub async fn mock_page_detail(server: &mut Server, id: u64, type_name: &str, slug: &str) -> Mock {
    server
        .mock("GET", format!("/api/v2/pages/{id}/").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"id": {id}, "title": "Page {id}", "meta": {{"type": "{type_name}", "slug": "{slug}"}}}}"#
        ))
        .create_async()
        .await
}

/// Mock any GET path with a plain error status.
#[allow(dead_code)]
pub async fn mock_error(server: &mut Server, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_body("Error")
        .create_async()
        .await
}
