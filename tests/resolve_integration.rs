//! End-to-end resolution tests
//!
//! Providers are pointed at a wiremock server so the whole path runs for
//! real: query construction, the reqwest client, JSON parsing, normalization,
//! and dispatch.

use embeddify::{
    ConfigLayer, Embedder, EmbedderSettings, Flickr, HttpClient, HttpClientConfig, HttpGet,
    OEmbedProvider, Resolution, Slideshare, Vimeo, YouTube,
};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const YOUTUBE_URL: &str = "https://www.youtube.com/watch?v=2wii8hfNkzE";
const YOUTUBE_HTML: &str = r#"<iframe width="200" height="113" src="https://www.youtube.com/embed/2wii8hfNkzE?feature=oembed" frameborder="0" allowfullscreen></iframe>"#;

fn http() -> Arc<dyn HttpGet> {
    Arc::new(HttpClient::new(HttpClientConfig::default()).unwrap())
}

fn endpoint(server: &MockServer, name: &str) -> String {
    format!("{}/{}", server.uri(), name)
}

#[tokio::test]
async fn test_youtube_embed_with_engine_width() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/youtube"))
        .and(query_param("url", YOUTUBE_URL))
        .and(query_param("maxwidth", "200"))
        .and(query_param("maxheight", "315"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "video",
            "html": YOUTUBE_HTML,
            "width": 200,
            "height": 113,
            "title": "Open Government",
            "thumbnail_url": "https://i.ytimg.com/vi/2wii8hfNkzE/hqdefault.jpg"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = Embedder::builder()
        .provider(YouTube::with_endpoint(endpoint(&server, "youtube")))
        .config(ConfigLayer::new().with_width(200))
        .build(http());

    let result = embedder.resolve_default(YOUTUBE_URL).await;

    assert!(result.contains("<iframe"));
    assert!(result.contains("https://www.youtube.com/embed/2wii8hfNkzE"));
    assert!(result.contains(r#"width="200""#));
    let metadata = result.metadata().unwrap();
    assert_eq!(
        metadata.thumbnail_url(),
        Some("https://i.ytimg.com/vi/2wii8hfNkzE/hqdefault.jpg")
    );
    assert_eq!(metadata.title(), Some("Open Government"));
}

#[tokio::test]
async fn test_not_found_passes_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let embedder = Embedder::builder()
        .provider(YouTube::with_endpoint(endpoint(&server, "youtube")))
        .provider(Slideshare::with_endpoint(endpoint(&server, "slideshare")))
        .build(http());

    let url = "https://www.youtube.com/watch?v=nothinghere";
    assert_eq!(
        embedder.resolve_default(url).await,
        Resolution::Passthrough(url.to_string())
    );
    assert_eq!(embedder.resolve_default("http://slideshare.net").await, "http://slideshare.net");
}

#[tokio::test]
async fn test_flickr_linked_image() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flickr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "photo",
            "title": "Barcamp",
            "web_page": "https://www.flickr.com/photos/mrtopf/7780673842/",
            "url": "https://farm9.staticflickr.com/8297/7780673842_a57b60cd16_n.jpg",
            "width": "320",
            "height": "250",
            "html": "<iframe></iframe>"
        })))
        .mount(&server)
        .await;

    let embedder = Embedder::builder()
        .provider(Flickr::with_endpoint(endpoint(&server, "flickr")))
        .build(http());

    let result = embedder
        .resolve_default("http://www.flickr.com/photos/mrtopf/7780673842/")
        .await;

    assert_eq!(
        result,
        r#"<a target="flickr" href="https://www.flickr.com/photos/mrtopf/7780673842/"><img src="https://farm9.staticflickr.com/8297/7780673842_a57b60cd16_n.jpg" class="flickr-embed-img" alt="Barcamp" width="320" height="250"></a>"#
    );
}

#[tokio::test]
async fn test_vimeo_params_and_autoplay() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vimeo"))
        .and(query_param("autoplay", "1"))
        .and(query_param("color", "ff0179"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "video",
            "html": "<iframe src=\"https://player.vimeo.com/video/6791752?autoplay=1&color=ff0179\" width=\"420\" height=\"315\"></iframe>"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = Embedder::builder()
        .provider(Vimeo::with_endpoint(endpoint(&server, "vimeo")))
        .build(http());

    let overrides = ConfigLayer::new()
        .with_autoplay(true)
        .with_param("color", "ff0179");
    let result = embedder.resolve("http://vimeo.com/6791752", &overrides).await;

    assert!(result.contains("https://player.vimeo.com/video/6791752"));
    assert!(result.contains("autoplay=1"));
}

#[tokio::test]
async fn test_youtube_autoplay_rewrite() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/youtube"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "video",
            "html": YOUTUBE_HTML
        })))
        .mount(&server)
        .await;

    let embedder = Embedder::builder()
        .provider(YouTube::with_endpoint(endpoint(&server, "youtube")))
        .build(http());

    let result = embedder
        .resolve(YOUTUBE_URL, &ConfigLayer::new().with_autoplay(true))
        .await;

    assert_eq!(
        result,
        YOUTUBE_HTML.replace("?feature=oembed", "?feature=oembed&autoplay=1")
    );
}

#[tokio::test]
async fn test_malformed_body_falls_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "photo",
            "url": "https://img.example/x.jpg",
            "width": 320,
            "height": 250
        })))
        .mount(&server)
        .await;

    let embedder = Embedder::builder()
        .provider(OEmbedProvider::new("broken", endpoint(&server, "broken"), ["img.example"]))
        .provider(OEmbedProvider::new("photos", endpoint(&server, "photos"), ["img.example"]))
        .build(http());

    let result = embedder.resolve_default("https://img.example/x").await;

    assert_eq!(
        result,
        r#"<img src="https://img.example/x.jpg" width="320" height="250">"#
    );
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "type": "video", "html": "<iframe></iframe>" }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let embedder = Embedder::builder()
        .provider(Vimeo::with_endpoint(endpoint(&server, "vimeo")))
        .timeout(Duration::from_millis(200))
        .build(http());

    let result = embedder.resolve_default("http://vimeo.com/6791752").await;

    assert!(result.is_passthrough());
}

#[tokio::test]
async fn test_settings_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "config": {{ "width": 400 }}, "providers": {{ "vimeo": {{ "height": 100 }} }}, "enabled": ["vimeo"] }}"#
    )
    .unwrap();

    let settings = EmbedderSettings::from_path(file.path()).unwrap();
    let embedder = Embedder::from_settings(&settings, http()).unwrap();

    assert_eq!(embedder.provider_names(), vec!["vimeo"]);
    let base = embedder.provider_config("vimeo").unwrap();
    assert_eq!(base.width, Some(400));
    assert_eq!(base.height, Some(100));
}

#[tokio::test]
async fn test_concurrent_resolves_share_engine() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vimeo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "video",
            "html": "<iframe src=\"https://player.vimeo.com/video/1\"></iframe>"
        })))
        .expect(4)
        .mount(&server)
        .await;

    let embedder = Arc::new(
        Embedder::builder()
            .provider(Vimeo::with_endpoint(endpoint(&server, "vimeo")))
            .build(http()),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let embedder = embedder.clone();
            tokio::spawn(async move {
                let width = 100 + i * 50;
                embedder
                    .resolve("https://vimeo.com/1", &ConfigLayer::new().with_width(width))
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_markup());
    }
    assert_eq!(embedder.provider_config("vimeo").unwrap().width, Some(560));
}
