//! End-to-end tests through a real listener and a mock upstream.

use std::io::Read;
use std::net::SocketAddr;
use std::time::Duration;

use flate2::read::MultiGzDecoder;
use sitemap_proxy::config::ProxyConfig;
use sitemap_proxy::http::AnalyticsInjector;
use sitemap_proxy::{HttpServer, Shutdown};

mod common;

use common::{gzip, MockResponse, HTML_PAGE};

async fn start_upstream() -> SocketAddr {
    common::start_programmable_backend(|path| async move {
        match path.as_str() {
            "/" | "/products" | "/blog/" => MockResponse::new(200, "text/html", HTML_PAGE),
            "/compressed" => MockResponse::new(200, "text/html", gzip(HTML_PAGE.as_bytes()))
                .header("Content-Encoding", "gzip"),
            "/api/items" => MockResponse::new(200, "application/json", r#"[1,2,3]"#),
            _ => MockResponse::new(404, "text/html", "<html><body>nope</body></html>"),
        }
    })
    .await
}

async fn start_proxy(mut config: ProxyConfig) -> (SocketAddr, Shutdown) {
    config.listener.bind_address = "127.0.0.1:0".into();
    let server = HttpServer::new(config).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    (addr, shutdown)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_learns_sitemap_from_traffic() {
    let upstream = start_upstream().await;
    let mut config = ProxyConfig::default();
    config.upstream.address = upstream.to_string();
    config.sitemap.ignore = vec!["^/api/".into()];
    let (proxy, shutdown) = start_proxy(config).await;
    let client = client();

    for path in ["/products", "/blog/", "/api/items", "/gone", "/logo.png"] {
        client
            .get(format!("http://{proxy}{path}"))
            .send()
            .await
            .expect("Proxy unreachable");
    }

    let res = client
        .get(format!("http://{proxy}/sitemap.xml"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/xml");
    let xml = res.text().await.unwrap();

    let base = format!("http://{proxy}");
    assert!(xml.contains(&format!("<loc>{base}</loc>")));
    assert!(xml.contains(&format!("<loc>{base}/blog</loc>")));
    assert!(xml.contains(&format!("<loc>{base}/products</loc>")));
    assert!(!xml.contains("/api/items"));
    assert!(!xml.contains("/gone"));
    assert!(!xml.contains("logo.png"));

    let robots = client
        .get(format!("http://{proxy}/robots.txt"))
        .header("x-forwarded-proto", "https")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(robots, format!("User-agent: *\nSitemap: https://{proxy}/sitemap.xml\n"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_forwarded_responses_keep_status_and_body() {
    let upstream = start_upstream().await;
    let mut config = ProxyConfig::default();
    config.upstream.address = upstream.to_string();
    config.sitemap.analytics_container_id = "GTM-E2E".into();
    let (proxy, shutdown) = start_proxy(config).await;
    let client = client();

    let res = client.get(format!("http://{proxy}/gone")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "<html><body>nope</body></html>");

    let res = client.get(format!("http://{proxy}/api/items")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-length"], "7");
    assert_eq!(res.text().await.unwrap(), "[1,2,3]");

    assert!(res_has_request_id(&client, proxy).await);

    shutdown.trigger();
}

async fn res_has_request_id(client: &reqwest::Client, proxy: SocketAddr) -> bool {
    let res = client.get(format!("http://{proxy}/products")).send().await.unwrap();
    res.headers().contains_key("x-request-id")
}

#[tokio::test]
async fn test_gzip_html_rewritten_end_to_end() {
    let upstream = start_upstream().await;
    let mut config = ProxyConfig::default();
    config.upstream.address = upstream.to_string();
    config.sitemap.analytics_container_id = "GTM-E2E".into();
    let (proxy, shutdown) = start_proxy(config).await;
    let injector = AnalyticsInjector::new("GTM-E2E");

    let res = client()
        .get(format!("http://{proxy}/compressed"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-encoding"], "gzip");

    let body = res.bytes().await.unwrap();
    let mut decoded = Vec::new();
    MultiGzDecoder::new(body.as_ref())
        .read_to_end(&mut decoded)
        .unwrap();
    assert_eq!(decoded, injector.inject(HTML_PAGE.as_bytes()));

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    // Bind then drop to get a port nothing listens on
    let dead = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let mut config = ProxyConfig::default();
    config.upstream.address = dead.to_string();
    let (proxy, shutdown) = start_proxy(config).await;
    let client = client();

    let res = client.get(format!("http://{proxy}/products")).send().await.unwrap();
    assert_eq!(res.status(), 502);

    let xml = client
        .get(format!("http://{proxy}/sitemap.xml"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!xml.contains("/products"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_persists_sitemap_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("state/sitemap.xml");

    let upstream = start_upstream().await;
    let mut config = ProxyConfig::default();
    config.upstream.address = upstream.to_string();
    config.sitemap.output_file = Some(output.to_string_lossy().into_owned());
    config.sitemap.persist_interval_secs = 1;
    let (proxy, shutdown) = start_proxy(config).await;

    let res = client()
        .get(format!("http://{proxy}/products"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let written = std::fs::read_to_string(&output).expect("sitemap file not written");
    assert!(written.starts_with("<?xml"));
    assert!(written.contains(&format!("<loc>http://{proxy}/products</loc>")));

    shutdown.trigger();
}
