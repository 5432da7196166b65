use pwa_sw::{Platform, WebPlatform};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::ServiceWorkerGlobalScope;

wasm_bindgen_test_configure!(run_in_service_worker);

async fn create_cache(name: &str) {
    let scope = js_sys::global()
        .dyn_into::<ServiceWorkerGlobalScope>()
        .expect("service worker scope");
    let caches = scope.caches().expect("caches");
    JsFuture::from(caches.open(name)).await.expect("open cache");
}

#[wasm_bindgen_test]
async fn lists_and_deletes_caches() {
    let platform = WebPlatform::new().expect("platform");
    create_cache("pwa-cache-test-a").await;
    create_cache("pwa-cache-test-b").await;

    let names = platform.cache_names().await.expect("cache names");
    assert!(names.iter().any(|name| name == "pwa-cache-test-a"));
    assert!(names.iter().any(|name| name == "pwa-cache-test-b"));

    assert!(platform.delete_cache("pwa-cache-test-a").await.expect("delete"));
    assert!(!platform.delete_cache("pwa-cache-test-a").await.expect("second delete"));

    let names = platform.cache_names().await.expect("cache names");
    assert!(!names.iter().any(|name| name == "pwa-cache-test-a"));

    platform.delete_cache("pwa-cache-test-b").await.expect("cleanup");
}

#[wasm_bindgen_test]
async fn empty_cache_has_no_match() {
    let platform = WebPlatform::new().expect("platform");

    let hit = platform
        .match_url("pwa-cache-test-empty", "/offline.html")
        .await
        .expect("match");
    assert!(hit.is_none());

    platform.delete_cache("pwa-cache-test-empty").await.expect("cleanup");
}

