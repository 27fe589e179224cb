//! Task spawning and timers for the current platform.
//!
//! - Web: `wasm_bindgen_futures::spawn_local` and `gloo_timers`
//! - Desktop: the ambient tokio runtime

use std::future::Future;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
pub fn spawn<F>(task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(task);
}

#[cfg(target_arch = "wasm32")]
pub fn spawn<F>(task: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(task);
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}
