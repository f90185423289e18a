//! The display half of the widget: polling, stale-result guard and rendering.
pub mod agent;
pub mod config;
pub mod filename;
pub mod format;
pub mod fragment;
pub mod source;

pub use agent::DisplayAgent;
pub use config::{DisplayConfig, Field};
pub use fragment::Fragment;
pub use source::{FileImageSource, ImageSource};

use crate::helper::{HelperHandle, spawn_helper};
use crate::metadata::MetadataResolver;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

/// Runs the widget: polls `source` every `update_interval`, feeds changes to
/// a helper built around `resolver` and calls `on_render` whenever an applied
/// result changes what is shown. Returns only if the helper stops.
pub async fn run_widget<S, F>(
    config: DisplayConfig,
    source: S,
    resolver: MetadataResolver,
    mut on_render: F,
) where
    S: ImageSource,
    F: FnMut(&Fragment),
{
    let HelperHandle {
        requests,
        mut results,
        task: _task,
    } = spawn_helper(resolver);
    let mut ticker = interval(config.update_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut agent = DisplayAgent::new(config, requests);

    on_render(&agent.render());
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                agent.on_tick(&source);
            }
            result = results.recv() => {
                let Some(result) = result else {
                    debug!("Metadata helper closed its channel");
                    break;
                };
                if agent.on_metadata_result(result) {
                    on_render(&agent.render());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_widget_renders_after_first_result() {
        let config = DisplayConfig {
            update_interval: Duration::from_millis(10),
            ..DisplayConfig::default()
        };
        let resolver = MetadataResolver::builder().probe_exiftool(false).build();
        let (render_tx, mut render_rx) = tokio::sync::mpsc::unbounded_channel();

        let widget = tokio::spawn(run_widget(
            config,
            |_: &str| Some("/nonexistent/Sunset%20Bay.jpg".to_string()),
            resolver,
            move |fragment: &Fragment| {
                let _ = render_tx.send(fragment.to_html());
            },
        ));

        let placeholder = render_rx.recv().await.unwrap();
        assert!(placeholder.contains("Waiting for image data..."));

        let rendered = tokio::time::timeout(Duration::from_secs(5), render_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(rendered.contains(r#"<span class="image-filename">Sunset Bay.jpg</span>"#));
        assert!(!rendered.contains("image-date"));

        widget.abort();
    }
}
