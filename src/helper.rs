//! The background side of the widget: owns a [`MetadataResolver`] and answers
//! `GET_IMAGE_INFO` requests off the display's render path.

use crate::error::ImageInfoError;
use crate::metadata::{ImageMetadata, MetadataResolver};
use crate::protocol::{ImageInfoRequest, Notification};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Channels connected to a running helper.
pub struct HelperHandle {
    pub requests: UnboundedSender<ImageInfoRequest>,
    pub results: UnboundedReceiver<ImageMetadata>,
    pub task: JoinHandle<()>,
}

/// Starts the resolver on a blocking worker. Requests are handled one after
/// another; the worker exits once every request sender is dropped or the
/// result receiver goes away.
///
/// Must be called from within a tokio runtime.
pub fn spawn_helper(mut resolver: MetadataResolver) -> HelperHandle {
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ImageInfoRequest>();
    let (result_tx, result_rx) = mpsc::unbounded_channel();

    let task = tokio::task::spawn_blocking(move || {
        info!(
            exiftool = ?resolver.availability(),
            "Starting metadata helper"
        );
        while let Some(request) = request_rx.blocking_recv() {
            debug!(filename = %request.filename, "Getting image info");
            let result = resolver.resolve(&request);
            if result_tx.send(result).is_err() {
                break;
            }
        }
        debug!("Metadata helper stopped");
    });

    HelperHandle {
        requests: request_tx,
        results: result_rx,
        task,
    }
}

/// Serves the helper over line-delimited JSON notifications: reads
/// `GET_IMAGE_INFO` lines from `input`, writes `IMAGE_INFO_RESULT` lines to
/// `output`. Returns when `input` is exhausted and every pending result has
/// been written.
pub async fn serve_lines<R, W>(
    resolver: MetadataResolver,
    input: R,
    mut output: W,
) -> Result<(), ImageInfoError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let HelperHandle {
        requests,
        mut results,
        task,
    } = spawn_helper(resolver);
    let mut reader = BufReader::new(input);
    // Kept across iterations: `read_until` resumes into it if the other
    // branch wins the select.
    let mut line = Vec::new();
    let mut requests = Some(requests);

    loop {
        tokio::select! {
            read = reader.read_until(b'\n', &mut line), if requests.is_some() => {
                if read? == 0 {
                    // Closing the sender lets the helper drain and stop.
                    requests = None;
                    continue;
                }
                if let Some(sender) = &requests {
                    match std::str::from_utf8(&line) {
                        Ok(text) => forward_line(text, sender)?,
                        Err(e) => warn!("Ignoring notification that is not UTF-8: {e}"),
                    }
                }
                line.clear();
            }
            result = results.recv() => {
                let Some(result) = result else { break };
                let mut encoded = serde_json::to_vec(&Notification::ImageInfoResult(result))?;
                encoded.push(b'\n');
                output.write_all(&encoded).await?;
                output.flush().await?;
            }
        }
    }

    task.await.map_err(|_| ImageInfoError::HelperStopped)
}

fn forward_line(
    line: &str,
    requests: &UnboundedSender<ImageInfoRequest>,
) -> Result<(), ImageInfoError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }
    match serde_json::from_str::<Notification>(line) {
        Ok(Notification::GetImageInfo(request)) => requests
            .send(request)
            .map_err(|_| ImageInfoError::HelperStopped),
        Ok(Notification::ImageInfoResult(_)) => {
            debug!("Ignoring result notification sent to the helper");
            Ok(())
        }
        Err(e) => {
            warn!("Ignoring malformed notification: {e}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn resolver() -> MetadataResolver {
        MetadataResolver::builder().probe_exiftool(false).build()
    }

    #[tokio::test]
    async fn test_helper_answers_requests_in_order() {
        let mut helper = spawn_helper(resolver());

        for name in ["first.jpg", "second.jpg"] {
            helper
                .requests
                .send(ImageInfoRequest {
                    path: Some(PathBuf::from("/nonexistent").join(name)),
                    filename: name.to_string(),
                    local_path: None,
                })
                .unwrap();
        }

        assert_eq!(helper.results.recv().await.unwrap().filename, "first.jpg");
        assert_eq!(helper.results.recv().await.unwrap().filename, "second.jpg");

        drop(helper.requests);
        helper.task.await.unwrap();
    }

    #[tokio::test]
    async fn test_serve_lines_round_trip() {
        let input = concat!(
            r#"{"notification":"GET_IMAGE_INFO","payload":{"filename":"gone.jpg","path":"/nonexistent/gone.jpg"}}"#,
            "\n",
            "this is not json\n",
            "\n",
        );
        let mut output = Vec::new();

        serve_lines(resolver(), input.as_bytes(), &mut output)
            .await
            .unwrap();

        let written = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 1);

        let notification: Notification = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(
            notification,
            Notification::ImageInfoResult(ImageMetadata::empty("gone.jpg"))
        );
    }

    #[tokio::test]
    async fn test_serve_lines_skips_line_that_is_not_utf8() {
        let mut input = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(
            br#"{"notification":"GET_IMAGE_INFO","payload":{"filename":"after.jpg","path":"/nonexistent/after.jpg"}}"#,
        );
        input.push(b'\n');
        let mut output = Vec::new();

        serve_lines(resolver(), input.as_slice(), &mut output)
            .await
            .unwrap();

        let written = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 1);

        let notification: Notification = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(
            notification,
            Notification::ImageInfoResult(ImageMetadata::empty("after.jpg"))
        );
    }
}
