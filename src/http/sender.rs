use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Method, Response, Url};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::{
    ExecutionMode, Payload, PayloadValue, RequestDescriptor, Target, TransferDirection,
};
use crate::error::HttpError;

use super::client::{ServerSettings, build_client};
use super::probe::open_and_close;
use super::progress::{TransferProgress, notify};
use super::transport::{Completion, ResponseData, Transport};
use super::ProgressCallback;

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;
const UPLOAD_FIELD: &str = "file";

/// reqwest/tungstenite transport bound to one diagnostic server.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    settings: ServerSettings,
}

impl HttpTransport {
    /// Builds the HTTP client for `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error when the CA bundle cannot be loaded or the client
    /// cannot be built.
    pub fn new(settings: ServerSettings) -> Result<Self, HttpError> {
        let client = build_client(&settings)?;
        Ok(Self { client, settings })
    }

    /// Absolute URL of the descriptor, query included.
    ///
    /// # Errors
    ///
    /// Returns an error when the route or the probed URL is not a valid URL.
    pub fn resolve_url(&self, descriptor: &RequestDescriptor) -> Result<Url, HttpError> {
        let mut url = match descriptor.target() {
            Target::Server(route) => self.settings.route_url(route)?,
            Target::External(raw) => Url::parse(raw).map_err(|err| HttpError::InvalidProbeUrl {
                url: raw.clone(),
                source: err,
            })?,
        };
        if !descriptor.query().is_empty() {
            url.set_query(Some(&descriptor.query_string()));
        }
        Ok(url)
    }

    async fn request(
        &self,
        descriptor: &RequestDescriptor,
        url: Url,
        progress: Option<&ProgressCallback>,
    ) -> Result<Completion, HttpError> {
        let method = Method::from_bytes(descriptor.method().as_str().as_bytes()).map_err(|_err| {
            HttpError::InvalidProbeMethod {
                method: descriptor.method().as_str().to_owned(),
            }
        })?;
        debug!("Dispatching {} {}", method, url);

        let mut request = self.client.request(method, url.clone());
        if matches!(descriptor.target(), Target::Server(_))
            && let Some(username) = self.settings.username.as_ref()
        {
            request = request.basic_auth(username, self.settings.password.as_ref());
        }

        let mut uploaded = 0;
        if let Some(payload) = descriptor.payload() {
            let upload_progress = match descriptor.transfer() {
                Some(TransferDirection::Upload) => progress.cloned(),
                Some(TransferDirection::Download) | None => None,
            };
            let (form, size) = build_form(payload, upload_progress).await?;
            uploaded = size;
            request = request.multipart(form);
        }

        // The clock starts once the form is built, so reading an upload
        // attachment from disk is not counted as transfer time.
        let sent_at = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) if err.is_builder() => {
                return Err(HttpError::BuildRequestFailed { source: err });
            }
            Err(err) => {
                warn!("Request to {} failed: {}", url, err);
                return Ok(Completion::Unreachable {
                    reason: err.to_string(),
                });
            }
        };

        let downloading = descriptor.transfer() == Some(TransferDirection::Download)
            && response.status().is_success();
        let mut data = if downloading {
            drain_download(response, progress).await
        } else {
            let mut data = read_text(response).await;
            data.transferred = uploaded;
            data
        };
        data.elapsed = Some(sent_at.elapsed());
        Ok(Completion::Response(data))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn dispatch(
        &self,
        descriptor: &RequestDescriptor,
        progress: Option<&ProgressCallback>,
    ) -> Result<Completion, HttpError> {
        let url = self.resolve_url(descriptor)?;
        match descriptor.mode() {
            ExecutionMode::RequestResponse => self.request(descriptor, url, progress).await,
            ExecutionMode::BidirectionalProbe => {
                Ok(open_and_close(&url, self.settings.connect_timeout).await)
            }
        }
    }
}

/// Builds the multipart form. The `file` part of an upload is streamed in
/// chunks so progress can be reported; returns the uploaded size.
async fn build_form(
    payload: &Payload,
    upload_progress: Option<ProgressCallback>,
) -> Result<(Form, u64), HttpError> {
    let mut form = Form::new();
    let mut uploaded = 0;
    for part in payload.parts() {
        match &part.value {
            PayloadValue::Text(value) => {
                form = form.text(part.name, value.clone());
            }
            PayloadValue::File(attachment) => {
                let content = attachment.read().await?;
                let length = u64::try_from(content.len()).unwrap_or(u64::MAX);
                let is_upload = part.name == UPLOAD_FIELD;
                if is_upload {
                    uploaded = length;
                }
                let body = if is_upload && let Some(callback) = upload_progress.as_ref() {
                    Body::wrap_stream(upload_stream(content, callback.clone()))
                } else {
                    Body::from(content)
                };
                let file_part = Part::stream_with_length(body, length)
                    .file_name(attachment.file_name().to_owned());
                form = form.part(part.name, file_part);
            }
        }
    }
    Ok((form, uploaded))
}

fn upload_stream(
    content: Bytes,
    progress: ProgressCallback,
) -> impl futures_util::Stream<Item = Result<Bytes, std::io::Error>> {
    let total = u64::try_from(content.len()).unwrap_or(u64::MAX);
    let mut tracker = TransferProgress::start(TransferDirection::Upload, Some(total));
    futures_util::stream::iter(split_chunks(content)).map(move |chunk| {
        let event = tracker.advance(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
        notify(Some(&progress), event);
        Ok(chunk)
    })
}

fn split_chunks(mut content: Bytes) -> Vec<Bytes> {
    let mut chunks = Vec::new();
    while content.len() > UPLOAD_CHUNK_SIZE {
        chunks.push(content.split_to(UPLOAD_CHUNK_SIZE));
    }
    if !content.is_empty() {
        chunks.push(content);
    }
    chunks
}

fn response_head(response: &Response) -> (u16, Vec<(String, String)>) {
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_owned(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    (response.status().as_u16(), headers)
}

/// Streams a download body to the void, counting bytes.
async fn drain_download(response: Response, progress: Option<&ProgressCallback>) -> ResponseData {
    let (status, headers) = response_head(&response);
    let mut tracker = TransferProgress::start(TransferDirection::Download, response.content_length());
    let mut interrupted = None;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                let event = tracker.advance(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
                notify(progress, event);
            }
            Err(err) => {
                warn!("Download interrupted: {}", err);
                interrupted = Some(err.to_string());
                break;
            }
        }
    }
    debug!(
        "Downloaded {} bytes in {}ms",
        tracker.transferred(),
        tracker.elapsed().as_millis()
    );
    ResponseData {
        status,
        headers,
        body: String::new(),
        transferred: tracker.transferred(),
        interrupted,
        elapsed: None,
    }
}

async fn read_text(response: Response) -> ResponseData {
    let (status, headers) = response_head(&response);
    let (body, interrupted) = match response.text().await {
        Ok(body) => (body, None),
        Err(err) => {
            warn!("Failed to read response body: {}", err);
            (String::new(), Some(err.to_string()))
        }
    };
    ResponseData {
        status,
        headers,
        body,
        transferred: 0,
        interrupted,
        elapsed: None,
    }
}
