use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

use super::*;
use crate::assemble::assemble;
use crate::domain::options::keys;
use crate::domain::{Attachment, DiagnosticCommand, OptionSet, RequestDescriptor};
use crate::error::{AppError, AppResult, HttpError};
use crate::outcome::OutcomeKind;

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn permission_denied(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::PermissionDenied
}

async fn bind_local() -> AppResult<Option<TcpListener>> {
    match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => Ok(Some(listener)),
        Err(err) if permission_denied(&err) => Ok(None),
        Err(err) => Err(AppError::validation(format!(
            "Failed to bind test listener: {}",
            err
        ))),
    }
}

fn local_addr(listener: &TcpListener) -> AppResult<SocketAddr> {
    listener
        .local_addr()
        .map_err(|err| AppError::validation(format!("Failed to read listener addr: {}", err)))
}

fn transport_for(addr: SocketAddr) -> AppResult<HttpTransport> {
    let settings = ServerSettings::new(&format!("http://{}", addr))?;
    Ok(HttpTransport::new(settings)?)
}

fn descriptor(command: DiagnosticCommand, options: &OptionSet) -> AppResult<RequestDescriptor> {
    assemble(command, options)
        .map_err(|err| AppError::validation(format!("Expected descriptor, got: {}", err)))
}

fn header_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(4)
        .position(|bytes| bytes == b"\r\n\r\n")
        .and_then(|position| position.checked_add(4))
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

async fn read_chunk(stream: &mut TcpStream, request: &mut Vec<u8>) -> AppResult<usize> {
    let mut chunk = [0_u8; 8192];
    let read = timeout(TEST_TIMEOUT, stream.read(&mut chunk))
        .await
        .map_err(|_err| AppError::validation("HTTP read timed out"))?
        .map_err(|err| AppError::validation(format!("HTTP read failed: {}", err)))?;
    let prefix = chunk
        .get(..read)
        .ok_or_else(|| AppError::validation("HTTP stub failed to access read buffer prefix"))?;
    request.extend_from_slice(prefix);
    Ok(read)
}

/// Reads one request (head plus a Content-Length body or a chunked body).
async fn read_request(stream: &mut TcpStream) -> AppResult<Vec<u8>> {
    let mut request = Vec::with_capacity(4096);
    let end = loop {
        if read_chunk(stream, &mut request).await? == 0 {
            return Ok(request);
        }
        if let Some(end) = header_end(&request) {
            break end;
        }
    };
    let head = String::from_utf8_lossy(request.get(..end).unwrap_or_default()).to_lowercase();
    if head.contains("transfer-encoding: chunked") {
        while !request.ends_with(b"0\r\n\r\n") {
            if read_chunk(stream, &mut request).await? == 0 {
                break;
            }
        }
        return Ok(request);
    }
    let expected = end.saturating_add(content_length(&head));
    while request.len() < expected {
        if read_chunk(stream, &mut request).await? == 0 {
            break;
        }
    }
    Ok(request)
}

/// Serves one canned response and hands back the raw request it received.
fn spawn_http_stub(listener: TcpListener, response: Vec<u8>) -> JoinHandle<AppResult<String>> {
    tokio::spawn(async move {
        let (mut stream, _) = timeout(TEST_TIMEOUT, listener.accept())
            .await
            .map_err(|_err| AppError::validation("HTTP accept timed out"))?
            .map_err(|err| AppError::validation(format!("HTTP accept failed: {}", err)))?;
        let request = read_request(&mut stream).await?;
        timeout(TEST_TIMEOUT, stream.write_all(&response))
            .await
            .map_err(|_err| AppError::validation("HTTP write timed out"))?
            .map_err(|err| AppError::validation(format!("HTTP write failed: {}", err)))?;
        Ok(String::from_utf8_lossy(&request).into_owned())
    })
}

async fn join_stub<T>(handle: JoinHandle<AppResult<T>>) -> AppResult<T> {
    timeout(TEST_TIMEOUT, handle)
        .await
        .map_err(|_err| AppError::validation("Stub task timed out"))?
        .map_err(|err| AppError::validation(format!("Stub task failed: {}", err)))?
}

fn canned(status_line: &str, headers: &[&str], body: &[u8]) -> Vec<u8> {
    let mut response = format!("HTTP/1.1 {}\r\n", status_line).into_bytes();
    for header in headers {
        response.extend_from_slice(header.as_bytes());
        response.extend_from_slice(b"\r\n");
    }
    response.extend_from_slice(
        format!("Content-Length: {}\r\nConnection: close\r\n\r\n", body.len()).as_bytes(),
    );
    response.extend_from_slice(body);
    response
}

fn expect_response(completion: Completion) -> AppResult<ResponseData> {
    match completion {
        Completion::Response(data) => Ok(data),
        other @ (Completion::ProbeOpened | Completion::Unreachable { .. }) => Err(
            AppError::validation(format!("Expected a response, got: {:?}", other)),
        ),
    }
}

fn recording_callback() -> (ProgressCallback, Arc<Mutex<Vec<ProgressEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let callback: ProgressCallback = Arc::new(move |event| {
        if let Ok(mut guard) = sink.lock() {
            guard.push(event);
        }
    });
    (callback, events)
}

fn last_event(events: &Arc<Mutex<Vec<ProgressEvent>>>) -> AppResult<ProgressEvent> {
    let guard = events
        .lock()
        .map_err(|_err| AppError::validation("Progress log poisoned"))?;
    guard
        .last()
        .copied()
        .ok_or_else(|| AppError::validation("Expected at least one progress event"))
}

#[test]
fn route_url_keeps_base_path_prefix() -> AppResult<()> {
    let settings = ServerSettings::new("https://its.example.com/diag")?;
    let url = settings.route_url("/ram/status")?;
    if url.as_str() != "https://its.example.com/diag/ram/status" {
        return Err(AppError::validation(format!("Unexpected url: {}", url)));
    }

    let settings = ServerSettings::new("https://its.example.com/diag/")?;
    let url = settings.route_url("/ram/status")?;
    if url.as_str() != "https://its.example.com/diag/ram/status" {
        return Err(AppError::validation(format!(
            "Unexpected url with trailing slash: {}",
            url
        )));
    }
    Ok(())
}

#[test]
fn server_url_must_be_absolute_and_hierarchical() -> AppResult<()> {
    match ServerSettings::new("localhost") {
        Err(HttpError::InvalidServerUrl { .. }) => {}
        other => {
            return Err(AppError::validation(format!(
                "Expected invalid server url, got: {:?}",
                other
            )));
        }
    }
    match ServerSettings::new("mailto:ops@example.com") {
        Err(HttpError::ServerUrlCannotBeBase { .. }) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected cannot-be-base error, got: {:?}",
            other
        ))),
    }
}

#[test]
fn resolve_url_appends_query_in_order() -> AppResult<()> {
    let transport = HttpTransport::new(ServerSettings::new("http://127.0.0.1:8080/its")?)?;
    let options = OptionSet::new()
        .with_text(keys::DURATION, "2s")
        .with_text(keys::CODE, "503");
    let url = transport.resolve_url(&descriptor(DiagnosticCommand::Sleep, &options)?)?;
    if url.as_str() != "http://127.0.0.1:8080/its/sleep?duration=2s&code=503" {
        return Err(AppError::validation(format!("Unexpected url: {}", url)));
    }

    let url = transport.resolve_url(&descriptor(
        DiagnosticCommand::RamStatus,
        &OptionSet::new(),
    )?)?;
    if url.query().is_some() {
        return Err(AppError::validation(format!(
            "Expected no query string, got: {}",
            url
        )));
    }
    Ok(())
}

#[test]
fn missing_cacert_fails_client_construction() -> AppResult<()> {
    let dir = tempfile::tempdir()?;
    let mut settings = ServerSettings::new("https://its.example.com")?;
    settings.cacert = Some(dir.path().join("missing.pem"));
    match HttpTransport::new(settings) {
        Err(HttpError::ReadCacert { .. }) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected unreadable CA error, got: {:?}",
            other.map(|_transport| ())
        ))),
    }
}

#[test]
fn server_requests_carry_basic_auth() -> AppResult<()> {
    run_async_test(async {
        let Some(listener) = bind_local().await? else {
            return Ok(());
        };
        let addr = local_addr(&listener)?;
        let server = spawn_http_stub(listener, canned("200 OK", &[], b"{\"used\":1}"));

        let mut settings = ServerSettings::new(&format!("http://{}", addr))?;
        settings.username = Some("operator".to_owned());
        settings.password = Some("s3cret".to_owned());
        let transport = HttpTransport::new(settings)?;

        let completion = transport
            .dispatch(
                &descriptor(DiagnosticCommand::RamStatus, &OptionSet::new())?,
                None,
            )
            .await?;
        let data = expect_response(completion)?;
        let raw = join_stub(server).await?;
        let request = raw.to_lowercase();

        if data.status != 200 || data.body != "{\"used\":1}" {
            return Err(AppError::validation(format!(
                "Unexpected response: {:?}",
                data
            )));
        }
        if !request.starts_with("get /ram/status http/1.1") {
            return Err(AppError::validation(format!(
                "Unexpected request line: {}",
                request
            )));
        }
        // base64("operator:s3cret"); the value is case-sensitive.
        let credentials = raw
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("authorization"))
            .map(|(_, value)| value.trim());
        if credentials != Some("Basic b3BlcmF0b3I6czNjcmV0") {
            return Err(AppError::validation(format!(
                "Missing basic auth header: {}",
                request
            )));
        }
        if !request.contains(&format!("user-agent: {}", DEFAULT_USER_AGENT.to_lowercase())) {
            return Err(AppError::validation(format!(
                "Missing user agent: {}",
                request
            )));
        }
        Ok(())
    })
}

#[test]
fn upload_streams_file_part_with_progress() -> AppResult<()> {
    run_async_test(async {
        let Some(listener) = bind_local().await? else {
            return Ok(());
        };
        let addr = local_addr(&listener)?;
        let server = spawn_http_stub(listener, canned("200 OK", &[], b""));
        let transport = transport_for(addr)?;

        let content = vec![b'a'; 150_000];
        let options = OptionSet::new().with_file(
            keys::FILE,
            Attachment::from_bytes("payload.bin", content),
        );
        let (callback, events) = recording_callback();
        let completion = transport
            .dispatch(
                &descriptor(DiagnosticCommand::Upload, &options)?,
                Some(&callback),
            )
            .await?;
        let data = expect_response(completion)?;
        let request = join_stub(server).await?;

        if data.transferred != 150_000 {
            return Err(AppError::validation(format!(
                "Expected 150000 uploaded bytes, got {}",
                data.transferred
            )));
        }
        if data.elapsed.is_none() {
            return Err(AppError::validation("Upload must carry its transfer time"));
        }
        if !request.starts_with("POST /upload HTTP/1.1") {
            return Err(AppError::validation("Expected POST /upload"));
        }
        if !request.contains("name=\"file\"; filename=\"payload.bin\"") {
            return Err(AppError::validation("Missing file part in multipart body"));
        }
        let last = last_event(&events)?;
        if last.transferred != 150_000 || last.total != Some(150_000) {
            return Err(AppError::validation(format!(
                "Unexpected final progress event: {:?}",
                last
            )));
        }
        if last.percent() != Some(100) {
            return Err(AppError::validation("Expected upload to end at 100%"));
        }
        Ok(())
    })
}

#[test]
fn multipart_fields_keep_their_names() -> AppResult<()> {
    run_async_test(async {
        let Some(listener) = bind_local().await? else {
            return Ok(());
        };
        let addr = local_addr(&listener)?;
        let server = spawn_http_stub(listener, canned("200 OK", &[], b"connected"));
        let transport = transport_for(addr)?;

        let options = OptionSet::new()
            .with_text(keys::HOST, "example.com:443")
            .with_text(keys::CONNECTION_TIMEOUT, "5s");
        let completion = transport
            .dispatch(&descriptor(DiagnosticCommand::TcpProbe, &options)?, None)
            .await?;
        let data = expect_response(completion)?;
        let request = join_stub(server).await?;

        if data.body != "connected" {
            return Err(AppError::validation(format!(
                "Unexpected body: {}",
                data.body
            )));
        }
        for name in ["host", "connection_timeout"] {
            if !request.contains(&format!("name=\"{}\"", name)) {
                return Err(AppError::validation(format!(
                    "Missing multipart field {}: {}",
                    name, request
                )));
            }
        }
        if !request.contains("example.com:443") {
            return Err(AppError::validation("Missing host value in multipart body"));
        }
        Ok(())
    })
}

#[test]
fn download_counts_bytes_and_reports_progress() -> AppResult<()> {
    run_async_test(async {
        let Some(listener) = bind_local().await? else {
            return Ok(());
        };
        let addr = local_addr(&listener)?;
        let body = vec![b'x'; 4096];
        let server = spawn_http_stub(listener, canned("200 OK", &[], &body));
        let transport = transport_for(addr)?;

        let options = OptionSet::new().with_text(keys::SIZE, "4096");
        let (callback, events) = recording_callback();
        let completion = transport
            .dispatch(
                &descriptor(DiagnosticCommand::Download, &options)?,
                Some(&callback),
            )
            .await?;
        let data = expect_response(completion)?;
        let request = join_stub(server).await?;

        if !request.starts_with("GET /download?size=4096 HTTP/1.1") {
            return Err(AppError::validation(format!(
                "Unexpected request line: {}",
                request
            )));
        }
        if data.transferred != 4096 || !data.body.is_empty() || data.interrupted.is_some() {
            return Err(AppError::validation(format!(
                "Unexpected download result: {:?}",
                data
            )));
        }
        let last = last_event(&events)?;
        if last.transferred != 4096 || last.total != Some(4096) {
            return Err(AppError::validation(format!(
                "Unexpected final progress event: {:?}",
                last
            )));
        }
        Ok(())
    })
}

#[test]
fn failed_download_keeps_error_body() -> AppResult<()> {
    run_async_test(async {
        let Some(listener) = bind_local().await? else {
            return Ok(());
        };
        let addr = local_addr(&listener)?;
        let server = spawn_http_stub(
            listener,
            canned("503 Service Unavailable", &[], b"disk full"),
        );
        let transport = transport_for(addr)?;

        let completion = transport
            .dispatch(
                &descriptor(DiagnosticCommand::Download, &OptionSet::new())?,
                None,
            )
            .await?;
        let data = expect_response(completion)?;
        join_stub(server).await?;

        if data.status != 503 || data.body != "disk full" || data.transferred != 0 {
            return Err(AppError::validation(format!(
                "Unexpected response: {:?}",
                data
            )));
        }
        Ok(())
    })
}

#[test]
fn closed_port_is_unreachable() -> AppResult<()> {
    run_async_test(async {
        let Some(listener) = bind_local().await? else {
            return Ok(());
        };
        let addr = local_addr(&listener)?;
        drop(listener);
        let transport = transport_for(addr)?;

        let completion = transport
            .dispatch(
                &descriptor(DiagnosticCommand::CpuReset, &OptionSet::new())?,
                None,
            )
            .await?;
        match completion {
            Completion::Unreachable { reason } if !reason.is_empty() => Ok(()),
            other @ (Completion::Response(_)
            | Completion::ProbeOpened
            | Completion::Unreachable { .. }) => Err(AppError::validation(format!(
                "Expected unreachable, got: {:?}",
                other
            ))),
        }
    })
}

#[test]
fn external_probe_skips_credentials_and_collects_headers() -> AppResult<()> {
    run_async_test(async {
        let Some(listener) = bind_local().await? else {
            return Ok(());
        };
        let addr = local_addr(&listener)?;
        let server = spawn_http_stub(
            listener,
            canned(
                "200 OK",
                &["Access-Control-Allow-Origin: *"],
                b"hello",
            ),
        );

        let mut settings = ServerSettings::new("http://127.0.0.1:9")?;
        settings.username = Some("operator".to_owned());
        settings.password = Some("s3cret".to_owned());
        let transport = HttpTransport::new(settings)?;

        let options = OptionSet::new()
            .with_text(keys::METHOD, "put")
            .with_text(keys::URL, &format!("http://{}/cors", addr));
        let completion = transport
            .dispatch(&descriptor(DiagnosticCommand::CorsProbe, &options)?, None)
            .await?;
        let data = expect_response(completion)?;
        let request = join_stub(server).await?.to_lowercase();

        if !request.starts_with("put /cors http/1.1") {
            return Err(AppError::validation(format!(
                "Unexpected request line: {}",
                request
            )));
        }
        if request.contains("authorization:") {
            return Err(AppError::validation(
                "Probe of an external URL must not send server credentials",
            ));
        }
        let allow_origin = data
            .headers
            .iter()
            .any(|(name, value)| name == "access-control-allow-origin" && value == "*");
        if !allow_origin || data.body != "hello" {
            return Err(AppError::validation(format!(
                "Unexpected probe response: {:?}",
                data
            )));
        }
        Ok(())
    })
}

#[test]
fn websocket_probe_closes_normally() -> AppResult<()> {
    run_async_test(async {
        let Some(listener) = bind_local().await? else {
            return Ok(());
        };
        let addr = local_addr(&listener)?;
        let server: JoinHandle<AppResult<(CloseCode, String)>> = tokio::spawn(async move {
            let (stream, _) = timeout(TEST_TIMEOUT, listener.accept())
                .await
                .map_err(|_err| AppError::validation("Websocket accept timed out"))?
                .map_err(|err| AppError::validation(format!("Websocket accept failed: {}", err)))?;
            let mut ws = timeout(TEST_TIMEOUT, accept_async(stream))
                .await
                .map_err(|_err| AppError::validation("Websocket handshake timed out"))?
                .map_err(|err| {
                    AppError::validation(format!("Websocket handshake failed: {}", err))
                })?;
            let incoming = timeout(TEST_TIMEOUT, ws.next())
                .await
                .map_err(|_err| AppError::validation("Websocket recv timed out"))?
                .ok_or_else(|| AppError::validation("Websocket stream closed unexpectedly"))?
                .map_err(|err| AppError::validation(format!("Websocket recv failed: {}", err)))?;
            match incoming {
                Message::Close(Some(frame)) => Ok((frame.code, frame.reason.into_owned())),
                other @ (Message::Text(_)
                | Message::Binary(_)
                | Message::Ping(_)
                | Message::Pong(_)
                | Message::Close(None)
                | Message::Frame(_)) => Err(AppError::validation(format!(
                    "Expected a close frame, got: {:?}",
                    other
                ))),
            }
        });

        let transport = HttpTransport::new(ServerSettings::new("http://127.0.0.1:9")?)?;
        let options = OptionSet::new()
            .with_text(keys::METHOD, "GET")
            .with_text(keys::URL, &format!("ws://{}/socket", addr));
        let completion = transport
            .dispatch(&descriptor(DiagnosticCommand::CorsProbe, &options)?, None)
            .await?;
        if completion != Completion::ProbeOpened {
            return Err(AppError::validation(format!(
                "Expected probe to open, got: {:?}",
                completion
            )));
        }

        let (code, reason) = join_stub(server).await?;
        if code != CloseCode::Normal || reason != PROBE_CLOSE_REASON {
            return Err(AppError::validation(format!(
                "Unexpected close frame: {:?} {}",
                code, reason
            )));
        }
        Ok(())
    })
}

#[test]
fn websocket_probe_of_closed_port_is_unreachable() -> AppResult<()> {
    run_async_test(async {
        let Some(listener) = bind_local().await? else {
            return Ok(());
        };
        let addr = local_addr(&listener)?;
        drop(listener);

        let transport = HttpTransport::new(ServerSettings::new("http://127.0.0.1:9")?)?;
        let options = OptionSet::new()
            .with_text(keys::METHOD, "GET")
            .with_text(keys::URL, &format!("ws://{}/", addr));
        let completion = transport
            .dispatch(&descriptor(DiagnosticCommand::CorsProbe, &options)?, None)
            .await?;
        match completion {
            Completion::Unreachable { reason }
                if reason.starts_with("failed to open websocket connection") =>
            {
                Ok(())
            }
            other @ (Completion::Response(_)
            | Completion::ProbeOpened
            | Completion::Unreachable { .. }) => Err(AppError::validation(format!(
                "Expected unreachable websocket, got: {:?}",
                other
            ))),
        }
    })
}

#[test]
fn websocket_upgrade_refused_with_status_is_an_application_error() -> AppResult<()> {
    run_async_test(async {
        let Some(listener) = bind_local().await? else {
            return Ok(());
        };
        let addr = local_addr(&listener)?;
        let server = spawn_http_stub(
            listener,
            canned("404 Not Found", &["Content-Type: text/plain"], b"no socket here"),
        );

        let transport = HttpTransport::new(ServerSettings::new("http://127.0.0.1:9")?)?;
        let options = OptionSet::new()
            .with_text(keys::METHOD, "GET")
            .with_text(keys::URL, &format!("ws://{}/ws", addr));
        let outcome = run(&transport, DiagnosticCommand::CorsProbe, &options, None).await;
        let request = join_stub(server).await?.to_lowercase();

        if !request.starts_with("get /ws http/1.1") || !request.contains("upgrade: websocket") {
            return Err(AppError::validation(format!(
                "Unexpected upgrade request: {}",
                request
            )));
        }
        if outcome.kind != OutcomeKind::ApplicationError
            || outcome.status != Some(404)
            || outcome.message != "server responded with status code 404"
        {
            return Err(AppError::validation(format!(
                "Unexpected outcome: {:?}",
                outcome
            )));
        }
        Ok(())
    })
}

#[test]
fn run_against_live_stub_reports_success() -> AppResult<()> {
    run_async_test(async {
        let Some(listener) = bind_local().await? else {
            return Ok(());
        };
        let addr = local_addr(&listener)?;
        let server = spawn_http_stub(listener, canned("200 OK", &[], b"slept"));
        let transport = transport_for(addr)?;

        let options = OptionSet::new().with_text(keys::DURATION, "10ms");
        let outcome = run(&transport, DiagnosticCommand::Sleep, &options, None).await;
        join_stub(server).await?;

        if outcome.kind != OutcomeKind::Success || outcome.message != "server slept for 10ms" {
            return Err(AppError::validation(format!(
                "Unexpected outcome: {:?}",
                outcome
            )));
        }
        if outcome.status != Some(200) {
            return Err(AppError::validation("Expected status 200 on outcome"));
        }
        Ok(())
    })
}
