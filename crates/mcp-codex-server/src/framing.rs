//! Line guard between stdio and the MCP service
//!
//! The service ends its session on the first line it cannot decode. Each
//! input line is checked here first: decodable messages are forwarded,
//! anything else gets a JSON-RPC error reply (`id: null` for bytes that are
//! not JSON) and reading carries on.
//!
//! On EOF the service input is closed only once every forwarded request has
//! been answered, so replies to in-flight calls are still written.

use std::collections::HashSet;
use std::sync::Arc;

use mcp_codex_core::{log_debug, log_warn, SharedLogger};
use parking_lot::Mutex;
use rmcp::model::{ClientJsonRpcMessage, ErrorCode, ErrorData};
use serde_json::{json, Value};
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, DuplexStream, ReadHalf,
    WriteHalf,
};
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

use crate::error::ServerResult;

const PIPE_CAPACITY: usize = 64 * 1024;

/// Methods the service answers; a bad payload for one of these is `-32602`
const KNOWN_METHODS: &[&str] = &["initialize", "ping", "tools/list", "tools/call"];

/// Put the guard between `input`/`output` and the returned service stream
///
/// The task finishes after `input` reaches EOF, the service has closed its
/// end and every reply has been flushed to `output`.
pub fn guard<R, W>(
    input: R,
    output: W,
    logger: SharedLogger,
) -> (DuplexStream, JoinHandle<ServerResult<()>>)
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (service_end, guard_end) = tokio::io::duplex(PIPE_CAPACITY);
    let (from_service, to_service) = tokio::io::split(guard_end);
    let (replies, lines) = mpsc::unbounded_channel::<Vec<u8>>();
    let in_flight = Arc::new(InFlight::default());

    let rejects = replies.clone();
    let answered = in_flight.clone();
    let task = tokio::spawn(async move {
        let (forwarded, relayed, written) = tokio::join!(
            forward_input(input, to_service, rejects, in_flight, logger),
            relay_output(from_service, replies, answered),
            write_lines(output, lines),
        );
        forwarded?;
        relayed?;
        written
    });

    (service_end, task)
}

/// Request ids forwarded to the service and not yet answered
#[derive(Default)]
struct InFlight {
    state: Mutex<InFlightState>,
    settled: Notify,
}

#[derive(Default)]
struct InFlightState {
    ids: HashSet<String>,
    service_closed: bool,
}

impl InFlight {
    fn begin(&self, id: &Value) {
        self.state.lock().ids.insert(id.to_string());
    }

    fn finish(&self, id: &Value) {
        if self.state.lock().ids.remove(&id.to_string()) {
            self.settled.notify_waiters();
        }
    }

    fn service_closed(&self) {
        self.state.lock().service_closed = true;
        self.settled.notify_waiters();
    }

    async fn wait(&self) {
        loop {
            let notified = self.settled.notified();
            {
                let state = self.state.lock();
                if state.ids.is_empty() || state.service_closed {
                    return;
                }
            }
            notified.await;
        }
    }
}

/// What to do with one input line
#[derive(Debug)]
enum Verdict {
    /// Pass to the service; carries the id when a reply is expected
    Forward(Option<Value>),
    Reject(Vec<u8>),
    Drop,
}

fn check(line: &[u8]) -> Verdict {
    let value: Value = match serde_json::from_slice(line) {
        Ok(value) => value,
        Err(e) => {
            return Verdict::Reject(error_reply(
                Value::Null,
                ErrorCode::PARSE_ERROR,
                format!("Parse error: {}", e),
            ))
        }
    };

    let id = value.get("id").cloned();
    let method = value.get("method").and_then(Value::as_str).map(str::to_string);

    // Notifications are never answered, even when they carry an id
    if let Some(m) = &method {
        if m.starts_with("notifications/") && id.is_some() {
            return Verdict::Drop;
        }
    }

    if serde_json::from_value::<ClientJsonRpcMessage>(value).is_ok() {
        return Verdict::Forward(id.filter(|_| method.is_some()));
    }

    match (id, method) {
        (None, Some(_)) => Verdict::Drop,
        (Some(id), Some(m)) if KNOWN_METHODS.contains(&m.as_str()) => Verdict::Reject(error_reply(
            id,
            ErrorCode::INVALID_PARAMS,
            format!("Invalid params for {}", m),
        )),
        (Some(id), Some(m)) => Verdict::Reject(error_reply(
            id,
            ErrorCode::METHOD_NOT_FOUND,
            format!("Method not found: {}", m),
        )),
        (id, None) => Verdict::Reject(error_reply(
            id.unwrap_or(Value::Null),
            ErrorCode::INVALID_REQUEST,
            "Invalid request: missing method".to_string(),
        )),
    }
}

fn error_reply(id: Value, code: ErrorCode, message: String) -> Vec<u8> {
    let reply = json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": ErrorData::new(code, message, None),
    });
    let mut line = reply.to_string().into_bytes();
    line.push(b'\n');
    line
}

async fn forward_input<R>(
    input: R,
    mut service: WriteHalf<DuplexStream>,
    replies: mpsc::UnboundedSender<Vec<u8>>,
    in_flight: Arc<InFlight>,
    logger: SharedLogger,
) -> ServerResult<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(input);
    let mut buf = Vec::new();
    let mut outcome = Ok(());

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log_warn!(logger, "reading input failed: {}", e);
                outcome = Err(e.into());
                break;
            }
        }

        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }

        match check(line) {
            Verdict::Forward(request_id) => {
                if let Some(id) = &request_id {
                    in_flight.begin(id);
                }
                let mut framed = line.to_vec();
                framed.push(b'\n');
                if let Err(e) = service.write_all(&framed).await {
                    log_warn!(logger, "service stopped reading: {}", e);
                    break;
                }
            }
            Verdict::Reject(reply) => {
                log_warn!(logger, "rejected input line: {}", String::from_utf8_lossy(&reply).trim_end());
                // A closed writer is reported when the writer is joined
                let _ = replies.send(reply);
            }
            Verdict::Drop => {}
        }
    }

    log_debug!(logger, "input closed; waiting for in-flight requests");
    in_flight.wait().await;
    if let Err(e) = service.shutdown().await {
        log_debug!(logger, "service input already closed: {}", e);
    }
    outcome
}

async fn relay_output(
    service: ReadHalf<DuplexStream>,
    replies: mpsc::UnboundedSender<Vec<u8>>,
    in_flight: Arc<InFlight>,
) -> ServerResult<()> {
    let mut reader = BufReader::new(service);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = match reader.read_until(b'\n', &mut buf).await {
            Ok(read) => read,
            Err(e) => {
                in_flight.service_closed();
                return Err(e.into());
            }
        };
        if read == 0 {
            break;
        }
        if !buf.ends_with(b"\n") {
            buf.push(b'\n');
        }

        if let Ok(message) = serde_json::from_slice::<Value>(&buf) {
            if message.get("method").is_none() {
                if let Some(id) = message.get("id") {
                    in_flight.finish(id);
                }
            }
        }
        // Keep draining even with nobody listening so the service never blocks
        let _ = replies.send(buf.clone());
    }

    in_flight.service_closed();
    Ok(())
}

async fn write_lines<W>(mut output: W, mut lines: mpsc::UnboundedReceiver<Vec<u8>>) -> ServerResult<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = lines.recv().await {
        output.write_all(&line).await?;
        output.flush().await?;
    }
    output.shutdown().await?;
    Ok(())
}
