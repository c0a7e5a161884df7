use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use pollrelay_engine::Relay;
use pollrelay_stream::{ByteStream, RelayError, UpstreamClient};
use pollrelay_types::{ChunkKind, PollResult, RelayState, SessionRequest};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

type Fragment = Result<Bytes, RelayError>;

/// Upstream whose fragments are pushed by the test through a channel;
/// dropping the sender ends the stream normally
struct ScriptedUpstream {
    fragments: Mutex<Option<mpsc::UnboundedReceiver<Fragment>>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl ScriptedUpstream {
    fn new() -> (Arc<Self>, mpsc::UnboundedSender<Fragment>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let upstream = Arc::new(Self {
            fragments: Mutex::new(Some(rx)),
            requests: Mutex::new(Vec::new()),
        });
        (upstream, tx)
    }
}

#[async_trait]
impl UpstreamClient for ScriptedUpstream {
    async fn open_stream(&self, url: &str, payload: &Value) -> Result<ByteStream, RelayError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));

        let rx = self
            .fragments
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| RelayError::Connection("stream already opened".to_string()))?;

        Ok(Box::pin(stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|fragment| (fragment, rx))
        })))
    }
}

struct RefusingUpstream;

#[async_trait]
impl UpstreamClient for RefusingUpstream {
    async fn open_stream(&self, _url: &str, _payload: &Value) -> Result<ByteStream, RelayError> {
        Err(RelayError::Connection("connect ECONNREFUSED".to_string()))
    }
}

fn relay_with(client: Arc<dyn UpstreamClient>, ttl: Duration, evict_failed: bool) -> Relay {
    Relay::builder()
        .upstream_client(client)
        .upstream_url("http://upstream.test/webhook/ai")
        .session_ttl(ttl)
        .evict_failed(evict_failed)
        .build()
        .unwrap()
}

fn send(tx: &mpsc::UnboundedSender<Fragment>, text: &str) {
    tx.send(Ok(Bytes::copy_from_slice(text.as_bytes()))).unwrap();
}

async fn wait_for_total(relay: &Relay, id: &str, total: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let PollResult::Ok(snapshot) = relay.poll_session(id, 0) {
                if snapshot.total_count >= total {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("chunks were not stored in time");
}

#[tokio::test]
async fn test_end_to_end_split_stream() {
    let (upstream, tx) = ScriptedUpstream::new();
    let relay = relay_with(upstream, Duration::from_millis(200), false);

    let (id, handle) = relay.spawn_session(SessionRequest::new("hi"));

    send(&tx, r#"{"type":"begin"}"#);
    send(&tx, r#"{"type":"it"#);
    send(&tx, r#"em","content":"he"#);
    send(&tx, r#"llo"}{"type":"end"}"#);
    wait_for_total(&relay, &id, 3).await;

    let before = relay.poll_session(&id, 0).into_snapshot().unwrap();
    let pairs: Vec<(ChunkKind, &str)> = before
        .chunks
        .iter()
        .map(|c| (c.kind, c.content.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (ChunkKind::Begin, ""),
            (ChunkKind::Item, "hello"),
            (ChunkKind::End, ""),
        ]
    );
    assert!(!before.completed);
    assert_eq!(before.total_count, 3);

    drop(tx);
    assert_eq!(handle.await.unwrap(), RelayState::Completed);

    let after = relay.poll_session(&id, 3).into_snapshot().unwrap();
    assert!(after.completed);
    assert!(after.chunks.is_empty());
    assert_eq!(after.total_count, 3);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(relay.poll_session(&id, 0), PollResult::NotFound);
}

#[tokio::test]
async fn test_start_returns_before_upstream_sends_anything() {
    let (upstream, tx) = ScriptedUpstream::new();
    let relay = relay_with(upstream, Duration::from_secs(60), false);

    let id = relay.start_session(SessionRequest::new("hi"));

    let snapshot = relay.poll_session(&id, 0).into_snapshot().unwrap();
    assert!(snapshot.chunks.is_empty());
    assert!(!snapshot.completed);
    drop(tx);
}

#[tokio::test]
async fn test_payload_and_url_forwarded_upstream() {
    let (upstream, tx) = ScriptedUpstream::new();
    let relay = relay_with(upstream.clone(), Duration::from_secs(60), false);
    drop(tx);

    let (_id, handle) = relay.spawn_session(SessionRequest::new("hello").with_context("conv-7"));
    handle.await.unwrap();

    let requests = upstream.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "http://upstream.test/webhook/ai");
    assert_eq!(
        requests[0].1,
        serde_json::json!({"message": "hello", "session_id": "conv-7"})
    );
}

#[tokio::test]
async fn test_connection_failure_marks_session_failed() {
    let relay = relay_with(Arc::new(RefusingUpstream), Duration::from_millis(20), false);

    let (id, handle) = relay.spawn_session(SessionRequest::new("hi"));
    assert_eq!(handle.await.unwrap(), RelayState::Failed);

    match relay.poll_session(&id, 0) {
        PollResult::Failed(message) => assert!(message.contains("ECONNREFUSED")),
        other => panic!("Expected Failed, got {:?}", other),
    }

    // Failed sessions are kept unless evict_failed is enabled
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(matches!(relay.poll_session(&id, 0), PollResult::Failed(_)));
}

#[tokio::test]
async fn test_failed_session_evicted_when_enabled() {
    let relay = relay_with(Arc::new(RefusingUpstream), Duration::from_millis(20), true);

    let (id, handle) = relay.spawn_session(SessionRequest::new("hi"));
    handle.await.unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(relay.poll_session(&id, 0), PollResult::NotFound);
}

#[tokio::test]
async fn test_transport_error_supersedes_stored_chunks() {
    let (upstream, tx) = ScriptedUpstream::new();
    let relay = relay_with(upstream, Duration::from_secs(60), false);

    let (id, handle) = relay.spawn_session(SessionRequest::new("hi"));
    send(&tx, r#"{"type":"begin"}{"type":"item","content":"partial"}"#);
    wait_for_total(&relay, &id, 2).await;

    tx.send(Err(RelayError::Transport("socket hang up".to_string())))
        .unwrap();
    assert_eq!(handle.await.unwrap(), RelayState::Failed);

    for cursor in [0, 1, 2, 10] {
        match relay.poll_session(&id, cursor) {
            PollResult::Failed(message) => assert!(message.contains("socket hang up")),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_malformed_value_does_not_abort_session() {
    let (upstream, tx) = ScriptedUpstream::new();
    let relay = relay_with(upstream, Duration::from_secs(60), false);

    let (id, handle) = relay.spawn_session(SessionRequest::new("hi"));
    send(&tx, r#"{"type":"item","content":oops}{"type":"item","content":"fine"}"#);
    drop(tx);
    assert_eq!(handle.await.unwrap(), RelayState::Completed);

    let snapshot = relay.poll_session(&id, 0).into_snapshot().unwrap();
    assert_eq!(snapshot.total_count, 1);
    assert_eq!(snapshot.chunks[0].content, "fine");
    assert!(snapshot.completed);
}

#[test]
fn test_builder_requires_client_and_url() {
    assert!(Relay::builder().upstream_url("http://x").build().is_err());
    assert!(Relay::builder()
        .upstream_client(Arc::new(RefusingUpstream))
        .build()
        .is_err());
    assert!(Relay::builder()
        .upstream_client(Arc::new(RefusingUpstream))
        .upstream_url("  ")
        .build()
        .is_err());
}
