//! JSON-lines page session.
//!
//! The browser side pushes one message per line: full tree snapshots, mutation
//! notices and key presses. Clicks travel back the same way.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use kanal::{AsyncReceiver, AsyncSender};
use rote_core::{Page, PageError, UiTree};
use rote_types::{NodeId, PageSignal};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Inbound {
    Snapshot { tree: UiTree },
    Mutated,
    Key { key: String },
    Closed,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Outbound {
    Click { node: NodeId },
}

/// [`Page`] over a line-delimited JSON stream pair
pub struct BridgePage<W> {
    tree: Arc<RwLock<Option<UiTree>>>,
    writer: Mutex<W>,
    closed: Arc<AtomicBool>,
    signal_rx: AsyncReceiver<PageSignal>,
    reader: JoinHandle<()>,
}

impl<W> BridgePage<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Start reading `reader` in the background. Must be called inside a tokio runtime.
    pub fn connect<R>(reader: R, writer: W) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let tree = Arc::new(RwLock::new(None));
        let closed = Arc::new(AtomicBool::new(false));
        let (signal_tx, signal_rx) = kanal::unbounded_async();

        let reader = tokio::spawn(read_loop(reader, tree.clone(), closed.clone(), signal_tx));

        Self {
            tree,
            writer: Mutex::new(writer),
            closed,
            signal_rx,
            reader,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn send(&self, message: &Outbound) -> Result<(), PageError> {
        let mut line = serde_json::to_vec(message)?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        let written = async {
            writer.write_all(&line).await?;
            writer.flush().await
        }
        .await;

        written.map_err(|e| match e.kind() {
            std::io::ErrorKind::BrokenPipe => PageError::Disconnected,
            _ => PageError::Transport(e),
        })
    }
}

impl<W> Drop for BridgePage<W> {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[async_trait]
impl<W> Page for BridgePage<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn snapshot(&self) -> Result<UiTree, PageError> {
        if self.is_closed() {
            return Err(PageError::Disconnected);
        }
        self.tree.read().await.clone().ok_or(PageError::NoSnapshot)
    }

    async fn click(&self, node: NodeId) -> Result<(), PageError> {
        if self.is_closed() {
            return Err(PageError::Disconnected);
        }
        tracing::trace!(node = %node, "click");
        self.send(&Outbound::Click { node }).await
    }

    async fn contains_text(&self, needle: &str) -> Result<bool, PageError> {
        if self.is_closed() {
            return Err(PageError::Disconnected);
        }
        let tree = self.tree.read().await;
        Ok(tree.as_ref().is_some_and(|tree| tree.contains_text(needle)))
    }

    fn subscribe(&self) -> AsyncReceiver<PageSignal> {
        self.signal_rx.clone()
    }
}

async fn read_loop<R>(
    reader: R,
    tree: Arc<RwLock<Option<UiTree>>>,
    closed: Arc<AtomicBool>,
    signal_tx: AsyncSender<PageSignal>,
) where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::info!("Page bridge reached end of input");
                break;
            }
            Err(e) => {
                tracing::warn!("Page bridge read failed: {}", e);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let signal = match serde_json::from_str::<Inbound>(line) {
            Ok(Inbound::Snapshot { tree: next }) => {
                tracing::trace!(nodes = next.len(), "snapshot received");
                *tree.write().await = Some(next);
                PageSignal::Mutated
            }
            Ok(Inbound::Mutated) => PageSignal::Mutated,
            Ok(Inbound::Key { key }) => PageSignal::Key(key),
            Ok(Inbound::Closed) => {
                tracing::info!("Page reported closed");
                break;
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed bridge message: {}", e);
                continue;
            }
        };

        if signal_tx.send(signal).await.is_err() {
            break;
        }
    }

    closed.store(true, Ordering::SeqCst);
    let _ = signal_tx.send(PageSignal::Closed).await;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rote_core::Selector;
    use rote_core::testing::el;
    use tokio::io::{BufReader, DuplexStream};
    use tokio::time::timeout;

    use super::*;

    struct Harness {
        page: BridgePage<DuplexStream>,
        /// Browser end: what the page session sends
        inbound: DuplexStream,
        /// Browser end: what the engine sent
        outbound: BufReader<DuplexStream>,
    }

    fn connect() -> Harness {
        let (engine_in, inbound) = tokio::io::duplex(64 * 1024);
        let (engine_out, outbound) = tokio::io::duplex(64 * 1024);
        Harness {
            page: BridgePage::connect(BufReader::new(engine_in), engine_out),
            inbound,
            outbound: BufReader::new(outbound),
        }
    }

    async fn next_signal(page: &BridgePage<DuplexStream>) -> PageSignal {
        timeout(Duration::from_secs(1), page.subscribe().recv())
            .await
            .expect("signal in time")
            .expect("signal channel open")
    }

    #[tokio::test]
    async fn snapshot_is_cached_and_announced() {
        let mut h = connect();
        assert!(matches!(h.page.snapshot().await, Err(PageError::NoSnapshot)));

        let tree = el("body")
            .child(el("h1").class("banner").text("HOMEWORK COMPLETE"))
            .build();
        let line = format!(
            "{{\"type\":\"snapshot\",\"tree\":{}}}\n",
            serde_json::to_string(&tree).unwrap()
        );
        h.inbound.write_all(line.as_bytes()).await.unwrap();

        assert_eq!(next_signal(&h.page).await, PageSignal::Mutated);
        let cached = h.page.snapshot().await.unwrap();
        assert!(cached.find(&Selector::class("banner")).is_some());
        assert!(h.page.contains_text("HOMEWORK COMPLETE").await.unwrap());
        assert!(!h.page.contains_text("nothing here").await.unwrap());
    }

    #[tokio::test]
    async fn deeply_nested_pages_still_arrive() {
        let mut h = connect();

        let mut nodes = vec![r#"{"id":0,"tag":"body"}"#.to_string()];
        for id in 1..=500 {
            nodes.push(format!(r#"{{"id":{id},"parent":{},"tag":"div"}}"#, id - 1));
        }
        nodes.push(r#"{"id":501,"parent":500,"tag":"h1","text":"HOMEWORK COMPLETE"}"#.to_string());
        let line = format!("{{\"type\":\"snapshot\",\"tree\":[{}]}}\n", nodes.join(","));
        h.inbound.write_all(line.as_bytes()).await.unwrap();

        assert_eq!(next_signal(&h.page).await, PageSignal::Mutated);
        let cached = h.page.snapshot().await.unwrap();
        assert_eq!(cached.len(), 502);
        assert!(h.page.contains_text("HOMEWORK COMPLETE").await.unwrap());
    }

    #[tokio::test]
    async fn keys_and_mutations_are_forwarded_past_garbage() {
        let mut h = connect();
        h.inbound
            .write_all(b"not json\n\n{\"type\":\"key\",\"key\":\"q\"}\n{\"type\":\"mutated\"}\n")
            .await
            .unwrap();

        assert_eq!(next_signal(&h.page).await, PageSignal::Key("q".into()));
        assert_eq!(next_signal(&h.page).await, PageSignal::Mutated);
    }

    #[tokio::test]
    async fn click_is_written_as_one_line() {
        let mut h = connect();
        h.page.click(NodeId(7)).await.unwrap();

        let mut line = String::new();
        h.outbound.read_line(&mut line).await.unwrap();
        assert_eq!(line, "{\"type\":\"click\",\"node\":7}\n");
    }

    #[tokio::test]
    async fn end_of_input_closes_the_session() {
        let h = connect();
        drop(h.inbound);

        assert_eq!(next_signal(&h.page).await, PageSignal::Closed);
        assert!(h.page.is_closed());
        assert!(matches!(h.page.click(NodeId(1)).await, Err(PageError::Disconnected)));
        assert!(matches!(h.page.snapshot().await, Err(PageError::Disconnected)));
    }

    #[tokio::test]
    async fn closed_message_ends_the_session() {
        let mut h = connect();
        h.inbound.write_all(b"{\"type\":\"closed\"}\n").await.unwrap();

        assert_eq!(next_signal(&h.page).await, PageSignal::Closed);
        assert!(matches!(
            h.page.contains_text("x").await,
            Err(PageError::Disconnected)
        ));
    }
}
