//! The streaming transport task: one WebSocket connection per session.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use stockgrid_core::stream::StreamSession;
use stockgrid_core::{QuoteUpdate, Symbol};

use crate::config::FinnhubConfig;
use crate::wire;

/// Spawn the connection task and wrap it in a session.
///
/// The connect itself happens inside the task: a failed connect is logged and
/// the session simply never delivers, so callers must not depend on the
/// stream being live.
pub(crate) fn spawn_stream(
    cfg: FinnhubConfig,
    symbols: Arc<[Symbol]>,
    capacity: usize,
) -> (StreamSession, mpsc::Receiver<QuoteUpdate>) {
    let (tx, rx) = mpsc::channel(capacity);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let task_symbols = Arc::clone(&symbols);
    let join = tokio::spawn(run_connection(cfg, task_symbols, tx, stop_rx));
    (StreamSession::new(symbols, join, stop_tx), rx)
}

async fn run_connection(
    cfg: FinnhubConfig,
    symbols: Arc<[Symbol]>,
    tx: mpsc::Sender<QuoteUpdate>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let url = format!("{}?token={}", cfg.ws_url, cfg.api_key);

    let ws = tokio::select! {
        _ = &mut stop_rx => return,
        res = connect_async(&url) => match res {
            Ok((ws, _response)) => ws,
            Err(e) => {
                tracing::warn!(error = %e, url = %cfg.ws_url, "stream connect failed");
                return;
            }
        }
    };
    tracing::info!(url = %cfg.ws_url, symbols = symbols.len(), "stream connected");

    let (mut write, mut read) = ws.split();

    for symbol in symbols.iter() {
        if let Err(e) = write
            .send(Message::text(wire::subscribe_frame(symbol)))
            .await
        {
            tracing::warn!(error = %e, %symbol, "subscribe send failed");
            return;
        }
    }

    let subscribed: HashSet<&Symbol> = symbols.iter().collect();
    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    for update in wire::decode_frame(text.as_str()) {
                        if !subscribed.contains(&update.symbol) {
                            continue;
                        }
                        if tx.send(update).await.is_err() {
                            // Downstream dropped the receiver; tear down.
                            break;
                        }
                    }
                    if tx.is_closed() {
                        break;
                    }
                }
                Some(Ok(Message::Ping(payload))) => {
                    let _ = write.send(Message::Pong(payload)).await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("stream closed by server");
                    return;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "stream transport error");
                    return;
                }
            }
        }
    }

    // Graceful teardown: unsubscribe each symbol while the socket is still
    // open, then close.
    for symbol in symbols.iter() {
        if write
            .send(Message::text(wire::unsubscribe_frame(symbol)))
            .await
            .is_err()
        {
            break;
        }
    }
    let _ = write.send(Message::Close(None)).await;
    tracing::debug!("stream session closed");
}
