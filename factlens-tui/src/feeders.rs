use crate::tui::UiMsg;
use factlens_common::ShutdownHandle;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::{self, time};

/// Spawn the two tasks that feed the view's mailbox: one forwarding
/// crossterm input events, one emitting the redraw tick. Both stop on the
/// shutdown signal or when the mailbox closes.
pub fn spawn_ui_feeders(tx: mpsc::Sender<UiMsg>, shutdown: ShutdownHandle, tick_rate: Duration) {
    let tx_in = tx.clone();
    let mut shutdown_input = shutdown.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown_input.recv() => {
                    break;
                }
                ev = tokio::task::spawn_blocking(crossterm::event::read) => {
                    match ev {
                        Ok(Ok(e)) => {
                            if tx_in.send(UiMsg::InputEvent(e)).await.is_err() {
                                break;
                            }
                        }
                        Ok(Err(e)) => {
                            tracing::warn!(error = %e, "terminal input read failed");
                            break;
                        }
                        Err(_) => break,
                    }
                }
            }
        }
    });

    let tx_tick = tx;
    let mut shutdown_tick = shutdown.subscribe();
    tokio::spawn(async move {
        let mut interval = time::interval(tick_rate);
        loop {
            tokio::select! {
                _ = shutdown_tick.recv() => {
                    break;
                }
                _ = interval.tick() => {
                    if tx_tick.try_send(UiMsg::Tick).is_err() && tx_tick.is_closed() {
                        break;
                    }
                }
            }
        }
    });
}
