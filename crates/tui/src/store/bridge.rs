//! Tasks that carry controller updates from the runtime over to the event bus.
//!
//! Each one exits once either side goes away.
use coursebook_client::{
    controller::{Notice, SubmitError},
    Course,
};
use log::debug;
use std::sync::mpsc::Sender;
use tokio::{
    runtime::Handle,
    sync::{broadcast, oneshot, watch},
};

use super::Event;
use crate::event::Event as CrateEvent;

/// Send every new value of `rx` down the bus
pub(super) fn forward_state<T>(
    events: &Sender<CrateEvent>,
    rt: &Handle,
    mut rx: watch::Receiver<T>,
    wrap: fn(T) -> Event,
) where
    T: Clone + Send + Sync + 'static,
{
    let events = events.clone();
    rt.spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            if events.send(CrateEvent::Store(wrap(state))).is_err() {
                break;
            }
        }

        debug!("state forwarder shutting down");
    });
}

pub(super) fn forward_notices(
    events: &Sender<CrateEvent>,
    rt: &Handle,
    mut rx: broadcast::Receiver<Notice>,
) {
    let events = events.clone();
    rt.spawn(async move {
        loop {
            let notice = match rx.recv().await {
                Ok(n) => n,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    debug!("missed {} notices", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            if events.send(CrateEvent::Store(Event::Notice(notice))).is_err() {
                break;
            }
        }

        debug!("notice forwarder shutting down");
    });
}

/// Send the result of a submit or save, if it ever arrives
pub(super) fn forward_saved(
    events: &Sender<CrateEvent>,
    rt: &Handle,
    recv: oneshot::Receiver<Result<Course, SubmitError>>,
) {
    let events = events.clone();
    rt.spawn(async move {
        match recv.await {
            Ok(r) => {
                let _ = events.send(CrateEvent::Store(Event::Saved(r)));
            }
            Err(_) => debug!("save was abandoned"),
        }
    });
}
