//! Satellite selection subscription
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use log::{debug, warn};

use tokio::{sync::mpsc, task::JoinHandle};

use crate::{fusion::actor::FusionHandle, satellite::SatelliteState};

/// [SelectionFeed] forwards one selection stream at a time into the
/// [FusionHandle]. Replacing the stream cancels the previous subscription
/// before the new one starts, and the fusion state drops anything the
/// cancelled subscription may still have in flight.
#[derive(Debug)]
pub struct SelectionFeed {
    handle: FusionHandle,
    current: Option<JoinHandle<()>>,
    generation: Arc<AtomicU64>,
}

impl SelectionFeed {
    pub fn new(handle: FusionHandle) -> Self {
        Self {
            handle,
            current: None,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current subscription generation. 0 means never subscribed.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// True while a subscription is forwarding
    pub fn is_active(&self) -> bool {
        self.current
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Retires the current subscription, returns the new generation
    fn retire(&mut self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        if let Some(task) = self.current.take() {
            task.abort();
            debug!("selection: subscription #{} cancelled", generation - 1);
        }

        if let Err(e) = self.handle.push_selection_replaced(generation) {
            warn!("selection: {}", e);
        }

        generation
    }

    /// Subscribes to a new selection stream. Must be called
    /// within a tokio runtime. Returns the new subscription generation.
    pub fn replace(&mut self, mut selections: mpsc::Receiver<Vec<SatelliteState>>) -> u64 {
        let generation = self.retire();
        let current = self.generation.clone();
        let handle = self.handle.clone();

        self.current = Some(tokio::spawn(async move {
            debug!("selection: subscription #{} started", generation);

            while let Some(satellites) = selections.recv().await {
                if current.load(Ordering::Acquire) != generation {
                    break;
                }
                if handle.push_satellites(generation, satellites).is_err() {
                    debug!("selection: fusion closed");
                    break;
                }
            }

            debug!("selection: subscription #{} terminated", generation);
        }));

        generation
    }

    /// Cancels the current subscription, if any
    pub fn cancel(&mut self) {
        if self.current.is_some() {
            self.retire();
        }
    }
}

impl Drop for SelectionFeed {
    fn drop(&mut self) {
        if let Some(task) = self.current.take() {
            task.abort();
        }
    }
}
