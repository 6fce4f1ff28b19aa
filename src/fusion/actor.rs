//! Single writer task owning the [FusionState]
use std::sync::Arc;

use log::{debug, info};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::{
    error::Error,
    fusion::{FusionState, TransformSnapshot},
    location::LocationListener,
    math::Matrix4,
    orientation::OrientationListener,
    position::GeodeticPosition,
    satellite::SatelliteState,
    time::Clock,
};

/// Inputs of the [FusionActor]
#[derive(Debug, Clone)]
pub enum FusionEvent {
    /// New location fix (or empty delivery)
    Location(Option<GeodeticPosition>),
    /// New device rotation
    Rotation(Matrix4),
    /// New satellite selection, from selection subscription `generation`
    Satellites {
        generation: u64,
        satellites: Vec<SatelliteState>,
    },
    /// A new selection subscription replaced the previous ones
    SelectionReplaced(u64),
    /// Terminates the [FusionActor]
    Shutdown,
}

/// [FusionHandle] is the cheap, cloneable entry point of the [FusionActor].
/// Producers push events from any thread, consumers read the latest
/// [TransformSnapshot] without ever blocking the writer.
#[derive(Debug, Clone)]
pub struct FusionHandle {
    tx: mpsc::UnboundedSender<FusionEvent>,
    snapshots: watch::Receiver<Arc<TransformSnapshot>>,
}

impl FusionHandle {
    fn send(&self, event: FusionEvent) -> Result<(), Error> {
        self.tx.send(event).map_err(|_| Error::FusionClosed)
    }

    /// Pushes a new location fix
    pub fn push_location(&self, location: Option<GeodeticPosition>) -> Result<(), Error> {
        self.send(FusionEvent::Location(location))
    }

    /// Pushes a new device rotation
    pub fn push_rotation(&self, rotation: Matrix4) -> Result<(), Error> {
        self.send(FusionEvent::Rotation(rotation))
    }

    pub(crate) fn push_satellites(
        &self,
        generation: u64,
        satellites: Vec<SatelliteState>,
    ) -> Result<(), Error> {
        self.send(FusionEvent::Satellites {
            generation,
            satellites,
        })
    }

    pub(crate) fn push_selection_replaced(&self, generation: u64) -> Result<(), Error> {
        self.send(FusionEvent::SelectionReplaced(generation))
    }

    /// Latest published [TransformSnapshot]
    pub fn snapshot(&self) -> Arc<TransformSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Watches every new [TransformSnapshot]
    pub fn subscribe(&self) -> watch::Receiver<Arc<TransformSnapshot>> {
        self.snapshots.clone()
    }

    /// [LocationListener] forwarding to this handle
    pub fn location_listener(&self) -> LocationListener {
        let handle = self.clone();
        Box::new(move |location| {
            if let Err(e) = handle.push_location(location) {
                debug!("location dropped: {}", e);
            }
        })
    }

    /// [OrientationListener] forwarding to this handle
    pub fn orientation_listener(&self) -> OrientationListener {
        let handle = self.clone();
        Box::new(move |rotation| {
            if let Err(e) = handle.push_rotation(rotation) {
                debug!("rotation dropped: {}", e);
            }
        })
    }

    /// Requests the [FusionActor] to terminate
    pub fn shutdown(&self) -> Result<(), Error> {
        self.send(FusionEvent::Shutdown)
    }

    /// True once the [FusionActor] has terminated
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// [FusionActor] serializes every [FusionEvent] into one [FusionState]
/// and publishes a fresh [TransformSnapshot] after each accepted event.
pub struct FusionActor<C: Clock> {
    clock: C,
    state: FusionState,
    rx: mpsc::UnboundedReceiver<FusionEvent>,
    publisher: watch::Sender<Arc<TransformSnapshot>>,
}

impl<C: Clock + 'static> FusionActor<C> {
    /// Spawns a new [FusionActor] on the current tokio runtime.
    /// The [Clock] is sampled once per event.
    pub fn spawn(clock: C) -> (FusionHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (publisher, snapshots) = watch::channel(Arc::new(TransformSnapshot::default()));

        let actor = Self {
            clock,
            rx,
            publisher,
            state: FusionState::new(),
        };

        let task = tokio::spawn(actor.run());
        (FusionHandle { tx, snapshots }, task)
    }

    async fn run(mut self) {
        info!("fusion: started");

        while let Some(event) = self.rx.recv().await {
            let epoch = self.clock.now();

            let updated = match event {
                FusionEvent::Location(location) => self.state.on_location(location, epoch),
                FusionEvent::Rotation(rotation) => self.state.on_rotation(rotation, epoch),
                FusionEvent::Satellites {
                    generation,
                    satellites,
                } => self.state.on_satellites(generation, satellites, epoch),
                FusionEvent::SelectionReplaced(generation) => {
                    self.state.on_selection_replaced(generation);
                    false
                },
                FusionEvent::Shutdown => break,
            };

            if updated {
                let snapshot = Arc::new(self.state.snapshot());
                debug!(
                    "{} - fusion: revision #{} ({})",
                    epoch, snapshot.revision, snapshot.phase
                );
                self.publisher.send_replace(snapshot);
            }
        }

        self.rx.close();
        info!("fusion: stopped (revision #{})", self.state.revision());
    }
}
