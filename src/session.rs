//! Tracking session: wires the device sources into the fusion actor
use hifitime::Duration;
use log::{debug, info, warn};

use tokio::sync::mpsc;

use crate::{
    cfg::Config,
    error::Error,
    fusion::{actor::FusionHandle, selection::SelectionFeed},
    location::{LocationSource, LocationUpdateRate},
    orientation::OrientationSource,
    satellite::SatelliteState,
};

/// [Session] owns the location and orientation sources for the lifetime
/// of one tracking screen. While started, every delivery is forwarded
/// into the [FusionHandle].
pub struct Session<L: LocationSource, O: OrientationSource> {
    location: L,
    orientation: O,
    handle: FusionHandle,
    feed: SelectionFeed,
    location_rate: LocationUpdateRate,
    orientation_sampling: Duration,
    started: bool,
}

impl<L: LocationSource, O: OrientationSource> Session<L, O> {
    /// Creates a new [Session]. The [Config] is validated here.
    pub fn new(
        cfg: &Config,
        location: L,
        orientation: O,
        handle: FusionHandle,
    ) -> Result<Self, Error> {
        cfg.validate()?;
        Ok(Self {
            location,
            orientation,
            feed: SelectionFeed::new(handle.clone()),
            handle,
            location_rate: cfg.location_rate,
            orientation_sampling: cfg.orientation_sampling,
            started: false,
        })
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn handle(&self) -> &FusionHandle {
        &self.handle
    }

    pub fn location_rate(&self) -> LocationUpdateRate {
        self.location_rate
    }

    /// Current selection subscription generation
    pub fn selection_generation(&self) -> u64 {
        self.feed.generation()
    }

    /// Registers both listeners and subscribes to the selection stream.
    /// Must be called within a tokio runtime. Starting twice is a no-op.
    pub fn start(&mut self, selections: mpsc::Receiver<Vec<SatelliteState>>) {
        if self.started {
            warn!("session: already started");
            return;
        }

        self.location.set_update_interval(self.location_rate.interval());
        self.location.register_listener(self.handle.location_listener());

        self.orientation.set_sampling_period(self.orientation_sampling);
        self.orientation.register_listener(self.handle.orientation_listener());

        let generation = self.feed.replace(selections);
        self.started = true;

        info!(
            "session: started (location: {}, selection #{})",
            self.location_rate, generation
        );
    }

    /// Replaces the selection stream, for example when the selection
    /// query changed. The previous subscription is cancelled first.
    pub fn reselect(&mut self, selections: mpsc::Receiver<Vec<SatelliteState>>) -> u64 {
        let generation = self.feed.replace(selections);
        debug!("session: selection #{}", generation);
        generation
    }

    /// Updates the [LocationUpdateRate], applied immediately when started.
    pub fn set_location_rate(&mut self, rate: LocationUpdateRate) {
        self.location_rate = rate;
        if self.started {
            self.location.set_update_interval(rate.interval());
        }
        debug!("session: location rate {}", rate);
    }

    /// Unregisters both listeners and cancels the selection subscription.
    /// Stopping a stopped session does nothing.
    pub fn stop(&mut self) {
        if !self.started {
            return;
        }
        self.location.unregister();
        self.orientation.unregister_listener();
        self.feed.cancel();
        self.started = false;
        info!("session: stopped");
    }
}

impl<L: LocationSource, O: OrientationSource> Drop for Session<L, O> {
    fn drop(&mut self) {
        self.stop();
    }
}
