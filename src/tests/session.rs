use crate::{
    cfg::Config,
    error::Error,
    fusion::{actor::FusionActor, FusionPhase},
    location::{LocationListener, LocationSource, LocationUpdateRate},
    math::{point, Matrix4},
    orientation::{
        OrientationGate, OrientationListener, OrientationSource, ScreenRotation, SensorAccuracy,
    },
    position::GeodeticPosition,
    satellite::{SatelliteId, SatelliteState},
    session::Session,
    tests::{init_logger, reference_clock, reference_location, wait_for, StubPropagator},
};

use hifitime::Duration;

use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Location source driven by the test
#[derive(Clone, Default)]
struct MockLocation {
    listener: Arc<Mutex<Option<LocationListener>>>,
    intervals: Arc<Mutex<Vec<Duration>>>,
    registrations: Arc<Mutex<usize>>,
}

impl LocationSource for MockLocation {
    fn register_listener(&mut self, listener: LocationListener) {
        *self.registrations.lock().unwrap() += 1;
        *self.listener.lock().unwrap() = Some(listener);
    }
    fn unregister(&mut self) {
        *self.listener.lock().unwrap() = None;
    }
    fn set_update_interval(&mut self, interval: Duration) {
        self.intervals.lock().unwrap().push(interval);
    }
}

impl MockLocation {
    /// Delivers a fix, returns false when nobody listens
    fn deliver(&self, fix: Option<GeodeticPosition>) -> bool {
        match self.listener.lock().unwrap().as_mut() {
            Some(listener) => {
                listener(fix);
                true
            },
            None => false,
        }
    }
}

/// Rotation sensor driven by the test, gated like a real one
#[derive(Clone)]
struct MockOrientation {
    gate: Arc<Mutex<OrientationGate>>,
    listener: Arc<Mutex<Option<OrientationListener>>>,
    sampling: Arc<Mutex<Option<Duration>>>,
}

impl MockOrientation {
    fn new(display: ScreenRotation) -> Self {
        Self {
            gate: Arc::new(Mutex::new(OrientationGate::new(display))),
            listener: Default::default(),
            sampling: Default::default(),
        }
    }

    fn set_accuracy(&self, accuracy: SensorAccuracy) {
        self.gate.lock().unwrap().on_accuracy_changed(accuracy);
    }

    /// Raw sensor reading, returns true when forwarded
    fn deliver(&self, raw: Matrix4) -> bool {
        let Some(rotation) = self.gate.lock().unwrap().process(&raw) else {
            return false;
        };
        match self.listener.lock().unwrap().as_mut() {
            Some(listener) => {
                listener(rotation);
                true
            },
            None => false,
        }
    }
}

impl OrientationSource for MockOrientation {
    fn register_listener(&mut self, listener: OrientationListener) {
        *self.listener.lock().unwrap() = Some(listener);
    }
    fn unregister_listener(&mut self) {
        *self.listener.lock().unwrap() = None;
    }
    fn set_sampling_period(&mut self, period: Duration) {
        *self.sampling.lock().unwrap() = Some(period);
    }
}

fn satellite(id: u32) -> SatelliteState {
    let stub = StubPropagator::spherical(point(7000.0, 0.0, 0.0));
    SatelliteState::new(SatelliteId(id), &format!("SAT-{}", id), Arc::new(stub))
}

#[tokio::test]
async fn invalid_config_is_rejected() {
    let cfg = Config::default().with_clip_planes(10.0, 1.0);
    let (handle, _actor) = FusionActor::spawn(reference_clock());
    let session = Session::new(
        &cfg,
        MockLocation::default(),
        MockOrientation::new(ScreenRotation::Rotation0),
        handle,
    );
    assert!(matches!(session, Err(Error::InvalidClipPlanes { .. })));
}

#[tokio::test]
async fn session_lifecycle() {
    init_logger();
    let cfg = Config::default();

    let (handle, actor) = FusionActor::spawn(reference_clock());
    let mut updates = handle.subscribe();

    let gps = MockLocation::default();
    let sensor = MockOrientation::new(ScreenRotation::Rotation90);

    let mut session = Session::new(&cfg, gps.clone(), sensor.clone(), handle.clone()).unwrap();
    assert!(!session.is_started());
    assert!(!gps.deliver(Some(reference_location())), "not registered yet");

    let (selections, rx) = mpsc::channel(4);
    session.start(rx);
    assert!(session.is_started());
    assert_eq!(session.selection_generation(), 1);

    // starting twice does not register twice
    let (_unused, rx) = mpsc::channel(4);
    session.start(rx);
    assert_eq!(*gps.registrations.lock().unwrap(), 1);
    assert_eq!(session.selection_generation(), 1);

    assert_eq!(
        gps.intervals.lock().unwrap().as_slice(),
        &[LocationUpdateRate::Normal.interval()]
    );
    assert_eq!(*sensor.sampling.lock().unwrap(), Some(cfg.orientation_sampling));

    // unreliable sensor: nothing forwarded
    assert!(!sensor.deliver(Matrix4::identity()));

    assert!(gps.deliver(None));
    assert!(gps.deliver(Some(reference_location())));
    selections.send(vec![satellite(1)]).await.unwrap();

    let partial = wait_for(&mut updates, |s| !s.satellites.is_empty()).await;
    assert_eq!(partial.phase, FusionPhase::Partial);
    assert_eq!(partial.rotation, Matrix4::identity());

    sensor.set_accuracy(SensorAccuracy::High);
    assert!(sensor.deliver(Matrix4::identity()));

    let live = wait_for(&mut updates, |s| s.phase == FusionPhase::Live).await;
    assert_eq!(live.rotation, ScreenRotation::Rotation90.remap(&Matrix4::identity()));
    assert_ne!(live.eci_to_phone, partial.eci_to_phone);

    session.set_location_rate(LocationUpdateRate::Fast);
    assert_eq!(session.location_rate(), LocationUpdateRate::Fast);
    assert_eq!(
        gps.intervals.lock().unwrap().last(),
        Some(&LocationUpdateRate::Fast.interval())
    );

    session.stop();
    assert!(!session.is_started());
    assert!(!gps.deliver(Some(reference_location())));
    assert!(!sensor.deliver(Matrix4::identity()));

    // stopping twice is harmless
    session.stop();
    assert_eq!(session.selection_generation(), 2);

    // restart with a new selection stream
    let (selections, rx) = mpsc::channel(4);
    session.start(rx);
    assert_eq!(session.selection_generation(), 3);
    assert_eq!(*gps.registrations.lock().unwrap(), 2);
    selections.send(vec![satellite(2), satellite(3)]).await.unwrap();
    wait_for(&mut updates, |s| s.satellites.len() == 2).await;

    drop(session);
    assert!(!gps.deliver(None), "dropping the session unregisters");

    handle.shutdown().unwrap();
    actor.await.unwrap();
}

#[tokio::test]
async fn reselection_replaces_subscription() {
    init_logger();
    let (handle, actor) = FusionActor::spawn(reference_clock());
    let mut updates = handle.subscribe();

    let mut session = Session::new(
        &Config::default(),
        MockLocation::default(),
        MockOrientation::new(ScreenRotation::Rotation0),
        handle.clone(),
    )
    .unwrap();

    let (first, rx) = mpsc::channel(4);
    session.start(rx);

    let (second, rx) = mpsc::channel(4);
    assert_eq!(session.reselect(rx), 2);

    let _ = first.send(vec![satellite(1)]).await;
    second.send(vec![satellite(2)]).await.unwrap();

    let snapshot = wait_for(&mut updates, |s| !s.satellites.is_empty()).await;
    assert_eq!(snapshot.satellites[0].id(), SatelliteId(2));

    session.stop();
    handle.shutdown().unwrap();
    actor.await.unwrap();
}
