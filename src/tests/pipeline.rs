use crate::{
    cfg::Config,
    fusion::{actor::FusionActor, FusionPhase, TransformSnapshot},
    math::{point, Matrix4},
    position::GeodeticPosition,
    projection::ScreenOffset,
    render::{Canvas, Color, RenderPass},
    satellite::{SatelliteId, SatelliteState},
    scene::Scene,
    tests::{init_logger, reference_clock, reference_epoch, StubPropagator},
};

use std::sync::Arc;

/// Counts draw calls per color
#[derive(Default)]
struct CountingCanvas {
    circles: Vec<(ScreenOffset, Color)>,
    lines: usize,
}

impl Canvas for CountingCanvas {
    fn width(&self) -> f64 {
        1000.0
    }
    fn height(&self) -> f64 {
        1000.0
    }
    fn draw_circle(&mut self, center: ScreenOffset, _: f64, color: Color) {
        self.circles.push((center, color));
    }
    fn draw_line(&mut self, _: ScreenOffset, _: ScreenOffset, _: Color, _: f64) {
        self.lines += 1;
    }
}

impl CountingCanvas {
    fn markers(&self) -> Vec<ScreenOffset> {
        self.circles
            .iter()
            .filter(|(_, color)| *color == Color::MAGENTA)
            .map(|(center, _)| *center)
            .collect()
    }
}

fn satellite(id: u32, name: &str, eci: (f64, f64, f64)) -> SatelliteState {
    let stub = StubPropagator::spherical(point(eci.0, eci.1, eci.2));
    SatelliteState::new(SatelliteId(id), name, Arc::new(stub))
}

/// Device lying screen down: the camera looks at the zenith,
/// east on the right, north at the bottom of the screen.
fn facing_zenith() -> Matrix4 {
    let mut rotation = Matrix4::identity();
    rotation[(1, 1)] = -1.0;
    rotation[(2, 2)] = -1.0;
    rotation
}

async fn live_snapshot(satellites: Vec<SatelliteState>) -> Arc<TransformSnapshot> {
    let (handle, actor) = FusionActor::spawn(reference_clock());
    let mut updates = handle.subscribe();

    // equatorial observer, on the reference meridian
    handle
        .push_location(Some(GeodeticPosition::new(0.0, 0.0, 0.0)))
        .unwrap();
    handle.push_rotation(facing_zenith()).unwrap();
    handle.push_satellites(1, satellites).unwrap();

    let snapshot = loop {
        updates.changed().await.unwrap();
        let snapshot = updates.borrow_and_update().clone();
        if snapshot.phase == FusionPhase::Live {
            break snapshot;
        }
    };

    handle.shutdown().unwrap();
    actor.await.unwrap();
    snapshot
}

#[tokio::test]
async fn overhead_pass() {
    init_logger();
    let snapshot = live_snapshot(vec![
        satellite(1, "EAST", (7000.0, 100.0, 0.0)),
        satellite(2, "ZENITH", (7000.0, 0.0, 0.0)),
        satellite(3, "NORTH", (7000.0, 0.0, 100.0)),
        satellite(4, "BELOW", (6000.0, 0.0, 0.0)),
        satellite(5, "LOW EAST", (6400.0, 3000.0, 0.0)),
    ])
    .await;

    let cfg = Config::default();
    let scene = Scene::new(&cfg).unwrap();
    let mut canvas = CountingCanvas::default();

    let frame = scene
        .compose(&snapshot, canvas.width(), canvas.height(), reference_epoch())
        .unwrap();

    let visible = frame
        .drawables
        .iter()
        .map(|drawable| drawable.satellite.name())
        .collect::<Vec<_>>();
    assert_eq!(visible, vec!["EAST", "ZENITH", "NORTH"]);

    let target = frame.target.as_ref().unwrap();
    assert_eq!(target.name, "ZENITH");
    assert_eq!(target.id, SatelliteId(2));
    let sub_point = target.sub_point.unwrap();
    assert!(sub_point.latitude_deg.abs() < 1.0E-9);
    assert!(sub_point.longitude_deg.abs() < 1.0E-9);

    RenderPass::new(&cfg).draw(&mut canvas, &frame, &snapshot.rotation);

    let markers = canvas.markers();
    assert_eq!(markers.len(), 3);

    let center = ScreenOffset::center(canvas.width(), canvas.height());
    assert!(markers[0].x > center.x, "east is on the right");
    assert!((markers[0].y - center.y).abs() < 1.0E-6);
    assert!(markers[1].distance(&center) < 1.0E-6, "zenith under the crosshair");
    assert!(markers[2].y > center.y, "north is at the bottom");
    assert!((markers[2].x - center.x).abs() < 1.0E-6);

    // highlighted cursor
    assert!(canvas.circles.iter().any(|(_, color)| *color == Color::YELLOW));
    // three gizmo arrows and two crosshair lines
    assert_eq!(canvas.lines, 5);
}

#[tokio::test]
async fn horizon_clipping_can_be_disabled() {
    init_logger();

    // seen from the equator, on the reference meridian, 100 km below the horizon plane
    let snapshot = live_snapshot(vec![satellite(1, "SET", (6278.0, 20_000.0, 0.0))]).await;

    let clipped = Scene::new(&Config::default()).unwrap();
    let frame = clipped
        .compose(&snapshot, 1000.0, 1000.0, reference_epoch())
        .unwrap();
    assert!(frame.drawables.is_empty());

    // looking east: south on the right, zenith up
    let mut rotation = Matrix4::identity();
    rotation[(0, 0)] = 0.0;
    rotation[(0, 1)] = -1.0;
    rotation[(1, 1)] = 0.0;
    rotation[(1, 2)] = 1.0;
    rotation[(2, 0)] = -1.0;
    rotation[(2, 2)] = 0.0;

    let mut snapshot = (*snapshot).clone();
    snapshot.eci_to_phone = rotation * snapshot.eci_to_local;

    let frame = clipped
        .compose(&snapshot, 1000.0, 1000.0, reference_epoch())
        .unwrap();
    assert!(frame.drawables.is_empty(), "still below the horizon");

    let unclipped = Scene::new(&Config::default().with_horizon_clip(false)).unwrap();
    let frame = unclipped
        .compose(&snapshot, 1000.0, 1000.0, reference_epoch())
        .unwrap();
    assert_eq!(frame.drawables.len(), 1);
    let (x, y) = frame.drawables[0].ndc();
    assert!(x.abs() < 1.0E-9);
    assert!(y < 0.0 && y > -1.0);
}
