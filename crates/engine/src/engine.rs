use std::sync::Arc;

use formats::world_geometry::{GeometryError, WorldGeometry};
use foundation::math::{GeoPoint, Projection, ScreenPoint};
use foundation::pin::{Pin, PinId};
use foundation::time::Time;
use layers::{LandLayer, PinDiff, PinLayer};
use runtime::{EventBus, Frame, FrameClock, Metrics, names};
use scene::components::Transform2D;
use scene::{ElementId, ElementRole, World};
use tracing::{debug, info, trace, warn};
use viewport::{GestureState, PointerId, Release, Transform, ViewportController, WheelInput};

use crate::config::{ConfigError, EngineConfig};
use crate::input::{HitTarget, PointerEvent, PointerPhase, WheelEvent, classify};
use crate::resize::{ContainerSize, ResizeSubscription};
use crate::summary::SceneSummary;

/// Outbound notifications for the host.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    PinSelected(Pin),
    /// A click on the map background or land, converted to geographic coordinates.
    MapClicked(GeoPoint),
}

#[derive(Debug, Clone)]
pub enum GeometryState {
    Unrequested,
    Pending,
    Ready(Arc<WorldGeometry>),
    Failed(String),
}

/// The map: retained scene, projection, viewport and input routing.
///
/// All mutation goes through `&mut self` from host callbacks. Every
/// time-dependent call takes a host timestamp.
pub struct MapEngine {
    config: EngineConfig,
    world: World,
    zoom_group: ElementId,
    land: LandLayer,
    pins: PinLayer,
    viewport: ViewportController,
    projection: Option<Projection>,
    geometry: GeometryState,
    resize_subscription: Option<ResizeSubscription>,
    /// Pin list of the last render, re-projected on resize.
    pin_snapshot: Vec<Pin>,
    clock: FrameClock,
    events: EventBus<MapEvent>,
    metrics: Metrics,
}

impl MapEngine {
    /// Fails if `config` does not pass [`EngineConfig::validate`].
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: EngineConfig) -> Self {
        let mut world = World::new();
        let zoom_group = world.spawn(world.root(), ElementRole::ZoomGroup);
        let land = LandLayer::new(&mut world, zoom_group);
        let pins = PinLayer::new(&mut world, zoom_group);
        let viewport = ViewportController::new(config.viewport);
        Self {
            config,
            world,
            zoom_group,
            land,
            pins,
            viewport,
            projection: None,
            geometry: GeometryState::Unrequested,
            resize_subscription: None,
            pin_snapshot: Vec::new(),
            clock: FrameClock::new(),
            events: EventBus::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn transform(&self) -> Transform {
        self.viewport.transform()
    }

    pub fn gesture_state(&self) -> GestureState {
        self.viewport.state()
    }

    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    pub fn geometry_state(&self) -> &GeometryState {
        &self.geometry
    }

    pub fn is_mounted(&self) -> bool {
        self.resize_subscription.is_some()
    }

    pub fn land(&self) -> &LandLayer {
        &self.land
    }

    pub fn pins(&self) -> &PinLayer {
        &self.pins
    }

    pub fn marker_for(&self, id: &PinId) -> Option<ElementId> {
        self.pins.marker(id)
    }

    /// Attaches to a container of the given size and joins the resize hub.
    ///
    /// Returns `true` if the host should start fetching the world geometry:
    /// on first mount, and on a remount after a failed load.
    pub fn mount(&mut self, size: ContainerSize) -> bool {
        if self.resize_subscription.is_none() {
            self.resize_subscription = Some(ResizeSubscription::subscribe());
        }
        self.apply_size(size);
        let fetch = matches!(
            self.geometry,
            GeometryState::Unrequested | GeometryState::Failed(_)
        );
        if fetch {
            self.geometry = GeometryState::Pending;
        }
        info!(
            width = size.width,
            height = size.height,
            fetch_geometry = fetch,
            "map mounted"
        );
        fetch
    }

    /// Leaves the resize hub. Scene, geometry and transform are kept.
    pub fn unmount(&mut self) {
        if self.resize_subscription.take().is_some() {
            info!("map unmounted");
        }
    }

    /// Completes the geometry fetch started by [`MapEngine::mount`].
    ///
    /// On failure the basemap stays empty; pins keep rendering.
    pub fn finish_geometry_load(&mut self, result: Result<WorldGeometry, GeometryError>) {
        if !matches!(self.geometry, GeometryState::Pending) {
            debug!("geometry result ignored; no load pending");
            return;
        }
        match result {
            Ok(geometry) => {
                info!(
                    features = geometry.len(),
                    skipped = geometry.skipped,
                    "world geometry loaded"
                );
                self.geometry = GeometryState::Ready(Arc::new(geometry));
                self.build_land();
            }
            Err(e) => {
                warn!(error = %e, "world geometry failed to load; basemap left empty");
                self.geometry = GeometryState::Failed(e.to_string());
            }
        }
    }

    fn build_land(&mut self) {
        let (GeometryState::Ready(geometry), Some(projection)) = (&self.geometry, &self.projection)
        else {
            return;
        };
        if self.land.set_geometry(&mut self.world, Arc::clone(geometry), projection) {
            self.metrics
                .set_gauge(names::LAND_PATHS, self.land.paths().len() as i64);
        }
    }

    /// Applies a container size directly (hosts without the resize hub).
    pub fn resize(&mut self, size: ContainerSize) {
        self.apply_size(size);
    }

    fn poll_resize(&mut self) {
        let pending = self
            .resize_subscription
            .as_ref()
            .and_then(|sub| sub.take_pending());
        if let Some(size) = pending {
            self.apply_size(size);
        }
    }

    /// Re-fits the projection and re-lays out land and markers. The viewport
    /// transform is left untouched.
    fn apply_size(&mut self, size: ContainerSize) {
        if !size.is_renderable() {
            debug!(width = size.width, height = size.height, "ignoring empty container size");
            return;
        }
        if let Some(p) = &self.projection
            && p.width() == size.width
            && p.height() == size.height
        {
            return;
        }
        let projection =
            Projection::with_divisor(size.width, size.height, self.config.projection_divisor);
        self.viewport.set_size(size.width, size.height);
        self.projection = Some(projection);
        if self.land.has_geometry() {
            self.land.relayout(&mut self.world, &projection);
        } else {
            self.build_land();
        }
        let snapshot = std::mem::take(&mut self.pin_snapshot);
        self.sync_pins(&snapshot);
        self.pin_snapshot = snapshot;
        debug!(width = size.width, height = size.height, "container resized");
    }

    /// Reconciles markers with `pins`. The viewport transform is preserved.
    pub fn render(&mut self, pins: &[Pin]) -> PinDiff {
        self.poll_resize();
        self.pin_snapshot = pins.to_vec();
        self.metrics.inc_counter(names::RENDERS, 1);
        let diff = self.sync_pins(pins);
        debug!(
            created = diff.created,
            updated = diff.updated,
            removed = diff.removed,
            dropped = diff.dropped,
            "pins rendered"
        );
        diff
    }

    fn sync_pins(&mut self, pins: &[Pin]) -> PinDiff {
        let Some(projection) = self.projection else {
            return PinDiff::default();
        };
        let diff = self.pins.sync(
            &mut self.world,
            pins,
            &projection,
            self.viewport.transform().scale,
            self.config.marker_exponent,
            &mut self.metrics,
        );
        if diff.dropped > 0 {
            trace!(dropped = diff.dropped, "pins outside the projection were skipped");
        }
        diff
    }

    /// Pushes the viewport transform to the zoom group and marker counter-scales.
    fn apply_viewport(&mut self) {
        let t = self.viewport.transform();
        self.world.set_transform(
            self.zoom_group,
            Transform2D::new(t.translate(), t.scale),
        );
        self.pins
            .rescale(&mut self.world, t.scale, self.config.marker_exponent);
        self.metrics.inc_counter(names::VIEWPORT_APPLIES, 1);
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event.phase {
            PointerPhase::Down => self.pointer_down(event.pointer_id, event.point(), event.time),
            PointerPhase::Move => self.pointer_move(event.pointer_id, event.point(), event.time),
            PointerPhase::Up => self.pointer_up(event.pointer_id, event.point(), event.time),
            PointerPhase::Cancel => self.pointer_cancel(event.pointer_id, event.time),
        }
    }

    pub fn pointer_down(&mut self, pointer: PointerId, p: ScreenPoint, now: Time) {
        self.poll_resize();
        self.clock.advance(now);
        let before = self.viewport.transform();
        self.viewport.pointer_down(pointer, p, now);
        if self.viewport.transform() != before {
            self.apply_viewport();
        }
    }

    pub fn pointer_move(&mut self, pointer: PointerId, p: ScreenPoint, now: Time) {
        self.poll_resize();
        self.clock.advance(now);
        if self.viewport.pointer_move(pointer, p) {
            self.apply_viewport();
        }
        if !matches!(self.viewport.state(), GestureState::Panning) {
            self.hover(p);
        }
    }

    pub fn pointer_up(&mut self, pointer: PointerId, p: ScreenPoint, now: Time) {
        self.poll_resize();
        let frame = self.clock.advance(now);
        if let Release::Click(at) = self.viewport.pointer_up(pointer, p) {
            self.click(at, frame);
        }
    }

    pub fn pointer_cancel(&mut self, pointer: PointerId, now: Time) {
        self.clock.advance(now);
        self.viewport.pointer_cancel(pointer);
    }

    /// Pointer left the container: clears hover.
    pub fn pointer_leave(&mut self) {
        self.land.set_hover(&mut self.world, None);
        self.pins.set_hover(&mut self.world, None);
    }

    pub fn wheel(&mut self, event: WheelEvent) {
        self.poll_resize();
        self.clock.advance(event.time);
        let input = WheelInput {
            point: ScreenPoint::new(event.x, event.y),
            delta_y: event.delta_y,
            mode: event.mode,
            ctrl: event.ctrl,
        };
        if self.viewport.wheel(input, event.time) {
            self.apply_viewport();
        }
    }

    fn hover(&mut self, p: ScreenPoint) {
        let (land, marker) = match classify(&self.world, p) {
            HitTarget::Marker(m) => (None, Some(m)),
            HitTarget::Land(l) => (Some(l), None),
            HitTarget::Background => (None, None),
        };
        self.land.set_hover(&mut self.world, land);
        self.pins.set_hover(&mut self.world, marker);
    }

    fn click(&mut self, p: ScreenPoint, frame: Frame) {
        match classify(&self.world, p) {
            HitTarget::Marker(marker) => {
                if let Some(pin) = self.pins.pin_for(marker) {
                    debug!(pin = %pin.id, "pin selected");
                    self.events.emit(frame, MapEvent::PinSelected(pin.clone()));
                }
            }
            HitTarget::Land(_) | HitTarget::Background => {
                let local = self.viewport.transform().invert(p);
                match self.projection.and_then(|proj| proj.inverse(local)) {
                    Some(geo) => {
                        debug!(lon = geo.lon, lat = geo.lat, "map clicked");
                        self.events.emit(frame, MapEvent::MapClicked(geo));
                    }
                    None => {
                        trace!(x = p.x, y = p.y, "click outside the world outline ignored");
                        self.metrics.inc_counter(names::CLICKS_IGNORED, 1);
                    }
                }
            }
        }
    }

    /// Animates to the pin at the focus scale. Pins that cannot be projected are ignored.
    pub fn focus_on_pin(&mut self, pin: &Pin, now: Time) -> bool {
        self.poll_resize();
        self.clock.advance(now);
        let target = self.projection.and_then(|p| p.forward(pin.geo()));
        let started = self.viewport.focus_on(target, now);
        if started {
            info!(pin = %pin.id, "focusing on pin");
        } else {
            debug!(pin = %pin.id, "focus skipped; pin not representable");
        }
        started
    }

    /// Advances animations and timeouts. Returns `true` if the view changed.
    pub fn tick(&mut self, now: Time) -> bool {
        self.poll_resize();
        self.clock.advance(now);
        let changed = self.viewport.tick(now);
        if changed {
            self.apply_viewport();
        }
        changed
    }

    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        self.events.drain().into_iter().map(|s| s.event).collect()
    }

    pub fn summary(&self) -> SceneSummary {
        SceneSummary::capture(self)
    }

    pub(crate) fn pin_snapshot(&self) -> &[Pin] {
        &self.pin_snapshot
    }

    pub(crate) fn zoom_group(&self) -> ElementId {
        self.zoom_group
    }
}

impl Default for MapEngine {
    fn default() -> Self {
        Self::with_valid_config(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resize::{listener_count, notify_resize};
    use formats::world_geometry::LandFeature;
    use foundation::pin::{PinCategory, PinOwner};
    use pretty_assertions::assert_eq;
    use viewport::WheelMode;

    fn size() -> ContainerSize {
        ContainerSize::new(800.0, 600.0)
    }

    fn square_world() -> WorldGeometry {
        let ring = vec![
            GeoPoint::new(-20.0, -20.0),
            GeoPoint::new(20.0, -20.0),
            GeoPoint::new(20.0, 20.0),
            GeoPoint::new(-20.0, 20.0),
            GeoPoint::new(-20.0, -20.0),
        ];
        WorldGeometry {
            features: vec![LandFeature {
                id: Some("SQ".into()),
                name: Some("Square".into()),
                polygons: vec![vec![ring]],
            }],
            skipped: 0,
        }
    }

    fn mounted() -> MapEngine {
        let mut engine = MapEngine::default();
        assert!(engine.mount(size()));
        engine.finish_geometry_load(Ok(square_world()));
        engine
    }

    fn pin(id: &str, lon: f64, lat: f64) -> Pin {
        Pin::new(id, lon, lat, PinCategory::Dream, PinOwner::Shared)
    }

    fn click(engine: &mut MapEngine, x: f64, y: f64, t: f64) {
        let p = ScreenPoint::new(x, y);
        engine.pointer_down(1, p, Time(t));
        engine.pointer_up(1, p, Time(t + 0.05));
    }

    fn zoom_in(engine: &mut MapEngine, x: f64, y: f64, t: f64) {
        engine.wheel(WheelEvent {
            x,
            y,
            delta_y: -500.0,
            mode: WheelMode::Pixel,
            ctrl: false,
            time: Time(t),
        });
    }

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "expected {a} ~= {b}");
    }

    #[test]
    fn geometry_is_requested_once_per_lifetime() {
        let mut engine = MapEngine::default();
        assert!(engine.mount(size()));
        assert_eq!(listener_count(), 1);
        assert!(!engine.mount(size()));
        assert_eq!(listener_count(), 1);
        engine.finish_geometry_load(Ok(square_world()));
        assert!(matches!(engine.geometry_state(), GeometryState::Ready(_)));
        assert_eq!(engine.land().paths().len(), 1);

        engine.unmount();
        assert_eq!(listener_count(), 0);
        assert!(!engine.mount(size()));
        assert_eq!(engine.land().paths().len(), 1);
    }

    #[test]
    fn failed_load_leaves_empty_basemap_until_remount() {
        let mut engine = MapEngine::default();
        assert!(engine.mount(size()));
        engine.finish_geometry_load(Err(GeometryError::NotAFeatureCollection));
        assert!(matches!(engine.geometry_state(), GeometryState::Failed(_)));
        assert!(engine.land().paths().is_empty());

        let diff = engine.render(&[pin("a", 10.0, 10.0)]);
        assert_eq!(diff.created, 1);

        engine.unmount();
        assert!(engine.mount(size()));
        assert!(matches!(engine.geometry_state(), GeometryState::Pending));
        engine.finish_geometry_load(Ok(square_world()));
        assert_eq!(engine.land().paths().len(), 1);
    }

    #[test]
    fn clicking_the_centre_reports_null_island() {
        let mut engine = mounted();
        click(&mut engine, 400.0, 300.0, 0.0);
        let events = engine.drain_events();
        assert_eq!(events.len(), 1);
        let MapEvent::MapClicked(geo) = events[0] else {
            panic!("expected a map click, got {events:?}");
        };
        assert_close(geo.lon, 0.0, 1e-6);
        assert_close(geo.lat, 0.0, 1e-6);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn marker_clicks_select_the_pin_only() {
        let mut engine = mounted();
        let p = pin("paris", 2.35, 48.85);
        engine.render(std::slice::from_ref(&p));
        let anchor = engine.pins().anchor(&p.id).unwrap();

        click(&mut engine, anchor.x, anchor.y - 9.0, 0.0);
        assert_eq!(engine.drain_events(), vec![MapEvent::PinSelected(p.clone())]);

        zoom_in(&mut engine, 100.0, 100.0, 1.0);
        let on_screen = engine.transform().apply(anchor);
        click(&mut engine, on_screen.x, on_screen.y, 2.0);
        assert_eq!(engine.drain_events(), vec![MapEvent::PinSelected(p)]);
    }

    #[test]
    fn background_clicks_invert_the_active_transform() {
        let mut engine = mounted();
        zoom_in(&mut engine, 100.0, 100.0, 0.0);
        assert_eq!(engine.transform().scale, 2.0);

        click(&mut engine, 250.0, 320.0, 1.0);
        let local = engine.transform().invert(ScreenPoint::new(250.0, 320.0));
        let expected = engine.projection().unwrap().inverse(local).unwrap();
        assert_eq!(engine.drain_events(), vec![MapEvent::MapClicked(expected)]);
    }

    #[test]
    fn clicks_outside_the_world_are_ignored() {
        let mut engine = mounted();
        click(&mut engine, 2.0, 2.0, 0.0);
        assert!(engine.drain_events().is_empty());
        assert_eq!(engine.metrics().counter(names::CLICKS_IGNORED), 1);
    }

    #[test]
    fn drags_pan_and_never_click() {
        let mut engine = mounted();
        engine.pointer_down(1, ScreenPoint::new(400.0, 300.0), Time(0.0));
        engine.pointer_move(1, ScreenPoint::new(450.0, 310.0), Time(0.1));
        engine.pointer_up(1, ScreenPoint::new(450.0, 310.0), Time(0.2));
        assert!(engine.drain_events().is_empty());
        assert_eq!(engine.transform(), Transform::new(50.0, 10.0, 1.0));
        assert_eq!(
            engine.world().transform(engine.zoom_group()).unwrap().to_string(),
            "translate(50, 10) scale(1)"
        );
    }

    #[test]
    fn rerender_keeps_transform_and_surviving_markers() {
        let mut engine = mounted();
        let first: Vec<Pin> = (0..10)
            .map(|i| pin(&format!("p{i}"), -120.0 + 25.0 * i as f64, 5.0 * i as f64 - 20.0))
            .collect();
        assert_eq!(engine.render(&first).created, 10);
        zoom_in(&mut engine, 400.0, 300.0, 0.0);
        let view = engine.transform();
        let kept: Vec<ElementId> = first[..8]
            .iter()
            .map(|p| engine.marker_for(&p.id).unwrap())
            .collect();

        let mut second = first[..8].to_vec();
        second.push(pin("n1", 100.0, 10.0));
        second.push(pin("n2", 110.0, -10.0));
        let diff = engine.render(&second);
        assert_eq!(
            diff,
            PinDiff {
                created: 2,
                updated: 8,
                removed: 2,
                dropped: 0
            }
        );
        assert_eq!(engine.transform(), view);
        let after: Vec<ElementId> = first[..8]
            .iter()
            .map(|p| engine.marker_for(&p.id).unwrap())
            .collect();
        assert_eq!(kept, after);

        let factor = 2.0_f64.powf(-0.7);
        for p in &second {
            let el = engine.marker_for(&p.id).unwrap();
            assert_close(engine.world().transform(el).unwrap().scale, factor, 1e-12);
        }
    }

    #[test]
    fn focus_centres_the_pin_at_scale_four() {
        let mut engine = mounted();
        let p = pin("tokyo", 139.7, 35.7);
        engine.render(std::slice::from_ref(&p));
        let anchor = engine.pins().anchor(&p.id).unwrap();

        assert!(engine.focus_on_pin(&p, Time(10.0)));
        assert_eq!(engine.gesture_state(), GestureState::AnimatingFocus);
        assert!(engine.tick(Time(10.3)));
        assert!(engine.tick(Time(11.0)));
        assert_eq!(engine.gesture_state(), GestureState::Idle);

        let t = engine.transform();
        assert_eq!(t.scale, 4.0);
        let centre = t.apply(anchor);
        assert_close(centre.x, 400.0, 1e-9);
        assert_close(centre.y, 300.0, 1e-9);

        let el = engine.marker_for(&p.id).unwrap();
        assert_close(
            engine.world().transform(el).unwrap().scale,
            4.0_f64.powf(-0.7),
            1e-12,
        );
    }

    #[test]
    fn focusing_an_unprojectable_pin_does_nothing() {
        let mut engine = mounted();
        assert!(!engine.focus_on_pin(&pin("bad", 0.0, 95.0), Time(0.0)));
        assert_eq!(engine.gesture_state(), GestureState::Idle);
        assert_eq!(engine.transform(), Transform::IDENTITY);
    }

    #[test]
    fn resize_reprojects_and_keeps_the_view() {
        let mut engine = mounted();
        let p = pin("a", 40.0, 30.0);
        engine.render(std::slice::from_ref(&p));
        zoom_in(&mut engine, 200.0, 200.0, 0.0);
        let view = engine.transform();
        let marker = engine.marker_for(&p.id).unwrap();

        assert_eq!(notify_resize(ContainerSize::new(1600.0, 1200.0)), 1);
        engine.tick(Time(1.0));

        let expected = Projection::fit(1600.0, 1200.0).forward(p.geo()).unwrap();
        assert_eq!(engine.pins().anchor(&p.id), Some(expected));
        assert_eq!(engine.marker_for(&p.id), Some(marker));
        assert_eq!(engine.transform(), view);
        assert_eq!(engine.summary().width, 1600.0);
    }

    #[test]
    fn pins_rendered_before_sizing_appear_on_mount() {
        let mut engine = MapEngine::default();
        assert_eq!(engine.render(&[pin("a", 0.0, 0.0)]), PinDiff::default());
        engine.mount(size());
        let anchor = engine.pins().anchor(&PinId::new("a")).unwrap();
        assert_close(anchor.x, 400.0, 1e-9);
        assert_close(anchor.y, 300.0, 1e-9);
    }

    #[test]
    fn hover_tracks_land_under_pointer() {
        let mut engine = mounted();
        let path = engine.land().paths()[0];
        engine.handle_pointer(PointerEvent::new(
            7,
            PointerPhase::Move,
            400.0,
            300.0,
            Time(0.0),
        ));
        assert_eq!(engine.land().hovered(), Some(path));
        assert!(engine.world().is_hovered(path));

        engine.handle_pointer(PointerEvent::new(7, PointerPhase::Move, 2.0, 2.0, Time(0.1)));
        assert_eq!(engine.land().hovered(), None);
        assert!(!engine.world().is_hovered(path));
    }

    #[test]
    fn summary_lists_markers_in_render_order() {
        let mut engine = mounted();
        engine.render(&[pin("b", 10.0, 0.0), pin("a", -10.0, 0.0)]);
        let summary = engine.summary();
        let ids: Vec<&str> = summary.markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(summary.marker_groups, 2);
        assert_eq!(summary.land_paths, 1);
        assert_eq!(summary.markers[0].color, "#f59e0b");
        assert_eq!(summary.zoom_group_transform, "translate(0, 0) scale(1)");
    }

    #[test]
    fn focus_converges_from_a_panned_max_zoom_view() {
        let mut engine = mounted();
        let p = pin("sydney", 151.2, -33.9);
        engine.render(std::slice::from_ref(&p));
        let anchor = engine.pins().anchor(&p.id).unwrap();
        let centre = ScreenPoint::new(400.0, 300.0);

        engine.pointer_down(1, ScreenPoint::new(100.0, 100.0), Time(0.0));
        engine.pointer_move(1, ScreenPoint::new(700.0, 500.0), Time(0.1));
        engine.pointer_up(1, ScreenPoint::new(700.0, 500.0), Time(0.2));
        engine.wheel(WheelEvent {
            x: 50.0,
            y: 50.0,
            delta_y: -5000.0,
            mode: WheelMode::Pixel,
            ctrl: false,
            time: Time(0.3),
        });
        let start = engine.transform();
        assert_eq!(start.scale, 15.0);
        assert!(start.apply(anchor).distance(centre) > 1000.0);

        assert!(engine.focus_on_pin(&p, Time(1.0)));
        engine.tick(Time(1.4));
        engine.tick(Time(1.75));
        assert_eq!(engine.gesture_state(), GestureState::Idle);

        let t = engine.transform();
        assert_eq!(t.scale, 4.0);
        let on_screen = t.apply(anchor);
        assert_close(on_screen.x, 400.0, 1e-9);
        assert_close(on_screen.y, 300.0, 1e-9);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn inconsistent_config_is_rejected_up_front() {
        let mut config = EngineConfig::default();
        config.viewport.min_scale = 10.0;
        config.viewport.max_scale = 2.0;
        assert!(matches!(
            MapEngine::new(config),
            Err(ConfigError::OutOfRange { .. })
        ));

        let mut config = EngineConfig::default();
        config.viewport.max_scale = f64::NAN;
        assert!(MapEngine::new(config).is_err());
        assert!(MapEngine::new(EngineConfig::default()).is_ok());
    }
}
