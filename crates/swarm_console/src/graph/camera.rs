use super::layout::GraphPoint;

pub const MIN_ZOOM: f32 = 0.3;
pub const MAX_ZOOM: f32 = 3.0;
pub const ZOOM_IN_FACTOR: f32 = 1.3;
pub const ZOOM_OUT_FACTOR: f32 = 0.7;
/// Screen-space margin kept around the content by `fit`.
pub const FIT_PADDING: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> GraphPoint {
        GraphPoint::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Axis-aligned world-space box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphBounds {
    pub min: GraphPoint,
    pub max: GraphPoint,
}

impl GraphBounds {
    /// Box around every point grown by `margin`; `None` for no points.
    pub fn around<I>(points: I, margin: f32) -> Option<Self>
    where
        I: IntoIterator<Item = GraphPoint>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut min, mut max) = (first, first);
        for point in points {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }
        Some(Self {
            min: GraphPoint::new(min.x - margin, min.y - margin),
            max: GraphPoint::new(max.x + margin, max.y + margin),
        })
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> GraphPoint {
        GraphPoint::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}

/// Pan/zoom state; screen coordinates are relative to the viewport's top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphCamera {
    center: GraphPoint,
    zoom: f32,
}

impl Default for GraphCamera {
    fn default() -> Self {
        Self {
            center: GraphPoint::ZERO,
            zoom: 1.0,
        }
    }
}

impl GraphCamera {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn center(&self) -> GraphPoint {
        self.center
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_IN_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom * ZOOM_OUT_FACTOR);
    }

    pub fn pan(&mut self, screen_delta: GraphPoint) {
        self.center -= screen_delta * (1.0 / self.zoom);
    }

    /// Centers on `bounds` and picks the largest zoom that keeps it inside the
    /// padded viewport. Without content the camera resets to natural scale.
    pub fn fit(&mut self, bounds: Option<GraphBounds>, viewport: ViewportSize) {
        let Some(bounds) = bounds else {
            *self = Self::default();
            return;
        };
        let usable_width = (viewport.width - 2.0 * FIT_PADDING).max(1.0);
        let usable_height = (viewport.height - 2.0 * FIT_PADDING).max(1.0);
        let zoom_x = usable_width / bounds.width().max(1.0);
        let zoom_y = usable_height / bounds.height().max(1.0);
        self.center = bounds.center();
        self.set_zoom(zoom_x.min(zoom_y));
    }

    pub fn world_to_screen(&self, world: GraphPoint, viewport: ViewportSize) -> GraphPoint {
        viewport.center() + (world - self.center) * self.zoom
    }

    pub fn screen_to_world(&self, screen: GraphPoint, viewport: ViewportSize) -> GraphPoint {
        self.center + (screen - viewport.center()) * (1.0 / self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_steps_are_relative_and_clamped() {
        let mut camera = GraphCamera::default();
        camera.zoom_in();
        assert!((camera.zoom() - 1.3).abs() < 1e-6);
        camera.zoom_out();
        assert!((camera.zoom() - 0.91).abs() < 1e-6);

        for _ in 0..20 {
            camera.zoom_in();
        }
        assert_eq!(camera.zoom(), MAX_ZOOM);
        for _ in 0..20 {
            camera.zoom_out();
        }
        assert_eq!(camera.zoom(), MIN_ZOOM);
    }

    #[test]
    fn fit_keeps_padding_on_limiting_axis() {
        let mut camera = GraphCamera::default();
        let bounds = GraphBounds {
            min: GraphPoint::new(-100.0, -50.0),
            max: GraphPoint::new(100.0, 50.0),
        };
        let viewport = ViewportSize::new(460.0, 400.0);
        camera.fit(Some(bounds), viewport);

        assert!((camera.zoom() - 2.0).abs() < 1e-6);
        let left = camera.world_to_screen(bounds.min, viewport);
        assert!((left.x - FIT_PADDING).abs() < 1e-3);
        assert_eq!(camera.center(), GraphPoint::ZERO);
    }

    #[test]
    fn fit_respects_zoom_clamp() {
        let mut camera = GraphCamera::default();
        let tiny = GraphBounds::around([GraphPoint::ZERO], 1.0);
        camera.fit(tiny, ViewportSize::new(800.0, 600.0));
        assert_eq!(camera.zoom(), MAX_ZOOM);

        let huge = GraphBounds::around(
            [GraphPoint::new(-10_000.0, 0.0), GraphPoint::new(10_000.0, 0.0)],
            0.0,
        );
        camera.fit(huge, ViewportSize::new(800.0, 600.0));
        assert_eq!(camera.zoom(), MIN_ZOOM);
    }

    #[test]
    fn screen_and_world_transforms_invert() {
        let mut camera = GraphCamera::default();
        camera.set_zoom(1.7);
        camera.pan(GraphPoint::new(40.0, -25.0));
        let viewport = ViewportSize::new(640.0, 480.0);

        let world = GraphPoint::new(12.5, -80.0);
        let back = camera.screen_to_world(camera.world_to_screen(world, viewport), viewport);
        assert!(back.distance(world) < 1e-3);
    }
}
