use std::collections::HashMap;

/// Aspect-ratio-locked drawing surface.
///
/// The intrinsic size is the coordinate space all layout math runs in; it
/// never changes after attach. Resizing only tracks the container width
/// and rescales the displayed surface, height following from the locked
/// aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    id: String,
    intrinsic_w: f64,
    intrinsic_h: f64,
    aspect: f64,
    rendered_w: f64,
    rendered_h: f64,
}

impl Surface {
    pub fn new(id: impl Into<String>, intrinsic_w: f64, intrinsic_h: f64) -> Surface {
        let aspect = if intrinsic_w > 0.0 && intrinsic_h > 0.0 {
            intrinsic_w / intrinsic_h
        } else {
            1.0
        };
        Surface {
            id: id.into(),
            intrinsic_w,
            intrinsic_h,
            aspect,
            rendered_w: intrinsic_w,
            rendered_h: intrinsic_h,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn intrinsic(&self) -> (f64, f64) {
        (self.intrinsic_w, self.intrinsic_h)
    }

    pub fn rendered(&self) -> (f64, f64) {
        (self.rendered_w, self.rendered_h)
    }

    /// Displayed scale relative to the intrinsic coordinate space.
    pub fn scale(&self) -> f64 {
        if self.intrinsic_w > 0.0 {
            self.rendered_w / self.intrinsic_w
        } else {
            1.0
        }
    }

    /// Track a new container width. A zero (or unmeasured) container is a
    /// no-op until a nonzero measurement arrives; calls are idempotent and
    /// order-independent since each recomputes from scratch.
    pub fn resize(&mut self, container_width: f64) {
        if !(container_width > 0.0) {
            return;
        }
        self.rendered_w = container_width;
        self.rendered_h = (container_width / self.aspect).round();
    }
}

/// Registry of independently responsive surfaces, keyed by unique id so
/// resize handling for one surface never collides with another's.
#[derive(Debug, Default)]
pub struct Surfaces {
    map: HashMap<String, Surface>,
}

impl Surfaces {
    pub fn attach(&mut self, id: &str, intrinsic_w: f64, intrinsic_h: f64) {
        self.map
            .insert(id.to_string(), Surface::new(id, intrinsic_w, intrinsic_h));
    }

    pub fn resize(&mut self, id: &str, container_width: f64) {
        if let Some(surface) = self.map.get_mut(id) {
            surface.resize(container_width);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Surface> {
        self.map.get(id)
    }
}
