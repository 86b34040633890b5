//! Pointer drag state machine.
//!
//! [`DragController`] turns a pointer-down / pointer-move / pointer-up
//! sequence into calls on [`CropState`]. It has two phases:
//!
//! - **Idle**: no gesture in progress
//! - **Dragging**: a handle is active and the last pointer position is known
//!
//! While dragging, the controller owns a subscription guard `G`, typically
//! the document-level move/up listeners. The guard is dropped on every exit
//! from `Dragging`: pointer-up, cancellation, a new pointer-down, or the
//! controller itself being dropped. Listeners therefore live exactly as long
//! as the gesture.
//!
//! Each move event applies the delta since the *previous* event to the
//! *current* rectangle; there is no running accumulator.

use serde::{Deserialize, Serialize};

use crate::editor::CropState;
use crate::geometry::{CropRect, ImageExtent};
use crate::handle::Handle;

/// Pointer position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ratio between image pixels and rendered screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleMapping {
    scale_x: f64,
    scale_y: f64,
}

impl ScaleMapping {
    /// One screen pixel per image pixel.
    pub const IDENTITY: ScaleMapping = ScaleMapping {
        scale_x: 1.0,
        scale_y: 1.0,
    };

    /// Build the mapping from the rendered size of the image surface.
    ///
    /// Returns `None` while the surface has no usable size (hidden, not yet
    /// laid out).
    pub fn from_surface(
        extent: ImageExtent,
        rendered_width: f64,
        rendered_height: f64,
    ) -> Option<Self> {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !usable(rendered_width) || !usable(rendered_height) {
            return None;
        }
        Some(Self {
            scale_x: extent.width() as f64 / rendered_width,
            scale_y: extent.height() as f64 / rendered_height,
        })
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    /// Convert a screen-space delta to image pixels.
    #[inline]
    pub fn to_image(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx * self.scale_x, dy * self.scale_y)
    }
}

impl Default for ScaleMapping {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// An in-progress drag.
#[derive(Debug)]
pub struct Gesture<G> {
    handle: Handle,
    last_pointer: PointerPosition,
    _subscription: G,
}

impl<G> Gesture<G> {
    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn last_pointer(&self) -> PointerPosition {
        self.last_pointer
    }
}

/// Controller phase.
#[derive(Debug)]
pub enum DragPhase<G> {
    Idle,
    Dragging(Gesture<G>),
}

impl<G> Default for DragPhase<G> {
    fn default() -> Self {
        DragPhase::Idle
    }
}

/// Drives a [`CropState`] from pointer events.
#[derive(Debug)]
pub struct DragController<G> {
    phase: DragPhase<G>,
}

impl<G> Default for DragController<G> {
    fn default() -> Self {
        Self {
            phase: DragPhase::Idle,
        }
    }
}

impl<G> DragController<G> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DragPhase<G> {
        &self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    /// Handle of the gesture in progress, if any.
    pub fn active_handle(&self) -> Option<Handle> {
        match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging(gesture) => Some(gesture.handle),
        }
    }

    /// Start a gesture on `handle`.
    ///
    /// `subscription` is held until the gesture ends. A gesture that is
    /// still open is replaced and its subscription released.
    pub fn pointer_down(&mut self, handle: Handle, position: PointerPosition, subscription: G) {
        if self.is_dragging() {
            log::debug!("pointer down during an open drag, replacing it");
        }
        log::debug!("drag start on {} at ({}, {})", handle, position.x, position.y);
        self.phase = DragPhase::Dragging(Gesture {
            handle,
            last_pointer: position,
            _subscription: subscription,
        });
    }

    /// Feed a pointer move.
    ///
    /// Applies the screen delta since the previous event, scaled by
    /// `mapping`, and returns the updated rectangle. Returns `None` when idle
    /// or when no mapping is available; the pointer position is still
    /// recorded so the next event does not jump.
    pub fn pointer_move(
        &mut self,
        position: PointerPosition,
        mapping: Option<ScaleMapping>,
        state: &mut CropState,
    ) -> Option<CropRect> {
        let DragPhase::Dragging(gesture) = &mut self.phase else {
            return None;
        };

        let dx = position.x - gesture.last_pointer.x;
        let dy = position.y - gesture.last_pointer.y;
        gesture.last_pointer = position;

        let Some(mapping) = mapping else {
            log::warn!("dropping drag frame: image surface has no rendered size");
            return None;
        };

        Some(state.apply_handle_delta(gesture.handle, dx, dy, mapping))
    }

    /// End the gesture. Returns `true` if one was in progress.
    pub fn pointer_up(&mut self) -> bool {
        let ended = self.take_gesture();
        if let Some(handle) = ended {
            log::debug!("drag end on {}", handle);
        }
        ended.is_some()
    }

    /// Abort the gesture after the pointer was lost (capture lost, window
    /// blurred, page hidden). Returns `true` if one was in progress.
    pub fn cancel(&mut self) -> bool {
        let ended = self.take_gesture();
        if let Some(handle) = ended {
            log::debug!("drag on {} cancelled", handle);
        }
        ended.is_some()
    }

    fn take_gesture(&mut self) -> Option<Handle> {
        match std::mem::take(&mut self.phase) {
            DragPhase::Idle => None,
            DragPhase::Dragging(gesture) => Some(gesture.handle),
        }
    }
}
