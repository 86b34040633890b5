//! Crop editor WASM bindings.
//!
//! `CropEditor` is the handle the tool page keeps for one crop session. It
//! owns the rectangle state, the drag controller, and the page's change
//! callback. Label arguments (`"se"`, `"width"`, `"16:9"`) are parsed here and
//! rejected with an error string.
//!
//! Listener closures reach the editor through a `Weak`, so a dropped editor
//! is never kept alive by the document.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use cropframe_core::{
    AspectRatio, ConfigError, CropConfig, CropRect, CropState, DragController, Field,
    GeometryError, Handle, ImageExtent, PointerPosition, ScaleMapping,
};
use wasm_bindgen::prelude::*;
use web_sys::{Element, PointerEvent};

use crate::listeners::{pointer_position, DocumentListeners, DragEnd};
use crate::types::JsCropRect;

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Interactive crop rectangle editor.
#[wasm_bindgen]
pub struct CropEditor {
    inner: Rc<RefCell<EditorInner<DocumentListeners>>>,
}

#[wasm_bindgen]
impl CropEditor {
    /// Create an editor. `config` is an optional partial
    /// `{ min_size, default_fraction, default_max_size }` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<CropEditor, JsValue> {
        let config: CropConfig = if config.is_undefined() || config.is_null() {
            CropConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(to_js)?
        };
        let inner = EditorInner::new(config).map_err(to_js)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(inner)),
        })
    }

    /// Start editing an image of `width` x `height` pixels.
    pub fn load_image(&self, width: u32, height: u32) -> Result<JsCropRect, JsValue> {
        self.inner
            .borrow_mut()
            .load_image(width, height)
            .map(JsCropRect::from)
            .map_err(to_js)
    }

    /// Set the ratio from a selector value (`"free"`, `"1.5"`, `"16:9"`).
    pub fn set_aspect_ratio(&self, value: &str) -> Result<Option<JsCropRect>, JsValue> {
        let ratio: AspectRatio = value.parse().map_err(to_js)?;
        Ok(self
            .inner
            .borrow_mut()
            .set_aspect_ratio(ratio)
            .map(JsCropRect::from))
    }

    /// Selector value of the current ratio.
    pub fn aspect_ratio(&self) -> String {
        self.inner.borrow().ratio.to_string()
    }

    /// Apply a screen-pixel delta on `handle`, given the rendered image size.
    pub fn apply_handle_delta(
        &self,
        handle: &str,
        dx: f64,
        dy: f64,
        rendered_width: f64,
        rendered_height: f64,
    ) -> Result<Option<JsCropRect>, JsValue> {
        let handle: Handle = handle.parse().map_err(to_js)?;
        Ok(self
            .inner
            .borrow_mut()
            .apply_handle_delta(handle, dx, dy, (rendered_width, rendered_height))
            .map(JsCropRect::from))
    }

    /// Set one of `"x"`, `"y"`, `"width"`, `"height"` from the numeric inputs.
    pub fn set_field(&self, field: &str, value: f64) -> Result<Option<JsCropRect>, JsValue> {
        let field: Field = field.parse().map_err(to_js)?;
        Ok(self
            .inner
            .borrow_mut()
            .set_field(field, value)
            .map(JsCropRect::from))
    }

    /// Current rectangle, `undefined` before an image is loaded.
    pub fn rect(&self) -> Option<JsCropRect> {
        self.inner.borrow().rect().map(JsCropRect::from)
    }

    /// Called with the new rectangle on every drag frame.
    pub fn set_on_change(&self, callback: Option<js_sys::Function>) {
        self.inner.borrow_mut().on_change = callback;
    }

    /// Start a drag on `handle` from a `pointerdown` event.
    ///
    /// `surface` is the rendered image element; its size converts pointer
    /// movement to image pixels on every frame.
    pub fn begin_drag(
        &self,
        handle: &str,
        event: &PointerEvent,
        surface: &Element,
    ) -> Result<(), JsValue> {
        let handle: Handle = handle.parse().map_err(to_js)?;
        if !self.inner.borrow().has_image() {
            log::debug!("ignoring drag on {} before an image is loaded", handle);
            return Ok(());
        }

        // The rectangle body sits under every handle
        event.stop_propagation();
        event.prevent_default();

        let listeners = attach_listeners(Rc::downgrade(&self.inner))?;
        if let Err(err) = surface.set_pointer_capture(event.pointer_id()) {
            log::debug!("pointer capture unavailable: {:?}", err);
        }

        let mut inner = self.inner.borrow_mut();
        inner.surface = Some(surface.clone());
        inner.begin_drag(handle, pointer_position(event), listeners);
        Ok(())
    }

    /// End the drag in progress. Returns `false` if there was none.
    pub fn end_drag(&self) -> bool {
        self.inner.borrow_mut().end_drag(DragEnd::Release)
    }

    /// Abort the drag in progress. Returns `false` if there was none.
    pub fn cancel_drag(&self) -> bool {
        self.inner.borrow_mut().end_drag(DragEnd::Cancel)
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.borrow().drag.is_dragging()
    }

    /// Label of the handle being dragged.
    pub fn active_handle(&self) -> Option<String> {
        self.inner
            .borrow()
            .drag
            .active_handle()
            .map(|handle| handle.label().to_string())
    }

    /// Detach every listener and drop the change callback.
    ///
    /// Call on component teardown; the editor keeps its rectangle.
    pub fn dispose(&self) {
        self.inner.borrow_mut().dispose();
    }
}

fn attach_listeners(
    editor: Weak<RefCell<EditorInner<DocumentListeners>>>,
) -> Result<DocumentListeners, JsValue> {
    let on_move = {
        let editor = editor.clone();
        move |position: PointerPosition| {
            let Some(editor) = editor.upgrade() else {
                return;
            };
            let Ok(mut inner) = editor.try_borrow_mut() else {
                log::warn!("dropping pointer move: editor busy");
                return;
            };
            let rendered = inner.surface.as_ref().map(|surface| {
                let bounds = surface.get_bounding_client_rect();
                (bounds.width(), bounds.height())
            });
            let rect = inner.drag_move(position, rendered);
            let callback = inner.on_change.clone();
            // Release the borrow before handing control to the page
            drop(inner);

            if let (Some(rect), Some(callback)) = (rect, callback) {
                notify(&callback, rect);
            }
        }
    };

    let on_end = move |end: DragEnd| {
        finish_drag(&editor, end);
    };

    DocumentListeners::attach(on_move, on_end)
}

/// End the drag of an editor that may already be gone.
///
/// Returns `true` if a drag was in progress.
fn finish_drag<G>(editor: &Weak<RefCell<EditorInner<G>>>, end: DragEnd) -> bool {
    let Some(editor) = editor.upgrade() else {
        return false;
    };
    // Bound so the borrow guard drops before `editor`
    let ended = if let Ok(mut inner) = editor.try_borrow_mut() {
        inner.end_drag(end)
    } else {
        log::warn!("dropping drag end: editor busy");
        false
    };
    ended
}

fn notify(callback: &js_sys::Function, rect: CropRect) {
    if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from(JsCropRect::from(rect))) {
        log::warn!("change callback failed: {:?}", err);
    }
}

/// Editor state shared with the listener closures.
///
/// Generic over the listener guard so the drag flow can be exercised without
/// a browser.
pub(crate) struct EditorInner<G> {
    config: CropConfig,
    ratio: AspectRatio,
    state: Option<CropState>,
    drag: DragController<G>,
    surface: Option<Element>,
    on_change: Option<js_sys::Function>,
}

impl<G> EditorInner<G> {
    pub(crate) fn new(config: CropConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ratio: AspectRatio::Free,
            state: None,
            drag: DragController::new(),
            surface: None,
            on_change: None,
        })
    }

    pub(crate) fn has_image(&self) -> bool {
        self.state.is_some()
    }

    pub(crate) fn rect(&self) -> Option<CropRect> {
        self.state.as_ref().map(CropState::rect)
    }

    /// Replace the image. A drag on the previous image is cancelled.
    pub(crate) fn load_image(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<CropRect, GeometryError> {
        let extent = ImageExtent::new(width, height)?;
        self.end_drag(DragEnd::Cancel);

        let state = CropState::load(extent, self.ratio, self.config.clone());
        let rect = state.rect();
        self.state = Some(state);
        Ok(rect)
    }

    /// Store the ratio for later images and apply it to the current one.
    pub(crate) fn set_aspect_ratio(&mut self, ratio: AspectRatio) -> Option<CropRect> {
        self.ratio = ratio;
        self.state
            .as_mut()
            .map(|state| state.set_aspect_ratio(ratio))
    }

    pub(crate) fn apply_handle_delta(
        &mut self,
        handle: Handle,
        dx: f64,
        dy: f64,
        rendered: (f64, f64),
    ) -> Option<CropRect> {
        let state = self.state.as_mut()?;
        match ScaleMapping::from_surface(state.extent(), rendered.0, rendered.1) {
            Some(mapping) => Some(state.apply_handle_delta(handle, dx, dy, mapping)),
            None => {
                log::warn!(
                    "ignoring delta: rendered size {}x{} is unusable",
                    rendered.0,
                    rendered.1
                );
                Some(state.rect())
            }
        }
    }

    pub(crate) fn set_field(&mut self, field: Field, value: f64) -> Option<CropRect> {
        self.state
            .as_mut()
            .map(|state| state.set_field(field, value))
    }

    pub(crate) fn begin_drag(&mut self, handle: Handle, position: PointerPosition, guard: G) {
        self.drag.pointer_down(handle, position, guard);
    }

    pub(crate) fn drag_move(
        &mut self,
        position: PointerPosition,
        rendered: Option<(f64, f64)>,
    ) -> Option<CropRect> {
        let state = self.state.as_mut()?;
        let mapping = rendered.and_then(|(width, height)| {
            ScaleMapping::from_surface(state.extent(), width, height)
        });
        self.drag.pointer_move(position, mapping, state)
    }

    pub(crate) fn end_drag(&mut self, end: DragEnd) -> bool {
        self.surface = None;
        match end {
            DragEnd::Release => self.drag.pointer_up(),
            DragEnd::Cancel => self.drag.cancel(),
        }
    }

    pub(crate) fn dispose(&mut self) {
        self.end_drag(DragEnd::Cancel);
        self.on_change = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Counts live guards, standing in for the document listeners.
    struct Guard(Rc<Cell<i32>>);

    impl Guard {
        fn new(live: &Rc<Cell<i32>>) -> Self {
            live.set(live.get() + 1);
            Guard(Rc::clone(live))
        }
    }

    impl Drop for Guard {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    fn editor() -> EditorInner<Guard> {
        EditorInner::new(CropConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = CropConfig {
            min_size: -1.0,
            ..CropConfig::default()
        };
        assert!(matches!(
            EditorInner::<Guard>::new(config),
            Err(ConfigError::InvalidMinSize(_))
        ));
    }

    #[test]
    fn test_operations_before_load_return_none() {
        let mut editor = editor();
        assert!(!editor.has_image());
        assert_eq!(editor.rect(), None);
        assert_eq!(editor.set_field(Field::X, 10.0), None);
        assert_eq!(
            editor.apply_handle_delta(Handle::SE, 5.0, 5.0, (100.0, 100.0)),
            None
        );
        assert_eq!(editor.set_aspect_ratio(AspectRatio::Fixed(1.0)), None);
        assert_eq!(editor.ratio, AspectRatio::Fixed(1.0));
    }

    #[test]
    fn test_load_image_default_rect() {
        let mut editor = editor();
        let rect = editor.load_image(800, 600).unwrap();
        assert_eq!(rect, CropRect::new(250.0, 150.0, 300.0, 300.0));
        assert_eq!(editor.rect(), Some(rect));
    }

    #[test]
    fn test_load_image_rejects_empty() {
        let mut editor = editor();
        assert_eq!(
            editor.load_image(0, 600),
            Err(GeometryError::EmptyExtent {
                width: 0,
                height: 600
            })
        );
        assert!(!editor.has_image());
    }

    #[test]
    fn test_ratio_survives_image_load() {
        let mut editor = editor();
        editor.set_aspect_ratio(AspectRatio::Fixed(2.0));
        let rect = editor.load_image(1000, 1000).unwrap();
        assert!((rect.width / rect.height - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_handle_delta_scales_by_rendered_size() {
        let mut editor = editor();
        editor.load_image(800, 600).unwrap();

        // Rendered at half size: 10 screen px = 20 image px
        let rect = editor
            .apply_handle_delta(Handle::E, 10.0, 0.0, (400.0, 300.0))
            .unwrap();
        assert_eq!(rect.width, 320.0);
    }

    #[test]
    fn test_apply_handle_delta_unusable_surface() {
        let mut editor = editor();
        let before = editor.load_image(800, 600).unwrap();
        let rect = editor.apply_handle_delta(Handle::E, 10.0, 0.0, (0.0, 300.0));
        assert_eq!(rect, Some(before));
    }

    #[test]
    fn test_drag_flow_releases_guard() {
        let live = Rc::new(Cell::new(0));
        let mut editor = editor();
        editor.load_image(800, 600).unwrap();

        editor.begin_drag(Handle::SE, PointerPosition::new(100.0, 100.0), Guard::new(&live));
        assert_eq!(live.get(), 1);

        let rect = editor
            .drag_move(PointerPosition::new(150.0, 150.0), Some((800.0, 600.0)))
            .unwrap();
        assert_eq!(rect, CropRect::new(250.0, 150.0, 350.0, 350.0));

        assert!(editor.end_drag(DragEnd::Release));
        assert_eq!(live.get(), 0);
        assert!(!editor.end_drag(DragEnd::Release));
    }

    #[test]
    fn test_drag_move_without_surface_is_dropped() {
        let live = Rc::new(Cell::new(0));
        let mut editor = editor();
        editor.load_image(800, 600).unwrap();
        editor.begin_drag(Handle::Move, PointerPosition::new(0.0, 0.0), Guard::new(&live));

        assert_eq!(editor.drag_move(PointerPosition::new(30.0, 0.0), None), None);

        // The skipped frame's movement is not replayed
        let rect = editor
            .drag_move(PointerPosition::new(40.0, 0.0), Some((800.0, 600.0)))
            .unwrap();
        assert_eq!(rect.x, 260.0);
    }

    #[test]
    fn test_load_image_cancels_drag() {
        let live = Rc::new(Cell::new(0));
        let mut editor = editor();
        editor.load_image(800, 600).unwrap();
        editor.begin_drag(Handle::N, PointerPosition::default(), Guard::new(&live));

        editor.load_image(1024, 768).unwrap();
        assert!(!editor.drag.is_dragging());
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_dispose_releases_guard() {
        let live = Rc::new(Cell::new(0));
        let mut editor = editor();
        editor.load_image(800, 600).unwrap();
        editor.begin_drag(Handle::W, PointerPosition::default(), Guard::new(&live));

        editor.dispose();
        assert_eq!(live.get(), 0);
        assert!(editor.on_change.is_none());
        assert!(editor.has_image());
    }

    #[test]
    fn test_finish_drag_through_weak_handle() {
        let live = Rc::new(Cell::new(0));
        let shared = Rc::new(RefCell::new(editor()));
        shared.borrow_mut().load_image(800, 600).unwrap();
        shared
            .borrow_mut()
            .begin_drag(Handle::S, PointerPosition::default(), Guard::new(&live));

        let weak = Rc::downgrade(&shared);
        assert!(finish_drag(&weak, DragEnd::Release));
        assert_eq!(live.get(), 0);
        assert!(!finish_drag(&weak, DragEnd::Cancel));
    }

    #[test]
    fn test_finish_drag_while_editor_borrowed() {
        let live = Rc::new(Cell::new(0));
        let shared = Rc::new(RefCell::new(editor()));
        shared.borrow_mut().load_image(800, 600).unwrap();
        shared
            .borrow_mut()
            .begin_drag(Handle::E, PointerPosition::default(), Guard::new(&live));

        let weak = Rc::downgrade(&shared);
        {
            let _busy = shared.borrow();
            assert!(!finish_drag(&weak, DragEnd::Release));
        }
        assert_eq!(live.get(), 1);
        assert!(finish_drag(&weak, DragEnd::Cancel));
    }

    #[test]
    fn test_finish_drag_after_editor_dropped() {
        let shared = Rc::new(RefCell::new(editor()));
        let weak = Rc::downgrade(&shared);
        drop(shared);
        assert!(!finish_drag(&weak, DragEnd::Release));
    }

    #[test]
    fn test_cancel_ends_drag() {
        let live = Rc::new(Cell::new(0));
        let mut editor = editor();
        editor.load_image(800, 600).unwrap();
        editor.begin_drag(Handle::NE, PointerPosition::default(), Guard::new(&live));

        assert!(editor.end_drag(DragEnd::Cancel));
        assert_eq!(live.get(), 0);
        assert_eq!(
            editor.drag_move(PointerPosition::new(50.0, 50.0), Some((800.0, 600.0))),
            None
        );
    }
}
