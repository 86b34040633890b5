//! Document-level pointer listeners for the length of one drag.
//!
//! Listening on the document keeps a fast drag alive after the pointer leaves
//! the handle. The listeners are owned by [`DocumentListeners`], which the
//! drag controller holds inside its `Dragging` phase; ending, cancelling or
//! replacing the drag drops the value and removes every listener.

use std::rc::Rc;

use cropframe_core::PointerPosition;
use gloo_events::EventListener;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, PointerEvent};

/// Why a drag stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragEnd {
    /// Pointer released normally
    Release,
    /// Pointer lost (capture lost, pointercancel, window blur, page hidden)
    Cancel,
}

/// Listeners attached for one drag. Dropping the value detaches them.
#[derive(Debug)]
pub(crate) struct DocumentListeners {
    listeners: Vec<EventListener>,
}

impl DocumentListeners {
    /// Attach the drag listeners to the current document and window.
    ///
    /// `on_move` receives every pointer position; `on_end` is called once per
    /// end event and is expected to drop this value.
    pub(crate) fn attach(
        on_move: impl Fn(PointerPosition) + 'static,
        on_end: impl Fn(DragEnd) + 'static,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document"))?;

        let on_end: Rc<dyn Fn(DragEnd)> = Rc::new(on_end);
        let mut listeners = Vec::with_capacity(6);

        listeners.push(EventListener::new(&document, "pointermove", move |event: &Event| {
            if let Some(event) = event.dyn_ref::<PointerEvent>() {
                on_move(pointer_position(event));
            }
        }));

        let end = Rc::clone(&on_end);
        listeners.push(EventListener::new(&document, "pointerup", move |_| {
            end(DragEnd::Release)
        }));

        for name in ["pointercancel", "lostpointercapture"] {
            let end = Rc::clone(&on_end);
            listeners.push(EventListener::new(&document, name, move |_| {
                end(DragEnd::Cancel)
            }));
        }

        let end = Rc::clone(&on_end);
        listeners.push(EventListener::new(&window, "blur", move |_| {
            end(DragEnd::Cancel)
        }));

        let watched = document.clone();
        listeners.push(EventListener::new(&document, "visibilitychange", move |_| {
            if watched.hidden() {
                on_end(DragEnd::Cancel);
            }
        }));

        Ok(Self { listeners })
    }
}

/// Client coordinates of a pointer event.
pub(crate) fn pointer_position(event: &PointerEvent) -> PointerPosition {
    PointerPosition::new(f64::from(event.client_x()), f64::from(event.client_y()))
}
