//! The frame loop and shared component cells.
//!
//! Every installed component registers one per-frame callback; a single
//! `requestAnimationFrame` loop calls them all with the frame's timestamp.
//! Components live in [`Shared`] cells next to the surface that presents
//! them, and event handlers reach them through [`with`], which drops an event
//! instead of panicking when the cell is already borrowed.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use enray_site_core::Timestamp;
use enray_site_core::logging::{span_names, targets};

/// A component and the page side it drives.
pub struct Bound<W, S> {
    pub widget: W,
    pub surface: S,
}

pub type Shared<W, S> = Rc<RefCell<Bound<W, S>>>;

pub fn share<W, S>(widget: W, surface: S) -> Shared<W, S> {
    Rc::new(RefCell::new(Bound { widget, surface }))
}

/// Run `f` on a shared component, or drop the call if it is busy.
pub fn with<W, S, R>(shared: &Shared<W, S>, f: impl FnOnce(&mut W, &mut S) -> R) -> Option<R> {
    match shared.try_borrow_mut() {
        Ok(mut bound) => {
            let Bound { widget, surface } = &mut *bound;
            Some(f(widget, surface))
        }
        Err(_) => {
            tracing::trace!(target: targets::WEB, "component busy, event dropped");
            None
        }
    }
}

type FrameCallback = Box<dyn FnMut(Timestamp)>;

/// Collects per-frame callbacks during install, then runs them.
#[derive(Default)]
pub struct Runtime {
    callbacks: Vec<FrameCallback>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_frame(&mut self, callback: impl FnMut(Timestamp) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Tick `shared` every frame.
    pub fn tick_each_frame<W: 'static, S: 'static>(
        &mut self,
        shared: &Shared<W, S>,
        mut tick: impl FnMut(&mut W, &mut S, Timestamp) + 'static,
    ) {
        let shared = Rc::clone(shared);
        self.on_frame(move |now| {
            with(&shared, |widget, surface| tick(widget, surface, now));
        });
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Start the frame loop. The loop runs for the life of the page.
    pub fn run(self) {
        if self.callbacks.is_empty() {
            tracing::debug!(target: targets::WEB, "nothing to animate");
            return;
        }
        tracing::debug!(target: targets::WEB, callbacks = self.callbacks.len(), "frame loop started");

        let mut callbacks = self.callbacks;
        let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let next = Rc::clone(&frame);

        *frame.borrow_mut() = Some(Closure::new(move |millis: f64| {
            let now = Timestamp::from_millis(millis);
            let _span = tracing::trace_span!(span_names::FRAME).entered();
            for callback in &mut callbacks {
                callback(now);
            }
            if let Some(closure) = next.borrow().as_ref() {
                request_frame(closure);
            }
        }));

        if let Some(closure) = frame.borrow().as_ref() {
            request_frame(closure);
        }
    }
}

fn request_frame(closure: &Closure<dyn FnMut(f64)>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(err) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        tracing::warn!(target: targets::WEB, ?err, "requestAnimationFrame failed");
    }
}
