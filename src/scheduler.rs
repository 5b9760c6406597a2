//! Frame scheduling
//!
//! A [`FrameSource`] hands out one frame callback at a time
//! (`requestAnimationFrame` in the browser). [`Ticker`] owns the pending
//! handle: it is acquired when a run starts, re-requested after each
//! granted frame, and released when the run stops or the ticker is
//! dropped. A callback that arrives after release is rejected.

/// Opaque id of a requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Host capability to schedule and cancel frame callbacks
pub trait FrameSource {
    /// Request the next frame. `None` if the host cannot schedule one.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    /// Cancel a previously requested frame
    fn cancel_frame(&mut self, handle: FrameHandle);
}

pub struct Ticker<S: FrameSource> {
    source: S,
    pending: Option<FrameHandle>,
    running: bool,
}

impl<S: FrameSource> Ticker<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            pending: None,
            running: false,
        }
    }

    /// Begin requesting frames. Returns false, and stays stopped, if the
    /// source refuses the first request. No-op if already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return true;
        }
        self.pending = self.source.request_frame();
        self.running = self.pending.is_some();
        if !self.running {
            log::warn!("Frame source refused the first frame request");
        }
        self.running
    }

    /// Cancel any pending frame and stop requesting new ones
    pub fn stop(&mut self) {
        self.running = false;
        if let Some(handle) = self.pending.take() {
            self.source.cancel_frame(handle);
        }
    }

    /// Called from the frame callback. Returns true if a tick should run
    /// for `handle`; a stale or unknown handle is ignored.
    pub fn begin_frame(&mut self, handle: FrameHandle) -> bool {
        if !self.running || self.pending != Some(handle) {
            return false;
        }
        self.pending = None;
        true
    }

    /// Called after the tick finished. Requests the next frame while running.
    pub fn end_frame(&mut self) {
        if self.running && self.pending.is_none() {
            self.pending = self.source.request_frame();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: FrameSource> Drop for Ticker<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Frame source driven by hand (headless runs and tests)
#[derive(Debug, Default)]
pub struct ManualFrames {
    next_id: i32,
    /// Currently outstanding request
    pub outstanding: Option<FrameHandle>,
    pub requested: u32,
    pub cancelled: u32,
}

impl FrameSource for ManualFrames {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.outstanding = Some(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.outstanding == Some(handle) {
            self.outstanding = None;
        }
        self.cancelled += 1;
    }
}

impl ManualFrames {
    /// Fire the outstanding frame, if any
    pub fn fire(&mut self) -> Option<FrameHandle> {
        self.outstanding.take()
    }
}

/// `requestAnimationFrame` on the browser window
#[cfg(target_arch = "wasm32")]
pub mod raf {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::Closure;

    use super::{FrameHandle, FrameSource};

    /// Callback invoked with the frame handle and the rAF timestamp
    pub type FrameCallback = Closure<dyn FnMut(f64)>;

    /// Shares one long-lived closure; the host installs it after the game
    /// object exists, since the closure needs a handle back to the game.
    #[derive(Clone, Default)]
    pub struct RafFrames {
        callback: Rc<RefCell<Option<FrameCallback>>>,
        /// Id of the frame the callback is currently serving
        pub current: Rc<RefCell<Option<FrameHandle>>>,
    }

    impl RafFrames {
        pub fn install(&self, callback: FrameCallback) {
            *self.callback.borrow_mut() = Some(callback);
        }
    }

    impl FrameSource for RafFrames {
        fn request_frame(&mut self) -> Option<FrameHandle> {
            let window = web_sys::window()?;
            let callback = self.callback.borrow();
            let callback = callback.as_ref()?;
            match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                Ok(id) => {
                    let handle = FrameHandle(id);
                    *self.current.borrow_mut() = Some(handle);
                    Some(handle)
                }
                Err(e) => {
                    log::error!("requestAnimationFrame failed: {:?}", e);
                    None
                }
            }
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle.0);
            }
            let mut current = self.current.borrow_mut();
            if *current == Some(handle) {
                *current = None;
            }
        }
    }
}
