// Fixed cadence frame loop. A frame runs on an animation frame callback, then the
// loop waits out the frame interval on a timeout before asking for the next one.

use crate::config::frame_interval_ms;
use crate::utils;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Host timers the loop is driven by. Handles are whatever ids the host hands out.
pub trait FrameScheduler {
    fn set_timeout(&self, delay_ms: i32, callback: Box<dyn FnOnce()>) -> Result<i32, String>;
    fn clear_timeout(&self, handle: i32);
    fn request_animation_frame(&self, callback: Box<dyn FnOnce()>) -> Result<i32, String>;
    fn cancel_animation_frame(&self, handle: i32);
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Rc<S> {
    fn set_timeout(&self, delay_ms: i32, callback: Box<dyn FnOnce()>) -> Result<i32, String> {
        (**self).set_timeout(delay_ms, callback)
    }

    fn clear_timeout(&self, handle: i32) {
        (**self).clear_timeout(handle)
    }

    fn request_animation_frame(&self, callback: Box<dyn FnOnce()>) -> Result<i32, String> {
        (**self).request_animation_frame(callback)
    }

    fn cancel_animation_frame(&self, handle: i32) {
        (**self).cancel_animation_frame(handle)
    }
}

struct LoopState<S> {
    scheduler: S,
    frame: RefCell<Box<dyn FnMut()>>,
    interval_ms: i32,
    running: Cell<bool>,
    // bumped on every start and stop so callbacks from an older run do nothing
    generation: Cell<u64>,
    timeout: Cell<Option<i32>>,
    animation_frame: Cell<Option<i32>>,
}

pub struct RenderLoop<S: FrameScheduler + 'static> {
    state: Rc<LoopState<S>>,
}

impl<S: FrameScheduler + 'static> RenderLoop<S> {
    pub fn new<F>(scheduler: S, fps: f64, frame: F) -> Self
    where
        F: FnMut() + 'static,
    {
        RenderLoop {
            state: Rc::new(LoopState {
                scheduler,
                frame: RefCell::new(Box::new(frame)),
                interval_ms: frame_interval_ms(fps),
                running: Cell::new(false),
                generation: Cell::new(0),
                timeout: Cell::new(None),
                animation_frame: Cell::new(None),
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// Schedules the first frame. Does nothing while already running.
    pub fn start(&self) {
        let state = &self.state;
        if state.running.replace(true) {
            return;
        }
        let generation = state.generation.get().wrapping_add(1);
        state.generation.set(generation);
        request_frame(state, generation);
    }

    /// Cancels whatever is pending. Safe to call at any time, any number of times.
    pub fn stop(&self) {
        stop(&self.state);
    }
}

impl<S: FrameScheduler + 'static> Drop for RenderLoop<S> {
    fn drop(&mut self) {
        stop(&self.state);
    }
}

fn stop<S: FrameScheduler>(state: &LoopState<S>) {
    if !state.running.replace(false) {
        return;
    }
    state.generation.set(state.generation.get().wrapping_add(1));
    if let Some(handle) = state.timeout.take() {
        state.scheduler.clear_timeout(handle);
    }
    if let Some(handle) = state.animation_frame.take() {
        state.scheduler.cancel_animation_frame(handle);
    }
}

fn is_current<S>(state: &LoopState<S>, generation: u64) -> bool {
    state.running.get() && state.generation.get() == generation
}

fn request_frame<S: FrameScheduler + 'static>(state: &Rc<LoopState<S>>, generation: u64) {
    let weak: Weak<LoopState<S>> = Rc::downgrade(state);
    let callback = Box::new(move || {
        if let Some(state) = weak.upgrade() {
            run_frame(&state, generation);
        }
    });
    match state.scheduler.request_animation_frame(callback) {
        Ok(handle) => state.animation_frame.set(Some(handle)),
        Err(err) => {
            utils::log_error(&format!("requestAnimationFrame failed: {}", err));
            stop(state);
        }
    }
}

fn run_frame<S: FrameScheduler + 'static>(state: &Rc<LoopState<S>>, generation: u64) {
    if !is_current(state, generation) {
        return;
    }
    state.animation_frame.set(None);
    {
        let mut frame = state.frame.borrow_mut();
        (&mut *frame)();
    }
    // the frame itself may have stopped the loop
    if !is_current(state, generation) {
        return;
    }

    let weak: Weak<LoopState<S>> = Rc::downgrade(state);
    let callback = Box::new(move || {
        if let Some(state) = weak.upgrade() {
            if is_current(&state, generation) {
                state.timeout.set(None);
                request_frame(&state, generation);
            }
        }
    });
    match state.scheduler.set_timeout(state.interval_ms, callback) {
        Ok(handle) => state.timeout.set(Some(handle)),
        Err(err) => {
            utils::log_error(&format!("setTimeout failed: {}", err));
            stop(state);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::manual::{Kind, ManualScheduler};
    use super::*;

    fn counting_loop(fps: f64) -> (Rc<ManualScheduler>, Rc<Cell<u32>>, RenderLoop<Rc<ManualScheduler>>) {
        let scheduler = Rc::new(ManualScheduler::default());
        let frames = Rc::new(Cell::new(0));
        let counter = frames.clone();
        let render_loop = RenderLoop::new(scheduler.clone(), fps, move || {
            counter.set(counter.get() + 1);
        });
        (scheduler, frames, render_loop)
    }

    #[test]
    fn start_only_schedules() {
        let (scheduler, frames, render_loop) = counting_loop(40.0);
        render_loop.start();
        assert!(render_loop.is_running());
        assert_eq!(frames.get(), 0);
        assert_eq!(scheduler.pending_kinds(), vec![Kind::AnimationFrame]);
    }

    #[test]
    fn frame_then_wait_then_next_frame() {
        let (scheduler, frames, render_loop) = counting_loop(40.0);
        render_loop.start();

        scheduler.fire(1);
        assert_eq!(frames.get(), 1);
        assert_eq!(scheduler.pending_kinds(), vec![Kind::Timeout(25)]);

        scheduler.fire(1);
        assert_eq!(frames.get(), 1);
        assert_eq!(scheduler.pending_kinds(), vec![Kind::AnimationFrame]);

        scheduler.fire(6);
        assert_eq!(frames.get(), 4);
    }

    #[test]
    fn stop_right_after_start_runs_nothing() {
        let (scheduler, frames, render_loop) = counting_loop(40.0);
        render_loop.start();
        render_loop.stop();
        assert!(!render_loop.is_running());
        assert!(scheduler.pending_kinds().is_empty());
        scheduler.fire(10);
        assert_eq!(frames.get(), 0);
    }

    #[test]
    fn stop_is_idempotent_and_safe_before_start() {
        let (scheduler, frames, render_loop) = counting_loop(40.0);
        render_loop.stop();
        render_loop.stop();
        assert!(scheduler.cancelled.borrow().is_empty());

        render_loop.start();
        scheduler.fire(1);
        render_loop.stop();
        let cancelled = scheduler.cancelled.borrow().len();
        assert_eq!(cancelled, 1);
        render_loop.stop();
        assert_eq!(scheduler.cancelled.borrow().len(), cancelled);
        scheduler.fire(10);
        assert_eq!(frames.get(), 1);
    }

    #[test]
    fn double_start_keeps_one_cycle() {
        let (scheduler, frames, render_loop) = counting_loop(40.0);
        render_loop.start();
        render_loop.start();
        assert_eq!(scheduler.pending_kinds().len(), 1);
        scheduler.fire(4);
        assert_eq!(frames.get(), 2);
        assert_eq!(scheduler.pending_kinds().len(), 1);
    }

    #[test]
    fn restart_after_stop() {
        let (scheduler, frames, render_loop) = counting_loop(40.0);
        render_loop.start();
        scheduler.fire(2);
        render_loop.stop();
        render_loop.start();
        scheduler.fire(1);
        assert_eq!(frames.get(), 2);
    }

    #[test]
    fn frame_can_stop_its_own_loop() {
        let scheduler = Rc::new(ManualScheduler::default());
        let slot: Rc<RefCell<Option<Weak<LoopState<Rc<ManualScheduler>>>>>> =
            Rc::new(RefCell::new(None));
        let frames = Rc::new(Cell::new(0));

        let counter = frames.clone();
        let handle = slot.clone();
        let render_loop = RenderLoop::new(scheduler.clone(), 60.0, move || {
            counter.set(counter.get() + 1);
            if let Some(state) = handle.borrow().as_ref().and_then(Weak::upgrade) {
                stop(&state);
            }
        });
        *slot.borrow_mut() = Some(Rc::downgrade(&render_loop.state));

        render_loop.start();
        scheduler.fire(5);
        assert_eq!(frames.get(), 1);
        assert!(!render_loop.is_running());
        assert!(scheduler.pending_kinds().is_empty());
    }

    #[test]
    fn refused_scheduling_stops_the_loop() {
        let (scheduler, frames, render_loop) = counting_loop(40.0);
        scheduler.refuse.set(true);
        render_loop.start();
        assert!(!render_loop.is_running());
        scheduler.fire(3);
        assert_eq!(frames.get(), 0);
    }

    #[test]
    fn dropping_cancels_pending_work() {
        let (scheduler, frames, render_loop) = counting_loop(40.0);
        render_loop.start();
        drop(render_loop);
        assert!(scheduler.pending_kinds().is_empty());
        scheduler.fire(3);
        assert_eq!(frames.get(), 0);
    }
}
