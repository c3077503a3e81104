//! Headless hook driver for tests.
//!
//! [`render_hook`] mounts a throwaway component whose whole body is the hook
//! under test, and hands back a [`HookHarness`] to re-render it, drive frames
//! and unmount it.
//!
//! ```
//! use framekit_core::{testing::render_hook, use_state};
//!
//! let mut hook = render_hook(|| use_state(1)).unwrap();
//! hook.act(|(_, set)| set.update(|n| n + 1)).unwrap();
//! assert_eq!(hook.result().0, 2);
//! ```

use crate::error::RuntimeError;
use crate::frame::run_frame;
use crate::runtime::{Component, Phase};

const MAX_FLUSH_PASSES: usize = 64;

pub struct HookHarness<P, R> {
    component: Component,
    hook: Box<dyn FnMut(&P) -> R>,
    props: P,
    result: R,
}

pub fn render_hook<R: 'static>(
    mut hook: impl FnMut() -> R + 'static,
) -> Result<HookHarness<(), R>, RuntimeError> {
    render_hook_with_props((), move |_| hook())
}

pub fn render_hook_with_props<P: 'static, R: 'static>(
    props: P,
    hook: impl FnMut(&P) -> R + 'static,
) -> Result<HookHarness<P, R>, RuntimeError> {
    let component = Component::new();
    let mut hook: Box<dyn FnMut(&P) -> R> = Box::new(hook);
    let result = component.render(|| hook(&props))?;
    Ok(HookHarness {
        component,
        hook,
        props,
        result,
    })
}

impl<P, R> HookHarness<P, R> {
    /// Value returned by the most recent render.
    pub fn result(&self) -> &R {
        &self.result
    }

    pub fn props(&self) -> &P {
        &self.props
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn rerender(&mut self) -> Result<(), RuntimeError> {
        let hook = &mut self.hook;
        let props = &self.props;
        self.result = self.component.render(|| hook(props))?;
        Ok(())
    }

    pub fn rerender_with(&mut self, props: P) -> Result<(), RuntimeError> {
        self.props = props;
        self.rerender()
    }

    /// Re-renders until the component is no longer dirty. Returns whether any
    /// render happened.
    pub fn flush(&mut self) -> Result<bool, RuntimeError> {
        let mut passes = 0;
        while self.component.is_dirty() && self.component.phase() != Phase::Unmounted {
            if passes == MAX_FLUSH_PASSES {
                log::warn!("flush: still dirty after {passes} renders; giving up");
                break;
            }
            self.rerender()?;
            passes += 1;
        }
        Ok(passes > 0)
    }

    /// Runs `f` against the latest result, then flushes any re-render it
    /// caused.
    pub fn act<T>(&mut self, f: impl FnOnce(&R) -> T) -> Result<T, RuntimeError> {
        let out = f(&self.result);
        self.flush()?;
        Ok(out)
    }

    /// Runs one display-refresh frame on this thread, then flushes. Returns
    /// how many frame callbacks ran.
    pub fn advance_frame(&mut self) -> Result<usize, RuntimeError> {
        let ran = run_frame();
        self.flush()?;
        Ok(ran)
    }

    pub fn unmount(&self) {
        self.component.unmount();
    }
}

impl<P, R> Drop for HookHarness<P, R> {
    fn drop(&mut self) {
        self.component.unmount();
    }
}
