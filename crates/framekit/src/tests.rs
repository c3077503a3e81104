#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use framekit_core::testing::*;
    use framekit_core::pending_frames;
    use framekit_core::prelude::*;

    use crate::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn recorder<T: 'static>() -> (Rc<RefCell<Vec<T>>>, RefCallback<T>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let calls_c = calls.clone();
        let cb = RefCallback::new(move |v: T| calls_c.borrow_mut().push(v));
        (calls, cb)
    }

    // ------------------------------------------------------------------
    // merge_refs
    // ------------------------------------------------------------------

    #[test]
    fn merge_refs_assigns_cell() {
        let cell = NodeRef::<&str>::new();
        let merged = merge_refs([&cell]);

        merged.call("value");
        assert_eq!(cell.current(), Some("value"));
    }

    #[test]
    fn merge_refs_calls_callback() {
        let (calls, cb) = recorder::<String>();
        let merged = merge_refs([cb]);

        merged.call("value".to_string());
        assert_eq!(*calls.borrow(), vec!["value".to_string()]);
    }

    #[test]
    fn merge_refs_skips_absent_handles() {
        let cell = NodeRef::<u8>::new();
        let merged = merge_refs!(None::<NodeRef<u8>>, &cell, None::<RefCallback<u8>>);
        let cleanup = merged.call(3);

        assert_eq!(cell.current(), Some(3));
        assert!(cleanup.is_some());

        let nothing = merge_refs::<u8, _>([None::<Ref<u8>>, None]);
        assert!(nothing.call(1).is_some());
    }

    #[test]
    fn merge_refs_applies_in_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let cell = NodeRef::<i32>::new();

        let first = {
            let order = order.clone();
            RefCallback::new(move |v: i32| order.borrow_mut().push(format!("first {v}")))
        };
        let second = {
            let order = order.clone();
            let cell = cell.clone();
            // Cell is assigned between the two callbacks.
            RefCallback::new(move |v: i32| {
                order
                    .borrow_mut()
                    .push(format!("second {v} sees {:?}", cell.current()));
            })
        };

        let merged = merge_refs!(first, &cell, second);
        merged.call(5);
        assert_eq!(*order.borrow(), vec!["first 5", "second 5 sees Some(5)"]);
    }

    #[test]
    fn merge_refs_cleanup_resets_cells_and_runs_callback_cleanups() {
        let cell_a = NodeRef::<u32>::new();
        let cell_b = NodeRef::<u32>::new();
        let cleaned = Rc::new(Cell::new(0));
        let cleaned_c = cleaned.clone();
        let cb = RefCallback::new(move |_: u32| {
            let cleaned = cleaned_c.clone();
            on_unmount(move || cleaned.set(cleaned.get() + 1))
        });
        let (calls, plain) = recorder::<u32>();

        let merged = merge_refs!(&cell_a, cb, plain, &cell_b);
        let cleanup = merged.call(11).unwrap_or_else(|| Dispose::new(|| {}));

        assert_eq!(cell_a.current(), Some(11));
        assert_eq!(cell_b.current(), Some(11));
        assert_eq!(cleaned.get(), 0);

        cleanup.run();
        assert_eq!(cell_a.current(), None);
        assert_eq!(cell_b.current(), None);
        assert_eq!(cleaned.get(), 1);
        assert_eq!(*calls.borrow(), vec![11]);

        cleanup.run();
        assert_eq!(cleaned.get(), 1);
    }

    #[test]
    fn merged_ref_nests_as_a_handle() {
        let cell = NodeRef::<u32>::new();
        let (calls, cb) = recorder::<u32>();
        let inner = merge_refs!(&cell);
        let outer = merge_refs!(inner, cb);

        let cleanup = outer.call(9);
        assert_eq!(cell.current(), Some(9));
        assert_eq!(*calls.borrow(), vec![9]);

        if let Some(cleanup) = cleanup {
            cleanup.run();
        }
        assert!(!cell.is_set());
    }

    #[test]
    fn use_node_ref_is_stable() -> Result<(), RuntimeError> {
        let mut hook = render_hook(use_node_ref::<u8>)?;
        let first = hook.result().clone();
        hook.rerender()?;
        assert_eq!(first, *hook.result());
        Ok(())
    }

    // ------------------------------------------------------------------
    // use_mount
    // ------------------------------------------------------------------

    fn counting_mount() -> (Rc<Cell<u32>>, Rc<Cell<u32>>, impl FnMut() + 'static) {
        let effects = Rc::new(Cell::new(0));
        let cleanups = Rc::new(Cell::new(0));
        let (e, c) = (effects.clone(), cleanups.clone());
        let body = move || {
            let (e, c) = (e.clone(), c.clone());
            use_mount(move || {
                e.set(e.get() + 1);
                on_unmount(move || c.set(c.get() + 1))
            });
        };
        (effects, cleanups, body)
    }

    #[test]
    fn use_mount_calls_effect_on_mount() -> Result<(), RuntimeError> {
        let (effects, cleanups, body) = counting_mount();
        let _hook = render_hook(body)?;
        assert_eq!(effects.get(), 1);
        assert_eq!(cleanups.get(), 0);
        Ok(())
    }

    #[test]
    fn use_mount_does_not_rerun_on_rerender() -> Result<(), RuntimeError> {
        let (effects, cleanups, body) = counting_mount();
        let mut hook = render_hook(body)?;
        for _ in 0..5 {
            hook.rerender()?;
        }
        assert_eq!(effects.get(), 1);
        assert_eq!(cleanups.get(), 0);
        Ok(())
    }

    #[test]
    fn use_mount_calls_cleanup_on_unmount() -> Result<(), RuntimeError> {
        let (effects, cleanups, body) = counting_mount();
        let hook = render_hook(body)?;
        hook.unmount();
        hook.unmount();
        assert_eq!(effects.get(), 1);
        assert_eq!(cleanups.get(), 1);
        Ok(())
    }

    #[test]
    fn use_mount_ignores_state_driven_rerenders() -> Result<(), RuntimeError> {
        let runs = Rc::new(Cell::new(0));
        let runs_c = runs.clone();
        let mut hook = render_hook(move || {
            let runs = runs_c.clone();
            use_mount(move || runs.set(runs.get() + 1));
            framekit_core::use_state(0)
        })?;

        hook.act(|(_, set)| set.set(1))?;
        hook.act(|(_, set)| set.update(|n| n + 1))?;
        assert_eq!(hook.result().0, 2);
        assert_eq!(runs.get(), 1);
        Ok(())
    }

    // ------------------------------------------------------------------
    // FrameSlot
    // ------------------------------------------------------------------

    #[test]
    fn frame_slot_keeps_single_ticket() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_c = seen.clone();
        let slot = FrameSlot::new(move |p: u32| seen_c.borrow_mut().push(p));

        slot.schedule(1);
        slot.schedule(2);
        slot.schedule(3);
        assert!(slot.is_pending());
        assert_eq!(pending_frames(), 1);

        assert_eq!(run_frame(), 1);
        assert!(!slot.is_pending());
        assert_eq!(*seen.borrow(), vec![3]);
    }

    #[test]
    fn frame_slot_cancel_drops_payload() {
        let seen = Rc::new(Cell::new(0));
        let seen_c = seen.clone();
        let slot = FrameSlot::new(move |p: u32| seen_c.set(p));

        slot.schedule(4);
        assert!(slot.cancel());
        assert!(!slot.cancel());
        run_frame();
        assert_eq!(seen.get(), 0);
        assert_eq!(pending_frames(), 0);
    }

    #[test]
    fn frame_slot_close_refuses_later_schedules() {
        let seen = Rc::new(Cell::new(0));
        let seen_c = seen.clone();
        let slot = FrameSlot::new(move |p: u32| seen_c.set(p));

        slot.schedule(1);
        slot.close();
        slot.schedule(2);
        assert!(slot.is_closed());
        assert!(!slot.is_pending());
        assert_eq!(pending_frames(), 0);

        run_frame();
        assert_eq!(seen.get(), 0);
    }

    #[test]
    fn frame_slot_handler_may_reschedule() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let slot_cell: Rc<RefCell<Option<FrameSlot<u32>>>> = Rc::new(RefCell::new(None));
        let (seen_c, slot_c) = (seen.clone(), slot_cell.clone());
        let slot = FrameSlot::new(move |p: u32| {
            seen_c.borrow_mut().push(p);
            if p < 3 {
                if let Some(slot) = slot_c.borrow().as_ref() {
                    slot.schedule(p + 1);
                }
            }
        });
        *slot_cell.borrow_mut() = Some(slot.clone());

        slot.schedule(1);
        run_frame();
        run_frame();
        run_frame();
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
        assert!(!slot.is_pending());

        *slot_cell.borrow_mut() = None;
    }

    // ------------------------------------------------------------------
    // use_raf_callback
    // ------------------------------------------------------------------

    fn spy() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) + Clone + 'static) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let calls_c = calls.clone();
        (calls, move |v: &'static str| calls_c.borrow_mut().push(v))
    }

    #[test]
    fn raf_callback_is_not_called_immediately() -> Result<(), RuntimeError> {
        let (calls, f) = spy();
        let hook = render_hook(move || use_raf_callback(f.clone(), ()))?;

        hook.result().emit("value");
        assert!(calls.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn raf_callback_runs_on_next_frame() -> Result<(), RuntimeError> {
        init_logger();
        let (calls, f) = spy();
        let mut hook = render_hook(move || use_raf_callback(f.clone(), ()))?;

        hook.result().emit("value");
        assert_eq!(hook.advance_frame()?, 1);
        assert_eq!(*calls.borrow(), vec!["value"]);

        hook.advance_frame()?;
        assert_eq!(calls.borrow().len(), 1);
        Ok(())
    }

    #[test]
    fn raf_callback_coalesces_to_last_call() -> Result<(), RuntimeError> {
        let (calls, f) = spy();
        let mut hook = render_hook(move || use_raf_callback(f.clone(), ()))?;

        let cb = hook.result().clone();
        cb.emit("first");
        cb.emit("second");
        cb.emit("third");
        assert_eq!(pending_frames(), 1);

        hook.advance_frame()?;
        assert_eq!(*calls.borrow(), vec!["third"]);
        Ok(())
    }

    #[test]
    fn raf_callback_uses_latest_callback() -> Result<(), RuntimeError> {
        let (old_calls, old) = spy();
        let (new_calls, new) = spy();
        let mut hook = render_hook_with_props(
            Callback::new(old),
            |f: &Callback<&'static str>| {
                let f = f.clone();
                use_raf_callback(move |v| f.emit(v), ())
            },
        )?;

        hook.rerender_with(Callback::new(new))?;
        hook.result().emit("value");
        hook.advance_frame()?;

        assert!(old_calls.borrow().is_empty());
        assert_eq!(*new_calls.borrow(), vec!["value"]);
        Ok(())
    }

    #[test]
    fn raf_callback_swapped_between_emit_and_frame() -> Result<(), RuntimeError> {
        let (old_calls, old) = spy();
        let (new_calls, new) = spy();
        let mut hook = render_hook_with_props(
            Callback::new(old),
            |f: &Callback<&'static str>| {
                let f = f.clone();
                use_raf_callback(move |v| f.emit(v), ())
            },
        )?;

        let dispatch = hook.result().clone();
        dispatch.emit("value");
        hook.rerender_with(Callback::new(new))?;
        assert_eq!(dispatch, *hook.result());
        hook.advance_frame()?;

        assert!(old_calls.borrow().is_empty());
        assert_eq!(*new_calls.borrow(), vec!["value"]);
        Ok(())
    }

    #[test]
    fn raf_callback_identity_follows_deps() -> Result<(), RuntimeError> {
        let mut hook = render_hook_with_props(vec![1], |deps: &Vec<i32>| {
            use_raf_callback(|_: ()| {}, deps.clone())
        })?;
        let first = hook.result().clone();

        hook.rerender_with(vec![1])?;
        assert_eq!(first, *hook.result());

        hook.rerender_with(vec![2])?;
        assert_ne!(first, *hook.result());
        Ok(())
    }

    #[test]
    fn raf_callback_recreated_dispatch_shares_pending_slot() -> Result<(), RuntimeError> {
        let (calls, f) = spy();
        let mut hook = render_hook_with_props(1, move |dep: &i32| {
            use_raf_callback(f.clone(), *dep)
        })?;

        let before = hook.result().clone();
        before.emit("old identity");
        hook.rerender_with(2)?;
        hook.result().emit("new identity");
        hook.advance_frame()?;

        assert_eq!(*calls.borrow(), vec!["new identity"]);
        Ok(())
    }

    #[test]
    fn raf_callback_forwards_tuple_args() -> Result<(), RuntimeError> {
        let seen = Rc::new(Cell::new((0, 0)));
        let seen_c = seen.clone();
        let mut hook = render_hook(move || {
            let seen = seen_c.clone();
            use_raf_callback(move |(x, y): (i32, i32)| seen.set((x, y)), ())
        })?;

        hook.result().emit((3, 4));
        hook.advance_frame()?;
        assert_eq!(seen.get(), (3, 4));
        Ok(())
    }

    #[test]
    fn raf_callback_canceled_on_unmount() -> Result<(), RuntimeError> {
        let (calls, f) = spy();
        let hook = render_hook(move || use_raf_callback(f.clone(), ()))?;

        hook.result().emit("late");
        hook.unmount();
        assert_eq!(pending_frames(), 0);

        run_frame();
        assert!(calls.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn raf_callback_emit_after_unmount_is_ignored() -> Result<(), RuntimeError> {
        let (calls, f) = spy();
        let hook = render_hook(move || use_raf_callback(f.clone(), ()))?;
        let dispatch = hook.result().clone();
        hook.unmount();

        dispatch.emit("after-teardown");
        assert_eq!(pending_frames(), 0);
        run_frame();
        assert!(calls.borrow().is_empty());
        Ok(())
    }

    // ------------------------------------------------------------------
    // use_raf_state
    // ------------------------------------------------------------------

    #[test]
    fn raf_state_initializes_with_value() -> Result<(), RuntimeError> {
        let hook = render_hook(|| use_raf_state(0))?;
        assert_eq!(hook.result().0, 0);
        Ok(())
    }

    #[test]
    fn raf_state_initializes_with_function_once() -> Result<(), RuntimeError> {
        let inits = Rc::new(Cell::new(0));
        let inits_c = inits.clone();
        let mut hook = render_hook(move || {
            let inits = inits_c.clone();
            use_raf_state_with(move || {
                inits.set(inits.get() + 1);
                0
            })
        })?;
        hook.rerender()?;

        assert_eq!(hook.result().0, 0);
        assert_eq!(inits.get(), 1);
        Ok(())
    }

    #[test]
    fn raf_state_updates_with_value_on_next_frame() -> Result<(), RuntimeError> {
        let mut hook = render_hook(|| use_raf_state(0))?;

        hook.act(|(_, set)| set.set(1))?;
        assert_eq!(hook.result().0, 0);

        hook.advance_frame()?;
        assert_eq!(hook.result().0, 1);
        Ok(())
    }

    #[test]
    fn raf_state_updates_with_function() -> Result<(), RuntimeError> {
        let mut hook = render_hook(|| use_raf_state(0))?;

        hook.act(|(_, set)| set.update(|prev| prev + 1))?;
        hook.advance_frame()?;
        assert_eq!(hook.result().0, 1);
        Ok(())
    }

    #[test]
    fn raf_state_batches_to_one_update_per_frame() -> Result<(), RuntimeError> {
        let calls = Rc::new(Cell::new(0));
        let mut hook = render_hook(|| use_raf_state(0))?;

        let set = hook.result().1.clone();
        for _ in 0..2 {
            let calls = calls.clone();
            set.update(move |_| {
                calls.set(calls.get() + 1);
                1
            });
        }
        hook.advance_frame()?;

        assert_eq!(hook.result().0, 1);
        assert_eq!(calls.get(), 1);
        assert_eq!(hook.component().render_count(), 2);
        Ok(())
    }

    #[test]
    fn raf_state_last_call_wins_without_composing() -> Result<(), RuntimeError> {
        let mut hook = render_hook(|| use_raf_state(5))?;
        let seen_prev = Rc::new(Cell::new(None));

        let set = hook.result().1.clone();
        set.set(1);
        let seen = seen_prev.clone();
        set.update(move |prev| {
            seen.set(Some(*prev));
            prev + 1
        });
        hook.advance_frame()?;

        assert_eq!(hook.result().0, 6);
        assert_eq!(seen_prev.get(), Some(5));
        Ok(())
    }

    #[test]
    fn raf_state_discarded_updaters_never_run() -> Result<(), RuntimeError> {
        let discarded = Rc::new(Cell::new(false));
        let mut hook = render_hook(|| use_raf_state(String::from("a")))?;

        let set = hook.result().1.clone();
        let flag = discarded.clone();
        set.update(move |prev| {
            flag.set(true);
            format!("{prev}!")
        });
        set.set(String::from("b"));
        hook.advance_frame()?;

        assert_eq!(hook.result().0, "b");
        assert!(!discarded.get());
        Ok(())
    }

    #[test]
    fn raf_state_setter_is_stable() -> Result<(), RuntimeError> {
        let mut hook = render_hook(|| use_raf_state(0))?;
        let first = hook.result().1.clone();

        hook.act(|(_, set)| set.set(2))?;
        hook.advance_frame()?;
        assert_eq!(first, hook.result().1);
        Ok(())
    }

    #[test]
    fn raf_state_canceled_on_unmount() -> Result<(), RuntimeError> {
        let ran = Rc::new(Cell::new(false));
        let hook = render_hook(|| use_raf_state(0))?;

        let set = hook.result().1.clone();
        let ran_c = ran.clone();
        set.update(move |prev| {
            ran_c.set(true);
            prev + 1
        });
        assert!(set.is_pending());

        hook.unmount();
        assert!(!set.is_pending());
        assert_eq!(run_frame(), 0);
        assert!(!ran.get());

        set.set(3);
        assert!(!set.is_pending());
        assert_eq!(run_frame(), 0);
        assert_eq!(hook.result().0, 0);
        Ok(())
    }

    #[test]
    fn use_latest_tracks_newest_render() -> Result<(), RuntimeError> {
        let mut hook = render_hook_with_props(1, |n: &i32| use_latest(*n))?;
        let latest = hook.result().clone();

        hook.rerender_with(2)?;
        hook.rerender_with(3)?;
        assert!(latest.ptr_eq(hook.result()));
        assert_eq!(latest.get(), 3);
        Ok(())
    }
}
