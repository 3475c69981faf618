use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use rune_motion::{
    AnimatableProperty, GestureHandlers, GestureKind, MotionEngine, MotionEvent, MotionProps, MotionValue, Owner,
    PointerEvent, PointerType, Snapshot, TransitionConfig, Variants,
};

fn log_handlers(log: &Arc<Mutex<Vec<String>>>) -> GestureHandlers {
    let mut handlers = GestureHandlers::new();
    for kind in GestureKind::PRIORITY {
        let start = log.clone();
        let end = log.clone();
        handlers = handlers
            .on_start(kind, move || start.lock().push(format!("{kind}-start")))
            .on_end(kind, move || end.lock().push(format!("{kind}-end")));
    }
    handlers
}

#[test]
fn tap_accepts_touch_and_ends_on_cancel() -> Result<()> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut engine = MotionEngine::new();
    let node = engine.insert(None, MotionProps::new().handlers(log_handlers(&log)))?;

    engine.handle_pointer(node, &PointerEvent::down().with_pointer_type(PointerType::Touch))?;
    assert!(engine.active_gestures(node)?.is_active(GestureKind::Tap));
    engine.handle_pointer(node, &PointerEvent::cancel())?;
    engine.handle_pointer(node, &PointerEvent::up())?;

    assert_eq!(*log.lock(), vec!["tap-start", "tap-end"]);
    Ok(())
}

#[test]
fn drag_starts_past_threshold_and_outranks_tap() -> Result<()> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let scale = MotionValue::new(1.0);
    let mut engine = MotionEngine::new();
    let node = engine.insert(
        None,
        MotionProps::new()
            .draggable(true)
            .while_tap(Snapshot::new().with(AnimatableProperty::Scale, 0.9))
            .while_drag(Snapshot::new().with(AnimatableProperty::Scale, 1.1))
            .transition(TransitionConfig::instant())
            .value(AnimatableProperty::Scale, scale.clone())
            .handlers(log_handlers(&log)),
    )?;

    engine.handle_pointer(node, &PointerEvent::down().at(0.0, 0.0))?;
    assert_eq!(scale.get_f64(), Some(0.9));

    engine.handle_pointer(node, &PointerEvent::moved(1.0, 1.0))?;
    assert_eq!(scale.get_f64(), Some(0.9));

    engine.handle_pointer(node, &PointerEvent::moved(3.0, 0.0))?;
    assert_eq!(scale.get_f64(), Some(1.1));
    assert_eq!(
        engine.owner_of(node, &AnimatableProperty::Scale)?,
        Owner::Gesture(GestureKind::Drag)
    );

    engine.handle_pointer(node, &PointerEvent::up())?;
    assert_eq!(scale.get_f64(), Some(1.0));
    assert_eq!(engine.owner_of(node, &AnimatableProperty::Scale)?, Owner::Base);
    assert_eq!(*log.lock(), vec!["tap-start", "drag-start", "drag-end", "tap-end"]);
    Ok(())
}

#[test]
fn non_draggable_node_never_drags() -> Result<()> {
    let mut engine = MotionEngine::new();
    let node = engine.insert(None, MotionProps::new())?;
    engine.handle_pointer(node, &PointerEvent::down())?;
    engine.handle_pointer(node, &PointerEvent::moved(100.0, 100.0))?;
    assert!(!engine.active_gestures(node)?.is_active(GestureKind::Drag));
    Ok(())
}

#[test]
fn focus_and_blur_drive_focus_layer() -> Result<()> {
    let border = MotionValue::new([0.0, 0.0, 0.0, 1.0]);
    let mut engine = MotionEngine::new();
    let node = engine.insert(
        None,
        MotionProps::new()
            .while_focus(Snapshot::new().with(AnimatableProperty::BorderColor, [0.2, 0.4, 1.0, 1.0]))
            .transition(TransitionConfig::instant())
            .value(AnimatableProperty::BorderColor, border.clone()),
    )?;

    engine.handle_focus(node, true)?;
    assert_eq!(border.get().as_color(), Some([0.2, 0.4, 1.0, 1.0]));
    engine.handle_focus(node, false)?;
    assert_eq!(border.get().as_color(), Some([0.0, 0.0, 0.0, 1.0]));

    let events: Vec<_> = engine.drain_events().collect();
    assert!(events.contains(&MotionEvent::GestureStart {
        node,
        gesture: GestureKind::Focus
    }));
    assert!(events.contains(&MotionEvent::GestureEnd {
        node,
        gesture: GestureKind::Focus
    }));
    Ok(())
}

#[test]
fn inherit_false_blocks_propagation() -> Result<()> {
    let inherited = MotionValue::new(1.0);
    let isolated = MotionValue::new(1.0);
    let child_variants = || Variants::new().with("hidden", Snapshot::new().with(AnimatableProperty::Opacity, 0.2));

    let mut engine = MotionEngine::new();
    let parent = engine.insert(
        None,
        MotionProps::new()
            .variants(Variants::new().with("hidden", Snapshot::new().with(AnimatableProperty::Scale, 1.1)))
            .while_hover("hidden")
            .transition(TransitionConfig::instant()),
    )?;
    engine.insert(
        Some(parent),
        MotionProps::new()
            .variants(child_variants())
            .transition(TransitionConfig::instant())
            .value(AnimatableProperty::Opacity, inherited.clone()),
    )?;
    engine.insert(
        Some(parent),
        MotionProps::new()
            .variants(child_variants())
            .inherit(false)
            .transition(TransitionConfig::instant())
            .value(AnimatableProperty::Opacity, isolated.clone()),
    )?;

    engine.handle_pointer(parent, &PointerEvent::enter())?;
    assert_eq!(inherited.get_f64(), Some(0.2));
    assert_eq!(isolated.get_f64(), Some(1.0));

    engine.handle_pointer(parent, &PointerEvent::leave())?;
    assert_eq!(inherited.get_f64(), Some(1.0));
    Ok(())
}

#[test]
fn propagation_passes_through_unbound_nodes_and_stops_at_bindings() -> Result<()> {
    let grandchild = MotionValue::new(1.0);
    let shielded = MotionValue::new(1.0);
    let variants = || Variants::new().with("hidden", Snapshot::new().with(AnimatableProperty::Opacity, 0.3));

    let mut engine = MotionEngine::new();
    let root = engine.insert(
        None,
        MotionProps::new()
            .variants(variants())
            .while_hover("hidden")
            .transition(TransitionConfig::instant()),
    )?;
    // No hover binding: forwards the root's label
    let middle = engine.insert(Some(root), MotionProps::new())?;
    engine.insert(
        Some(middle),
        MotionProps::new()
            .variants(variants())
            .transition(TransitionConfig::instant())
            .value(AnimatableProperty::Opacity, grandchild.clone()),
    )?;
    // Inline hover binding: terminates the label for its subtree
    let barrier = engine.insert(
        Some(root),
        MotionProps::new().while_hover(Snapshot::new().with(AnimatableProperty::Scale, 1.0)),
    )?;
    engine.insert(
        Some(barrier),
        MotionProps::new()
            .variants(variants())
            .transition(TransitionConfig::instant())
            .value(AnimatableProperty::Opacity, shielded.clone()),
    )?;

    engine.handle_pointer(root, &PointerEvent::enter())?;
    assert_eq!(grandchild.get_f64(), Some(0.3));
    assert_eq!(shielded.get_f64(), Some(1.0));
    Ok(())
}

#[test]
fn child_inserted_under_hovered_parent_resolves_immediately() -> Result<()> {
    let opacity = MotionValue::new(1.0);
    let mut engine = MotionEngine::new();
    let parent = engine.insert(None, MotionProps::new().while_hover("hidden"))?;
    engine.handle_pointer(parent, &PointerEvent::enter())?;

    engine.insert(
        Some(parent),
        MotionProps::new()
            .variants(Variants::new().with("hidden", Snapshot::new().with(AnimatableProperty::Opacity, 0.4)))
            .transition(TransitionConfig::instant())
            .value(AnimatableProperty::Opacity, opacity.clone()),
    )?;
    assert_eq!(opacity.get_f64(), Some(0.4));
    Ok(())
}
