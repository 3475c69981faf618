use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use parking_lot::Mutex;
use rune_motion::{
    AnimatableProperty, GestureHandlers, MotionEngine, MotionProps, MotionValue, Phase, PointerEvent, PointerType,
    Snapshot, TransformMapping, TransformValues, TransitionConfig, Variants,
};

fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = count.clone();
    (count, move || {
        handle.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn hover_listeners_fire_once_each() -> Result<()> {
    let (starts, on_start) = counter();
    let (ends, on_end) = counter();
    let mut engine = MotionEngine::new();
    let node = engine.insert(
        None,
        MotionProps::new().handlers(GestureHandlers::new().on_hover_start(on_start).on_hover_end(on_end)),
    )?;

    engine.handle_pointer(node, &PointerEvent::enter())?;
    engine.handle_pointer(node, &PointerEvent::enter())?;
    engine.handle_pointer(node, &PointerEvent::leave())?;
    engine.handle_pointer(node, &PointerEvent::leave())?;
    engine.tick(16.0);

    assert_eq!(starts.load(Ordering::SeqCst), 1);
    assert_eq!(ends.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn touch_pointers_never_hover() -> Result<()> {
    let (starts, on_start) = counter();
    let (ends, on_end) = counter();
    let mut engine = MotionEngine::new();
    let node = engine.insert(
        None,
        MotionProps::new().handlers(GestureHandlers::new().on_hover_start(on_start).on_hover_end(on_end)),
    )?;

    engine.handle_pointer(node, &PointerEvent::enter().with_pointer_type(PointerType::Touch))?;
    engine.handle_pointer(node, &PointerEvent::leave().with_pointer_type(PointerType::Touch))?;
    engine.tick(16.0);

    assert_eq!(starts.load(Ordering::SeqCst), 0);
    assert_eq!(ends.load(Ordering::SeqCst), 0);
    assert!(engine.active_gestures(node)?.is_empty());
    Ok(())
}

#[test]
fn while_hover_inline_applies_synchronously() -> Result<()> {
    let opacity = MotionValue::new(1.0);
    let mut engine = MotionEngine::new();
    let node = engine.insert(
        None,
        MotionProps::new()
            .while_hover(Snapshot::new().with(AnimatableProperty::Opacity, 0.0))
            .transition(TransitionConfig::instant())
            .value(AnimatableProperty::Opacity, opacity.clone()),
    )?;

    engine.handle_pointer(node, &PointerEvent::enter())?;
    assert_eq!(opacity.get_f64(), Some(0.0));
    Ok(())
}

#[test]
fn while_hover_resolves_variant_label() -> Result<()> {
    let opacity = MotionValue::new(1.0);
    let mut engine = MotionEngine::new();
    let node = engine.insert(
        None,
        MotionProps::new()
            .variants(Variants::new().with("hidden", Snapshot::new().with(AnimatableProperty::Opacity, 0.5)))
            .while_hover("hidden")
            .transition(TransitionConfig::instant())
            .value(AnimatableProperty::Opacity, opacity.clone()),
    )?;

    engine.handle_pointer(node, &PointerEvent::enter())?;
    assert_eq!(opacity.get_f64(), Some(0.5));
    Ok(())
}

#[test]
fn while_hover_propagates_to_children() -> Result<()> {
    let opacity = MotionValue::new(1.0);
    let mut engine = MotionEngine::new();
    let parent = engine.insert(
        None,
        MotionProps::new()
            .variants(Variants::new().with("hidden", Snapshot::new().with(AnimatableProperty::Opacity, 0.8)))
            .while_hover("hidden")
            .transition(TransitionConfig::instant()),
    )?;
    engine.insert(
        Some(parent),
        MotionProps::new()
            .variants(Variants::new().with("hidden", Snapshot::new().with(AnimatableProperty::Opacity, 0.2)))
            .transition(TransitionConfig::instant())
            .value(AnimatableProperty::Opacity, opacity.clone()),
    )?;

    engine.handle_pointer(parent, &PointerEvent::enter())?;
    assert_eq!(opacity.get_f64(), Some(0.2));
    Ok(())
}

#[test]
fn while_hover_unapplies_when_hover_ends() -> Result<()> {
    let opacity = MotionValue::new(1.0);
    let moused_out = Arc::new(Mutex::new(false));
    let resolved = Arc::new(Mutex::new(None));

    let (flag, sink, store) = (moused_out.clone(), resolved.clone(), opacity.clone());
    let mut engine = MotionEngine::new();
    let node = engine.insert(
        None,
        MotionProps::new()
            .variants(Variants::new().with(
                "hidden",
                Snapshot::new()
                    .with(AnimatableProperty::Opacity, 0.5)
                    .with_end(AnimatableProperty::Opacity, 0.75),
            ))
            .while_hover("hidden")
            .transition(TransitionConfig::instant())
            .value(AnimatableProperty::Opacity, opacity.clone())
            .handlers(GestureHandlers::new().on_animation_complete(move |_, _| {
                if *flag.lock() {
                    *sink.lock() = store.get_f64();
                }
            })),
    )?;

    engine.handle_pointer(node, &PointerEvent::enter())?;
    assert_eq!(opacity.get_f64(), Some(0.75));

    engine.tick(10.0);
    *moused_out.lock() = true;
    engine.handle_pointer(node, &PointerEvent::leave())?;

    assert_eq!(*resolved.lock(), Some(1.0));
    Ok(())
}

#[test]
fn hover_only_animates_values_not_owned_by_tap() -> Result<()> {
    let opacity = MotionValue::new(1.0);
    let scale = MotionValue::new(1.0);
    let mut engine = MotionEngine::new();
    let node = engine.insert(
        None,
        MotionProps::new()
            .variants(
                Variants::new()
                    .with(
                        "hovering",
                        Snapshot::new()
                            .with(AnimatableProperty::Opacity, 0.5)
                            .with(AnimatableProperty::Scale, 0.5),
                    )
                    .with("tapping", Snapshot::new().with(AnimatableProperty::Scale, 2.0)),
            )
            .while_hover("hovering")
            .while_tap("tapping")
            .transition(TransitionConfig::instant())
            .value(AnimatableProperty::Opacity, opacity.clone())
            .value(AnimatableProperty::Scale, scale.clone()),
    )?;

    engine.handle_pointer(node, &PointerEvent::down())?;
    engine.handle_pointer(node, &PointerEvent::enter())?;

    assert_eq!((opacity.get_f64(), scale.get_f64()), (Some(0.5), Some(2.0)));
    Ok(())
}

#[test]
fn transform_values_are_unapplied_when_hover_ends() -> Result<()> {
    let size = AnimatableProperty::custom("size");
    let mut engine = MotionEngine::new();
    let node = engine.insert(
        None,
        MotionProps::new()
            .transform_values(TransformValues::new().with(
                size.clone(),
                TransformMapping::identity().with_outputs([AnimatableProperty::Width, AnimatableProperty::Height]),
            ))
            .variants(Variants::new().with("hidden", Snapshot::new().with(size.clone(), 50.0)))
            .while_hover("hidden")
            .transition(TransitionConfig::instant())
            .style(size.clone(), 100.0),
    )?;

    engine.handle_pointer(node, &PointerEvent::enter())?;
    engine.tick(16.0);
    let style = engine.render_style(node)?;
    assert_eq!(style.get(&AnimatableProperty::Width).and_then(|v| v.as_f64()), Some(50.0));

    engine.handle_pointer(node, &PointerEvent::leave())?;
    let updates = Arc::new(Mutex::new(0usize));
    let seen = updates.clone();
    engine.schedule(Phase::PostRender, move |_| *seen.lock() += 1);
    engine.tick(16.0);
    assert_eq!(*updates.lock(), 1);

    let style = engine.render_style(node)?;
    assert_eq!(style.get(&AnimatableProperty::Width).and_then(|v| v.as_f64()), Some(100.0));
    assert_eq!(style.get(&AnimatableProperty::Height).and_then(|v| v.as_f64()), Some(100.0));
    assert!(!style.contains_key(&size));
    Ok(())
}
