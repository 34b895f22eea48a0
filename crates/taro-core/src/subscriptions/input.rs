use crate::event::UiEvent;
use crate::subscription::{Subscription, SubscriptionId, SubscriptionSource};
use crossterm::event::EventStream;
use futures::stream::BoxStream;
use futures::StreamExt;

/// Subscription source for input events (keyboard, mouse, resize, focus, paste).
///
/// # Input TTY behavior
///
/// crossterm's `EventStream::new()` internally calls `tty_fd()`, which
/// automatically opens `/dev/tty` when stdin is not a TTY (i.e., when stdin is
/// piped). Programs using taro therefore still receive keyboard input when
/// stdin is redirected: `echo "data" | my_form_app` reads interactive events
/// from the terminal, not from the pipe.
pub struct InputEvents;

impl SubscriptionSource for InputEvents {
    type Output = UiEvent;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::of::<Self>()
    }

    fn stream(self) -> BoxStream<'static, UiEvent> {
        EventStream::new()
            .filter_map(|result| futures::future::ready(result.ok().map(UiEvent::from)))
            .boxed()
    }
}

/// An input events subscription that maps each event through a
/// user-provided function.
///
/// The `map` closure receives every [`UiEvent`] and returns `Some(Msg)` to
/// forward it to the runtime or `None` to discard it.
///
/// # Example
///
/// ```rust,ignore
/// fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///     vec![input_events(|event| match event {
///         UiEvent::Key(key) => Some(Msg::KeyPress(key)),
///         UiEvent::Resize(w, h) => Some(Msg::Resize(w, h)),
///         _ => None,
///     })]
/// }
/// ```
pub fn input_events<Msg: Send + 'static>(
    map: impl Fn(UiEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    input_events_scoped(SubscriptionId::of::<InputEvents>(), map)
}

/// Like [`input_events`], but with a caller-supplied identity.
///
/// Widgets use this to hold an input subscription whose lifetime is scoped to
/// a widget state: give each widget instance its own [`SubscriptionId`] and
/// return the subscription only while the relevant state holds (say, while an
/// overlay is open). The runtime's reconcile pass then registers the listener
/// on open and deregisters it on close, in the same update turn.
pub fn input_events_scoped<Msg: Send + 'static>(
    id: SubscriptionId,
    map: impl Fn(UiEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    // The EventStream is built inside the deferred source closure, never
    // during subscriptions() itself. Building it eagerly would touch
    // crossterm's global InternalEventReader on every update turn and
    // interfere with the already-running stream's polling.
    Subscription {
        id,
        source: Box::new(move || {
            EventStream::new()
                .filter_map(move |result| {
                    futures::future::ready(result.ok().and_then(|event| map(UiEvent::from(event))))
                })
                .boxed()
        }),
    }
}
