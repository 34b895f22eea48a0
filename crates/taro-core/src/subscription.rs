use futures::stream::BoxStream;
use futures::StreamExt;
use std::any::TypeId;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A long-lived event source whose lifetime is tied to model state.
///
/// [`Model::subscriptions`](crate::Model::subscriptions) returns the set that
/// should be live *right now*; after every update the runtime diffs that set
/// against what is already running, starting the new entries and aborting the
/// dropped ones. A widget that declares a listener only while some state
/// holds (global pointer events while an overlay is open, a pending focus
/// timer) gets registration and teardown in the same turn as the state
/// change, with no explicit cleanup code.
///
/// The underlying stream is built lazily, when the runtime actually starts
/// the subscription. Declaring one in `subscriptions()` has no side effect.
pub struct Subscription<Msg: Send + 'static> {
    pub(crate) id: SubscriptionId,
    pub(crate) source: Box<dyn FnOnce() -> BoxStream<'static, Msg> + Send>,
}

/// Identity used to diff subscriptions between update turns.
///
/// Pairs a Rust [`TypeId`] with a numeric discriminant, so distinct widget
/// instances can hold listeners of the same kind without colliding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
    discriminant: u64,
}

impl SubscriptionId {
    /// Identity for the `discriminant`-th instance of a listener kind.
    pub fn new<T: 'static>(discriminant: u64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            discriminant,
        }
    }

    /// Identity for a singleton listener kind.
    pub fn of<T: 'static>() -> Self {
        Self::new::<T>(0)
    }

    /// Identity derived from a string label.
    pub fn with_str<T: 'static>(label: &str) -> Self {
        let mut hasher = std::hash::DefaultHasher::new();
        label.hash(&mut hasher);
        Self::new::<T>(hasher.finish())
    }
}

/// A reusable recipe for a subscription stream.
///
/// [`stream`](SubscriptionSource::stream) runs once, when the runtime starts
/// the subscription; the stream is dropped when the subscription is removed
/// from the declared set.
pub trait SubscriptionSource: Send + 'static {
    /// What the stream emits.
    type Output: Send + 'static;

    /// Identity for diffing.
    fn id(&self) -> SubscriptionId;

    /// Build the stream.
    fn stream(self) -> BoxStream<'static, Self::Output>;
}

/// Turn a [`SubscriptionSource`] into a declarable [`Subscription`].
pub fn subscribe<S>(source: S) -> Subscription<S::Output>
where
    S: SubscriptionSource,
{
    Subscription {
        id: source.id(),
        source: Box::new(move || source.stream()),
    }
}

impl<Msg: Send + 'static> Subscription<Msg> {
    /// Wrap an already-built stream under the given identity.
    pub fn from_stream(id: SubscriptionId, stream: BoxStream<'static, Msg>) -> Self {
        Subscription {
            id,
            source: Box::new(move || stream),
        }
    }

    /// The identity the runtime diffs on.
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Lift emitted messages into a parent message type.
    ///
    /// The identity is unchanged, so a mapped subscription still diffs as
    /// the same listener.
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Subscription<NewMsg> {
        let Subscription { id, source } = self;
        Subscription {
            id,
            source: Box::new(move || source().map(f).boxed()),
        }
    }
}

/// Tracks running subscription tasks and diffs them against each newly
/// declared set.
pub(crate) struct SubscriptionManager<Msg: Send + 'static> {
    running: HashMap<SubscriptionId, AbortHandle>,
    sender: mpsc::UnboundedSender<Msg>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    pub fn new(sender: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            running: HashMap::new(),
            sender,
        }
    }

    /// Start declared subscriptions that are not yet running and abort
    /// running ones that are no longer declared. Unchanged identities keep
    /// their existing task.
    pub fn reconcile(&mut self, declared: Vec<Subscription<Msg>>) {
        let mut fresh: HashMap<SubscriptionId, Subscription<Msg>> = declared
            .into_iter()
            .map(|sub| (sub.id.clone(), sub))
            .collect();

        self.running.retain(|id, task| {
            if fresh.remove(id).is_some() {
                true
            } else {
                task.abort();
                false
            }
        });

        for (id, sub) in fresh {
            let tx = self.sender.clone();
            let task = tokio::spawn(async move {
                let mut stream = (sub.source)();
                while let Some(msg) = stream.next().await {
                    if tx.send(msg).is_err() {
                        break;
                    }
                }
            });
            self.running.insert(id, task.abort_handle());
        }
    }

    /// Abort everything (program shutdown).
    pub fn shutdown(&mut self) {
        for (_, task) in self.running.drain() {
            task.abort();
        }
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.running.len()
    }
}
