//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tactics_core::{BattleDiff, DiffKinds};
use tokio::sync::broadcast;

/// Topics for event routing
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
)]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    /// Turn passed to another ship
    ShipChange,
    /// Damage bookkeeping
    Damage,
    Move,
    /// Attribute or bounded value changes
    AttributeChange,
    /// Every log entry, in order
    Log,
}

impl Topic {
    /// Topics a diff is published on. [`Topic::Log`] always comes last.
    pub fn of(diff: &BattleDiff) -> impl Iterator<Item = Topic> {
        let kinds = diff.kinds();
        [
            (kinds.contains(DiffKinds::SHIP_CHANGE), Topic::ShipChange),
            (kinds.contains(DiffKinds::DAMAGE), Topic::Damage),
            (kinds.contains(DiffKinds::MOVE), Topic::Move),
            (
                kinds.intersects(DiffKinds::ATTRIBUTE_CHANGE | DiffKinds::VALUE_CHANGE),
                Topic::AttributeChange,
            ),
            (true, Topic::Log),
        ]
        .into_iter()
        .filter_map(|(matched, topic)| matched.then_some(topic))
    }
}

/// A log entry published on a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub topic: Topic,
    /// Position of the entry in the battle log.
    pub index: usize,
    pub diff: BattleDiff,
}

/// Topic-based event bus
///
/// Consumers subscribe to the topics they care about. Publishing with no
/// subscriber is not an error: events are best-effort.
#[derive(Clone)]
pub struct EventBus {
    channels: [broadcast::Sender<Event>; <Topic as strum::EnumCount>::COUNT],
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: core::array::from_fn(|_| broadcast::channel(capacity.max(1)).0),
        }
    }

    fn channel(&self, topic: Topic) -> &broadcast::Sender<Event> {
        &self.channels[topic as usize]
    }

    /// Publish one event on its topic.
    pub fn publish(&self, event: Event) {
        let topic = event.topic;
        if self.channel(topic).send(event).is_err() {
            tracing::trace!(%topic, "no subscribers");
        }
    }

    /// Publish log entries starting at log position `start`, each on every
    /// topic it belongs to.
    pub fn publish_diffs(&self, start: usize, diffs: &[BattleDiff]) {
        for (offset, diff) in diffs.iter().enumerate() {
            for topic in Topic::of(diff) {
                self.publish(Event {
                    topic,
                    index: start + offset,
                    diff: diff.clone(),
                });
            }
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channel(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{Placement, ShipId, ValueKind};

    fn moved() -> BattleDiff {
        BattleDiff::ShipMove {
            ship: ShipId(1),
            start: Placement::new(0.0, 0.0, 0.0),
            end: Placement::new(10.0, 0.0, 0.0),
        }
    }

    #[test]
    fn diffs_route_by_kind() {
        assert_eq!(Topic::of(&moved()).collect::<Vec<_>>(), vec![Topic::Move, Topic::Log]);
        let change = BattleDiff::ShipChange {
            ship: ShipId(1),
            new_ship: ShipId(2),
            cycle_diff: 0,
        };
        assert_eq!(
            Topic::of(&change).collect::<Vec<_>>(),
            vec![Topic::ShipChange, Topic::Log]
        );
        let value = BattleDiff::ShipValue {
            ship: ShipId(1),
            value: ValueKind::Power,
            delta: -3,
        };
        assert!(Topic::of(&value).any(|topic| topic == Topic::AttributeChange));
    }

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut moves = bus.subscribe(Topic::Move);
        let mut damage = bus.subscribe(Topic::Damage);
        let mut log = bus.subscribe(Topic::Log);

        bus.publish_diffs(4, &[moved()]);

        let event = moves.recv().await.unwrap();
        assert_eq!(event.index, 4);
        assert_eq!(event.topic, Topic::Move);
        assert_eq!(log.recv().await.unwrap().diff, moved());
        assert!(damage.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish_diffs(0, &[moved()]);
    }
}
