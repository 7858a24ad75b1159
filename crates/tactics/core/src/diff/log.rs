use crate::state::Battle;

use super::BattleDiff;

/// Append-only sequence of diffs.
///
/// The only way to shorten it is [`BattleLogClient::truncate`], which first
/// steps the battle back to the truncation point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiffLog<D> {
    entries: Vec<D>,
    /// Entries that came before this log, for logs continuing another one.
    #[cfg_attr(feature = "serde", serde(default))]
    offset: usize,
}

impl<D> Default for DiffLog<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> DiffLog<D> {
    pub const fn new() -> Self {
        Self::continuing(0)
    }

    /// Empty log whose sequence numbers pick up after `offset` entries kept
    /// elsewhere.
    pub const fn continuing(offset: usize) -> Self {
        Self {
            entries: Vec::new(),
            offset,
        }
    }

    pub fn push(&mut self, entry: D) {
        self.entries.push(entry);
    }

    pub fn get(&self, index: usize) -> Option<&D> {
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&D> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sequence number of the next entry, counting the entries before the
    /// log started.
    pub fn next_sequence(&self) -> usize {
        self.offset + self.entries.len()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &D> {
        self.entries.iter()
    }

    /// Entries from `start` to the end, for consumers that track how far
    /// they have read.
    pub fn since(&self, start: usize) -> &[D] {
        self.entries.get(start..).unwrap_or(&[])
    }

    fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }
}

/// Cursor over the battle log, moving the battle state along with it.
///
/// `position` counts the entries currently applied to the battle. A client
/// created with [`BattleLogClient::new`] starts at the end of the log, where
/// the live battle is.
///
/// Stepping must not interleave with live resolution: the client holds the
/// battle mutably for as long as it exists.
pub struct BattleLogClient<'a> {
    battle: &'a mut Battle,
    position: usize,
}

impl<'a> BattleLogClient<'a> {
    pub fn new(battle: &'a mut Battle) -> Self {
        let position = battle.log.len();
        Self { battle, position }
    }

    pub fn battle(&self) -> &Battle {
        self.battle
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn at_start(&self) -> bool {
        self.position == 0
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.battle.log.len()
    }

    /// Last applied entry.
    pub fn current(&self) -> Option<&BattleDiff> {
        self.position
            .checked_sub(1)
            .and_then(|index| self.battle.log.get(index))
    }

    /// Applies the next entry. Returns false at the end of the log.
    pub fn forward(&mut self) -> bool {
        let Some(diff) = self.battle.log.get(self.position).cloned() else {
            return false;
        };
        diff.apply(self.battle);
        self.position += 1;
        true
    }

    /// Reverts the last applied entry. Returns false at the start of the log.
    pub fn backward(&mut self) -> bool {
        let Some(index) = self.position.checked_sub(1) else {
            return false;
        };
        let Some(diff) = self.battle.log.get(index).cloned() else {
            return false;
        };
        diff.revert(self.battle);
        self.position = index;
        true
    }

    pub fn jump_to_start(&mut self) {
        while self.backward() {}
    }

    pub fn jump_to_end(&mut self) {
        while self.forward() {}
    }

    /// Steps back until the last applied entry matches, or the start.
    pub fn backward_to(&mut self, mut predicate: impl FnMut(&BattleDiff) -> bool) -> bool {
        while let Some(current) = self.current() {
            if predicate(current) {
                return true;
            }
            self.backward();
        }
        false
    }

    /// Drops every entry after the current position.
    pub fn truncate(&mut self) {
        let position = self.position;
        self.battle.log.truncate(position);
    }
}
