use crate::api::Character;
use tracing::debug;

/// Identifies one in-flight load. Only the most recently issued ticket may
/// apply its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// The loaded character sequence plus the single "selected" slot.
#[derive(Debug, Default, Clone)]
pub struct CharacterSelection {
    items: Vec<Character>,
    active: Option<Character>,
    issued: u64,
}

impl CharacterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sequence and select its first entry.
    pub fn load(&mut self, items: Vec<Character>) {
        self.active = items.first().cloned();
        self.items = items;
    }

    pub fn items(&self) -> &[Character] {
        &self.items
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Character> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Select `id` from the loaded sequence. Unknown ids keep the current
    /// selection and return `false`.
    pub fn select(&mut self, id: i64) -> bool {
        match self.find_by_id(id).cloned() {
            Some(item) => {
                self.active = Some(item);
                true
            }
            None => {
                debug!(id, "selection ignored: id not in loaded characters");
                false
            }
        }
    }

    pub fn selected(&self) -> Option<&Character> {
        self.active.as_ref()
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.active.as_ref().is_some_and(|active| active.id == id)
    }

    /// Start a load. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket {
            generation: self.issued,
        }
    }

    /// Apply the result of the load identified by `ticket`, unless a newer
    /// load has been started since. Returns whether the items were applied.
    pub fn finish_load(&mut self, ticket: LoadTicket, items: Vec<Character>) -> bool {
        if ticket.generation != self.issued {
            debug!(
                generation = ticket.generation,
                latest = self.issued,
                "discarding stale character load"
            );
            return false;
        }
        self.load(items);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::sample_character;

    fn loaded(ids: &[i64]) -> CharacterSelection {
        let mut selection = CharacterSelection::new();
        selection.load(
            ids.iter()
                .map(|id| sample_character(*id, &format!("c{id}")))
                .collect(),
        );
        selection
    }

    #[test]
    fn load_selects_first_item() {
        let selection = loaded(&[4, 2, 9]);
        assert_eq!(selection.selected().map(|c| c.id), Some(4));
        assert_eq!(selection.items().len(), 3);
    }

    #[test]
    fn load_of_empty_sequence_clears_selection() {
        let mut selection = loaded(&[1]);
        selection.load(Vec::new());
        assert!(selection.selected().is_none());
    }

    #[test]
    fn select_known_id_switches_to_that_entity() {
        let mut selection = loaded(&[4, 2, 9]);

        assert!(selection.select(9));

        let selected = selection.selected().expect("selection");
        assert_eq!(selected, &selection.items()[2]);
        assert!(selection.is_selected(9));
    }

    #[test]
    fn select_unknown_id_keeps_previous_selection() {
        let mut selection = loaded(&[4, 2, 9]);
        selection.select(2);

        assert!(!selection.select(77));

        assert_eq!(selection.selected().map(|c| c.id), Some(2));
    }

    #[test]
    fn select_on_empty_selection_is_a_no_op() {
        let mut selection = CharacterSelection::new();
        assert!(!selection.select(1));
        assert!(selection.selected().is_none());
    }

    #[test]
    fn stale_load_is_discarded_when_newer_load_started() {
        let mut selection = CharacterSelection::new();
        let first = selection.begin_load();
        let second = selection.begin_load();

        assert!(selection.finish_load(second, vec![sample_character(2, "new")]));
        assert!(!selection.finish_load(first, vec![sample_character(1, "old")]));

        assert_eq!(selection.selected().map(|c| c.id), Some(2));
        assert_eq!(selection.items().len(), 1);
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn older_ticket_resolving_first_is_still_discarded() {
        let mut selection = CharacterSelection::new();
        let first = selection.begin_load();
        let second = selection.begin_load();

        assert!(!selection.finish_load(first, vec![sample_character(1, "old")]));
        assert!(selection.selected().is_none());
        assert!(selection.finish_load(second, vec![sample_character(2, "new")]));
        assert_eq!(selection.selected().map(|c| c.id), Some(2));
    }
}
