use crate::models::{FeedbackRecord, ProjectRecord, QuestionRecord};

pub trait Record {
    fn id(&self) -> u32;
}

/// Validated form input that becomes a record once an id is assigned.
pub trait Draft {
    type Record: Record;

    fn into_record(self, id: u32) -> Self::Record;
}

impl Record for ProjectRecord {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Record for FeedbackRecord {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Record for QuestionRecord {
    fn id(&self) -> u32 {
        self.id
    }
}

/// Hands out identifiers strictly increasing from `max(seeded) + 1`.
/// An id is never handed out twice, even after its record is removed.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn seeded_from<I: IntoIterator<Item = u32>>(ids: I) -> Self {
        let next = ids.into_iter().max().map_or(1, |max| max.saturating_add(1));
        IdAllocator { next }
    }

    pub fn peek(&self) -> u32 {
        self.next
    }

    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }
}

/// The in-memory, insertion-ordered record list owned by one page.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    records: Vec<T>,
    ids: IdAllocator,
}

impl<T: Record> Collection<T> {
    pub fn from_records(records: Vec<T>) -> Self {
        let ids = IdAllocator::seeded_from(records.iter().map(Record::id));
        let mut seen = std::collections::HashSet::new();
        for record in &records {
            if !seen.insert(record.id()) {
                log::warn!("duplicate record id {} in seed data", record.id());
            }
        }
        Collection { records, ids }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn next_id(&self) -> u32 {
        self.ids.peek()
    }

    pub fn append<D>(&mut self, draft: D) -> &T
    where
        D: Draft<Record = T>,
    {
        let id = self.ids.allocate();
        log::debug!("appending record #{}", id);
        self.records.push(draft.into_record(id));
        &self.records[self.records.len() - 1]
    }

    pub fn remove(&mut self, id: u32) -> Option<T> {
        let position = self.records.iter().position(|record| record.id() == id)?;
        log::debug!("removing record #{}", id);
        Some(self.records.remove(position))
    }
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Collection::from_records(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: u32,
        body: String,
    }

    impl Record for Note {
        fn id(&self) -> u32 {
            self.id
        }
    }

    struct NoteDraft(&'static str);

    impl Draft for NoteDraft {
        type Record = Note;

        fn into_record(self, id: u32) -> Note {
            Note { id, body: self.0.to_string() }
        }
    }

    fn note(id: u32, body: &str) -> Note {
        Note { id, body: body.to_string() }
    }

    #[test]
    fn empty_collection_starts_at_one() {
        let mut notes: Collection<Note> = Collection::default();
        assert!(notes.is_empty());
        assert_eq!(notes.append(NoteDraft("first")).id, 1);
    }

    #[test]
    fn next_id_follows_the_largest_seeded_id() {
        let mut notes = Collection::from_records(vec![note(3, "a"), note(7, "b"), note(5, "c")]);
        assert_eq!(notes.next_id(), 8);
        let created = notes.append(NoteDraft("d"));
        assert_eq!(created.id, 8);
        assert_eq!(notes.records().last().map(|n| n.body.as_str()), Some("d"));
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut notes = Collection::from_records(vec![note(1, "a"), note(2, "b")]);
        assert!(notes.remove(2).is_some());
        assert_eq!(notes.append(NoteDraft("c")).id, 3);
        assert!(notes.remove(3).is_some());
        assert_eq!(notes.append(NoteDraft("d")).id, 4);
        let ids: Vec<u32> = notes.records().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn removing_a_missing_id_is_a_no_op() {
        let mut notes = Collection::from_records(vec![note(1, "a")]);
        assert_eq!(notes.remove(42), None);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes.get(1), Some(&note(1, "a")));
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut notes = Collection::from_records(vec![note(10, "a")]);
        notes.append(NoteDraft("b"));
        notes.append(NoteDraft("c"));
        let bodies: Vec<&str> = notes.records().iter().map(|n| n.body.as_str()).collect();
        assert_eq!(bodies, vec!["a", "b", "c"]);
    }
}
