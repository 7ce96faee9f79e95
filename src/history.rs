use crate::event::{EventBus, HistoryMove, HistoryStatus};
use crate::snapshot::Snapshot;

/// Linear undo/redo over whole-surface snapshots.
///
/// Never empty: `0 <= cursor < snapshots.len()` holds after every operation.
/// Pushing after an undo discards the redo branch.
pub struct HistoryStack {
    /// Every recorded step, oldest first
    snapshots: Vec<Snapshot>,
    /// Index of the step currently shown
    cursor: usize,
    /// Maximum number of steps kept, `None` for unbounded
    limit: Option<usize>,
    moved: EventBus<HistoryMove>,
    changed: EventBus<HistoryStatus>,
}

impl std::fmt::Debug for HistoryStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStack")
            .field("cursor", &self.cursor)
            .field("step_count", &self.snapshots.len())
            .field("limit", &self.limit)
            .finish()
    }
}

impl HistoryStack {
    /// Creates a history seeded with `initial` at cursor 0
    pub fn new(initial: Snapshot) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            limit: None,
            moved: EventBus::new(),
            changed: EventBus::new(),
        }
    }

    /// Caps the number of kept steps. A limit below 1 is treated as 1.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.map(|limit| limit.max(1));
        self
    }

    /// Step back to the previous snapshot. No-op at the first step.
    pub fn back(&mut self) {
        if self.cursor == 0 {
            return;
        }

        self.cursor -= 1;
        self.notify_moved();
        self.notify_changed();
    }

    /// Step forward to the next snapshot. No-op at the last step.
    pub fn forward(&mut self) {
        if self.cursor + 1 == self.snapshots.len() {
            return;
        }

        self.cursor += 1;
        self.notify_moved();
        self.notify_changed();
    }

    /// Record a new step after the cursor, dropping any redo branch.
    ///
    /// Only the change channel fires: the surface already shows this content.
    pub fn push(&mut self, snapshot: Snapshot) {
        let discarded = self.snapshots.len() - self.cursor - 1;
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);

        if let Some(limit) = self.limit {
            let overflow = self.snapshots.len().saturating_sub(limit);
            self.snapshots.drain(..overflow);
        }
        self.cursor = self.snapshots.len() - 1;

        log::debug!(
            "History push: {} steps, cursor {}, {} redo steps discarded",
            self.snapshots.len(),
            self.cursor,
            discarded
        );
        self.notify_changed();
    }

    /// Drop every step and reseed with `snapshot`.
    ///
    /// Fires both move and change, so move subscribers redraw the seed even
    /// when the surface already shows it.
    pub fn reset(&mut self, snapshot: Snapshot) {
        self.snapshots = vec![snapshot];
        self.cursor = 0;

        log::debug!("History reset");
        self.notify_moved();
        self.notify_changed();
    }

    pub fn current_snapshot(&self) -> &Snapshot {
        &self.snapshots[self.cursor]
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor
    }

    pub fn step_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if there are steps that can be undone
    pub fn can_undo(&self) -> bool {
        self.status().can_undo()
    }

    /// Returns true if there are steps that can be redone
    pub fn can_redo(&self) -> bool {
        self.status().can_redo()
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            cursor: self.cursor,
            step_count: self.snapshots.len(),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// The visible content must be replaced
    pub fn moved(&self) -> &EventBus<HistoryMove> {
        &self.moved
    }

    /// Undo/redo availability may have changed
    pub fn changed(&self) -> &EventBus<HistoryStatus> {
        &self.changed
    }

    fn notify_moved(&self) {
        self.moved.emit(&HistoryMove {
            cursor: self.cursor,
            snapshot: self.current_snapshot().clone(),
        });
    }

    fn notify_changed(&self) {
        self.changed.emit(&self.status());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn snap(tag: u8) -> Snapshot {
        Snapshot::from_png_bytes(vec![tag])
    }

    #[derive(Debug, PartialEq)]
    enum Note {
        Moved(usize),
        Changed(usize, usize),
    }

    fn record(history: &HistoryStack) -> Rc<RefCell<Vec<Note>>> {
        let notes = Rc::new(RefCell::new(Vec::new()));
        let moves = Rc::clone(&notes);
        history
            .moved()
            .subscribe(move |event: &HistoryMove| moves.borrow_mut().push(Note::Moved(event.cursor)));
        let changes = Rc::clone(&notes);
        history.changed().subscribe(move |status: &HistoryStatus| {
            changes
                .borrow_mut()
                .push(Note::Changed(status.cursor, status.step_count))
        });
        notes
    }

    #[test]
    fn test_push_fires_change_only() {
        let mut history = HistoryStack::new(snap(0));
        let notes = record(&history);

        history.push(snap(1));

        assert_eq!(*notes.borrow(), vec![Note::Changed(1, 2)]);
        assert_eq!(history.current_snapshot(), &snap(1));
    }

    #[test]
    fn test_back_and_forward_fire_move_then_change() {
        let mut history = HistoryStack::new(snap(0));
        history.push(snap(1));
        let notes = record(&history);

        history.back();
        history.forward();

        assert_eq!(
            *notes.borrow(),
            vec![
                Note::Moved(0),
                Note::Changed(0, 2),
                Note::Moved(1),
                Note::Changed(1, 2),
            ]
        );
    }

    #[test]
    fn test_edges_are_silent_no_ops() {
        let mut history = HistoryStack::new(snap(0));
        let notes = record(&history);

        history.back();
        history.forward();

        assert!(notes.borrow().is_empty());
        assert_eq!(history.cursor_index(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_after_undo_prunes_redo_branch() {
        let mut history = HistoryStack::new(snap(0));
        history.push(snap(1));
        history.push(snap(2));
        history.push(snap(3));

        history.back();
        history.back();
        history.push(snap(4));

        assert_eq!(history.step_count(), 3);
        assert_eq!(history.cursor_index(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.current_snapshot(), &snap(4));
    }

    #[test]
    fn test_reset_fires_both_channels() {
        let mut history = HistoryStack::new(snap(0));
        history.push(snap(1));
        let notes = record(&history);

        history.reset(snap(9));

        assert_eq!(*notes.borrow(), vec![Note::Moved(0), Note::Changed(0, 1)]);
        assert_eq!(history.step_count(), 1);
        assert_eq!(history.current_snapshot(), &snap(9));
    }

    #[test]
    fn test_limit_drops_oldest_steps() {
        let mut history = HistoryStack::new(snap(0)).with_limit(Some(3));
        for tag in 1..=5 {
            history.push(snap(tag));
        }

        assert_eq!(history.step_count(), 3);
        assert_eq!(history.cursor_index(), 2);
        assert_eq!(history.current_snapshot(), &snap(5));

        history.back();
        history.back();
        history.back();
        assert_eq!(history.current_snapshot(), &snap(3));
    }
}
