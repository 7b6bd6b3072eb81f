//! Optimistic inline edits.
//!
//! The table keeps the last fetched server rows and, on top of them, at most
//! one local edit per `(id, field)`. Rows handed to the renderer are the
//! server rows with every non-failed edit applied, so a new value is visible
//! before the store has confirmed it.
//!
//! Each edit moves `Pending -> Confirmed` or `Pending -> Failed`. A failed
//! edit stops being overlaid, which reverts the visible value to the server
//! value at once. `reconcile` swaps in a fresh server list, drops settled
//! edits and keeps overlaying edits that are still pending.

use opptrack_types::{FieldPatch, Opportunity, OpportunityField};
use std::collections::HashMap;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum EditState {
    Pending,
    Confirmed,
    Failed {
        reverted_to: FieldPatch,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit {
    pub id: String,
    pub patch: FieldPatch,
    pub generation: u64,
    pub state: EditState,
}

/// Handle returned by [`OptimisticTable::begin`]; settles exactly that edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTicket {
    pub id: String,
    pub field: OpportunityField,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettleOutcome {
    Confirmed,
    /// Visible value went back to `reverted_to`
    Reverted {
        reverted_to: FieldPatch,
        error: String,
    },
    /// A newer edit of the same field replaced this one
    Superseded,
}

type EditKey = (String, OpportunityField);

#[derive(Debug, Default)]
pub struct OptimisticTable {
    server_rows: Vec<Opportunity>,
    edits: HashMap<EditKey, PendingEdit>,
    next_generation: u64,
}

impl OptimisticTable {
    pub fn new(server_rows: Vec<Opportunity>) -> Self {
        Self {
            server_rows,
            edits: HashMap::new(),
            next_generation: 1,
        }
    }

    /// Apply `patch` locally. Replaces any earlier edit of the same field.
    pub fn begin(&mut self, id: &str, patch: FieldPatch) -> Result<EditTicket> {
        if !self.server_rows.iter().any(|row| row.id == id) {
            return Err(Error::NotFound(format!("opportunity {}", id)));
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        let field = patch.field();
        self.edits.insert(
            (id.to_string(), field),
            PendingEdit {
                id: id.to_string(),
                patch,
                generation,
                state: EditState::Pending,
            },
        );

        Ok(EditTicket {
            id: id.to_string(),
            field,
            generation,
        })
    }

    /// Record the store's answer for `ticket`
    pub fn settle(
        &mut self,
        ticket: &EditTicket,
        result: std::result::Result<(), String>,
    ) -> SettleOutcome {
        let key = (ticket.id.clone(), ticket.field);
        let server_value = self.server_value(&ticket.id, ticket.field);

        let Some(edit) = self.edits.get_mut(&key) else {
            return SettleOutcome::Superseded;
        };
        if edit.generation != ticket.generation {
            return SettleOutcome::Superseded;
        }

        match result {
            Ok(()) => {
                edit.state = EditState::Confirmed;
                SettleOutcome::Confirmed
            }
            Err(error) => {
                let Some(reverted_to) = server_value else {
                    // Row vanished from the server list; nothing left to show
                    self.edits.remove(&key);
                    return SettleOutcome::Superseded;
                };
                edit.state = EditState::Failed {
                    reverted_to: reverted_to.clone(),
                    error: error.clone(),
                };
                SettleOutcome::Reverted { reverted_to, error }
            }
        }
    }

    /// Replace the server rows with a fresh fetch
    pub fn reconcile(&mut self, fresh: Vec<Opportunity>) {
        self.server_rows = fresh;
        let server_rows = &self.server_rows;
        self.edits.retain(|(id, _), edit| {
            edit.state == EditState::Pending && server_rows.iter().any(|row| &row.id == id)
        });
    }

    /// Rows as they should be rendered
    pub fn rows(&self) -> Vec<Opportunity> {
        let mut rows = self.server_rows.clone();
        for row in &mut rows {
            self.overlay(row);
        }
        rows
    }

    pub fn row(&self, id: &str) -> Option<Opportunity> {
        self.server_rows.iter().find(|row| row.id == id).map(|row| {
            let mut row = row.clone();
            self.overlay(&mut row);
            row
        })
    }

    pub fn server_rows(&self) -> &[Opportunity] {
        &self.server_rows
    }

    pub fn edit(&self, id: &str, field: OpportunityField) -> Option<&PendingEdit> {
        self.edits.get(&(id.to_string(), field))
    }

    pub fn pending_count(&self) -> usize {
        self.edits
            .values()
            .filter(|edit| edit.state == EditState::Pending)
            .count()
    }

    fn overlay(&self, row: &mut Opportunity) {
        let mut edits: Vec<&PendingEdit> = self
            .edits
            .values()
            .filter(|edit| edit.id == row.id)
            .filter(|edit| !matches!(edit.state, EditState::Failed { .. }))
            .collect();
        edits.sort_by_key(|edit| edit.generation);

        for edit in edits {
            edit.patch.apply(row);
        }
    }

    fn server_value(&self, id: &str, field: OpportunityField) -> Option<FieldPatch> {
        self.server_rows
            .iter()
            .find(|row| row.id == id)
            .map(|row| FieldPatch::capture(field, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opptrack_types::{CompanyRef, Indicator, Indicators, Phase, Status};

    fn row(id: &str, status: Status) -> Opportunity {
        Opportunity {
            id: id.to_string(),
            company: CompanyRef::none(),
            name: format!("Opportunity {}", id),
            description: String::new(),
            phase: Phase::default(),
            status,
            indicators: Indicators::default(),
            market_size: None,
            target_date: None,
            next_steps: String::new(),
            sort_order: 0,
            demo_links: Vec::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn status_patch(raw: &str) -> FieldPatch {
        FieldPatch::parse(OpportunityField::Status, raw).unwrap()
    }

    #[test]
    fn test_edit_visible_before_settle() {
        let mut table =
            OptimisticTable::new(vec![row("41", Status::Planned), row("42", Status::Planned)]);

        table.begin("42", status_patch("done")).unwrap();

        let rows = table.rows();
        assert_eq!(rows[1].id, "42");
        assert_eq!(rows[1].status, Status::Done);
        assert_eq!(rows[0].status, Status::Planned);
        assert_eq!(table.server_rows()[1].status, Status::Planned);
        assert_eq!(table.pending_count(), 1);
    }

    #[test]
    fn test_confirmed_edit_stays_until_reconcile() {
        let mut table = OptimisticTable::new(vec![row("42", Status::Planned)]);
        let ticket = table.begin("42", status_patch("done")).unwrap();

        assert_eq!(table.settle(&ticket, Ok(())), SettleOutcome::Confirmed);
        assert_eq!(table.row("42").unwrap().status, Status::Done);

        table.reconcile(vec![row("42", Status::Done)]);
        assert!(table.edit("42", OpportunityField::Status).is_none());
        assert_eq!(table.row("42").unwrap().status, Status::Done);
    }

    #[test]
    fn test_failed_edit_reverts_immediately() {
        let mut table = OptimisticTable::new(vec![row("42", Status::Paused)]);
        let ticket = table.begin("42", status_patch("done")).unwrap();

        let outcome = table.settle(&ticket, Err("connection reset".to_string()));
        assert_eq!(
            outcome,
            SettleOutcome::Reverted {
                reverted_to: FieldPatch::Status(Status::Paused),
                error: "connection reset".to_string(),
            }
        );
        assert_eq!(table.row("42").unwrap().status, Status::Paused);
        assert!(matches!(
            table.edit("42", OpportunityField::Status).map(|edit| &edit.state),
            Some(EditState::Failed { .. })
        ));

        table.reconcile(vec![row("42", Status::Paused)]);
        assert!(table.edit("42", OpportunityField::Status).is_none());
    }

    #[test]
    fn test_last_write_wins_and_stale_settle_ignored() {
        let mut table = OptimisticTable::new(vec![row("42", Status::Planned)]);
        let first = table.begin("42", status_patch("paused")).unwrap();
        let second = table.begin("42", status_patch("done")).unwrap();

        assert_eq!(table.row("42").unwrap().status, Status::Done);

        // Failure of the older request must not revert the newer value
        assert_eq!(
            table.settle(&first, Err("timeout".to_string())),
            SettleOutcome::Superseded
        );
        assert_eq!(table.row("42").unwrap().status, Status::Done);
        assert_eq!(table.pending_count(), 1);

        assert_eq!(table.settle(&second, Ok(())), SettleOutcome::Confirmed);
    }

    #[test]
    fn test_edits_on_different_fields_compose() {
        let mut table = OptimisticTable::new(vec![row("42", Status::Planned)]);
        table.begin("42", status_patch("in_progress")).unwrap();
        table.begin("42", FieldPatch::Campaign(Indicator::Green)).unwrap();

        let visible = table.row("42").unwrap();
        assert_eq!(visible.status, Status::InProgress);
        assert_eq!(visible.indicators.campaign, Indicator::Green);
    }

    #[test]
    fn test_reconcile_keeps_pending_over_fresh_rows() {
        let mut table = OptimisticTable::new(vec![row("42", Status::Planned)]);
        table.begin("42", status_patch("done")).unwrap();

        table.reconcile(vec![row("42", Status::Planned), row("43", Status::Paused)]);

        let rows = table.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].status, Status::Done);
        assert_eq!(table.pending_count(), 1);
    }

    #[test]
    fn test_reconcile_drops_edits_for_deleted_rows() {
        let mut table = OptimisticTable::new(vec![row("42", Status::Planned)]);
        table.begin("42", status_patch("done")).unwrap();

        table.reconcile(Vec::new());
        assert_eq!(table.pending_count(), 0);
        assert!(table.rows().is_empty());
    }

    #[test]
    fn test_begin_unknown_row() {
        let mut table = OptimisticTable::new(Vec::new());
        assert!(matches!(
            table.begin("nope", status_patch("done")),
            Err(Error::NotFound(_))
        ));
    }
}
