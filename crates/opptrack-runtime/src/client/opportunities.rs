use opptrack_store::{BlobStore, Database, OpportunityQuery};
use opptrack_types::{
    CompanyRef, DemoLink, DemoLinks, FieldPatch, Opportunity, OpportunityDraft, new_id,
    now_rfc3339,
};
use tracing::{info, warn};

use crate::client::AttachmentOps;
use crate::edits::{EditTicket, OptimisticTable, SettleOutcome};
use crate::form::{OpportunityForm, validate_market_size};
use crate::view::{SortDirection, SortKey, TableSort, reorder, sort_rows};
use crate::view_state::ViewState;
use crate::{Error, Result};

/// What an inline edit ended as, after the refetch
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub ticket: EditTicket,
    pub settled: SettleOutcome,
    /// Refetch after settling failed; rows still show the overlay
    pub refetch_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    pub id: String,
    pub attachments_removed: usize,
    pub orphaned_blobs: Vec<String>,
}

pub struct OpportunityOps<'a> {
    db: &'a Database,
    blobs: &'a dyn BlobStore,
}

impl<'a> OpportunityOps<'a> {
    pub fn new(db: &'a Database, blobs: &'a dyn BlobStore) -> Self {
        Self { db, blobs }
    }

    /// Rows visible under `state`'s filters, in its table sort
    pub fn list(&self, state: &ViewState) -> Result<Vec<Opportunity>> {
        let mut rows = self
            .db
            .list_opportunities(&state.query())
            .map_err(Error::Fetch)?;
        sort_rows(&mut rows, state.sort);
        Ok(rows)
    }

    /// Every row in manual order, ignoring filters
    pub fn list_all(&self) -> Result<Vec<Opportunity>> {
        self.db
            .list_opportunities(&OpportunityQuery::all())
            .map_err(Error::Fetch)
    }

    /// Look up by full id or unique id prefix
    pub fn resolve(&self, key: &str) -> Result<Opportunity> {
        if let Some(opp) = self.db.get_opportunity(key)? {
            return Ok(opp);
        }

        let id = self
            .db
            .find_opportunity_by_prefix(key)?
            .ok_or_else(|| Error::NotFound(format!("opportunity '{}'", key)))?;

        self.db
            .get_opportunity(&id)?
            .ok_or_else(|| Error::NotFound(format!("opportunity '{}'", key)))
    }

    pub fn create(&self, form: &OpportunityForm) -> Result<Opportunity> {
        let draft = form.submit()?;
        let company = self.resolve_company(&draft.company)?;
        let sort_order = match draft.sort_order {
            Some(order) => order,
            None => self.db.next_sort_order()?,
        };

        let now = now_rfc3339();
        let opp = build(new_id(), draft, company, sort_order, now.clone(), now);
        self.db.insert_opportunity(&opp)?;
        info!(opportunity = %opp.id, name = %opp.name, "opportunity created");

        self.fetch_one(&opp.id)
    }

    /// Full update from an edit form
    pub fn save(&self, form: &OpportunityForm) -> Result<Opportunity> {
        let id = form
            .editing()
            .ok_or_else(|| Error::Validation("form is not editing a record".to_string()))?;
        let existing = self.resolve(id)?;

        let draft = form.submit()?;
        let company = self.resolve_company(&draft.company)?;
        let sort_order = draft.sort_order.unwrap_or(existing.sort_order);

        let opp = build(
            existing.id,
            draft,
            company,
            sort_order,
            existing.created_at,
            now_rfc3339(),
        );
        self.db.update_opportunity(&opp)?;
        info!(opportunity = %opp.id, "opportunity saved");

        self.fetch_one(&opp.id)
    }

    /// Delete the record, its attachment rows and their blobs
    pub fn delete(&self, id: &str) -> Result<DeleteReport> {
        let opp = self.resolve(id)?;
        let attachments = self.db.list_attachments(&opp.id)?;

        self.db.delete_opportunity(&opp.id)?;
        let orphaned_blobs = AttachmentOps::new(self.db, self.blobs).remove_blobs(&attachments);
        info!(
            opportunity = %opp.id,
            attachments = attachments.len(),
            "opportunity deleted"
        );

        Ok(DeleteReport {
            id: opp.id,
            attachments_removed: attachments.len(),
            orphaned_blobs,
        })
    }

    /// Snapshot for inline editing
    pub fn table(&self, state: &ViewState) -> Result<OptimisticTable> {
        Ok(OptimisticTable::new(self.list(state)?))
    }

    /// Inline edit: show locally, persist, settle, refetch.
    ///
    /// A store failure is not an error here; it comes back as
    /// [`SettleOutcome::Reverted`] with the visible value already restored.
    pub fn edit(
        &self,
        table: &mut OptimisticTable,
        state: &ViewState,
        id: &str,
        patch: FieldPatch,
    ) -> Result<EditOutcome> {
        let patch = self.prepare_patch(patch)?;
        let ticket = table.begin(id, patch.clone())?;

        let result = self
            .db
            .update_opportunity_field(id, &patch, &now_rfc3339())
            .map_err(|err| {
                warn!(
                    opportunity = %id,
                    field = %ticket.field,
                    error = %err,
                    "inline edit failed, reverting"
                );
                err.to_string()
            });
        let settled = table.settle(&ticket, result);

        let refetch_error = match self.list(state) {
            Ok(fresh) => {
                table.reconcile(fresh);
                None
            }
            Err(err) => {
                warn!(error = %err, "refetch after edit failed");
                Some(err.to_string())
            }
        };

        Ok(EditOutcome {
            ticket,
            settled,
            refetch_error,
        })
    }

    /// Move a record to `new_index` in manual order and renumber
    pub fn move_to(&self, id: &str, new_index: usize) -> Result<Vec<(String, i64)>> {
        let opp = self.resolve(id)?;
        let mut rows = self.list_all()?;
        sort_rows(&mut rows, TableSort::new(SortKey::Manual, SortDirection::Asc));

        let changes = reorder(&rows, &opp.id, new_index)?;
        if !changes.is_empty() {
            self.db.set_sort_orders(&changes, &now_rfc3339())?;
        }
        Ok(changes)
    }

    pub fn links(&self, id: &str) -> Result<DemoLinks> {
        let opp = self.resolve(id)?;
        Ok(DemoLinks::from_raw(&opp.demo_links))
    }

    pub fn add_link(&self, id: &str, label: &str, url: &str) -> Result<Opportunity> {
        if url.trim().is_empty() {
            return Err(Error::Validation("demo link URL is required".to_string()));
        }
        let mut form = OpportunityForm::edit(&self.resolve(id)?);
        form.add_link(label, url)?;
        self.save(&form)
    }

    pub fn remove_link(&self, id: &str, index: usize) -> Result<DemoLink> {
        let mut form = OpportunityForm::edit(&self.resolve(id)?);
        let removed = form.remove_link(index)?;
        self.save(&form)?;
        Ok(removed)
    }

    fn fetch_one(&self, id: &str) -> Result<Opportunity> {
        self.db
            .get_opportunity(id)?
            .ok_or_else(|| Error::NotFound(format!("opportunity '{}'", id)))
    }

    // Company references by id must point at a real company; its name is
    // taken from the store.
    fn resolve_company(&self, company: &CompanyRef) -> Result<CompanyRef> {
        match &company.id {
            Some(id) => {
                let found = self
                    .db
                    .get_company(id)?
                    .ok_or_else(|| Error::NotFound(format!("company '{}'", id)))?;
                Ok(CompanyRef::from_company(&found))
            }
            None => Ok(company.clone()),
        }
    }

    fn prepare_patch(&self, patch: FieldPatch) -> Result<FieldPatch> {
        match patch {
            FieldPatch::Company(company) => {
                Ok(FieldPatch::Company(self.resolve_company(&company)?))
            }
            FieldPatch::Name(name) if name.trim().is_empty() => {
                Err(Error::Validation("name is required".to_string()))
            }
            FieldPatch::MarketSize(size) => {
                validate_market_size(size)?;
                Ok(FieldPatch::MarketSize(size))
            }
            other => Ok(other),
        }
    }
}

fn build(
    id: String,
    draft: OpportunityDraft,
    company: CompanyRef,
    sort_order: i64,
    created_at: String,
    updated_at: String,
) -> Opportunity {
    Opportunity {
        id,
        company,
        name: draft.name,
        description: draft.description,
        phase: draft.phase,
        status: draft.status,
        indicators: draft.indicators,
        market_size: draft.market_size,
        target_date: draft.target_date,
        next_steps: draft.next_steps,
        sort_order,
        demo_links: draft.demo_links,
        created_at,
        updated_at,
    }
}
