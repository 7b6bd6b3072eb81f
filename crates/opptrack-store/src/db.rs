use opptrack_types::{Attachment, Company, FieldPatch, Opportunity};
use rusqlite::Connection;
use std::path::Path;
use std::sync::mpsc::Receiver;
use tracing::debug;

use crate::changes::{ChangeEvent, ChangeFeed, ChangeKind, Table};
use crate::queries::{attachment, company, opportunity};
use crate::{Error, Result, schema};

pub use crate::queries::opportunity::OpportunityQuery;

/// Record store over a single SQLite database.
///
/// Every mutation publishes a [`ChangeEvent`] to subscribers of its table.
pub struct Database {
    conn: Connection,
    changes: ChangeFeed,
}

impl Database {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        schema::init_schema(&conn)?;
        debug!(path = %db_path.display(), "database opened");

        Ok(Self {
            conn,
            changes: ChangeFeed::new(),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;

        Ok(Self {
            conn,
            changes: ChangeFeed::new(),
        })
    }

    /// Subscribe to change notifications for one table
    pub fn subscribe(&self, table: Table) -> Receiver<ChangeEvent> {
        self.changes.subscribe(table)
    }

    // --- companies ---

    pub fn insert_company(&self, record: &Company) -> Result<()> {
        company::insert(&self.conn, record)?;
        self.changes
            .publish(Table::Companies, ChangeKind::Insert, &record.id);
        Ok(())
    }

    pub fn rename_company(&self, id: &str, name: &str) -> Result<()> {
        if company::rename(&self.conn, id, name)? == 0 {
            return Err(not_found("Company", id));
        }
        self.changes.publish(Table::Companies, ChangeKind::Update, id);
        Ok(())
    }

    pub fn get_company(&self, id: &str) -> Result<Option<Company>> {
        company::get(&self.conn, id)
    }

    pub fn get_company_by_slug(&self, slug: &str) -> Result<Option<Company>> {
        company::get_by_slug(&self.conn, slug)
    }

    pub fn list_companies(&self) -> Result<Vec<Company>> {
        company::list(&self.conn)
    }

    /// Delete a company. Its opportunities keep the denormalized name.
    pub fn delete_company(&self, id: &str) -> Result<()> {
        if company::delete(&self.conn, id)? == 0 {
            return Err(not_found("Company", id));
        }
        self.changes.publish(Table::Companies, ChangeKind::Delete, id);
        Ok(())
    }

    // --- opportunities ---

    pub fn insert_opportunity(&self, record: &Opportunity) -> Result<()> {
        opportunity::insert(&self.conn, record)?;
        self.changes
            .publish(Table::Opportunities, ChangeKind::Insert, &record.id);
        Ok(())
    }

    pub fn update_opportunity(&self, record: &Opportunity) -> Result<()> {
        if opportunity::update(&self.conn, record)? == 0 {
            return Err(not_found("Opportunity", &record.id));
        }
        self.changes
            .publish(Table::Opportunities, ChangeKind::Update, &record.id);
        Ok(())
    }

    pub fn update_opportunity_field(
        &self,
        id: &str,
        patch: &FieldPatch,
        updated_at: &str,
    ) -> Result<()> {
        if opportunity::update_field(&self.conn, id, patch, updated_at)? == 0 {
            return Err(not_found("Opportunity", id));
        }
        self.changes
            .publish(Table::Opportunities, ChangeKind::Update, id);
        Ok(())
    }

    pub fn get_opportunity(&self, id: &str) -> Result<Option<Opportunity>> {
        opportunity::get(&self.conn, id)
    }

    /// Find an opportunity id by prefix (supports short ids like "7f2abd2d")
    pub fn find_opportunity_by_prefix(&self, prefix: &str) -> Result<Option<String>> {
        let mut matches = opportunity::find_ids_by_prefix(&self.conn, prefix)?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(Some(matches.remove(0))),
            _ => Err(Error::Ambiguous(prefix.to_string())),
        }
    }

    pub fn list_opportunities(&self, query: &OpportunityQuery) -> Result<Vec<Opportunity>> {
        opportunity::list(&self.conn, query)
    }

    /// Delete an opportunity; attachment rows cascade
    pub fn delete_opportunity(&self, id: &str) -> Result<()> {
        if opportunity::delete(&self.conn, id)? == 0 {
            return Err(not_found("Opportunity", id));
        }
        self.changes
            .publish(Table::Opportunities, ChangeKind::Delete, id);
        Ok(())
    }

    pub fn next_sort_order(&self) -> Result<i64> {
        opportunity::next_sort_order(&self.conn)
    }

    pub fn set_sort_orders(&self, orders: &[(String, i64)], updated_at: &str) -> Result<()> {
        opportunity::set_sort_orders(&self.conn, orders, updated_at)?;
        for (id, _) in orders {
            self.changes
                .publish(Table::Opportunities, ChangeKind::Update, id);
        }
        Ok(())
    }

    // --- attachments ---

    pub fn insert_attachment(&self, record: &Attachment) -> Result<()> {
        attachment::insert(&self.conn, record)?;
        self.changes
            .publish(Table::Attachments, ChangeKind::Insert, &record.id);
        Ok(())
    }

    pub fn get_attachment(&self, id: &str) -> Result<Option<Attachment>> {
        attachment::get(&self.conn, id)
    }

    pub fn list_attachments(&self, opportunity_id: &str) -> Result<Vec<Attachment>> {
        attachment::list_for_opportunity(&self.conn, opportunity_id)
    }

    pub fn list_all_attachments(&self) -> Result<Vec<Attachment>> {
        attachment::list_all(&self.conn)
    }

    pub fn delete_attachment(&self, id: &str) -> Result<()> {
        if attachment::delete(&self.conn, id)? == 0 {
            return Err(not_found("Attachment", id));
        }
        self.changes
            .publish(Table::Attachments, ChangeKind::Delete, id);
        Ok(())
    }
}

fn not_found(entity: &'static str, id: &str) -> Error {
    Error::NotFound {
        entity,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use opptrack_types::{
        CompanyRef, Indicator, Indicators, OpportunityField, Phase, Status, slugify,
    };

    fn company(id: &str, name: &str) -> Company {
        Company {
            id: id.to_string(),
            name: name.to_string(),
            slug: slugify(name),
        }
    }

    fn opportunity(id: &str, company: CompanyRef, order: i64) -> Opportunity {
        Opportunity {
            id: id.to_string(),
            company,
            name: format!("Opportunity {}", id),
            description: String::new(),
            phase: Phase::new(1).unwrap(),
            status: Status::Planned,
            indicators: Indicators::default(),
            market_size: Some(1_000_000.0),
            target_date: NaiveDate::from_ymd_opt(2025, 6, 30),
            next_steps: String::new(),
            sort_order: order,
            demo_links: vec!["Demo|https://x.com".to_string()],
            created_at: format!("2025-01-01T00:00:0{}.000Z", order),
            updated_at: format!("2025-01-01T00:00:0{}.000Z", order),
        }
    }

    fn attachment(id: &str, opportunity_id: &str, uploaded_at: &str) -> Attachment {
        Attachment {
            id: id.to_string(),
            opportunity_id: opportunity_id.to_string(),
            file_name: format!("{}.pdf", id),
            file_path: format!("{}/{}.pdf", opportunity_id, id),
            file_size: 2048,
            mime_type: "application/pdf".to_string(),
            uploaded_at: uploaded_at.to_string(),
        }
    }

    #[test]
    fn test_schema_initialization() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.list_companies().unwrap().len(), 0);
        assert!(
            db.list_opportunities(&OpportunityQuery::all())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_opportunity_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let acme = company("c1", "Acme");
        db.insert_company(&acme).unwrap();

        let opp = opportunity("o1", CompanyRef::from_company(&acme), 0);
        db.insert_opportunity(&opp).unwrap();

        let loaded = db.get_opportunity("o1").unwrap().unwrap();
        assert_eq!(loaded, opp);
    }

    #[test]
    fn test_company_name_synced_from_id() {
        let db = Database::open_in_memory().unwrap();
        db.insert_company(&company("c1", "Acme")).unwrap();

        let stale = CompanyRef {
            id: Some("c1".to_string()),
            name: Some("Old Name".to_string()),
        };
        db.insert_opportunity(&opportunity("o1", stale, 0)).unwrap();

        let loaded = db.get_opportunity("o1").unwrap().unwrap();
        assert_eq!(loaded.company.name.as_deref(), Some("Acme"));

        db.rename_company("c1", "Acme Labs").unwrap();
        let renamed = db.get_opportunity("o1").unwrap().unwrap();
        assert_eq!(renamed.company_display(), "Acme Labs");
    }

    #[test]
    fn test_update_field() {
        let db = Database::open_in_memory().unwrap();
        db.insert_opportunity(&opportunity("42", CompanyRef::none(), 0))
            .unwrap();

        let patch = FieldPatch::parse(OpportunityField::Status, "done").unwrap();
        db.update_opportunity_field("42", &patch, "2025-02-01T00:00:00.000Z")
            .unwrap();
        db.update_opportunity_field(
            "42",
            &FieldPatch::Pricing(Indicator::Amber),
            "2025-02-01T00:00:00.000Z",
        )
        .unwrap();
        db.update_opportunity_field(
            "42",
            &FieldPatch::TargetDate(None),
            "2025-02-01T00:00:00.000Z",
        )
        .unwrap();

        let loaded = db.get_opportunity("42").unwrap().unwrap();
        assert_eq!(loaded.status, Status::Done);
        assert_eq!(loaded.indicators.pricing, Indicator::Amber);
        assert_eq!(loaded.target_date, None);
        assert_eq!(loaded.updated_at, "2025-02-01T00:00:00.000Z");
    }

    #[test]
    fn test_update_missing_record_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .update_opportunity_field("nope", &FieldPatch::SortOrder(3), "t")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_list_filters() {
        let db = Database::open_in_memory().unwrap();
        let acme = company("c1", "Acme");
        let globex = company("c2", "Globex");
        db.insert_company(&acme).unwrap();
        db.insert_company(&globex).unwrap();

        db.insert_opportunity(&opportunity("o1", CompanyRef::from_company(&acme), 2))
            .unwrap();
        db.insert_opportunity(&opportunity("o2", CompanyRef::from_company(&globex), 1))
            .unwrap();
        let legacy = CompanyRef {
            id: None,
            name: Some("Acme".to_string()),
        };
        db.insert_opportunity(&opportunity("o3", legacy, 0)).unwrap();

        let all = db.list_opportunities(&OpportunityQuery::all()).unwrap();
        let ids: Vec<&str> = all.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["o3", "o2", "o1"]);

        let acme_only = db
            .list_opportunities(&OpportunityQuery::all().companies(vec!["c1".to_string()]))
            .unwrap();
        let ids: Vec<&str> = acme_only.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["o3", "o1"]);

        let none = db
            .list_opportunities(&OpportunityQuery::all().companies(Vec::new()))
            .unwrap();
        assert!(none.is_empty());

        let picked = db
            .list_opportunities(
                &OpportunityQuery::all()
                    .companies(vec!["c1".to_string(), "c2".to_string()])
                    .opportunities(vec!["o2".to_string()]),
            )
            .unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, "o2");
    }

    #[test]
    fn test_delete_company_keeps_name() {
        let db = Database::open_in_memory().unwrap();
        let acme = company("c1", "Acme");
        db.insert_company(&acme).unwrap();
        db.insert_opportunity(&opportunity("o1", CompanyRef::from_company(&acme), 0))
            .unwrap();

        db.delete_company("c1").unwrap();

        let loaded = db.get_opportunity("o1").unwrap().unwrap();
        assert_eq!(loaded.company.id, None);
        assert_eq!(loaded.company.name.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_attachments_ordered_newest_first_and_cascade() {
        let db = Database::open_in_memory().unwrap();
        db.insert_opportunity(&opportunity("o1", CompanyRef::none(), 0))
            .unwrap();

        db.insert_attachment(&attachment("a1", "o1", "2025-01-01T00:00:00.000Z"))
            .unwrap();
        db.insert_attachment(&attachment("a2", "o1", "2025-03-01T00:00:00.000Z"))
            .unwrap();
        db.insert_attachment(&attachment("a3", "o1", "2025-02-01T00:00:00.000Z"))
            .unwrap();

        let listed = db.list_attachments("o1").unwrap();
        let ids: Vec<&str> = listed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a3", "a1"]);

        db.delete_opportunity("o1").unwrap();
        assert!(db.list_attachments("o1").unwrap().is_empty());
    }

    #[test]
    fn test_attachment_requires_opportunity() {
        let db = Database::open_in_memory().unwrap();
        let result = db.insert_attachment(&attachment("a1", "ghost", "2025-01-01T00:00:00.000Z"));
        assert!(matches!(result, Err(Error::Database(_))));
    }

    #[test]
    fn test_set_sort_orders() {
        let db = Database::open_in_memory().unwrap();
        for (i, id) in ["o1", "o2", "o3"].iter().enumerate() {
            db.insert_opportunity(&opportunity(id, CompanyRef::none(), i as i64))
                .unwrap();
        }
        assert_eq!(db.next_sort_order().unwrap(), 3);

        db.set_sort_orders(
            &[
                ("o3".to_string(), 0),
                ("o1".to_string(), 1),
                ("o2".to_string(), 2),
            ],
            "2025-02-01T00:00:00.000Z",
        )
        .unwrap();

        let ids: Vec<String> = db
            .list_opportunities(&OpportunityQuery::all())
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["o3", "o1", "o2"]);

        let err = db
            .set_sort_orders(&[("o1".to_string(), 9), ("ghost".to_string(), 0)], "t")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        let o1 = db.get_opportunity("o1").unwrap().unwrap();
        assert_eq!(o1.sort_order, 1);
    }

    #[test]
    fn test_find_by_prefix() {
        let db = Database::open_in_memory().unwrap();
        db.insert_opportunity(&opportunity("abc-1", CompanyRef::none(), 0))
            .unwrap();
        db.insert_opportunity(&opportunity("abd-2", CompanyRef::none(), 1))
            .unwrap();

        assert_eq!(
            db.find_opportunity_by_prefix("abc").unwrap().as_deref(),
            Some("abc-1")
        );
        assert_eq!(db.find_opportunity_by_prefix("zzz").unwrap(), None);
        assert!(matches!(
            db.find_opportunity_by_prefix("ab"),
            Err(Error::Ambiguous(_))
        ));
        assert_eq!(db.find_opportunity_by_prefix("a_c").unwrap(), None);
    }

    #[test]
    fn test_mutations_publish_changes() {
        let db = Database::open_in_memory().unwrap();
        let rx = db.subscribe(Table::Opportunities);

        db.insert_opportunity(&opportunity("o1", CompanyRef::none(), 0))
            .unwrap();
        db.update_opportunity_field("o1", &FieldPatch::SortOrder(5), "t")
            .unwrap();
        db.delete_opportunity("o1").unwrap();

        let kinds: Vec<ChangeKind> = rx.try_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ChangeKind::Insert, ChangeKind::Update, ChangeKind::Delete]
        );
    }
}
