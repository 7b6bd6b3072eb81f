//! Integration tests for schema versioning
//!
//! The record store is the source of truth, so opening must never drop data
//! and must refuse databases written by a newer schema.

use opptrack_store::{Database, Error, OpportunityQuery, SCHEMA_VERSION};
use opptrack_types::{Company, CompanyRef, Opportunity, OpportunityDraft, new_id, now_rfc3339};
use rusqlite::Connection;
use tempfile::TempDir;

fn opportunity_from(draft: OpportunityDraft) -> Opportunity {
    let now = now_rfc3339();
    Opportunity {
        id: new_id(),
        company: draft.company,
        name: draft.name,
        description: draft.description,
        phase: draft.phase,
        status: draft.status,
        indicators: draft.indicators,
        market_size: draft.market_size,
        target_date: draft.target_date,
        next_steps: draft.next_steps,
        sort_order: draft.sort_order.unwrap_or(0),
        demo_links: draft.demo_links,
        created_at: now.clone(),
        updated_at: now,
    }
}

#[test]
fn test_fresh_database_sets_user_version() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("opptrack.db");

    Database::open(&db_path).unwrap();

    let conn = Connection::open(&db_path).unwrap();
    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}

#[test]
fn test_reopen_preserves_records() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("opptrack.db");

    {
        let db = Database::open(&db_path).unwrap();
        let company = Company {
            id: "c1".to_string(),
            name: "Acme".to_string(),
            slug: "acme".to_string(),
        };
        db.insert_company(&company).unwrap();

        let mut draft = OpportunityDraft::new("Support copilot");
        draft.company = CompanyRef::from_company(&company);
        db.insert_opportunity(&opportunity_from(draft)).unwrap();
    }

    let db = Database::open(&db_path).unwrap();
    let listed = db.list_opportunities(&OpportunityQuery::all()).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Support copilot");
    assert_eq!(listed[0].company_display(), "Acme");
}

#[test]
fn test_newer_schema_is_refused() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("opptrack.db");

    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", SCHEMA_VERSION + 1))
            .unwrap();
    }

    match Database::open(&db_path) {
        Err(Error::SchemaTooNew { found, supported }) => {
            assert_eq!(found, SCHEMA_VERSION + 1);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("newer schema should be refused"),
    }
}

#[test]
fn test_corrupt_demo_links_surface_as_decode_error() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("opptrack.db");

    let db = Database::open(&db_path).unwrap();
    let opp = opportunity_from(OpportunityDraft::new("Broken"));
    db.insert_opportunity(&opp).unwrap();

    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute(
            "UPDATE opportunities SET demo_links = 'not json' WHERE id = ?1",
            [&opp.id],
        )
        .unwrap();
    }

    let err = db.get_opportunity(&opp.id).unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}
