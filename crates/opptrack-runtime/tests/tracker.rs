//! End-to-end flows through the Tracker facade over a temporary data dir

use chrono::NaiveDate;
use opptrack_runtime::{
    Error, OpportunityForm, Selection, SettleOutcome, SortDirection, SortKey, Summary, TableSort,
    Tracker, ViewState,
};
use opptrack_store::Table;
use opptrack_types::{CompanyRef, FieldPatch, OpportunityField, Status};
use tempfile::TempDir;

fn tracker() -> (TempDir, Tracker) {
    let temp_dir = TempDir::new().unwrap();
    let tracker = Tracker::init(temp_dir.path().join("data")).unwrap();
    (temp_dir, tracker)
}

fn create(tracker: &Tracker, name: &str, company: Option<&str>) -> String {
    let mut form = OpportunityForm::create(name);
    if let Some(key) = company {
        let company = tracker.companies().resolve(key).unwrap();
        form.draft.company = CompanyRef::from_company(&company);
    }
    tracker.opportunities().create(&form).unwrap().id
}

#[test]
fn test_init_creates_layout() {
    let (_temp, tracker) = tracker();
    assert!(tracker.database_path().exists());
    assert!(tracker.data_dir().join("config.toml").exists());
    assert_eq!(tracker.load_view_state(), ViewState::default());
}

#[test]
fn test_create_assigns_trailing_sort_order_and_company_name() {
    let (_temp, tracker) = tracker();
    tracker.companies().add("Acme", None).unwrap();

    let first = create(&tracker, "Support copilot", Some("acme"));
    let second = create(&tracker, "Forecasting", None);

    let ops = tracker.opportunities();
    let first = ops.resolve(&first).unwrap();
    let second = ops.resolve(&second).unwrap();
    assert_eq!(first.sort_order, 0);
    assert_eq!(second.sort_order, 1);
    assert_eq!(first.company_display(), "Acme");
    assert_eq!(second.company_display(), "");
}

#[test]
fn test_create_with_unknown_company_fails() {
    let (_temp, tracker) = tracker();
    let mut form = OpportunityForm::create("Orphan");
    form.draft.company = CompanyRef {
        id: Some("missing".to_string()),
        name: None,
    };
    assert!(matches!(
        tracker.opportunities().create(&form),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_resolve_by_prefix() {
    let (_temp, tracker) = tracker();
    let id = create(&tracker, "Prefix", None);

    let found = tracker.opportunities().resolve(&id[..8]).unwrap();
    assert_eq!(found.id, id);
}

#[test]
fn test_filters_shape_listing() {
    let (_temp, tracker) = tracker();
    let acme = tracker.companies().add("Acme", None).unwrap();
    tracker.companies().add("Globex", None).unwrap();
    let a = create(&tracker, "A", Some("acme"));
    let b = create(&tracker, "B", Some("globex"));

    let ops = tracker.opportunities();
    let mut state = ViewState::default();
    assert_eq!(ops.list(&state).unwrap().len(), 2);

    state.company_filter = Selection::only([acme.id.clone()]);
    let ids: Vec<String> = ops.list(&state).unwrap().into_iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![a.clone()]);

    state.company_filter.clear_all();
    assert!(ops.list(&state).unwrap().is_empty());

    state.company_filter.reset();
    state.opportunity_filter = Selection::only([b.clone()]);
    let ids: Vec<String> = ops.list(&state).unwrap().into_iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![b]);
}

#[test]
fn test_inline_edit_confirms_and_reconciles() {
    let (_temp, tracker) = tracker();
    let id = create(&tracker, "Status flip", None);
    let state = ViewState::default();
    let ops = tracker.opportunities();

    let mut table = ops.table(&state).unwrap();
    let patch = FieldPatch::parse(OpportunityField::Status, "done").unwrap();
    let outcome = ops.edit(&mut table, &state, &id, patch).unwrap();

    assert_eq!(outcome.settled, SettleOutcome::Confirmed);
    assert_eq!(outcome.refetch_error, None);
    assert_eq!(table.pending_count(), 0);
    assert_eq!(table.row(&id).unwrap().status, Status::Done);
    assert_eq!(table.server_rows()[0].status, Status::Done);
}

#[test]
fn test_inline_edit_of_deleted_record_reverts() {
    let (_temp, tracker) = tracker();
    let id = create(&tracker, "Doomed", None);
    let state = ViewState::default();
    let ops = tracker.opportunities();

    let mut table = ops.table(&state).unwrap();
    // Deleted elsewhere after the table was fetched
    tracker.database().delete_opportunity(&id).unwrap();

    let patch = FieldPatch::parse(OpportunityField::Status, "paused").unwrap();
    let outcome = ops.edit(&mut table, &state, &id, patch).unwrap();

    assert!(matches!(
        outcome.settled,
        SettleOutcome::Reverted {
            reverted_to: FieldPatch::Status(Status::Planned),
            ..
        }
    ));
    assert!(table.rows().is_empty());
}

#[test]
fn test_inline_edit_rejects_negative_market_size() {
    let (_temp, tracker) = tracker();
    let id = create(&tracker, "Sized", None);
    let state = ViewState::default();
    let ops = tracker.opportunities();

    let mut table = ops.table(&state).unwrap();
    let result = ops.edit(&mut table, &state, &id, FieldPatch::MarketSize(Some(-5.0)));

    assert!(matches!(result, Err(Error::Validation(_))));
    assert_eq!(table.pending_count(), 0);
    assert_eq!(ops.resolve(&id).unwrap().market_size, None);

    // The record still saves through the form afterwards
    ops.add_link(&id, "Demo", "https://demo.example.com").unwrap();
}

#[test]
fn test_inline_company_edit_fills_name() {
    let (_temp, tracker) = tracker();
    let acme = tracker.companies().add("Acme", None).unwrap();
    let id = create(&tracker, "Reassign", None);
    let state = ViewState::default();
    let ops = tracker.opportunities();

    let mut table = ops.table(&state).unwrap();
    let patch = FieldPatch::parse(OpportunityField::Company, &acme.id).unwrap();
    ops.edit(&mut table, &state, &id, patch).unwrap();

    assert_eq!(table.row(&id).unwrap().company_display(), "Acme");
}

#[test]
fn test_move_renumbers_manual_order() {
    let (_temp, tracker) = tracker();
    let a = create(&tracker, "A", None);
    let b = create(&tracker, "B", None);
    let c = create(&tracker, "C", None);

    let ops = tracker.opportunities();
    ops.move_to(&c, 0).unwrap();

    let ids: Vec<String> = ops
        .list(&ViewState::default())
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(ids, vec![c, a, b]);
}

#[test]
fn test_table_sort_from_view_state() {
    let (_temp, tracker) = tracker();
    let ops = tracker.opportunities();

    let mut early = OpportunityForm::create("Early");
    early.draft.target_date = NaiveDate::from_ymd_opt(2025, 1, 10);
    let mut late = OpportunityForm::create("Late");
    late.draft.target_date = NaiveDate::from_ymd_opt(2025, 9, 1);
    ops.create(&late).unwrap();
    ops.create(&OpportunityForm::create("Undated")).unwrap();
    ops.create(&early).unwrap();

    let state = ViewState {
        sort: TableSort::new(SortKey::TargetDate, SortDirection::Desc),
        ..Default::default()
    };
    let names: Vec<String> = ops.list(&state).unwrap().into_iter().map(|o| o.name).collect();
    assert_eq!(names, vec!["Late", "Early", "Undated"]);
}

#[test]
fn test_demo_links_through_form_path() {
    let (_temp, tracker) = tracker();
    let id = create(&tracker, "Links", None);
    let ops = tracker.opportunities();

    ops.add_link(&id, "Walkthrough", "https://www.loom.com/share/x")
        .unwrap();
    ops.add_link(&id, "", "https://demo.example.com").unwrap();
    assert!(ops.add_link(&id, "a|b", "https://x.com").is_err());

    let links = ops.links(&id).unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links.links()[1].display(), "demo.example.com");

    let removed = ops.remove_link(&id, 0).unwrap();
    assert_eq!(removed.label, "Walkthrough");
    assert_eq!(
        ops.resolve(&id).unwrap().demo_links,
        vec!["https://demo.example.com".to_string()]
    );
}

#[test]
fn test_delete_cascades_to_attachments_and_blobs() {
    let (_temp, tracker) = tracker();
    let id = create(&tracker, "With files", None);

    let attachment = tracker
        .attachments()
        .upload(&id, "notes.txt", b"hello", None)
        .unwrap();
    let blob = tracker
        .config()
        .blob_dir(tracker.data_dir())
        .join(&attachment.file_path);
    assert!(blob.exists());

    let report = tracker.opportunities().delete(&id).unwrap();
    assert_eq!(report.attachments_removed, 1);
    assert!(report.orphaned_blobs.is_empty());
    assert!(!blob.exists());
    assert!(tracker.database().list_all_attachments().unwrap().is_empty());
}

#[test]
fn test_changes_published_to_subscribers() {
    let (_temp, tracker) = tracker();
    let rx = tracker.subscribe(Table::Opportunities);

    let id = create(&tracker, "Observed", None);

    let event = rx.try_recv().unwrap();
    assert_eq!(event.id, id);
}

#[test]
fn test_view_state_round_trip_through_tracker() {
    let (_temp, tracker) = tracker();
    let mut state = tracker.load_view_state();
    state.sidebar_collapsed = true;
    state.set_column_width("name", 300).unwrap();
    tracker.save_view_state(&state).unwrap();

    let reopened = Tracker::open(tracker.data_dir().to_path_buf()).unwrap();
    assert_eq!(reopened.load_view_state(), state);
}

#[test]
fn test_summary_over_listing() {
    let (_temp, tracker) = tracker();
    let ops = tracker.opportunities();
    let mut big = OpportunityForm::create("Big");
    big.draft.market_size = Some(2_000_000.0);
    big.draft.status = Status::InProgress;
    ops.create(&big).unwrap();
    ops.create(&OpportunityForm::create("Small")).unwrap();

    let summary = Summary::from_rows(&ops.list(&ViewState::default()).unwrap());
    assert_eq!(summary.total, 2);
    assert_eq!(summary.count(Status::InProgress), 1);
    assert_eq!(summary.count(Status::Planned), 1);
    assert_eq!(summary.total_market_size, 2_000_000.0);
}
