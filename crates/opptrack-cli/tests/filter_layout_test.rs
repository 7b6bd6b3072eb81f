use opptrack_testing::TestWorld;
use opptrack_testing::assertions::{assert_names_in_order, record_id};

fn seed(world: &TestWorld) -> (String, String) {
    world.json(&["company", "add", "Acme"]).unwrap();
    world.json(&["company", "add", "Globex"]).unwrap();
    let a = world
        .json(&["opp", "add", "Acme bot", "--company", "acme"])
        .unwrap();
    let g = world
        .json(&["opp", "add", "Globex bot", "--company", "globex"])
        .unwrap();
    (
        record_id(&a, "opportunity").unwrap(),
        record_id(&g, "opportunity").unwrap(),
    )
}

#[test]
fn test_company_filter_persists_across_runs() {
    let world = TestWorld::new().initialized();
    seed(&world);

    let json = world.json(&["filter", "company", "only", "acme"]).unwrap();
    assert_eq!(json["mode"], "selected");
    assert_eq!(json["dimension"], "Company");

    let listing = world.json(&["opp", "list"]).unwrap();
    assert_names_in_order(&listing, &["Acme bot"]).unwrap();

    let plain = world.run(&["opp", "list"]).unwrap();
    assert!(plain.stdout().starts_with("Companies: Acme  |  Opportunities: all"));

    world.json(&["filter", "company", "all"]).unwrap();
    let listing = world.json(&["opp", "list"]).unwrap();
    assert_names_in_order(&listing, &["Acme bot", "Globex bot"]).unwrap();
}

#[test]
fn test_toggle_from_all_excludes_one() {
    let world = TestWorld::new().initialized();
    seed(&world);

    world.json(&["filter", "company", "toggle", "globex"]).unwrap();
    let listing = world.json(&["opp", "list"]).unwrap();
    assert_names_in_order(&listing, &["Acme bot"]).unwrap();

    // Toggling back restores it, still as an explicit selection
    let json = world.json(&["filter", "company", "toggle", "globex"]).unwrap();
    assert_eq!(json["mode"], "selected");
    assert_eq!(json["ids"].as_array().unwrap().len(), 2);
}

#[test]
fn test_clear_selects_nothing() {
    let world = TestWorld::new().initialized();
    let (a, _) = seed(&world);

    world.json(&["filter", "opportunity", "clear"]).unwrap();
    let listing = world.json(&["opp", "list"]).unwrap();
    assert_names_in_order(&listing, &[]).unwrap();

    let plain = world.run(&["opp", "list"]).unwrap();
    assert!(plain.stdout().contains("No opportunities."));

    world
        .json(&["filter", "opportunity", "only", &a[..8]])
        .unwrap();
    let listing = world.json(&["opp", "list"]).unwrap();
    assert_names_in_order(&listing, &["Acme bot"]).unwrap();
}

#[test]
fn test_collapsed_sidebar_hides_filter_line() {
    let world = TestWorld::new().initialized();
    seed(&world);
    world.json(&["filter", "company", "only", "globex"]).unwrap();

    let layout = world.json(&["layout", "sidebar", "collapse"]).unwrap();
    assert_eq!(layout["sidebar_collapsed"], true);

    let plain = world.run(&["opp", "list"]).unwrap();
    assert!(plain.stdout().starts_with("ID"));

    let layout = world.json(&["layout", "sidebar", "toggle"]).unwrap();
    assert_eq!(layout["sidebar_collapsed"], false);
}

#[test]
fn test_column_widths_clamped_and_reset() {
    let world = TestWorld::new().initialized();

    let json = world.json(&["layout", "column", "name", "10"]).unwrap();
    assert_eq!(json["column_widths"]["name"], 48);

    let json = world.json(&["layout", "column", "name", "5000"]).unwrap();
    assert_eq!(json["column_widths"]["name"], 1200);

    let unknown = world.run(&["layout", "column", "colour", "100"]).unwrap();
    assert!(!unknown.success());

    let json = world.json(&["layout", "column", "name", "--reset"]).unwrap();
    assert!(json["column_widths"].as_object().unwrap().is_empty());
}

#[test]
fn test_saved_sort_applies_to_list() {
    let world = TestWorld::new().initialized();
    seed(&world);

    let json = world.json(&["layout", "sort", "name", "--desc"]).unwrap();
    assert_eq!(json["sort"]["key"], "name");
    assert_eq!(json["sort"]["direction"], "desc");

    let listing = world.json(&["opp", "list"]).unwrap();
    assert_names_in_order(&listing, &["Globex bot", "Acme bot"]).unwrap();
}

#[test]
fn test_corrupt_view_state_falls_back_to_defaults() {
    let world = TestWorld::new().initialized();
    seed(&world);
    std::fs::write(world.data_dir().join("view-state.json"), "{not json").unwrap();

    let listing = world.json(&["opp", "list"]).unwrap();
    assert_names_in_order(&listing, &["Acme bot", "Globex bot"]).unwrap();
}
