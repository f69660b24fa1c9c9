use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn curate(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("curate").unwrap();
    cmd.current_dir(dir)
        .env("CURATE_HOME", dir.join("global"))
        .env_remove("CURATE_LOG");
    cmd
}

fn add_faqs(dir: &Path, questions: &[&str]) {
    for q in questions {
        curate(dir)
            .args(["add", "faq", &format!("question={}", q), "answer=Yes"])
            .assert()
            .success();
    }
}

fn saved_faqs(dir: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(dir.join(".curate").join("faq.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_init_creates_config() {
    let temp_dir = tempfile::tempdir().unwrap();

    curate(temp_dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));
    assert!(temp_dir.path().join(".curate/config.json").exists());

    curate(temp_dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));
}

#[test]
fn test_add_and_list_in_order() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_faqs(temp_dir.path(), &["Alpha?", "Beta?", "Gamma?"]);

    curate(temp_dir.path())
        .args(["list", "faq"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("@1. ")
                .and(predicate::str::contains("Alpha?"))
                .and(predicate::str::contains("@3. ")),
        );

    let saved = saved_faqs(temp_dir.path());
    assert_eq!(saved["kind"], "faq");
    let orders: Vec<u64> = saved["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["order"].as_u64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[test]
fn test_add_reports_missing_fields() {
    let temp_dir = tempfile::tempdir().unwrap();

    curate(temp_dir.path())
        .args(["add", "faq", "question=Half?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("answer"));
    assert!(!temp_dir.path().join(".curate/faq.json").exists());
}

#[test]
fn test_move_and_delete_renumber() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_faqs(temp_dir.path(), &["A", "B", "C"]);

    curate(temp_dir.path())
        .args(["move", "faq", "@1", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved faq to @3: A"));

    curate(temp_dir.path())
        .args(["delete", "faq", "@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted faq (@1): B"));

    let saved = saved_faqs(temp_dir.path());
    let rows: Vec<(String, u64)> = saved["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| {
            (
                r["fields"]["question"].as_str().unwrap().to_string(),
                r["order"].as_u64().unwrap(),
            )
        })
        .collect();
    assert_eq!(rows, vec![("C".to_string(), 1), ("A".to_string(), 2)]);
}

#[test]
fn test_search_filters_list() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_faqs(temp_dir.path(), &["Shipping costs", "Refund policy", "Shipping time"]);

    curate(temp_dir.path())
        .args(["list", "faq", "--search", "SHIPPING"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Shipping costs")
                .and(predicate::str::contains("Shipping time"))
                .and(predicate::str::contains("Refund").not()),
        );
}

#[test]
fn test_edit_toggle_and_assign() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_faqs(temp_dir.path(), &["Original?"]);

    curate(temp_dir.path())
        .args(["edit", "faq", "@1", "question=Renamed?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated faq @1"));

    curate(temp_dir.path())
        .args(["toggle", "faq", "@1", "display_home_page"])
        .assert()
        .success()
        .stdout(predicate::str::contains("display_home_page off"));

    let saved = saved_faqs(temp_dir.path());
    let record = &saved["records"][0];
    assert_eq!(record["fields"]["question"], "Renamed?");
    assert_eq!(record["fields"]["display_home_page"], false);

    let pending = format!("temp-{}", record["id"]["pending"].as_str().unwrap());
    curate(temp_dir.path())
        .args(["assign", "faq", &pending, "17"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is now 17"));

    let saved = saved_faqs(temp_dir.path());
    assert_eq!(saved["records"][0]["id"]["persisted"], 17);

    curate(temp_dir.path())
        .args(["delete", "faq", "17"])
        .assert()
        .success();
    let saved = saved_faqs(temp_dir.path());
    assert!(saved["records"].as_array().unwrap().is_empty());
}

#[test]
fn test_nested_plans_order_per_product() {
    let temp_dir = tempfile::tempdir().unwrap();
    for (parent, package) in [("1", "Basic"), ("2", "Solo"), ("1", "Pro"), ("1", "Team")] {
        curate(temp_dir.path())
            .args(["add", "pricing-plan", &format!("package={}", package), "price=9"])
            .args(["--parent", parent])
            .assert()
            .success();
    }

    curate(temp_dir.path())
        .args(["move", "pricing-plan", "@3", "1", "--parent", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Team"));

    curate(temp_dir.path())
        .args(["list", "pricing-plan", "--parent", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("@1. ").and(predicate::str::contains("Solo")));

    curate(temp_dir.path())
        .args(["list", "pricing-plan", "--parent", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Team").and(predicate::str::contains("Solo").not()));
}

#[test]
fn test_kinds_lists_rules() {
    let temp_dir = tempfile::tempdir().unwrap();

    curate(temp_dir.path())
        .arg("kinds")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("cookie_service")
                .and(predicate::str::contains("nested under product")),
        );
}

#[test]
fn test_global_store_uses_curate_home() {
    let temp_dir = tempfile::tempdir().unwrap();

    curate(temp_dir.path())
        .args(["-g", "add", "blog-post", "title=Hello World"])
        .assert()
        .success();

    let file = temp_dir.path().join("global").join("blog_post.json");
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(file).unwrap()).unwrap();
    assert_eq!(saved["records"][0]["fields"]["slug"], "hello-world");
    assert!(!temp_dir.path().join(".curate").exists());
}

#[test]
fn test_invalid_locator_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_faqs(temp_dir.path(), &["A"]);

    curate(temp_dir.path())
        .args(["edit", "faq", "@0", "answer=x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid locator"));
}

#[test]
fn test_listed_pending_key_is_a_usable_locator() {
    let temp_dir = tempfile::tempdir().unwrap();
    add_faqs(temp_dir.path(), &["Pending?"]);

    let output = curate(temp_dir.path())
        .args(["list", "faq"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let start = stdout.find("temp-").expect("pending key is listed");
    let key: String = stdout[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    assert_eq!(key.len(), "temp-".len() + 32);

    curate(temp_dir.path())
        .args(["edit", "faq", &key, "answer=Reachable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated faq @1"));
}

#[test]
fn test_submenus_nest_under_menu_items() {
    let temp_dir = tempfile::tempdir().unwrap();
    for (name, url) in [("Docs", "/docs"), ("Blog", "/blog")] {
        curate(temp_dir.path())
            .args(["add", "menu-item", &format!("display_name={}", name)])
            .arg(format!("url_name={}", url))
            .assert()
            .success();
    }

    let file = temp_dir.path().join(".curate").join("menu_item.json");
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    let docs = format!("temp-{}", saved["records"][0]["id"]["pending"].as_str().unwrap());
    curate(temp_dir.path())
        .args(["assign", "menu-item", &docs, "1"])
        .assert()
        .success();

    for name in ["Guides", "Api"] {
        curate(temp_dir.path())
            .args(["add", "menu-item", &format!("display_name={}", name), "url_name=/x"])
            .args(["--parent", "1"])
            .assert()
            .success();
    }

    curate(temp_dir.path())
        .args(["move", "menu-item", "@2", "1", "--parent", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved menu_item to @1: Api"));

    curate(temp_dir.path())
        .args(["list", "menu-item"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Docs").and(predicate::str::contains("Guides").not()));

    curate(temp_dir.path())
        .args(["delete", "menu-item", "1"])
        .assert()
        .success();
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    let records = saved["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["fields"]["display_name"], "Blog");
    assert_eq!(records[0]["order"], 1);
}

#[test]
fn test_ai_agent_requires_name() {
    let temp_dir = tempfile::tempdir().unwrap();

    curate(temp_dir.path())
        .args(["add", "ai-agent", "role=assistant"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name"));

    curate(temp_dir.path())
        .args(["add", "ai-agent", "name=Helper"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added ai_agent @1"));
}
