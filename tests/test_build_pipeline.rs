mod common;

use std::fs;

use common::{ScriptedPrompter, Workspace};
use mdn_helper::build::{BuildOutcome, Builder};
use mdn_helper::compat::{BurnRecord, CompatDataset};
use mdn_helper::error::{HelperError, IdlError};
use mdn_helper::questions::Confirmation;
use serde_json::json;

const FOO_IDL: &str = r"
[Exposed=Window]
interface Foo : EventTarget {
  constructor(DOMString type);
  readonly attribute DOMString label;
  attribute EventHandler onchange;
  Promise<void> start(optional long delay = 0);
  void stop();
  void stop(boolean force);
  getter DOMString item(unsigned long index);
  setter void (unsigned long index, DOMString value);
};
";

fn completed(outcome: BuildOutcome) -> (Vec<std::path::PathBuf>, std::path::PathBuf) {
    match outcome {
        BuildOutcome::Completed { pages, burn_file } => (pages, burn_file),
        BuildOutcome::Aborted => panic!("build unexpectedly aborted"),
    }
}

#[tokio::test]
async fn shared_question_prompted_once_per_build() {
    let ws = Workspace::new();
    let source = ws.write("Foo.idl", FOO_IDL);
    let builder = Builder::new(
        ws.config(),
        CompatDataset::empty(),
        ScriptedPrompter::new(&[("summary", "Does foo things.")]),
    );

    let (pages, _) = completed(builder.build(&source).await.unwrap());
    assert_eq!(pages.len(), 6);

    let asked = builder.prompter().asked();
    assert_eq!(asked.iter().filter(|t| *t == "summary").count(), 1);
    assert_eq!(asked[0], "summary");

    for page in &pages {
        let html = fs::read_to_string(page).unwrap();
        assert!(!html.contains("[["), "unrendered token in {}", page.display());
    }
    let start = fs::read_to_string(ws.out().join("Foo/Foo_start_method.html")).unwrap();
    assert_eq!(
        start,
        "<h1>Foo.start()</h1><p>Does foo things.</p><p>returnValue-answer</p>"
    );
}

#[tokio::test]
async fn output_layout_follows_page_list() {
    let ws = Workspace::new();
    let source = ws.write("Foo.idl", FOO_IDL);
    let builder = Builder::new(ws.config(), CompatDataset::empty(), ScriptedPrompter::new(&[]));
    completed(builder.build(&source).await.unwrap());

    assert_eq!(
        ws.output_files(),
        vec![
            "Foo/Foo.json",
            "Foo/Foo_Foo_constructor.html",
            "Foo/Foo_Foo_interface.html",
            "Foo/Foo_label_property.html",
            "Foo/Foo_onchange_handler.html",
            "Foo/Foo_start_method.html",
            "Foo/Foo_stop_method.html",
        ]
    );
}

#[tokio::test]
async fn shared_banner_then_short_notice() {
    let ws = Workspace::new();
    let source = ws.write(
        "Bar.idl",
        "interface Bar { void go(); attribute long size; };",
    );
    ws.write("templates/property.html", "[[shared:since]] [[property]]");
    let builder = Builder::new(ws.config(), CompatDataset::empty(), ScriptedPrompter::new(&[]));
    completed(builder.build(&source).await.unwrap());

    let notices = builder.prompter().notices();
    let banners = notices
        .iter()
        .filter(|n| n.contains("Questions shared by every page"))
        .count();
    assert_eq!(banners, 1);
    assert!(notices.iter().any(|n| n.starts_with("More shared questions found.")));
    assert!(notices.iter().any(|n| n.contains("Questions for the go method page")));
}

#[tokio::test]
async fn dictionary_source_rejected_without_output() {
    let ws = Workspace::new();
    let source = ws.write("FooInit.idl", "dictionary FooInit { long size; };");
    let builder = Builder::new(ws.config(), CompatDataset::empty(), ScriptedPrompter::new(&[]));

    let err = builder.build(&source).await.unwrap_err();
    assert!(matches!(
        err,
        HelperError::Idl(IdlError::WrongDeclarationKind { ref name, .. }) if name == "FooInit"
    ));
    assert_eq!(err.exit_code(), mdn_helper::error::ExitCode::IDL_ERROR);
    assert!(ws.output_files().is_empty());
    assert!(builder.prompter().asked().is_empty());
}

#[tokio::test]
async fn declined_flag_confirmation_aborts() {
    let ws = Workspace::new();
    let source = ws.write(
        "Foo.idl",
        "[RuntimeEnabled=FooFeature] interface Foo { void go(); };",
    );
    let prompter = ScriptedPrompter::new(&[]).confirming(Confirmation::Abort);
    let builder = Builder::new(ws.config(), CompatDataset::empty(), prompter);

    assert_eq!(builder.build(&source).await.unwrap(), BuildOutcome::Aborted);
    assert_eq!(builder.prompter().confirms().len(), 1);
    assert!(builder.prompter().confirms()[0].contains("behind a flag"));
    assert!(builder.prompter().asked().is_empty());
    assert!(ws.output_files().is_empty());
}

#[tokio::test]
async fn origin_trial_confirmation_proceeds() {
    let ws = Workspace::new();
    let source = ws.write(
        "Foo.idl",
        "[OriginTrialEnabled=FooTrial] interface Foo { };",
    );
    let builder = Builder::new(ws.config(), CompatDataset::empty(), ScriptedPrompter::new(&[]));

    completed(builder.build(&source).await.unwrap());
    assert!(builder.prompter().confirms()[0].contains("origin trial"));
    assert_eq!(
        ws.output_files(),
        vec!["Foo/Foo.json", "Foo/Foo_Foo_interface.html"]
    );
}

#[tokio::test]
async fn burn_file_reflects_dataset() {
    let ws = Workspace::new();
    let source = ws.write(
        "Foo.idl",
        "interface Foo { attribute long size; void go(); };",
    );
    let dataset = CompatDataset::from_value(json!({
        "api": {
            "Foo": {
                "__compat": { "mdn_url": "https://developer.mozilla.org/docs/Web/API/Foo" },
                "size": { "__compat": { "mdn_url": "https://developer.mozilla.org/docs/Web/API/Foo/size" } }
            }
        }
    }))
    .unwrap();
    let builder = Builder::new(ws.config(), dataset, ScriptedPrompter::new(&[])).json_only(true);

    let (pages, burn_file) = completed(builder.build(&source).await.unwrap());
    assert!(pages.is_empty());

    let records: Vec<BurnRecord> =
        serde_json::from_str(&fs::read_to_string(burn_file).unwrap()).unwrap();
    let keys: Vec<&str> = records.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["Foo", "Foo.go", "Foo.size"]);

    assert_eq!(records[0].exists_in_dataset, Some(true));
    assert_eq!(records[1].exists_in_dataset, Some(false));
    assert_eq!(records[1].documentation_known_missing, Some(true));
    assert_eq!(
        records[2].documentation_url.as_deref(),
        Some("https://developer.mozilla.org/docs/Web/API/Foo/size")
    );
}

#[tokio::test]
async fn json_syntax_tree_accepted() {
    let ws = Workspace::new();
    let tree = json!([{
        "type": "interface",
        "name": "Baz",
        "members": [
            {
                "type": "operation",
                "name": "run",
                "return_type": { "kind": "single", "name": "void" },
                "arguments": []
            }
        ]
    }]);
    let source = ws.write("Baz.json", &tree.to_string());
    let builder = Builder::new(ws.config(), CompatDataset::empty(), ScriptedPrompter::new(&[]));

    let (pages, _) = completed(builder.build(&source).await.unwrap());
    assert_eq!(pages.len(), 2);
    assert!(pages[1].ends_with("Baz/Baz_run_method.html"));
}

#[tokio::test]
async fn maplike_declaration_produces_member_pages() {
    let ws = Workspace::new();
    let source = ws.write(
        "FooMap.idl",
        "interface FooMap { readonly maplike<DOMString, long>; };",
    );
    ws.write("templates/method.html", "[[shared:interface]].[[method]]()");
    let builder = Builder::new(ws.config(), CompatDataset::empty(), ScriptedPrompter::new(&[]));
    let (pages, burn_file) = completed(builder.build(&source).await.unwrap());
    assert_eq!(pages.len(), 8);

    let get = fs::read_to_string(ws.out().join("FooMap/FooMap_get_method.html")).unwrap();
    assert_eq!(get, "FooMap.get()");
    assert!(ws.out().join("FooMap/FooMap_size_property.html").exists());
    assert!(!ws.out().join("FooMap/FooMap_set_method.html").exists());

    let records: Vec<BurnRecord> =
        serde_json::from_str(&fs::read_to_string(burn_file).unwrap()).unwrap();
    assert!(records.iter().any(|r| r.key == "FooMap.forEach"));
}
