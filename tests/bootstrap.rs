//! Start-up tests: loading rule-set files from disk through `premain`.

use std::fs;

use mockrunner::{bootstrap::premain, prelude::*};
use tempfile::TempDir;

fn runtime() -> Runtime {
    let runtime = Runtime::new();
    runtime.define(
        ClassDef::class("svc.Store")
            .with_method(MethodDef::new("getCount", "int", |_| Ok(Value::Int(0)))),
    );
    runtime
}

/// A rule set written to disk is loaded and applied to classes loaded afterwards.
#[test]
fn test_premain_loads_rule_set() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mock-runner").join("mock-config.json");

    let store = RuleStore::new();
    store.add_spec(
        MockMethodSpec::new("svc.Store", "getCount")
            .with_signature("()")
            .returning("5", "int"),
    )?;
    store.save(&path)?;

    let runtime = runtime();
    let arg = format!("config={}", path.display());
    let engine = premain(Some(&arg), &runtime)?.expect("engine installed");

    assert_eq!(engine.store().len(), 1);
    assert_eq!(runtime.invoke("svc.Store", "getCount", &[])?, Value::Int(5));
    assert_eq!(engine.stats().mocked, 1);
    Ok(())
}

/// A malformed file installs the engine with zero rules and leaves methods untouched.
#[test]
fn test_malformed_file_yields_zero_rules() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mock-config.json");
    fs::write(&path, "{ \"mockRules\": [ this is not json").unwrap();

    let runtime = runtime();
    let engine = premain(path.to_str(), &runtime)?.expect("engine installed");

    assert!(engine.store().is_empty());
    assert_eq!(runtime.invoke("svc.Store", "getCount", &[])?, Value::Int(0));
    Ok(())
}

/// Without a start-up argument nothing is installed.
#[test]
fn test_no_argument_is_a_no_op() -> Result<()> {
    let runtime = runtime();
    assert!(premain(None, &runtime)?.is_none());
    assert!(runtime.load("svc.Store")?.intercepted_methods().is_empty());
    Ok(())
}

/// Saving and reloading keeps the specs and the derived rules.
#[test]
fn test_save_and_reload() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.json");

    let store = RuleStore::new();
    store.add_spec(
        MockMethodSpec::new("svc.Api", "list").returning("[{\"id\":1}]", "List<svc.Item>"),
    )?;
    store.add_spec(
        MockMethodSpec::new("svc.Store", "getCount")
            .throwing("java.lang.IllegalStateException", "closed")
            .with_enabled(false),
    )?;
    store.save(&path)?;

    let reloaded = RuleStore::from_file(&path)?;
    assert_eq!(reloaded.specs()?, store.specs()?);
    assert_eq!(reloaded.owner_keys(), store.owner_keys());

    let rule = reloaded.lookup("svc.Store", "getCount").expect("rule");
    assert!(!rule.enabled);
    assert_eq!(rule.mode(), RuleMode::Throw);
    Ok(())
}

/// The flat rule table is rebuilt from the spec list when it is missing.
#[test]
fn test_rules_rebuilt_from_specs() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.json");
    fs::write(
        &path,
        r#"{"mockMethods": [
            {"className": "svc.Store", "methodName": "getCount", "signature": "()",
             "returnValue": "5"},
            {"className": "svc.Store", "methodName": "getName", "signature": "()",
             "returnValue": "[1]"}
        ]}"#,
    )
    .unwrap();

    let store = RuleStore::from_file(&path)?;
    assert_eq!(store.len(), 2);
    assert_eq!(
        store.lookup("svc.Store", "getCount").map(|r| r.return_type),
        Some("int".to_string())
    );
    assert_eq!(
        store.lookup("svc.Store", "getName").map(|r| r.return_type),
        Some("java.util.List".to_string())
    );
    Ok(())
}
