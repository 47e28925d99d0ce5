//! End-to-end evaluation scenarios.
//!
//! These tests drive `process` with JSON templates the way the CLI does and
//! compare the rendered result tree.

use cspscan_core::{ConfigStore, Fields, TemplateError, TemplateTree, process, process_checked};
use serde_json::{Value, json};

fn store(sections: &[(&str, &[(&str, &str)])]) -> ConfigStore {
    sections
        .iter()
        .map(|(tag, pairs)| (*tag, pairs.iter().copied().collect::<Fields>()))
        .collect()
}

fn run(store: &ConfigStore, template: &Value) -> Result<Value, Box<dyn std::error::Error>> {
    let template = TemplateTree::from_value(template)?;
    Ok(serde_json::to_value(process(store, &template))?)
}

#[test]
fn headlights_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let store = store(&[("LIGHT_0", &[("TYPE", "LED")]), ("LIGHT_1", &[("TYPE", "XENON")])]);
    let template = json!({
        "Lights": {"childs": {"Headlights": {
            "tags": ["LIGHT_N"],
            "foreach": true,
            "entries": {"TYPE": "LED|HALOGEN"}
        }}}
    });

    assert_eq!(run(&store, &template)?, json!({"Lights": {"Headlights": {"0": true}}}));
    Ok(())
}

#[test]
fn absent_tags_give_an_empty_tree() -> Result<(), Box<dyn std::error::Error>> {
    let store = store(&[("UNRELATED", &[("KEY", "value")])]);
    let template = json!({
        "Shaders": {"tag": "[SHADER_REPLACEMENT_0]"},
        "Lights": {"childs": {
            "Brake": {"tags": ["[BRAKE_LIGHT]", "[LIGHT_BRAKE]"]},
            "Extra": {"childs": {"Fog": {"tag": "[FOG_LIGHT]", "entries": {"ACTIVE": "1"}}}}
        }}
    });

    assert_eq!(run(&store, &template)?, json!({}));
    Ok(())
}

#[test]
fn evaluation_is_repeatable() -> Result<(), Box<dyn std::error::Error>> {
    let store = store(&[
        ("LIGHT_0", &[("TYPE", "LED"), ("COLOR", "255,255,255")]),
        ("LIGHT_2", &[("TYPE", "LED"), ("COLOR", "255,0,0")]),
        ("EMISSIVE_...", &[("MESHES", "tail_lights")]),
    ]);
    let template = TemplateTree::from_value(&json!({
        "Lights": {"childs": {
            "Colors": {"tags": ["LIGHT_N"], "foreach": true, "entry": "COLOR", "return_value": true},
            "Emissive": {"tags": ["[EMISSIVE_...]"], "foreach": true}
        }}
    }))?;

    let first = process(&store, &template);
    let second = process(&store, &template);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_value(&first)?,
        json!({"Lights": {
            "Colors": {"0": "255,255,255", "2": "255,0,0"},
            "Emissive": {"0": true}
        }})
    );
    Ok(())
}

#[test]
fn failed_only_one_family_is_pruned_by_its_container() -> Result<(), Box<dyn std::error::Error>> {
    let store = store(&[("LIGHT_0", &[("TYPE", "XENON")]), ("HORN", &[])]);
    let template = json!({
        "Lights": {"childs": {
            "Led": {"tags": ["LIGHT_N"], "foreach": true, "only_one": true, "entries": {"TYPE": "LED"}},
            "Xenon": {"tags": ["LIGHT_N"], "foreach": true, "only_one": true, "entries": {"TYPE": "XENON"}}
        }},
        "Audio": {"childs": {"Horn": {"tag": "[HORN]"}}}
    });

    assert_eq!(
        run(&store, &template)?,
        json!({"Lights": {"Xenon": true}, "Audio": {"Horn": true}})
    );
    Ok(())
}

#[test]
fn extracted_values() -> Result<(), Box<dyn std::error::Error>> {
    let store = store(&[
        ("INCLUDE", &[("INCLUDE", "common/materials_carpaint.ini")]),
        ("DATA", &[("Version", "2"), ("Author", "")]),
    ]);
    let template = json!({
        "Meta": {"childs": {
            "Include": {"tag": "[INCLUDE]", "entry": "INCLUDE", "return_value": true},
            "Header": {"tag": "[DATA]", "entry": ["Version", "Author", "License"], "return_value": true},
            "Blank": {"tag": "[DATA]", "entry": "Author", "return_value": true}
        }}
    });

    assert_eq!(
        run(&store, &template)?,
        json!({"Meta": {
            "Include": "common/materials_carpaint.ini",
            "Header": {"version": "2", "author": "", "license": ""}
        }})
    );
    Ok(())
}

#[test]
fn substring_and_alternation_entries() -> Result<(), Box<dyn std::error::Error>> {
    let store = store(&[
        ("SHADER_REPLACEMENT_0", &[("MATERIALS", "car_paint_premium"), ("SHADER", "ksPerPixelMultiMap")]),
        ("SHADER_REPLACEMENT_1", &[("MATERIALS", "glass"), ("SHADER", "ksPerPixel")]),
    ]);
    let template = json!({
        "Materials": {"childs": {
            "Paint": {"tags": ["SHADER_REPLACEMENT_N"], "foreach": true, "entries": {"MATERIALS": "paint!"}},
            "Simple": {"tags": ["SHADER_REPLACEMENT_N"], "foreach": true, "entries": {"SHADER": "ksPerPixel | ksFlags"}}
        }}
    });

    assert_eq!(
        run(&store, &template)?,
        json!({"Materials": {"Paint": {"0": true}, "Simple": {"1": true}}})
    );
    Ok(())
}

#[test]
fn template_errors_are_collected_with_paths() -> Result<(), TemplateError> {
    let store = store(&[("WIPER_0", &[])]);
    let template = TemplateTree::from_value(&json!({
        "Exterior": {"childs": {
            "Wipers": {"tags": ["WIPER_N"], "foreach": true, "only_one": true},
            "Broken": {"tag": "[DOOR]", "foreach": true}
        }},
        "Interior": {"childs": {"Nothing": {"foreach": true}}}
    }))?;

    let evaluation = process_checked(&store, &template);
    let paths: Vec<_> = evaluation.errors.iter().map(TemplateError::path).collect();
    assert_eq!(paths, ["Exterior.Broken", "Interior.Nothing"]);
    assert_eq!(
        serde_json::to_value(&evaluation.results).ok(),
        Some(json!({"Exterior": {"Wipers": true}}))
    );
    Ok(())
}
