use serde_json::{json, Value};
use undo_dom::{
    apply_patch_set, remove_value_in_instance_dom, update_entity_in_instance_dom,
    update_entity_in_instance_dom_with_options, Document, InstanceDomOptions, PatchBuilder,
    PatchError, PatchKind, StructuralDiff, UndoPatch,
};
use undo_dom::json_patch::{from_json_patch, patch_entries, Op};

fn prefab() -> Value {
    json!({
        "ContainerEntity": {"Id": "Container", "Components": {}},
        "Entities": {
            "Entity_1": {"Id": "Entity_1", "Name": "Wheel", "Components": {"Transform": {"Translate": [0, 0, 0]}}},
            "Entity_2": {"Id": "Entity_2", "Name": "Axle"}
        },
        "Instances": {}
    })
}

#[test]
fn add_patch_holds_independent_clone() {
    let mut source = Document::from_json(&json!({"Name": "Wheel"}));
    let mut patches = Document::array();
    PatchBuilder::new()
        .append_add_entity_patch(&mut patches, source.root_ref(), "/Entities/Entity_3")
        .unwrap();

    source.set_json(&["Name".to_string()], &json!("Renamed"), false).unwrap();

    assert_eq!(
        patches.to_json(),
        json!([{"op": "add", "path": "/Entities/Entity_3", "value": {"Name": "Wheel"}}])
    );
}

#[test]
fn update_value_kind_matrix() {
    let value = Document::from_json(&json!(5));
    let builder = PatchBuilder::new();
    for kind in [PatchKind::Add, PatchKind::Replace] {
        let mut patches = Document::array();
        builder
            .append_update_value_patch(&mut patches, value.root_ref(), "/a/b", kind)
            .unwrap();
        let entries = patch_entries(&patches).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, kind);
        assert_eq!(entries[0].path, "/a/b");
        assert_eq!(entries[0].value.map(|v| v.to_json()), Some(json!(5)));
    }
}

#[test]
fn remove_patch_carries_no_value() {
    let mut patches = Document::array();
    PatchBuilder::new()
        .append_remove_patch(&mut patches, "/Entities/Entity_2")
        .unwrap();
    assert_eq!(
        from_json_patch(&patches.to_json()).unwrap(),
        vec![Op::Remove { path: "/Entities/Entity_2".into() }]
    );
}

#[test]
fn patches_accumulate_in_call_order() {
    let value = Document::from_json(&json!(1));
    let builder = PatchBuilder::new();
    let mut patches = Document::array();
    builder.append_remove_patch(&mut patches, "/a").unwrap();
    builder.append_add_entity_patch(&mut patches, value.root_ref(), "/b").unwrap();
    builder
        .append_update_value_patch(&mut patches, value.root_ref(), "/c", PatchKind::Replace)
        .unwrap();
    let ops: Vec<&str> = patch_entries(&patches)
        .unwrap()
        .iter()
        .map(|e| e.path)
        .collect();
    assert_eq!(ops, vec!["/a", "/b", "/c"]);
}

#[test]
fn add_then_remove_restores_document() {
    let mut doc = Document::from_json(&prefab());
    let original = doc.clone();
    let entity = Document::from_json(&json!({"Id": "Entity_3"}));

    update_entity_in_instance_dom(&mut doc, entity.root_ref(), "/Entities/Entity_3").unwrap();
    assert_eq!(doc.get("/Entities/Entity_3").unwrap().to_json(), json!({"Id": "Entity_3"}));
    remove_value_in_instance_dom(&mut doc, "/Entities/Entity_3").unwrap();
    assert_eq!(doc, original);
}

#[test]
fn re_add_overwrites() {
    let mut doc = Document::from_json(&prefab());
    let first = Document::from_json(&json!({"Name": "A"}));
    let second = Document::from_json(&json!({"Name": "B"}));
    update_entity_in_instance_dom(&mut doc, first.root_ref(), "/Entities/Entity_3").unwrap();
    update_entity_in_instance_dom(&mut doc, second.root_ref(), "/Entities/Entity_3").unwrap();
    assert_eq!(doc.get("/Entities/Entity_3").unwrap(), second.root_ref());
    assert_eq!(doc.root_ref().get("Entities").unwrap().len(), 3);
}

#[test]
fn empty_path_matrix() {
    let value = Document::from_json(&json!({"x": 1}));
    let mut doc = Document::from_json(&prefab());
    let original = doc.clone();

    update_entity_in_instance_dom(&mut doc, value.root_ref(), "").unwrap();
    remove_value_in_instance_dom(&mut doc, "").unwrap();
    let patches = Document::from_json(&json!([
        {"op": "add", "path": "", "value": 1},
        {"op": "remove", "path": ""}
    ]));
    apply_patch_set(&mut doc, &patches, &InstanceDomOptions::default()).unwrap();

    assert_eq!(doc, original);
}

#[test]
fn update_entity_patch_is_aliased() {
    let before = Document::from_json(&json!({"x": 1}));
    let after = Document::from_json(&json!({"x": 2}));
    let mut patches = Document::array();
    PatchBuilder::with_differ(&StructuralDiff)
        .append_update_entity_patch(&mut patches, before.root_ref(), after.root_ref(), "/entities/e1")
        .unwrap();
    assert_eq!(
        from_json_patch(&patches.to_json()).unwrap(),
        vec![Op::Replace { path: "/entities/e1/x".into(), value: json!(2) }]
    );
}

#[test]
fn intermediate_container_matrix() {
    let value = Document::from_json(&json!("v"));
    let cases = [
        ("/Entities/Entity_1/Name", true, true),
        ("/Entities/Entity_1/Name", false, true),
        ("/Instances/Instance_1/Entities/Entity_9", true, true),
        ("/Instances/Instance_1/Entities/Entity_9", false, false),
        ("/Entities/Entity_1/Components/Transform/Translate/3", false, true),
        ("/Entities/Entity_1/Components/Transform/Translate/4", true, false),
    ];

    for (path, create_intermediates, ok) in cases {
        let mut doc = Document::from_json(&prefab());
        let original = doc.clone();
        let options = InstanceDomOptions {
            create_intermediates,
            ..InstanceDomOptions::default()
        };
        let result =
            update_entity_in_instance_dom_with_options(&mut doc, value.root_ref(), path, &options);
        assert_eq!(result.is_ok(), ok, "path {path:?} create={create_intermediates}");
        if ok {
            assert_eq!(doc.get(path).unwrap().to_json(), json!("v"));
        } else {
            assert!(matches!(result, Err(PatchError::PathResolution { .. })));
            assert_eq!(doc, original);
        }
    }
}

#[test]
fn undo_stack_workflow() {
    let mut doc = Document::from_json(&prefab());
    let original = doc.clone();
    let options = InstanceDomOptions::default();
    let builder = PatchBuilder::with_differ(&StructuralDiff);
    let mut history: Vec<UndoPatch> = Vec::new();

    let created = Document::from_json(&json!({"Id": "Entity_3", "Name": "Hub"}));
    let record = UndoPatch::capture_add(&doc, created.root_ref(), "/Entities/Entity_3").unwrap();
    record.apply_redo(&mut doc, &options).unwrap();
    history.push(record);

    let before = Document::from_value(doc.get("/Entities/Entity_1").unwrap());
    let after = Document::from_json(&json!({
        "Id": "Entity_1",
        "Name": "Front Wheel",
        "Components": {"Transform": {"Translate": [1, 0]}}
    }));
    let record =
        UndoPatch::capture_update(&builder, before.root_ref(), after.root_ref(), "/Entities/Entity_1")
            .unwrap();
    record.apply_redo(&mut doc, &options).unwrap();
    history.push(record);

    let record = UndoPatch::capture_remove(&doc, "/Entities/Entity_2").unwrap();
    record.apply_redo(&mut doc, &options).unwrap();
    history.push(record);

    assert_eq!(
        doc.get("/Entities").unwrap().to_json(),
        json!({
            "Entity_1": {"Id": "Entity_1", "Name": "Front Wheel", "Components": {"Transform": {"Translate": [1, 0]}}},
            "Entity_3": {"Id": "Entity_3", "Name": "Hub"}
        })
    );
    let edited = doc.clone();

    for record in history.iter().rev() {
        record.apply_undo(&mut doc, &options).unwrap();
    }
    assert_eq!(doc, original);

    for record in &history {
        record.apply_redo(&mut doc, &options).unwrap();
    }
    assert_eq!(doc, edited);
}
