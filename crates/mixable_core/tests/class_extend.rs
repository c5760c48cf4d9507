use mixable_core::{Class, ClassDef, ComposeError};
use serde_json::{json, Value};

#[test]
fn extend_sets_name_statics_and_superclasses() {
    let root = Class::root();
    let class = root
        .extend(ClassDef::named("Class").define(|cx| {
            cx.set_static_fn("static_method", |_, _| Value::from("Hello!"));
            Ok(())
        }))
        .expect("class should build");

    assert_eq!(class.name(), "Class");
    assert_eq!(
        class
            .call_static("static_method", &[])
            .expect("static method should dispatch"),
        json!("Hello!")
    );
    assert_eq!(class.superclasses(), vec![root.clone()]);

    let subclass = class
        .extend(ClassDef::named("Subclass").define(|cx| {
            cx.set_static_fn("other_static_method", |_, _| Value::from("Hello again!"));
            Ok(())
        }))
        .expect("subclass should build");

    assert_eq!(subclass.name(), "Subclass");
    assert_eq!(
        subclass
            .call_static("static_method", &[])
            .expect("inherited static should dispatch"),
        json!("Hello!")
    );
    assert_eq!(
        subclass
            .call_static("other_static_method", &[])
            .expect("own static should dispatch"),
        json!("Hello again!")
    );
    assert_eq!(subclass.superclass_names(), vec!["Mixable", "Class"]);
}

#[test]
fn extend_records_optional_version() {
    let root = Class::root();

    let unversioned = root
        .extend(ClassDef::named("Class1"))
        .expect("class should build");
    assert_eq!(unversioned.version(), None);

    let versioned = root
        .extend(ClassDef::named("Class2").version("0.1.0"))
        .expect("class should build");
    assert_eq!(versioned.version(), Some("0.1.0"));
}

#[test]
fn declarative_members_land_on_instance_surface() {
    let root = Class::root();
    let french = root
        .extend(
            ClassDef::named("French")
                .member("hello", "Bonjour")
                .member("bye", "Au revoir"),
        )
        .expect("class should build");

    assert_eq!(french.member_value("hello"), Some(json!("Bonjour")));
    assert_eq!(french.member_value("bye"), Some(json!("Au revoir")));
    assert_eq!(french.static_value("hello"), None);
}

#[test]
fn re_extending_under_the_same_name_layers_statics() {
    let root = Class::root();
    let class = root
        .extend(ClassDef::named("Class").define(|cx| {
            cx.set_static_value("nice", "yes").set_static_value("cool", "yes");
            Ok(())
        }))
        .expect("class should build");
    assert_eq!(class.static_value("nice"), Some(json!("yes")));
    assert_eq!(class.static_value("cool"), Some(json!("yes")));

    let class = class
        .extend(ClassDef::named("Class").define(|cx| {
            cx.set_static_value("cool", "always");
            Ok(())
        }))
        .expect("re-extension should build");
    assert_eq!(class.static_value("nice"), Some(json!("yes")));
    assert_eq!(class.static_value("cool"), Some(json!("always")));

    let class = class
        .extend(ClassDef::named("Class").define(|cx| {
            cx.set_static_value("cool", "definitely");
            Ok(())
        }))
        .expect("second re-extension should build");
    assert_eq!(class.static_value("nice"), Some(json!("yes")));
    assert_eq!(class.static_value("cool"), Some(json!("definitely")));
}

#[test]
fn builder_failures_propagate_from_extend() {
    let root = Class::root();
    let err = root
        .extend(ClassDef::named("Broken").define(|_| {
            Err(ComposeError::Aborted("missing capability".to_string()))
        }))
        .expect_err("builder failure should propagate");
    assert_eq!(err, ComposeError::Aborted("missing capability".to_string()));
}

#[test]
fn summary_reports_lineage_metadata() {
    let root = Class::root();
    let class = root
        .extend(ClassDef::named("Summarized").version("1.2.3"))
        .expect("class should build");

    let summary = class.summary();
    assert_eq!(summary.id, class.id());
    assert_eq!(summary.name, "Summarized");
    assert_eq!(summary.version.as_deref(), Some("1.2.3"));
    assert_eq!(summary.superclasses, vec!["Mixable"]);

    let json = serde_json::to_value(&summary).expect("summary should serialize");
    assert_eq!(json["name"], "Summarized");
    assert_eq!(json["version"], "1.2.3");
}
