use mixable_core::{Class, ClassDef, MemberError};
use serde_json::{json, Value};

#[test]
fn instances_share_the_class_member_surface() {
    let root = Class::root();
    let class = root
        .extend(ClassDef::named("Greeter").define(|cx| {
            cx.set_member_fn("greet", |instance, _| {
                let name = instance.get("name").unwrap_or_else(|| Value::from("stranger"));
                Value::from(format!("Hello, {}!", name.as_str().unwrap_or("stranger")))
            });
            Ok(())
        }))
        .expect("class should build");

    let instance = class.construct();
    assert_eq!(
        instance.call("greet", &[]).expect("greet should dispatch"),
        json!("Hello, stranger!")
    );

    instance.set("name", "Ada");
    assert_eq!(
        instance.call("greet", &[]).expect("greet should dispatch"),
        json!("Hello, Ada!")
    );
}

#[test]
fn late_members_are_visible_to_existing_instances() {
    let class = Class::root()
        .extend(ClassDef::named("Late"))
        .expect("class should build");
    let instance = class.construct();
    assert_eq!(instance.get("motto"), None);

    class.set_member_value("motto", "later is fine");
    assert_eq!(instance.get("motto"), Some(json!("later is fine")));
}

#[test]
fn own_fields_shadow_shared_members() {
    let class = Class::root()
        .extend(ClassDef::named("French").member("hello", "Bonjour"))
        .expect("class should build");

    let first = class.construct();
    let second = class.construct();
    assert_ne!(first.id(), second.id());

    first.set("hello", "Salut");
    assert_eq!(first.get("hello"), Some(json!("Salut")));
    assert_eq!(second.get("hello"), Some(json!("Bonjour")));
}

#[test]
fn calling_missing_or_data_members_fails() {
    let class = Class::root()
        .extend(ClassDef::named("Strict").member("hello", "Bonjour"))
        .expect("class should build");
    let instance = class.construct();

    assert_eq!(
        instance
            .call("missing", &[])
            .expect_err("missing member must fail"),
        MemberError::NotFound {
            class: "Strict".to_string(),
            member: "missing".to_string(),
        }
    );
    assert_eq!(
        instance
            .call("hello", &[])
            .expect_err("data member must not dispatch"),
        MemberError::NotCallable {
            class: "Strict".to_string(),
            member: "hello".to_string(),
        }
    );

    class.set_static_value("flag", true);
    assert_eq!(
        class
            .call_static("flag", &[])
            .expect_err("data static must not dispatch"),
        MemberError::NotCallable {
            class: "Strict".to_string(),
            member: "flag".to_string(),
        }
    );
    assert_eq!(
        class
            .call_static("missing", &[])
            .expect_err("missing static must fail"),
        MemberError::NotFound {
            class: "Strict".to_string(),
            member: "missing".to_string(),
        }
    );
}
