//! Integration tests for the #[derive(Properties)] macro.

use lattice_binding::model::{BindingList, ObservableList, PropertyValue, SortDescriptor};
use lattice_binding::{BindingError, Properties};

#[derive(Properties, Clone, Debug, Default, PartialEq)]
struct Contact {
    #[property(rename = "Name")]
    name: String,

    #[property(rename = "Age")]
    age: Option<u32>,

    email: String,

    #[property(skip)]
    avatar: Vec<u8>,

    _revision: u64,
}

#[derive(Properties, Clone, Debug, Default)]
#[properties(rename_all = "PascalCase")]
struct Reading {
    sensor_id: u16,
    celsius: f64,
    #[property(rename = "OK")]
    is_valid: bool,
}

fn contact(name: &str, age: Option<u32>) -> Contact {
    Contact {
        name: name.into(),
        age,
        email: format!("{}@example.com", name.to_lowercase()),
        ..Default::default()
    }
}

#[test]
fn test_registry_names_follow_field_order() {
    let names: Vec<_> = Contact::property_registry().names().collect();
    assert_eq!(names, ["Name", "Age", "email"]);
}

#[test]
fn test_skipped_fields_are_not_registered() {
    let registry = Contact::property_registry();
    assert!(!registry.contains("avatar"));
    assert!(!registry.contains("_revision"));
    assert!(!registry.contains("name"));
}

#[test]
fn test_property_values() {
    let c = contact("Ann", Some(31));
    assert_eq!(c.property_value("Name").unwrap(), PropertyValue::from("Ann"));
    assert_eq!(c.property_value("Age").unwrap(), PropertyValue::Int(31));
    assert_eq!(
        c.property_value("email").unwrap().as_str(),
        Some("ann@example.com")
    );

    let unknown = contact("Bob", None);
    assert!(unknown.property_value("Age").unwrap().is_none());
}

#[test]
fn test_unknown_property_error() {
    let err = contact("Ann", None).property_value("Height").unwrap_err();
    match err {
        BindingError::InvalidProperty {
            property,
            type_name,
        } => {
            assert_eq!(property, "Height");
            assert!(type_name.ends_with("Contact"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_rename_all_pascal_case() {
    let names: Vec<_> = Reading::property_registry().names().collect();
    assert_eq!(names, ["SensorId", "Celsius", "OK"]);

    let reading = Reading {
        sensor_id: 7,
        celsius: 21.5,
        is_valid: true,
    };
    assert_eq!(reading.property_value("SensorId").unwrap(), PropertyValue::Int(7));
    assert_eq!(reading.property_value("OK").unwrap(), PropertyValue::Bool(true));
}

#[test]
fn test_registry_is_shared() {
    let a = Contact::property_registry() as *const _;
    let b = Contact::property_registry() as *const _;
    assert_eq!(a, b);
}

#[test]
fn test_derived_type_in_binding_list() {
    let list = BindingList::new(vec![
        contact("Cid", Some(40)),
        contact("Ann", None),
        contact("Bob", Some(25)),
    ]);

    list.apply_sort(SortDescriptor::ascending("Age")).unwrap();
    let names: Vec<_> = list.to_vec().into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["Ann", "Bob", "Cid"]);

    assert_eq!(list.find("email", "cid@example.com").unwrap(), Some(2));
}
