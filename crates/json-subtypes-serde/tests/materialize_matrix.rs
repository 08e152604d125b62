use std::sync::Arc;

use json_subtypes::{EnumDescriptor, HostConfig, ResolveError, Rule, Subtypes, TypeDescriptor};
use json_subtypes_serde::{DeError, Materializer};
use serde::de::DeserializeSeed;
use serde::Deserialize;
use serde_json::json;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, PartialEq)]
struct Car {
    wheels: u8,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Truck {
    wheels: u8,
    payload: u32,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Bike {
    has_bell: bool,
}

#[derive(Debug, PartialEq)]
enum Vehicle {
    Car(Car),
    Truck(Truck),
    Bike(Bike),
}

impl From<Car> for Vehicle {
    fn from(v: Car) -> Self {
        Vehicle::Car(v)
    }
}

impl From<Truck> for Vehicle {
    fn from(v: Truck) -> Self {
        Vehicle::Truck(v)
    }
}

impl From<Bike> for Vehicle {
    fn from(v: Bike) -> Self {
        Vehicle::Bike(v)
    }
}

struct Garage {
    vehicles: Materializer<Vehicle>,
    vehicle: TypeDescriptor,
    motor: TypeDescriptor,
    bike: TypeDescriptor,
}

/// `Vehicle -> (Motor -> Car | Truck) | Bike`, resolved by a `VehicleKind`
/// enum discriminator and then a presence rule on `Motor`.
fn garage(config: HostConfig) -> Garage {
    let kinds = EnumDescriptor::new("VehicleKind", [("Motor", 0), ("Bike", 1)]);
    let vehicle = TypeDescriptor::object("Vehicle").abstract_().build();
    let motor = TypeDescriptor::object("Motor").abstract_().extends(&vehicle).build();
    let car = TypeDescriptor::object("Car").extends(&motor).build();
    let truck = TypeDescriptor::object("Truck").extends(&motor).build();
    let bike = TypeDescriptor::object("Bike").extends(&vehicle).build();

    let kind = |name: &str| kinds.member(name).unwrap();
    let subtypes = Subtypes::builder()
        .rule(
            Rule::discriminator(&vehicle, "kind")
                .map(kind("Motor"), &motor)
                .map(kind("Bike"), &bike)
                .build()
                .unwrap(),
        )
        .unwrap()
        .rule(
            Rule::presence(&motor)
                .probe("payload", &truck)
                .fallback(&car)
                .build()
                .unwrap(),
        )
        .unwrap()
        .build();

    let vehicles = Materializer::new(Arc::new(subtypes), config)
        .register_serde::<Car>(&car)
        .register_serde::<Truck>(&truck)
        .register_serde::<Bike>(&bike);
    Garage {
        vehicles,
        vehicle,
        motor,
        bike,
    }
}

#[derive(Debug, PartialEq)]
enum Expr {
    Num(f64),
    Add(Box<Expr>, Box<Expr>),
}

fn expressions(max_depth: usize) -> (Materializer<Expr>, TypeDescriptor) {
    let expr = TypeDescriptor::object("Expr").abstract_().build();
    let num = TypeDescriptor::object("Num").extends(&expr).build();
    let add = TypeDescriptor::object("Add").extends(&expr).build();
    let subtypes = Subtypes::builder()
        .rule(
            Rule::presence(&expr)
                .probe("value", &num)
                .probe("left", &add)
                .build()
                .unwrap(),
        )
        .unwrap()
        .build();
    let config = HostConfig {
        max_depth,
        ..HostConfig::default()
    };
    let operand = expr.clone();
    let m = Materializer::new(Arc::new(subtypes), config)
        .register(&num, |v, _| {
            Ok(Expr::Num(f64::deserialize(&v["value"])?))
        })
        .register(&add, move |v, ctx| {
            let left = ctx.deserialize(&v["left"], &operand)?;
            let right = ctx.deserialize(&v["right"], &operand)?;
            Ok(Expr::Add(Box::new(left), Box::new(right)))
        });
    (m, expr)
}

fn num(n: f64) -> serde_json::Value {
    json!({ "value": n })
}

fn add(left: serde_json::Value, right: serde_json::Value) -> serde_json::Value {
    json!({ "left": left, "right": right })
}

// ---------------------------------------------------------------------------
// Single values
// ---------------------------------------------------------------------------

#[test]
fn multi_level_chain_reaches_serde_impl() {
    let g = garage(HostConfig::default());
    let truck = g
        .vehicles
        .deserialize(&json!({"kind": "Motor", "wheels": 6, "payload": 12}), &g.vehicle)
        .unwrap();
    assert_eq!(truck, Vehicle::Truck(Truck { wheels: 6, payload: 12 }));

    let car = g
        .vehicles
        .deserialize(&json!({"kind": 0, "wheels": 4}), &g.vehicle)
        .unwrap();
    assert_eq!(car, Vehicle::Car(Car { wheels: 4 }));
}

#[test]
fn intermediate_base_resolves_directly() {
    let g = garage(HostConfig::default());
    let car = g.vehicles.deserialize(&json!({"wheels": 3}), &g.motor).unwrap();
    assert_eq!(car, Vehicle::Car(Car { wheels: 3 }));
}

#[test]
fn concrete_base_skips_resolution() {
    let g = garage(HostConfig::default());
    let bike = g
        .vehicles
        .deserialize(&json!({"kind": "Motor", "hasBell": true}), &g.bike)
        .unwrap();
    assert_eq!(bike, Vehicle::Bike(Bike { has_bell: true }));
}

#[test]
fn unresolved_abstract_base_is_a_resolve_error() {
    let g = garage(HostConfig::default());
    let err = g
        .vehicles
        .deserialize(&json!({"kind": "Boat"}), &g.vehicle)
        .unwrap_err();
    match err.as_resolve() {
        Some(ResolveError::NoInstantiableSubtype { base, cyclic }) => {
            assert_eq!(base, "Vehicle");
            assert!(!cyclic);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn serde_field_errors_surface_as_json_errors() {
    let g = garage(HostConfig::default());
    let err = g
        .vehicles
        .deserialize(&json!({"kind": "Bike"}), &g.vehicle)
        .unwrap_err();
    assert!(matches!(err, DeError::Json(_)), "{err:?}");
    assert!(err.to_string().contains("hasBell"));
}

#[test]
fn case_insensitive_config_reaches_resolution() {
    let g = garage(HostConfig::case_insensitive());
    let bike = g
        .vehicles
        .deserialize(&json!({"KIND": "bike", "hasBell": false}), &g.vehicle)
        .unwrap();
    assert_eq!(bike, Vehicle::Bike(Bike { has_bell: false }));
}

#[test]
fn missing_constructor_is_reported() {
    let g = garage(HostConfig::default());
    let scooter = TypeDescriptor::object("Scooter").build();
    let err = g.vehicles.deserialize(&json!({}), &scooter).unwrap_err();
    assert!(matches!(err, DeError::NotMaterializable { ref ty } if ty == "Scooter"));
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

#[test]
fn sequence_keeps_order_and_nulls() {
    let g = garage(HostConfig::default());
    let list = TypeDescriptor::seq_of(&g.vehicle);
    let doc = json!([
        {"kind": "Bike", "hasBell": true},
        null,
        {"kind": "Motor", "wheels": 4},
        {"kind": "Submarine"},
    ]);
    let items = g.vehicles.deserialize_seq(&doc, &list).unwrap().unwrap();
    assert_eq!(
        items,
        vec![
            Some(Vehicle::Bike(Bike { has_bell: true })),
            None,
            Some(Vehicle::Car(Car { wheels: 4 })),
            None,
        ]
    );
}

#[test]
fn scalar_sequence_builds_every_element() {
    let int = TypeDescriptor::scalar("i64");
    let subtypes = Arc::new(Subtypes::builder().build());
    let ints =
        Materializer::<i64>::new(subtypes, HostConfig::default()).register_serde::<i64>(&int);
    let items = ints
        .deserialize_seq(&json!([1, null, 3]), &TypeDescriptor::list_of(&int))
        .unwrap();
    assert_eq!(items, Some(vec![Some(1), None, Some(3)]));
}

#[test]
fn null_sequence_is_none() {
    let g = garage(HostConfig::default());
    let array = TypeDescriptor::array_of(&g.vehicle);
    assert_eq!(
        g.vehicles.deserialize_seq(&serde_json::Value::Null, &array).unwrap(),
        None
    );
}

#[test]
fn non_array_sequence_is_rejected() {
    let g = garage(HostConfig::default());
    let array = TypeDescriptor::array_of(&g.vehicle);
    let err = g
        .vehicles
        .deserialize_seq(&json!({"kind": "Bike"}), &array)
        .unwrap_err();
    assert!(matches!(
        err.as_resolve(),
        Some(ResolveError::ExpectedArray { .. })
    ));
}

// ---------------------------------------------------------------------------
// Nested hand-offs
// ---------------------------------------------------------------------------

#[test]
fn nested_fields_reenter_the_resolver() {
    let (m, expr) = expressions(8);
    let doc = add(num(1.0), add(num(2.0), num(3.0)));
    let built = m.deserialize(&doc, &expr).unwrap();
    assert_eq!(
        built,
        Expr::Add(
            Box::new(Expr::Num(1.0)),
            Box::new(Expr::Add(Box::new(Expr::Num(2.0)), Box::new(Expr::Num(3.0)))),
        )
    );
}

#[test]
fn nesting_is_depth_bounded() {
    let (m, expr) = expressions(3);
    let shallow = add(add(num(1.0), num(2.0)), num(3.0));
    assert!(m.deserialize(&shallow, &expr).is_ok());

    let deep = add(add(add(num(1.0), num(2.0)), num(3.0)), num(4.0));
    let err = m.deserialize(&deep, &expr).unwrap_err();
    assert!(matches!(err, DeError::DepthExceeded { limit: 3 }), "{err:?}");
}

// ---------------------------------------------------------------------------
// Text, readers and seeds
// ---------------------------------------------------------------------------

#[test]
fn from_str_and_from_reader_agree() {
    let g = garage(HostConfig::default());
    let text = r#"{"kind":"Motor","wheels":10,"payload":40}"#;
    let a = g.vehicles.from_str(text, &g.vehicle).unwrap();
    let b = g.vehicles.from_reader(text.as_bytes(), &g.vehicle).unwrap();
    assert_eq!(a, b);
    assert!(matches!(
        g.vehicles.from_str("{", &g.vehicle),
        Err(DeError::Json(_))
    ));
}

#[test]
fn seed_plugs_into_serde_json_deserializer() {
    let g = garage(HostConfig::default());
    let mut de = serde_json::Deserializer::from_str(r#"{"kind":"Bike","hasBell":true}"#);
    let bike = g.vehicles.seed(&g.vehicle).deserialize(&mut de).unwrap();
    assert_eq!(bike, Vehicle::Bike(Bike { has_bell: true }));

    let list = TypeDescriptor::array_of(&g.vehicle);
    let mut de = serde_json::Deserializer::from_str(r#"[null, {"kind":"Motor","wheels":2}]"#);
    let items = g.vehicles.seq_seed(&list).deserialize(&mut de).unwrap();
    assert_eq!(items, Some(vec![None, Some(Vehicle::Car(Car { wheels: 2 }))]));
}

#[test]
fn seed_errors_carry_the_message() {
    let g = garage(HostConfig::default());
    let mut de = serde_json::Deserializer::from_str(r#"{"kind":"Boat"}"#);
    let err = g.vehicles.seed(&g.vehicle).deserialize(&mut de).unwrap_err();
    assert!(err.to_string().contains("Vehicle"), "{err}");
}

#[test]
fn materializer_is_shared_across_threads() {
    let g = Arc::new(garage(HostConfig::default()));
    std::thread::scope(|scope| {
        for wheels in 1..=4u8 {
            let g = Arc::clone(&g);
            scope.spawn(move || {
                let doc = json!({"kind": "Motor", "wheels": wheels});
                let car = g.vehicles.deserialize(&doc, &g.vehicle).unwrap();
                assert_eq!(car, Vehicle::Car(Car { wheels }));
            });
        }
    });
}
