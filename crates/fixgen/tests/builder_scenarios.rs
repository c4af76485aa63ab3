//! End-to-end builder scenarios
//!
//! Exercises the public surface the way test suites use it: derived
//! descriptors, nested composites, enums, containers, interfaces and the
//! configuration knobs.

#![allow(clippy::unwrap_used)]

use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use fixgen::{fixture_proxy, Builder, BuilderConfig, Decimal, Fixture, FixgenError};

#[derive(Debug, Default, PartialEq, Fixture)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Fixture)]
enum Status {
    Active,
    #[default]
    Suspended,
}

#[derive(Debug, Default, Fixture)]
struct Account {
    owner: String,
    status: Status,
    origin: Option<Point>,
}

#[derive(Debug, Default, Fixture)]
struct Entity {
    id: i64,
    created_by: String,
}

#[derive(Debug, Default, Fixture)]
struct Invoice {
    #[fixture(extends)]
    entity: Entity,
    amount: Decimal,
    #[fixture(skip)]
    notes: Vec<String>,
    #[fixture(mutator = "set_lines_doubled")]
    lines: u16,
}

impl Invoice {
    fn set_lines_doubled(&mut self, count: u16) {
        self.lines = count * 2;
    }
}

#[derive(Debug, Fixture)]
#[fixture(constructor = "Ticket::open")]
struct Ticket {
    seq: u32,
    state: String,
}

impl Ticket {
    fn open() -> Self {
        Self {
            seq: 0,
            state: "open".to_string(),
        }
    }
}

#[derive(Debug, Fixture)]
#[fixture(no_default)]
struct Token {
    #[allow(dead_code)]
    value: String,
}

#[derive(Debug, Default, Fixture)]
struct Session {
    user: String,
    token: Option<Token>,
}

#[derive(Debug, Default, Fixture)]
struct Person {
    name: String,
}

#[derive(Debug, Default, Fixture)]
struct Team {
    members: Vec<Person>,
    ratings: Vec<i32>,
}

#[derive(Debug, Default, Fixture)]
struct Inventory {
    cells: Box<[u8]>,
    index: HashMap<String, i32>,
    tags: BTreeSet<String>,
}

#[derive(Debug, Default, Fixture)]
struct Route {
    stops: Box<[Point]>,
}

#[derive(Default, Fixture)]
struct Envelope {
    payload: Option<Box<dyn Any>>,
}

#[fixture_proxy]
trait PriceFeed {
    fn quote(&self, symbol: &str) -> f64;
    fn venue(&self) -> String;
    fn latest(&self) -> Option<Point>;
    fn refresh(&mut self);
}

#[derive(Default, Fixture)]
struct Portfolio {
    name: String,
    feed: Option<Box<dyn PriceFeed>>,
}

#[test]
fn test_point_gets_int_default_in_every_member() {
    let point = Builder::<Point>::new().with_int_default(7).build().unwrap();
    assert_eq!(point, Point { x: 7, y: 7 });
}

#[test]
fn test_enum_members_take_first_constant() {
    let account = Builder::<Account>::new().build().unwrap();
    assert_eq!(account.status, Status::Active);
    assert_eq!(Builder::<Status>::new().build(), Some(Status::Active));
}

#[test]
fn test_nested_composite_at_limit_is_constructed_only() {
    let account = Builder::<Account>::new().with_int_default(5).build().unwrap();
    assert_eq!(account.owner, "text");
    assert_eq!(account.origin, Some(Point::default()));

    let account = Builder::<Account>::new()
        .with_int_default(5)
        .with_depth_limit(2)
        .build()
        .unwrap();
    assert_eq!(account.origin, Some(Point { x: 5, y: 5 }));
}

#[test]
fn test_ancestor_mutators_run_after_own() {
    let invoice = Builder::<Invoice>::new()
        .with_long_default(42)
        .with_int_default(3)
        .with_decimal_default(Decimal::new(1999, 2))
        .with_string_default("billing")
        .with_nested_lists()
        .build()
        .unwrap();

    assert_eq!(invoice.entity.id, 42);
    assert_eq!(invoice.entity.created_by, "billing");
    assert_eq!(invoice.amount, Decimal::new(1999, 2));
    assert_eq!(invoice.lines, 6);
    assert!(invoice.notes.is_empty());
}

#[test]
fn test_custom_constructor() {
    let builder = Builder::<Ticket>::new().with_int_default(11);
    let empty = builder.build_empty().unwrap();
    assert_eq!((empty.seq, empty.state.as_str()), (0, "open"));

    let built = builder.build().unwrap();
    assert_eq!((built.seq, built.state.as_str()), (11, "text"));
}

#[test]
fn test_unconstructible_member_stays_absent() {
    assert!(Builder::<Token>::new().build().is_none());

    let session = Builder::<Session>::new().build().unwrap();
    assert_eq!(session.user, "text");
    assert!(session.token.is_none());
}

#[test]
fn test_build_empty_leaves_defaults() {
    let account = Builder::<Account>::new().build_empty().unwrap();
    assert_eq!(account.owner, "");
    assert_eq!(account.status, Status::Suspended);
    assert!(account.origin.is_none());
}

#[test]
fn test_build_list_repeats_one_instance() {
    let builder = Builder::<Point>::new().with_collection_size(4);
    let points = builder.build_list();
    assert_eq!(points.len(), 4);
    assert!(points.iter().all(|point| Rc::ptr_eq(point, &points[0])));

    assert_eq!(builder.build_list_of(2).len(), 2);
    assert!(builder.build_list_of(0).is_empty());
    assert!(Builder::<Token>::new().build_list().is_empty());
}

#[test]
fn test_lists_are_empty_unless_nested_lists_enabled() {
    let team = Builder::<Team>::new().with_collection_size(2).build().unwrap();
    assert!(team.members.is_empty());
    assert!(team.ratings.is_empty());

    let team = Builder::<Team>::new()
        .with_collection_size(2)
        .with_nested_lists()
        .with_int_default(9)
        .build()
        .unwrap();
    assert_eq!(team.ratings, vec![9, 9]);
    assert_eq!(team.members.len(), 2);
    assert!(team.members.iter().all(|person| person.name == "text"));
}

#[test]
fn test_arrays_maps_and_sets() {
    let inventory = Builder::<Inventory>::new()
        .with_collection_size(3)
        .with_byte_default(4)
        .build()
        .unwrap();
    assert_eq!(&*inventory.cells, &[4, 4, 4]);
    assert!(inventory.index.is_empty());
    assert!(inventory.tags.is_empty());
}

#[test]
fn test_composite_array_elements_are_populated() {
    let route = Builder::<Route>::new().build().unwrap();
    assert_eq!(&*route.stops, &[Point { x: 1, y: 1 }]);

    let route = Builder::<Route>::new()
        .with_collection_size(3)
        .with_int_default(6)
        .with_depth_limit(0)
        .build()
        .unwrap();
    assert_eq!(route.stops.len(), 3);
    assert!(route.stops.iter().all(|stop| *stop == Point::default()));
}

#[test]
fn test_bare_objects_follow_configuration() {
    let envelope = Builder::<Envelope>::new().build().unwrap();
    assert!(envelope.payload.is_none());

    let envelope = Builder::<Envelope>::new().with_bare_objects().build().unwrap();
    assert!(envelope.payload.unwrap().is::<()>());
}

#[test]
fn test_interface_members_get_proxies() {
    let portfolio = Builder::<Portfolio>::new()
        .with_double_default(101.5)
        .with_string_default("XNYS")
        .build()
        .unwrap();
    assert_eq!(portfolio.name, "XNYS");

    let mut feed = portfolio.feed.unwrap();
    assert_eq!(feed.quote("ACME"), 101.5);
    assert_eq!(feed.venue(), "XNYS");
    feed.refresh();
    // The proxy sits at the depth limit, so composites it returns are bare.
    assert_eq!(feed.latest(), Some(Point::default()));
}

#[test]
fn test_interface_as_root() {
    let feed = Builder::<Box<dyn PriceFeed>>::new()
        .with_int_default(3)
        .build()
        .unwrap();
    assert_eq!(feed.latest(), Some(Point { x: 3, y: 3 }));
    assert_eq!(feed.quote("any"), 1.0);
}

#[test]
fn test_populate_reports_aborted_mutators() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("fixgen=debug")
        .try_init();

    let builder = Builder::<Invoice>::new().with_int_default(-1);
    let mut invoice = Invoice::default();
    let population = builder.populate(&mut invoice);

    assert_eq!(population.applied, 1);
    assert!(matches!(
        population.aborted,
        Some(FixgenError::Mutator { ref mutator, .. }) if mutator == "set_lines_doubled"
    ));
    assert_eq!(invoice.amount, Decimal::ONE);
    assert_eq!(invoice.entity.id, 0);
}

#[test]
fn test_configuration_from_toml() {
    let config = BuilderConfig::from_toml_str(
        r#"
        int_default = 21
        depth_limit = 2
        "#,
    )
    .unwrap();
    let account = Builder::<Account>::with_config(config).build().unwrap();
    assert_eq!(account.origin, Some(Point { x: 21, y: 21 }));
}
