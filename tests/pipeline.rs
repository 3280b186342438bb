//! End-to-end pipeline tests
//!
//! These drive discover → bind → apply over real directories, using a
//! compiled-in module registry in place of shared libraries.

use std::fs;

use plugwire::container::ResolutionContainer;
use plugwire::plugin::{discover, StaticModuleLoader};
use plugwire::{apply, bind, Bootstrapper, Container};
use tempfile::TempDir;

#[derive(Debug, Default, PartialEq)]
struct JsonWriter;

#[derive(Debug, Default, PartialEq)]
struct XmlWriter;

#[derive(Debug, Default, PartialEq)]
struct JsonReader;

#[derive(Debug, Default, PartialEq)]
struct Foo;

/// Create a plugin directory containing the given (empty) module files
fn plugin_dir(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for file in files {
        fs::write(dir.path().join(file), b"\x7fELF").unwrap();
    }
    dir
}

fn writer_modules() -> StaticModuleLoader {
    StaticModuleLoader::new()
        .with_module("module1.so", |r| {
            r.public_type("JsonWriter")
                .implements("IWriter")
                .constructs::<JsonWriter>();
        })
        .with_module("module2.so", |r| {
            r.public_type("XmlWriter")
                .implements("IWriter")
                .constructs::<XmlWriter>();
            r.public_type("JsonReader")
                .implements("IReader")
                .constructs::<JsonReader>();
        })
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn test_empty_directory_binds_nothing() {
    let dir = plugin_dir(&[]);
    let loader = StaticModuleLoader::new();

    let discovery = discover(dir.path(), &loader).unwrap();
    assert_eq!(discovery.types().count(), 0);

    let table = bind(discovery.into_types());
    assert!(table.is_empty());
}

#[test]
fn test_corrupt_module_does_not_hide_valid_one() {
    let dir = plugin_dir(&["corrupt.so", "valid.so"]);
    let loader = StaticModuleLoader::new().with_module("valid.so", |r| {
        r.public_type("Foo").implements("IFoo").constructs::<Foo>();
    });

    let discovery = discover(dir.path(), &loader).unwrap();

    let names: Vec<_> = discovery.types().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec!["Foo"]);
    assert_eq!(discovery.failures().count(), 1);
}

#[test]
fn test_abstract_and_private_types_never_bound() {
    let dir = plugin_dir(&["m.so"]);
    let loader = StaticModuleLoader::new().with_module("m.so", |r| {
        r.abstract_type("WriterBase").implements("IWriter");
        r.private_type("InternalWriter")
            .implements("IWriter")
            .constructs::<JsonWriter>();
        r.private_type("Helper").implements("IHelper");
    });

    let discovery = discover(dir.path(), &loader).unwrap();
    let table = bind(discovery.into_types());

    assert!(table.is_empty());
}

// =============================================================================
// Full pipeline
// =============================================================================

#[test]
fn test_two_module_scenario() {
    let dir = plugin_dir(&["module2.so", "module1.so"]);
    let loader = writer_modules();

    let discovery = discover(dir.path(), &loader).unwrap();
    let table = bind(discovery.into_types());

    assert_eq!(table.len(), 2);
    assert_eq!(table.implementation_of("IWriter").unwrap().name, "JsonWriter");
    assert_eq!(table.implementation_of("IReader").unwrap().name, "JsonReader");
    assert_eq!(table.conflicts().len(), 1);
    assert_eq!(table.conflicts()[0].discarded.name, "XmlWriter");

    let mut container = Container::new();
    assert_eq!(apply(&table, &mut container), Ok(2));
    assert_eq!(container.len(), 2);

    let writer = container.resolve_as::<JsonWriter>("IWriter").unwrap();
    assert_eq!(*writer, JsonWriter);
}

#[test]
fn test_round_trip_resolves_recorded_implementation() {
    let dir = plugin_dir(&["module1.so", "module2.so"]);
    let loader = writer_modules();

    let table = bind(discover(dir.path(), &loader).unwrap().into_types());
    let mut container = Container::new();
    apply(&table, &mut container).unwrap();

    for binding in &table {
        let instance = container.resolve(binding.contract().as_str()).unwrap();
        assert_eq!(instance.implementation(), binding.implementation().name);
        assert_eq!(instance.type_ref().module, binding.implementation().module);
    }
}

#[test]
fn test_bootstrapper_registers_directory() {
    let dir = plugin_dir(&["module1.so", "module2.so", "notes.txt"]);
    let mut bootstrapper = Bootstrapper::new(writer_modules());

    let report = bootstrapper.register_modules_from(dir.path()).unwrap();

    assert_eq!(report.registered, 2);
    assert_eq!(report.modules.len(), 3);
    assert_eq!(report.failed_modules().count(), 1);
    assert_eq!(report.conflicts.len(), 1);

    let container = bootstrapper.into_container();
    assert!(container.resolve("IReader").unwrap().is::<JsonReader>());
}

#[test]
fn test_custom_container_receives_bindings() {
    #[derive(Default)]
    struct Names(Vec<String>);

    impl ResolutionContainer for Names {
        fn register(
            &mut self,
            contract: &plugwire::Contract,
            implementation: &plugwire::DiscoveredType,
        ) -> Result<(), plugwire::container::ContainerError> {
            self.0.push(format!("{}={}", contract, implementation.name));
            Ok(())
        }
    }

    let dir = plugin_dir(&["module1.so", "module2.so"]);
    let table = bind(discover(dir.path(), &writer_modules()).unwrap().into_types());

    let mut names = Names::default();
    apply(&table, &mut names).unwrap();
    assert_eq!(names.0, vec!["IReader=JsonReader", "IWriter=JsonWriter"]);
}
