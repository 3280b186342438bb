//! Plugin used by the integration tests: one writer, an abstract base, and
//! a private helper.

use plugwire::plugin::ModuleRegistrar;

fn register(registrar: &mut ModuleRegistrar) {
    registrar
        .public_type("JsonWriter")
        .implements("IWriter")
        .constructor(|| Box::new(String::from("json writer")));
    registrar.abstract_type("WriterBase").implements("IWriter");
    registrar.private_type("Buffer").implements("IBuffer");
}

plugwire::declare_module!(register);
