//! Symbols a native module exports
//!
//! A plugin crate built as a `cdylib` exports two symbols:
//!
//! - `plugwire_abi_version` - `extern "C" fn() -> u32`, must equal [`ABI_VERSION`]
//! - `plugwire_register_module` - `fn(&mut ModuleRegistrar)`, declares the module's types
//!
//! The registration function uses the Rust ABI, so plugins must be built
//! with the same compiler and `plugwire` version as the host. The version
//! check catches mismatched `plugwire` releases, not mismatched compilers.
//!
//! Use [`declare_module!`](crate::declare_module) rather than writing the
//! exports by hand:
//!
//! ```ignore
//! #[derive(Default)]
//! pub struct JsonWriter;
//!
//! fn register(registrar: &mut plugwire::plugin::ModuleRegistrar) {
//!     registrar
//!         .public_type("JsonWriter")
//!         .implements("IWriter")
//!         .constructs::<JsonWriter>();
//! }
//!
//! plugwire::declare_module!(register);
//! ```

/// Bumped whenever [`ModuleRegistrar`](super::ModuleRegistrar) changes shape
pub const ABI_VERSION: u32 = 1;

pub const ABI_VERSION_SYMBOL: &str = "plugwire_abi_version";

pub const REGISTER_SYMBOL: &str = "plugwire_register_module";

/// Exports the symbols the native loader looks for
#[macro_export]
macro_rules! declare_module {
    ($register:path) => {
        #[no_mangle]
        pub extern "C" fn plugwire_abi_version() -> u32 {
            $crate::plugin::ABI_VERSION
        }

        #[no_mangle]
        pub fn plugwire_register_module(registrar: &mut $crate::plugin::ModuleRegistrar) {
            $register(registrar)
        }
    };
}
