//! Plugin that reports a module ABI version the host no longer accepts

#[no_mangle]
pub extern "C" fn plugwire_abi_version() -> u32 {
    0
}
