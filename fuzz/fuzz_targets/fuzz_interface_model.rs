#![no_main]

use libfuzzer_sys::fuzz_target;
use mdn_helper::idl::parser;
use mdn_helper::model::InterfaceModel;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(defs) = parser::parse(source) else {
        return;
    };
    if let Ok(model) = InterfaceModel::from_definitions(&defs, "fuzz.idl") {
        let _ = model.keys();
        let _ = model.interfaces();
        let _ = model.page_specs();
    }
});
