//! Descriptor and event fixtures.

use aebridge_core::FourCharCode;
use aebridge_descriptor::MemoryDescriptor;
use aebridge_descriptor::types::{KEY_CONTAINER, KEY_DESIRED_CLASS, KEY_KEY_DATA, KEY_KEY_FORM};
use aebridge_events::MemoryEvent;
use aebridge_events::keywords::{KEY_DIRECT_OBJECT, KEY_JAVASCRIPT};

/// Parse a four-char code.
///
/// # Panics
///
/// Panics if `s` is not four Latin-1 characters.
#[must_use]
pub fn code(s: &str) -> FourCharCode {
    FourCharCode::parse(s).unwrap_or_else(|| panic!("not a four-char code: {s:?}"))
}

/// `tab 1`, as `cTab` by index 1 with no container.
#[must_use]
pub fn first_tab_specifier() -> MemoryDescriptor {
    MemoryDescriptor::object_specifier([
        (KEY_DESIRED_CLASS, MemoryDescriptor::type_code(code("cTab"))),
        (KEY_KEY_FORM, MemoryDescriptor::enumerated(code("indx"))),
        (KEY_KEY_DATA, MemoryDescriptor::sint32(1)),
    ])
}

/// `URL of tab 1`. Summarizes to `"prop URL  of cTab 1"`.
#[must_use]
pub fn url_of_tab_specifier() -> MemoryDescriptor {
    MemoryDescriptor::object_specifier([
        (KEY_DESIRED_CLASS, MemoryDescriptor::type_code(code("prop"))),
        (KEY_KEY_DATA, MemoryDescriptor::type_code(code("URL "))),
        (KEY_CONTAINER, first_tab_specifier()),
    ])
}

/// `window "name"`, by name.
#[must_use]
pub fn window_named_specifier(name: &str) -> MemoryDescriptor {
    MemoryDescriptor::object_specifier([
        (KEY_DESIRED_CLASS, MemoryDescriptor::type_code(code("cwin"))),
        (KEY_KEY_FORM, MemoryDescriptor::enumerated(code("name"))),
        (KEY_KEY_DATA, MemoryDescriptor::utf8(name)),
    ])
}

/// `core`/`getd` for `URL of tab 1`, sent to `bundle_id`.
#[must_use]
pub fn get_url_event(bundle_id: &str) -> MemoryEvent {
    MemoryEvent::new(code("core"), code("getd"))
        .with_parameter(KEY_DIRECT_OBJECT, url_of_tab_specifier())
        .with_target_bundle(bundle_id)
        .with_transaction_id(1)
}

/// `GURL`/`GURL`, the open-location event.
#[must_use]
pub fn open_location_event(url: &str) -> MemoryEvent {
    MemoryEvent::new(code("GURL"), code("GURL"))
        .with_parameter(KEY_DIRECT_OBJECT, MemoryDescriptor::utf8(url))
}

/// `aevt`/`odoc` with a list of file URLs.
#[must_use]
pub fn open_documents_event(urls: &[&str]) -> MemoryEvent {
    let files = MemoryDescriptor::list(urls.iter().map(|url| MemoryDescriptor::utf8(url)));
    MemoryEvent::new(code("aevt"), code("odoc")).with_parameter(KEY_DIRECT_OBJECT, files)
}

/// `core`/`dosc` carrying a script under `'JvSc'`, targeting tab 1.
#[must_use]
pub fn run_javascript_event(script: &str) -> MemoryEvent {
    MemoryEvent::new(code("core"), code("dosc"))
        .with_parameter(KEY_DIRECT_OBJECT, first_tab_specifier())
        .with_parameter(KEY_JAVASCRIPT, MemoryDescriptor::utf8(script))
}
