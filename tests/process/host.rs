//! Tests against the loader of this test executable.

#![cfg(any(target_vendor = "apple", target_os = "linux"))]

use std::sync::atomic::{AtomicI32, Ordering};

use crate::common::exe_name;
use selfmap::{image_base, BaseSlot, GuardedMemory, HostImages, ImageSource, ProcessView};

static COUNTER: AtomicI32 = AtomicI32::new(7);
static PATTERN: [u8; 6] = *b"ab\0cd\0";

#[inline(never)]
fn marker() -> usize {
    0x5e1f
}

fn marker_address() -> usize {
    let f: fn() -> usize = marker;
    f as usize
}

#[test]
fn map_covers_own_code_and_data() {
    let code = marker_address();
    assert!(selfmap::is_valid(code));
    assert!(selfmap::is_valid(COUNTER.as_ptr() as usize));
    assert!(selfmap::is_valid(PATTERN.as_ptr() as usize));
    assert!(!selfmap::is_valid(usize::MAX - 16));
}

#[test]
fn map_is_computed_once() {
    let first = selfmap::address_map();
    assert!(!first.is_empty());
    assert!(std::ptr::eq(first, selfmap::address_map()));
    assert!(selfmap::host().is_built());
}

#[test]
fn write_read_round_trip_on_static() {
    let address = COUNTER.as_ptr() as usize;
    assert_eq!(selfmap::read::<i32>(address), Ok(COUNTER.load(Ordering::SeqCst)));

    selfmap::write::<i32>(address, 42).unwrap();
    assert_eq!(selfmap::read::<i32>(address), Ok(42));
    assert_eq!(COUNTER.load(Ordering::SeqCst), 42);
}

#[test]
fn read_string_from_static_bytes() {
    let address = PATTERN.as_ptr() as usize;
    assert_eq!(selfmap::read_string(address, 5), Ok("ab".to_string()));
    assert_eq!(selfmap::read_string_lossy(address + 3, 5), "cd");
    assert_eq!(
        selfmap::read_string_lossy(usize::MAX - 16, 5),
        selfmap::INVALID_POINTER_TEXT
    );
    assert_eq!(selfmap::read_or_default::<u64>(usize::MAX - 16), 0);
}

#[test]
fn unknown_module_has_no_base() {
    let view = ProcessView::host();
    assert_eq!(view.find_image_base("no-such-module-7c1d0e"), None);

    let slot = BaseSlot::new();
    assert_eq!(slot.resolve(&HostImages, "no-such-module-7c1d0e"), None);
    assert_eq!(image_base!("no-such-module-7c1d0e"), None);
}

#[test]
fn executable_base_is_its_header_address() {
    let name = exe_name();
    assert!(!name.is_empty());

    let expected = HostImages
        .images()
        .into_iter()
        .find(|image| image.path.contains(&name))
        .map(|image| image.base);
    assert!(expected.is_some());
    assert_ne!(expected, Some(0));

    // the only caller of the shared process-wide slot in this binary
    assert_eq!(selfmap::resolve_base(&name), expected);
    assert_eq!(selfmap::resolve_base("no-such-module-7c1d0e"), expected);

    let base = expected.unwrap_or_default();
    assert!(selfmap::is_valid(base));
    assert!(base <= marker_address());
}

#[test]
fn strict_view_over_host() {
    let view = ProcessView::new(HostImages, selfmap::AccessConfig::strict());
    let address = PATTERN.as_ptr() as usize;
    assert_eq!(view.read_string(address, 5), Ok("ab".to_string()));
    assert!(view.covering(address).is_some());
}
