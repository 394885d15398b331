use selfmap::process::{find_image, find_image_base, BaseSlot};
use selfmap::{image_base, LoadedImage, StaticImages};

fn loader() -> StaticImages {
    StaticImages::new(vec![
        LoadedImage::mach_o(
            "/private/var/containers/Bundle/ShooterGame.app/ShooterGame",
            0x1_0000_0000,
            0x4000,
            vec![],
        ),
        LoadedImage::mach_o(
            "/usr/lib/system/libsystem_kernel.dylib",
            0x1_9000_0000,
            0x9000_0000,
            vec![],
        ),
        LoadedImage::mach_o("/usr/lib/libc++.1.dylib", 0x1_a000_0000, 0xa000_0000, vec![]),
    ])
}

#[test]
fn unmatched_name_is_none() {
    assert_eq!(find_image_base(&loader(), "UnrealEngine"), None);
    assert!(find_image(&loader(), "UnrealEngine").is_none());
}

#[test]
fn matched_name_returns_recorded_header_address() {
    let source = loader();
    assert_eq!(find_image_base(&source, "ShooterGame"), Some(0x1_0000_0000));
    assert_eq!(find_image_base(&source, "libc++"), Some(0x1_a000_0000));
    // substring, not full path
    assert_eq!(find_image_base(&source, "system_kern"), Some(0x1_9000_0000));
    assert_eq!(find_image(&source, "lib").unwrap().index, 1);
}

#[test]
fn slot_ignores_later_names() {
    let source = loader();
    let slot = BaseSlot::new();
    assert_eq!(slot.resolve(&source, "libc++"), Some(0x1_a000_0000));
    assert_eq!(slot.resolve(&source, "ShooterGame"), Some(0x1_a000_0000));
    assert_eq!(slot.get(), Some(0x1_a000_0000));
}

#[test]
fn macro_caches_per_call_site() {
    let source = loader();
    let mut seen = Vec::new();
    for name in ["ShooterGame", "libc++"] {
        // one call site: the first resolution sticks
        seen.push(image_base!(&source, name));
    }
    assert_eq!(seen, vec![Some(0x1_0000_0000), Some(0x1_0000_0000)]);
    assert_eq!(image_base!(&source, "libc++"), Some(0x1_a000_0000));
}
