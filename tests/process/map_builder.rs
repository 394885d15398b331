use selfmap::formats::macho::{
    MachImageBuilder, LC_SYMTAB, LC_UUID, VM_PROT_EXECUTE, VM_PROT_NONE, VM_PROT_READ,
    VM_PROT_WRITE,
};
use selfmap::process::build_address_map;
use selfmap::{AddressRange, LoadedImage, SegmentConfig, StaticImages};

fn dylib(path: &str, slide: isize) -> LoadedImage {
    let header = MachImageBuilder::new_64()
        .filetype(0x6) // MH_DYLIB
        .segment_64("__TEXT", 0x1000, 0x3000, VM_PROT_READ | VM_PROT_EXECUTE)
        .command(LC_UUID, &[0x11; 16])
        .segment_64("__DATA_CONST", 0x4000, 0x1000, VM_PROT_READ | VM_PROT_WRITE)
        .command(LC_SYMTAB, &[0; 16])
        .segment_64("__LINKEDIT", 0x5000, 0x2000, VM_PROT_READ)
        .build();
    LoadedImage::mach_o(path, (0x1000 + slide) as usize, slide, header)
}

fn executable(slide: isize) -> LoadedImage {
    let header = MachImageBuilder::new_64()
        .segment_64("__PAGEZERO", 0, 0x1_0000_0000, VM_PROT_NONE)
        .segment_64("__TEXT", 0x1_0000_0000, 0x8000, VM_PROT_READ | VM_PROT_EXECUTE)
        .segment_64("__DATA", 0x1_0000_8000, 0x4000, VM_PROT_READ | VM_PROT_WRITE)
        .build();
    let base = (0x1_0000_0000 + slide) as usize;
    LoadedImage::mach_o("/Applications/Game.app/Game", base, slide, header)
}

#[test]
fn ranges_follow_loader_then_command_order() {
    let source = StaticImages::new(vec![
        executable(0x40_0000),
        dylib("/usr/lib/libA.dylib", 0x7000_0000),
        dylib("/usr/lib/libB.dylib", 0x6000_0000),
    ]);
    let map = build_address_map(&source, &SegmentConfig::default());

    let names: Vec<_> = map
        .segments()
        .iter()
        .map(|seg| (seg.image, seg.name.clone().unwrap_or_default()))
        .collect();
    assert_eq!(
        names,
        vec![
            (0, "__PAGEZERO".to_string()),
            (0, "__TEXT".to_string()),
            (0, "__DATA".to_string()),
            (1, "__TEXT".to_string()),
            (1, "__DATA_CONST".to_string()),
            (1, "__LINKEDIT".to_string()),
            (2, "__TEXT".to_string()),
            (2, "__DATA_CONST".to_string()),
            (2, "__LINKEDIT".to_string()),
        ]
    );

    // libB sits below libA: the map is not sorted
    let text_a = map.segments()[3].range;
    let text_b = map.segments()[6].range;
    assert_eq!(text_a, AddressRange::new(0x7000_1000, 0x7000_4000).unwrap());
    assert_eq!(text_b, AddressRange::new(0x6000_1000, 0x6000_4000).unwrap());
    assert!(text_b.start() < text_a.start());
}

#[test]
fn pagezero_is_kept_unless_filtered() {
    let source = StaticImages::new(vec![executable(0x40_0000)]);

    let map = build_address_map(&source, &SegmentConfig::default());
    assert!(map.contains(0x40_0000));

    let config = SegmentConfig {
        skip_inaccessible: true,
        ..SegmentConfig::default()
    };
    let map = build_address_map(&source, &config);
    assert!(!map.contains(0x40_0000));
    assert!(map.contains(0x1_0040_0000));
}

#[test]
fn overlapping_images_are_not_merged() {
    let source = StaticImages::new(vec![
        dylib("/usr/lib/libA.dylib", 0x10_0000),
        dylib("/usr/lib/libA-copy.dylib", 0x10_0000),
    ]);
    let map = build_address_map(&source, &SegmentConfig::default());
    assert_eq!(map.len(), 6);
    assert_eq!(map.covering(0x10_1000).unwrap().image, 0);
}

#[test]
fn nothing_loaded_means_empty_map() {
    let map = build_address_map(&StaticImages::default(), &SegmentConfig::default());
    assert!(map.is_empty());
    assert!(!map.contains(0x1000));
}
