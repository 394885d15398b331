use crate::common::{arena_view, data_image, Arena};
use selfmap::formats::macho::MachImageBuilder;
use selfmap::{
    AccessConfig, AccessError, BoundsPolicy, GuardedMemory, ProcessView, StaticImages,
    INVALID_POINTER_TEXT,
};

#[test]
fn outside_addresses_degrade_to_sentinels() {
    let mut arena = Arena::new(256, 0x5a);
    let base = arena.addr();
    let view = arena_view(&mut arena, 128, AccessConfig::default());

    for address in [base + 128, base + 200, base - 1, 0, usize::MAX] {
        assert!(!view.is_valid(address), "{:#x}", address);
        assert_eq!(view.read_or_default::<u8>(address), 0);
        assert_eq!(view.read_or_default::<i64>(address), 0);
        assert_eq!(view.read_or_default::<[u32; 4]>(address), [0; 4]);
        assert_eq!(view.read_string_lossy(address, 16), INVALID_POINTER_TEXT);
        assert_eq!(
            view.write::<u32>(address, 0xdead_beef),
            Err(AccessError::NotMapped { address })
        );
    }
    assert!(arena.bytes().iter().all(|&b| b == 0x5a));
}

#[test]
fn inside_addresses_are_valid() {
    let mut arena = Arena::new(256, 0);
    let base = arena.addr();
    let view = arena_view(&mut arena, 128, AccessConfig::default());

    assert!(view.is_valid(base));
    assert!(view.is_valid(base + 64));
    assert!(view.is_valid(base + 127));
}

#[test]
fn write_then_read_round_trip() {
    let mut arena = Arena::new(64, 0);
    let base = arena.addr();
    let view = arena_view(&mut arena, 64, AccessConfig::default());

    view.write::<i32>(base + 12, 42).unwrap();
    assert_eq!(view.read::<i32>(base + 12), Ok(42));
    assert_eq!(&arena.bytes()[12..16], &42i32.to_ne_bytes());
}

#[test]
fn read_string_truncates_at_first_nul() {
    let mut arena = Arena::new(64, 0xee);
    let base = arena.addr();
    let view = arena_view(&mut arena, 64, AccessConfig::default());

    view.write_bytes(base, b"ab\0cd").unwrap();
    assert_eq!(view.read_string(base, 5), Ok("ab".to_string()));
    assert_eq!(view.read_string_lossy(base + 3, 2), "cd");
}

#[test]
fn repeated_queries_see_the_same_map() {
    let mut arena = Arena::new(64, 0);
    let view = arena_view(&mut arena, 32, AccessConfig::default());

    let first = view.address_map().clone();
    for offset in 0..64 {
        view.is_valid(arena.addr() + offset);
    }
    assert_eq!(view.address_map(), &first);
    assert!(std::ptr::eq(view.address_map(), view.address_map()));
}

#[test]
fn slid_segment_covers_arena() {
    let mut arena = Arena::new(64, 0);
    let base = arena.addr();
    let view = ProcessView::new(
        StaticImages::new(vec![data_image("/synthetic/slid", base, 64, 0x4000)]),
        AccessConfig::default(),
    );

    let segment = view.covering(base + 1).unwrap();
    assert_eq!(segment.range.start(), base);
    assert_eq!(segment.range.end(), base + 64);
}

#[test]
fn unknown_magic_image_does_not_hide_others() {
    let mut first = Arena::new(32, 1);
    let mut second = Arena::new(32, 2);
    let broken = MachImageBuilder::new_64()
        .with_magic(0xbebafeca)
        .segment_64("__TEXT", first.addr() as u64, 32, 1)
        .build();

    let view = ProcessView::new(
        StaticImages::new(vec![
            selfmap::LoadedImage::mach_o("/synthetic/broken", first.addr(), 0, broken),
            data_image("/synthetic/good", second.addr(), 32, 0),
        ]),
        AccessConfig::default(),
    );

    assert_eq!(view.address_map().len(), 1);
    assert!(!view.is_valid(first.addr()));
    assert_eq!(view.read::<u8>(second.addr() + 31), Ok(2));
}

#[test]
fn whole_span_policy_closes_the_length_gap() {
    let mut arena = Arena::new(128, 3);
    let base = arena.addr();
    let loose = arena_view(&mut arena, 64, AccessConfig::default());
    let strict = arena_view(&mut arena, 64, AccessConfig::strict());
    assert_eq!(strict.config().bounds, BoundsPolicy::WholeSpan);

    // the arena continues past the covered range, so the loose read is safe here
    assert_eq!(loose.read::<u32>(base + 62), Ok(u32::from_ne_bytes([3; 4])));
    assert_eq!(
        strict.read::<u32>(base + 62),
        Err(AccessError::CopyFailed {
            address: base + 62,
            len: 4
        })
    );

    assert_eq!(loose.read_string_lossy(base + 60, 8), "\u{3}".repeat(8));
    assert_eq!(strict.read_string_lossy(base + 60, 8), "");
    assert_eq!(strict.read_string_lossy(base + 64, 8), INVALID_POINTER_TEXT);
}

#[test]
fn strict_view_refuses_huge_lengths() {
    let mut arena = Arena::new(64, 9);
    let base = arena.addr();
    let view = arena_view(&mut arena, 64, AccessConfig::strict());

    assert_eq!(
        view.read_string(base, usize::MAX),
        Err(AccessError::CopyFailed {
            address: base,
            len: usize::MAX
        })
    );
    assert_eq!(view.read_string_lossy(base + 8, usize::MAX / 2), "");
    assert_eq!(
        view.read_bytes(base, usize::MAX / 2),
        Err(AccessError::CopyFailed {
            address: base,
            len: usize::MAX / 2
        })
    );
    assert_eq!(view.read_bytes(base, 64).map(|bytes| bytes.len()), Ok(64));
}
