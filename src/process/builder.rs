//! Address map construction.
//!
//! Walks every loaded image in loader order and turns each loadable segment
//! into a slid `[start, end)` range. A bad image is skipped; the build as a
//! whole never fails and at worst returns an empty map.

use tracing::{debug, debug_span, trace};

use crate::config::SegmentConfig;
use crate::core::{AddressMap, AddressRange, Perms, Segment};
use crate::formats::macho::{MachError, MachImage, SegmentKind};
use crate::loader::{ImageLayout, ImageSource, LoadedImage, ProgramSegment};

/// Build the address map for every image `source` reports.
pub fn build_address_map<S: ImageSource + ?Sized>(
    source: &S,
    config: &SegmentConfig,
) -> AddressMap {
    let span = debug_span!("build_address_map");
    let _guard = span.enter();

    let mut map = AddressMap::default();
    let mut images = 0usize;
    let mut skipped = 0usize;
    for image in source.images() {
        images += 1;
        match image_segments(&image, config) {
            Ok(segments) => {
                for segment in segments {
                    trace!(image = image.index, segment = %segment, "segment");
                    map.push(segment);
                }
            }
            Err(err) => {
                skipped += 1;
                debug!(index = image.index, path = %image.path, error = %err, "skipping image");
            }
        }
    }

    debug!(images, skipped, segments = map.len(), "address map built");
    map
}

/// Slid segments of a single image.
///
/// A header the parser does not accept is an error. A load command that turns
/// out malformed part-way through the table ends the walk, keeping the
/// segments found before it.
pub fn image_segments(
    image: &LoadedImage,
    config: &SegmentConfig,
) -> Result<Vec<Segment>, MachError> {
    match &image.layout {
        ImageLayout::MachO(data) => mach_segments(image, data, config),
        ImageLayout::Program(segments) => Ok(program_segments(image, segments, config)),
        ImageLayout::Missing => {
            debug!(index = image.index, path = %image.path, "no header recorded");
            Ok(Vec::new())
        }
    }
}

fn mach_segments(
    image: &LoadedImage,
    data: &[u8],
    config: &SegmentConfig,
) -> Result<Vec<Segment>, MachError> {
    let parsed = MachImage::parse(data)?;

    let mut segments = Vec::new();
    for command in parsed.segments() {
        let command = match command {
            Ok(command) => command,
            Err(err) => {
                debug!(index = image.index, error = %err, "load command walk stopped");
                break;
            }
        };

        if command.kind == SegmentKind::Segment32 && !config.include_segment32 {
            continue;
        }
        let perms = Perms::from_vm_prot(command.initprot);
        if !keep(config, perms, command.vmsize) {
            continue;
        }
        let Some(range) = relocate(command.vmaddr, command.vmsize, image.slide) else {
            debug!(
                segment = %command.segname,
                vmaddr = command.vmaddr,
                "segment outside address width"
            );
            continue;
        };

        segments.push(
            Segment::new(Some(command.segname), range, perms, image.index)
                .with_max_perms(Perms::from_vm_prot(command.maxprot)),
        );
    }
    Ok(segments)
}

fn program_segments(
    image: &LoadedImage,
    program: &[ProgramSegment],
    config: &SegmentConfig,
) -> Vec<Segment> {
    program
        .iter()
        .filter(|ph| keep(config, ph.perms, ph.memsz))
        .filter_map(|ph| {
            let range = relocate(ph.vaddr, ph.memsz, image.slide)?;
            Some(Segment::new(None, range, ph.perms, image.index))
        })
        .collect()
}

fn keep(config: &SegmentConfig, perms: Perms, size: u64) -> bool {
    let inaccessible = config.skip_inaccessible && perms.is_none();
    let empty = config.skip_empty && size == 0;
    !(inaccessible || empty)
}

/// `start = vmaddr + slide`, `end = start + vmsize`, in address-width
/// arithmetic. An end past the top of the address space is clamped to
/// `usize::MAX`, which keeps `[start, usize::MAX)` valid where a wrapping
/// add would leave an inverted range that matches nothing.
fn relocate(vmaddr: u64, vmsize: u64, slide: isize) -> Option<AddressRange> {
    let start = usize::try_from(vmaddr.wrapping_add(slide as i64 as u64)).ok()?;
    let size = usize::try_from(vmsize).unwrap_or(usize::MAX);
    Some(AddressRange::from_start_size(start, size))
}
