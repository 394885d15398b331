#![allow(deprecated)] // libc marks the mach types deprecated in favour of mach2

use std::ffi::CStr;
use std::{ptr, slice};

use libc::{
    _dyld_get_image_header, _dyld_get_image_name, _dyld_get_image_vmaddr_slide, _dyld_image_count,
};
use tracing::trace;

use super::{ImageLayout, LoadedImage};
use crate::formats::macho::utils::NativeRead;
use crate::formats::macho::HeaderKind;

pub(super) fn images() -> Vec<LoadedImage> {
    // only a hint; images can be unloaded while we walk the list
    let count = unsafe { _dyld_image_count() };
    let mut images = Vec::with_capacity(count as usize);

    for i in 0..count {
        let name_ptr = unsafe { _dyld_get_image_name(i) };
        if name_ptr.is_null() {
            break;
        }
        let path = unsafe { CStr::from_ptr(name_ptr) }
            .to_string_lossy()
            .into_owned();

        let header = unsafe { _dyld_get_image_header(i) } as *const u8;
        let slide = unsafe { _dyld_get_image_vmaddr_slide(i) };
        let layout = if header.is_null() {
            ImageLayout::Missing
        } else {
            unsafe { capture_header(header) }
        };

        trace!(index = i, path = %path, base = ?header, slide, "dyld image");
        images.push(LoadedImage {
            index: i as usize,
            path,
            base: header as usize,
            slide,
            layout,
        });
    }

    images
}

/// Copy the mapped header and its load command table into an owned buffer.
///
/// An unknown magic copies only the magic itself, which is enough for the
/// parser to reject the image.
///
/// # Safety
/// `header` must point at a Mach-O header mapped by dyld.
unsafe fn capture_header(header: *const u8) -> ImageLayout {
    let magic = ptr::read_unaligned(header as *const u32);
    let kind = match HeaderKind::from_magic(magic) {
        Ok(kind) => kind,
        Err(_) => return ImageLayout::MachO(magic.to_ne_bytes().to_vec()),
    };

    let fixed = slice::from_raw_parts(header, kind.header_size());
    let sizeofcmds = match fixed.read_u32(20) {
        Ok(size) => size as usize,
        Err(_) => 0,
    };
    let total = kind.header_size() + sizeofcmds;
    ImageLayout::MachO(slice::from_raw_parts(header, total).to_vec())
}
