use std::ffi::CStr;
use std::slice;

use libc::{c_int, c_void, dl_iterate_phdr, dl_phdr_info, size_t};
use tracing::trace;

use super::{ImageLayout, LoadedImage, ProgramSegment};
use crate::core::segment::Perms;

const PT_LOAD: u32 = 1;
const PF_X: u32 = 0x1;
const PF_W: u32 = 0x2;
const PF_R: u32 = 0x4;

pub(super) fn images() -> Vec<LoadedImage> {
    let mut images: Vec<LoadedImage> = Vec::new();
    unsafe {
        dl_iterate_phdr(
            Some(collect),
            &mut images as *mut Vec<LoadedImage> as *mut c_void,
        );
    }

    // the main program is reported with an empty name
    if let Some(main) = images.first_mut() {
        if main.path.is_empty() {
            main.path = std::env::current_exe()
                .map(|path| path.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
    }
    images
}

fn perms_from_flags(flags: u32) -> Perms {
    Perms::new(flags & PF_R != 0, flags & PF_W != 0, flags & PF_X != 0)
}

unsafe extern "C" fn collect(info: *mut dl_phdr_info, _size: size_t, data: *mut c_void) -> c_int {
    let images = &mut *(data as *mut Vec<LoadedImage>);
    let info = &*info;

    let path = if info.dlpi_name.is_null() {
        String::new()
    } else {
        CStr::from_ptr(info.dlpi_name)
            .to_string_lossy()
            .into_owned()
    };

    let phdrs = if info.dlpi_phdr.is_null() || info.dlpi_phnum == 0 {
        &[][..]
    } else {
        slice::from_raw_parts(info.dlpi_phdr, info.dlpi_phnum as usize)
    };

    let load_bias = info.dlpi_addr as u64;
    let mut segments = Vec::new();
    // address of file offset 0, i.e. the ELF header, in the lowest PT_LOAD
    let mut header_vaddr: Option<u64> = None;
    for ph in phdrs.iter().filter(|ph| ph.p_type == PT_LOAD) {
        let vaddr = ph.p_vaddr as u64;
        let file_start = vaddr.wrapping_sub(ph.p_offset as u64);
        header_vaddr = Some(header_vaddr.map_or(file_start, |current| current.min(file_start)));
        segments.push(ProgramSegment {
            vaddr,
            memsz: ph.p_memsz as u64,
            perms: perms_from_flags(ph.p_flags),
        });
    }

    let base = header_vaddr
        .map(|vaddr| load_bias.wrapping_add(vaddr) as usize)
        .unwrap_or(0);
    let layout = if phdrs.is_empty() {
        ImageLayout::Missing
    } else {
        ImageLayout::Program(segments)
    };

    trace!(
        index = images.len(),
        path = %path,
        base = format_args!("{:#x}", base),
        "loaded object"
    );
    images.push(LoadedImage {
        index: images.len(),
        path,
        base,
        slide: info.dlpi_addr as isize,
        layout,
    });
    0
}
