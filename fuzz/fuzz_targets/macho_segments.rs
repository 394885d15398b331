#![no_main]
use libfuzzer_sys::fuzz_target;

use selfmap::formats::macho::MachImage;
use selfmap::process::image_segments;
use selfmap::{LoadedImage, SegmentConfig};

fuzz_target!(|data: &[u8]| {
    if let Ok(image) = MachImage::parse(data) {
        for segment in image.segments() {
            if segment.is_err() {
                break;
            }
        }
    }

    let config = SegmentConfig {
        include_segment32: true,
        ..SegmentConfig::default()
    };
    let image = LoadedImage::mach_o("fuzz", 0x1000, 0x7fff_0000, data.to_vec());
    let _ = image_segments(&image, &config);
});
