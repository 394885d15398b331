//! Image base resolution by path substring.

use once_cell::sync::OnceCell;
use tracing::trace;

use crate::loader::{ImageSource, LoadedImage};

/// First image, in loader order, whose path contains `name`.
pub fn find_image<S: ImageSource + ?Sized>(source: &S, name: &str) -> Option<LoadedImage> {
    source
        .images()
        .into_iter()
        .find(|image| image.path.contains(name))
}

/// Header address of the first image whose path contains `name`.
///
/// Only the first match is considered: if its header address is null the
/// lookup fails rather than moving on to later images.
pub fn find_image_base<S: ImageSource + ?Sized>(source: &S, name: &str) -> Option<usize> {
    let image = find_image(source, name)?;
    trace!(
        query = name,
        path = %image.path,
        base = format_args!("{:#x}", image.base),
        "image matched"
    );
    (image.base != 0).then_some(image.base)
}

/// Per-call-site cache of a resolved image base.
///
/// The first successful resolution is stored and returned forever after,
/// whatever name later calls pass in. A failed lookup stores nothing, so the
/// next call scans again.
#[derive(Debug, Default)]
pub struct BaseSlot {
    base: OnceCell<usize>,
}

impl BaseSlot {
    pub const fn new() -> Self {
        Self {
            base: OnceCell::new(),
        }
    }

    /// The cached base, if one has been resolved.
    pub fn get(&self) -> Option<usize> {
        self.base.get().copied()
    }

    pub fn resolve<S: ImageSource + ?Sized>(&self, source: &S, name: &str) -> Option<usize> {
        if let Some(base) = self.get() {
            return Some(base);
        }
        let found = find_image_base(source, name)?;
        Some(*self.base.get_or_init(|| found))
    }
}

/// Resolve an image base through a cache private to this call site.
///
/// `image_base!("ShooterGame")` uses the host loader;
/// `image_base!(source, "name")` uses any `ImageSource`.
#[macro_export]
macro_rules! image_base {
    ($name:expr) => {
        $crate::image_base!(&$crate::loader::HostImages, $name)
    };
    ($source:expr, $name:expr) => {{
        static SLOT: $crate::process::BaseSlot = $crate::process::BaseSlot::new();
        SLOT.resolve($source, $name)
    }};
}
