//! Adapters from `image` buffers to the core frame view.

use court_analytics_core::GrayImageView;

/// Borrow an `image::GrayImage` as a [`GrayImageView`].
pub fn gray_view(img: &::image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}
