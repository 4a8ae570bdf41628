use winit::dpi::PhysicalSize;

/// `(width, height)` to hand to `App::on_resize`, or `None` for a zero-area
/// drawable (minimized, or a hidden window that is not mapped yet).
pub(crate) fn drawable_size(size: PhysicalSize<u32>) -> Option<(u32, u32)> {
    (size.width > 0 && size.height > 0).then_some((size.width, size.height))
}
