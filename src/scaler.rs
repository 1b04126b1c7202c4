use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::renderer::PixelBuffer;

/// Precomputed nearest-neighbour mapping from window pixels to frame pixels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_row: Vec<usize>, // already multiplied by the source width
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn dst_size(&self) -> (usize, usize) {
        (self.src_x.len(), self.src_row.len())
    }
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    if src_w == 0 || src_h == 0 {
        return ScaleLut::empty();
    }

    let sx = src_w as f32 / dst_w as f32;
    let sy = src_h as f32 / dst_h as f32;

    let src_x = (0..dst_w)
        .map(|x| ((x as f32 * sx) as usize).min(src_w - 1))
        .collect();
    let src_row = (0..dst_h)
        .map(|y| ((y as f32 * sy) as usize).min(src_h - 1) * src_w)
        .collect();

    ScaleLut { src_x, src_row }
}

/// Parallel nearest-neighbour stretch into a softbuffer surface.
/// Rows are processed in parallel for cache friendly writes.
/// Nearest sampling keeps the frame's two wall shades intact.
pub fn blit_nearest_stretch(dst: &mut [u32], dw: usize, src: &PixelBuffer, lut: &ScaleLut) {
    if dw == 0 || lut.dst_size() == (0, 0) {
        return;
    }
    let pixels = src.pixels();
    dst.par_chunks_mut(dw).enumerate().for_each(|(y, dst_row)| {
        let Some(&row) = lut.src_row.get(y) else {
            return;
        };
        for (out, &x) in dst_row.iter_mut().zip(&lut.src_x) {
            *out = pixels[row + x].pack();
        }
    });
}
