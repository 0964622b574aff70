//! Aspect-preserving fit of an image into the space left around the anchor.

/// Display size for the preview image, in whole display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledSize {
    pub width: i32,
    pub height: i32,
}

/// Scales `natural_width` x `natural_height` down to fit within
/// `max_width` x `max_height`, preserving aspect ratio.
///
/// Single pass, height first: an image that is both too tall and too wide
/// is first brought under the height limit, then the (already narrower)
/// result is brought under the width limit. The second correction can leave
/// the final height below `max_height`; that ordering is deliberate and
/// load-bearing for panel placement, so keep it.
///
/// Images that already fit come back unchanged.
pub fn fit(natural_width: u32, natural_height: u32, max_width: i32, max_height: i32) -> ScaledSize {
    let ratio = natural_width as f64 / natural_height as f64;
    let mut scale = ScaledSize {
        width: natural_width as i32,
        height: natural_height as i32,
    };

    if scale.height > max_height {
        scale.height = max_height;
        scale.width = (scale.height as f64 * ratio).round() as i32;
    }
    if scale.width > max_width {
        scale.width = max_width;
        scale.height = (scale.width as f64 / ratio).round() as i32;
    }

    scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_shrink_returns_original() {
        let scale = fit(640, 480, 1920, 1080);
        assert_eq!(
            scale,
            ScaledSize {
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn test_wide_image_clamped_on_width() {
        let scale = fit(1000, 500, 400, 10_000);
        assert_eq!(
            scale,
            ScaledSize {
                width: 400,
                height: 200
            }
        );
    }

    #[test]
    fn test_tall_image_clamped_on_height() {
        let scale = fit(400, 1000, 10_000, 300);
        assert_eq!(
            scale,
            ScaledSize {
                width: 120,
                height: 300
            }
        );
    }

    #[test]
    fn test_height_correction_runs_before_width() {
        // Too tall and, after the height pass, still too wide. The width
        // pass then recomputes height from the adjusted ratio, landing
        // under the original height limit.
        let scale = fit(2000, 1000, 500, 600);
        // height pass: 1000 -> 600, width -> round(600 * 2.0) = 1200
        // width pass: 1200 -> 500, height -> round(500 / 2.0) = 250
        assert_eq!(
            scale,
            ScaledSize {
                width: 500,
                height: 250
            }
        );
    }

    #[test]
    fn test_result_respects_both_bounds() {
        let cases = [
            (1920u32, 1080u32, 800i32, 600i32),
            (1080, 1920, 800, 600),
            (5000, 5000, 123, 457),
            (10, 10, 2000, 2000),
            (3333, 17, 200, 200),
            (17, 3333, 200, 200),
        ];
        for (nw, nh, mw, mh) in cases {
            let scale = fit(nw, nh, mw, mh);
            assert!(
                scale.width <= mw && scale.height <= mh,
                "fit({nw}, {nh}, {mw}, {mh}) = {scale:?} exceeds bounds"
            );
            assert!(scale.width >= 0 && scale.height >= 0);
        }
    }

    #[test]
    fn test_square_image_keeps_ratio_within_rounding() {
        let scale = fit(1000, 1000, 333, 10_000);
        assert_eq!(scale.width, 333);
        assert_eq!(scale.height, 333);
    }
}
