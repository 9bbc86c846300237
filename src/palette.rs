//! Palette resolution: monochrome or a precomputed gradient lookup table.
//!
//! Artworks never interpolate colors per frame. A [`PaletteCache`] builds the
//! table once per observed color-mode change and the draw loop only indexes it.

/// 8-bit RGBA color (straight alpha)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Opaque color from `0xRRGGBB`
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Gray level with alpha, both on the 0-255 scale (values are clamped)
    pub fn gray(level: f32, alpha: f32) -> Self {
        let level = level.clamp(0.0, 255.0) as u8;
        Self {
            r: level,
            g: level,
            b: level,
            a: alpha.clamp(0.0, 255.0) as u8,
        }
    }

    /// Same color with alpha replaced (0-255 scale, clamped)
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 255.0) as u8,
            ..self
        }
    }

    /// Linear interpolation in RGBA space, `t` clamped to [0, 1]
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// Fixed-size color lookup table interpolated across a base palette
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    colors: Vec<Color>,
}

impl Gradient {
    /// Interpolate `steps` entries in equal increments across `base`
    pub fn build(base: &[Color], steps: usize) -> Self {
        let steps = steps.max(1);
        let Some(&first) = base.first() else {
            return Self {
                colors: vec![Color::WHITE; steps],
            };
        };
        let last_index = base.len() - 1;
        let colors = (0..steps)
            .map(|i| {
                if steps == 1 || last_index == 0 {
                    return first;
                }
                let t = i as f32 / (steps - 1) as f32;
                let position = t * last_index as f32;
                let lower = (position.floor() as usize).min(last_index);
                let upper = (position.ceil() as usize).min(last_index);
                base[lower].lerp(base[upper], position - lower as f32)
            })
            .collect();
        Self { colors }
    }

    /// Table entry for `t` in [0, 1]: `floor(t * (len - 1))` clamped to the table
    pub fn sample(&self, t: f32) -> Color {
        let last = self.colors.len() - 1;
        let index = (t * last as f32).floor();
        let index = if index.is_nan() {
            0
        } else {
            (index.max(0.0) as usize).min(last)
        };
        self.colors[index]
    }

    pub fn first(&self) -> Color {
        self.colors[0]
    }

    pub fn last(&self) -> Color {
        self.colors[self.colors.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

/// Default lookup-table length
pub const GRADIENT_STEPS: usize = 100;

/// Maps the global color-mode flag to a palette
#[derive(Debug, Clone, Copy)]
pub struct PaletteResolver {
    pub base: &'static [Color],
    pub steps: usize,
}

impl PaletteResolver {
    pub const fn new(base: &'static [Color]) -> Self {
        Self {
            base,
            steps: GRADIENT_STEPS,
        }
    }

    pub const fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// `None` means monochrome: callers fall back to white/gray strokes
    pub fn resolve(&self, color_mode: bool) -> Option<Gradient> {
        color_mode.then(|| Gradient::build(self.base, self.steps))
    }
}

/// Per-instance palette cache, rebuilt only when the observed flag changes
#[derive(Debug, Clone)]
pub struct PaletteCache {
    resolver: PaletteResolver,
    last_flag: Option<bool>,
    gradient: Option<Gradient>,
    builds: usize,
}

impl PaletteCache {
    pub fn new(resolver: PaletteResolver) -> Self {
        Self {
            resolver,
            last_flag: None,
            gradient: None,
            builds: 0,
        }
    }

    /// Re-resolve if `color_mode` differs from the last observed value.
    /// Returns true when the palette changed.
    pub fn refresh(&mut self, color_mode: bool) -> bool {
        if self.last_flag == Some(color_mode) {
            return false;
        }
        self.gradient = self.resolver.resolve(color_mode);
        if self.gradient.is_some() {
            self.builds += 1;
        }
        self.last_flag = Some(color_mode);
        true
    }

    /// Forget the observed flag so the next refresh resolves again
    pub fn invalidate(&mut self) {
        self.last_flag = None;
    }

    pub fn gradient(&self) -> Option<&Gradient> {
        self.gradient.as_ref()
    }

    /// Number of gradient tables built so far
    pub fn build_count(&self) -> usize {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: [Color; 4] = [
        Color::hex(0xF08787),
        Color::hex(0xFFC7A7),
        Color::hex(0xFEE2AD),
        Color::hex(0xF8FAB4),
    ];

    fn between(value: u8, a: u8, b: u8) -> bool {
        value >= a.min(b) && value <= a.max(b)
    }

    #[test]
    fn test_hex_parsing() {
        let c = Color::hex(0x892CDC);
        assert_eq!((c.r, c.g, c.b, c.a), (0x89, 0x2C, 0xDC, 255));
    }

    #[test]
    fn test_monochrome_resolves_to_none() {
        let resolver = PaletteResolver::new(&BASE);
        assert!(resolver.resolve(false).is_none());
    }

    #[test]
    fn test_gradient_endpoints_match_base() {
        let gradient = PaletteResolver::new(&BASE).resolve(true).unwrap();
        assert_eq!(gradient.len(), GRADIENT_STEPS);
        assert_eq!(gradient.first(), BASE[0]);
        assert_eq!(gradient.last(), BASE[3]);
    }

    #[test]
    fn test_interior_entries_lie_between_bounding_colors() {
        let gradient = Gradient::build(&BASE, GRADIENT_STEPS);
        let segments = (BASE.len() - 1) as f32;
        for (i, color) in gradient.colors().iter().enumerate() {
            let position = i as f32 / (GRADIENT_STEPS - 1) as f32 * segments;
            let lo = BASE[position.floor() as usize];
            let hi = BASE[(position.ceil() as usize).min(BASE.len() - 1)];
            assert!(between(color.r, lo.r, hi.r), "entry {} red", i);
            assert!(between(color.g, lo.g, hi.g), "entry {} green", i);
            assert!(between(color.b, lo.b, hi.b), "entry {} blue", i);
        }
    }

    #[test]
    fn test_sample_index_is_clamped() {
        let gradient = Gradient::build(&BASE, 10);
        assert_eq!(gradient.sample(-3.0), gradient.first());
        assert_eq!(gradient.sample(0.0), gradient.first());
        assert_eq!(gradient.sample(1.0), gradient.last());
        assert_eq!(gradient.sample(7.5), gradient.last());
        assert_eq!(gradient.sample(f32::NAN), gradient.first());
        // floor(0.5 * 9) = 4
        assert_eq!(gradient.sample(0.5), gradient.colors()[4]);
    }

    #[test]
    fn test_single_color_palette() {
        let gradient = Gradient::build(&[Color::hex(0xB6F500)], 5);
        assert!(gradient.colors().iter().all(|c| *c == Color::hex(0xB6F500)));
    }

    #[test]
    fn test_cache_rebuilds_once_per_change() {
        let mut cache = PaletteCache::new(PaletteResolver::new(&BASE));
        assert!(cache.refresh(false));
        assert!(cache.gradient().is_none());
        assert!(!cache.refresh(false));

        assert!(cache.refresh(true));
        for _ in 0..10 {
            assert!(!cache.refresh(true));
        }
        assert_eq!(cache.build_count(), 1);
        assert!(cache.gradient().is_some());

        assert!(cache.refresh(false));
        assert!(cache.gradient().is_none());
        assert_eq!(cache.build_count(), 1);
    }
}
