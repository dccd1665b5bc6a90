// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::config::PaletteConfig;

/// Colour source for per-point series. The base palette is used first, then
/// hues are generated by stepping around the wheel from the palette's end.
#[derive(Debug, Clone)]
pub struct Palette<'a> {
    config: &'a PaletteConfig,
}

impl<'a> Palette<'a> {
    pub fn new(config: &'a PaletteConfig) -> Self {
        Self { config }
    }

    pub fn colors(&self, count: usize) -> Vec<String> {
        let base = &self.config.base;
        let mut colors: Vec<String> = base.iter().take(count).cloned().collect();
        colors.extend((base.len()..count).map(|i| self.generated(i)));
        colors
    }

    fn generated(&self, index: usize) -> String {
        let hue = (index as f64 * self.config.hue_step) % 360.0;
        format!(
            "hsl({hue}, {}%, {}%)",
            self.config.saturation, self.config.lightness
        )
    }
}

/// Exactly `count` colours from the default palette.
pub fn generate_colors(count: usize) -> Vec<String> {
    let config = PaletteConfig::default();
    Palette::new(&config).colors(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_returns_exact_count() {
        for count in [0, 1, 5, 12, 13, 40, 250] {
            assert_eq!(generate_colors(count).len(), count);
        }
    }

    #[test]
    fn test_base_palette_has_no_repeats() {
        let colors = generate_colors(12);
        let unique: HashSet<_> = colors.iter().collect();
        assert_eq!(unique.len(), 12);
        assert_eq!(colors[0], "#3B82F6");
        assert_eq!(colors[11], "#06B6D4");
    }

    #[test]
    fn test_golden_angle_extension() {
        let colors = generate_colors(15);
        assert_eq!(colors[..12], generate_colors(12)[..]);
        for (offset, color) in colors[12..].iter().enumerate() {
            let hue = ((12 + offset) as f64 * 137.508) % 360.0;
            assert_eq!(color, &format!("hsl({hue}, 70%, 50%)"));
        }
        assert!(colors[12].starts_with("hsl(210.09"));
    }

    #[test]
    fn test_generated_hues_do_not_repeat() {
        let colors = generate_colors(200);
        let unique: HashSet<_> = colors.iter().collect();
        assert_eq!(unique.len(), 200);
    }
}
