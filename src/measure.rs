use unicode_width::UnicodeWidthStr;

/// Fonts used on the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Table name in the box header (14px bold)
    Header,
    /// Column lines (10px)
    Column,
}

impl Font {
    pub fn css(&self) -> &'static str {
        match self {
            Font::Header => "bold 14px Arial, sans-serif",
            Font::Column => "10px Arial, sans-serif",
        }
    }
}

/// Approximate text metrics without a font rasterizer.
#[derive(Debug, Clone)]
pub struct TextMetrics {
    pub header_char_width: f64,
    pub column_char_width: f64,
    pub header_line_height: f64,
    pub column_line_height: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            header_char_width: 9.5,
            column_char_width: 6.5,
            header_line_height: 18.0,
            column_line_height: 14.0,
        }
    }
}

impl TextMetrics {
    pub fn char_width(&self, font: Font) -> f64 {
        match font {
            Font::Header => self.header_char_width,
            Font::Column => self.column_char_width,
        }
    }

    pub fn line_height(&self, font: Font) -> f64 {
        match font {
            Font::Header => self.header_line_height,
            Font::Column => self.column_line_height,
        }
    }

    pub fn text_width(&self, text: &str, font: Font) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width(font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        let m = TextMetrics::default();
        assert_eq!(m.text_width("Guests", Font::Column), 6.0 * 6.5);
        assert_eq!(m.text_width("Guests", Font::Header), 6.0 * 9.5);
    }

    #[test]
    fn test_unicode_width() {
        let m = TextMetrics::default();
        // full-width characters count double
        assert_eq!(m.text_width("予約", Font::Column), 4.0 * 6.5);
    }

    #[test]
    fn test_empty_text() {
        let m = TextMetrics::default();
        assert_eq!(m.text_width("", Font::Header), 0.0);
    }
}
