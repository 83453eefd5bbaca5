use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    /// Window area around the slides.
    pub backdrop: Color32,
    pub slide_background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub code_background: Color32,
    pub code_foreground: Color32,
    pub title_size: f32,
    pub heading_size: f32,
    pub subheading_size: f32,
    pub body_size: f32,
    pub code_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            backdrop: Color32::from_rgb(0x12, 0x12, 0x12),
            slide_background: Color32::from_rgb(0x1E, 0x1E, 0x1E),
            foreground: Color32::from_rgb(0xC8, 0xC8, 0xC8),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            code_background: Color32::from_rgb(0x2D, 0x2D, 0x2D),
            code_foreground: Color32::from_rgb(0xD4, 0xD4, 0xD4),
            title_size: 56.0,
            heading_size: 44.0,
            subheading_size: 36.0,
            body_size: 26.0,
            code_size: 20.0,
        }
    }

    pub fn light() -> Self {
        Self {
            backdrop: Color32::from_rgb(0xD7, 0xD7, 0xD7),
            slide_background: Color32::WHITE,
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            code_background: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            code_foreground: Color32::from_rgb(0x33, 0x33, 0x33),
            title_size: 56.0,
            heading_size: 44.0,
            subheading_size: 36.0,
            body_size: 26.0,
            code_size: 20.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }

    /// Font size for a section heading of the given level.
    pub fn section_heading_size(&self, level: u8) -> f32 {
        match level {
            2 => self.heading_size,
            _ => self.subheading_size,
        }
    }
}
