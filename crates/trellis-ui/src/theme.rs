//! Theme values broadcast to renderers.
//!
//! A [`Theme`] is an opaque bundle of visual attributes as far as the renderer
//! lifecycle is concerned: renderers read colors and metrics out of it in
//! [`Renderer::apply_theme`](crate::Renderer::apply_theme) and the core never
//! inspects it.
//!
//! # Example
//!
//! ```
//! use trellis_ui::{Color, Theme};
//!
//! let custom = Theme::builder()
//!     .primary(Color::from_rgb_u8(60, 120, 200))
//!     .text_size(16.0)
//!     .build();
//! assert_eq!(custom.typography.text_size, 16.0);
//! ```

use crate::color::Color;

/// Color role for semantic color assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    /// Primary brand color
    Primary,
    /// Window background color
    Background,
    /// Surface color (cards, panels, controls)
    Surface,
    /// Primary text color
    TextPrimary,
    /// Disabled text color
    TextDisabled,
    /// Border color
    Border,
}

/// Color palette for a theme.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    /// Primary brand color, used for checked/active state
    pub primary: Color,
    /// Background color
    pub background: Color,
    /// Surface color (cards, panels, controls)
    pub surface: Color,
    /// Primary text color
    pub text_primary: Color,
    /// Disabled text color
    pub text_disabled: Color,
    /// Border color
    pub border: Color,
}

impl ColorPalette {
    /// Get a color by its role.
    pub fn get(&self, role: ColorRole) -> Color {
        match role {
            ColorRole::Primary => self.primary,
            ColorRole::Background => self.background,
            ColorRole::Surface => self.surface,
            ColorRole::TextPrimary => self.text_primary,
            ColorRole::TextDisabled => self.text_disabled,
            ColorRole::Border => self.border,
        }
    }

    /// Create a dark color palette.
    pub fn dark() -> Self {
        Self {
            primary: Color::from_rgb_u8(60, 120, 200),
            background: Color::from_rgb_u8(18, 18, 18),
            surface: Color::DARK_GRAY,
            text_primary: Color::WHITE,
            text_disabled: Color::from_rgb_u8(100, 100, 100),
            border: Color::from_rgb_u8(60, 60, 60),
        }
    }

    /// Create a light color palette.
    pub fn light() -> Self {
        Self {
            primary: Color::from_rgb_u8(50, 100, 200),
            background: Color::from_rgb_u8(250, 250, 250),
            surface: Color::WHITE,
            text_primary: Color::BLACK,
            text_disabled: Color::from_rgb_u8(180, 180, 180),
            border: Color::from_rgb_u8(200, 200, 200),
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::light()
    }
}

/// Typography settings for a theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Typography {
    /// Default font family (empty means system default)
    pub font_family: String,
    /// Body text size
    pub text_size: f32,
    /// Line height multiplier
    pub line_height: f32,
}

impl Typography {
    pub fn new() -> Self {
        Self {
            font_family: String::new(),
            text_size: 14.0,
            line_height: 1.5,
        }
    }
}

impl Default for Typography {
    fn default() -> Self {
        Self::new()
    }
}

/// Spacing scale for consistent layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    /// Padding inside a control (4px)
    pub inner_padding: f32,
    /// Padding between a container and its children (8px)
    pub padding: f32,
}

impl Spacing {
    pub fn new() -> Self {
        Self {
            inner_padding: 4.0,
            padding: 8.0,
        }
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete theme definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Human readable name, used in logs
    pub name: String,
    pub colors: ColorPalette,
    pub typography: Typography,
    pub spacing: Spacing,
}

impl Theme {
    /// Create a dark theme.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            colors: ColorPalette::dark(),
            typography: Typography::new(),
            spacing: Spacing::new(),
        }
    }

    /// Create a light theme.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            colors: ColorPalette::light(),
            typography: Typography::new(),
            spacing: Spacing::new(),
        }
    }

    /// Create a theme builder.
    pub fn builder() -> ThemeBuilder {
        ThemeBuilder::new()
    }

    /// Get a color by role.
    pub fn color(&self, role: ColorRole) -> Color {
        self.colors.get(role)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Builder for creating custom themes.
#[derive(Debug)]
pub struct ThemeBuilder {
    theme: Theme,
}

impl ThemeBuilder {
    /// Start from the default (light) theme.
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
        }
    }

    /// Start with a dark theme.
    pub fn dark() -> Self {
        Self {
            theme: Theme::dark(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.theme.name = name.into();
        self
    }

    pub fn primary(mut self, color: Color) -> Self {
        self.theme.colors.primary = color;
        self
    }

    pub fn surface(mut self, color: Color) -> Self {
        self.theme.colors.surface = color;
        self
    }

    pub fn text_color(mut self, color: Color) -> Self {
        self.theme.colors.text_primary = color;
        self
    }

    pub fn text_size(mut self, size: f32) -> Self {
        self.theme.typography.text_size = size;
        self
    }

    pub fn colors(mut self, colors: ColorPalette) -> Self {
        self.theme.colors = colors;
        self
    }

    pub fn spacing(mut self, spacing: Spacing) -> Self {
        self.theme.spacing = spacing;
        self
    }

    pub fn build(self) -> Theme {
        self.theme
    }
}

impl Default for ThemeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
