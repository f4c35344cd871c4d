//! Theme definitions for timeline charts

/// Theme colors and styles
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Theme name
    pub name: String,
    /// Background color
    pub background: String,
    /// Header band fill (month and column labels)
    pub header_fill: String,
    /// Header text color
    pub header_text: String,
    /// Grid line color
    pub grid_color: String,
    /// Row header column fill
    pub row_header_fill: String,
    /// Row header text color
    pub row_header_text: String,
    /// Bar fill when the activity has no color of its own
    pub bar_fill: String,
    /// Bar label color
    pub bar_text: String,
    /// Mini activity fill when the activity has no color of its own
    pub mini_fill: String,
    /// Stripe band background
    pub stripe_fill: String,
    /// Stripe hatch line color
    pub stripe_line: String,
    /// Arrow head color for links without their own color
    pub link_color: String,
    /// Font family
    pub font_family: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    /// Default theme (light slate grid with emerald bars)
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            background: "#fff".to_string(),
            header_fill: "#f8fafc".to_string(),
            header_text: "#334155".to_string(),
            grid_color: "#e2e8f0".to_string(),
            row_header_fill: "#fff".to_string(),
            row_header_text: "#0f172a".to_string(),
            bar_fill: "rgba(52, 211, 153, 0.8)".to_string(),
            bar_text: "#064e3b".to_string(),
            mini_fill: "rgba(251, 191, 36, 0.8)".to_string(),
            stripe_fill: "rgba(226, 232, 240, 0.5)".to_string(),
            stripe_line: "rgba(148, 163, 184, 0.5)".to_string(),
            link_color: "rgba(100, 116, 139, 0.8)".to_string(),
            font_family: "sans-serif".to_string(),
        }
    }

    /// Muted slate theme
    pub fn slate() -> Self {
        Self {
            name: "slate".to_string(),
            background: "#f8fafc".to_string(),
            header_fill: "#e2e8f0".to_string(),
            header_text: "#1e293b".to_string(),
            grid_color: "#cbd5e1".to_string(),
            row_header_fill: "#f1f5f9".to_string(),
            row_header_text: "#1e293b".to_string(),
            bar_fill: "#64748b".to_string(),
            bar_text: "#fff".to_string(),
            mini_fill: "#0ea5e9".to_string(),
            stripe_fill: "rgba(203, 213, 225, 0.5)".to_string(),
            stripe_line: "rgba(100, 116, 139, 0.4)".to_string(),
            link_color: "#475569".to_string(),
            font_family: "sans-serif".to_string(),
        }
    }

    /// Dark theme
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: "#0f172a".to_string(),
            header_fill: "#1e293b".to_string(),
            header_text: "#e2e8f0".to_string(),
            grid_color: "#334155".to_string(),
            row_header_fill: "#111827".to_string(),
            row_header_text: "#f1f5f9".to_string(),
            bar_fill: "rgba(16, 185, 129, 0.8)".to_string(),
            bar_text: "#ecfdf5".to_string(),
            mini_fill: "rgba(245, 158, 11, 0.9)".to_string(),
            stripe_fill: "rgba(51, 65, 85, 0.5)".to_string(),
            stripe_line: "rgba(148, 163, 184, 0.3)".to_string(),
            link_color: "rgba(148, 163, 184, 0.9)".to_string(),
            font_family: "sans-serif".to_string(),
        }
    }

    /// Black on white, no translucency
    pub fn high_contrast() -> Self {
        Self {
            name: "high-contrast".to_string(),
            background: "#fff".to_string(),
            header_fill: "#fff".to_string(),
            header_text: "#000".to_string(),
            grid_color: "#000".to_string(),
            row_header_fill: "#fff".to_string(),
            row_header_text: "#000".to_string(),
            bar_fill: "#000".to_string(),
            bar_text: "#fff".to_string(),
            mini_fill: "#555".to_string(),
            stripe_fill: "#fff".to_string(),
            stripe_line: "#000".to_string(),
            link_color: "#000".to_string(),
            font_family: "sans-serif".to_string(),
        }
    }

    /// Get theme by name
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_theme()),
            "slate" | "gray" | "grey" => Some(Self::slate()),
            "dark" | "night" => Some(Self::dark()),
            "high-contrast" | "highcontrast" | "contrast" => Some(Self::high_contrast()),
            _ => None,
        }
    }

    /// List all available theme names
    pub fn available_themes() -> Vec<&'static str> {
        vec!["default", "slate", "dark", "high-contrast"]
    }
}
