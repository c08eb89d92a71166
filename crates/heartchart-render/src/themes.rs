use tracing::warn;

/// Colour set for the generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: &'static str,
    pub text: &'static str,
    /// Summary lines and axis labels.
    pub muted: &'static str,
    pub axis: &'static str,
    pub grid: &'static str,
    /// The heart-rate line itself.
    pub line: &'static str,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: "#ffffff",
            text: "#1f2328",
            muted: "#656d76",
            axis: "#8c959f",
            grid: "#eaeef2",
            line: "#cf222e",
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#0d1117",
            text: "#e6edf3",
            muted: "#8d96a0",
            axis: "#6e7681",
            grid: "#21262d",
            line: "#ff7b72",
        }
    }

    /// Look a theme up by name, falling back to light for unknown names.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            other => {
                warn!("Unknown theme \"{}\", using light", other);
                Self::light()
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
