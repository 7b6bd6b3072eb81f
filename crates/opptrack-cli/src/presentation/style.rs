use is_terminal::IsTerminal;
use opptrack_types::format::Tone;
use opptrack_types::{Indicator, Status};
use owo_colors::OwoColorize;

/// Colour on a terminal, plain text otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn detect() -> Self {
        let enabled = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn tone(&self, text: &str, tone: Tone) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match tone {
            Tone::Green => text.green().to_string(),
            Tone::Blue => text.blue().to_string(),
            Tone::Yellow => text.yellow().to_string(),
            Tone::Cyan => text.cyan().to_string(),
            Tone::Red => text.red().to_string(),
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.enabled {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Status label padded to `width` before colouring
    pub fn status(&self, status: Status, width: usize) -> String {
        self.tone(&format!("{:<width$}", status.label()), status.tone())
    }

    /// `●` on a terminal, the initial otherwise
    pub fn indicator(&self, indicator: Indicator) -> String {
        if self.enabled {
            self.tone("●", indicator.tone())
        } else {
            indicator.as_str()[..1].to_ascii_uppercase()
        }
    }
}
