use ratatui::style::Color;
use term_color_support::ColorSupport;

/// Terminal color capability, probed once at startup.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    truecolor: bool,
    indexed: bool,
}

impl Palette {
    pub fn detect() -> Self {
        let support = ColorSupport::stdout();
        Palette {
            truecolor: support.has_16m,
            indexed: support.has_256,
        }
    }

    /// Pick the closest rendition of an RGB color the terminal can show,
    /// falling back to the ANSI variant on 16-color terminals.
    pub fn pick(self, rgb: (u8, u8, u8), index256: u8, ansi: Color) -> Color {
        if self.truecolor {
            Color::Rgb(rgb.0, rgb.1, rgb.2)
        } else if self.indexed {
            Color::Indexed(index256)
        } else {
            ansi
        }
    }

    /// Digit color for an adjacency count of 1..=8
    pub fn number(self, n: u8) -> Color {
        match n {
            1 => self.pick((0, 0, 255), 21, Color::LightBlue),
            2 => self.pick((0, 128, 0), 28, Color::Green),
            3 => self.pick((255, 0, 0), 196, Color::LightRed),
            4 => self.pick((128, 0, 128), 90, Color::Magenta),
            5 => self.pick((128, 0, 0), 88, Color::Red),
            6 => self.pick((64, 224, 208), 80, Color::Cyan),
            7 => self.pick((0, 0, 0), 16, Color::Black),
            _ => self.pick((128, 128, 128), 244, Color::DarkGray),
        }
    }

    pub fn board_bg(self) -> Color {
        self.pick((192, 192, 192), 250, Color::Gray)
    }

    pub fn hidden(self) -> Color {
        self.pick((118, 118, 118), 243, Color::DarkGray)
    }

    pub fn cursor_bg(self) -> Color {
        self.pick((59, 120, 255), 63, Color::LightBlue)
    }

    pub fn flag(self) -> Color {
        self.pick((197, 15, 31), 160, Color::Red)
    }

    pub fn mine(self) -> Color {
        self.pick((12, 12, 12), 232, Color::Black)
    }

    /// Background behind exposed mines after a loss
    pub fn exploded_bg(self) -> Color {
        self.pick((255, 0, 0), 196, Color::Red)
    }

    /// Background behind flags that sat on safe cells
    pub fn wrong_flag_bg(self) -> Color {
        self.pick((255, 165, 0), 214, Color::Yellow)
    }

    pub fn menu_key(self) -> Color {
        self.pick((193, 156, 0), 178, Color::Yellow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrades_with_terminal_support() {
        let full = Palette { truecolor: true, indexed: true };
        let mid = Palette { truecolor: false, indexed: true };
        let basic = Palette { truecolor: false, indexed: false };
        assert_eq!(full.number(2), Color::Rgb(0, 128, 0));
        assert_eq!(mid.number(2), Color::Indexed(28));
        assert_eq!(basic.number(2), Color::Green);
    }
}
