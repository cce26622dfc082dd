// Multi-language support module
// Localized UI strings for English and Chinese

#[derive(Clone, Debug)]
pub struct Assets {
    // Menu items
    pub menu_help: &'static str,
    pub menu_new: &'static str,
    pub menu_exit: &'static str,

    // Help modal
    pub help_title: &'static str,
    pub help_controls: &'static str,
    pub help_move: &'static str,
    pub help_reveal: &'static str,
    pub help_flag: &'static str,
    pub help_chord: &'static str,

    // Win/Loss modals
    pub win_title: &'static str,
    pub win_message: &'static str,
    pub time_fmt: &'static str, // "Time: {} seconds"
    pub loss_title: &'static str,
    pub loss_message: &'static str,
    pub loss_better_luck: &'static str,
    pub any_key_new: &'static str,

    // Status bar
    pub status_mines_fmt: &'static str, // " Mines: {}   Time: {} seconds "

    // Board title
    pub board_title_fmt: &'static str, // "{}x{}, {} mines"

    // Terminal size messages
    pub tsmsg_line1: &'static str,
    pub tsmsg_line2: &'static str, // "Minimum size required: {} x {}"
    pub tsmsg_title: &'static str,
}

/// Returns English language assets
pub fn english_assets() -> Assets {
    Assets {
        menu_help: "Help",
        menu_new: "New",
        menu_exit: "Exit",

        help_title: "Help",
        help_controls: " Controls:",
        help_move: "  Mouse | Arrows    - move cursor",
        help_reveal: "  L-Click | Space   - reveal",
        help_flag: "  R-Click | F       - toggle flag",
        help_chord: "  M-Click | Enter   - chord (open neighbors)",

        win_title: "Success",
        win_message: "Mines Cleared, You Win!",
        time_fmt: "Time: {} seconds",
        loss_title: "Failure",
        loss_message: "Mine Exploded, You Lose!",
        loss_better_luck: "Better luck next time.",
        any_key_new: "Press any key for a new game",

        status_mines_fmt: " Mines: {}   Time: {} seconds ",

        board_title_fmt: "{}x{}, {} mines",

        tsmsg_line1: "Terminal layout too small",
        tsmsg_line2: "Minimum size required: {} x {}",
        tsmsg_title: "Resize needed",
    }
}

/// Returns Chinese language assets
pub fn chinese_assets() -> Assets {
    Assets {
        menu_help: "帮助",
        menu_new: "新游戏",
        menu_exit: "退出",

        help_title: "帮助",
        help_controls: " 操作说明：",
        help_move: "  鼠标 | 方向键     - 移动光标",
        help_reveal: "  左键 | 空格       - 翻开",
        help_flag: "  右键 | F          - 标记/取消",
        help_chord: "  中键 | 回车       - 组合排雷（开邻近格子）",

        win_title: "恭喜",
        win_message: "地雷已清除，你赢了！",
        time_fmt: "用时：{} 秒",
        loss_title: "游戏结束",
        loss_message: "很遗憾，你踩到地雷了！",
        loss_better_luck: "祝下次好运。",
        any_key_new: "按任意键开始新游戏",

        status_mines_fmt: " 地雷：{}   时间：{} 秒 ",

        board_title_fmt: "{}x{}，{} 个雷",

        tsmsg_line1: "终端屏幕布局过小",
        tsmsg_line2: "最小需要尺寸：{} x {}",
        tsmsg_title: "需要调整大小",
    }
}

/// Fill `{}` placeholders in order
pub fn fill(fmt: &str, args: &[&dyn std::fmt::Display]) -> String {
    let mut out = String::with_capacity(fmt.len() + 8);
    let mut args = args.iter();
    let mut rest = fmt;
    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => out.push_str(&arg.to_string()),
            None => out.push_str("{}"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

/// Main language manager struct
/// Holds the current language code and active string assets
pub struct Lang {
    pub current_lang: String,
    pub assets: Assets,
}

impl Lang {
    /// Creates a new Lang instance from a language code
    /// Normalizes input (e.g., "zh-CN" → "zh") and defaults to English for unsupported languages
    pub fn new(lang_code: &str) -> Self {
        let code = if lang_code.to_lowercase().starts_with("zh") {
            "zh"
        } else {
            "en"
        };

        Lang {
            current_lang: code.to_string(),
            assets: if code == "zh" {
                chinese_assets()
            } else {
                english_assets()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_language_codes() {
        assert_eq!(Lang::new("zh-CN").current_lang, "zh");
        assert_eq!(Lang::new("ZH_tw").current_lang, "zh");
        assert_eq!(Lang::new("de-DE").current_lang, "en");
        assert_eq!(Lang::new("zh").assets.menu_new, "新游戏");
    }

    #[test]
    fn fills_placeholders_in_order() {
        let en = english_assets();
        assert_eq!(fill(en.status_mines_fmt, &[&-2, &17]), " Mines: -2   Time: 17 seconds ");
        assert_eq!(fill(en.board_title_fmt, &[&16, &16, &40]), "16x16, 40 mines");
        assert_eq!(fill("{} and {}", &[&1]), "1 and {}");
    }
}
