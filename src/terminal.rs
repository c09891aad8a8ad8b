//! Plain-text rendering of a casting, used by the CLI.

use std::time::Duration;

use crate::casting::{table, AckSignal, Round, RoundPresenter};
use crate::models::{CoinToss, Line, ResolvedHexagram};

const YANG: &str = "━━━━━━━━━";
const YIN: &str = "━━━   ━━━";
const SEPARATOR: &str = "  ·  ·  ·";

/// `○` marks a moving yang line, `✕` a moving yin line.
fn change_marker(line: &Line) -> &'static str {
    match (line.change, line.yang) {
        (false, _) => "",
        (true, true) => "○",
        (true, false) => "✕",
    }
}

fn face(heads: bool) -> char {
    if heads {
        '正'
    } else {
        '反'
    }
}

pub fn render_toss(toss: CoinToss) -> String {
    toss.iter()
        .map(|&h| face(h).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One line with its positional label, e.g. `初九 ━━━━━━━━━ ○`.
pub fn render_line(line: &Line, index: usize) -> String {
    let body = if line.yang { YANG } else { YIN };
    let label = table::line_label(index, line.yang);
    format!("{} {} {}", label, body, change_marker(line))
        .trim_end()
        .to_string()
}

/// Whole hexagram, top line first as it is traditionally drawn.
///
/// ```text
/// 上九 ━━━━━━━━━
/// 九五 ━━━━━━━━━
/// 九四 ━━━━━━━━━
///   ·  ·  ·
/// 九三 ━━━━━━━━━
/// 九二 ━━━━━━━━━
/// 初九 ━━━━━━━━━ ○
/// ```
pub fn render_hexagram(lines: &[Line]) -> String {
    let mut output = String::new();
    for (index, line) in lines.iter().enumerate().rev() {
        // Between the trigrams, above the third line.
        if line.separate {
            output.push_str(SEPARATOR);
            output.push('\n');
        }
        output.push_str(&render_line(line, index));
        output.push('\n');
    }
    output
}

/// Prints each round and acknowledges it after a fixed "flip" duration.
#[derive(Debug, Clone)]
pub struct TerminalPresenter {
    flip: Duration,
}

impl TerminalPresenter {
    pub fn new(flip: Duration) -> Self {
        Self { flip }
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new(Duration::from_millis(900))
    }
}

impl RoundPresenter for TerminalPresenter {
    fn begin_transition(&self, round: &Round, done: AckSignal) {
        println!(
            "第 {} 爻 摇卦中... {} → {}",
            round.number,
            render_toss(round.previous),
            render_toss(round.toss)
        );
        let flip = self.flip;
        tokio::spawn(async move {
            tokio::time::sleep(flip).await;
            done.signal();
        });
    }

    fn line_appended(&self, line: &Line, index: usize) {
        println!("  {}", render_line(line, index));
    }

    fn completed(&self, hexagram: &ResolvedHexagram) {
        println!("卦象完成: {}", hexagram.full_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_moving_lines_with_markers() {
        assert_eq!(render_line(&Line::new(true, true), 0), "初九 ━━━━━━━━━ ○");
        assert_eq!(render_line(&Line::new(false, true), 3), "六四 ━━━   ━━━ ✕");
        assert_eq!(render_line(&Line::new(false, false), 5), "上六 ━━━   ━━━");
    }

    #[test]
    fn hexagram_is_drawn_top_down_with_separator() {
        let lines: Vec<Line> = (0..6)
            .map(|i| Line::from_toss([true, true, i == 0], i))
            .collect();
        let rendered = render_hexagram(&lines);
        let rows: Vec<&str> = rendered.lines().collect();

        assert_eq!(rows.len(), 7);
        assert!(rows[0].starts_with("上九"));
        assert_eq!(rows[3], SEPARATOR);
        assert_eq!(rows[6], "初九 ━━━━━━━━━ ○");
    }

    #[test]
    fn renders_coin_faces() {
        assert_eq!(render_toss([true, false, true]), "正 反 正");
    }
}
