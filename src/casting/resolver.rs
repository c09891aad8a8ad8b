//! Six lines in, one named hexagram out.

use crate::models::{Line, ResolvedHexagram};

use super::table::{self, HEXAGRAM_NAMES, TRIGRAM_NAMES, TRIGRAM_SYMBOLS};

/// Lines in a complete hexagram.
pub const HEXAGRAM_LINES: usize = 6;

const LINK_BASE: &str = "https://zhouyi.sunls.de";

/// Binary-weighted trigram index of three lines, bottom line weight 1.
pub fn trigram_index(lines: &[Line]) -> u8 {
    lines
        .iter()
        .take(3)
        .enumerate()
        .filter(|(_, line)| line.yang)
        .map(|(i, _)| 1u8 << i)
        .sum()
}

/// Resolve six lines, bottom first.
///
/// # Panics
///
/// Panics unless exactly six lines are given. The round sequencer never
/// hands over anything else.
pub fn resolve(lines: &[Line]) -> ResolvedHexagram {
    assert_eq!(
        lines.len(),
        HEXAGRAM_LINES,
        "a hexagram has exactly six lines"
    );

    let lower = trigram_index(&lines[..3]);
    let upper = trigram_index(&lines[3..]);
    let sequence = table::ordinal(upper, lower) + 1;
    let name = HEXAGRAM_NAMES[sequence as usize - 1];

    let changing_line_labels: Vec<String> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.change)
        .map(|(i, line)| table::line_label(i, line.yang).to_string())
        .collect();

    let (upper_name, lower_name) = (TRIGRAM_NAMES[upper as usize], TRIGRAM_NAMES[lower as usize]);
    let (upper_symbol, lower_symbol) = (
        TRIGRAM_SYMBOLS[upper as usize],
        TRIGRAM_SYMBOLS[lower as usize],
    );

    let full_name = if upper == lower {
        format!("{}为{}", upper_name, upper_symbol)
    } else {
        format!("{}{}{}", upper_symbol, lower_symbol, name)
    };

    let change_summary = if changing_line_labels.is_empty() {
        "无变爻".to_string()
    } else {
        format!("变爻: {}", changing_line_labels.join("、"))
    };

    let external_link = format!("{}/{:02}.{}/", LINK_BASE, sequence, full_name);

    ResolvedHexagram {
        name: name.to_string(),
        sequence,
        full_name,
        position_description: format!("{}上{}下", upper_name, lower_name),
        changing_line_labels,
        change_summary,
        external_link,
        upper,
        lower,
    }
}

/// The transformed hexagram (变卦): every moving line flips.
pub fn changed_lines(lines: &[Line]) -> Vec<Line> {
    lines.iter().map(|line| line.settled()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(pairs: [(bool, bool); 6]) -> Vec<Line> {
        pairs.iter().map(|&(yang, change)| Line::new(yang, change)).collect()
    }

    #[test]
    fn six_yang_lines_are_qian() {
        let hex = resolve(&lines([(true, false); 6]));
        assert_eq!(hex.sequence, 1);
        assert_eq!(hex.name, "乾");
        assert_eq!(hex.full_name, "乾为天");
        assert_eq!(hex.position_description, "乾上乾下");
        assert!(hex.changing_line_labels.is_empty());
        assert_eq!(hex.change_summary, "无变爻");
        assert_eq!(hex.external_link, "https://zhouyi.sunls.de/01.乾为天/");
    }

    #[test]
    fn six_yin_lines_are_kun() {
        let hex = resolve(&lines([(false, false); 6]));
        assert_eq!((hex.lower, hex.upper), (0, 0));
        assert_eq!(hex.sequence, 2);
        assert_eq!(hex.name, "坤");
        assert_eq!(hex.full_name, "坤为地");
    }

    #[test]
    fn water_over_thunder_is_zhun() {
        // 震 below (yang, yin, yin), 坎 above (yin, yang, yin)
        let hex = resolve(&lines([
            (true, false),
            (false, false),
            (false, false),
            (false, false),
            (true, false),
            (false, false),
        ]));
        assert_eq!(hex.sequence, 3);
        assert_eq!(hex.full_name, "水雷屯");
        assert_eq!(hex.position_description, "坎上震下");
        assert_eq!(hex.external_link, "https://zhouyi.sunls.de/03.水雷屯/");
    }

    #[test]
    fn changing_labels_follow_polarity_and_order() {
        let hex = resolve(&lines([
            (true, true),
            (false, false),
            (false, true),
            (true, false),
            (false, false),
            (true, true),
        ]));
        assert_eq!(hex.changing_line_labels, vec!["初九", "六三", "上九"]);
        assert_eq!(hex.change_summary, "变爻: 初九、六三、上九");
    }

    #[test]
    fn resolution_is_deterministic() {
        let input = lines([
            (true, true),
            (false, false),
            (true, false),
            (false, true),
            (true, false),
            (false, false),
        ]);
        let before = input.clone();
        assert_eq!(resolve(&input), resolve(&input));
        assert_eq!(input, before);
    }

    #[test]
    fn every_combination_resolves_to_a_known_name() {
        for bits in 0u8..64 {
            let input: Vec<Line> = (0..6)
                .map(|i| Line::new(bits & (1 << i) != 0, i % 2 == 0))
                .collect();
            let hex = resolve(&input);
            assert!((1..=64).contains(&hex.sequence));
            assert!(HEXAGRAM_NAMES.contains(&hex.name.as_str()));
            assert_eq!(hex.changing_line_labels.len(), 3);
            if hex.upper == hex.lower {
                assert!(hex.full_name.contains('为'));
            } else {
                assert!(hex.full_name.ends_with(&hex.name));
            }
        }
    }

    #[test]
    #[should_panic(expected = "six lines")]
    fn five_lines_is_a_contract_violation() {
        resolve(&[Line::new(true, false); 5]);
    }

    #[test]
    fn changed_hexagram_flips_only_moving_lines() {
        let input = lines([
            (true, true),
            (true, false),
            (true, false),
            (true, false),
            (true, false),
            (true, false),
        ]);
        let changed = changed_lines(&input);
        assert!(!changed[0].yang);
        assert!(changed[1..].iter().all(|l| l.yang));
        assert!(changed.iter().all(|l| !l.change));
        // 巽 below 乾: 姤
        assert_eq!(resolve(&changed).name, "姤");
    }
}
