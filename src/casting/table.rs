//! Static trigram and hexagram tables.
//!
//! Trigram indices are binary weighted from the bottom line up (bottom 1,
//! middle 2, top 4, yang counts). That puts 坤 at 0 and 乾 at 7.

/// Hexagram names in King Wen order.
pub const HEXAGRAM_NAMES: [&str; 64] = [
    "乾", "坤", "屯", "蒙", "需", "讼", "师", "比",
    "小畜", "履", "泰", "否", "同人", "大有", "谦", "豫",
    "随", "蛊", "临", "观", "噬嗑", "贲", "剥", "复",
    "无妄", "大畜", "颐", "大过", "坎", "离", "咸", "恒",
    "遁", "大壮", "晋", "明夷", "家人", "睽", "蹇", "解",
    "损", "益", "夬", "姤", "萃", "升", "困", "井",
    "革", "鼎", "震", "艮", "渐", "归妹", "丰", "旅",
    "巽", "兑", "涣", "节", "中孚", "小过", "既济", "未济",
];

/// `HEXAGRAM_TABLE[upper][lower]` is the zero-based King Wen ordinal.
pub const HEXAGRAM_TABLE: [[u8; 8]; 8] = [
    [1, 23, 6, 18, 14, 35, 45, 10],
    [15, 50, 39, 53, 61, 54, 31, 33],
    [7, 2, 28, 59, 38, 62, 47, 4],
    [44, 16, 46, 57, 30, 48, 27, 42],
    [22, 26, 3, 40, 51, 21, 17, 25],
    [34, 20, 63, 37, 55, 29, 49, 13],
    [19, 41, 58, 60, 52, 36, 56, 8],
    [11, 24, 5, 9, 32, 12, 43, 0],
];

pub const TRIGRAM_NAMES: [&str; 8] = ["坤", "震", "坎", "兑", "艮", "离", "巽", "乾"];

/// Elemental image of each trigram.
pub const TRIGRAM_SYMBOLS: [&str; 8] = ["地", "雷", "水", "泽", "山", "火", "风", "天"];

/// Labels for moving yang lines, bottom to top.
pub const YANG_LINE_LABELS: [&str; 6] = ["初九", "九二", "九三", "九四", "九五", "上九"];

/// Labels for moving yin lines, bottom to top.
pub const YIN_LINE_LABELS: [&str; 6] = ["初六", "六二", "六三", "六四", "六五", "上六"];

/// Zero-based ordinal for a trigram pair. Panics on an index above 7.
pub fn ordinal(upper: u8, lower: u8) -> u8 {
    HEXAGRAM_TABLE[upper as usize][lower as usize]
}

/// Hexagram name for a 1-based sequence number.
pub fn name_for_sequence(sequence: u8) -> Option<&'static str> {
    match sequence {
        1..=64 => Some(HEXAGRAM_NAMES[sequence as usize - 1]),
        _ => None,
    }
}

/// Sequence number for a hexagram name.
pub fn sequence_for_name(name: &str) -> Option<u8> {
    HEXAGRAM_NAMES
        .iter()
        .position(|n| *n == name)
        .map(|i| i as u8 + 1)
}

/// Label of a line at `position` (0 = bottom).
pub fn line_label(position: usize, yang: bool) -> &'static str {
    if yang {
        YANG_LINE_LABELS[position]
    } else {
        YIN_LINE_LABELS[position]
    }
}
