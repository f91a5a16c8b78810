//! 표시 너비 기준 문자열 자르기

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// 최대 너비를 넘으면 끝을 "..."로 자른다
pub fn truncate_end(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= ELLIPSIS.len() {
        return prefix_by_width(text, max_width);
    }
    format!("{}{}", prefix_by_width(text, max_width - ELLIPSIS.len()), ELLIPSIS)
}

/// 최대 너비를 넘으면 가운데를 "..."로 생략 (경로 표시용)
pub fn truncate_middle(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width < 5 {
        return prefix_by_width(text, max_width);
    }
    let side = (max_width - ELLIPSIS.len()) / 2;
    format!(
        "{}{}{}",
        prefix_by_width(text, side),
        ELLIPSIS,
        suffix_by_width(text, side)
    )
}

/// 너비에 맞게 자르고 남는 칸은 공백으로 채운다
pub fn fit_width(text: &str, width: usize) -> String {
    let mut out = truncate_end(text, width);
    let used = out.width();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

fn prefix_by_width(text: &str, max_width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= max_width
        })
        .collect()
}

fn suffix_by_width(text: &str, max_width: usize) -> String {
    let mut used = 0;
    let mut tail: Vec<char> = text
        .chars()
        .rev()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= max_width
        })
        .collect();
    tail.reverse();
    tail.into_iter().collect()
}
