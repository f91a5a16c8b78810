// Natural sort - 숫자를 값으로 비교하는 이름 정렬
//
// "item2" < "item10" 처럼 이름 안의 숫자 구간은 정수 값으로,
// 나머지 구간은 대소문자를 구분하는 문자 비교로 정렬한다.

use std::cmp::Ordering;

/// 두 이름을 자연 순서로 비교
///
/// 양쪽이 동시에 ASCII 숫자 구간에 도달하면 구간 전체를 정수 값으로 비교하고,
/// 그 외에는 문자 단위(코드 포인트)로 비교한다. 숫자 구간의 길이 제한은 없다.
/// 값이 같은 숫자 구간("01"과 "1")은 같은 키로 취급한다.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut left, mut right) = (a, b);

    loop {
        let (l, r) = match (left.chars().next(), right.chars().next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => (l, r),
        };

        if l.is_ascii_digit() && r.is_ascii_digit() {
            let (left_digits, left_rest) = split_digit_run(left);
            let (right_digits, right_rest) = split_digit_run(right);
            match compare_digit_runs(left_digits, right_digits) {
                Ordering::Equal => {
                    left = left_rest;
                    right = right_rest;
                }
                ord => return ord,
            }
        } else if l != r {
            return l.cmp(&r);
        } else {
            left = &left[l.len_utf8()..];
            right = &right[r.len_utf8()..];
        }
    }
}

/// 키 함수로 얻은 이름 기준 안정 정렬
#[cfg(test)]
pub fn natural_sort_by_key<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| natural_cmp(key(a), key(b)));
}

/// 문자열 목록 자연 정렬
#[cfg(test)]
pub fn natural_sort<S: AsRef<str>>(items: &mut [S]) {
    natural_sort_by_key(items, |s| s.as_ref());
}

fn split_digit_run(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
