//! 카탈로그 검색용 글로브 매칭
//!
//! `*` (0개 이상 임의 문자), `?` (임의 1문자). 대소문자 무시.

/// 검색어에 글로브 와일드카드가 있는지 확인
pub fn is_glob_pattern(s: &str) -> bool {
    s.contains(['*', '?'])
}

/// 글로브 패턴이 텍스트 전체와 일치하는지 확인
///
/// 마지막 `*` 위치로만 되돌아가는 반복 매칭이라 긴 이름에서도 지수 시간이 들지 않는다.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    let text: Vec<char> = text.to_lowercase().chars().collect();

    let (mut p, mut t) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                star = Some((p, t));
                p += 1;
            }
            Some('?') => {
                p += 1;
                t += 1;
            }
            Some(&c) if c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    star = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
