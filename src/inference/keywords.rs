/// Tokens that push a text towards `POSITIVE`. Matched as lowercase substrings.
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "good", "great", "love", "excellent", "amazing", "happy", "best", "cool", //
    "好", "棒", "赞", "喜欢", "开心", "出色", "爱", "给力", "支持", "推荐", "满意", "优",
];

/// Tokens that push a text towards `NEGATIVE`. Matched as lowercase substrings.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "bad", "terrible", "hate", "awful", "sad", "worst", "poor", "slow", //
    "坏", "烂", "讨厌", "难过", "差", "糟糕", "失望", "生气", "不行", "垃圾", "恶心", "丑",
];

/// Net keyword count of `text`: +1 for every positive keyword it contains, -1
/// for every negative one.
///
/// Matching is case-insensitive and has no word boundaries, so `"badminton"`
/// counts as negative. Each keyword counts once however often it occurs.
pub fn keyword_balance(text: &str) -> i32 {
    let lower = text.to_lowercase();
    let hits = |keywords: &[&str]| keywords.iter().filter(|k| lower.contains(**k)).count() as i32;

    hits(POSITIVE_KEYWORDS) - hits(NEGATIVE_KEYWORDS)
}
