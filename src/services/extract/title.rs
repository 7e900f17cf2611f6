//! Heuristic check for "this OCR line is a mission title".

const TITLE_KEYWORDS: &[&str] = &[
    "開発",
    "任務",
    "拡充",
    "配備",
    "編成",
    "計画",
    "演習",
    "遠征",
    "出撃",
    "改装",
    "近代化改修",
    "挑戦",
    "兵装",
    "兵站",
    "哨戒",
    "作戦",
];

/// Verbs that usually mark an instruction line rather than a quest name
const ACTION_VERBS: &[&str] = &["廃棄せよ", "準備", "開発せよ"];

const ALWAYS_ACCEPTED: &[&str] = &["敵艦隊を撃破せよ!", "敵艦隊を撃破せよ"];

const MAX_TITLE_CHARS: usize = 70;

fn normalize_brackets(line: &str) -> String {
    line.chars()
        .map(|c| match c {
            '[' | '【' => '「',
            ']' | '】' => '」',
            other => other,
        })
        .collect()
}

fn starts_with_keyword(text: &str) -> bool {
    TITLE_KEYWORDS.iter().any(|kw| text.starts_with(kw))
}

fn ends_with_keyword(text: &str) -> bool {
    TITLE_KEYWORDS.iter().any(|kw| text.ends_with(kw))
}

fn contains_keyword(text: &str) -> bool {
    TITLE_KEYWORDS.iter().any(|kw| text.contains(kw))
}

fn is_bracketed_title(normalized: &str) -> bool {
    let Some(inner) = normalized.strip_prefix('「') else {
        return false;
    };
    let Some(close) = inner.find('」') else {
        return false;
    };

    let subject = &inner[..close];
    let suffix = inner[close + '」'.len_utf8()..].trim();

    if starts_with_keyword(suffix) {
        return true;
    }
    if !suffix.is_empty() {
        return false;
    }
    if ends_with_keyword(subject) {
        return true;
    }

    let subject_len = subject.chars().count();
    if subject_len > 2 && subject_len < 35 {
        let has_action_verb = ACTION_VERBS.iter().any(|verb| subject.contains(verb));
        return !has_action_verb || contains_keyword(subject);
    }
    false
}

fn is_unbracketed_title(line: &str) -> bool {
    if !ends_with_keyword(line) {
        return false;
    }
    if line.matches('、').count() > 2 || line.matches('「').count() > 1 {
        return false;
    }
    if line.contains(" x") || line.to_uppercase().contains("NO.") {
        return false;
    }
    // "xxx 準備" style instruction fragments
    !(line.split_whitespace().count() == 2 && line.ends_with("準備"))
}

/// Decide whether one OCR line looks like a mission title
pub fn is_plausible_title(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.chars().count() > MAX_TITLE_CHARS {
        return false;
    }

    let normalized = normalize_brackets(line);
    if normalized.starts_with('「') && normalized.contains('」') {
        if is_bracketed_title(&normalized) {
            return true;
        }
    } else if !line.starts_with(['「', '【', '[']) && is_unbracketed_title(line) {
        return true;
    }

    line.starts_with("精鋭「") || ALWAYS_ACCEPTED.contains(&line)
}

/// First plausible title line of the OCR output, else the whole trimmed text
pub fn pick_title(ocr_text: &str) -> String {
    ocr_text
        .lines()
        .map(str::trim)
        .find(|line| is_plausible_title(line))
        .unwrap_or_else(|| ocr_text.trim())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed_subject_ending_with_keyword() {
        assert!(is_plausible_title("「艦隊拡充計画」"));
        assert!(is_plausible_title("【精鋭水雷戦隊編成】"));
    }

    #[test]
    fn test_bracketed_suffix_keyword() {
        assert!(is_plausible_title("「〇〇作戦」改装を実施せよ"));
        assert!(is_plausible_title("[新編艦隊]出撃せよ"));
    }

    #[test]
    fn test_bracketed_suffix_without_keyword() {
        assert!(!is_plausible_title("「〇〇」を撃破せよ"));
    }

    #[test]
    fn test_bracketed_plain_subject() {
        assert!(is_plausible_title("「海上護衛強化月間」"));
        // Too short
        assert!(!is_plausible_title("「ab」"));
        // Action verb without keyword
        assert!(!is_plausible_title("「装備を廃棄せよ」"));
        // Action verb but a keyword too
        assert!(is_plausible_title("「演習の準備をせよ」"));
    }

    #[test]
    fn test_unbracketed_title() {
        assert!(is_plausible_title("新たな艦載機を開発"));
        assert!(is_plausible_title("  精強な艦隊を編成  "));
        assert!(!is_plausible_title("燃料 x100の報酬"));
        assert!(!is_plausible_title("燃料 x3 補給任務"));
        assert!(!is_plausible_title("No.123 輸送任務"));
        assert!(!is_plausible_title("一、二、三、四を編成"));
        assert!(!is_plausible_title("資源を確認"));
    }

    #[test]
    fn test_unbracketed_two_word_preparation() {
        assert!(!is_plausible_title("次期作戦 準備"));
    }

    #[test]
    fn test_always_accepted_lines() {
        assert!(is_plausible_title("敵艦隊を撃破せよ!"));
        assert!(is_plausible_title("敵艦隊を撃破せよ"));
        assert!(is_plausible_title("精鋭「第八駆逐隊」出撃せよ！"));
    }

    #[test]
    fn test_rejects_empty_and_long() {
        assert!(!is_plausible_title(""));
        assert!(!is_plausible_title("   "));
        let long = "任".repeat(71);
        assert!(!is_plausible_title(&long));
        let limit = format!("{}任務", "あ".repeat(68));
        assert!(is_plausible_title(&limit));
    }

    #[test]
    fn test_keyword_match_is_case_sensitive() {
        assert!(!is_plausible_title("QUEST"));
    }

    #[test]
    fn test_pick_title_prefers_plausible_line() {
        let text = "ノイズ 123\n「艦隊拡充計画」\n報酬";
        assert_eq!(pick_title(text), "「艦隊拡充計画」");
        assert_eq!(pick_title("  読めない文字  "), "読めない文字");
        assert_eq!(pick_title(""), "");
    }
}
