use super::table::parse_table;
use super::text::{
    contains_any, descendants, find_all, find_first, has_class, is_heading, is_list, list_items,
    next_element_siblings, prev_element_siblings, raw_text, stripped_text, tag_is,
};
use crate::models::{ExpeditionEntry, MissionRecord, SortieEntry, TableRow};
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use tracing::debug;

/// Class names of the article body, most specific first
const MAIN_REGION_CLASSES: &[&str] = &[
    "entry-content",
    "post-content",
    "article-body",
    "main-content",
    "td-post-content",
];

const REWARD_PHRASES: &[&str] = &["報酬は", "クリア報酬に"];

const CONTENT_HEADING_KEYWORDS: &[&str] = &[
    "任務情報",
    "任務内容",
    "達成条件",
    "クリア条件",
    "出現条件",
    "概要",
    "任務概要",
];

const CRAFTING_KEYWORDS: &[&str] = &["開発", "レシピ", "工廠", "改修"];

const EXPEDITION_META_PHRASES: &[&str] = &["とは？", "まとめ", "一覧", "について", "関連記事"];

const GENERIC_AREA_PHRASES: &[&str] = &[
    "とは？",
    "まとめ",
    "一覧",
    "について",
    "その他",
    "関連記事",
    "コメント",
];

const SHIP_TYPE_GLYPHS: &[&str] = &["駆", "軽", "重", "戦", "航", "潜", "母", "巡", "艦", "海防"];

const SECTION_HEADINGS: &[&str] = &["h2", "h3", "h4"];

/// Area name used when the page title gives nothing better
const FALLBACK_AREA_NAME: &str = "(主要攻略)";

static EXPEDITION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(ID:)?([A-Z]?\d{1,2}(-[A-Z\d]{1,2})?)\s?[:：]?\s*(.+)")
        .expect("expedition heading pattern")
});

static AREA_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(\d-\d(?:-\w)?|\d-\d\S*|\S*\d-\d\S*|EO海域|鎮守府海域(?:-\d)?|西方海域|中部海域|北方海域|南方海域|Extra Operation)",
    )
    .expect("area heading pattern")
});

static FLEET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\s「【●※]+?\d{1,2})+.*").expect("fleet line pattern"));

/// What a strategy gets to look at
pub struct PageContext<'a> {
    pub region: ElementRef<'a>,
    /// Page title, used to name the fallback sortie entry
    pub title: &'a str,
}

/// One named heuristic for a section; an empty result means "try the next"
pub struct Strategy<T> {
    pub name: &'static str,
    pub run: fn(&PageContext<'_>) -> Vec<T>,
}

pub const CONTENT_STRATEGIES: &[Strategy<String>] = &[
    Strategy {
        name: "heading-walk",
        run: content_from_headings,
    },
    Strategy {
        name: "list-before-reward",
        run: content_before_reward,
    },
];

pub const REWARD_STRATEGIES: &[Strategy<String>] = &[Strategy {
    name: "list-after-reward",
    run: rewards_after_reward,
}];

pub const CRAFTING_STRATEGIES: &[Strategy<TableRow>] = &[
    Strategy {
        name: "heading-table",
        run: crafting_from_headings,
    },
    Strategy {
        name: "captioned-table",
        run: crafting_from_captions,
    },
];

pub const EXPEDITION_STRATEGIES: &[Strategy<ExpeditionEntry>] = &[Strategy {
    name: "expedition-headings",
    run: expeditions_from_headings,
}];

pub const SORTIE_STRATEGIES: &[Strategy<SortieEntry>] = &[
    Strategy {
        name: "area-headings",
        run: sortie_from_area_headings,
    },
    Strategy {
        name: "fleet-example-heading",
        run: sortie_from_fleet_example_heading,
    },
];

/// Run strategies in order and keep the first non-empty result
pub fn run_strategies<T>(section: &str, strategies: &[Strategy<T>], ctx: &PageContext<'_>) -> Vec<T> {
    for strategy in strategies {
        let found = (strategy.run)(ctx);
        if !found.is_empty() {
            debug!(section, strategy = strategy.name, items = found.len(), "Strategy matched");
            return found;
        }
    }
    debug!(section, "No strategy matched");
    Vec::new()
}

/// Article body of a guide page, falling back to `<body>`, then the root
pub fn main_region(document: &Html) -> ElementRef<'_> {
    let root = document.root_element();
    MAIN_REGION_CLASSES
        .iter()
        .find_map(|class| descendants(root).find(|el| has_class(*el, class)))
        .or_else(|| find_first(root, &["body"]))
        .unwrap_or(root)
}

/// Fill every still-empty section of `record` from the document.
///
/// Fields that already hold data are left alone, so running twice changes nothing.
pub fn extract_sections(document: &Html, record: &mut MissionRecord) {
    let title = record.title.clone();
    let ctx = PageContext {
        region: main_region(document),
        title: &title,
    };

    if record.content.is_empty() {
        record.content = run_strategies("content", CONTENT_STRATEGIES, &ctx);
    }
    if record.rewards.is_empty() {
        record.rewards = run_strategies("rewards", REWARD_STRATEGIES, &ctx);
    }
    if record.crafting_table.is_empty() {
        record.crafting_table = run_strategies("craftingTable", CRAFTING_STRATEGIES, &ctx);
    }
    if record.expedition_info.is_empty() {
        record.expedition_info = run_strategies("expeditionInfo", EXPEDITION_STRATEGIES, &ctx);
    }
    if record.sortie_info.is_empty() {
        record.sortie_info = run_strategies("sortieInfo", SORTIE_STRATEGIES, &ctx);
    }
}

pub fn is_reward_paragraph(element: ElementRef<'_>) -> bool {
    element.value().name() == "p" && contains_any(&raw_text(element), REWARD_PHRASES)
}

fn first_reward_paragraph<'a>(region: ElementRef<'a>) -> Option<ElementRef<'a>> {
    descendants(region).find(|el| is_reward_paragraph(*el))
}

fn ends_section(element: ElementRef<'_>) -> bool {
    tag_is(element, SECTION_HEADINGS) || is_reward_paragraph(element)
}

/// First table among the siblings after `heading`, before the next heading.
///
/// A table under a later heading belongs to that heading and is not taken,
/// unlike a plain next-sibling lookup.
fn following_table<'a>(heading: ElementRef<'a>) -> Option<ElementRef<'a>> {
    next_element_siblings(heading)
        .take_while(|el| !is_heading(*el))
        .find(|el| el.value().name() == "table")
}

fn content_from_headings(ctx: &PageContext<'_>) -> Vec<String> {
    for keyword in CONTENT_HEADING_KEYWORDS {
        let Some(heading) =
            find_all(ctx.region, SECTION_HEADINGS).find(|h| stripped_text(*h).contains(keyword))
        else {
            continue;
        };

        let mut content = Vec::new();
        for sibling in next_element_siblings(heading) {
            if ends_section(sibling) {
                break;
            }
            if is_list(sibling) {
                content.extend(list_items(sibling));
                if !content.is_empty() {
                    break;
                }
            } else if sibling.value().name() == "p" {
                let text = stripped_text(sibling);
                if !text.is_empty() {
                    content.push(text);
                }
            }
        }

        if !content.is_empty() {
            return content;
        }
    }
    Vec::new()
}

fn content_before_reward(ctx: &PageContext<'_>) -> Vec<String> {
    first_reward_paragraph(ctx.region)
        .and_then(|reward| prev_element_siblings(reward).find(|el| is_list(*el)))
        .map(list_items)
        .unwrap_or_default()
}

fn rewards_after_reward(ctx: &PageContext<'_>) -> Vec<String> {
    first_reward_paragraph(ctx.region)
        .and_then(|reward| next_element_siblings(reward).find(|el| is_list(*el)))
        .map(list_items)
        .unwrap_or_default()
}

fn crafting_from_headings(ctx: &PageContext<'_>) -> Vec<TableRow> {
    find_all(ctx.region, &["h2", "h3", "h4", "h5"])
        .filter(|h| contains_any(&stripped_text(*h), CRAFTING_KEYWORDS))
        .find_map(following_table)
        .map(|table| parse_table(Some(table)))
        .unwrap_or_default()
}

fn crafting_from_captions(ctx: &PageContext<'_>) -> Vec<TableRow> {
    let mentions_crafting = |el: Option<ElementRef<'_>>| {
        el.is_some_and(|el| contains_any(&stripped_text(el), CRAFTING_KEYWORDS))
    };

    find_all(ctx.region, &["table"])
        .find(|table| {
            mentions_crafting(find_first(*table, &["caption"]))
                || mentions_crafting(find_first(*table, &["th"]))
        })
        .map(|table| parse_table(Some(table)))
        .unwrap_or_default()
}

fn expeditions_from_headings(ctx: &PageContext<'_>) -> Vec<ExpeditionEntry> {
    find_all(ctx.region, &["h3"])
        .filter_map(|heading| {
            let name = stripped_text(heading);
            if !EXPEDITION_HEADING.is_match(&name) || contains_any(&name, EXPEDITION_META_PHRASES) {
                return None;
            }
            following_table(heading).map(|table| ExpeditionEntry {
                expedition_name: name,
                info_table: parse_table(Some(table)),
            })
        })
        .collect()
}

/// A fleet composition line as opposed to a remark about one
pub fn is_fleet_example(text: &str) -> bool {
    let lead = text.trim_start();
    if lead.starts_with('●') || lead.starts_with('※') {
        return false;
    }
    let tagged = text.contains('【') && text.contains('】') && contains_any(text, SHIP_TYPE_GLYPHS);
    tagged || FLEET_LINE.is_match(text)
}

/// Sort the paragraphs and lists after `heading` into examples and notes
fn walk_fleet_section(heading: ElementRef<'_>, area_name: String) -> SortieEntry {
    let mut entry = SortieEntry::new(area_name);
    for sibling in next_element_siblings(heading) {
        if ends_section(sibling) {
            break;
        }
        if is_list(sibling) {
            entry.fleet_notes.extend(list_items(sibling));
        } else if sibling.value().name() == "p" {
            let text = stripped_text(sibling);
            if text.is_empty() {
                continue;
            }
            if is_fleet_example(&text) {
                entry.fleet_examples.push(text);
            } else {
                entry.fleet_notes.push(text);
            }
        }
    }
    entry
}

fn is_area_heading(heading: ElementRef<'_>, text: &str) -> bool {
    let marked = find_all(heading, &["span"])
        .any(|span| span.value().id().is_some_and(|id| id.starts_with("i-")));
    (AREA_HEADING.is_match(text) || marked) && !contains_any(text, GENERIC_AREA_PHRASES)
}

fn sortie_from_area_headings(ctx: &PageContext<'_>) -> Vec<SortieEntry> {
    find_all(ctx.region, &["h3", "h4"])
        .filter_map(|heading| {
            let text = stripped_text(heading);
            if !is_area_heading(heading, &text) {
                return None;
            }
            let entry = walk_fleet_section(heading, text);
            (!entry.is_empty()).then_some(entry)
        })
        .collect()
}

fn sortie_from_fleet_example_heading(ctx: &PageContext<'_>) -> Vec<SortieEntry> {
    let Some(heading) = find_all(ctx.region, &["h2", "h3"]).find(|h| {
        let text = stripped_text(*h);
        text.contains("編成例") && !text.contains("とは？") && !text.contains("まとめ")
    }) else {
        return Vec::new();
    };

    let page_name = ctx.title.split('｜').next().unwrap_or_default().trim();
    let area_name = if page_name.is_empty() {
        FALLBACK_AREA_NAME.to_string()
    } else {
        page_name.to_string()
    };

    let entry = walk_fleet_section(heading, area_name);
    if entry.is_empty() {
        Vec::new()
    } else {
        vec![entry]
    }
}
