use scraper::{ElementRef, Html};

/// Text of an element with every fragment trimmed and joined without
/// separators; newlines left inside a fragment become spaces.
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<String>()
        .replace('\n', " ")
}

/// Untrimmed text of an element, used for substring checks
pub fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

pub fn tag_is(element: ElementRef<'_>, names: &[&str]) -> bool {
    names.contains(&element.value().name())
}

pub fn is_heading(element: ElementRef<'_>) -> bool {
    tag_is(element, &["h1", "h2", "h3", "h4", "h5", "h6"])
}

pub fn is_list(element: ElementRef<'_>) -> bool {
    tag_is(element, &["ul", "ol"])
}

/// Descendant elements in document order, excluding `root` itself
pub fn descendants<'a>(root: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    root.descendants().skip(1).filter_map(ElementRef::wrap)
}

pub fn find_all<'a>(
    root: ElementRef<'a>,
    names: &'static [&'static str],
) -> impl Iterator<Item = ElementRef<'a>> {
    descendants(root).filter(move |el| tag_is(*el, names))
}

pub fn find_first<'a>(root: ElementRef<'a>, names: &[&str]) -> Option<ElementRef<'a>> {
    descendants(root).find(|el| tag_is(*el, names))
}

pub fn children<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

pub fn next_element_siblings<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.next_siblings().filter_map(ElementRef::wrap)
}

/// Preceding siblings, nearest first
pub fn prev_element_siblings<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.prev_siblings().filter_map(ElementRef::wrap)
}

/// Non-empty text of the `li` elements directly under a list
pub fn list_items(list: ElementRef<'_>) -> Vec<String> {
    children(list)
        .filter(|child| child.value().name() == "li")
        .map(stripped_text)
        .filter(|text| !text.is_empty())
        .collect()
}

pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// Text of the document `<title>`, if any
pub fn document_title(document: &Html) -> Option<String> {
    find_first(document.root_element(), &["title"])
        .map(stripped_text)
        .filter(|title| !title.is_empty())
}
