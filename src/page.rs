use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result};

use crate::cards::Card;

/// Named insertion points the hosting page provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeckId {
    Ceo,
    Command,
    Administrator,
    Advisor,
    FtoManager,
    Fto,
    Rank1,
    Rank2,
}

impl DeckId {
    pub const ALL: [DeckId; 8] = [
        DeckId::Ceo,
        DeckId::Command,
        DeckId::Administrator,
        DeckId::Advisor,
        DeckId::FtoManager,
        DeckId::Fto,
        DeckId::Rank1,
        DeckId::Rank2,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            DeckId::Ceo => "ceo-card-deck",
            DeckId::Command => "command-card-deck",
            DeckId::Administrator => "administrator-card-deck",
            DeckId::Advisor => "advisor-card-deck",
            DeckId::FtoManager => "ftom-card-deck",
            DeckId::Fto => "fto-card-deck",
            DeckId::Rank1 => "rank1-card-deck",
            DeckId::Rank2 => "rank2-card-deck",
        }
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

#[derive(Debug, Clone, Default)]
struct DeckState {
    cleared: bool,
    cards: Vec<Card>,
}

/// The hosting page: a template plus the cards appended to each deck.
///
/// Appending never removes anything, so rendering into the same page twice
/// doubles every card. Call [`Page::clear_all`] first to start the
/// containers empty, including any children the template already had.
#[derive(Debug, Clone)]
pub struct Page {
    template: String,
    decks: BTreeMap<DeckId, DeckState>,
}

impl Page {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            decks: BTreeMap::new(),
        }
    }

    pub fn with_default_template() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let template = fs::read_to_string(path)
            .with_context(|| format!("failed to read template {}", path.display()))?;
        Ok(Self::new(template))
    }

    pub fn append(&mut self, deck: DeckId, card: Card) {
        self.decks.entry(deck).or_default().cards.push(card);
    }

    pub fn clear(&mut self, deck: DeckId) {
        let state = self.decks.entry(deck).or_default();
        state.cleared = true;
        state.cards.clear();
    }

    pub fn clear_all(&mut self) {
        for deck in DeckId::ALL {
            self.clear(deck);
        }
    }

    pub fn cards(&self, deck: DeckId) -> &[Card] {
        self.decks
            .get(&deck)
            .map(|s| s.cards.as_slice())
            .unwrap_or_default()
    }

    pub fn card_count(&self) -> usize {
        self.decks.values().map(|s| s.cards.len()).sum()
    }

    /// Write the appended cards into the template. Each card goes at the end
    /// of its container, or replaces the container's children if the deck
    /// was cleared.
    pub fn to_html(&self) -> Result<String> {
        let lowered = self.template.to_ascii_lowercase();
        let mut edits = Vec::new();
        for (deck, state) in &self.decks {
            if !state.cleared && state.cards.is_empty() {
                continue;
            }
            let span = locate_container(&lowered, deck.element_id())
                .with_context(|| format!("container #{deck} not found in page"))?;
            let html: String = state.cards.iter().map(Card::to_html).collect();
            let start = if state.cleared { span.inner_start } else { span.inner_end };
            edits.push((start, span.inner_end, html));
        }

        edits.sort_by(|a, b| b.0.cmp(&a.0));
        let mut out = self.template.clone();
        for (start, end, html) in edits {
            out.replace_range(start..end, &html);
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ContainerSpan {
    inner_start: usize,
    inner_end: usize,
}

// `doc` must already be ASCII-lowercased. Offsets are the same in the
// template as written.
fn locate_container(doc: &str, element_id: &str) -> Option<ContainerSpan> {
    let id = element_id.to_ascii_lowercase();
    let comments = comment_spans(doc);
    let attr_pos = [format!("id=\"{id}\""), format!("id='{id}'")]
        .iter()
        .filter_map(|needle| find_attr(doc, needle, &comments))
        .min()?;

    let tag_start = doc[..attr_pos].rfind('<')?;
    let tag_name: String = doc[tag_start + 1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if tag_name.is_empty() {
        return None;
    }
    let inner_start = attr_pos + doc[attr_pos..].find('>')? + 1;

    let open = format!("<{tag_name}");
    let close = format!("</{tag_name}");
    let mut depth = 1usize;
    let mut cursor = inner_start;
    loop {
        let next_open = find_tag(doc, cursor, &open, &comments);
        let next_close = find_tag(doc, cursor, &close, &comments)?;
        match next_open {
            Some(o) if o < next_close => {
                depth += 1;
                cursor = o + open.len();
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(ContainerSpan {
                        inner_start,
                        inner_end: next_close,
                    });
                }
                cursor = next_close + close.len();
            }
        }
    }
}

// `<!-- ... -->` regions, in document order. An unterminated comment runs
// to the end of the document.
fn comment_spans(doc: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut from = 0;
    while let Some(rel) = doc[from..].find("<!--") {
        let start = from + rel;
        let end = doc[start + 4..]
            .find("-->")
            .map_or(doc.len(), |rel| start + 4 + rel + 3);
        spans.push(start..end);
        from = end;
    }
    spans
}

fn comment_end(comments: &[Range<usize>], pos: usize) -> Option<usize> {
    comments
        .iter()
        .find(|span| span.contains(&pos))
        .map(|span| span.end)
}

// Attribute match must not be the tail of a longer name like `data-id=`.
fn find_attr(doc: &str, needle: &str, comments: &[Range<usize>]) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = doc[from..].find(needle) {
        let pos = from + rel;
        if let Some(end) = comment_end(comments, pos) {
            from = end;
            continue;
        }
        let prev = doc[..pos].chars().next_back();
        if prev.is_some_and(|c| c.is_ascii_whitespace()) {
            return Some(pos);
        }
        from = pos + needle.len();
    }
    None
}

// Tag prefix must be followed by a delimiter so `<div` does not match `<divx`.
fn find_tag(doc: &str, from: usize, prefix: &str, comments: &[Range<usize>]) -> Option<usize> {
    let mut from = from;
    while let Some(rel) = doc[from..].find(prefix) {
        let pos = from + rel;
        if let Some(end) = comment_end(comments, pos) {
            from = end;
            continue;
        }
        let after = doc[pos + prefix.len()..].chars().next();
        if after.is_none_or(|c| c.is_ascii_whitespace() || c == '>' || c == '/') {
            return Some(pos);
        }
        from = pos + prefix.len();
    }
    None
}

pub const DEFAULT_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1, shrink-to-fit=no">
<title>Roster</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@4.6.2/dist/css/bootstrap.min.css">
</head>
<body>
<main class="container text-center">
<h2 class="mt-4">Leadership</h2>
<div class="card-deck mb-3" id="ceo-card-deck"></div>
<div class="card-deck mb-3" id="command-card-deck"></div>
<div class="card-deck mb-3" id="administrator-card-deck"></div>
<div class="card-deck mb-3" id="advisor-card-deck"></div>
<h2 class="mt-4">Field Training</h2>
<div class="card-deck mb-3" id="ftom-card-deck"></div>
<div class="card-deck mb-3" id="fto-card-deck"></div>
<h2 class="mt-4">Ranks</h2>
<div class="card-deck mb-3" id="rank1-card-deck"></div>
<div class="card-deck mb-3" id="rank2-card-deck"></div>
</main>
</body>
</html>
"#;
