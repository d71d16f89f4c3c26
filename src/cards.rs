use crate::state::Record;

/// One card fragment. `description` is only present on player cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub header: String,
    pub title: String,
    pub description: Option<String>,
}

pub fn responsibility(rank: &str) -> Option<&'static str> {
    match rank {
        "CEO" => Some("Responsible for the entire company"),
        "Command" => Some("Responsible for hiring/firing employees & day-to-day operations"),
        "Administrator" => {
            Some("Manages IT in whole company; Makes sure all company processes go smoothly")
        }
        "Advisor" => Some("Gives advice about management plans"),
        "FTO Manager" => Some("Oversees and conducts interviews & evaluations"),
        "FTO" => Some("Oversees employees and assists where required"),
        _ => None,
    }
}

/// Card for one person, headed by either the roster rank or the info rank.
pub fn player_card(record: &Record, use_roster_rank: bool) -> Card {
    let chosen = if use_roster_rank {
        record.roster_rank()
    } else {
        record.info_rank()
    };
    let rank = chosen.unwrap_or_default();
    Card {
        header: rank.to_string(),
        title: record.name.clone(),
        description: Some(responsibility(rank).unwrap_or_default().to_string()),
    }
}

pub fn rank_card(label: &str, count: u32) -> Card {
    Card {
        header: label.to_string(),
        title: count.to_string(),
        description: None,
    }
}

impl Card {
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(192);
        out.push_str(r#"<div class="card mb-4 shadow-sm">"#);
        out.push_str(r#"<div class="card-header"><h4 class="my-0 font-weight-normal">"#);
        out.push_str(&escape_html(&self.header));
        out.push_str("</h4></div>");
        out.push_str(r#"<div><h1 class="card-title">"#);
        out.push_str(&escape_html(&self.title));
        out.push_str("</h1>");
        if let Some(desc) = self.description.as_deref() {
            out.push_str(r#"<ul class="list-unstyled mt-3 mb-4"><li>"#);
            out.push_str(&escape_html(desc));
            out.push_str("</li></ul>");
        }
        out.push_str("</div></div>");
        out
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
