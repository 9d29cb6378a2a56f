//! Plain-text rendering of pages and detail views

use std::sync::Arc;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use pokedex_core::catalog::{Direction, EntityDetail, Neighbor};
use pokedex_core::session::{DetailView, ViewState};

/// Table row for a catalog page
#[derive(Tabled)]
struct PageRow {
    #[tabled(rename = "#")]
    row: usize,
    #[tabled(rename = "No.")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Types")]
    types: String,
    #[tabled(rename = "Height")]
    height: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

/// "mr-mime" -> "Mr-mime"
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn dex_number(id: u32) -> String {
    format!("#{id:03}")
}

pub fn page_table(entities: &[Arc<EntityDetail>]) -> String {
    if entities.is_empty() {
        return "No entries on this page.".to_string();
    }

    let rows: Vec<PageRow> = entities
        .iter()
        .enumerate()
        .map(|(i, e)| PageRow {
            row: i + 1,
            id: dex_number(e.id),
            name: display_name(&e.name),
            types: e.types.join("/"),
            height: format!("{:.1} m", e.height_m()),
            weight: format!("{:.1} kg", e.weight_kg()),
        })
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

pub fn page_footer(view: &ViewState) -> String {
    let mut parts = Vec::new();
    if let Some(total) = view.total {
        parts.push(format!("{} shown of {}", view.page.len(), total));
    }
    if view.cursor.has(Direction::Backward) {
        parts.push("[p]revious".to_string());
    }
    if view.cursor.has(Direction::Forward) {
        parts.push("[n]ext".to_string());
    }
    parts.join("  ·  ")
}

/// Table plus footer for the page a session currently shows
pub fn page_view(view: &ViewState) -> String {
    format!("{}\n{}", page_table(&view.page), page_footer(view))
}

fn neighbor_label(neighbor: Option<&Neighbor>) -> String {
    match neighbor {
        None => "…".to_string(),
        Some(Ok(Some(e))) => format!("{} {}", dex_number(e.id), display_name(&e.name)),
        Some(Ok(None)) => "—".to_string(),
        Some(Err(err)) => format!("unavailable ({})", err.user_message()),
    }
}

pub fn detail_text(detail: &DetailView, sprite_url: &str) -> String {
    let e = &detail.entity;
    let mut out = String::new();

    out.push_str(&format!("{} {}\n", dex_number(e.id), display_name(&e.name)));
    out.push_str(&format!("Types:     {}\n", e.types.join(", ")));
    out.push_str(&format!(
        "Size:      {:.1} m, {:.1} kg\n",
        e.height_m(),
        e.weight_kg()
    ));
    if !e.abilities.is_empty() {
        out.push_str(&format!("Abilities: {}\n", e.abilities.join(", ")));
    }
    if !e.stats.is_empty() {
        out.push_str("Stats:\n");
        for stat in &e.stats {
            out.push_str(&format!("  {:<16} {:>3}\n", stat.name, stat.base));
        }
    }
    out.push_str(&format!("Sprite:    {sprite_url}\n"));
    if let Some(artwork) = &e.sprites.artwork_url {
        out.push_str(&format!("Artwork:   {artwork}\n"));
    }

    let neighbors = detail.neighbors.as_ref();
    out.push_str(&format!(
        "< {}    {} >",
        neighbor_label(neighbors.map(|n| &n.previous)),
        neighbor_label(neighbors.map(|n| &n.next))
    ));
    out
}
