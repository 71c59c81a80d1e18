use serde::Deserialize;
use sqlx::SqlitePool;

use crate::database::{category_repo, event_repo};
use crate::database::event_repo::CatalogEventRow;

#[derive(Debug, Deserialize, Default)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

#[derive(Clone)]
pub struct CategoryOptionView {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

pub struct EventCardView {
    pub event_id: String,
    pub title: String,
    pub description: String,
    pub date_label: String,
    pub time_label: String,
    pub location: String,
    pub category_name: String,
    pub organization_name: String,
    pub volunteers_needed: i64,
    pub image_url: Option<String>,
}

pub struct CatalogPageData {
    pub events: Vec<EventCardView>,
    pub categories: Vec<CategoryOptionView>,
    pub search_query: String,
    pub selected_category: String,
}

/// The datastore answers the structural filter (approved, future, category,
/// ordered by date); the free-text refinement happens here, after the fetch,
/// so typing in the search box never re-queries.
pub async fn build_catalog_page(
    pool: &SqlitePool,
    query: &CatalogQuery,
) -> sqlx::Result<CatalogPageData> {
    let selected_category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != "all")
        .map(str::to_string);

    let rows = event_repo::list_catalog(pool, selected_category.as_deref()).await?;
    let categories = category_repo::list_categories(pool).await.unwrap_or_default();

    let needle = query.q.clone().unwrap_or_default();
    let events = rows
        .into_iter()
        .filter(|row| matches_text_filter(&needle, &row.title, &row.description, &row.location))
        .map(card_from_row)
        .collect();

    let category_options = categories
        .into_iter()
        .map(|c| CategoryOptionView {
            selected: selected_category.as_deref() == Some(c.id.as_str()),
            id: c.id,
            name: c.name,
        })
        .collect();

    Ok(CatalogPageData {
        events,
        categories: category_options,
        search_query: needle,
        selected_category: selected_category.unwrap_or_else(|| "all".to_string()),
    })
}

fn card_from_row(row: CatalogEventRow) -> EventCardView {
    let (date_label, time_label) = format_event_labels(&row.event_date);
    EventCardView {
        event_id: row.id,
        title: row.title,
        description: row.description,
        date_label,
        time_label,
        location: row.location,
        category_name: row.category_name,
        organization_name: row.organization_name,
        volunteers_needed: row.volunteers_needed,
        image_url: row.image_url,
    }
}

/// Case-insensitive substring match on title, description or location. The
/// empty query matches everything.
pub fn matches_text_filter(query: &str, title: &str, description: &str, location: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    title.to_lowercase().contains(&needle)
        || description.to_lowercase().contains(&needle)
        || location.to_lowercase().contains(&needle)
}

pub(crate) fn format_event_labels(event_date: &str) -> (String, String) {
    // Input is an ISO-ish string like: 2026-10-17T10:06:13
    let date = event_date.get(0..10).unwrap_or(event_date);
    let time = event_date.get(11..16).unwrap_or("");
    (format_date_short(date), time.to_string())
}

fn format_date_short(date: &str) -> String {
    let (y, m, d) = match parse_ymd(date) {
        Some(v) => v,
        None => return date.to_string(),
    };

    let wd_name = match weekday_sun0(y, m, d) {
        0 => "Sun",
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        _ => "",
    };

    let month = match m {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    };

    format!("{} {} {} {}", wd_name, d, month, y)
}

fn parse_ymd(date: &str) -> Option<(i32, i32, i32)> {
    let mut parts = date.split('-');
    let y: i32 = parts.next()?.parse().ok()?;
    let m: i32 = parts.next()?.parse().ok()?;
    let d: i32 = parts.next()?.parse().ok()?;
    Some((y, m, d))
}

// Returns weekday with Sunday=0..Saturday=6 (Sakamoto algorithm).
fn weekday_sun0(y: i32, m: i32, d: i32) -> i32 {
    let t = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let mut year = y;
    if m < 3 {
        year -= 1;
    }
    (year + year / 4 - year / 100 + year / 400 + t[(m - 1) as usize] + d) % 7
}
