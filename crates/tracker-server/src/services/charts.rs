//! Chart image catalog
//!
//! Charts are pre-rendered images under `{static_dir}/images/{kind}/`:
//!
//! - `{kind}_{month}_{year}.png` for one month (month in lower case)
//! - `{kind}_{year}.png` for a whole year
//! - `{kind}_last_30.png` and `{kind}_all.png`
//! - `insta_{month}_{year}_{left|back|front|right}.jpg` for photo montages

use chrono::Month;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracker_core::{ChartKind, MonthSelection};

/// URL prefix the static directory is served under
pub const STATIC_URL: &str = "/static";

/// The four photos of a montage, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstaView {
    Left,
    Back,
    Front,
    Right,
}

impl InstaView {
    pub const ALL: [InstaView; 4] = [
        InstaView::Left,
        InstaView::Back,
        InstaView::Front,
        InstaView::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstaView::Left => "left",
            InstaView::Back => "back",
            InstaView::Front => "front",
            InstaView::Right => "right",
        }
    }
}

pub struct ChartCatalog {
    images_dir: PathBuf,
}

impl ChartCatalog {
    pub fn new(static_dir: &Path) -> Self {
        Self {
            images_dir: static_dir.join("images"),
        }
    }

    /// URL of a chart image, if the file exists.
    pub fn chart_url(
        &self,
        kind: ChartKind,
        year: Option<i32>,
        selection: MonthSelection,
    ) -> Option<String> {
        let file_name = chart_file_name(kind, year, selection)?;
        self.url_if_exists(kind, &file_name)
    }

    /// URLs of the montage photos for one month; missing photos are `None`.
    pub fn insta_urls(&self, year: i32, month: Month) -> Vec<(InstaView, Option<String>)> {
        InstaView::ALL
            .iter()
            .map(|view| {
                let file_name = format!(
                    "{}_{}_{}_{}.jpg",
                    ChartKind::Insta,
                    month_slug(month),
                    year,
                    view.as_str()
                );
                (*view, self.url_if_exists(ChartKind::Insta, &file_name))
            })
            .collect()
    }

    /// Distinct `(year, month)` pairs that have images, oldest first.
    pub fn available_months(&self, kind: ChartKind) -> Vec<(i32, Month)> {
        let dir = self.images_dir.join(kind.as_str());
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot list {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut months = BTreeMap::new();
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            if let Some((year, month)) = parse_month_file(kind, &file_name.to_string_lossy()) {
                months.insert((year, month.number_from_month()), month);
            }
        }

        months
            .into_iter()
            .map(|((year, _), month)| (year, month))
            .collect()
    }

    /// Latest year with images for `month`.
    pub fn latest_year_for(&self, kind: ChartKind, month: Month) -> Option<i32> {
        self.available_months(kind)
            .into_iter()
            .filter(|(_, m)| *m == month)
            .map(|(year, _)| year)
            .max()
    }

    fn url_if_exists(&self, kind: ChartKind, file_name: &str) -> Option<String> {
        let path = self.images_dir.join(kind.as_str()).join(file_name);
        if path.is_file() {
            Some(format!(
                "{}/images/{}/{}",
                STATIC_URL,
                kind.as_str(),
                file_name
            ))
        } else {
            debug!("Chart not found: {}", path.display());
            None
        }
    }
}

fn month_slug(month: Month) -> String {
    month.name().to_lowercase()
}

fn chart_file_name(kind: ChartKind, year: Option<i32>, selection: MonthSelection) -> Option<String> {
    let stem = match (selection, year) {
        (MonthSelection::Last30, _) => format!("{}_last_30", kind),
        (MonthSelection::All, Some(year)) => format!("{}_{}", kind, year),
        (MonthSelection::All, None) => format!("{}_all", kind),
        (MonthSelection::Month(month), Some(year)) => {
            format!("{}_{}_{}", kind, month_slug(month), year)
        }
        (MonthSelection::Month(_), None) | (MonthSelection::Unknown, _) => return None,
    };

    Some(format!("{}.png", stem))
}

/// `weight_september_2025.png` -> `(2025, September)`
fn parse_month_file(kind: ChartKind, file_name: &str) -> Option<(i32, Month)> {
    let stem = file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem);
    let mut parts = stem.split('_');

    if parts.next()? != kind.as_str() {
        return None;
    }
    let month = parts.next()?.parse::<Month>().ok()?;
    let year = parts.next()?.parse::<i32>().ok()?;

    Some((year, month))
}

/// Page title for a chart selection.
pub fn chart_title(year: Option<i32>, selection: MonthSelection, found: bool) -> String {
    if !found {
        return "Not found".to_string();
    }

    match (selection, year) {
        (MonthSelection::Last30, _) => "Last 30".to_string(),
        (MonthSelection::All, None) => "All".to_string(),
        (MonthSelection::All, Some(year)) => year.to_string(),
        (MonthSelection::Month(month), Some(year)) => format!("{} {}", month.name(), year),
        (MonthSelection::Month(month), None) => month.name().to_string(),
        (MonthSelection::Unknown, _) => "Not found".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn catalog_with(files: &[&str]) -> (tempfile::TempDir, ChartCatalog) {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            let path = dir.path().join("images").join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"png").unwrap();
        }
        let catalog = ChartCatalog::new(dir.path());
        (dir, catalog)
    }

    #[test]
    fn test_chart_url_cases() {
        let (_dir, catalog) = catalog_with(&[
            "weight/weight_september_2025.png",
            "weight/weight_2025.png",
            "weight/weight_last_30.png",
        ]);

        assert_eq!(
            catalog.chart_url(
                ChartKind::Weight,
                Some(2025),
                MonthSelection::Month(Month::September)
            ),
            Some("/static/images/weight/weight_september_2025.png".to_string())
        );
        assert_eq!(
            catalog.chart_url(ChartKind::Weight, Some(2025), MonthSelection::All),
            Some("/static/images/weight/weight_2025.png".to_string())
        );
        assert_eq!(
            catalog.chart_url(ChartKind::Weight, None, MonthSelection::Last30),
            Some("/static/images/weight/weight_last_30.png".to_string())
        );
        assert_eq!(
            catalog.chart_url(ChartKind::Weight, None, MonthSelection::All),
            None
        );
        assert_eq!(
            catalog.chart_url(ChartKind::Calories, Some(2025), MonthSelection::All),
            None
        );
        assert_eq!(
            catalog.chart_url(ChartKind::Weight, Some(2025), MonthSelection::Unknown),
            None
        );
    }

    #[test]
    fn test_available_months_sorted_and_distinct() {
        let (_dir, catalog) = catalog_with(&[
            "insta/insta_september_2025_left.jpg",
            "insta/insta_september_2025_back.jpg",
            "insta/insta_july_2025_front.jpg",
            "insta/insta_december_2024_front.jpg",
            "insta/notes.txt",
            "insta/weight_august_2025.png",
        ]);

        assert_eq!(
            catalog.available_months(ChartKind::Insta),
            vec![
                (2024, Month::December),
                (2025, Month::July),
                (2025, Month::September),
            ]
        );
        assert_eq!(
            catalog.latest_year_for(ChartKind::Insta, Month::July),
            Some(2025)
        );
        assert_eq!(catalog.latest_year_for(ChartKind::Insta, Month::May), None);
        assert!(catalog.available_months(ChartKind::Both).is_empty());
    }

    #[test]
    fn test_insta_urls() {
        let (_dir, catalog) = catalog_with(&[
            "insta/insta_september_2025_left.jpg",
            "insta/insta_september_2025_right.jpg",
        ]);

        let urls = catalog.insta_urls(2025, Month::September);
        assert_eq!(urls.len(), 4);
        assert_eq!(
            urls[0],
            (
                InstaView::Left,
                Some("/static/images/insta/insta_september_2025_left.jpg".to_string())
            )
        );
        assert_eq!(urls[1], (InstaView::Back, None));
        assert!(urls[3].1.is_some());
    }

    #[test]
    fn test_chart_title() {
        assert_eq!(chart_title(None, MonthSelection::All, true), "All");
        assert_eq!(chart_title(None, MonthSelection::Last30, true), "Last 30");
        assert_eq!(chart_title(Some(2025), MonthSelection::All, true), "2025");
        assert_eq!(
            chart_title(Some(2025), MonthSelection::Month(Month::July), true),
            "July 2025"
        );
        assert_eq!(
            chart_title(Some(2025), MonthSelection::Month(Month::July), false),
            "Not found"
        );
    }
}
