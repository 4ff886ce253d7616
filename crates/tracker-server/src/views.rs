//! HTML pages

use crate::services::charts::InstaView;
use axum::response::Html;
use chrono::Month;
use std::fmt::Write;
use tracker_core::codec::format_date;
use tracker_core::{ChartKind, MonthSelection, WeightGuess};

/// Logged-in user shown in the navigation bar
pub struct Nav<'a> {
    pub username: &'a str,
    pub is_admin: bool,
}

pub struct GraphPage {
    pub kind: ChartKind,
    pub title: String,
    pub img_url: Option<String>,
    pub months: Vec<(i32, Month)>,
    pub selected_year: Option<i32>,
    pub selection: MonthSelection,
    pub guess: Option<GuessPanel>,
}

/// Weight guess form and last guess, shown on the weight page
pub struct GuessPanel {
    pub last_guess: Option<WeightGuess>,
    /// Recorded weight for the day of the last guess
    pub actual: Option<f64>,
    pub errors: Vec<String>,
}

pub struct InstaPage {
    pub title: String,
    pub months: Vec<(i32, Month)>,
    pub selected_year: Option<i32>,
    pub selected_month: Option<Month>,
    pub photos: Vec<(InstaView, Option<String>)>,
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(
    title: &str,
    nav: Option<&Nav<'_>>,
    messages: &[String],
    errors: &[String],
    body: &str,
) -> Html<String> {
    let mut page = String::new();
    let _ = write!(
        page,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{} | Tracker</title>\n<link rel=\"stylesheet\" href=\"/static/css/tracker.css\">\n\
         </head>\n<body>\n",
        escape(title)
    );

    if let Some(nav) = nav {
        page.push_str("<nav>\n<a href=\"/home\">Home</a>\n");
        for kind in ChartKind::ALL {
            let _ = writeln!(page, "<a href=\"/{}\">{}</a>", kind, escape(kind.label()));
        }
        if nav.is_admin {
            page.push_str("<a href=\"/admin/add-user\">Add user</a>\n");
            page.push_str("<a href=\"/admin/add-weight\">Add weight</a>\n");
        }
        let _ = writeln!(
            page,
            "<span class=\"user\">{}</span> <a href=\"/logout\">Log out</a>\n</nav>",
            escape(nav.username)
        );
    }

    page.push_str("<main>\n");
    for message in messages {
        let _ = writeln!(page, "<p class=\"flash\">{}</p>", escape(message));
    }
    if !errors.is_empty() {
        page.push_str("<ul class=\"errors\">\n");
        for error in errors {
            let _ = writeln!(page, "<li>{}</li>", escape(error));
        }
        page.push_str("</ul>\n");
    }
    page.push_str(body);
    page.push_str("</main>\n</body>\n</html>\n");

    Html(page)
}

pub fn landing(next: &str, messages: &[String], errors: &[String]) -> Html<String> {
    let body = format!(
        "<h1>Tracker</h1>\n\
         <form method=\"post\" action=\"/\" class=\"card\">\n\
         <input type=\"hidden\" name=\"next\" value=\"{}\">\n\
         <input type=\"text\" name=\"username\" placeholder=\"Username\" autocomplete=\"username\" required>\n\
         <input type=\"password\" name=\"password\" placeholder=\"Password\" autocomplete=\"current-password\" required>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n",
        escape(next)
    );

    layout("Log in", None, messages, errors, &body)
}

pub fn home(nav: &Nav<'_>, messages: &[String]) -> Html<String> {
    let mut body = String::from("<h1>Home</h1>\n<ul class=\"menu\">\n");
    for kind in ChartKind::ALL {
        let _ = writeln!(
            body,
            "<li><a href=\"/{}\">{}</a></li>",
            kind,
            escape(kind.label())
        );
    }
    body.push_str("</ul>\n");

    layout("Home", Some(nav), messages, &[], &body)
}

fn month_links(
    kind: ChartKind,
    months: &[(i32, Month)],
    selected: Option<(i32, Month)>,
    with_summaries: bool,
) -> String {
    let mut links = String::from("<div class=\"months\">\n");
    if with_summaries {
        let _ = writeln!(links, "<a href=\"/{}\">All</a>", kind);
        let _ = writeln!(
            links,
            "<a href=\"/{}?month={}\">Last 30</a>",
            kind,
            MonthSelection::LAST_30
        );
    }
    for &(year, month) in months {
        let class = if selected == Some((year, month)) {
            " class=\"selected\""
        } else {
            ""
        };
        let _ = writeln!(
            links,
            "<a{} href=\"/{}?year={}&amp;month={}\">{} {}</a>",
            class,
            kind,
            year,
            month.name(),
            month.name(),
            year
        );
    }
    links.push_str("</div>\n");
    links
}

fn guess_color(guess: f64, actual: f64) -> &'static str {
    let diff = (guess - actual).abs();
    if diff <= 0.5 {
        "green"
    } else if diff <= 1.5 {
        "orange"
    } else {
        "red"
    }
}

fn guess_section(panel: &GuessPanel) -> String {
    let mut section = String::from("<section class=\"guess card\">\n<h2>Guess tomorrow's weight</h2>\n");

    for error in &panel.errors {
        let _ = writeln!(section, "<p class=\"error\">{}</p>", escape(error));
    }

    section.push_str(
        "<form method=\"post\">\n\
         <input type=\"text\" name=\"weight\" placeholder=\"Weight\" inputmode=\"decimal\" required>\n\
         <button type=\"submit\">Guess</button>\n\
         </form>\n",
    );

    match &panel.last_guess {
        Some(guess) => {
            let _ = writeln!(
                section,
                "<p>Last guess for {}: {} kg</p>",
                format_date(guess.date),
                guess.weight
            );
            match panel.actual {
                Some(actual) => {
                    let _ = writeln!(
                        section,
                        "<p>Actual: <span style=\"color: {}\">{} kg</span></p>",
                        guess_color(guess.weight, actual),
                        actual
                    );
                }
                None => section.push_str("<p>Actual: not recorded yet</p>\n"),
            }
        }
        None => section.push_str("<p>No guess yet</p>\n"),
    }

    section.push_str("</section>\n");
    section
}

pub fn graph(nav: &Nav<'_>, messages: &[String], view: &GraphPage) -> Html<String> {
    let selected = match (view.selection, view.selected_year) {
        (MonthSelection::Month(month), Some(year)) => Some((year, month)),
        _ => None,
    };

    let mut body = format!(
        "<h1>{} - {}</h1>\n",
        escape(view.kind.label()),
        escape(&view.title)
    );
    body.push_str(&month_links(view.kind, &view.months, selected, true));

    match &view.img_url {
        Some(url) => {
            let _ = writeln!(
                body,
                "<img class=\"chart\" src=\"{}\" alt=\"{} chart\">",
                escape(url),
                escape(view.kind.label())
            );
        }
        None => body.push_str("<p class=\"missing\">No chart for this selection</p>\n"),
    }

    if let Some(panel) = &view.guess {
        body.push_str(&guess_section(panel));
    }

    layout(view.kind.label(), Some(nav), messages, &[], &body)
}

pub fn insta(nav: &Nav<'_>, messages: &[String], view: &InstaPage) -> Html<String> {
    let selected = view.selected_year.zip(view.selected_month);

    let mut body = format!("<h1>Insta - {}</h1>\n", escape(&view.title));
    body.push_str(&month_links(ChartKind::Insta, &view.months, selected, false));

    body.push_str("<div class=\"montage\">\n");
    for (photo, url) in &view.photos {
        match url {
            Some(url) => {
                let _ = writeln!(
                    body,
                    "<img src=\"{}\" alt=\"{}\">",
                    escape(url),
                    photo.as_str()
                );
            }
            None => {
                let _ = writeln!(body, "<div class=\"missing\">{}</div>", photo.as_str());
            }
        }
    }
    body.push_str("</div>\n");

    layout("Insta", Some(nav), messages, &[], &body)
}

pub fn add_user(
    nav: &Nav<'_>,
    messages: &[String],
    errors: &[String],
    username: &str,
) -> Html<String> {
    let body = format!(
        "<h1>Add user</h1>\n\
         <form method=\"post\" class=\"card\">\n\
         <input type=\"text\" name=\"username\" placeholder=\"Username\" value=\"{}\" required>\n\
         <input type=\"text\" name=\"password\" placeholder=\"Password\" required>\n\
         <input type=\"text\" name=\"password2\" placeholder=\"Repeat Password\" required>\n\
         <button type=\"submit\">Add</button>\n\
         </form>\n",
        escape(username)
    );

    layout("Add user", Some(nav), messages, errors, &body)
}

pub fn add_weight(
    nav: &Nav<'_>,
    messages: &[String],
    errors: &[String],
    date: &str,
    weight: &str,
) -> Html<String> {
    let body = format!(
        "<h1>Add weight</h1>\n\
         <form method=\"post\" class=\"card\">\n\
         <input type=\"text\" name=\"date\" placeholder=\"YYYY-MM-DD\" value=\"{}\" required>\n\
         <input type=\"text\" name=\"weight\" placeholder=\"Weight\" value=\"{}\" inputmode=\"decimal\" required>\n\
         <button type=\"submit\">Add</button>\n\
         </form>\n",
        escape(date),
        escape(weight)
    );

    layout("Add weight", Some(nav), messages, errors, &body)
}
