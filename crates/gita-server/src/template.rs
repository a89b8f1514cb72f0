//! HTML pages.
//!
//! Pages are assembled directly into a `String`. Plain-text values (names,
//! Devanāgarī and IAST lines, titles) are escaped. Translations, purports and
//! synonyms come from the dataset as HTML fragments and are inserted as-is.

use std::fmt::Write;

use gita_book::{Book, Chapter, Verse};

/// Stylesheet linked from every page.
const STYLESHEET: &str = "/public/css/style.css";

/// Per-language `<head>` data.
pub(crate) struct PageHead<'a> {
    pub(crate) language: &'a str,
    pub(crate) title: &'a str,
    pub(crate) keywords: &'a str,
}

/// Navigation bar targets. `None` renders the bare arrow without a link.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct NavLinks {
    pub(crate) previous: Option<String>,
    pub(crate) up: Option<String>,
    pub(crate) next: Option<String>,
}

/// Table of contents for one language.
pub(crate) fn render_toc(
    head: &PageHead<'_>,
    book: &Book,
    chapter_url: impl Fn(u32) -> String,
) -> String {
    let mut html = String::with_capacity(4096);
    open_page(&mut html, head);

    html.push_str("<main class=\"toc\">\n<table>\n");
    for chapter in &book.chapters {
        let href = chapter_url(chapter.number);
        let _ = writeln!(
            html,
            "<tr><td><a href=\"{href}\">{}</a></td><td><a href=\"{href}\">{}</a></td></tr>",
            chapter.number,
            escape(&chapter.name)
        );
    }
    html.push_str("</table>\n</main>\n");

    close_page(&mut html);
    html
}

/// Chapter page with its verse list.
pub(crate) fn render_chapter(
    head: &PageHead<'_>,
    chapter: &Chapter,
    nav: &NavLinks,
    verse_url: impl Fn(u32) -> String,
) -> String {
    let mut html = String::with_capacity(8192);
    open_page(&mut html, head);

    render_nav(&mut html, nav);
    html.push_str("<main class=\"chapter\">\n");
    let _ = writeln!(
        html,
        "<h1>{}. {}</h1>",
        chapter.number,
        escape(&chapter.name)
    );

    html.push_str("<table class=\"verses\">\n");
    for verse in &chapter.verses {
        let href = verse_url(verse.number);
        let _ = writeln!(
            html,
            "<tr><td valign=\"top\"><a href=\"{href}\">{}.{}</a></td><td><a href=\"{href}\">{}</a></td></tr>",
            chapter.number, verse.number, verse.translation
        );
    }
    html.push_str("</table>\n</main>\n");
    render_nav(&mut html, nav);

    close_page(&mut html);
    html
}

/// Verse page with text, synonyms, translation and purport.
pub(crate) fn render_verse(
    head: &PageHead<'_>,
    chapter_number: u32,
    verse: &Verse,
    nav: &NavLinks,
) -> String {
    let mut html = String::with_capacity(16384);
    open_page(&mut html, head);

    render_nav(&mut html, nav);
    html.push_str("<main class=\"verse\">\n");
    let _ = writeln!(html, "<h1>{chapter_number}.{}</h1>", verse.number);

    render_lines(&mut html, "devanagari", &verse.devanagari);
    render_lines(&mut html, "iast", &verse.iast);

    let synonyms = join_synonyms(verse);
    if !synonyms.is_empty() {
        let _ = writeln!(html, "<p class=\"synonyms\">{synonyms}</p>");
    }
    if !verse.translation.is_empty() {
        let _ = writeln!(
            html,
            "<p class=\"translation\"><strong>{}</strong></p>",
            verse.translation
        );
    }
    if !verse.purport.is_empty() {
        html.push_str("<section class=\"purport\">\n");
        for paragraph in &verse.purport {
            let _ = writeln!(html, "<p>{paragraph}</p>");
        }
        html.push_str("</section>\n");
    }

    html.push_str("</main>\n");
    render_nav(&mut html, nav);

    close_page(&mut html);
    html
}

/// Minimal page carrying a single message, used for "does not exist" responses.
pub(crate) fn render_message(message: &str) -> String {
    let mut html = String::with_capacity(256);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(message));
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<p>{}</p>", escape(message));
    html.push_str("</body>\n</html>");
    html
}

/// Join synonym pairs as `word—meaning; word—meaning.`
pub(crate) fn join_synonyms(verse: &Verse) -> String {
    let pairs: Vec<_> = verse.synonyms().collect();
    let mut joined = String::new();
    for (i, (word, meaning)) in pairs.iter().enumerate() {
        let separator = if i == pairs.len() - 1 { "." } else { "; " };
        let _ = write!(joined, "{word}—{meaning}{separator}");
    }
    joined
}

fn open_page(html: &mut String, head: &PageHead<'_>) {
    html.push_str("<!DOCTYPE html>\n");
    let _ = writeln!(html, "<html lang=\"{}\">", escape(head.language));
    html.push_str("<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    let _ = writeln!(html, "<title>{}</title>", escape(head.title));
    let _ = writeln!(
        html,
        "<meta name=\"keywords\" content=\"{}\">",
        escape(head.keywords)
    );
    let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{STYLESHEET}\">");
    html.push_str("</head>\n<body>\n");
}

fn close_page(html: &mut String) {
    html.push_str("</body>\n</html>");
}

fn render_nav(html: &mut String, nav: &NavLinks) {
    html.push_str("<nav class=\"arrows\">");
    render_arrow(html, nav.previous.as_deref(), "&lt;&lt;");
    html.push(' ');
    render_arrow(html, nav.up.as_deref(), "^");
    html.push(' ');
    render_arrow(html, nav.next.as_deref(), "&gt;&gt;");
    html.push_str("</nav>\n");
}

fn render_arrow(html: &mut String, href: Option<&str>, label: &str) {
    match href {
        Some(href) => {
            let _ = write!(html, "<a href=\"{}\">{label}</a>", escape(href));
        }
        None => html.push_str(label),
    }
}

fn render_lines(html: &mut String, class: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let _ = write!(html, "<p class=\"{class}\">");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            html.push_str("<br>");
        }
        html.push_str(&escape(line));
    }
    html.push_str("</p>\n");
}

/// Escape HTML special characters.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
