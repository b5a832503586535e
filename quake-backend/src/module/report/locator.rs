//! Report locator
//!
//! Picks the table rows out of the raw report. The page layout (banner text,
//! encoding, trailing whitespace) is not stable, so rows are recognised by
//! content: a `YYYY.MM.DD` date plus the `-.-` no-data sentinel that every
//! real row carries in at least one magnitude column.

use regex::Regex;
use std::sync::LazyLock;

/// Sentinel used by the report for "no value"
pub const NO_DATA: &str = "-.-";

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}\.\d{2}\.\d{2}").expect("date regex is valid"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag regex is valid"));

/// Header strings tried in order when no row is found by content alone.
/// The first one is the literal column header of `lst0.asp`.
const HEADER_VARIANTS: &[&str] = &[
    "Tarih      Saat      Enlem(N)  Boylam(E) Derinlik(km)  MD   ML   Mw    Yer",
    "Enlem(N)  Boylam(E)",
    "TÜRKİYE VE YAKIN ÇEVRESİNDEKİ SON DEPREMLER",
    "Türkiye ve Yakın Çevresindeki Son Depremler",
    "SON DEPREMLER",
    "Son Depremler",
    "RECENT EARTHQUAKES IN TURKEY",
    "RECENT EARTHQUAKES",
    "Recent Earthquakes",
];

/// Return the candidate data lines of a raw report, in report order.
///
/// An empty result means no earthquake table was found; it is not an error.
pub fn locate_lines(text: &str) -> Vec<String> {
    let lines = direct_scan(text);
    if !lines.is_empty() {
        tracing::debug!("Direct scan found {} candidate lines", lines.len());
        return lines;
    }

    let lines = header_anchored_scan(text);
    if lines.is_empty() {
        tracing::debug!("No earthquake table found in report ({} bytes)", text.len());
    } else {
        tracing::debug!("Header-anchored scan found {} candidate lines", lines.len());
    }
    lines
}

/// Whether a (cleaned) line looks like a table row
fn is_candidate(line: &str) -> bool {
    DATE_RE.is_match(line) && line.contains(NO_DATA)
}

fn direct_scan(text: &str) -> Vec<String> {
    text.lines()
        .map(clean_line)
        .filter(|line| is_candidate(line))
        .collect()
}

fn header_anchored_scan(text: &str) -> Vec<String> {
    let Some(header_pos) = HEADER_VARIANTS
        .iter()
        .find_map(|header| text.find(header))
    else {
        return Vec::new();
    };

    match DATE_RE.find_at(text, header_pos) {
        Some(date) => direct_scan(&text[date.start()..]),
        None => Vec::new(),
    }
}

/// Strip markup left around the `<pre>` block and trim.
fn clean_line(line: &str) -> String {
    let stripped = TAG_RE.replace_all(line, "");
    stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        // last, so `&amp;lt;` stays `&lt;`
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str =
        "2024.03.15 14:23:11  38.4521   27.1234        7.3      -.-  3.2  -.-   SOME PLACE NAME    İlksel";

    #[test]
    fn test_no_date_anywhere() {
        let text = "<html><body>Servis geçici olarak kullanılamıyor -.-</body></html>";
        assert!(locate_lines(text).is_empty());
        assert!(locate_lines("").is_empty());
    }

    #[test]
    fn test_single_qualifying_line() {
        let text = format!("some banner\n\n{}\nfooter\n", ROW);
        assert_eq!(locate_lines(&text), vec![ROW.to_string()]);
    }

    #[test]
    fn test_date_without_sentinel_is_not_candidate() {
        let text = format!(
            "Son güncelleme 2024.03.15 tarihinde yapılmıştır.\n{}\n",
            ROW
        );
        let lines = locate_lines(&text);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("2024.03.15 14:23:11"));
    }

    #[test]
    fn test_preserves_order() {
        let first = "2024.03.15 14:23:11  38.4521   27.1234   7.3  -.-  3.2  -.-  FIRST  İlksel";
        let second = "2024.03.15 13:01:40  37.0011   29.9876   5.0  -.-  1.9  -.-  SECOND  İlksel";
        let text = format!("{}\r\n{}\r\n", first, second);
        assert_eq!(locate_lines(&text), vec![first.to_string(), second.to_string()]);
    }

    #[test]
    fn test_html_wrapped_report() {
        let html = format!(
            "<html><head><title>Son Depremler</title></head><body><pre>\n\
             Tarih      Saat      Enlem(N)  Boylam(E) Derinlik(km)  MD   ML   Mw    Yer  Çözüm Niteliği\n\
             ---------- --------  --------  -------   ----------    ------------    --------------\n\
             {}</pre>\n</body></html>",
            ROW
        );
        assert_eq!(locate_lines(&html), vec![ROW.to_string()]);
    }

    #[test]
    fn test_entities_and_tags_are_cleaned() {
        assert_eq!(clean_line("  <b>A</b>&nbsp;&amp;&nbsp;B  "), "A & B");
    }

    #[test]
    fn test_escaped_markup_is_decoded() {
        assert_eq!(
            clean_line("&quot;AKDENIZ&quot; &lt;KIBRIS&gt; D&#39;ACIK"),
            "\"AKDENIZ\" <KIBRIS> D'ACIK"
        );
        assert_eq!(clean_line("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_escaped_location_survives_parsing() {
        let text = "<pre>2024.03.15 14:23:11 38.4521 27.1234 7.3 -.- 3.2 -.- AYVALIK &quot;ACIKLARI&quot; &lt;EGE&gt; İlksel</pre>";
        let lines = locate_lines(text);
        assert_eq!(lines.len(), 1);
        let record = crate::module::report::parse_line(&lines[0]).unwrap();
        assert_eq!(record.location, "AYVALIK \"ACIKLARI\" <EGE>");
        assert_eq!(record.solution_quality, "İlksel");
    }

    #[test]
    fn test_header_anchored_scan() {
        let text = format!("RECENT EARTHQUAKES\nintro text\n{}\n", ROW);
        assert_eq!(header_anchored_scan(&text), vec![ROW.to_string()]);
    }

    #[test]
    fn test_header_anchored_scan_needs_header() {
        let text = format!("no title here\n{}\n", ROW);
        assert!(header_anchored_scan(&text).is_empty());
    }

    #[test]
    fn test_header_anchored_scan_needs_date_after_header() {
        let text = "2024.03.15 -.-\nSON DEPREMLER\nno rows today";
        assert!(header_anchored_scan(text).is_empty());
    }
}
