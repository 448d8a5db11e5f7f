use crate::dom::element::MarkupElement;

/// Something a test can find by its text and click.
pub trait Interactable {
    fn element(&self) -> &MarkupElement;

    fn href(&self) -> Option<&str> {
        self.element().attr("href")
    }

    fn onclick(&self) -> Option<&str> {
        self.element().attr("onclick")
    }

    fn title(&self) -> Option<&str> {
        self.element().attr("title")
    }

    /// Inner markup with non-breaking spaces turned into plain ones.
    fn text(&self) -> String {
        normalize_text(&self.element().inner_html)
    }

    /// Case-insensitive substring match against the text or the title.
    fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.text().to_lowercase().contains(&needle)
            || self
                .title()
                .is_some_and(|title| title.to_lowercase().contains(&needle))
    }

    fn matches_href(&self, target: &str) -> bool {
        self.href()
            .is_some_and(|href| href.to_lowercase() == target.to_lowercase())
    }
}

pub fn normalize_text(markup: &str) -> String {
    markup.replace("&nbsp;", " ").replace('\u{a0}', " ")
}
