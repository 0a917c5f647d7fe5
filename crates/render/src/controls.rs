//! Pagination controls
use util::string::escape_html;

/// One pagination button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Page the button leads to, also its listener target
    pub page: usize,
    pub label: String,
    pub disabled: bool,
    pub current: bool,
}

impl Button {
    /// Listener target key, the button's `data-page` value
    pub fn target(&self) -> String {
        self.page.to_string()
    }
}

/// Build the buttons for `total` pages with `current` selected.
///
/// There are no controls for a single page.
/// ```
/// use render::controls::pagination_buttons;
///
/// let buttons = pagination_buttons(3, 1);
/// let labels: Vec<_> = buttons.iter().map(|b| b.label.as_str()).collect();
/// assert_eq!(labels, vec!["Previous", "1", "2", "3", "Next"]);
/// assert!(buttons[0].disabled);
/// assert!(buttons[1].current);
/// assert!(!buttons[4].disabled);
///
/// assert!(pagination_buttons(1, 1).is_empty());
/// ```
pub fn pagination_buttons(total: usize, current: usize) -> Vec<Button> {
    if total <= 1 {
        return Vec::new();
    }
    let mut buttons = Vec::with_capacity(total + 2);
    buttons.push(Button {
        page: current.saturating_sub(1),
        label: "Previous".to_string(),
        disabled: current <= 1,
        current: false,
    });
    for page in 1..=total {
        buttons.push(Button {
            page,
            label: page.to_string(),
            disabled: false,
            current: page == current,
        });
    }
    buttons.push(Button {
        page: current + 1,
        label: "Next".to_string(),
        disabled: current >= total,
        current: false,
    });
    buttons
}

/// Render buttons into markup, no buttons render as an empty string
pub fn render_controls(buttons: &[Button]) -> String {
    buttons.iter().map(render_button).collect()
}

fn render_button(button: &Button) -> String {
    let class = if button.current {
        "px-3 py-1 rounded text-sm bg-emerald-500 text-white"
    } else if button.disabled {
        "px-3 py-1 rounded text-sm bg-gray-700 opacity-50 cursor-not-allowed"
    } else {
        "px-3 py-1 rounded text-sm bg-gray-700 hover:bg-gray-600"
    };
    format!(
        r#"<button{}{} data-page="{}" class="{}">{}</button>"#,
        if button.disabled { " disabled" } else { "" },
        if button.current { r#" aria-current="page""# } else { "" },
        button.page,
        class,
        escape_html(&button.label),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_disables_next() {
        let buttons = pagination_buttons(3, 3);
        let next = buttons.last().unwrap();
        assert!(next.disabled);
        assert_eq!(next.page, 4);
        assert!(!buttons[0].disabled);
        assert_eq!(buttons[0].page, 2);
    }

    #[test]
    fn markup_marks_state() {
        let html = render_controls(&pagination_buttons(2, 1));
        assert!(html.starts_with(r#"<button disabled data-page="0""#));
        assert!(html.contains(r#"<button aria-current="page" data-page="1" class="px-3 py-1 rounded text-sm bg-emerald-500 text-white">1</button>"#));
        assert!(html.ends_with(r#"<button data-page="2" class="px-3 py-1 rounded text-sm bg-gray-700 hover:bg-gray-600">Next</button>"#));
    }

    #[test]
    fn no_markup_without_pages() {
        assert_eq!(render_controls(&pagination_buttons(0, 1)), "");
        assert_eq!(render_controls(&pagination_buttons(1, 1)), "");
    }
}
