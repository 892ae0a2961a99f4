use crate::ui::UserInterface;

/// Offers a list to the user and confirms what they picked.
#[derive(Debug)]
pub struct SelectionService<'a, U: ?Sized> {
    ui: &'a U,
}

impl<'a, U: UserInterface + ?Sized> SelectionService<'a, U> {
    pub fn new(ui: &'a U) -> Self {
        Self { ui }
    }

    pub fn select(&self, items: &[String], prompt: &str, header: Option<&str>) -> Option<String> {
        if let Some(header) = header {
            self.ui.display_header(header);
        }

        let selected = self.ui.prompt_for_choice(items, prompt)?;
        self.ui.display_message(&format!("✓ Selected: {selected}"));

        Some(selected)
    }
}
