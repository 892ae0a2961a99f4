use crate::table::Table;

/// Console surface the workflow talks to.
///
/// `prompt_for_choice` returns `None` when the user cancels (Esc, Ctrl-C,
/// end of input) or when `choices` is empty.
pub trait UserInterface {
    fn display_message(&self, message: &str);

    fn display_header(&self, header: &str);

    /// Render at most `max_rows` rows of `table`.
    fn display_table(&self, table: &Table, max_rows: usize);

    fn prompt_for_choice(&self, choices: &[String], prompt: &str) -> Option<String>;
}
